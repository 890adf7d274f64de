// Content directory validation: every section present, both locales
// present, and the two locales carrying the same top-level fields

use madeen_core::{ContentDocument, Locale, Section, parse_content_document};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check the section documents under `dir`
pub fn validate_content(dir: &Path) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !dir.is_dir() {
        report
            .errors
            .push(format!("Content directory not found: {}", dir.display()));
        return report;
    }

    let mut seen = BTreeSet::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();

        let Some(section) = Section::from_name(stem) else {
            report.info.push(format!(
                "{} is not a known section and will not be loaded",
                entry.file_name().to_string_lossy()
            ));
            continue;
        };

        debug!(%section, path = %path.display(), "Validating section");
        seen.insert(section);
        check_section(section, path, &mut report);
    }

    for section in Section::ALL {
        if !seen.contains(&section) {
            report
                .errors
                .push(format!("Missing section document: {}", section.file_name()));
        }
    }

    report
}

fn check_section(section: Section, path: &Path, report: &mut ValidationReport) {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            report
                .errors
                .push(format!("{}: cannot read: {}", section.file_name(), e));
            return;
        }
    };

    let document = match parse_content_document(&content) {
        Ok(document) => document,
        Err(e) => {
            report.errors.push(format!("{}: {}", section.file_name(), e));
            return;
        }
    };

    match locale_key_mismatch(&document) {
        Some((only_en, only_ar)) => {
            if !only_en.is_empty() {
                report.warnings.push(format!(
                    "{}: fields only in en: {}",
                    section.file_name(),
                    only_en.join(", ")
                ));
            }
            if !only_ar.is_empty() {
                report.warnings.push(format!(
                    "{}: fields only in ar: {}",
                    section.file_name(),
                    only_ar.join(", ")
                ));
            }
        }
        None => report
            .info
            .push(format!("{}: en and ar present", section.file_name())),
    }
}

/// Top-level keys present in one locale's object but not the other's.
/// `None` when both slices agree or are not objects.
fn locale_key_mismatch(document: &ContentDocument) -> Option<(Vec<String>, Vec<String>)> {
    let keys = |locale: Locale| -> Option<BTreeSet<String>> {
        match document.get(locale) {
            Value::Object(map) => Some(map.keys().cloned().collect()),
            _ => None,
        }
    };

    let en = keys(Locale::En)?;
    let ar = keys(Locale::Ar)?;
    if en == ar {
        return None;
    }

    Some((
        en.difference(&ar).cloned().collect(),
        ar.difference(&en).cloned().collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_all_sections(dir: &Path) {
        for section in Section::ALL {
            fs::write(
                dir.join(section.file_name()),
                r#"{"en": {"title": "x"}, "ar": {"title": "س"}}"#,
            )
            .unwrap();
        }
    }

    #[test]
    fn test_complete_directory_is_ok() {
        let temp = TempDir::new().unwrap();
        write_all_sections(temp.path());

        let report = validate_content(temp.path());
        assert!(report.is_ok(), "{:?}", report.errors);
        assert!(report.warnings.is_empty());
        assert_eq!(report.info.len(), 7);
    }

    #[test]
    fn test_missing_directory() {
        let temp = TempDir::new().unwrap();
        let report = validate_content(&temp.path().join("nope"));
        assert!(!report.is_ok());
        assert!(report.errors[0].contains("not found"));
    }

    #[test]
    fn test_missing_section_is_error() {
        let temp = TempDir::new().unwrap();
        write_all_sections(temp.path());
        fs::remove_file(temp.path().join("hero.json")).unwrap();

        let report = validate_content(temp.path());
        assert_eq!(report.errors, vec!["Missing section document: hero.json"]);
    }

    #[test]
    fn test_missing_locale_is_error() {
        let temp = TempDir::new().unwrap();
        write_all_sections(temp.path());
        fs::write(temp.path().join("about.json"), r#"{"en": {"title": "x"}}"#).unwrap();

        let report = validate_content(temp.path());
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("about.json"));
    }

    #[test]
    fn test_invalid_json_is_error() {
        let temp = TempDir::new().unwrap();
        write_all_sections(temp.path());
        fs::write(temp.path().join("footer.json"), "{ nope").unwrap();

        let report = validate_content(temp.path());
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("footer.json"));
    }

    #[test]
    fn test_key_mismatch_is_warning() {
        let temp = TempDir::new().unwrap();
        write_all_sections(temp.path());
        fs::write(
            temp.path().join("home.json"),
            r#"{"en": {"title": "x", "cta": "Go"}, "ar": {"title": "س", "banner": "ب"}}"#,
        )
        .unwrap();

        let report = validate_content(temp.path());
        assert!(report.is_ok());
        assert_eq!(
            report.warnings,
            vec![
                "home.json: fields only in en: cta",
                "home.json: fields only in ar: banner"
            ]
        );
    }

    #[test]
    fn test_unknown_file_is_info_and_non_json_ignored() {
        let temp = TempDir::new().unwrap();
        write_all_sections(temp.path());
        fs::write(temp.path().join("blog.json"), "{}").unwrap();
        fs::write(temp.path().join("README.md"), "notes").unwrap();

        let report = validate_content(temp.path());
        assert!(report.is_ok());
        assert!(report.info.iter().any(|i| i.starts_with("blog.json is not a known section")));
        assert_eq!(report.info.len(), 8);
    }

    #[test]
    fn test_shipped_site_content_is_valid() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../site/static/data");
        let report = validate_content(&dir);
        assert!(report.is_ok(), "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }
}
