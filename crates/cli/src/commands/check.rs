use anyhow::Result;
use madeen_validator::validate_content;
use std::path::PathBuf;

use super::load_site;

pub async fn run(path: PathBuf) -> Result<()> {
    let config = load_site(&path)?;
    let content_dir = path.join(&config.content_dir);

    println!("Checking content at: {}", content_dir.display());

    let report = validate_content(&content_dir);

    for line in &report.info {
        println!("  ✓ {}", line);
    }
    for line in &report.warnings {
        println!("  ⚠ {}", line);
    }
    for line in &report.errors {
        eprintln!("  ✗ {}", line);
    }

    println!();
    if !report.is_ok() {
        anyhow::bail!(
            "{} error(s), {} warning(s)",
            report.errors.len(),
            report.warnings.len()
        );
    }

    println!("✅ Content valid ({} warning(s))", report.warnings.len());
    Ok(())
}
