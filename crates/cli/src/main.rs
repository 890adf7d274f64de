mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use madeen_core::{Locale, Theme};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "madeen")]
#[command(version, about = "Bilingual site runtime: preview, content checks and store sessions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Serve the site locally with content hot reload
    Serve {
        /// Path to site directory (contains madeen.toml)
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Validate section content documents
    Check {
        /// Path to site directory
        path: PathBuf,
    },

    /// Run the locale, theme and content stores against an in-memory browser
    Session {
        /// Path to site directory
        path: PathBuf,

        /// Page URL the session starts on (defaults to the site root)
        #[arg(long)]
        url: Option<String>,

        /// Locale left in storage by a previous visit
        #[arg(long)]
        stored_locale: Option<String>,

        /// Theme left in storage by a previous visit
        #[arg(long)]
        stored_theme: Option<String>,

        /// Switch to this locale after start (en or ar)
        #[arg(long)]
        locale: Option<Locale>,

        /// Switch to this theme after start (light, dark or a storage token)
        #[arg(long)]
        theme: Option<Theme>,

        /// Toggle the locale once after start
        #[arg(long)]
        toggle_locale: bool,

        /// Toggle the theme once after start
        #[arg(long)]
        toggle_theme: bool,

        /// Read content from the site directory instead of over HTTP
        #[arg(long)]
        offline: bool,
    },

    /// Run a page loader and print its data
    Page {
        /// Route with a loader: contact or services
        route: String,

        /// Path to site directory
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Page URL (defaults to the route under the site base)
        #[arg(long)]
        url: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { path, port } => commands::serve::run(path, port).await,
        Command::Check { path } => commands::check::run(path).await,
        Command::Session {
            path,
            url,
            stored_locale,
            stored_theme,
            locale,
            theme,
            toggle_locale,
            toggle_theme,
            offline,
        } => {
            commands::session::run(commands::session::SessionOptions {
                path,
                url,
                stored_locale,
                stored_theme,
                locale,
                theme,
                toggle_locale,
                toggle_theme,
                offline,
            })
            .await
        }
        Command::Page { route, path, url } => commands::page::run(route, path, url).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "madeen", &mut io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_parses_locale_and_theme() {
        let cli = Cli::try_parse_from([
            "madeen", "session", "site", "--locale", "ar", "--theme", "dark",
        ])
        .unwrap();
        match cli.command {
            Command::Session { locale, theme, .. } => {
                assert_eq!(locale, Some(Locale::Ar));
                assert_eq!(theme, Some(Theme::Dark));
            }
            _ => panic!("expected session command"),
        }
    }

    #[test]
    fn test_session_accepts_theme_token() {
        let cli =
            Cli::try_parse_from(["madeen", "session", "site", "--theme", "madeen-light"]).unwrap();
        match cli.command {
            Command::Session { theme, locale, .. } => {
                assert_eq!(theme, Some(Theme::Light));
                assert_eq!(locale, None);
            }
            _ => panic!("expected session command"),
        }
    }

    #[test]
    fn test_session_rejects_unknown_locale() {
        assert!(Cli::try_parse_from(["madeen", "session", "site", "--locale", "fr"]).is_err());
    }
}
