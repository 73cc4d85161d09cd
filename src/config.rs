use clap::{Parser, Subcommand};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QueryConfig {
    pub lambda_url: Option<String>, // Natural-language query endpoint
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BackendConfig {
    pub base_url: Option<String>, // REST backend used for page fetches
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DisplayConfig {
    pub max_columns: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub web: WebConfig,
    pub query: QueryConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Query lambda URL
    #[arg(long)]
    pub lambda_url: Option<String>,

    /// REST backend base URL
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the website and JSON API (default)
    Serve,
    /// Ask a question and print the result table
    Ask {
        question: String,

        /// Page to print, reached by paging forward from the first page
        #[arg(long, default_value_t = 1)]
        page: u64,

        /// Maximum number of columns to print
        #[arg(long)]
        max_columns: Option<usize>,
    },
    /// Convert a tax records export (JSON) into CSV with field keys as headers
    Convert {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
}

impl AppConfig {
    pub fn new(args: &CliArgs) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        // Start with default configuration
        let mut config_builder = Config::builder()
            .set_default("web.host", defaults.web.host)?
            .set_default("web.port", defaults.web.port as i64)?
            .set_default("query.timeout_secs", defaults.query.timeout_secs as i64)?;

        // Add configuration from file if specified
        if let Some(config_path) = &args.config {
            config_builder = config_builder.add_source(File::from(config_path.as_path()));
        } else {
            // Check for config in default locations
            let default_locations = vec![
                "config.toml",
                "config/config.toml",
                "/etc/reach-finns/config.toml",
            ];

            for location in default_locations {
                if Path::new(location).exists() {
                    config_builder =
                        config_builder.add_source(File::new(location, config::FileFormat::Toml));
                    break;
                }
            }
        }

        // REACH_FINNS__BACKEND__API_KEY and friends
        config_builder = config_builder.add_source(
            Environment::with_prefix("REACH_FINNS")
                .prefix_separator("__")
                .separator("__"),
        );

        // Build the config
        let mut config: AppConfig = config_builder.build()?.try_deserialize()?;

        // Override with command line args if provided
        if let Some(host) = &args.host {
            config.web.host = host.clone();
        }
        if let Some(port) = args.port {
            config.web.port = port;
        }
        if let Some(url) = &args.lambda_url {
            config.query.lambda_url = Some(url.clone());
        }
        if let Some(url) = &args.backend_url {
            config.backend.base_url = Some(url.clone());
        }

        Ok(config)
    }
}

// Default implementation
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            web: WebConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            query: QueryConfig {
                lambda_url: None,
                timeout_secs: 30,
            },
            backend: BackendConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_and_cli_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[web]
port = 8080

[query]
lambda_url = "https://lambda.example/query"

[backend]
base_url = "https://db.example/rest/v1"
api_key = "anon"

[display]
max_columns = 6
"#
        )
        .unwrap();

        let args = CliArgs::parse_from([
            "reach-finns",
            "--config",
            file.path().to_str().unwrap(),
            "--host",
            "0.0.0.0",
        ]);
        let config = AppConfig::new(&args).unwrap();

        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.query.timeout_secs, 30);
        assert_eq!(config.query.lambda_url.as_deref(), Some("https://lambda.example/query"));
        assert_eq!(config.backend.api_key.as_deref(), Some("anon"));
        assert_eq!(config.display.max_columns, Some(6));
    }

    #[test]
    fn ask_subcommand_parses() {
        let args = CliArgs::parse_from(["reach-finns", "ask", "Who earns most?", "--page", "3"]);
        match args.command {
            Some(Command::Ask { question, page, .. }) => {
                assert_eq!(question, "Who earns most?");
                assert_eq!(page, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
