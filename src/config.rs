//! Server configuration, resolved once at startup from the environment.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::licence::layout::Letterhead;
use crate::licence::record::{DefaultTable, DefaultsError};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:8080",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
    #[error("failed to load licence defaults from {}: {source}", .path.display())]
    Defaults {
        path: PathBuf,
        #[source]
        source: DefaultsError,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub defaults_path: Option<PathBuf>,
    pub letterhead: Letterhead,
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
                name: "PORT",
                value: raw.clone(),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let defaults_path = env::var("LICENCE_DEFAULTS_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let fallback = Letterhead::default();
        let letterhead = Letterhead {
            organisation: non_empty_var("LETTERHEAD_ORGANISATION").unwrap_or(fallback.organisation),
            title: non_empty_var("LETTERHEAD_TITLE").unwrap_or(fallback.title),
        };

        let allowed_origins = non_empty_var("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_else(|| DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect());

        Ok(Self {
            host,
            port,
            defaults_path,
            letterhead,
            allowed_origins,
        })
    }

    /// The default table: built-ins, overridden by the configured file if any.
    pub fn load_defaults(&self) -> Result<DefaultTable, ConfigError> {
        match &self.defaults_path {
            Some(path) => {
                let table = DefaultTable::from_json_file(path).map_err(|source| ConfigError::Defaults {
                    path: path.clone(),
                    source,
                })?;
                log::info!("loaded licence defaults from {}", path.display());
                Ok(table)
            }
            None => Ok(DefaultTable::builtin()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            defaults_path: None,
            letterhead: Letterhead::default(),
            allowed_origins: DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::licence::record::Field;
    use std::io::Write;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(" https://a.example, ,http://b.example "),
            vec!["https://a.example", "http://b.example"]
        );
    }

    #[test]
    fn test_load_defaults_without_file_is_builtin() {
        let config = ServerConfig::default();
        assert_eq!(config.load_defaults().unwrap(), DefaultTable::builtin());
    }

    #[test]
    fn test_load_defaults_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"clubName": "STADE TUNISIEN"}}"#).unwrap();

        let config = ServerConfig {
            defaults_path: Some(file.path().to_path_buf()),
            ..ServerConfig::default()
        };
        let table = config.load_defaults().unwrap();
        assert_eq!(table.get(Field::ClubName), "STADE TUNISIEN");
    }

    #[test]
    fn test_load_defaults_missing_file_is_error() {
        let config = ServerConfig {
            defaults_path: Some(PathBuf::from("/nonexistent/licence-defaults.json")),
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.load_defaults(),
            Err(ConfigError::Defaults {
                source: DefaultsError::Io(_),
                ..
            })
        ));
    }
}
