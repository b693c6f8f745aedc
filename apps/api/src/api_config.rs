use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderName;
use tracing_subscriber::EnvFilter;
use url::Url;
use warrant_core::AppError;

const DEFAULT_ACTOR_HEADER: &str = "x-authenticated-user";
const DEFAULT_GROUP_LOOKUP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackendConfig {
    Memory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSourceConfig {
    Static {
        groups_file: Option<PathBuf>,
    },
    Directory {
        org_url: Url,
        api_token: String,
        timeout: Duration,
    },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub api_host: String,
    pub api_port: u16,
    pub store_backend: StoreBackendConfig,
    pub group_source: GroupSourceConfig,
    pub actor_header: HeaderName,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok(), env::args().nth(1).as_deref())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        command: Option<&str>,
    ) -> Result<Self, AppError> {
        let migrate_only = command == Some("migrate");

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = lookup("API_PORT")
            .map(|value| {
                value
                    .parse::<u16>()
                    .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))
            })
            .transpose()?
            .unwrap_or(8080);

        let store_backend = match lookup("STORE_BACKEND")
            .unwrap_or_else(|| "memory".to_owned())
            .as_str()
        {
            "memory" => StoreBackendConfig::Memory,
            "postgres" => StoreBackendConfig::Postgres {
                database_url: required_non_empty(&lookup, "DATABASE_URL")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "STORE_BACKEND must be either 'memory' or 'postgres', got '{other}'"
                )));
            }
        };

        let group_source = match lookup("GROUP_SOURCE")
            .unwrap_or_else(|| "static".to_owned())
            .as_str()
        {
            "static" => GroupSourceConfig::Static {
                groups_file: lookup("STATIC_GROUPS_FILE")
                    .filter(|value| !value.trim().is_empty())
                    .map(PathBuf::from),
            },
            "directory" => {
                let org_url = required_non_empty(&lookup, "DIRECTORY_ORG_URL")?;
                let org_url = Url::parse(&org_url).map_err(|error| {
                    AppError::Validation(format!("invalid DIRECTORY_ORG_URL: {error}"))
                })?;
                let timeout_secs = lookup("GROUP_LOOKUP_TIMEOUT_SECS")
                    .map(|value| {
                        value.parse::<u64>().map_err(|error| {
                            AppError::Validation(format!(
                                "invalid GROUP_LOOKUP_TIMEOUT_SECS: {error}"
                            ))
                        })
                    })
                    .transpose()?
                    .unwrap_or(DEFAULT_GROUP_LOOKUP_TIMEOUT_SECS);

                GroupSourceConfig::Directory {
                    org_url,
                    api_token: required_non_empty(&lookup, "DIRECTORY_API_TOKEN")?,
                    timeout: Duration::from_secs(timeout_secs.max(1)),
                }
            }
            other => {
                return Err(AppError::Validation(format!(
                    "GROUP_SOURCE must be either 'static' or 'directory', got '{other}'"
                )));
            }
        };

        let actor_header = lookup("ACTOR_HEADER")
            .unwrap_or_else(|| DEFAULT_ACTOR_HEADER.to_owned());
        let actor_header = HeaderName::from_str(actor_header.trim()).map_err(|error| {
            AppError::Validation(format!("invalid ACTOR_HEADER '{actor_header}': {error}"))
        })?;

        Ok(Self {
            migrate_only,
            api_host,
            api_port,
            store_backend,
            group_source,
            actor_header,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, AppError> {
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
