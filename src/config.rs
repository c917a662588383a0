use crate::{
    error::{ConfigError, Error, InternalError},
    guard::{RouteGuard, DEFAULT_DASHBOARD_PATH, DEFAULT_LOGIN_PATH},
};
use axum::http::HeaderValue;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    env,
    net::SocketAddr,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

pub const API_URL_ENV: &str = "NUXT_API_URL";
pub const CONFIG_PATH_ENV: &str = "ROUTE_GUARD_CONFIG";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_COOKIE_NAME: &str = "auth_token";

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 1], 8886))
}

/// On-disk shape of the config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub cookie_name: Option<String>,
    pub login_path: Option<String>,
    pub dashboard_path: Option<String>,
    pub bind_address: Option<String>,
    pub allowed_origin: Option<String>,
    pub api_url: Option<String>,
}

/// Values that are safe to hand to the browser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicRuntimeConfig {
    pub api_url: String,
}

/// Env var wins, then the file, then the built in default.
/// An empty env var is ignored.
pub fn resolve_api_url(from_env: Option<String>, from_file: Option<String>) -> String {
    from_env
        .filter(|api_url| !api_url.is_empty())
        .or(from_file)
        .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
}

#[derive(Debug, Clone)]
pub struct Config {
    cookie_name: String,
    guard: RouteGuard,
    bind_address: SocketAddr,
    allowed_origin: Option<HeaderValue>,
    public: PublicRuntimeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_owned(),
            guard: RouteGuard::default(),
            bind_address: default_bind_address(),
            allowed_origin: None,
            public: PublicRuntimeConfig {
                api_url: DEFAULT_API_URL.to_owned(),
            },
        }
    }
}

impl Config {
    pub fn from_config_file(
        config_file: ConfigFile,
        api_url_env: Option<String>,
    ) -> Result<Self, Error> {
        let guard = RouteGuard::new(
            config_file
                .login_path
                .unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_owned()),
            config_file
                .dashboard_path
                .unwrap_or_else(|| DEFAULT_DASHBOARD_PATH.to_owned()),
        )?;
        let bind_address = match config_file.bind_address {
            Some(bind_address) => bind_address
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::InvalidBindAddress(bind_address))?,
            None => default_bind_address(),
        };
        let allowed_origin = match config_file.allowed_origin {
            Some(allowed_origin) => Some(
                HeaderValue::from_str(&allowed_origin).map_err(InternalError::InvalidOrigin)?,
            ),
            None => None,
        };
        Ok(Self {
            cookie_name: config_file
                .cookie_name
                .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_owned()),
            guard,
            bind_address,
            allowed_origin,
            public: PublicRuntimeConfig {
                api_url: resolve_api_url(api_url_env, config_file.api_url),
            },
        })
    }

    pub fn from_toml_str(contents: &str, api_url_env: Option<String>) -> Result<Self, Error> {
        let config_file: ConfigFile = toml::from_str(contents).map_err(ConfigError::Parse)?;
        Self::from_config_file(config_file, api_url_env)
    }

    /// Missing file means defaults, anything else that goes wrong is an error.
    pub fn load_from(path: &Path, api_url_env: Option<String>) -> Result<Self, Error> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                info!("Loading config from {}", path.display());
                Self::from_toml_str(&contents, api_url_env)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                Self::from_config_file(ConfigFile::default(), api_url_env)
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_owned(),
                source,
            }
            .into()),
        }
    }

    /// Reads the file named by `ROUTE_GUARD_CONFIG`, or the platform default
    /// location, and applies `NUXT_API_URL`.
    pub fn load() -> Result<Self, Error> {
        let api_url_env = env::var(API_URL_ENV).ok();
        match env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(Self::default_path)
        {
            Some(path) => Self::load_from(&path, api_url_env),
            None => Self::from_config_file(ConfigFile::default(), api_url_env),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "route-guard")
            .map(|project_dirs| project_dirs.config_dir().join("config.toml"))
    }

    pub fn get_cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn get_guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub fn get_bind_address(&self) -> SocketAddr {
        self.bind_address
    }

    pub fn get_allowed_origin(&self) -> Option<&HeaderValue> {
        self.allowed_origin.as_ref()
    }

    pub fn get_public(&self) -> &PublicRuntimeConfig {
        &self.public
    }

    pub fn bind_address(mut self, bind_address: SocketAddr) -> Self {
        self.bind_address = bind_address;
        self
    }
}
