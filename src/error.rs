use axum::http::header::InvalidHeaderValue;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Read({path}, {source})")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Parse({0})")]
    Parse(#[from] toml::de::Error),
    #[error("InvalidGuardPath({0})")]
    InvalidGuardPath(String),
    #[error("ReservedGuardPath({0})")]
    ReservedGuardPath(String),
    #[error("GuardPathsEqual({0})")]
    GuardPathsEqual(String),
    #[error("InvalidBindAddress({0})")]
    InvalidBindAddress(String),
}

#[derive(Error, Debug)]
pub enum GuardServerBuildError {
    #[error("MissingProperties({0})")]
    MissingProperties(String),
}

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Bind({0})")]
    Bind(std::io::Error),
    #[error("Serve({0})")]
    Serve(std::io::Error),
}

#[derive(Error, Debug)]
pub enum InternalError {
    #[error("GuardServerBuild({0})")]
    GuardServerBuild(#[from] GuardServerBuildError),
    #[error("InvalidOrigin({0})")]
    InvalidOrigin(#[from] InvalidHeaderValue),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config({0})")]
    Config(#[from] ConfigError),
    #[error("Internal({0})")]
    Internal(#[from] InternalError),
    #[error("Startup({0})")]
    Startup(#[from] StartupError),
}
