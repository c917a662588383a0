use crate::config::{Config, PublicRuntimeConfig};
use axum::{Extension, Json};
use std::sync::Arc;

pub const PUBLIC_CONFIG_PATH: &str = "/_config/public";

/// The browser reads its API base URL from here.
pub async fn public_config_route(
    Extension(config): Extension<Arc<Config>>,
) -> Json<PublicRuntimeConfig> {
    Json(config.get_public().to_owned())
}
