use crate::config::Config;
use axum::{response::Html, Extension};
use std::sync::Arc;

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title></head><body>{body}</body></html>"
    ))
}

pub async fn index_route(Extension(config): Extension<Arc<Config>>) -> Html<String> {
    let guard = config.get_guard();
    page(
        "Home",
        &format!(
            "<a href=\"{login}\">Log in</a> <a href=\"{dashboard}\">Dashboard</a>",
            login = guard.get_login_path(),
            dashboard = guard.get_dashboard_path(),
        ),
    )
}

pub async fn login_route() -> Html<String> {
    page("Log in", "<h1>Log in</h1>")
}

pub async fn dashboard_route() -> Html<String> {
    page("Dashboard", "<h1>Dashboard</h1>")
}
