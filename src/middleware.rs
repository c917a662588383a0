use crate::{config::Config, guard::Decision};
use axum::{
    extract::{Request, State},
    http::{header::COOKIE, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use cookie::Cookie;
use std::sync::Arc;
use tracing::debug;

/// Pulls the named cookie out of every `Cookie` header on the request,
/// percent-decoding the value. Headers or pairs that fail to parse are skipped.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse_encoded(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_owned())
}

/// Runs before every page request and redirects between the login page and
/// the dashboard depending on whether the auth cookie is set.
pub async fn route_guard(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Response {
    let auth_token = read_cookie(request.headers(), config.get_cookie_name());
    let decision = config
        .get_guard()
        .evaluate(auth_token.as_deref(), request.uri().path());
    match decision {
        Decision::NoAction => next.run(request).await,
        Decision::RedirectTo(target) => {
            debug!(
                from = %request.uri().path(),
                to = %target,
                "Redirecting navigation"
            );
            Redirect::to(&target).into_response()
        }
    }
}
