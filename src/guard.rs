use crate::{error::ConfigError, routes::public::PUBLIC_CONFIG_PATH};

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_DASHBOARD_PATH: &str = "/dashboard";

/// Outcome of running the guard against a single navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    NoAction,
    RedirectTo(String),
}

/// Decides whether a navigation should be redirected based on whether the
/// client carries an auth token.
///
/// Signed-in clients are bounced from the login page to the dashboard and
/// anonymous clients are bounced from the dashboard to the login page. Every
/// other navigation passes through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    login_path: String,
    dashboard_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            dashboard_path: DEFAULT_DASHBOARD_PATH.to_owned(),
        }
    }
}

/// Guarded paths are registered as literal routes and sent back in `Location`,
/// so they must be plain absolute ASCII paths with no route pattern syntax.
fn validate_path(path: &str) -> Result<(), ConfigError> {
    let valid = path.starts_with('/')
        && !path.starts_with("//")
        && path
            .chars()
            .all(|c| c.is_ascii() && !c.is_ascii_control() && c != ':' && c != '*');
    if !valid {
        return Err(ConfigError::InvalidGuardPath(path.to_owned()));
    }
    if path == PUBLIC_CONFIG_PATH {
        return Err(ConfigError::ReservedGuardPath(path.to_owned()));
    }
    Ok(())
}

/// Cookie values are read the way the browser side decodes them: the literals
/// `false`, `null`, `undefined`, `NaN`, an empty JSON string and any numeric
/// zero are falsy, as is the empty string. Everything else counts as a token.
pub fn is_truthy(token: &str) -> bool {
    let token = token.trim();
    if token.is_empty() || token == "\"\"" {
        return false;
    }
    if ["false", "null", "undefined", "nan"]
        .iter()
        .any(|falsy| token.eq_ignore_ascii_case(falsy))
    {
        return false;
    }
    let looks_numeric = token.starts_with(|c: char| c == '-' || c.is_ascii_digit());
    !(looks_numeric && token.parse::<f64>().is_ok_and(|number| number == 0.0))
}

impl RouteGuard {
    pub fn new(login_path: String, dashboard_path: String) -> Result<Self, ConfigError> {
        for path in [&login_path, &dashboard_path] {
            validate_path(path)?;
        }
        //redirecting between the same path would never settle
        if login_path == dashboard_path {
            return Err(ConfigError::GuardPathsEqual(login_path));
        }
        Ok(Self {
            login_path,
            dashboard_path,
        })
    }

    pub fn get_login_path(&self) -> &str {
        &self.login_path
    }

    pub fn get_dashboard_path(&self) -> &str {
        &self.dashboard_path
    }

    /// A falsy token is treated the same as a missing one, see [`is_truthy`].
    pub fn evaluate(&self, auth_token: Option<&str>, destination_path: &str) -> Decision {
        let authenticated = auth_token.is_some_and(is_truthy);
        if authenticated && destination_path == self.login_path {
            return Decision::RedirectTo(self.dashboard_path.to_owned());
        }
        if !authenticated && destination_path == self.dashboard_path {
            return Decision::RedirectTo(self.login_path.to_owned());
        }
        Decision::NoAction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_login_goes_to_dashboard() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.evaluate(Some("abc123"), "/login"),
            Decision::RedirectTo("/dashboard".to_owned())
        );
    }

    #[test]
    fn anonymous_dashboard_goes_to_login() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.evaluate(None, "/dashboard"),
            Decision::RedirectTo("/login".to_owned())
        );
    }

    #[test]
    fn matching_pages_pass_through() {
        let guard = RouteGuard::default();
        assert_eq!(guard.evaluate(Some("abc123"), "/dashboard"), Decision::NoAction);
        assert_eq!(guard.evaluate(None, "/login"), Decision::NoAction);
    }

    #[test]
    fn unrelated_paths_never_redirect() {
        let guard = RouteGuard::default();
        for path in ["/", "/about", "/login/", "/dashboard/settings", "/Login", ""] {
            assert_eq!(guard.evaluate(None, path), Decision::NoAction, "{path}");
            assert_eq!(guard.evaluate(Some("t"), path), Decision::NoAction, "{path}");
        }
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.evaluate(Some(""), "/dashboard"),
            Decision::RedirectTo("/login".to_owned())
        );
        assert_eq!(guard.evaluate(Some(""), "/login"), Decision::NoAction);
    }

    #[test]
    fn falsy_tokens_count_as_absent() {
        let guard = RouteGuard::default();
        for token in ["false", "null", "undefined", "NaN", "0", "-0", "0.0", "\"\""] {
            assert_eq!(
                guard.evaluate(Some(token), "/dashboard"),
                Decision::RedirectTo("/login".to_owned()),
                "{token:?}"
            );
        }
        for token in ["true", "1", "abc123", "0abc", "nullish", "+0"] {
            assert!(is_truthy(token), "{token:?}");
        }
    }

    #[test]
    fn redirect_target_is_stable() {
        let guard = RouteGuard::default();
        for token in [None, Some("abc123")] {
            for path in ["/login", "/dashboard"] {
                if let Decision::RedirectTo(target) = guard.evaluate(token, path) {
                    assert_eq!(guard.evaluate(token, &target), Decision::NoAction);
                }
            }
        }
    }

    #[test]
    fn custom_paths() {
        let guard = RouteGuard::new("/sign-in".to_owned(), "/home".to_owned()).unwrap();
        assert_eq!(
            guard.evaluate(Some("t"), "/sign-in"),
            Decision::RedirectTo("/home".to_owned())
        );
        assert_eq!(guard.evaluate(Some("t"), "/login"), Decision::NoAction);
    }

    #[test]
    fn rejects_invalid_paths() {
        assert!(matches!(
            RouteGuard::new("login".to_owned(), "/dashboard".to_owned()),
            Err(ConfigError::InvalidGuardPath(_))
        ));
        assert!(matches!(
            RouteGuard::new("/same".to_owned(), "/same".to_owned()),
            Err(ConfigError::GuardPathsEqual(_))
        ));
    }

    #[test]
    fn rejects_route_pattern_syntax() {
        for path in ["/:id", "/*rest", "/users/:id/home"] {
            assert!(
                matches!(
                    RouteGuard::new("/login".to_owned(), path.to_owned()),
                    Err(ConfigError::InvalidGuardPath(_))
                ),
                "{path}"
            );
        }
    }

    #[test]
    fn rejects_unsafe_characters() {
        for path in ["/log\r\nin", "/tab\there", "/café", "//evil.example.com"] {
            assert!(
                matches!(
                    RouteGuard::new(path.to_owned(), "/dashboard".to_owned()),
                    Err(ConfigError::InvalidGuardPath(_))
                ),
                "{path:?}"
            );
        }
    }

    #[test]
    fn rejects_public_config_path() {
        assert!(matches!(
            RouteGuard::new(PUBLIC_CONFIG_PATH.to_owned(), "/dashboard".to_owned()),
            Err(ConfigError::ReservedGuardPath(_))
        ));
        assert!(matches!(
            RouteGuard::new("/login".to_owned(), PUBLIC_CONFIG_PATH.to_owned()),
            Err(ConfigError::ReservedGuardPath(_))
        ));
    }
}
