//! Optional HTTP Basic gate for the dashboard.

use std::sync::Arc;

use {
    axum::{
        extract::{Request, State},
        http::{StatusCode, header},
        middleware::Next,
        response::{IntoResponse, Response},
    },
    base64::Engine,
    secrecy::ExposeSecret,
};

use helpdesk_config::DashboardCredentials;

/// Middleware that enforces HTTP Basic credentials when they are
/// configured, and passes every request through when they are not.
pub async fn require_basic_auth(
    State(credentials): State<Option<Arc<DashboardCredentials>>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(credentials) = credentials else {
        return next.run(request).await;
    };

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|value| verify_basic(&credentials, value));

    if authorized {
        next.run(request).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"helpdesk\"")],
            "authentication required",
        )
            .into_response()
    }
}

/// Check an `Authorization: Basic <base64>` header value.
///
/// Both the username and password comparisons are evaluated unconditionally
/// so a wrong username costs the same as a wrong password.
fn verify_basic(credentials: &DashboardCredentials, header_value: &str) -> bool {
    let Some(encoded) = header_value.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = base64::engine::general_purpose::STANDARD.decode(encoded.trim()) else {
        return false;
    };
    let Ok(decoded) = String::from_utf8(decoded) else {
        return false;
    };
    let Some((username, password)) = decoded.split_once(':') else {
        return false;
    };

    let username_ok = constant_time_eq(username, &credentials.username);
    let password_ok = constant_time_eq(password, credentials.password.expose_secret());
    username_ok & password_ok
}

/// Constant-time string comparison.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use secrecy::Secret;

    use super::*;

    fn credentials() -> DashboardCredentials {
        DashboardCredentials {
            username: "ops".into(),
            password: Secret::new("hunter2".into()),
        }
    }

    fn basic_header(user: &str, pass: &str) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{user}:{pass}"));
        format!("Basic {encoded}")
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "abcd"));
        assert!(!constant_time_eq("", "a"));
    }

    #[test]
    fn accepts_matching_credentials() {
        assert!(verify_basic(&credentials(), &basic_header("ops", "hunter2")));
    }

    #[test]
    fn rejects_wrong_username_or_password() {
        let creds = credentials();
        assert!(!verify_basic(&creds, &basic_header("ops", "wrong")));
        assert!(!verify_basic(&creds, &basic_header("eve", "hunter2")));
    }

    #[test]
    fn rejects_malformed_headers() {
        let creds = credentials();
        assert!(!verify_basic(&creds, "Bearer abc123"));
        assert!(!verify_basic(&creds, "Basic %%%not-base64%%%"));
        // Valid base64, but no colon separator.
        let no_colon = base64::engine::general_purpose::STANDARD.encode("opshunter2");
        assert!(!verify_basic(&creds, &format!("Basic {no_colon}")));
    }

    /// Passwords containing colons survive the username/password split.
    #[test]
    fn password_may_contain_colons() {
        let creds = DashboardCredentials {
            username: "ops".into(),
            password: Secret::new("a:b:c".into()),
        };
        assert!(verify_basic(&creds, &basic_header("ops", "a:b:c")));
    }
}
