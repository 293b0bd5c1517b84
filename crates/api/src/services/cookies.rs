//! Cookie helpers for httpOnly session authentication.
//!
//! Sessions travel only in httpOnly cookies; tokens never appear in
//! response bodies. The two realms use distinct cookie names.

use axum::http::HeaderMap;

/// Cookie carrying the user session token.
pub const SESSION_COOKIE: &str = "poker_session";

/// Cookie carrying the admin session token.
pub const ADMIN_SESSION_COOKIE: &str = "poker_admin_session";

/// Build a Set-Cookie value for a session token.
pub fn build_session_cookie(name: &str, token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        name, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build a Set-Cookie value that clears a session cookie.
pub fn build_clear_cookie(name: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax",
        name
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Extract a cookie value from request headers by name.
pub fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(axum::http::header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookie_header| {
            cookie_header
                .split(';')
                .map(|s| s.trim())
                .find_map(|cookie| {
                    let (cookie_name, cookie_value) = cookie.split_once('=')?;
                    if cookie_name == name {
                        Some(cookie_value)
                    } else {
                        None
                    }
                })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_build_session_cookie() {
        let cookie = build_session_cookie(SESSION_COOKIE, "tok123", 604_800, true);
        assert!(cookie.starts_with("poker_session=tok123"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Secure"));
    }

    #[test]
    fn test_build_session_cookie_without_secure() {
        let cookie = build_session_cookie(SESSION_COOKIE, "tok", 60, false);
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_build_clear_cookie() {
        let cookie = build_clear_cookie(ADMIN_SESSION_COOKIE, true);
        assert!(cookie.starts_with("poker_admin_session="));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("poker_session=abc123; other=value"),
        );

        assert_eq!(extract_cookie(&headers, SESSION_COOKIE), Some("abc123"));
        assert_eq!(extract_cookie(&headers, ADMIN_SESSION_COOKIE), None);
    }

    #[test]
    fn test_extract_cookie_empty_headers() {
        let headers = HeaderMap::new();
        assert_eq!(extract_cookie(&headers, SESSION_COOKIE), None);
    }
}
