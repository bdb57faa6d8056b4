use cookie::time::{Duration, OffsetDateTime};
use cookie::{Cookie, SameSite};

pub const TOKEN_COOKIE: &str = "token";

/// `Set-Cookie` value carrying a freshly issued session token
pub fn token_cookie(token: &str, expiry_days: i64, secure: bool) -> String {
    let lifetime = Duration::days(expiry_days);

    Cookie::build((TOKEN_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(lifetime)
        .expires(OffsetDateTime::now_utc() + lifetime)
        .build()
        .to_string()
}

/// Overwrites the session cookie with a placeholder that expires in seconds
pub fn cleared_token_cookie(secure: bool) -> String {
    let lifetime = Duration::seconds(10);

    Cookie::build((TOKEN_COOKIE, "none"))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(lifetime)
        .expires(OffsetDateTime::now_utc() + lifetime)
        .build()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_cookie_is_http_only() {
        let header = token_cookie("abc.def.ghi", 30, false);
        assert!(header.starts_with("token=abc.def.ghi"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("Max-Age=2592000"));
        assert!(!header.contains("Secure"));
    }

    #[test]
    fn production_cookie_is_secure() {
        assert!(token_cookie("t", 1, true).contains("Secure"));
    }

    #[test]
    fn cleared_cookie_replaces_token() {
        let header = cleared_token_cookie(false);
        assert!(header.starts_with("token=none"));
        assert!(header.contains("Max-Age=10"));
    }
}
