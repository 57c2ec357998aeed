//! Session cookies.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use shortlink_router::Request;

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "site-session";

/// Cookie carrying the OAuth `state` between sign-in and callback.
pub const STATE_COOKIE: &str = "oauth-state";

/// Session lifetime (2 weeks).
pub const SESSION_MAX_AGE_SECS: u64 = 14 * 24 * 60 * 60;

/// Lifetime of a pending OAuth state.
pub const STATE_MAX_AGE_SECS: u64 = 10 * 60;

/// Returns the session id carried by a request, if any.
pub fn session_id(req: &Request) -> Option<&str> {
    req.cookie(SESSION_COOKIE).filter(|id| !id.is_empty())
}

/// Generates an unguessable token for session ids and OAuth state.
pub fn generate_token() -> String {
    use rand::RngExt;
    let mut rng = rand::rng();
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Builds a `Set-Cookie` value.
pub fn set_cookie(name: &str, value: &str, max_age_secs: u64) -> String {
    format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// Builds a `Set-Cookie` value that removes a cookie.
pub fn clear_cookie(name: &str) -> String {
    set_cookie(name, "", 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generation() {
        let a = generate_token();
        let b = generate_token();

        assert_eq!(a.len(), 43);
        assert_ne!(a, b);
        assert!(!a.contains('='));
    }

    #[test]
    fn test_session_id_from_cookie() {
        let req = Request::get("/").header("Cookie", "site-session=abc; theme=dark");
        assert_eq!(session_id(&req), Some("abc"));

        let req = Request::get("/").header("Cookie", "site-session=");
        assert_eq!(session_id(&req), None);

        assert_eq!(session_id(&Request::get("/")), None);
    }

    #[test]
    fn test_cookie_strings() {
        assert_eq!(
            set_cookie(SESSION_COOKIE, "abc", 60),
            "site-session=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=60"
        );
        assert!(clear_cookie(STATE_COOKIE).starts_with("oauth-state=; "));
        assert!(clear_cookie(STATE_COOKIE).ends_with("Max-Age=0"));
    }
}
