//! Cookie builders for the session token.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name carrying the signed token.
pub const TOKEN_COOKIE: &str = "token";

/// Default token and cookie lifetime in seconds (7 days).
pub const TOKEN_TTL_SECS: u64 = 604800;

fn base_cookie(value: String, domain: Option<String>, max_age: Duration) -> Cookie<'static> {
    let mut builder = Cookie::build((TOKEN_COOKIE, value))
        .path("/")
        .max_age(max_age)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax);
    if let Some(domain) = domain {
        builder = builder.domain(domain);
    }
    builder.build()
}

/// Set the token cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use lms_auth_types::cookie::{set_token_cookie, TOKEN_COOKIE};
///
/// let jar = set_token_cookie(CookieJar::new(), "jwt".to_string(), None, 604800);
/// let cookie = jar.get(TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "jwt");
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_token_cookie(
    jar: CookieJar,
    value: String,
    domain: Option<String>,
    max_age_secs: u64,
) -> CookieJar {
    jar.add(base_cookie(
        value,
        domain,
        Duration::seconds(max_age_secs as i64),
    ))
}

/// Clear the token cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use lms_auth_types::cookie::{clear_token_cookie, set_token_cookie, TOKEN_COOKIE};
///
/// let jar = set_token_cookie(CookieJar::new(), "jwt".to_string(), None, 604800);
/// let jar = clear_token_cookie(jar, None);
/// let cookie = jar.get(TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_token_cookie(jar: CookieJar, domain: Option<String>) -> CookieJar {
    jar.add(base_cookie(String::new(), domain, Duration::ZERO))
}
