use axum::http::{header, HeaderMap, HeaderValue};
use cookie::{time::Duration, Cookie, SameSite};
use std::sync::{Arc, Mutex};

use super::jwt;
use crate::config::env_or;

pub const ACCESS_COOKIE: &str = "pulsato_access";
pub const REFRESH_COOKIE: &str = "pulsato_refresh";

fn cookie_domain() -> Option<String> {
    std::env::var("COOKIE_DOMAIN").ok().filter(|d| !d.is_empty())
}

/// HTTP-only, path `/`, `SameSite=Lax`. A zero `max_age` expires the cookie.
fn session_cookie(name: &'static str, value: &str, max_age: Duration) -> HeaderValue {
    let mut builder = Cookie::build((name, value.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .secure(env_or("COOKIE_SECURE", false));

    if let Some(domain) = cookie_domain() {
        builder = builder.domain(domain);
    }

    HeaderValue::from_str(&builder.build().to_string()).expect("cookie header value should be valid")
}

pub fn build_access_cookie(token: &str, max_age_minutes: i64) -> HeaderValue {
    session_cookie(ACCESS_COOKIE, token, Duration::minutes(max_age_minutes))
}

pub fn build_refresh_cookie(token: &str, max_age_days: i64) -> HeaderValue {
    session_cookie(REFRESH_COOKIE, token, Duration::days(max_age_days))
}

/// Append Set-Cookie headers for a fresh token pair.
pub fn set_auth_cookies(headers: &mut HeaderMap, access_token: &str, refresh_token: &str) {
    headers.append(
        header::SET_COOKIE,
        build_access_cookie(access_token, jwt::access_token_expiry_minutes()),
    );
    headers.append(
        header::SET_COOKIE,
        build_refresh_cookie(refresh_token, jwt::refresh_token_expiry_days()),
    );
}

/// Append Set-Cookie headers that expire both session cookies.
pub fn clear_auth_cookies(headers: &mut HeaderMap) {
    headers.append(header::SET_COOKIE, session_cookie(ACCESS_COOKIE, "", Duration::ZERO));
    headers.append(header::SET_COOKIE, session_cookie(REFRESH_COOKIE, "", Duration::ZERO));
}

/// Access token from the session cookie, or from a `Bearer` header for
/// native clients that do not keep cookies.
pub fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    extract_cookie(headers, ACCESS_COOKIE).or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string)
    })
}

pub fn extract_refresh_token(headers: &HeaderMap) -> Option<String> {
    extract_cookie(headers, REFRESH_COOKIE)
}

fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|piece| Cookie::parse(piece.trim().to_string()).ok())
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Cookie change requested by a server function, applied by the middleware
/// once the response exists.
#[derive(Clone, Debug, PartialEq)]
pub enum PendingCookieAction {
    Set {
        access_token: String,
        refresh_token: String,
    },
    Clear,
}

/// Per-request slot the middleware places in the request extensions.
#[derive(Clone, Debug, Default)]
pub struct CookieSlot(pub Arc<Mutex<Option<PendingCookieAction>>>);

impl CookieSlot {
    pub fn put(&self, action: PendingCookieAction) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(action);
        }
    }

    pub fn take(&self) -> Option<PendingCookieAction> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}

fn schedule(action: PendingCookieAction) {
    let Some(ctx) = dioxus::fullstack::FullstackContext::current() else {
        tracing::warn!("Cookie change requested outside a server request");
        return;
    };
    let parts = ctx.parts_mut();
    match parts.extensions.get::<CookieSlot>() {
        Some(slot) => slot.put(action),
        None => tracing::warn!("No cookie slot on request; is the auth middleware installed?"),
    }
}

/// Ask the middleware to set session cookies on this response.
pub fn schedule_auth_cookies(access_token: &str, refresh_token: &str) {
    schedule(PendingCookieAction::Set {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
    });
}

/// Ask the middleware to expire session cookies on this response.
pub fn schedule_clear_cookies() {
    schedule(PendingCookieAction::Clear);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_cookie(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(raw).unwrap());
        headers
    }

    #[test]
    fn extracts_named_cookie_among_others() {
        let headers = with_cookie("theme=dark; pulsato_access=abc.def.ghi; pulsato_refresh=r1");
        assert_eq!(extract_access_token(&headers).as_deref(), Some("abc.def.ghi"));
        assert_eq!(extract_refresh_token(&headers).as_deref(), Some("r1"));
    }

    #[test]
    fn falls_back_to_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        assert_eq!(extract_access_token(&headers).as_deref(), Some("tok"));
        assert_eq!(extract_refresh_token(&headers), None);
    }

    #[test]
    fn empty_cookie_value_counts_as_missing() {
        let headers = with_cookie("pulsato_access=");
        assert_eq!(extract_access_token(&headers), None);
    }

    #[test]
    fn session_cookies_are_http_only() {
        let value = build_access_cookie("tok", 15);
        let text = value.to_str().unwrap();
        assert!(text.starts_with("pulsato_access=tok"));
        assert!(text.contains("HttpOnly"));
        assert!(text.contains("Max-Age=900"));
    }

    #[test]
    fn clearing_emits_two_expired_cookies() {
        let mut headers = HeaderMap::new();
        clear_auth_cookies(&mut headers);
        let cookies: Vec<_> = headers.get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().all(|c| c.to_str().unwrap().contains("Max-Age=0")));
    }

    #[test]
    fn cookie_slot_hands_over_once() {
        let slot = CookieSlot::default();
        slot.put(PendingCookieAction::Clear);
        assert_eq!(slot.take(), Some(PendingCookieAction::Clear));
        assert_eq!(slot.take(), None);
    }
}
