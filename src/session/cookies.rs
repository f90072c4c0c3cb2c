use axum::http::{header, HeaderMap};
use cookie::{Cookie, SameSite};
use uuid::Uuid;

use crate::config::SessionConfig;

/// Session id from the request's `Cookie` header, if present and well formed
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == cookie_name)
        .and_then(|c| Uuid::parse_str(c.value().trim()).ok())
}

/// `Set-Cookie` value carrying a new session id
pub fn session_cookie(config: &SessionConfig, id: Uuid) -> String {
    Cookie::build((config.cookie_name.clone(), id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookie)
        .build()
        .to_string()
}

/// `Set-Cookie` value that makes the browser forget the session
pub fn clear_session_cookie(config: &SessionConfig) -> String {
    let mut cookie = Cookie::build((config.cookie_name.clone(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookie)
        .build();
    cookie.make_removal();
    cookie.to_string()
}
