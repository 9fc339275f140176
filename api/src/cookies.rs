//! Token cookie handling
//!
//! The refresh token is always delivered in an HTTP-only cookie scoped to
//! the auth routes; the access token cookie is optional. Flags come from
//! the environment-driven cookie configuration.

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::HttpRequest;

use sgms_core::domain::entities::token::TokenPair;
use sgms_shared::config::CookieConfig;

fn same_site(config: &CookieConfig) -> SameSite {
    match config.same_site.as_str() {
        "Strict" => SameSite::Strict,
        "None" => SameSite::None,
        _ => SameSite::Lax,
    }
}

fn base_cookie<'c>(config: &CookieConfig, name: String, value: String) -> Cookie<'c> {
    Cookie::build(name, value)
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(same_site(config))
        .finish()
}

/// Cookies carrying a freshly issued token pair
pub fn auth_cookies<'c>(config: &CookieConfig, pair: &TokenPair) -> Vec<Cookie<'c>> {
    let mut cookies = Vec::with_capacity(2);

    let mut refresh = base_cookie(
        config,
        config.refresh_cookie_name.clone(),
        pair.refresh_token.clone(),
    );
    refresh.set_max_age(Duration::seconds(pair.refresh_expires_in));
    cookies.push(refresh);

    if config.store_access_token {
        let mut access = base_cookie(
            config,
            config.access_cookie_name.clone(),
            pair.access_token.clone(),
        );
        access.set_max_age(Duration::seconds(pair.access_expires_in));
        cookies.push(access);
    }

    cookies
}

/// Cookies for an authentication response (login, registration, refresh)
pub fn cookies_for_auth<'c>(
    config: &CookieConfig,
    auth: &sgms_core::domain::value_objects::AuthResponse,
    refresh_ttl_secs: i64,
) -> Vec<Cookie<'c>> {
    let pair = TokenPair::new(
        auth.access_token.clone(),
        auth.refresh_token.clone(),
        auth.expires_in,
        refresh_ttl_secs,
    );
    auth_cookies(config, &pair)
}

/// Expired cookies clearing both token slots on logout
pub fn clear_cookies<'c>(config: &CookieConfig) -> Vec<Cookie<'c>> {
    [&config.refresh_cookie_name, &config.access_cookie_name]
        .into_iter()
        .map(|name| {
            let mut cookie = base_cookie(config, name.clone(), String::new());
            cookie.set_max_age(Duration::ZERO);
            cookie
        })
        .collect()
}

/// Read the refresh token from its cookie
pub fn refresh_token_from(req: &HttpRequest, config: &CookieConfig) -> Option<String> {
    req.cookie(&config.refresh_cookie_name)
        .map(|c| c.value().to_string())
}

/// Read the access token from its cookie (when cookie storage is enabled)
pub fn access_token_from(req: &HttpRequest, config: &CookieConfig) -> Option<String> {
    req.cookie(&config.access_cookie_name)
        .map(|c| c.value().to_string())
}
