//! Route tree for the portal API
//!
//! Canonical endpoints live under `/api/auth/`. The older `/api/` paths are
//! kept as aliases and are served by the very same handlers.

use std::convert::Infallible;
use std::sync::Arc;

use warp::filters::BoxedFilter;
use warp::http::Method;
use warp::{Filter, Reply};

use crate::auth::gate::with_auth;
use crate::auth::service::AuthService;
use crate::config::CorsPolicy;
use crate::handlers::auth::{self, json_body, with_service, LoginRequest, RegisterRequest};
use crate::handlers::handle_rejection;
use crate::security::api_security_headers;

/// Matches `/api/auth/<name>` and the legacy `/api/<name>`
fn endpoint(name: &'static str) -> BoxedFilter<()> {
    warp::path("api")
        .and(
            warp::path("auth")
                .and(warp::path(name))
                .or(warp::path(name))
                .unify(),
        )
        .and(warp::path::end())
        .boxed()
}

/// Build the warp CORS wrapper for a policy
pub fn cors(policy: &CorsPolicy) -> warp::cors::Builder {
    let builder = warp::cors()
        .allow_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(vec!["authorization", "content-type"])
        .max_age(600u32);

    match policy {
        CorsPolicy::AnyOrigin => builder.allow_any_origin(),
        CorsPolicy::AllowList(origins) => builder
            .allow_origins(origins.iter().map(String::as_str))
            .allow_credentials(true),
    }
}

/// The API routes without CORS or rejection handling
///
/// Paths are matched before methods so unknown paths reject as not found.
pub fn api(
    service: Arc<AuthService>,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let tokens = service.tokens();

    let register = endpoint("register")
        .and(warp::post())
        .and(json_body::<RegisterRequest>())
        .and(with_service(service.clone()))
        .and_then(auth::register);

    let login = endpoint("login")
        .and(warp::post())
        .and(json_body::<LoginRequest>())
        .and(with_service(service.clone()))
        .and_then(auth::login);

    let me = endpoint("me")
        .and(warp::get())
        .and(with_auth(tokens.clone()))
        .and(with_service(service.clone()))
        .and_then(auth::me);

    let user_by_id = warp::path!("api" / "users" / String)
        .and(warp::get())
        .and(with_auth(tokens))
        .and(with_service(service))
        .and_then(auth::user_by_id);

    let health = warp::path!("health").and(warp::get()).map(|| "OK");

    register.or(login).or(me).or(user_by_id).or(health)
}

/// Complete route tree: API, error rendering, CORS and security headers
///
/// API errors are rendered inside the CORS wrapper so error replies carry
/// the CORS headers too. The outer recover only sees `CorsForbidden`.
pub fn routes(
    service: Arc<AuthService>,
    cors_policy: &CorsPolicy,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    api(service)
        .recover(handle_rejection)
        .with(cors(cors_policy))
        .recover(handle_rejection)
        .with(warp::reply::with::headers(api_security_headers()))
}
