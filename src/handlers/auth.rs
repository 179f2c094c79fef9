//! HTTP handlers for the authentication endpoints
//!
//! Handlers stay thin: decode the request, call `AuthService`, encode the
//! reply. Failures are turned into rejections and rendered by
//! `handlers::rejection::handle_rejection`.

use std::convert::Infallible;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::auth::account::AccountProfile;
use crate::auth::gate::AuthContext;
use crate::auth::service::AuthService;
use crate::constants::MAX_BODY_BYTES;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AccountProfile,
}

/// Make the shared service available to a handler
pub fn with_service(
    service: Arc<AuthService>,
) -> impl Filter<Extract = (Arc<AuthService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

/// Size-limited JSON body
pub fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// POST register
pub async fn register(
    request: RegisterRequest,
    service: Arc<AuthService>,
) -> Result<impl Reply, Rejection> {
    let token = service
        .register(&request.email, &request.password, &request.name)
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::with_status(
        warp::reply::json(&RegisterResponse { token }),
        StatusCode::CREATED,
    ))
}

/// POST login
pub async fn login(
    request: LoginRequest,
    service: Arc<AuthService>,
) -> Result<impl Reply, Rejection> {
    let outcome = service
        .login(&request.email, &request.password)
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&LoginResponse {
        token: outcome.token,
        user: outcome.account,
    }))
}

/// GET current account
pub async fn me(ctx: AuthContext, service: Arc<AuthService>) -> Result<impl Reply, Rejection> {
    let profile = service
        .current_account(&ctx)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&profile))
}

/// GET account by id
pub async fn user_by_id(
    id: String,
    ctx: AuthContext,
    service: Arc<AuthService>,
) -> Result<impl Reply, Rejection> {
    log::debug!("Account {} looked up by {}", id, ctx.subject_id);
    let profile = service
        .account_by_id(&id)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&profile))
}
