//! Converts rejections into JSON error responses

use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::error::PortalError;
use crate::security_logger::{log_security_event, SecurityEvent};

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

fn error_reply(status: StatusCode, message: impl Into<String>, code: &str) -> warp::reply::Response {
    let body = ErrorBody {
        error: message.into(),
        code: code.to_string(),
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

/// Render a portal error, logging server faults without exposing them
pub fn portal_error_reply(err: &PortalError) -> warp::reply::Response {
    if err.is_server_fault() {
        log_security_event(&SecurityEvent::ServerFault {
            context: "request".to_string(),
            error: err.to_string(),
        });
    }
    error_reply(err.status_code(), err.public_message(), err.error_code())
}

/// Recover handler installed at the root of the route tree
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    if let Some(portal_err) = err.find::<PortalError>() {
        return Ok(portal_error_reply(portal_err));
    }

    let reply = if err.is_not_found() {
        error_reply(StatusCode::NOT_FOUND, "route not found", "not_found")
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        log::debug!("Rejected request body: {}", e);
        error_reply(StatusCode::BAD_REQUEST, "malformed request body", "validation_error")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        error_reply(StatusCode::PAYLOAD_TOO_LARGE, "request body too large", "payload_too_large")
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        error_reply(StatusCode::LENGTH_REQUIRED, "content length required", "validation_error")
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        error_reply(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "expected application/json",
            "validation_error",
        )
    } else if err.find::<warp::filters::cors::CorsForbidden>().is_some() {
        error_reply(StatusCode::FORBIDDEN, "origin not allowed", "cors_forbidden")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        error_reply(StatusCode::METHOD_NOT_ALLOWED, "method not allowed", "method_not_allowed")
    } else {
        log_security_event(&SecurityEvent::ServerFault {
            context: "unhandled rejection".to_string(),
            error: format!("{:?}", err),
        });
        error_reply(StatusCode::INTERNAL_SERVER_ERROR, "internal server error", "server_fault")
    };

    Ok(reply)
}
