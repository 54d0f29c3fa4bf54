//! Endpoint handlers for the fake server.
//!
//! Each handler lives in its own module, serves a single endpoint
//! (token, messages/delta, childFolders, message) and turns the
//! extracted path, query or form plus a tenant snapshot into a
//! response.

mod message;
mod token;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde_json::json;

pub use child_folders::handle_child_folders;
pub use delta::{DeltaQuery, handle_delta};
pub use message::{MessageQuery, handle_message};
pub use token::{TokenForm, handle_token};

/// A Graph-style `{"error": {...}}` response.
pub fn graph_error(status: StatusCode, code: &str, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({"error": {"code": code, "message": message}}))
}

/// Decode a handler's JSON body.
#[cfg(test)]
pub async fn body_json(response: HttpResponse) -> serde_json::Value {
    let bytes = actix_web::body::to_bytes(response.into_body())
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
