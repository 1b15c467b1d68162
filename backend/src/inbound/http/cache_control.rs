//! JSON responses for session-scoped data.
//!
//! Everything behind the session cookie is per-user, so shared caches must
//! never keep it.

use actix_web::HttpResponse;
use actix_web::http::{StatusCode, header};
use serde::Serialize;

/// Private responses must always be revalidated before reuse.
pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";

/// Serialise `body` with `status` and the private cache policy.
pub fn private_json<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((header::CACHE_CONTROL, PRIVATE_NO_CACHE_MUST_REVALIDATE))
        .json(body)
}

/// `200 OK` with the private cache policy.
pub fn ok<T: Serialize>(body: &T) -> HttpResponse {
    private_json(StatusCode::OK, body)
}

/// `201 Created` with the private cache policy.
pub fn created<T: Serialize>(body: &T) -> HttpResponse {
    private_json(StatusCode::CREATED, body)
}
