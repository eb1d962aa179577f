/// Extractors whose rejections use the server's structured error body
use crate::error::ServerError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON body; malformed input and unknown enum values become `400 validation_error`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);

/// Path parameters; unparsable ids become `400 validation_error`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServerError))]
pub struct ApiPath<T>(pub T);
