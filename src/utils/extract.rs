use axum_macros::FromRequest;

use crate::core::error::Error;

/// JSON request body. Rejections are answered with the error envelope
/// instead of axum's plain-text response.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub(crate) struct Payload<T>(pub(crate) T);
