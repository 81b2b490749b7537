//! Extractors whose rejections render through [`GatewayError`], so malformed
//! bodies, paths and queries also answer with `{"detail": ...}`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::GatewayError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(GatewayError))]
pub(crate) struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(GatewayError))]
pub(crate) struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(GatewayError))]
pub(crate) struct ApiQuery<T>(pub T);
