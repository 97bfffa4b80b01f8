//! Visitor extractor.
//!
//! Resolves the visitor id stored in the session, minting a new one on the
//! first request so every browser gets its own persisted cart.

use axum::{extract::FromRequestParts, http::request::Parts};
use metalworks_core::VisitorId;
use tower_sessions::Session;

use super::session::keys;
use crate::error::AppError;

/// Extractor yielding the current visitor's id.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Visitor(visitor): Visitor) -> String {
///     visitor.to_string()
/// }
/// ```
pub struct Visitor(pub VisitorId);

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        if let Some(visitor) = session.get::<VisitorId>(keys::VISITOR_ID).await? {
            return Ok(Self(visitor));
        }

        let visitor = VisitorId::generate();
        session.insert(keys::VISITOR_ID, &visitor).await?;
        tracing::debug!(visitor = %visitor, "New visitor");
        Ok(Self(visitor))
    }
}
