//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, in-memory store)
//!
//! The [`Visitor`] extractor reads the session to scope each request's cart.

pub mod request_id;
pub mod session;
pub mod visitor;

pub use request_id::request_id_middleware;
pub use session::create_session_layer;
pub use visitor::Visitor;
