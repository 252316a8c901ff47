//! HTTP boundary helpers: caller resolution, the response envelope and the
//! mapping from service errors to status codes. Route tables live with the
//! serving application.

pub mod access;
mod error;
mod types;

pub use error::ApiError;
pub use types::ApiResponse;
