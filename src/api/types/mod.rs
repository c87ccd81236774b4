//! Request and response types for the HTTP front door

pub mod ask;
pub mod error;

pub use ask::{AskParams, AskResponse, StatusResponse};
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
