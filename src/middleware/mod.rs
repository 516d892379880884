pub mod auth;
pub mod response;

pub use auth::{require_auth, Principal, SessionHandle};
pub use response::{ApiResponse, ApiResult};
