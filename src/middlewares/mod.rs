pub mod auth;
pub mod cors;

pub use auth::{Caller, IdentityMiddleware, current_caller};
pub use cors::create_cors;
