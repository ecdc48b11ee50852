pub mod common;
pub mod pagination;
pub mod wheel;

pub use common::*;
pub use pagination::*;
pub use wheel::*;
