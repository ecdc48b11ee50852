pub mod override_service;
pub mod prize_catalog_service;
pub mod redemption_service;
pub mod wheel_service;

pub use override_service::*;
pub use prize_catalog_service::*;
pub use redemption_service::*;
pub use wheel_service::*;
