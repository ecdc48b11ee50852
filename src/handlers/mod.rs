pub mod admin;
pub mod wheel;

pub use admin::admin_config;
pub use wheel::wheel_config;
