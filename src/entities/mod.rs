pub mod wheel_override_policy;
pub mod wheel_pending_redemptions;
pub mod wheel_prizes;
pub mod wheel_spins;

pub use wheel_override_policy as override_policy_entity;
pub use wheel_override_policy::ControlMode;
pub use wheel_pending_redemptions as pending_redemption_entity;
pub use wheel_prizes as prize_entity;
pub use wheel_prizes::PrizeKind;
pub use wheel_spins as spin_entity;
