//! Wheel-of-fortune prize engine: pure decision logic.
//!
//! Persistence and transactions live in `services`; everything here is
//! side-effect free and unit tested in place.

pub mod geometry;
pub mod identity;
pub mod messages;
pub mod override_policy;
pub mod selection;

pub use identity::{Identity, spin_day};
pub use messages::Lang;
pub use override_policy::{OverrideDraw, next_prize};
pub use selection::{Outcome, weighted_draw};
