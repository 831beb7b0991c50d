//! Steering for autonomous entities.

mod autonomous;

pub use autonomous::{AutonomousState, FLEE_WEIGHT, Intent, PURSUIT_WEIGHT, steer};
