//! Detection module - change detection and emergency classification

mod change;
mod emergency;

pub use change::{detect_change, ChangeThresholds};
pub use emergency::{classify_emergency, Bounds, EmergencyBounds};
