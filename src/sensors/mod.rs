//! Sensor module - reading model and sources

mod traits;
mod brightness;
mod simulator;

pub use traits::{Field, FieldSet, Reading, SensorSource, SensorStatus};
pub use brightness::Brightness;
pub use simulator::{EnvironmentSimulator, Scenario};
