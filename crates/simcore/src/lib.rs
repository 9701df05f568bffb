//! Shared simulation vocabulary for the discharge workspace.
//!
//! Models live in downstream crates; this crate only defines the state they
//! mutate, the clock that drives them and the sink their output flows into.

pub mod curve;
pub mod error;
pub mod stepping;
pub mod traits;

pub use curve::{CurveConsumer, Sample};
pub use error::{Result, SimError};
pub use stepping::{FixedStepClock, hours_to_minutes};
pub use traits::{BatteryState, ElectricalModel, SimContext};
