mod driver;
mod engine;
pub mod interventions;
mod mode;

pub use driver::{DriverEvent, TimerCommand, TimerDriver, TimerHandle, TICK_PERIOD};
pub use engine::{format_time, TimerEngine, TimerPorts};
pub use mode::TimerMode;
