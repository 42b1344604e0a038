//! # FocusFlow Core Library
//!
//! Core logic for the FocusFlow study timer. The CLI binary is a thin layer
//! over this crate; everything it does goes through the types re-exported
//! here.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a synchronous state machine cycling study blocks with
//!   short and long breaks. It owns no clock; the caller delivers one
//!   `tick()` per second, usually through [`TimerDriver`].
//! - **Storage**: SQLite for the session log, streak and break catalog;
//!   TOML for settings. The engine only sees the store traits, so tests run
//!   against in-memory adapters.
//! - **Stats**: dashboard totals, goal progress and day streaks computed
//!   from the session log.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: the study/break state machine
//! - [`TimerDriver`]: async one-second ticker around an engine
//! - [`Database`]: session log and counters
//! - [`Config`]: application configuration

pub mod breaks;
pub mod error;
pub mod events;
pub mod interstitial;
pub mod notify;
pub mod random;
pub mod session;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod timer;

pub use breaks::BreakActivity;
pub use error::{ConfigError, DatabaseError, StoreError, TimerError, ValidationError};
pub use events::Event;
pub use interstitial::CoinSide;
pub use notify::Notifier;
pub use random::{PcgRandom, RandomSource};
pub use session::StudySession;
pub use settings::{DailyGoalType, TimerSettings};
pub use storage::{Config, ConfigStore, Database};
pub use timer::{DriverEvent, TimerCommand, TimerDriver, TimerEngine, TimerHandle, TimerMode, TimerPorts};
