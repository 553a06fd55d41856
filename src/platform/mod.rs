//! Host-facing platform layer
//!
//! This module encapsulates every interaction with the host: time, timers,
//! and environment signals. The rest of the crate only sees the traits and
//! guards defined here.

pub mod clock;
pub mod environment;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use environment::{
    EnvironmentSource, EnvironmentSubscription, ListenerId, SimulatedEnvironment, ViewportEvent,
    ViewportListener,
};
pub use timer::{Timer, TimerId, TimerQueue};
