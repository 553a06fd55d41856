//! Application orchestration layer
//!
//! This module coordinates between the environment, domain, lookup, and
//! navigation layers. It owns the per-screen fetch state and event handling.

pub mod controller;
pub mod error;
pub mod navigation;
pub mod orientation;
pub mod screen;
pub mod state;

pub use controller::LookupFlowController;
pub use error::AppError;
pub use navigation::{Navigator, Route};
pub use orientation::{ClassificationObserver, OrientationWatcher};
pub use screen::{AddVehicleScreen, FormView, ScreenView};
pub use state::{FetchState, FlowEvent, LoadingState, StateMachine};
