//! Domain logic and core data structures
//!
//! This module contains pure business logic that is independent
//! of the environment, timers, and the presentation layer.

pub mod environment;
pub mod registration;
pub mod vehicle;

pub use environment::{Device, DevicePatterns, EnvironmentClassification, Orientation, OrientationNotice};
pub use registration::{CanonicalRegistration, RegistrationError, RegistrationKind};
pub use vehicle::{RegistryResponse, VehicleRecord};
