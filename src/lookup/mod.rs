//! Vehicle registry lookup services
//!
//! The flow controller talks to the registry through [`VehicleLookup`].
//! Two variants exist: [`SimulatedLookup`] completes after a fixed delay with
//! a stand-in record, and [`BackendLookup`] decodes responses produced by a
//! pluggable [`RegistryTransport`].

pub mod backend;
pub mod simulated;

pub use backend::{BackendLookup, RegistryTransport};
pub use simulated::SimulatedLookup;

use std::time::Duration;

use thiserror::Error;

use crate::domain::registration::CanonicalRegistration;
use crate::domain::vehicle::VehicleRecord;

/// Errors a registry lookup can end with
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Registry could not be reached: {0}")]
    Unavailable(String),
    #[error("Registry rejected {registration}: {reason}")]
    Rejected { registration: String, reason: String },
    #[error("Registry response could not be decoded: {0}")]
    Malformed(String),
}

/// Registry lookup keyed by canonical registration number
///
/// The controller schedules [`VehicleLookup::fetch`] to run once
/// [`VehicleLookup::latency`] has elapsed on the event loop clock.
pub trait VehicleLookup {
    /// Delay between submission and completion
    fn latency(&self) -> Duration;

    /// Resolves the registration to a record
    fn fetch(&self, registration: &CanonicalRegistration) -> Result<VehicleRecord, LookupError>;
}
