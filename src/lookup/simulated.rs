use std::time::Duration;

use crate::domain::registration::CanonicalRegistration;
use crate::domain::vehicle::VehicleRecord;
use crate::lookup::{LookupError, VehicleLookup};

/// Fixed-latency stand-in for the registry
///
/// Always succeeds with [`VehicleRecord::stand_in`], whatever was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLookup {
    delay: Duration,
}

impl SimulatedLookup {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedLookup {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl VehicleLookup for SimulatedLookup {
    fn latency(&self) -> Duration {
        self.delay
    }

    fn fetch(&self, registration: &CanonicalRegistration) -> Result<VehicleRecord, LookupError> {
        tracing::debug!(%registration, "serving stand-in registry record");
        Ok(VehicleRecord::stand_in())
    }
}
