use std::fmt;
use std::time::Duration;

use crate::domain::registration::CanonicalRegistration;
use crate::domain::vehicle::{RegistryResponse, VehicleRecord};
use crate::lookup::{LookupError, VehicleLookup};

/// Carries a registration number to a registry and returns the raw response body
///
/// This is the seam where a real network client plugs in.
pub trait RegistryTransport {
    fn request(&self, registration: &str) -> Result<String, LookupError>;
}

impl<F> RegistryTransport for F
where
    F: Fn(&str) -> Result<String, LookupError>,
{
    fn request(&self, registration: &str) -> Result<String, LookupError> {
        self(registration)
    }
}

/// Lookup backed by a real registry transport
pub struct BackendLookup {
    transport: Box<dyn RegistryTransport>,
    latency: Duration,
}

impl BackendLookup {
    pub fn new(transport: impl RegistryTransport + 'static, latency: Duration) -> Self {
        Self {
            transport: Box::new(transport),
            latency,
        }
    }

    /// Decodes a registry envelope into a record
    pub fn decode(registration: &str, body: &str) -> Result<VehicleRecord, LookupError> {
        let response: RegistryResponse =
            serde_json::from_str(body).map_err(|e| LookupError::Malformed(e.to_string()))?;

        if !response.is_success() {
            return Err(LookupError::Rejected {
                registration: registration.to_owned(),
                reason: response.message.unwrap_or(response.status),
            });
        }

        response
            .data
            .ok_or_else(|| LookupError::Malformed("success response without data".to_owned()))
    }
}

impl fmt::Debug for BackendLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendLookup")
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl VehicleLookup for BackendLookup {
    fn latency(&self) -> Duration {
        self.latency
    }

    fn fetch(&self, registration: &CanonicalRegistration) -> Result<VehicleRecord, LookupError> {
        let compact = registration.compact();
        let body = self.transport.request(&compact)?;
        Self::decode(&compact, &body)
    }
}
