//! Vehicle registry record
//!
//! The flat, string-typed record a registry lookup produces, and the JSON
//! envelope registry responses arrive in.

use serde::{Deserialize, Serialize};

/// Registry details for one vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub registration_number: String,
    pub owner_name: String,
    pub father_name: String,
    pub vehicle_class: String,
    pub fuel_type: String,
    pub manufacturer: String,
    pub model: String,
    pub registration_date: String,
    pub engine_number: String,
    pub chassis_number: String,
    pub rc_status: String,
    pub vehicle_category: String,
    pub pucc_status: String,
    pub pucc_valid_upto: String,
    pub insurance_status: String,
    pub insurance_company: String,
    pub insurance_valid_upto: String,
    pub fitness_status: String,
    pub fitness_valid_upto: String,
    pub registration_authority: String,
    pub permit_type: String,
    pub blacklist_status: String,
    pub hypothecation: String,
}

impl VehicleRecord {
    /// Fixed record returned by the simulated lookup, whatever was submitted
    pub fn stand_in() -> Self {
        Self {
            registration_number: "MH12AB1234".into(),
            owner_name: "Rajesh Kumar Sharma".into(),
            father_name: "Mahesh Sharma".into(),
            vehicle_class: "Motor Car".into(),
            fuel_type: "Petrol".into(),
            manufacturer: "Maruti Suzuki".into(),
            model: "Swift VXI".into(),
            registration_date: "2018-07-15".into(),
            engine_number: "K12MN345678".into(),
            chassis_number: "MA3FHEB1S00712345".into(),
            rc_status: "Active".into(),
            vehicle_category: "LMV".into(),
            pucc_status: "Valid".into(),
            pucc_valid_upto: "2025-02-14".into(),
            insurance_status: "Valid".into(),
            insurance_company: "Bajaj Allianz".into(),
            insurance_valid_upto: "2025-06-30".into(),
            fitness_status: "Valid".into(),
            fitness_valid_upto: "2033-07-14".into(),
            registration_authority: "RTO Pune".into(),
            permit_type: "Private".into(),
            blacklist_status: "Not Blacklisted".into(),
            hypothecation: "HDFC Bank".into(),
        }
    }
}

/// Envelope wrapping every registry response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<VehicleRecord>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RegistryResponse {
    pub const SUCCESS: &'static str = "success";

    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case(Self::SUCCESS)
    }
}
