//! Motor Club add-vehicle onboarding core
//!
//! Registration-number formatting and validation, the device/orientation gate
//! that decides whether the onboarding form may render, and the lookup flow
//! that submits a registration, waits for the registry, and hands off to the
//! dashboard.
//!
//! Layers:
//! - [`domain`]: pure logic (formatting, classification, vehicle records)
//! - [`platform`]: clock, timers, and environment signals
//! - [`lookup`]: registry lookup services
//! - [`app`]: fetch state machine, flow controller, and screen composition
//! - [`config`]: flow tunables

pub mod app;
pub mod config;
pub mod domain;
pub mod logging;
pub mod lookup;
pub mod platform;
