//! Fetch state management
//!
//! Defines the lookup state machine and its transitions. Transitions are pure;
//! timers and navigation are driven by the controller.

use std::time::Instant;

use crate::domain::registration::CanonicalRegistration;
use crate::domain::vehicle::VehicleRecord;
use crate::lookup::LookupError;

/// Lookup progress for one screen instance
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    /// Waiting for the user to submit
    #[default]
    Idle,
    /// A lookup is in flight
    Loading(LoadingState),
    /// The lookup finished; terminal for this screen instance
    Completed(Box<VehicleRecord>),
    /// The lookup failed; `Retry` returns to idle
    Failed(LookupError),
}

impl FetchState {
    pub fn is_idle(&self) -> bool {
        matches!(self, FetchState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading(_))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, FetchState::Completed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchState::Failed(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            FetchState::Idle => "idle",
            FetchState::Loading(_) => "loading",
            FetchState::Completed(_) => "completed",
            FetchState::Failed(_) => "failed",
        }
    }
}

/// Data held while a lookup is in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingState {
    /// Registration the lookup was submitted for
    pub registration: CanonicalRegistration,
    /// When the submission happened
    pub started: Instant,
}

/// Events that drive the fetch state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// User pressed the submit affordance
    Submit {
        registration: CanonicalRegistration,
        at: Instant,
    },
    /// The lookup timer fired and the registry answered
    LookupSucceeded(Box<VehicleRecord>),
    /// The lookup timer fired and the registry failed
    LookupFailed(LookupError),
    /// User asked to try again after a failure
    Retry,
}

/// State machine for lookup transitions
pub struct StateMachine;

impl StateMachine {
    /// Processes an event and returns the new state
    ///
    /// Events that make no sense in the current state leave it unchanged.
    pub fn process_event(current: FetchState, event: FlowEvent) -> FetchState {
        match (current, event) {
            (FetchState::Idle, FlowEvent::Submit { registration, at }) => {
                if registration.is_blank() {
                    FetchState::Idle
                } else {
                    tracing::debug!(%registration, "fetch state: idle -> loading");
                    FetchState::Loading(LoadingState {
                        registration,
                        started: at,
                    })
                }
            }

            (FetchState::Loading(_), FlowEvent::LookupSucceeded(record)) => {
                tracing::debug!("fetch state: loading -> completed");
                FetchState::Completed(record)
            }

            (FetchState::Loading(_), FlowEvent::LookupFailed(error)) => {
                tracing::debug!(%error, "fetch state: loading -> failed");
                FetchState::Failed(error)
            }

            (FetchState::Failed(_), FlowEvent::Retry) => {
                tracing::debug!("fetch state: failed -> idle");
                FetchState::Idle
            }

            // Repeated submits while loading, anything after completion, etc.
            (state, _) => state,
        }
    }
}
