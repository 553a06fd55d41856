//! Lookup flow controller
//!
//! Owns the raw input and the fetch state for one visit to the add-vehicle
//! screen. The controller gates submission, schedules the lookup on the
//! event loop's timer queue, and hands off to the navigator on completion.

use std::fmt;
use std::rc::Rc;

use crate::app::navigation::{Navigator, Route};
use crate::app::state::{FetchState, FlowEvent, StateMachine};
use crate::config::FlowConfig;
use crate::domain::registration::{self, CanonicalRegistration, RegistrationError};
use crate::domain::vehicle::VehicleRecord;
use crate::lookup::VehicleLookup;
use crate::platform::timer::{Timer, TimerQueue};

const SUBMIT_LABEL: &str = "Fetch vehicle details";
const SUBMIT_LABEL_LOADING: &str = "Fetching details...";

/// Controller for a single submission flow
///
/// The pending lookup is held as a [`Timer`] guard, so it is released together
/// with the controller; its completion, and the navigation that would follow,
/// never happen.
pub struct LookupFlowController {
    /// Raw keystrokes, the single source of truth for the display value
    raw: String,
    state: FetchState,
    lookup: Rc<dyn VehicleLookup>,
    navigator: Rc<dyn Navigator>,
    timers: TimerQueue,
    pending: Option<Timer>,
    max_display_len: usize,
    strict_validation: bool,
}

impl LookupFlowController {
    pub fn new(
        lookup: Rc<dyn VehicleLookup>,
        navigator: Rc<dyn Navigator>,
        timers: TimerQueue,
        config: &FlowConfig,
    ) -> Self {
        Self {
            raw: String::new(),
            state: FetchState::Idle,
            lookup,
            navigator,
            timers,
            pending: None,
            max_display_len: config.max_display_len,
            strict_validation: config.strict_validation,
        }
    }

    /// Replaces the raw input with the field's new contents
    ///
    /// # Returns
    /// false if the formatted value would exceed the display cap; the
    /// previous input is kept in that case
    pub fn on_input(&mut self, raw: &str) -> bool {
        let formatted_len = registration::format(raw).chars().count();
        if formatted_len > self.max_display_len {
            tracing::debug!(formatted_len, cap = self.max_display_len, "keystroke rejected");
            return false;
        }
        self.raw.clear();
        self.raw.push_str(raw);
        true
    }

    /// Appends typed text to the current input
    pub fn type_text(&mut self, text: &str) -> bool {
        let next = format!("{}{}", self.raw, text);
        self.on_input(&next)
    }

    /// Removes the last non-whitespace character
    pub fn backspace(&mut self) {
        let trimmed_len = self.raw.trim_end().len();
        self.raw.truncate(trimmed_len);
        self.raw.pop();
    }

    pub fn raw_input(&self) -> &str {
        &self.raw
    }

    /// Canonical registration derived from the current input
    pub fn registration(&self) -> CanonicalRegistration {
        CanonicalRegistration::from_raw(&self.raw)
    }

    /// Display string for the input field
    pub fn display(&self) -> String {
        registration::format(&self.raw)
    }

    /// Grammar problem with the current input, if any
    ///
    /// Blank input is not reported; there is nothing to complain about yet.
    pub fn validation_error(&self) -> Option<RegistrationError> {
        match self.registration().validate() {
            Ok(_) | Err(RegistrationError::Empty) => None,
            Err(error) => Some(error),
        }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Whether the submit affordance should be enabled
    pub fn submit_enabled(&self) -> bool {
        if !self.state.is_idle() {
            return false;
        }
        let registration = self.registration();
        if registration.is_blank() {
            return false;
        }
        !self.strict_validation || registration.validate().is_ok()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.state.is_loading() {
            SUBMIT_LABEL_LOADING
        } else {
            SUBMIT_LABEL
        }
    }

    /// Submits the current input for lookup
    ///
    /// A no-op unless idle with a non-blank registration (and, in strict mode,
    /// a recognized one). At most one lookup is in flight per controller.
    ///
    /// # Returns
    /// true if a lookup was started
    pub fn submit(&mut self) -> bool {
        if !self.submit_enabled() {
            tracing::debug!(state = self.state.name(), "submit ignored");
            return false;
        }

        let registration = self.registration();
        let event = FlowEvent::Submit {
            registration: registration.clone(),
            at: self.timers.now(),
        };
        self.apply(event);

        if self.state.is_loading() {
            self.pending = Some(self.timers.schedule(self.lookup.latency()));
            tracing::info!(%registration, latency = ?self.lookup.latency(), "lookup started");
            true
        } else {
            false
        }
    }

    /// Completes the lookup if its timer has fired
    ///
    /// # Returns
    /// true if the state changed
    pub fn poll(&mut self) -> bool {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|timer| timer.is_due(self.timers.now()));
        if !due {
            return false;
        }
        self.pending = None;

        let FetchState::Loading(loading) = &self.state else {
            return false;
        };
        let registration = loading.registration.clone();

        match self.lookup.fetch(&registration) {
            Ok(record) => {
                tracing::info!(%registration, owner = %record.owner_name, "lookup completed");
                self.apply(FlowEvent::LookupSucceeded(Box::new(record)));
                tracing::info!(route = %Route::Dashboard, "navigating");
                self.navigator.navigate(Route::Dashboard);
            }
            Err(error) => {
                tracing::warn!(%registration, %error, "lookup failed");
                self.apply(FlowEvent::LookupFailed(error));
            }
        }
        true
    }

    /// Returns to idle after a failed lookup
    pub fn retry(&mut self) -> bool {
        if !self.state.is_failed() {
            return false;
        }
        self.apply(FlowEvent::Retry);
        true
    }

    /// Lookup payload once the flow has completed
    pub fn record(&self) -> Option<&VehicleRecord> {
        match &self.state {
            FetchState::Completed(record) => Some(&**record),
            _ => None,
        }
    }

    pub fn has_pending_lookup(&self) -> bool {
        self.pending.is_some()
    }

    fn apply(&mut self, event: FlowEvent) {
        let current = std::mem::take(&mut self.state);
        self.state = StateMachine::process_event(current, event);
    }
}

impl fmt::Debug for LookupFlowController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupFlowController")
            .field("raw", &self.raw)
            .field("state", &self.state)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl Drop for LookupFlowController {
    fn drop(&mut self) {
        if self.pending.is_some() {
            tracing::debug!("flow torn down with a pending lookup; timer released");
        }
    }
}
