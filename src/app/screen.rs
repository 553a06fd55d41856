//! Add-vehicle screen
//!
//! Composes the orientation watcher with the lookup flow. The flow controller
//! exists only while the environment allows interaction. The gate is
//! reconciled inside the viewport event itself: when it closes the controller
//! is dropped on the spot (releasing any pending lookup), and a fresh one is
//! created when it opens again.

use std::cell::RefCell;
use std::rc::Rc;

use crate::app::controller::LookupFlowController;
use crate::app::navigation::Navigator;
use crate::app::orientation::OrientationWatcher;
use crate::app::state::FetchState;
use crate::config::FlowConfig;
use crate::domain::environment::{EnvironmentClassification, OrientationNotice};
use crate::domain::registration::RegistrationError;
use crate::lookup::{SimulatedLookup, VehicleLookup};
use crate::platform::environment::EnvironmentSource;
use crate::platform::timer::TimerQueue;

/// What the presentation layer should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenView {
    /// Rotate / use-mobile notice instead of the form
    Gated(OrientationNotice),
    /// The registration form
    Interactive(FormView),
}

/// Presentation snapshot of the registration form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub display: String,
    pub state: FetchState,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub validation_error: Option<RegistrationError>,
}

/// Collaborators every flow instance is built from
struct FlowParts {
    lookup: Rc<dyn VehicleLookup>,
    navigator: Rc<dyn Navigator>,
    timers: TimerQueue,
    config: FlowConfig,
}

impl FlowParts {
    fn build(&self) -> LookupFlowController {
        LookupFlowController::new(
            Rc::clone(&self.lookup),
            Rc::clone(&self.navigator),
            self.timers.clone(),
            &self.config,
        )
    }
}

type FlowSlot = RefCell<Option<LookupFlowController>>;

/// Creates or drops the flow so that it exists exactly while the gate is open
///
/// # Returns
/// true if the gate is open
fn reconcile(slot: &FlowSlot, parts: &FlowParts, classification: EnvironmentClassification) -> bool {
    let allowed = classification.allows_interaction();
    let Ok(mut flow) = slot.try_borrow_mut() else {
        // The flow is mid-call (e.g. its navigator moved the viewport);
        // the next screen access picks the change up.
        tracing::debug!(?classification, "flow busy; gate reconciled on next access");
        return allowed;
    };
    match (allowed, flow.is_some()) {
        (true, false) => {
            tracing::debug!("orientation gate open; flow instantiated");
            *flow = Some(parts.build());
        }
        (false, true) => {
            tracing::debug!(?classification, "orientation gate closed; flow dropped");
            *flow = None;
        }
        _ => {}
    }
    allowed
}

/// One mounted instance of the add-vehicle screen
pub struct AddVehicleScreen {
    watcher: OrientationWatcher,
    parts: Rc<FlowParts>,
    flow: Rc<FlowSlot>,
}

impl AddVehicleScreen {
    /// Mounts the screen: classifies the environment and, if allowed,
    /// instantiates the interactive flow
    ///
    /// The lookup brings its own latency; `config.lookup_delay_ms` only takes
    /// effect through [`mount_simulated`](Self::mount_simulated).
    pub fn mount(
        environment: Rc<dyn EnvironmentSource>,
        lookup: Rc<dyn VehicleLookup>,
        navigator: Rc<dyn Navigator>,
        timers: TimerQueue,
        config: FlowConfig,
    ) -> Self {
        let patterns = config.device_patterns();
        let parts = Rc::new(FlowParts {
            lookup,
            navigator,
            timers,
            config,
        });
        let flow: Rc<FlowSlot> = Rc::new(RefCell::new(None));

        let observer = {
            let parts = Rc::clone(&parts);
            let flow = Rc::clone(&flow);
            Rc::new(move |classification: EnvironmentClassification| {
                reconcile(&flow, &parts, classification);
            })
        };
        let watcher = OrientationWatcher::activate_with_observer(environment, patterns, observer);

        let screen = Self { watcher, parts, flow };
        screen.sync_gate();
        screen
    }

    /// Mounts the screen against the stand-in registry, delayed by
    /// `config.lookup_delay_ms`
    pub fn mount_simulated(
        environment: Rc<dyn EnvironmentSource>,
        navigator: Rc<dyn Navigator>,
        timers: TimerQueue,
        config: FlowConfig,
    ) -> Self {
        let lookup = Rc::new(SimulatedLookup::new(config.lookup_delay()));
        Self::mount(environment, lookup, navigator, timers, config)
    }

    pub fn classification(&self) -> EnvironmentClassification {
        self.watcher.classification()
    }

    /// Reconciles the flow with the latest classification
    ///
    /// Viewport events already do this; calling it again is harmless.
    ///
    /// # Returns
    /// true if the flow is instantiated afterwards
    pub fn sync_gate(&self) -> bool {
        reconcile(&self.flow, &self.parts, self.classification())
    }

    /// Current render decision
    pub fn view(&self) -> ScreenView {
        self.sync_gate();
        match self.flow.borrow().as_ref() {
            Some(flow) => ScreenView::Interactive(FormView {
                display: flow.display(),
                state: flow.state().clone(),
                submit_enabled: flow.submit_enabled(),
                submit_label: flow.submit_label(),
                validation_error: flow.validation_error(),
            }),
            None => ScreenView::Gated(OrientationNotice::for_device(self.classification().device)),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.sync_gate()
    }

    /// Whether a flow controller currently exists
    pub fn has_flow(&self) -> bool {
        self.flow.borrow().is_some()
    }

    /// Runs `action` on the interactive flow, if the gate currently allows it
    pub fn with_flow<R>(&mut self, action: impl FnOnce(&mut LookupFlowController) -> R) -> Option<R> {
        self.sync_gate();
        let mut flow = self.flow.borrow_mut();
        flow.as_mut().map(action)
    }

    /// Forwards a keystroke to the flow; ignored while gated
    pub fn type_text(&mut self, text: &str) -> bool {
        self.with_flow(|flow| flow.type_text(text)).unwrap_or(false)
    }

    pub fn on_input(&mut self, raw: &str) -> bool {
        self.with_flow(|flow| flow.on_input(raw)).unwrap_or(false)
    }

    pub fn submit(&mut self) -> bool {
        self.with_flow(LookupFlowController::submit).unwrap_or(false)
    }

    pub fn retry(&mut self) -> bool {
        self.with_flow(LookupFlowController::retry).unwrap_or(false)
    }

    /// Drives the pending lookup timer, if any
    pub fn poll(&mut self) -> bool {
        self.with_flow(LookupFlowController::poll).unwrap_or(false)
    }

    pub fn fetch_state(&self) -> Option<FetchState> {
        self.sync_gate();
        self.flow.borrow().as_ref().map(|flow| flow.state().clone())
    }
}

impl std::fmt::Debug for AddVehicleScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddVehicleScreen")
            .field("classification", &self.classification())
            .field("flow", &self.flow)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::navigation::Route;
    use crate::domain::environment::Device;
    use crate::platform::clock::ManualClock;
    use crate::platform::environment::SimulatedEnvironment;
    use std::cell::RefCell;
    use std::time::Duration;

    const PHONE: &str = "Mozilla/5.0 (Linux; Android 14) Mobile";
    const LAPTOP: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0)";

    #[derive(Default)]
    struct RecordingNavigator {
        routes: RefCell<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.routes.borrow_mut().push(route);
        }
    }

    struct Fixture {
        env: Rc<SimulatedEnvironment>,
        clock: ManualClock,
        timers: TimerQueue,
        navigator: Rc<RecordingNavigator>,
    }

    impl Fixture {
        fn new(platform: &str, portrait: bool) -> Self {
            let clock = ManualClock::new();
            Self {
                env: Rc::new(SimulatedEnvironment::new(platform, portrait)),
                timers: TimerQueue::new(Rc::new(clock.clone())),
                clock,
                navigator: Rc::new(RecordingNavigator::default()),
            }
        }

        fn mount(&self) -> AddVehicleScreen {
            self.mount_with(FlowConfig::default())
        }

        fn mount_with(&self, config: FlowConfig) -> AddVehicleScreen {
            AddVehicleScreen::mount(
                self.env.clone(),
                Rc::new(SimulatedLookup::default()),
                self.navigator.clone(),
                self.timers.clone(),
                config,
            )
        }
    }

    #[test]
    fn mobile_portrait_renders_form() {
        let fixture = Fixture::new(PHONE, true);
        let screen = fixture.mount();

        assert!(screen.is_interactive());
        match screen.view() {
            ScreenView::Interactive(form) => {
                assert_eq!(form.display, "");
                assert!(form.state.is_idle());
                assert!(!form.submit_enabled);
                assert_eq!(form.submit_label, "Fetch vehicle details");
            }
            other => panic!("expected form, got {other:?}"),
        }
    }

    #[test]
    fn gated_combinations_never_instantiate_flow() {
        for (platform, portrait, device) in [
            (LAPTOP, true, Device::Desktop),
            (LAPTOP, false, Device::Desktop),
            (PHONE, false, Device::Mobile),
        ] {
            let fixture = Fixture::new(platform, portrait);
            let mut screen = fixture.mount();

            assert!(!screen.has_flow());
            assert!(!screen.type_text("MH"));
            assert!(!screen.submit());
            assert_eq!(screen.view(), ScreenView::Gated(OrientationNotice::for_device(device)));
        }
    }

    #[test]
    fn rotating_away_discards_flow_state() {
        let fixture = Fixture::new(PHONE, true);
        let mut screen = fixture.mount();
        screen.type_text("mh12");

        fixture.env.rotate(false);
        assert!(matches!(screen.view(), ScreenView::Gated(_)));

        fixture.env.rotate(true);
        match screen.view() {
            ScreenView::Interactive(form) => assert_eq!(form.display, ""),
            other => panic!("expected form, got {other:?}"),
        }
    }

    #[test]
    fn rotating_away_while_loading_cancels_lookup() {
        let fixture = Fixture::new(PHONE, true);
        let mut screen = fixture.mount();
        screen.on_input("MH 01 47 8830");
        assert!(screen.submit());
        assert_eq!(fixture.timers.pending(), 1);

        fixture.env.rotate(false);
        assert_eq!(fixture.timers.pending(), 0);
        assert!(!screen.poll());

        fixture.clock.advance(Duration::from_secs(3));
        fixture.env.rotate(true);
        assert!(!screen.poll());
        assert!(fixture.navigator.routes.borrow().is_empty());
        assert_eq!(screen.fetch_state(), Some(FetchState::Idle));
    }

    #[test]
    fn completes_and_navigates_to_dashboard() {
        let fixture = Fixture::new(PHONE, true);
        let mut screen = fixture.mount();
        screen.on_input("mh0147 8830");
        assert!(screen.submit());

        fixture.clock.advance(Duration::from_millis(2000));
        assert!(screen.poll());
        assert!(matches!(screen.fetch_state(), Some(FetchState::Completed(_))));
        assert_eq!(*fixture.navigator.routes.borrow(), vec![Route::Dashboard]);
    }

    #[test]
    fn unmount_releases_listener_and_timer() {
        let fixture = Fixture::new(PHONE, true);
        let mut screen = fixture.mount();
        screen.on_input("DL1C1234");
        screen.submit();
        assert_eq!(fixture.env.listener_count(), 1);

        drop(screen);
        assert_eq!(fixture.env.listener_count(), 0);
        assert_eq!(fixture.timers.pending(), 0);
        fixture.env.rotate(false);
    }

    #[test]
    fn closing_the_gate_releases_lookup_within_the_event() {
        let fixture = Fixture::new(PHONE, true);
        let mut screen = fixture.mount();
        screen.on_input("MH 01 47 8830");
        assert!(screen.submit());
        assert_eq!(fixture.timers.time_until_next(), Some(Duration::from_secs(2)));

        fixture.env.rotate(false);
        assert_eq!(fixture.timers.pending(), 0);
        assert_eq!(fixture.timers.time_until_next(), None);
        assert!(!screen.has_flow());

        fixture.env.rotate(true);
        assert!(screen.has_flow());
        assert_eq!(fixture.timers.pending(), 0);
    }

    #[test]
    fn strict_mode_refuses_partial_plates() {
        let fixture = Fixture::new(PHONE, true);
        let mut screen = fixture.mount_with(FlowConfig {
            strict_validation: true,
            ..FlowConfig::default()
        });

        for partial in ["MH12", "KA 01", "MH 12 3"] {
            assert!(screen.on_input(partial));
            match screen.view() {
                ScreenView::Interactive(form) => {
                    assert!(!form.submit_enabled, "{partial}");
                    assert!(form.validation_error.is_some(), "{partial}");
                }
                other => panic!("expected form, got {other:?}"),
            }
            assert!(!screen.submit(), "{partial}");
        }
        assert_eq!(fixture.timers.pending(), 0);
    }

    #[test]
    fn simulated_mount_uses_configured_delay() {
        let fixture = Fixture::new(PHONE, true);
        let config = FlowConfig::from_toml_str("lookup_delay_ms = 500").unwrap();
        let mut screen = AddVehicleScreen::mount_simulated(
            fixture.env.clone(),
            fixture.navigator.clone(),
            fixture.timers.clone(),
            config,
        );
        screen.on_input("DL1C1234");
        assert!(screen.submit());
        assert_eq!(fixture.timers.time_until_next(), Some(Duration::from_millis(500)));

        fixture.clock.advance(Duration::from_millis(500));
        assert!(screen.poll());
        assert_eq!(*fixture.navigator.routes.borrow(), vec![Route::Dashboard]);
    }

    struct RotatingNavigator {
        env: Rc<SimulatedEnvironment>,
    }

    impl Navigator for RotatingNavigator {
        fn navigate(&self, _: Route) {
            self.env.rotate(false);
        }
    }

    #[test]
    fn viewport_event_during_flow_call_is_picked_up_later() {
        let fixture = Fixture::new(PHONE, true);
        let mut screen = AddVehicleScreen::mount(
            fixture.env.clone(),
            Rc::new(SimulatedLookup::new(Duration::ZERO)),
            Rc::new(RotatingNavigator {
                env: fixture.env.clone(),
            }),
            fixture.timers.clone(),
            FlowConfig::default(),
        );
        screen.on_input("DL1C1234");
        assert!(screen.submit());

        assert!(screen.poll());
        assert!(screen.has_flow());
        assert!(matches!(screen.view(), ScreenView::Gated(_)));
        assert!(!screen.has_flow());
    }
}
