//! Environment signal source
//!
//! The core consumes exactly three capabilities from its host: a platform
//! identifier string, an "is portrait" predicate, and a subscription to
//! viewport change events. [`EnvironmentSource`] is that seam;
//! [`SimulatedEnvironment`] is an in-process implementation driven by calls
//! instead of a real viewport.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Viewport change signals delivered to listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
    Resize,
    OrientationChange,
}

/// Callback invoked synchronously for every viewport change
pub type ViewportListener = Rc<dyn Fn(ViewportEvent)>;

/// Handle identifying a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Host capabilities the classifier relies on
pub trait EnvironmentSource {
    /// Device/platform identifier, e.g. a browser user agent
    fn platform_identifier(&self) -> String;

    /// Whether the viewport currently has a portrait layout
    fn is_portrait(&self) -> bool;

    /// Registers a listener for resize and orientation-change events
    fn subscribe(&self, listener: ViewportListener) -> ListenerId;

    /// Removes a listener; unknown ids are ignored
    fn unsubscribe(&self, id: ListenerId);
}

/// RAII registration of a viewport listener
///
/// The listener is removed from the source when the guard is dropped.
pub struct EnvironmentSubscription {
    source: Rc<dyn EnvironmentSource>,
    id: ListenerId,
}

impl EnvironmentSubscription {
    pub fn new(source: Rc<dyn EnvironmentSource>, listener: ViewportListener) -> Self {
        let id = source.subscribe(listener);
        tracing::debug!(?id, "viewport listener registered");
        Self { source, id }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl fmt::Debug for EnvironmentSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentSubscription").field("id", &self.id).finish()
    }
}

impl Drop for EnvironmentSubscription {
    fn drop(&mut self) {
        self.source.unsubscribe(self.id);
        tracing::debug!(id = ?self.id, "viewport listener released");
    }
}

struct SimulatedState {
    platform_identifier: String,
    portrait: bool,
    next_id: u64,
    listeners: BTreeMap<ListenerId, ViewportListener>,
}

/// Environment whose signals are set programmatically
///
/// Used by the terminal driver and by tests. Listeners are invoked
/// synchronously, in registration order, before the mutating call returns.
pub struct SimulatedEnvironment {
    state: RefCell<SimulatedState>,
}

impl SimulatedEnvironment {
    pub fn new(platform_identifier: impl Into<String>, portrait: bool) -> Self {
        Self {
            state: RefCell::new(SimulatedState {
                platform_identifier: platform_identifier.into(),
                portrait,
                next_id: 1,
                listeners: BTreeMap::new(),
            }),
        }
    }

    /// Changes the orientation and emits an orientation-change event
    pub fn rotate(&self, portrait: bool) {
        self.state.borrow_mut().portrait = portrait;
        self.emit(ViewportEvent::OrientationChange);
    }

    /// Changes the aspect ratio and emits a resize event
    pub fn resize(&self, width: u32, height: u32) {
        self.state.borrow_mut().portrait = height >= width;
        self.emit(ViewportEvent::Resize);
    }

    pub fn set_platform_identifier(&self, platform_identifier: impl Into<String>) {
        self.state.borrow_mut().platform_identifier = platform_identifier.into();
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    fn emit(&self, event: ViewportEvent) {
        // Listeners read back through `is_portrait`, so release the borrow first.
        let listeners: Vec<ViewportListener> =
            self.state.borrow().listeners.values().cloned().collect();
        for listener in listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for SimulatedEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SimulatedEnvironment")
            .field("platform_identifier", &state.platform_identifier)
            .field("portrait", &state.portrait)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl EnvironmentSource for SimulatedEnvironment {
    fn platform_identifier(&self) -> String {
        self.state.borrow().platform_identifier.clone()
    }

    fn is_portrait(&self) -> bool {
        self.state.borrow().portrait
    }

    fn subscribe(&self, listener: ViewportListener) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        state.listeners.insert(id, listener);
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.state.borrow_mut().listeners.remove(&id);
    }
}
