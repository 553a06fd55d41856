//! Reactive environment classification
//!
//! [`OrientationWatcher`] classifies the environment once on activation and
//! again, synchronously, on every viewport event while it is alive. Dropping
//! the watcher releases its listener. An optional observer is told about
//! every reclassification from inside the same viewport event.

use std::cell::Cell;
use std::rc::Rc;

use crate::domain::environment::{DevicePatterns, EnvironmentClassification};
use crate::platform::environment::{EnvironmentSource, EnvironmentSubscription, ViewportEvent};

/// Called with the new classification after every viewport event
pub type ClassificationObserver = Rc<dyn Fn(EnvironmentClassification)>;

#[derive(Debug)]
pub struct OrientationWatcher {
    current: Rc<Cell<EnvironmentClassification>>,
    updates: Rc<Cell<u64>>,
    _subscription: EnvironmentSubscription,
}

impl OrientationWatcher {
    /// Classifies immediately and subscribes to viewport changes
    pub fn activate(source: Rc<dyn EnvironmentSource>, patterns: DevicePatterns) -> Self {
        Self::subscribe(source, patterns, None)
    }

    /// Like [`activate`](Self::activate), additionally notifying `observer`
    /// once the watcher has recorded each new classification
    pub fn activate_with_observer(
        source: Rc<dyn EnvironmentSource>,
        patterns: DevicePatterns,
        observer: ClassificationObserver,
    ) -> Self {
        Self::subscribe(source, patterns, Some(observer))
    }

    fn subscribe(
        source: Rc<dyn EnvironmentSource>,
        patterns: DevicePatterns,
        observer: Option<ClassificationObserver>,
    ) -> Self {
        let initial = classify(source.as_ref(), &patterns);
        tracing::debug!(?initial, "environment classified");

        let current = Rc::new(Cell::new(initial));
        let updates = Rc::new(Cell::new(0));

        let slot = Rc::clone(&current);
        let counter = Rc::clone(&updates);
        let reader = Rc::clone(&source);
        let subscription = EnvironmentSubscription::new(
            source,
            Rc::new(move |event: ViewportEvent| {
                let next = classify(reader.as_ref(), &patterns);
                if next != slot.get() {
                    tracing::debug!(?event, ?next, "environment reclassified");
                }
                slot.set(next);
                counter.set(counter.get() + 1);
                if let Some(observer) = &observer {
                    observer(next);
                }
            }),
        );

        Self {
            current,
            updates,
            _subscription: subscription,
        }
    }

    pub fn classification(&self) -> EnvironmentClassification {
        self.current.get()
    }

    /// Number of viewport events processed since activation
    pub fn updates(&self) -> u64 {
        self.updates.get()
    }
}

fn classify(source: &dyn EnvironmentSource, patterns: &DevicePatterns) -> EnvironmentClassification {
    EnvironmentClassification::from_signals(patterns, &source.platform_identifier(), source.is_portrait())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::environment::{Device, Orientation};
    use crate::platform::environment::SimulatedEnvironment;
    use std::cell::RefCell;

    #[test]
    fn classifies_on_activation() {
        let env = Rc::new(SimulatedEnvironment::new("Mozilla/5.0 (iPhone)", true));
        let watcher = OrientationWatcher::activate(env, DevicePatterns::default());

        assert_eq!(
            watcher.classification(),
            EnvironmentClassification::new(Device::Mobile, Orientation::Portrait)
        );
        assert_eq!(watcher.updates(), 0);
    }

    #[test]
    fn follows_rotation_and_resize() {
        let env = Rc::new(SimulatedEnvironment::new("Android", true));
        let watcher = OrientationWatcher::activate(env.clone(), DevicePatterns::default());

        env.rotate(false);
        assert_eq!(watcher.classification().orientation, Orientation::Landscape);

        env.resize(360, 780);
        assert_eq!(watcher.classification().orientation, Orientation::Portrait);
        assert_eq!(watcher.updates(), 2);
    }

    #[test]
    fn device_is_reevaluated_on_events() {
        let env = Rc::new(SimulatedEnvironment::new("Windows NT 10.0", true));
        let watcher = OrientationWatcher::activate(env.clone(), DevicePatterns::default());
        assert_eq!(watcher.classification().device, Device::Desktop);

        env.set_platform_identifier("iPad");
        env.resize(800, 1200);
        assert_eq!(watcher.classification().device, Device::Mobile);
    }

    #[test]
    fn observer_runs_within_the_viewport_event() {
        let env = Rc::new(SimulatedEnvironment::new("iPhone", true));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let watcher = OrientationWatcher::activate_with_observer(
            env.clone(),
            DevicePatterns::default(),
            Rc::new(move |classification: EnvironmentClassification| {
                sink.borrow_mut().push(classification.allows_interaction());
            }),
        );
        assert!(seen.borrow().is_empty());

        env.rotate(false);
        env.rotate(true);
        assert_eq!(*seen.borrow(), vec![false, true]);

        drop(watcher);
        env.rotate(false);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn drop_releases_listener() {
        let env = Rc::new(SimulatedEnvironment::new("Android", true));
        let watcher = OrientationWatcher::activate(env.clone(), DevicePatterns::default());
        assert_eq!(env.listener_count(), 1);

        drop(watcher);
        assert_eq!(env.listener_count(), 0);
        env.rotate(false);
    }
}
