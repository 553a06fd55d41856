//! Device and orientation classification
//!
//! Pure classification of environment signals into a discrete
//! (device, orientation) pair, plus the render gate derived from it.
//! Device detection is a substring heuristic over the platform identifier;
//! misclassification is accepted and simply shows (or hides) the rotate notice.

/// Platform identifier fragments that mark a mobile device
pub const DEFAULT_MOBILE_IDENTIFIERS: [&str; 8] = [
    "Android",
    "webOS",
    "iPhone",
    "iPad",
    "iPod",
    "BlackBerry",
    "IEMobile",
    "Opera Mini",
];

/// Kind of device the screen runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Mobile,
    Desktop,
}

/// Viewport orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn from_portrait(is_portrait: bool) -> Self {
        if is_portrait {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

/// Case-insensitive allow-list of mobile platform identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePatterns {
    needles: Vec<String>,
}

impl DevicePatterns {
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let needles = identifiers
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { needles }
    }

    /// Returns true if any identifier fragment occurs in `platform_identifier`
    pub fn matches(&self, platform_identifier: &str) -> bool {
        let haystack = platform_identifier.to_lowercase();
        self.needles.iter().any(|needle| haystack.contains(needle.as_str()))
    }

    pub fn classify(&self, platform_identifier: &str) -> Device {
        if self.matches(platform_identifier) {
            Device::Mobile
        } else {
            Device::Desktop
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needles.is_empty()
    }
}

impl Default for DevicePatterns {
    fn default() -> Self {
        Self::new(DEFAULT_MOBILE_IDENTIFIERS)
    }
}

/// Result of classifying the runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvironmentClassification {
    pub device: Device,
    pub orientation: Orientation,
}

impl EnvironmentClassification {
    pub fn new(device: Device, orientation: Orientation) -> Self {
        Self { device, orientation }
    }

    /// Classifies raw environment signals
    pub fn from_signals(patterns: &DevicePatterns, platform_identifier: &str, is_portrait: bool) -> Self {
        Self::new(
            patterns.classify(platform_identifier),
            Orientation::from_portrait(is_portrait),
        )
    }

    /// The interactive flow only renders on a mobile device held upright
    pub fn allows_interaction(&self) -> bool {
        matches!(
            (self.device, self.orientation),
            (Device::Mobile, Orientation::Portrait)
        )
    }

    /// The notice to show instead of the interactive flow, if any
    pub fn gate(&self) -> Option<OrientationNotice> {
        if self.allows_interaction() {
            None
        } else {
            Some(OrientationNotice::for_device(self.device))
        }
    }
}

/// Fallback message rendered while the orientation gate is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationNotice {
    pub device: Device,
}

impl OrientationNotice {
    pub const TITLE: &'static str = "Please rotate your device";

    pub fn for_device(device: Device) -> Self {
        Self { device }
    }

    pub fn title(&self) -> &'static str {
        Self::TITLE
    }

    pub fn message(&self) -> &'static str {
        match self.device {
            Device::Mobile => "For better experience, please use Motor Club in portrait mode.",
            Device::Desktop => "For better experience, please open Motor Club on a mobile device.",
        }
    }
}
