//! Registration number normalization and validation
//!
//! This module turns raw keystroke text into the canonical, grouped display
//! form of a vehicle registration number ("MH 01 47 8830"). It is completely
//! pure and testable without any environment.
//!
//! ## Design Principles
//! - **Pure functions**: No I/O, no side effects, callable on every keystroke
//! - **Progressive reveal**: Separators appear only once a group boundary is reached
//! - **Idempotent**: Formatting an already formatted value changes nothing
//! - **Lenient formatting, explicit validation**: Formatting never fails; grammar
//!   checks are a separate step that reports a [`RegistrationError`]

use std::sync::LazyLock;

use regex::Regex;

/// Longest cleaned input that still gets grouped
pub const MAX_GROUPED_LEN: usize = 10;

/// Longest display string produced for a grouped plate (10 characters plus 3 separators)
pub const MAX_GROUPED_DISPLAY_LEN: usize = MAX_GROUPED_LEN + GROUP_BOUNDARIES.len();

/// Cleaned-string indices after which a separator is inserted
const GROUP_BOUNDARIES: [usize; 3] = [2, 4, 6];

const SEPARATOR: char = ' ';

/// State code, district, optional series, four digit number
///
/// A letter series may follow a one or two digit district ("DL 1C 1234",
/// "MH 12 AB 1234"). Without letters the district takes two digits and may be
/// followed by a two digit series ("MH 01 47 8830", "MH 12 4567").
static STANDARD_PLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2}(?:[0-9]{1,2}[A-Z]{1,3}|[0-9]{2}(?:[0-9]{2})?)[0-9]{4}$")
        .expect("standard plate pattern")
});

/// Bharat series: year, "BH", number, series letters: "22 BH 1234 AA"
static BHARAT_PLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}BH[0-9]{4}[A-Z]{1,2}$").expect("bharat plate pattern")
});

/// Validation errors for registration numbers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("Registration number is empty")]
    Empty,
    #[error("Registration number has {len} characters, at most 10 are allowed")]
    TooLong { len: usize },
    #[error("'{value}' does not look like a registration number")]
    UnrecognizedPattern { value: String },
}

/// Recognized registration number grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationKind {
    /// State-issued plate, e.g. "MH 01 47 8830"
    Standard,
    /// Bharat series plate, e.g. "22 BH 1234 AA"
    Bharat,
}

/// Removes every whitespace character and upper-cases the remainder
pub fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Formats raw keystroke text into the grouped display form
///
/// Inputs of up to [`MAX_GROUPED_LEN`] cleaned characters are split into
/// groups of 2, 2, 2 and the remainder. Longer inputs are returned cleaned but
/// ungrouped.
///
/// # Examples
/// ```rust
/// use motorclub_onboard::domain::registration::format;
///
/// assert_eq!(format("mh0147 8830"), "MH 01 47 8830");
/// assert_eq!(format("mh0"), "MH 0");
/// assert_eq!(format("MH12AB12345678"), "MH12AB12345678");
/// ```
pub fn format(raw: &str) -> String {
    let cleaned = clean(raw);
    let len = cleaned.chars().count();
    if len > MAX_GROUPED_LEN {
        return cleaned;
    }

    let mut formatted = String::with_capacity(cleaned.len() + GROUP_BOUNDARIES.len());
    for (index, ch) in cleaned.chars().enumerate() {
        if GROUP_BOUNDARIES.contains(&index) {
            formatted.push(SEPARATOR);
        }
        formatted.push(ch);
    }
    formatted
}

/// A registration number in canonical display form
///
/// Always derived from raw input through [`format`], never edited directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CanonicalRegistration(String);

impl CanonicalRegistration {
    /// Derives the canonical form of raw keystroke text
    pub fn from_raw(raw: &str) -> Self {
        Self(format(raw))
    }

    /// The grouped display string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The registration without separators, as sent to a registry
    pub fn compact(&self) -> String {
        clean(&self.0)
    }

    /// True when there is nothing to submit
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Number of displayed characters, separators included
    pub fn display_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Checks the registration against the known plate grammars
    pub fn validate(&self) -> Result<RegistrationKind, RegistrationError> {
        let compact = self.compact();
        let len = compact.chars().count();

        if len == 0 {
            return Err(RegistrationError::Empty);
        }
        if len > MAX_GROUPED_LEN {
            return Err(RegistrationError::TooLong { len });
        }

        if BHARAT_PLATE.is_match(&compact) {
            Ok(RegistrationKind::Bharat)
        } else if STANDARD_PLATE.is_match(&compact) {
            Ok(RegistrationKind::Standard)
        } else {
            Err(RegistrationError::UnrecognizedPattern { value: self.0.clone() })
        }
    }
}

impl std::fmt::Display for CanonicalRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
