//! Title admission rules and the new-task input field.
//!
//! # Responsibility
//! - Decide whether a candidate title may enter the task store.
//! - Hold the pending text of the "new task" entry field.
//!
//! # Invariants
//! - A valid title is non-empty, single-line and has no leading or trailing
//!   whitespace. Internal whitespace is allowed.
//! - Validation never trims or otherwise rewrites the candidate.
//! - "Whitespace" is the ECMAScript set: U+FEFF counts, U+0085 does not.
//!   [`is_title_whitespace`] and the title pattern share that set.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const WHITESPACE_CLASS: &str = r"\t\n\x0B\x0C\r\x20\x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    let visible = format!("[^{WHITESPACE_CLASS}]");
    Regex::new(&format!(
        r"^{visible}(?:[^\n\r\x{{2028}}\x{{2029}}]*{visible})?$"
    ))
    .expect("valid title regex")
});

/// Returns whether `c` is whitespace for title purposes.
pub fn is_title_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Strips leading and trailing title whitespace.
pub fn trim_title(value: &str) -> &str {
    value.trim_matches(is_title_whitespace)
}

/// Reason a candidate title was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleValidationError {
    /// Candidate is the empty string.
    Empty,
    /// Candidate starts or ends with whitespace.
    SurroundingWhitespace,
    /// Candidate spans more than one line.
    LineBreak,
}

impl Display for TitleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "task title must not be empty"),
            Self::SurroundingWhitespace => {
                write!(f, "task title must not start or end with whitespace")
            }
            Self::LineBreak => write!(f, "task title must be a single line"),
        }
    }
}

impl Error for TitleValidationError {}

/// Checks a candidate title for admission through `add`.
pub fn validate_title(candidate: &str) -> Result<(), TitleValidationError> {
    if candidate.is_empty() {
        return Err(TitleValidationError::Empty);
    }
    if TITLE_RE.is_match(candidate) {
        return Ok(());
    }

    let padded = candidate.starts_with(is_title_whitespace)
        || candidate.ends_with(is_title_whitespace);
    if padded {
        Err(TitleValidationError::SurroundingWhitespace)
    } else {
        Err(TitleValidationError::LineBreak)
    }
}

/// Returns whether `candidate` passes [`validate_title`].
pub fn is_valid_title(candidate: &str) -> bool {
    validate_title(candidate).is_ok()
}

/// Pending text of the "new task" entry field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    value: String,
}

impl TaskInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the field text as typed; no trimming.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Validation state shown by the presentation layer.
    pub fn validate(&self) -> Result<(), TitleValidationError> {
        validate_title(&self.value)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
