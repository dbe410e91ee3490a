//! Error types for hierarchy construction.
//!
//! Every fatal condition the engine can hit is a structural problem with the
//! input: bad nesting in indented text, a child that is never defined in a
//! relation mapping, or an unusable separator. Each variant carries the
//! offending label so callers can point the user at the exact line or cell.
//!
//! Cycle resolution and level assignment never fail, so they have no error
//! type of their own.

use std::fmt;

/// Machine-readable error codes for callers that branch on failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    IndentJump,
    FirstLineNotAtBase,
    UndefinedChild,
    EmptySeparator,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::IndentJump => "E1001",
            Self::FirstLineNotAtBase => "E1002",
            Self::UndefinedChild => "E2001",
            Self::EmptySeparator => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::IndentJump => "Indentation increases by more than one level",
            Self::FirstLineNotAtBase => "First line is not at the lowest level",
            Self::UndefinedChild => "Narrower concept is not defined",
            Self::EmptySeparator => "Empty indent separator",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::IndentJump => Some("Indent each child exactly one level deeper than its parent."),
            Self::FirstLineNotAtBase => {
                Some("Start the outline with a top-level concept, without indentation.")
            }
            Self::UndefinedChild => {
                Some("Add the concept as its own entry before using it as a child.")
            }
            Self::EmptySeparator => Some("Use at least one character, or no separator at all."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Fatal structural errors raised while building a [`crate::Hierarchy`].
///
/// No partial graph is ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    /// A line is indented more than one level deeper than the line before it.
    #[error("Indentation increases by more than one level for \"{label}\".")]
    IndentJump { label: String },

    /// The first line is deeper than the shallowest line in the text.
    #[error("First line \"{label}\" must be at lowest indentation level.")]
    FirstLineNotAtBase { label: String },

    /// A relation mapping lists a child that is not itself a key.
    #[error("Concept \"{child}\" needs to defined if used as narrower concept.")]
    UndefinedChild { child: String },

    /// A zero-length indent separator was configured.
    #[error("Setting the indent separator to zero length is not allowed.")]
    EmptySeparator,
}

impl HierarchyError {
    /// The machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::IndentJump { .. } => ErrorCode::IndentJump,
            Self::FirstLineNotAtBase { .. } => ErrorCode::FirstLineNotAtBase,
            Self::UndefinedChild { .. } => ErrorCode::UndefinedChild,
            Self::EmptySeparator => ErrorCode::EmptySeparator,
        }
    }

    /// The label that triggered the error, if the error is tied to one.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::IndentJump { label } | Self::FirstLineNotAtBase { label } => Some(label),
            Self::UndefinedChild { child } => Some(child),
            Self::EmptySeparator => None,
        }
    }
}
