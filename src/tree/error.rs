use std::fmt;

/// Error returned by [`deep_clone`](super::deep_clone).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneError {
    /// The tree contains a function.
    Function,
    /// The tree contains a value of a type that cannot be copied.
    Unsupported(String),
}

impl fmt::Display for CloneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloneError::Function => write!(f, "cannot clone functions"),
            CloneError::Unsupported(type_name) => {
                write!(f, "cannot clone type \"{}\"", type_name)
            }
        }
    }
}

impl std::error::Error for CloneError {}
