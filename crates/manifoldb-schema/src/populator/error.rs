//! Error types for index population.

use thiserror::Error;

use crate::types::{EntityId, Value};

/// Two entities were found with the same value in a uniqueness-enforcing index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntryConflict {
    /// The entity already holding the value.
    pub existing: EntityId,
    /// The entity that tried to add it.
    pub added: EntityId,
    /// The conflicting property value(s).
    pub values: Vec<Value>,
}

impl std::fmt::Display for IndexEntryConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "entities {} and {} share the value (",
            self.existing.as_u64(),
            self.added.as_u64()
        )?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, ")")
    }
}

/// Errors that can occur while populating an index.
#[derive(Debug, Error)]
pub enum PopulatorError {
    /// An I/O error occurred in the underlying index.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A uniqueness constraint was violated.
    #[error("index entry conflict: {0}")]
    EntryConflict(IndexEntryConflict),

    /// The populator failed for another reason.
    #[error("population failed: {0}")]
    Failed(String),

    /// Both halves of a combined populator failed to close.
    #[error("both populators failed to close: boost: {boost}; fallback: {fallback}")]
    Combined {
        /// Failure of the boost (primary) populator.
        boost: Box<PopulatorError>,
        /// Failure of the fallback populator.
        fallback: Box<PopulatorError>,
    },
}

impl PopulatorError {
    /// Create a generic population failure.
    #[must_use]
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    /// Returns `true` if this is, or wraps, an I/O error.
    #[must_use]
    pub fn is_io(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Combined { boost, fallback } => boost.is_io() || fallback.is_io(),
            _ => false,
        }
    }

    /// Returns `true` if this is, or wraps, a constraint violation.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::EntryConflict(_) => true,
            Self::Combined { boost, fallback } => boost.is_conflict() || fallback.is_conflict(),
            _ => false,
        }
    }
}

impl From<IndexEntryConflict> for PopulatorError {
    fn from(conflict: IndexEntryConflict) -> Self {
        Self::EntryConflict(conflict)
    }
}

/// Result type for populator operations.
pub type PopulatorResult<T> = Result<T, PopulatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let conflict = IndexEntryConflict {
            existing: EntityId::new(1),
            added: EntityId::new(2),
            values: vec![Value::Int(7), Value::from("x")],
        };
        assert_eq!(
            PopulatorError::from(conflict).to_string(),
            "index entry conflict: entities 1 and 2 share the value (7, \"x\")"
        );
        assert_eq!(PopulatorError::failed("boom").to_string(), "population failed: boom");
    }

    #[test]
    fn combined_reports_both() {
        let err = PopulatorError::Combined {
            boost: Box::new(std::io::Error::other("disk").into()),
            fallback: Box::new(PopulatorError::failed("locked")),
        };
        assert!(err.is_io());
        assert!(!err.is_conflict());
        let msg = err.to_string();
        assert!(msg.contains("disk"));
        assert!(msg.contains("locked"));
    }
}
