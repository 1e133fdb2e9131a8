//! Index population.
//!
//! This module defines the [`IndexPopulator`] lifecycle that physical index
//! implementations follow while an index is being built, and
//! [`CombinedIndexPopulator`], which presents two populators as one: a
//! "boost" populator specialised for some value kinds (numbers, by default)
//! and a general "fallback" populator for everything else.
//!
//! # Lifecycle
//!
//! ```text
//! create -> add* -> verify_deferred_constraints -> close(true)
//!             \-> mark_as_failed -> close(false)
//! ```
//!
//! `drop_index` may be called at any point to discard the index.
//!
//! # Example
//!
//! ```
//! use manifoldb_schema::populator::{select, RoutingConfig, Slot};
//! use manifoldb_schema::types::Value;
//!
//! let config = RoutingConfig::default();
//! assert_eq!(select(&[Value::Int(1)], &config), Slot::Boost);
//! assert_eq!(select(&[Value::from("a")], &config), Slot::Fallback);
//! assert_eq!(select(&[Value::Int(1), Value::Int(2)], &config), Slot::Fallback);
//! ```

mod combined;
mod config;
mod error;

pub use combined::{select, CombinedIndexPopulator, Slot};
pub use config::RoutingConfig;
pub use error::{IndexEntryConflict, PopulatorError, PopulatorResult};

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, PropertyKeyId, Value};

/// A property value change to apply to an index being populated.
///
/// Holds one value for single-property indexes and one value per property,
/// in schema order, for composite indexes.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntryUpdate {
    entity_id: EntityId,
    values: Vec<Value>,
}

impl IndexEntryUpdate {
    /// An entity gaining the given value(s).
    #[must_use]
    pub fn add(entity_id: EntityId, values: impl Into<Vec<Value>>) -> Self {
        Self { entity_id, values: values.into() }
    }

    /// The entity the update belongs to.
    #[inline]
    #[must_use]
    pub const fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// The indexed value(s).
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Check if the update carries more than one value.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.values.len() > 1
    }
}

/// Statistics gathered while sampling an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexSample {
    /// Number of entries in the index.
    pub index_size: u64,
    /// Number of distinct values seen in the sample.
    pub unique_values: u64,
    /// Number of entries sampled.
    pub sample_size: u64,
}

impl IndexSample {
    /// Create a new sample.
    #[must_use]
    pub const fn new(index_size: u64, unique_values: u64, sample_size: u64) -> Self {
        Self { index_size, unique_values, sample_size }
    }

    /// Sum of two samples taken over disjoint parts of one logical index.
    /// Saturates at `u64::MAX`.
    #[must_use]
    pub const fn combine(self, other: Self) -> Self {
        Self {
            index_size: self.index_size.saturating_add(other.index_size),
            unique_values: self.unique_values.saturating_add(other.unique_values),
            sample_size: self.sample_size.saturating_add(other.sample_size),
        }
    }
}

/// Read access to committed property values, used to re-check deferred
/// constraints after population.
pub trait PropertyAccessor {
    /// The value of `property_key` on `entity_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`PopulatorError::Io`] if the value cannot be read.
    fn property_value(
        &self,
        entity_id: EntityId,
        property_key: PropertyKeyId,
    ) -> PopulatorResult<Option<Value>>;
}

/// Builds one index from a stream of entity updates.
///
/// Implementations typically hold exclusive file handles or locks between
/// [`create`](Self::create) and [`close`](Self::close).
pub trait IndexPopulator {
    /// Prepare empty storage for the index.
    ///
    /// # Errors
    ///
    /// Returns [`PopulatorError::Io`] if the storage cannot be created.
    fn create(&mut self) -> PopulatorResult<()>;

    /// Discard the index and anything written so far.
    ///
    /// # Errors
    ///
    /// Returns [`PopulatorError::Io`] if the storage cannot be removed.
    fn drop_index(&mut self) -> PopulatorResult<()>;

    /// Apply a batch of updates.
    ///
    /// # Errors
    ///
    /// Returns [`PopulatorError::EntryConflict`] if an eagerly checked
    /// constraint is violated, or [`PopulatorError::Io`] on write failure.
    fn add(&mut self, updates: &[IndexEntryUpdate]) -> PopulatorResult<()>;

    /// Check constraints whose verification was deferred until population
    /// completed.
    ///
    /// # Errors
    ///
    /// Returns [`PopulatorError::EntryConflict`] on the first violation.
    fn verify_deferred_constraints(&mut self, accessor: &dyn PropertyAccessor)
        -> PopulatorResult<()>;

    /// Release all resources, marking the index online if
    /// `populated_successfully`.
    ///
    /// # Errors
    ///
    /// Returns [`PopulatorError::Io`] if flushing or releasing fails.
    fn close(&mut self, populated_successfully: bool) -> PopulatorResult<()>;

    /// Record why population failed.
    ///
    /// # Errors
    ///
    /// Returns [`PopulatorError::Io`] if the failure cannot be persisted.
    fn mark_as_failed(&mut self, failure: &str) -> PopulatorResult<()>;

    /// Feed an update to the sampler.
    fn include_sample(&mut self, update: &IndexEntryUpdate);

    /// Reset sampling; `only_unique` when the index is known to hold unique values.
    fn configure_sampling(&mut self, only_unique: bool);

    /// Sample gathered since the last [`configure_sampling`](Self::configure_sampling).
    fn sample_result(&mut self) -> IndexSample;
}

impl<P: IndexPopulator + ?Sized> IndexPopulator for Box<P> {
    fn create(&mut self) -> PopulatorResult<()> {
        (**self).create()
    }

    fn drop_index(&mut self) -> PopulatorResult<()> {
        (**self).drop_index()
    }

    fn add(&mut self, updates: &[IndexEntryUpdate]) -> PopulatorResult<()> {
        (**self).add(updates)
    }

    fn verify_deferred_constraints(
        &mut self,
        accessor: &dyn PropertyAccessor,
    ) -> PopulatorResult<()> {
        (**self).verify_deferred_constraints(accessor)
    }

    fn close(&mut self, populated_successfully: bool) -> PopulatorResult<()> {
        (**self).close(populated_successfully)
    }

    fn mark_as_failed(&mut self, failure: &str) -> PopulatorResult<()> {
        (**self).mark_as_failed(failure)
    }

    fn include_sample(&mut self, update: &IndexEntryUpdate) {
        (**self).include_sample(update);
    }

    fn configure_sampling(&mut self, only_unique: bool) {
        (**self).configure_sampling(only_unique);
    }

    fn sample_result(&mut self) -> IndexSample {
        (**self).sample_result()
    }
}
