//! A populator backed by a boost and a fallback populator.

use tracing::{debug, warn};

use super::{
    IndexEntryUpdate, IndexPopulator, IndexSample, PopulatorError, PopulatorResult,
    PropertyAccessor, RoutingConfig,
};
use crate::types::Value;

/// Which half of a [`CombinedIndexPopulator`] an update goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The populator specialised for the configured value kinds.
    Boost,
    /// The general purpose populator.
    Fallback,
}

/// Decide where an update carrying `values` is routed.
///
/// Exactly one value of a primary-capable kind goes to [`Slot::Boost`];
/// everything else, including every composite update, goes to
/// [`Slot::Fallback`].
#[must_use]
pub fn select(values: &[Value], config: &RoutingConfig) -> Slot {
    match values {
        [single] if config.is_primary_capable(single.kind()) => Slot::Boost,
        _ => Slot::Fallback,
    }
}

/// Presents two populators as one index.
///
/// Updates are routed to exactly one of the two (see [`select`]). Lifecycle
/// calls go to both, boost first. All of them fail fast except
/// [`close`](IndexPopulator::close), which always closes both populators so
/// that neither leaks its resources when the other fails.
#[derive(Debug)]
pub struct CombinedIndexPopulator<B, F> {
    boost: B,
    fallback: F,
    config: RoutingConfig,
}

impl<B, F> CombinedIndexPopulator<B, F>
where
    B: IndexPopulator,
    F: IndexPopulator,
{
    /// Combine two populators, routing numbers to `boost`.
    #[must_use]
    pub fn new(boost: B, fallback: F) -> Self {
        Self::with_config(boost, fallback, RoutingConfig::default())
    }

    /// Combine two populators with explicit routing.
    #[must_use]
    pub fn with_config(boost: B, fallback: F, config: RoutingConfig) -> Self {
        Self { boost, fallback, config }
    }

    /// The routing in effect.
    #[must_use]
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// The boost populator.
    #[must_use]
    pub fn boost(&self) -> &B {
        &self.boost
    }

    /// The fallback populator.
    #[must_use]
    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    /// Split back into the boost and fallback populators.
    #[must_use]
    pub fn into_parts(self) -> (B, F) {
        (self.boost, self.fallback)
    }

    fn slot_of(&self, update: &IndexEntryUpdate) -> Slot {
        select(update.values(), &self.config)
    }
}

impl<B, F> IndexPopulator for CombinedIndexPopulator<B, F>
where
    B: IndexPopulator,
    F: IndexPopulator,
{
    fn create(&mut self) -> PopulatorResult<()> {
        debug!("creating combined index");
        self.boost.create()?;
        self.fallback.create()
    }

    fn drop_index(&mut self) -> PopulatorResult<()> {
        debug!("dropping combined index");
        self.boost.drop_index()?;
        self.fallback.drop_index()
    }

    fn add(&mut self, updates: &[IndexEntryUpdate]) -> PopulatorResult<()> {
        let Some(first) = updates.first() else {
            return Ok(());
        };
        let first_slot = self.slot_of(first);
        if updates.iter().all(|update| self.slot_of(update) == first_slot) {
            return match first_slot {
                Slot::Boost => self.boost.add(updates),
                Slot::Fallback => self.fallback.add(updates),
            };
        }

        let (boost_updates, fallback_updates): (Vec<_>, Vec<_>) =
            updates.iter().cloned().partition(|update| self.slot_of(update) == Slot::Boost);
        self.boost.add(&boost_updates)?;
        self.fallback.add(&fallback_updates)
    }

    fn verify_deferred_constraints(
        &mut self,
        accessor: &dyn PropertyAccessor,
    ) -> PopulatorResult<()> {
        self.boost.verify_deferred_constraints(accessor)?;
        self.fallback.verify_deferred_constraints(accessor)
    }

    fn close(&mut self, populated_successfully: bool) -> PopulatorResult<()> {
        debug!(populated_successfully, "closing combined index");
        let boost = self.boost.close(populated_successfully);
        if let Err(err) = &boost {
            warn!(error = %err, "boost populator failed to close");
        }
        let fallback = self.fallback.close(populated_successfully);
        if let Err(err) = &fallback {
            warn!(error = %err, "fallback populator failed to close");
        }

        match (boost, fallback) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
            (Err(boost), Err(fallback)) => {
                Err(PopulatorError::Combined { boost: Box::new(boost), fallback: Box::new(fallback) })
            }
        }
    }

    fn mark_as_failed(&mut self, failure: &str) -> PopulatorResult<()> {
        warn!(failure, "marking combined index as failed");
        self.boost.mark_as_failed(failure)?;
        self.fallback.mark_as_failed(failure)
    }

    fn include_sample(&mut self, update: &IndexEntryUpdate) {
        match self.slot_of(update) {
            Slot::Boost => self.boost.include_sample(update),
            Slot::Fallback => self.fallback.include_sample(update),
        }
    }

    fn configure_sampling(&mut self, only_unique: bool) {
        self.boost.configure_sampling(only_unique);
        self.fallback.configure_sampling(only_unique);
    }

    fn sample_result(&mut self) -> IndexSample {
        self.boost.sample_result().combine(self.fallback.sample_result())
    }
}
