//! Efficient lookup of schema descriptors by entity tokens and properties.
//!
//! [`SchemaDescriptorLookupSet`] groups descriptors first by entity token id
//! and then, for the descriptors ending at a given token chain, by property
//! key id. The property grouping works on *sorted* property key lists so that
//! composite descriptors sharing a prefix share trie nodes.
//!
//! Selection is exact and cheap when the caller knows the complete list of
//! properties on the entity: the trie is walked along the caller's sorted
//! properties and only descriptors whose keys are all present are collected.
//! With a partial list the lookup falls back to a per-property map and
//! over-selects, leaving the caller to verify the rest.
//!
//! # Layout
//!
//! Ids inside `[]` are entity tokens, ids inside `()` are properties.
//!
//! ```text
//! Descriptors
//!   A: [0](4, 7, 3)
//!   B: [0](7, 4)
//!   C: [0](3, 4)
//!   D: [0](3, 4, 7)
//!   E: [1](7)
//!   F: [1](5, 6)
//!   G: [0, 1](3, 4)
//!
//! Trie (optimized path)
//!   [0]
//!      -> (3)
//!         -> (4): C
//!            -> (7): A, D
//!      -> (4)
//!         -> (7): B
//!      -> [1]
//!         -> (3)
//!            -> (4): G
//!   [1]
//!      -> (5)
//!         -> (6): F
//!      -> (7): E
//! ```
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//!
//! use manifoldb_schema::schema::{SchemaDescriptor, SchemaDescriptorLookupSet};
//!
//! let a = SchemaDescriptor::for_label(0, [4, 7, 3]);
//! let b = SchemaDescriptor::for_label(0, [7, 4]);
//!
//! let mut set = SchemaDescriptorLookupSet::new();
//! set.add(a.clone());
//! set.add(b.clone());
//!
//! let mut found = HashSet::new();
//! set.matching_descriptors_for_complete_list_of_properties(&mut found, &[0], &[4, 7]);
//! assert_eq!(found, HashSet::from([b.clone()]));
//!
//! let mut found = HashSet::new();
//! set.matching_descriptors_for_partial_list_of_properties(&mut found, &[0], &[3]);
//! assert_eq!(found, HashSet::from([a]));
//! ```

mod entity;
mod property;

#[cfg(test)]
mod proptest_tests;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use tracing::trace;

use self::entity::EntityMultiSet;
use self::property::PropertyMultiSet;
use super::SchemaDescriptorSupplier;
use crate::types::{EntityTokenId, PropertyKeyId};

/// Collects and provides efficient access to schema descriptors, based on
/// entity token ids and a partial or complete list of property key ids.
///
/// # Thread Safety
///
/// The set is not synchronized. Mutations take `&mut self`; wrap the set in a
/// lock (e.g. `RwLock`) when it is shared between an index-management writer
/// and concurrent readers.
///
/// # Collections
///
/// The matching methods append into any [`Extend`] collection. A descriptor
/// can be reached through more than one token path when the query tokens
/// overlap several of its chains, so pass a `HashSet` when duplicates matter.
pub struct SchemaDescriptorLookupSet<T> {
    by_first_entity_token: HashMap<EntityTokenId, EntityMultiSet<T>>,
    /// Every token referenced by any descriptor. Only used for membership
    /// checks, so a flat set suffices.
    by_any_entity_token: HashMap<EntityTokenId, HashSet<T>>,
    len: usize,
}

impl<T> Default for SchemaDescriptorLookupSet<T> {
    fn default() -> Self {
        Self { by_first_entity_token: HashMap::new(), by_any_entity_token: HashMap::new(), len: 0 }
    }
}

impl<T> fmt::Debug for SchemaDescriptorLookupSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDescriptorLookupSet")
            .field("len", &self.len)
            .field("entity_tokens", &self.by_any_entity_token.len())
            .finish_non_exhaustive()
    }
}

impl<T> SchemaDescriptorLookupSet<T>
where
    T: SchemaDescriptorSupplier + Clone + Eq + Hash,
{
    /// Create a new empty lookup set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the set holds no descriptors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_first_entity_token.is_empty()
    }

    /// Number of descriptors in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Adds a descriptor.
    ///
    /// Returns `false`, leaving the set unchanged, if the descriptor is
    /// already present or has no entity tokens.
    ///
    /// The descriptor's entity token ids must be ascending; this is checked
    /// in debug builds only.
    pub fn add(&mut self, descriptor: T) -> bool {
        let entity_token_ids = descriptor.schema().entity_token_ids();
        let Some((&first, rest)) = entity_token_ids.split_first() else {
            return false;
        };
        debug_assert!(
            entity_token_ids.windows(2).all(|pair| pair[0] < pair[1]),
            "entity token ids must be strictly ascending: {entity_token_ids:?}"
        );
        if self.by_any_entity_token.get(&first).is_some_and(|set| set.contains(&descriptor)) {
            return false;
        }
        trace!(
            entity_tokens = ?entity_token_ids,
            properties = ?descriptor.schema().property_ids(),
            "adding schema descriptor"
        );

        self.by_first_entity_token.entry(first).or_default().add(&descriptor, rest);
        for &token_id in entity_token_ids {
            self.by_any_entity_token.entry(token_id).or_default().insert(descriptor.clone());
        }
        self.len += 1;
        true
    }

    /// Removes a descriptor, pruning every node it leaves empty.
    ///
    /// Returns `false` if the descriptor was not present, in which case the
    /// set is left untouched.
    pub fn remove(&mut self, descriptor: &T) -> bool {
        let entity_token_ids = descriptor.schema().entity_token_ids();
        let Some((&first, rest)) = entity_token_ids.split_first() else {
            return false;
        };
        if !self.by_any_entity_token.get(&first).is_some_and(|set| set.contains(descriptor)) {
            return false;
        }
        trace!(
            entity_tokens = ?entity_token_ids,
            properties = ?descriptor.schema().property_ids(),
            "removing schema descriptor"
        );

        if self.by_first_entity_token.get_mut(&first).is_some_and(|set| set.remove(descriptor, rest))
        {
            self.by_first_entity_token.remove(&first);
        }
        for token_id in entity_token_ids {
            if let Some(any) = self.by_any_entity_token.get_mut(token_id) {
                any.remove(descriptor);
                if any.is_empty() {
                    self.by_any_entity_token.remove(token_id);
                }
            }
        }
        self.len -= 1;
        true
    }

    /// Check if any descriptor reachable from `entity_token_ids` references
    /// `property_key`.
    ///
    /// A descriptor is reachable when its token list is a subsequence of
    /// `entity_token_ids`.
    #[must_use]
    pub fn has(&self, entity_token_ids: &[EntityTokenId], property_key: PropertyKeyId) -> bool {
        if self.by_first_entity_token.is_empty() {
            return false;
        }
        let references_key = |set: &PropertyMultiSet<T>| set.has(property_key);
        entity_token_ids.iter().enumerate().any(|(i, token_id)| {
            self.by_first_entity_token
                .get(token_id)
                .is_some_and(|first| first.any_reachable(&entity_token_ids[i + 1..], &references_key))
        })
    }

    /// Check if any descriptor references `entity_token_id`, regardless of
    /// its position in the descriptor's token list or of properties.
    #[must_use]
    pub fn has_entity_token(&self, entity_token_id: EntityTokenId) -> bool {
        self.by_any_entity_token.contains_key(&entity_token_id)
    }

    /// Collects descriptors fully covered by an entity having the tokens
    /// `entity_token_ids` and exactly the properties `sorted_properties`.
    ///
    /// A descriptor matches iff its tokens are a subsequence of
    /// `entity_token_ids` and its sorted property keys are a subsequence of
    /// `sorted_properties`. Both query slices must be ascending.
    pub fn matching_descriptors_for_complete_list_of_properties<C>(
        &self,
        into: &mut C,
        entity_token_ids: &[EntityTokenId],
        sorted_properties: &[PropertyKeyId],
    ) where
        C: Extend<T>,
    {
        debug_assert!(
            sorted_properties.windows(2).all(|pair| pair[0] <= pair[1]),
            "properties must be sorted: {sorted_properties:?}"
        );
        self.for_each_reachable(entity_token_ids, |set| {
            set.collect_for_complete_list_of_properties(into, sorted_properties);
        });
    }

    /// Collects descriptors reachable from `entity_token_ids` that reference
    /// at least one of `properties`.
    ///
    /// This over-selects: composite descriptors are returned even when some
    /// of their other properties are not in `properties`, so the caller has
    /// to verify the result against the entity.
    pub fn matching_descriptors_for_partial_list_of_properties<C>(
        &self,
        into: &mut C,
        entity_token_ids: &[EntityTokenId],
        properties: &[PropertyKeyId],
    ) where
        C: Extend<T>,
    {
        self.for_each_reachable(entity_token_ids, |set| {
            set.collect_for_partial_list_of_properties(into, properties);
        });
    }

    /// Collects every descriptor reachable from `entity_token_ids`,
    /// regardless of properties.
    pub fn matching_descriptors<C>(&self, into: &mut C, entity_token_ids: &[EntityTokenId])
    where
        C: Extend<T>,
    {
        self.for_each_reachable(entity_token_ids, |set| set.collect_all(into));
    }

    fn for_each_reachable<'a, F>(&'a self, entity_token_ids: &[EntityTokenId], mut visit: F)
    where
        F: FnMut(&'a PropertyMultiSet<T>),
    {
        for (i, token_id) in entity_token_ids.iter().enumerate() {
            if let Some(first) = self.by_first_entity_token.get(token_id) {
                first.for_each_reachable(&entity_token_ids[i + 1..], &mut visit);
            }
        }
    }

    /// Asserts that no node in the structure is empty.
    #[cfg(test)]
    pub(crate) fn assert_pruned(&self) {
        for set in self.by_first_entity_token.values() {
            set.assert_pruned();
        }
        for descriptors in self.by_any_entity_token.values() {
            assert!(!descriptors.is_empty(), "empty entity token entry retained");
        }
        assert_eq!(self.is_empty(), self.len == 0);
        assert_eq!(self.by_first_entity_token.is_empty(), self.by_any_entity_token.is_empty());
    }
}
