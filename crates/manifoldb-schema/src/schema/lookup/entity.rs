//! Entity token level of the lookup structure.

use std::collections::HashMap;
use std::hash::Hash;

use super::property::PropertyMultiSet;
use crate::schema::SchemaDescriptorSupplier;
use crate::types::EntityTokenId;

/// One node of the entity token trie.
///
/// Descriptors whose token list ends at this node live in `property_multi_set`;
/// descriptors spanning further tokens live below `next`.
pub(super) struct EntityMultiSet<T> {
    property_multi_set: PropertyMultiSet<T>,
    next: HashMap<EntityTokenId, EntityMultiSet<T>>,
}

impl<T> Default for EntityMultiSet<T> {
    fn default() -> Self {
        Self { property_multi_set: PropertyMultiSet::default(), next: HashMap::new() }
    }
}

impl<T> EntityMultiSet<T>
where
    T: SchemaDescriptorSupplier + Clone + Eq + Hash,
{
    /// `rest` is the descriptor's token ids following the one this node is keyed by.
    pub(super) fn add(&mut self, descriptor: &T, rest: &[EntityTokenId]) {
        match rest.split_first() {
            None => self.property_multi_set.add(descriptor),
            Some((&next_token_id, rest)) => {
                self.next.entry(next_token_id).or_default().add(descriptor, rest);
            }
        }
    }

    /// Returns `true` if this node and all of its children ended up empty.
    pub(super) fn remove(&mut self, descriptor: &T, rest: &[EntityTokenId]) -> bool {
        match rest.split_first() {
            None => {
                self.property_multi_set.remove(descriptor);
            }
            Some((&next_token_id, rest)) => {
                if self.next.get_mut(&next_token_id).is_some_and(|set| set.remove(descriptor, rest))
                {
                    self.next.remove(&next_token_id);
                }
            }
        }
        self.is_empty()
    }

    /// Visits the property multi-set of this node and of every descendant
    /// reachable through `remaining`, the query tokens after the one this node
    /// matched. Tokens may be skipped, so any ascending subsequence is a path.
    pub(super) fn for_each_reachable<'a, F>(&'a self, remaining: &[EntityTokenId], visit: &mut F)
    where
        F: FnMut(&'a PropertyMultiSet<T>),
    {
        visit(&self.property_multi_set);
        if self.next.is_empty() {
            return;
        }
        for (i, token_id) in remaining.iter().enumerate() {
            if let Some(next) = self.next.get(token_id) {
                next.for_each_reachable(&remaining[i + 1..], visit);
            }
        }
    }

    /// Like [`Self::for_each_reachable`] but stops at the first property
    /// multi-set satisfying `predicate`.
    pub(super) fn any_reachable<P>(&self, remaining: &[EntityTokenId], predicate: &P) -> bool
    where
        P: Fn(&PropertyMultiSet<T>) -> bool,
    {
        if predicate(&self.property_multi_set) {
            return true;
        }
        remaining.iter().enumerate().any(|(i, token_id)| {
            self.next
                .get(token_id)
                .is_some_and(|next| next.any_reachable(&remaining[i + 1..], predicate))
        })
    }

    fn is_empty(&self) -> bool {
        self.property_multi_set.is_empty() && self.next.is_empty()
    }

    #[cfg(test)]
    pub(super) fn assert_pruned(&self) {
        assert!(!self.is_empty(), "empty entity chain retained");
        self.property_multi_set.assert_pruned();
        for set in self.next.values() {
            set.assert_pruned();
        }
    }
}
