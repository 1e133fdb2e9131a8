//! Property level of the lookup structure.
//!
//! [`PropertyMultiSet`] holds every descriptor whose entity token chain ends
//! at one [`super::entity::EntityMultiSet`] node, indexed two ways:
//!
//! - a trie of [`PropertySet`] nodes over the *sorted* property key ids, used
//!   when the caller knows the complete list of properties, and
//! - a flat map from each property key id to the descriptors referencing it,
//!   used when only some properties are known.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::schema::{SchemaDescriptor, SchemaDescriptorSupplier};
use crate::types::PropertyKeyId;

pub(super) struct PropertyMultiSet<T> {
    descriptors: HashSet<T>,
    next: HashMap<PropertyKeyId, PropertySet<T>>,
    by_any_property: HashMap<PropertyKeyId, HashSet<T>>,
}

impl<T> Default for PropertyMultiSet<T> {
    fn default() -> Self {
        Self { descriptors: HashSet::new(), next: HashMap::new(), by_any_property: HashMap::new() }
    }
}

impl<T> PropertyMultiSet<T>
where
    T: SchemaDescriptorSupplier + Clone + Eq + Hash,
{
    pub(super) fn add(&mut self, descriptor: &T) {
        let property_key_ids = sorted_property_key_ids(descriptor.schema());

        // Optimized path for when the property list is fully known
        if let Some((&first, rest)) = property_key_ids.split_first() {
            self.next.entry(first).or_default().add(descriptor, rest);
        }

        // Fall-back path for when the property list is only partly known
        for &key_id in property_key_ids.iter() {
            self.by_any_property.entry(key_id).or_default().insert(descriptor.clone());
        }
        self.descriptors.insert(descriptor.clone());
    }

    /// Returns `true` if this multi-set ended up empty after the removal.
    pub(super) fn remove(&mut self, descriptor: &T) -> bool {
        self.descriptors.remove(descriptor);
        let property_key_ids = sorted_property_key_ids(descriptor.schema());

        if let Some((&first, rest)) = property_key_ids.split_first() {
            if self.next.get_mut(&first).is_some_and(|set| set.remove(descriptor, rest)) {
                self.next.remove(&first);
            }
        }

        for key_id in property_key_ids.iter() {
            if let Some(by_property) = self.by_any_property.get_mut(key_id) {
                by_property.remove(descriptor);
                if by_property.is_empty() {
                    self.by_any_property.remove(key_id);
                }
            }
        }
        self.is_empty()
    }

    /// Collects descriptors whose sorted property keys are a subsequence of
    /// `sorted_properties`.
    pub(super) fn collect_for_complete_list_of_properties<C>(
        &self,
        into: &mut C,
        sorted_properties: &[PropertyKeyId],
    ) where
        C: Extend<T>,
    {
        for (i, key_id) in sorted_properties.iter().enumerate() {
            if let Some(first) = self.next.get(key_id) {
                first.collect_for_complete_list_of_properties(into, &sorted_properties[i + 1..]);
            }
        }
    }

    /// Collects every descriptor referencing any of `properties`. Over-selects:
    /// a composite descriptor is returned even if its other keys are unknown.
    pub(super) fn collect_for_partial_list_of_properties<C>(
        &self,
        into: &mut C,
        properties: &[PropertyKeyId],
    ) where
        C: Extend<T>,
    {
        for key_id in properties {
            if let Some(descriptors) = self.by_any_property.get(key_id) {
                into.extend(descriptors.iter().cloned());
            }
        }
    }

    pub(super) fn collect_all<C>(&self, into: &mut C)
    where
        C: Extend<T>,
    {
        into.extend(self.descriptors.iter().cloned());
    }

    pub(super) fn has(&self, property_key: PropertyKeyId) -> bool {
        self.by_any_property.contains_key(&property_key)
    }

    pub(super) fn is_empty(&self) -> bool {
        self.descriptors.is_empty() && self.next.is_empty() && self.by_any_property.is_empty()
    }

    #[cfg(test)]
    pub(super) fn assert_pruned(&self) {
        for (key_id, set) in &self.next {
            assert!(!set.is_empty(), "empty property chain retained at ({key_id})");
            set.assert_pruned();
        }
        for (key_id, descriptors) in &self.by_any_property {
            assert!(!descriptors.is_empty(), "empty fallback entry retained for ({key_id})");
        }
    }
}

/// One node of the sorted property key trie.
pub(super) struct PropertySet<T> {
    full_descriptors: HashSet<T>,
    next: HashMap<PropertyKeyId, PropertySet<T>>,
}

impl<T> Default for PropertySet<T> {
    fn default() -> Self {
        Self { full_descriptors: HashSet::new(), next: HashMap::new() }
    }
}

impl<T> PropertySet<T>
where
    T: Clone + Eq + Hash,
{
    /// `rest` is the sorted property keys following the one this node is keyed by.
    fn add(&mut self, descriptor: &T, rest: &[PropertyKeyId]) {
        match rest.split_first() {
            None => {
                self.full_descriptors.insert(descriptor.clone());
            }
            Some((&next_key_id, rest)) => {
                self.next.entry(next_key_id).or_default().add(descriptor, rest);
            }
        }
    }

    /// Returns `true` if this node ended up empty after the removal.
    fn remove(&mut self, descriptor: &T, rest: &[PropertyKeyId]) -> bool {
        match rest.split_first() {
            None => {
                self.full_descriptors.remove(descriptor);
            }
            Some((&next_key_id, rest)) => {
                if self.next.get_mut(&next_key_id).is_some_and(|set| set.remove(descriptor, rest)) {
                    self.next.remove(&next_key_id);
                }
            }
        }
        self.is_empty()
    }

    /// `remaining` is the part of the query's sorted properties after the key
    /// this node matched.
    fn collect_for_complete_list_of_properties<C>(&self, into: &mut C, remaining: &[PropertyKeyId])
    where
        C: Extend<T>,
    {
        into.extend(self.full_descriptors.iter().cloned());
        if self.next.is_empty() {
            return;
        }
        for (i, key_id) in remaining.iter().enumerate() {
            if let Some(next) = self.next.get(key_id) {
                next.collect_for_complete_list_of_properties(into, &remaining[i + 1..]);
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.full_descriptors.is_empty() && self.next.is_empty()
    }

    #[cfg(test)]
    fn assert_pruned(&self) {
        for (key_id, set) in &self.next {
            assert!(!set.is_empty(), "empty property chain retained at ({key_id})");
            set.assert_pruned();
        }
    }
}

/// Property key ids of `schema` in ascending order. Only composite schemas
/// need a sorted copy.
fn sorted_property_key_ids(schema: &SchemaDescriptor) -> Cow<'_, [PropertyKeyId]> {
    let property_key_ids = schema.property_ids();
    if property_key_ids.len() > 1 {
        let mut sorted = property_key_ids.to_vec();
        sorted.sort_unstable();
        Cow::Owned(sorted)
    } else {
        Cow::Borrowed(property_key_ids)
    }
}
