//! Property-based tests comparing the lookup set against a brute-force scan.

#![allow(clippy::unwrap_used)]

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;

use super::SchemaDescriptorLookupSet;
use crate::schema::{EntityType, SchemaDescriptor, SchemaDescriptorSupplier};
use crate::types::{EntityTokenId, PropertyKeyId};

/// Small id spaces so that descriptors and queries overlap often.
fn arb_descriptor() -> impl Strategy<Value = SchemaDescriptor> {
    (
        prop::collection::btree_set(0..5u32, 1..=3),
        // Unique keys in arbitrary declaration order.
        prop::collection::hash_set(0..7u32, 1..=3),
        any::<bool>(),
    )
        .prop_map(|(tokens, props, relationship)| {
            let entity_type =
                if relationship { EntityType::Relationship } else { EntityType::Node };
            SchemaDescriptor::multi_token(entity_type, tokens, props)
        })
}

fn arb_descriptors() -> impl Strategy<Value = Vec<SchemaDescriptor>> {
    prop::collection::hash_set(arb_descriptor(), 0..24).prop_map(|set| set.into_iter().collect())
}

fn arb_query() -> impl Strategy<Value = (Vec<EntityTokenId>, Vec<PropertyKeyId>)> {
    (prop::collection::btree_set(0..5u32, 0..=5), prop::collection::btree_set(0..7u32, 0..=7))
        .prop_map(|(tokens, props)| (tokens.into_iter().collect(), props.into_iter().collect()))
}

fn tokens_covered(d: &SchemaDescriptor, query_tokens: &[EntityTokenId]) -> bool {
    d.entity_token_ids().iter().all(|t| query_tokens.contains(t))
}

fn build(descriptors: &[SchemaDescriptor]) -> SchemaDescriptorLookupSet<SchemaDescriptor> {
    let mut set = SchemaDescriptorLookupSet::new();
    for d in descriptors {
        set.add(d.clone());
    }
    set
}

fn check_against_scan(
    set: &SchemaDescriptorLookupSet<SchemaDescriptor>,
    stored: &[SchemaDescriptor],
    tokens: &[EntityTokenId],
    props: &[PropertyKeyId],
) -> Result<(), TestCaseError> {
    let query_props: BTreeSet<_> = props.iter().copied().collect();

    let mut complete = HashSet::new();
    set.matching_descriptors_for_complete_list_of_properties(&mut complete, tokens, props);
    let expected: HashSet<_> = stored
        .iter()
        .filter(|d| tokens_covered(d, tokens))
        .filter(|d| d.schema().property_ids().iter().all(|p| query_props.contains(p)))
        .cloned()
        .collect();
    prop_assert_eq!(complete, expected);

    let mut partial = HashSet::new();
    set.matching_descriptors_for_partial_list_of_properties(&mut partial, tokens, props);
    let expected: HashSet<_> = stored
        .iter()
        .filter(|d| tokens_covered(d, tokens))
        .filter(|d| d.property_ids().iter().any(|p| query_props.contains(p)))
        .cloned()
        .collect();
    prop_assert_eq!(partial, expected);

    let mut all = HashSet::new();
    set.matching_descriptors(&mut all, tokens);
    let expected: HashSet<_> =
        stored.iter().filter(|d| tokens_covered(d, tokens)).cloned().collect();
    prop_assert_eq!(all, expected);

    for key in 0..7u32 {
        let expected = stored
            .iter()
            .any(|d| tokens_covered(d, tokens) && d.property_ids().contains(&key));
        prop_assert_eq!(set.has(tokens, key), expected, "has({:?}, {})", tokens, key);
    }

    for token in 0..5u32 {
        let expected = stored.iter().any(|d| d.entity_token_ids().contains(&token));
        prop_assert_eq!(set.has_entity_token(token), expected);
    }
    Ok(())
}

proptest! {
    #[test]
    fn queries_match_brute_force(descriptors in arb_descriptors(), (tokens, props) in arb_query()) {
        let set = build(&descriptors);
        prop_assert_eq!(set.len(), descriptors.len());
        check_against_scan(&set, &descriptors, &tokens, &props)?;
    }

    #[test]
    fn removals_keep_structure_pruned(
        descriptors in arb_descriptors(),
        keep_mask in prop::collection::vec(any::<bool>(), 24),
        (tokens, props) in arb_query(),
    ) {
        let mut set = build(&descriptors);
        let mut kept = Vec::new();
        for (d, keep) in descriptors.iter().zip(&keep_mask) {
            if *keep {
                kept.push(d.clone());
            } else {
                prop_assert!(set.remove(d));
            }
            set.assert_pruned();
        }
        prop_assert_eq!(set.len(), kept.len());
        check_against_scan(&set, &kept, &tokens, &props)?;

        for d in &kept {
            prop_assert!(set.remove(d));
            set.assert_pruned();
        }
        prop_assert!(set.is_empty());
        prop_assert!((0..5u32).all(|t| !set.has_entity_token(t)));
    }

    #[test]
    fn add_remove_single_is_symmetric(d in arb_descriptor()) {
        let mut set = SchemaDescriptorLookupSet::new();
        set.add(d.clone());
        prop_assert!(!set.is_empty());
        prop_assert!(set.remove(&d));
        prop_assert!(set.is_empty());
        prop_assert_eq!(set.len(), 0);
        set.assert_pruned();
    }
}
