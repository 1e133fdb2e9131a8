//! Integration tests for SchemaDescriptorLookupSet.

use std::collections::HashSet;
use std::sync::Arc;

use manifoldb_schema::schema::{
    EntityType, IndexDescriptor, IndexKind, SchemaDescriptor, SchemaDescriptorLookupSet,
};
use manifoldb_schema::types::{EntityTokenId, IndexId, PropertyKeyId};

fn index(id: u64, schema: SchemaDescriptor) -> Arc<IndexDescriptor> {
    Arc::new(IndexDescriptor::builder(format!("idx_{id}"), schema).id(IndexId::new(id)).build())
}

fn ids(found: &HashSet<Arc<IndexDescriptor>>) -> Vec<u64> {
    let mut ids: Vec<_> = found.iter().map(|d| d.id.as_u64()).collect();
    ids.sort_unstable();
    ids
}

fn complete(
    set: &SchemaDescriptorLookupSet<Arc<IndexDescriptor>>,
    tokens: &[EntityTokenId],
    props: &[PropertyKeyId],
) -> Vec<u64> {
    let mut found = HashSet::new();
    set.matching_descriptors_for_complete_list_of_properties(&mut found, tokens, props);
    ids(&found)
}

fn partial(
    set: &SchemaDescriptorLookupSet<Arc<IndexDescriptor>>,
    tokens: &[EntityTokenId],
    props: &[PropertyKeyId],
) -> Vec<u64> {
    let mut found = HashSet::new();
    set.matching_descriptors_for_partial_list_of_properties(&mut found, tokens, props);
    ids(&found)
}

/// A: [0](4, 7, 3), B: [0](7, 4), C: [0](3, 4), D: [0](3, 4, 7),
/// E: [1](7), F: [1](5, 6), G: [0, 1](3, 4)
fn populated() -> SchemaDescriptorLookupSet<Arc<IndexDescriptor>> {
    let mut set = SchemaDescriptorLookupSet::new();
    set.add(index(1, SchemaDescriptor::for_label(0, [4, 7, 3])));
    set.add(index(2, SchemaDescriptor::for_label(0, [7, 4])));
    set.add(index(3, SchemaDescriptor::for_label(0, [3, 4])));
    set.add(index(4, SchemaDescriptor::for_label(0, [3, 4, 7])));
    set.add(index(5, SchemaDescriptor::for_label(1, [7])));
    set.add(index(6, SchemaDescriptor::for_label(1, [5, 6])));
    set.add(index(7, SchemaDescriptor::multi_token(EntityType::Node, [0, 1], [3, 4])));
    set
}

#[test]
fn complete_list_of_properties() {
    let set = populated();
    assert_eq!(set.len(), 7);

    assert_eq!(complete(&set, &[0], &[3, 4, 7]), vec![1, 2, 3, 4]);
    assert_eq!(complete(&set, &[0], &[4, 7]), vec![2]);
    assert_eq!(complete(&set, &[0], &[3, 4]), vec![3]);
    assert_eq!(complete(&set, &[0], &[3, 7]), Vec::<u64>::new());
    assert_eq!(complete(&set, &[1], &[5, 6, 7]), vec![5, 6]);
    assert_eq!(complete(&set, &[1], &[5]), Vec::<u64>::new());
    assert_eq!(complete(&set, &[0, 1], &[3, 4]), vec![3, 7]);
    assert_eq!(complete(&set, &[0, 1], &[3, 4, 5, 6, 7]), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(complete(&set, &[2], &[3, 4, 7]), Vec::<u64>::new());
}

#[test]
fn partial_list_of_properties() {
    let set = populated();

    assert_eq!(partial(&set, &[0], &[3]), vec![1, 3, 4]);
    assert_eq!(partial(&set, &[0], &[7]), vec![1, 2, 4]);
    assert_eq!(partial(&set, &[1], &[6]), vec![6]);
    assert_eq!(partial(&set, &[0, 1], &[4]), vec![1, 2, 3, 4, 7]);
    assert_eq!(partial(&set, &[1], &[3]), Vec::<u64>::new());
}

#[test]
fn matching_by_entity_tokens_only() {
    let set = populated();

    let mut found = HashSet::new();
    set.matching_descriptors(&mut found, &[1]);
    assert_eq!(ids(&found), vec![5, 6]);

    let mut found = HashSet::new();
    set.matching_descriptors(&mut found, &[0, 1, 2]);
    assert_eq!(ids(&found), vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn has_property_for_entity_tokens() {
    let set = populated();

    assert!(set.has(&[0], 3));
    assert!(set.has(&[1], 5));
    assert!(!set.has(&[1], 3));
    assert!(!set.has(&[0], 5));
    // reachable through [0] alone as well as through G
    assert!(set.has(&[0, 1], 3));
    assert!(!set.has(&[2], 3));
}

#[test]
fn has_entity_token_sees_every_position() {
    let mut set = SchemaDescriptorLookupSet::new();
    let g = index(1, SchemaDescriptor::multi_token(EntityType::Node, [2, 8], [1]));
    set.add(Arc::clone(&g));

    assert!(set.has_entity_token(2));
    assert!(set.has_entity_token(8));
    assert!(!set.has_entity_token(5));

    set.remove(&g);
    assert!(!set.has_entity_token(2));
    assert!(!set.has_entity_token(8));
}

#[test]
fn removal_restores_previous_answers() {
    let mut set = populated();
    let extra = index(8, SchemaDescriptor::for_label(0, [4]));
    set.add(Arc::clone(&extra));
    assert_eq!(complete(&set, &[0], &[4, 7]), vec![2, 8]);

    assert!(set.remove(&extra));
    assert_eq!(complete(&set, &[0], &[4, 7]), vec![2]);
    assert_eq!(set.len(), 7);
}

#[test]
fn removing_everything_empties_the_set() {
    let mut set = populated();
    let mut all = HashSet::new();
    set.matching_descriptors(&mut all, &[0, 1]);

    for descriptor in &all {
        assert!(set.remove(descriptor));
    }
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
    assert!(!set.has_entity_token(0));
    assert!(!set.has_entity_token(1));
    assert!(!set.has(&[0, 1], 3));
    assert_eq!(complete(&set, &[0, 1], &[3, 4, 5, 6, 7]), Vec::<u64>::new());
}

#[test]
fn same_schema_different_indexes_are_distinct() {
    let schema = SchemaDescriptor::for_label(3, [9]);
    let range = index(1, schema.clone());
    let unique = Arc::new(
        IndexDescriptor::builder("uniq", schema).id(IndexId::new(2)).kind(IndexKind::Unique).build(),
    );
    let mut set = SchemaDescriptorLookupSet::new();
    set.add(Arc::clone(&range));
    set.add(Arc::clone(&unique));
    assert_eq!(complete(&set, &[3], &[9]), vec![1, 2]);

    set.remove(&range);
    assert_eq!(complete(&set, &[3], &[9]), vec![2]);
    assert!(set.has(&[3], 9));
}

#[test]
fn relationship_schemas_are_looked_up_by_type() {
    let mut set = SchemaDescriptorLookupSet::new();
    let knows_since = SchemaDescriptor::for_relationship_type(4, [1]);
    set.add(knows_since.clone());

    let mut found = Vec::new();
    set.matching_descriptors_for_complete_list_of_properties(&mut found, &[4], &[1, 2]);
    assert_eq!(found, vec![knows_since]);
}

#[test]
fn deserialized_descriptors_are_reachable() {
    let schema: SchemaDescriptor = serde_json::from_str(
        r#"{"entity_type":"Node","entity_token_ids":[2,1],"property_ids":[5]}"#,
    )
    .unwrap();
    let mut set = SchemaDescriptorLookupSet::new();
    assert!(set.add(schema.clone()));

    let mut found = Vec::new();
    set.matching_descriptors_for_complete_list_of_properties(&mut found, &[1, 2], &[5]);
    assert_eq!(found, vec![schema]);
    assert!(set.has(&[1, 2], 5));
}
