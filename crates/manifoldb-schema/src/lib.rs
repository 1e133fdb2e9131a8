//! `ManifoldDB` Schema
//!
//! This crate provides the schema-index plumbing that sits between entity
//! writes and the physical indexes in `ManifoldDB`.
//!
//! # Overview
//!
//! - **Descriptor lookup**: [`SchemaDescriptorLookupSet`] answers "which
//!   indexes and constraints apply to an entity with these labels and these
//!   properties?" without scanning every registered descriptor
//! - **Combined population**: [`CombinedIndexPopulator`] builds one logical
//!   index out of a boost populator (numbers, by default) and a fallback
//!   populator, routing each update to exactly one of them
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//!
//! use manifoldb_schema::{SchemaDescriptor, SchemaDescriptorLookupSet};
//!
//! // Ids inside [] are labels, ids inside () are property keys
//! let a = SchemaDescriptor::for_label(0, [3, 4, 7]); // A: [0](3, 4, 7)
//! let b = SchemaDescriptor::for_label(0, [4, 7]); // B: [0](4, 7)
//! let c = SchemaDescriptor::for_label(0, [3, 4]); // C: [0](3, 4)
//!
//! let mut lookup = SchemaDescriptorLookupSet::new();
//! lookup.add(a.clone());
//! lookup.add(b.clone());
//! lookup.add(c.clone());
//!
//! // A node labelled 0 with properties 3, 4 and 7 is covered by all three
//! let mut found = HashSet::new();
//! lookup.matching_descriptors_for_complete_list_of_properties(&mut found, &[0], &[3, 4, 7]);
//! assert_eq!(found, HashSet::from([a, b.clone(), c]));
//!
//! // With only 4 and 7 present, only B applies
//! let mut found = HashSet::new();
//! lookup.matching_descriptors_for_complete_list_of_properties(&mut found, &[0], &[4, 7]);
//! assert_eq!(found, HashSet::from([b]));
//! ```
//!
//! # Modules
//!
//! - [`schema`] - Schema descriptors and the descriptor lookup set
//! - [`populator`] - The populator lifecycle and the combined populator
//! - [`types`] - Identifiers and property values

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod populator;
pub mod schema;
pub mod types;

pub use populator::{
    CombinedIndexPopulator, IndexEntryUpdate, IndexPopulator, IndexSample, PopulatorError,
    PopulatorResult, RoutingConfig,
};
pub use schema::{
    EntityType, IndexDescriptor, IndexKind, SchemaDescriptor, SchemaDescriptorLookupSet,
    SchemaDescriptorSupplier,
};
pub use types::{EntityId, EntityTokenId, IndexId, PropertyKeyId, Value, ValueKind};
