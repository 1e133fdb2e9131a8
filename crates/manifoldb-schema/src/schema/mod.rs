//! Schema descriptors and the structure used to find the ones that apply.
//!
//! - [`SchemaDescriptor`] - entity tokens and property keys covered by an index
//! - [`IndexDescriptor`] - a named, identified index over a schema
//! - [`SchemaDescriptorLookupSet`] - trie-based lookup from entity tokens and
//!   properties to the descriptors that cover them

mod descriptor;
mod lookup;

pub use descriptor::{
    EntityType, IndexDescriptor, IndexDescriptorBuilder, IndexKind, SchemaDescriptor,
    SchemaDescriptorSupplier,
};
pub use lookup::SchemaDescriptorLookupSet;
