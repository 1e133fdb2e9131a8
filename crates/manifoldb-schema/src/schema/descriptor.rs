//! Schema descriptors: which entity tokens and property keys an index covers.
//!
//! A [`SchemaDescriptor`] is the immutable "shape" of an index or constraint:
//! the entity tokens (labels or relationship types) it is scoped to and the
//! property keys it indexes. An [`IndexDescriptor`] adds identity and kind on
//! top of a schema, in the same way a catalog entry wraps its columns.
//!
//! # Example
//!
//! ```
//! use manifoldb_schema::schema::{IndexDescriptor, IndexKind, SchemaDescriptor};
//!
//! let schema = SchemaDescriptor::for_label(3, [7, 4]);
//! assert_eq!(schema.entity_token_ids(), &[3]);
//! assert_eq!(schema.property_ids(), &[7, 4]);
//! assert!(schema.is_composite());
//!
//! let index = IndexDescriptor::builder("idx_person_name_age", schema)
//!     .kind(IndexKind::Unique)
//!     .build();
//! assert!(index.is_unique());
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{EntityTokenId, IndexId, PropertyKeyId};

/// What kind of entity a schema applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntityType {
    /// Nodes, with entity tokens being labels.
    #[default]
    Node,
    /// Relationships, with entity tokens being relationship types.
    Relationship,
}

/// The entity tokens and property keys covered by an index or constraint.
///
/// Entity token ids are kept ascending and free of duplicates; property key
/// ids keep the order they were declared in, which is the order the index
/// stores composite values in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSchemaDescriptor")]
pub struct SchemaDescriptor {
    entity_type: EntityType,
    entity_token_ids: Vec<EntityTokenId>,
    property_ids: Vec<PropertyKeyId>,
}

/// Serialized form of [`SchemaDescriptor`], canonicalised on the way in.
#[derive(Deserialize)]
struct RawSchemaDescriptor {
    #[serde(default)]
    entity_type: EntityType,
    entity_token_ids: Vec<EntityTokenId>,
    property_ids: Vec<PropertyKeyId>,
}

impl From<RawSchemaDescriptor> for SchemaDescriptor {
    fn from(raw: RawSchemaDescriptor) -> Self {
        Self::multi_token(raw.entity_type, raw.entity_token_ids, raw.property_ids)
    }
}

impl SchemaDescriptor {
    /// Schema over a single node label.
    #[must_use]
    pub fn for_label(
        label_id: EntityTokenId,
        property_ids: impl IntoIterator<Item = PropertyKeyId>,
    ) -> Self {
        Self::multi_token(EntityType::Node, [label_id], property_ids)
    }

    /// Schema over a single relationship type.
    #[must_use]
    pub fn for_relationship_type(
        relationship_type_id: EntityTokenId,
        property_ids: impl IntoIterator<Item = PropertyKeyId>,
    ) -> Self {
        Self::multi_token(EntityType::Relationship, [relationship_type_id], property_ids)
    }

    /// Schema spanning several entity tokens, e.g. a full-text index over
    /// several labels. Token ids are sorted and deduplicated.
    ///
    /// Empty token or property lists are not rejected here; the lookup
    /// structures treat such descriptors as unreachable.
    #[must_use]
    pub fn multi_token(
        entity_type: EntityType,
        entity_token_ids: impl IntoIterator<Item = EntityTokenId>,
        property_ids: impl IntoIterator<Item = PropertyKeyId>,
    ) -> Self {
        let mut entity_token_ids: Vec<_> = entity_token_ids.into_iter().collect();
        entity_token_ids.sort_unstable();
        entity_token_ids.dedup();
        Self { entity_type, entity_token_ids, property_ids: property_ids.into_iter().collect() }
    }

    /// The kind of entity this schema applies to.
    #[inline]
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Entity token ids, ascending.
    #[inline]
    #[must_use]
    pub fn entity_token_ids(&self) -> &[EntityTokenId] {
        &self.entity_token_ids
    }

    /// Property key ids in declaration order.
    #[inline]
    #[must_use]
    pub fn property_ids(&self) -> &[PropertyKeyId] {
        &self.property_ids
    }

    /// Check if this schema covers more than one property.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.property_ids.len() > 1
    }

    /// Check if this schema spans more than one entity token.
    #[must_use]
    pub fn is_multi_token(&self) -> bool {
        self.entity_token_ids.len() > 1
    }
}

impl fmt::Display for SchemaDescriptor {
    /// Formats as `[0, 1](3, 4)`: entity tokens in brackets, properties in parentheses.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entity_type == EntityType::Relationship {
            write!(f, "-")?;
        }
        write!(f, "{:?}(", self.entity_token_ids)?;
        for (i, id) in self.property_ids.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}")?;
        }
        write!(f, ")")
    }
}

/// Anything that can hand out the [`SchemaDescriptor`] it applies to.
///
/// The lookup set is generic over this so callers can store their own index
/// or constraint handles directly.
pub trait SchemaDescriptorSupplier {
    /// The schema this value applies to.
    fn schema(&self) -> &SchemaDescriptor;
}

impl SchemaDescriptorSupplier for SchemaDescriptor {
    fn schema(&self) -> &SchemaDescriptor {
        self
    }
}

impl<T: SchemaDescriptorSupplier + ?Sized> SchemaDescriptorSupplier for Arc<T> {
    fn schema(&self) -> &SchemaDescriptor {
        (**self).schema()
    }
}

impl<T: SchemaDescriptorSupplier + ?Sized> SchemaDescriptorSupplier for &T {
    fn schema(&self) -> &SchemaDescriptor {
        (**self).schema()
    }
}

/// Kind of index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum IndexKind {
    /// General purpose range index.
    #[default]
    Range,
    /// Index backing a uniqueness constraint.
    Unique,
}

/// A registered index: identity, name, kind and the schema it covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexDescriptor {
    /// Identifier assigned on registration.
    pub id: IndexId,
    /// User-provided name, e.g. "idx_person_email".
    pub name: String,
    /// Entity tokens and properties covered.
    pub schema: SchemaDescriptor,
    /// Kind of index.
    pub kind: IndexKind,
}

impl IndexDescriptor {
    /// Create a new index descriptor builder.
    #[must_use]
    pub fn builder(name: impl Into<String>, schema: SchemaDescriptor) -> IndexDescriptorBuilder {
        IndexDescriptorBuilder {
            id: IndexId::new(0),
            name: name.into(),
            schema,
            kind: IndexKind::default(),
        }
    }

    /// Check if this index enforces uniqueness.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.kind == IndexKind::Unique
    }
}

impl SchemaDescriptorSupplier for IndexDescriptor {
    fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }
}

impl fmt::Display for IndexDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.schema)
    }
}

/// Builder for [`IndexDescriptor`].
///
/// Use [`IndexDescriptor::builder`] to create a new builder.
#[derive(Debug)]
pub struct IndexDescriptorBuilder {
    id: IndexId,
    name: String,
    schema: SchemaDescriptor,
    kind: IndexKind,
}

impl IndexDescriptorBuilder {
    /// Set the index id.
    #[must_use]
    pub fn id(mut self, id: IndexId) -> Self {
        self.id = id;
        self
    }

    /// Set the index kind.
    #[must_use]
    pub fn kind(mut self, kind: IndexKind) -> Self {
        self.kind = kind;
        self
    }

    /// Build the index descriptor.
    #[must_use]
    pub fn build(self) -> IndexDescriptor {
        IndexDescriptor { id: self.id, name: self.name, schema: self.schema, kind: self.kind }
    }
}
