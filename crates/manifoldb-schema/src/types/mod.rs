//! Core data types for schema lookup and index population.

mod id;
mod value;

pub use id::{EntityId, EntityTokenId, IndexId, PropertyKeyId};
pub use value::{Value, ValueKind};
