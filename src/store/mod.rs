//! Variable store access.
//!
//! The host keeps collections and variables; tokvar only talks to it through
//! [`VariableStore`]. Every call is awaited before the next one is issued, so
//! a pass observes a consistent order of reads and writes.

mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Collection, CollectionId, ModeId, ResolvedType, Variable, VariableId, VariableValue};

pub use memory::{MemoryStore, StoreSnapshot};

/// Name given to the mode a new collection starts with.
pub const DEFAULT_MODE_NAME: &str = "Mode 1";

/// Repository interface over the host's variable storage.
#[async_trait]
pub trait VariableStore: Send + Sync {
    // ── Writes ──

    /// Create a collection with a single default mode.
    async fn create_collection(&self, name: &str) -> Result<Collection>;

    /// Add a mode to a collection and return its id.
    async fn add_mode(&self, collection_id: &CollectionId, name: &str) -> Result<ModeId>;

    /// Create an empty variable inside a collection.
    async fn create_variable(
        &self,
        name: &str,
        collection_id: &CollectionId,
        resolved_type: ResolvedType,
    ) -> Result<Variable>;

    async fn set_value_for_mode(
        &self,
        variable_id: &VariableId,
        mode_id: &ModeId,
        value: VariableValue,
    ) -> Result<()>;

    // ── Reads ──

    /// All collections in creation order.
    async fn local_collections(&self) -> Result<Vec<Collection>>;

    async fn variable_by_id(&self, id: &VariableId) -> Result<Option<Variable>>;

    async fn collection_by_id(&self, id: &CollectionId) -> Result<Option<Collection>>;
}
