//! In-process variable store.
//!
//! Keeps collections and variables behind a tokio `RwLock` and can be saved
//! to and loaded from a JSON snapshot, which is how the CLI persists state
//! between runs.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{Result, TokvarError};
use crate::types::{
    Collection, CollectionId, Mode, ModeId, ResolvedType, Variable, VariableId, VariableValue,
};

use super::{VariableStore, DEFAULT_MODE_NAME};

/// Serializable contents of a [`MemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub variables: IndexMap<VariableId, Variable>,
    /// Next numeric suffix handed out for a new id.
    #[serde(default)]
    pub next_id: u64,
    /// Variable names per collection, rebuilt from `variables` on load.
    #[serde(skip)]
    names: HashMap<CollectionId, HashSet<String>>,
}

impl StoreSnapshot {
    fn reindex(&mut self) {
        self.names.clear();
        for variable in self.variables.values() {
            self.names
                .entry(variable.variable_collection_id.clone())
                .or_default()
                .insert(variable.name.clone());
        }
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn collection_mut(&mut self, id: &CollectionId) -> Result<&mut Collection> {
        self.collections
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| TokvarError::store(format!("Unknown collection: {}", id)))
    }
}

/// A [`VariableStore`] held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(mut snapshot: StoreSnapshot) -> Self {
        snapshot.reindex();
        Self {
            state: RwLock::new(snapshot),
        }
    }

    /// Copy out the current contents.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.clone()
    }

    /// Load a store from a snapshot file. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path).map_err(|e| TokvarError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read store: {}", e),
        })?;

        let snapshot = serde_json::from_str(&content).map_err(|e| TokvarError::Parse {
            message: format!("Invalid store snapshot {}: {}", path.display(), e),
            help: Some("Delete the file to start from an empty store".to_string()),
        })?;

        Ok(Self::from_snapshot(snapshot))
    }

    /// Write the current contents to a snapshot file.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let snapshot = self.snapshot().await;
        let json = serde_json::to_string_pretty(&snapshot).map_err(|e| TokvarError::Store {
            message: format!("Failed to serialize store: {}", e),
            help: None,
        })?;

        tokio::fs::write(path, json).await.map_err(|e| TokvarError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write store: {}", e),
        })
    }
}

#[async_trait]
impl VariableStore for MemoryStore {
    async fn create_collection(&self, name: &str) -> Result<Collection> {
        let mut state = self.state.write().await;

        let id = CollectionId::new(format!("VariableCollectionId:{}", state.next()));
        let mode = Mode::new(format!("{}:0", state.next()), DEFAULT_MODE_NAME);
        let collection = Collection {
            id,
            name: name.to_string(),
            modes: vec![mode],
            variable_ids: Vec::new(),
        };

        state.collections.push(collection.clone());
        Ok(collection)
    }

    async fn add_mode(&self, collection_id: &CollectionId, name: &str) -> Result<ModeId> {
        let mut state = self.state.write().await;

        let mode_id = ModeId::new(format!("{}:0", state.next()));
        let collection = state.collection_mut(collection_id)?;
        if collection.modes.iter().any(|m| m.name == name) {
            return Err(TokvarError::store(format!(
                "Mode {} already exists in {}",
                name, collection.name
            )));
        }
        collection.modes.push(Mode {
            mode_id: mode_id.clone(),
            name: name.to_string(),
        });

        Ok(mode_id)
    }

    async fn create_variable(
        &self,
        name: &str,
        collection_id: &CollectionId,
        resolved_type: ResolvedType,
    ) -> Result<Variable> {
        let mut state = self.state.write().await;

        if name.is_empty() || name.split('/').any(str::is_empty) {
            return Err(TokvarError::Store {
                message: format!("Invalid variable name: {:?}", name),
                help: Some("Variable names are non-empty segments joined by /".to_string()),
            });
        }

        let id = VariableId::new(format!("VariableID:{}", state.next()));
        let duplicate = state
            .names
            .get(collection_id)
            .is_some_and(|names| names.contains(name));

        let collection = state.collection_mut(collection_id)?;
        if duplicate {
            return Err(TokvarError::store(format!(
                "Variable {} already exists in {}",
                name, collection.name
            )));
        }
        collection.variable_ids.push(id.clone());
        state
            .names
            .entry(collection_id.clone())
            .or_default()
            .insert(name.to_string());

        let variable = Variable {
            id: id.clone(),
            name: name.to_string(),
            variable_collection_id: collection_id.clone(),
            resolved_type,
            values_by_mode: IndexMap::new(),
        };
        state.variables.insert(id, variable.clone());

        Ok(variable)
    }

    async fn set_value_for_mode(
        &self,
        variable_id: &VariableId,
        mode_id: &ModeId,
        value: VariableValue,
    ) -> Result<()> {
        let mut state = self.state.write().await;

        let expected = match &value {
            VariableValue::Alias(target) => state
                .variables
                .get(target)
                .map(|v| v.resolved_type)
                .ok_or_else(|| TokvarError::store(format!("Alias target {} does not exist", target)))?,
            VariableValue::Boolean(_) => ResolvedType::Boolean,
            VariableValue::Color(_) => ResolvedType::Color,
            VariableValue::Float(_) => ResolvedType::Float,
            VariableValue::String(_) => ResolvedType::String,
        };

        let variable = state
            .variables
            .get(variable_id)
            .ok_or_else(|| TokvarError::store(format!("Unknown variable: {}", variable_id)))?;

        if variable.resolved_type != expected {
            return Err(TokvarError::store(format!(
                "Cannot set a {:?} value on {} ({:?})",
                expected, variable.name, variable.resolved_type
            )));
        }

        let has_mode = state
            .collections
            .iter()
            .find(|c| c.id == variable.variable_collection_id)
            .is_some_and(|c| c.modes.iter().any(|m| &m.mode_id == mode_id));
        if !has_mode {
            return Err(TokvarError::store(format!(
                "Mode {} does not belong to the collection of {}",
                mode_id, variable.name
            )));
        }

        if let Some(variable) = state.variables.get_mut(variable_id) {
            variable.values_by_mode.insert(mode_id.clone(), value);
        }
        Ok(())
    }

    async fn local_collections(&self) -> Result<Vec<Collection>> {
        Ok(self.state.read().await.collections.clone())
    }

    async fn variable_by_id(&self, id: &VariableId) -> Result<Option<Variable>> {
        Ok(self.state.read().await.variables.get(id).cloned())
    }

    async fn collection_by_id(&self, id: &CollectionId) -> Result<Option<Collection>> {
        Ok(self
            .state
            .read()
            .await
            .collections
            .iter()
            .find(|c| &c.id == id)
            .cloned())
    }
}
