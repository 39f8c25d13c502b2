//! Export pipeline: variable collections into nested token documents.

mod legacy;
mod merge;
mod modes;
mod tree;
mod typescript;

pub use legacy::export_legacy;
pub use merge::merge_modes;
pub use modes::select_modes;
pub use tree::ExportTreeBuilder;
pub use typescript::const_name;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ExportOptions;
use crate::error::Result;
use crate::format::to_camel_case;
use crate::store::VariableStore;
use crate::types::{Collection, Mode};

/// One exported collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub file_name: String,
    pub collection_name: String,
    pub modes: Vec<Mode>,
    pub body: Value,
}

/// Modes and kind of one collection, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInfo {
    pub modes: Vec<Mode>,
    pub is_primitive: bool,
}

/// Collection name -> info, in store order.
pub type CollectionsInfo = IndexMap<String, CollectionInfo>;

/// Result of a full export pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub files: Vec<ExportFile>,
    pub collections_info: CollectionsInfo,
}

/// Build one export file for `collection`.
pub async fn export_collection<S>(store: &S, collection: &Collection, options: &ExportOptions) -> Result<ExportFile>
where
    S: VariableStore + ?Sized,
{
    let (modes, body) = ExportTreeBuilder::new(store, options).build(collection).await?;

    Ok(ExportFile {
        file_name: format!("{}.ts", to_camel_case(&collection.name)),
        collection_name: collection.name.clone(),
        modes,
        body,
    })
}

/// Export every local collection, in store order.
pub async fn export_all<S>(store: &S, options: &ExportOptions) -> Result<ExportResult>
where
    S: VariableStore + ?Sized,
{
    let collections = store.local_collections().await?;

    let mut files = Vec::with_capacity(collections.len());
    for collection in &collections {
        files.push(export_collection(store, collection, options).await?);
    }

    tracing::debug!(files = files.len(), "export complete");

    Ok(ExportResult {
        files,
        collections_info: info_for(&collections),
    })
}

/// Modes and primitive flag of every local collection.
pub async fn collections_info<S>(store: &S) -> Result<CollectionsInfo>
where
    S: VariableStore + ?Sized,
{
    Ok(info_for(&store.local_collections().await?))
}

fn info_for(collections: &[Collection]) -> CollectionsInfo {
    collections
        .iter()
        .map(|c| {
            (
                c.name.clone(),
                CollectionInfo {
                    modes: c.modes.clone(),
                    is_primitive: c.is_primitive(),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{ResolvedType, Rgba, VariableValue};
    use serde_json::json;

    #[tokio::test]
    async fn test_export_all_files_and_info() {
        let store = MemoryStore::new();
        let core = store.create_collection("Core Primitives").await.unwrap();
        let red = store.create_variable("red", &core.id, ResolvedType::Color).await.unwrap();
        store
            .set_value_for_mode(&red.id, &core.modes[0].mode_id, VariableValue::Color(Rgba::rgb(1.0, 0.0, 0.0)))
            .await
            .unwrap();
        store.create_collection("Semantic").await.unwrap();

        let result = export_all(&store, &ExportOptions::default()).await.unwrap();

        assert_eq!(result.files.len(), 2);
        assert_eq!(result.files[0].file_name, "corePrimitives.ts");
        assert_eq!(result.files[0].body, json!({ "red": "#ff0000" }));
        assert_eq!(result.files[1].file_name, "semantic.ts");
        assert_eq!(result.files[1].body, json!({}));

        assert!(result.collections_info["Core Primitives"].is_primitive);
        assert!(!result.collections_info["Semantic"].is_primitive);
        assert_eq!(result.collections_info["Semantic"].modes[0].name, "Mode 1");
    }

    #[tokio::test]
    async fn test_export_result_wire_shape() {
        let store = MemoryStore::new();
        store.create_collection("Core Primitives").await.unwrap();

        let result = export_all(&store, &ExportOptions::default()).await.unwrap();
        let wire = serde_json::to_value(&result).unwrap();

        assert_eq!(wire["files"][0]["fileName"], "corePrimitives.ts");
        assert_eq!(wire["files"][0]["collectionName"], "Core Primitives");
        assert_eq!(wire["collectionsInfo"]["Core Primitives"]["isPrimitive"], true);
        assert!(wire["collectionsInfo"]["Core Primitives"]["modes"][0]["modeId"].is_string());
    }
}
