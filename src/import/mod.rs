//! Import pipeline: token document into a new variable collection.
//!
//! Flattening and alias resolution finish before anything is written, so a
//! document that fails to parse leaves the store untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::diagnostic::Diagnostics;
use crate::error::{Result, TokvarError};
use crate::parser::{flatten, parse_document};
use crate::registry::{resolve_aliases, TokenSet};
use crate::store::VariableStore;
use crate::types::{CollectionId, ResolvedType, TokenPayload, VariableId, VariableValue};

/// Summary of one import pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub collection_id: CollectionId,
    pub collection_name: String,
    /// Variables written to the store.
    pub created: usize,
    /// Dropped leaves and unresolved aliases.
    pub diagnostics: Diagnostics,
}

/// Flatten and resolve a document without touching a store.
pub fn resolve_document(source: &str) -> Result<(TokenSet, Diagnostics)> {
    let document = parse_document(source)?;
    let flattened = flatten(&document)?;

    let mut diagnostics = flattened.diagnostics;
    let resolution = resolve_aliases(flattened.pending, flattened.definitions);
    diagnostics.merge(resolution.diagnostics);

    Ok((resolution.definitions, diagnostics))
}

/// Import a token document as a new collection named `file_name`.
///
/// Every resolved definition becomes one variable in the collection's
/// default mode. Aliases point at the variable created for their target.
pub async fn import_document<S>(store: &S, file_name: &str, source: &str) -> Result<ImportReport>
where
    S: VariableStore + ?Sized,
{
    let (definitions, diagnostics) = resolve_document(source)?;

    let collection = store.create_collection(file_name).await?;
    let mode_id = collection
        .default_mode()
        .map(|m| m.mode_id.clone())
        .ok_or_else(|| TokvarError::store(format!("Collection {} has no modes", file_name)))?;

    let mut ids: HashMap<String, VariableId> = HashMap::with_capacity(definitions.len());

    for definition in definitions.iter() {
        let value = match &definition.payload {
            TokenPayload::Color(colour) => VariableValue::Color(*colour),
            TokenPayload::Number(n) => VariableValue::Float(*n),
            TokenPayload::Alias(target) => {
                let id = ids.get(target).ok_or_else(|| {
                    TokvarError::store(format!(
                        "{}: alias target {} was not written",
                        definition.path, target
                    ))
                })?;
                VariableValue::Alias(id.clone())
            }
        };

        let variable = store
            .create_variable(&definition.path, &collection.id, ResolvedType::from(definition.kind))
            .await?;
        store.set_value_for_mode(&variable.id, &mode_id, value).await?;
        ids.insert(definition.path.clone(), variable.id);
    }

    tracing::debug!(
        collection = %collection.name,
        created = ids.len(),
        dropped = diagnostics.len(),
        "import complete"
    );

    Ok(ImportReport {
        collection_id: collection.id,
        collection_name: collection.name,
        created: ids.len(),
        diagnostics,
    })
}

/// Collection name for a token file: the file name without `.tokens.json`
/// or `.json`.
pub fn collection_name_for(file_name: &str) -> &str {
    file_name
        .strip_suffix(".tokens.json")
        .or_else(|| file_name.strip_suffix(".json"))
        .unwrap_or(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::codes;
    use crate::store::MemoryStore;
    use crate::types::Rgba;

    const DOC: &str = r##"{
        "semantic": {
            "$type": "color",
            "danger": { "$value": "{palette.red}" },
            "text": { "$value": "{semantic.danger}" }
        },
        "palette": {
            "$type": "color",
            "red": { "$value": "#ff0000" },
            "shade": { "$value": "rgba(0, 0, 0, 0.5)" }
        },
        "space": {
            "$type": "number",
            "md": { "$value": 8 },
            "gap": { "$value": "{space.md}" }
        }
    }"##;

    #[tokio::test]
    async fn test_import_writes_all_tokens() {
        let store = MemoryStore::new();
        let report = import_document(&store, "theme", DOC).await.unwrap();

        assert_eq!(report.collection_name, "theme");
        assert_eq!(report.created, 6);
        assert!(report.diagnostics.is_empty());

        let collection = store.collection_by_id(&report.collection_id).await.unwrap().unwrap();
        let mode = collection.modes[0].mode_id.clone();
        let mut names = Vec::new();
        for id in &collection.variable_ids {
            names.push(store.variable_by_id(id).await.unwrap().unwrap().name);
        }
        assert_eq!(
            names,
            vec!["palette/red", "palette/shade", "space/md", "space/gap", "semantic/danger", "semantic/text"]
        );

        let shade = store.variable_by_id(&collection.variable_ids[1]).await.unwrap().unwrap();
        assert_eq!(
            shade.value_for_mode(&mode),
            Some(&VariableValue::Color(Rgba::new(0.0, 0.0, 0.0, 0.5)))
        );
    }

    #[tokio::test]
    async fn test_alias_points_at_target_variable() {
        let store = MemoryStore::new();
        let report = import_document(&store, "theme", DOC).await.unwrap();
        let collection = store.collection_by_id(&report.collection_id).await.unwrap().unwrap();
        let mode = collection.modes[0].mode_id.clone();

        let red_id = collection.variable_ids[0].clone();
        let danger = store.variable_by_id(&collection.variable_ids[4]).await.unwrap().unwrap();
        assert_eq!(danger.resolved_type, ResolvedType::Color);
        assert_eq!(danger.value_for_mode(&mode), Some(&VariableValue::Alias(red_id)));
    }

    #[tokio::test]
    async fn test_unresolved_aliases_are_not_written() {
        let store = MemoryStore::new();
        let doc = r#"{
            "$type": "number",
            "a": { "$value": "{b}" },
            "b": { "$value": "{a}" },
            "c": { "$value": "{missing}" },
            "d": { "$value": 1 }
        }"#;
        let report = import_document(&store, "loops", doc).await.unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(report.diagnostics.count_code(codes::CYCLIC_ALIAS), 2);
        assert_eq!(report.diagnostics.count_code(codes::MISSING_ALIAS), 1);
    }

    #[tokio::test]
    async fn test_format_error_leaves_store_untouched() {
        let store = MemoryStore::new();
        let doc = r##"{ "$type": "color", "ok": { "$value": "#fff" }, "bad": { "$value": "blue-ish" } }"##;

        assert!(import_document(&store, "broken", doc).await.is_err());
        assert!(store.local_collections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_path_does_not_split_alias_from_target() {
        let store = MemoryStore::new();
        let doc = r#"{
            "$type": "number",
            "a": { "b": { "$value": "{c}" } },
            "a/b": { "$value": 1 },
            "c": { "$value": 2 }
        }"#;
        let report = import_document(&store, "dupes", doc).await.unwrap();

        assert_eq!(report.created, 2);
        assert_eq!(report.diagnostics.count_code(codes::DUPLICATE_PATH), 1);

        let collection = store.collection_by_id(&report.collection_id).await.unwrap().unwrap();
        let mode = collection.modes[0].mode_id.clone();
        let c = store.variable_by_id(&collection.variable_ids[0]).await.unwrap().unwrap();
        let ab = store.variable_by_id(&collection.variable_ids[1]).await.unwrap().unwrap();
        assert_eq!(c.name, "c");
        assert_eq!(ab.name, "a/b");
        assert_eq!(ab.value_for_mode(&mode), Some(&VariableValue::Alias(c.id)));
    }

    #[tokio::test]
    async fn test_braced_non_tuple_value_is_dropped_as_alias() {
        let store = MemoryStore::new();
        let doc = r#"{ "$type": "number", "a": { "$value": "{x:y}" }, "b": { "$value": 1 } }"#;
        let report = import_document(&store, "braces", doc).await.unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(report.diagnostics.count_code(codes::MISSING_ALIAS), 1);
    }

    #[test]
    fn test_collection_name_for() {
        assert_eq!(collection_name_for("core.tokens.json"), "core");
        assert_eq!(collection_name_for("theme.json"), "theme");
        assert_eq!(collection_name_for("plain"), "plain");
    }
}
