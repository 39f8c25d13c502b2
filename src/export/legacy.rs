//! Legacy export: one token document per mode.
//!
//! The output uses the same `$type`/`$value` shape the importer reads, so a
//! legacy file imports back into an equivalent collection.

use serde_json::{json, Map, Value};

use crate::error::{Result, TokvarError};
use crate::format::number_value;
use crate::store::VariableStore;
use crate::types::{Collection, OpacityFormat, VariableValue};

use super::tree::insert_path;
use super::ExportFile;

/// Export every mode of `collection` as a `<collection>.<mode>.tokens.json`
/// document. Only COLOR and FLOAT variables are written.
pub async fn export_legacy<S>(store: &S, collection: &Collection) -> Result<Vec<ExportFile>>
where
    S: VariableStore + ?Sized,
{
    let mut files = Vec::with_capacity(collection.modes.len());

    for mode in &collection.modes {
        let mut tree = Map::new();

        for id in &collection.variable_ids {
            let Some(variable) = store.variable_by_id(id).await? else {
                continue;
            };
            let kind = match variable.resolved_type.token_kind() {
                Some(kind) => kind,
                None => continue,
            };
            let Some(value) = variable.value_for_mode(&mode.mode_id) else {
                continue;
            };

            let literal = match value {
                VariableValue::Alias(target) => {
                    let referenced = store.variable_by_id(target).await?.ok_or_else(|| {
                        TokvarError::store(format!("{} aliases missing variable {}", variable.name, target))
                    })?;
                    Value::String(format!("{{{}}}", referenced.name.replace('/', ".")))
                }
                VariableValue::Color(colour) => Value::String(colour.format(OpacityFormat::Rgba)),
                VariableValue::Float(n) => number_value(*n),
                VariableValue::String(_) | VariableValue::Boolean(_) => continue,
            };

            let parts: Vec<String> = variable.segments().map(str::to_string).collect();
            let leaf = json!({ "$type": kind.as_str(), "$value": literal });
            insert_path(&mut tree, &parts, leaf, &variable.name);
        }

        files.push(ExportFile {
            file_name: format!("{}.{}.tokens.json", collection.name, mode.name),
            collection_name: collection.name.clone(),
            modes: vec![mode.clone()],
            body: Value::Object(tree),
        });
    }

    tracing::debug!(collection = %collection.name, files = files.len(), "legacy export");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{ResolvedType, Rgba};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_legacy_file_per_mode() {
        let store = MemoryStore::new();
        let c = store.create_collection("theme").await.unwrap();
        let base = c.modes[0].mode_id.clone();
        let dark = store.add_mode(&c.id, "Dark").await.unwrap();

        let red = store.create_variable("color/red", &c.id, ResolvedType::Color).await.unwrap();
        store.set_value_for_mode(&red.id, &base, VariableValue::Color(Rgba::rgb(1.0, 0.0, 0.0))).await.unwrap();
        store.set_value_for_mode(&red.id, &dark, VariableValue::Color(Rgba::new(0.5, 0.0, 0.0, 0.5))).await.unwrap();

        let danger = store.create_variable("color/danger", &c.id, ResolvedType::Color).await.unwrap();
        store.set_value_for_mode(&danger.id, &base, VariableValue::Alias(red.id.clone())).await.unwrap();

        let gap = store.create_variable("space/gap", &c.id, ResolvedType::Float).await.unwrap();
        store.set_value_for_mode(&gap.id, &base, VariableValue::Float(8.0)).await.unwrap();

        let label = store.create_variable("label", &c.id, ResolvedType::String).await.unwrap();
        store.set_value_for_mode(&label.id, &base, VariableValue::String("hi".into())).await.unwrap();

        let c = store.collection_by_id(&c.id).await.unwrap().unwrap();
        let files = export_legacy(&store, &c).await.unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file_name, "theme.Mode 1.tokens.json");
        assert_eq!(
            files[0].body,
            json!({
                "color": {
                    "red": { "$type": "color", "$value": "#ff0000" },
                    "danger": { "$type": "color", "$value": "{color.red}" }
                },
                "space": { "gap": { "$type": "number", "$value": 8 } }
            })
        );
        assert_eq!(files[1].file_name, "theme.Dark.tokens.json");
        assert_eq!(
            files[1].body,
            json!({ "color": { "red": { "$type": "color", "$value": "rgba(128, 0, 0, 0.5)" } } })
        );
    }
}
