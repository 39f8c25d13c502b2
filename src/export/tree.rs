//! Nested export tree for one collection.

use serde_json::{Map, Value};

use crate::config::ExportOptions;
use crate::error::{Result, TokvarError};
use crate::format::{format_number, to_camel_case, Dimension};
use crate::store::VariableStore;
use crate::types::{Collection, Mode, ResolvedType, Variable, VariableValue};

use super::merge::merge_modes;
use super::modes::select_modes;

/// Builds the export body of a collection from the variable store.
pub struct ExportTreeBuilder<'a, S: ?Sized> {
    store: &'a S,
    options: &'a ExportOptions,
}

impl<'a, S> ExportTreeBuilder<'a, S>
where
    S: VariableStore + ?Sized,
{
    pub fn new(store: &'a S, options: &'a ExportOptions) -> Self {
        Self { store, options }
    }

    /// Build the body and the list of exported modes.
    ///
    /// A single selected mode yields its tree as-is; several modes are merged
    /// under `mode<Name>` keys per top-level group.
    pub async fn build(&self, collection: &Collection) -> Result<(Vec<Mode>, Value)> {
        let modes = select_modes(collection, self.options);
        if modes.is_empty() {
            return Err(TokvarError::Export {
                message: format!("Collection {} has no modes", collection.name),
                help: None,
            });
        }

        let mut trees = Vec::with_capacity(modes.len());
        for mode in &modes {
            trees.push(self.build_mode(collection, mode).await?);
        }

        let body = if trees.len() == 1 {
            trees.pop().unwrap_or_default()
        } else {
            merge_modes(&modes, trees)
        };

        Ok((modes, Value::Object(body)))
    }

    /// Nested tree of every exported variable's value in one mode.
    pub async fn build_mode(&self, collection: &Collection, mode: &Mode) -> Result<Map<String, Value>> {
        let mut tree = Map::new();

        for id in &collection.variable_ids {
            let variable = self.store.variable_by_id(id).await?.ok_or_else(|| {
                TokvarError::store(format!(
                    "Variable {} listed in {} does not exist",
                    id, collection.name
                ))
            })?;

            if !self.exports(variable.resolved_type) {
                continue;
            }
            let Some(value) = variable.value_for_mode(&mode.mode_id) else {
                continue;
            };

            let parts: Vec<String> = variable.segments().map(to_camel_case).collect();
            let encoded = self.encode(&variable, value, &parts).await?;
            insert_path(&mut tree, &parts, encoded, &variable.name);
        }

        Ok(tree)
    }

    fn exports(&self, resolved_type: ResolvedType) -> bool {
        match resolved_type {
            ResolvedType::Color | ResolvedType::Float => true,
            ResolvedType::String => !self.options.exclude_string,
            ResolvedType::Boolean => false,
        }
    }

    async fn encode(&self, variable: &Variable, value: &VariableValue, parts: &[String]) -> Result<Value> {
        Ok(match value {
            VariableValue::Alias(target) => Value::String(self.reference(variable, target).await?),
            VariableValue::Color(colour) => Value::String(colour.format(self.options.opacity_format)),
            VariableValue::Float(n) => format_number(&Dimension::Number(*n), &variable.name, parts),
            VariableValue::String(s) => Value::String(s.clone()),
            VariableValue::Boolean(b) => Value::Bool(*b),
        })
    }

    /// `{collection.path.to.variable}` for an alias value.
    async fn reference(&self, variable: &Variable, target: &crate::types::VariableId) -> Result<String> {
        let referenced = self.store.variable_by_id(target).await?.ok_or_else(|| TokvarError::Store {
            message: format!("{} aliases missing variable {}", variable.name, target),
            help: Some("Re-import the collection that defined it".to_string()),
        })?;
        let collection = self
            .store
            .collection_by_id(&referenced.variable_collection_id)
            .await?
            .ok_or_else(|| {
                TokvarError::store(format!(
                    "Collection {} of {} does not exist",
                    referenced.variable_collection_id, referenced.name
                ))
            })?;

        let prefix = self
            .options
            .collection_aliases
            .get(&collection.name)
            .cloned()
            .unwrap_or_else(|| to_camel_case(&collection.name));
        let path: Vec<String> = referenced.segments().map(to_camel_case).collect();

        Ok(format!("{{{}.{}}}", prefix, path.join(".")))
    }
}

/// Set `value` at `parts` inside `tree`, creating groups along the way.
///
/// A group name already holding a value keeps that value; the new leaf is
/// skipped.
pub(crate) fn insert_path(tree: &mut Map<String, Value>, parts: &[String], value: Value, name: &str) {
    let Some((leaf, groups)) = parts.split_last() else {
        return;
    };

    let mut node = tree;
    for group in groups {
        let entry = node
            .entry(group.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        match entry {
            Value::Object(map) => node = map,
            _ => {
                tracing::warn!(variable = name, group = %group, "group name collides with a value, skipping");
                return;
            }
        }
    }
    node.insert(leaf.clone(), value);
}
