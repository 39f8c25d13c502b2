//! Mode selection for export.

use crate::config::{ColorMode, ExportOptions, PrimitiveMode};
use crate::types::{Collection, Mode};

/// Pick the modes of `collection` to export.
///
/// Primitive collections (name contains "primitive") follow
/// `primitive_mode`; every other collection follows `color_mode`, matching
/// mode names case-insensitively. A selection that matches nothing falls
/// back to the first mode.
pub fn select_modes(collection: &Collection, options: &ExportOptions) -> Vec<Mode> {
    let modes = &collection.modes;
    let first = || modes.first().cloned().into_iter().collect::<Vec<_>>();

    if collection.is_primitive() {
        match &options.primitive_mode {
            PrimitiveMode::All => modes.clone(),
            PrimitiveMode::First => first(),
            PrimitiveMode::Id(id) => modes
                .iter()
                .find(|m| m.mode_id.as_str() == id)
                .map(|m| vec![m.clone()])
                .unwrap_or_else(first),
        }
    } else {
        let wanted = match options.color_mode {
            ColorMode::All => return modes.clone(),
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        };
        modes
            .iter()
            .find(|m| m.name.to_lowercase() == wanted)
            .map(|m| vec![m.clone()])
            .unwrap_or_else(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CollectionId;

    fn collection(name: &str, modes: &[(&str, &str)]) -> Collection {
        Collection {
            id: CollectionId::new("VariableCollectionId:1"),
            name: name.to_string(),
            modes: modes.iter().map(|(id, name)| Mode::new(*id, *name)).collect(),
            variable_ids: vec![],
        }
    }

    fn names(modes: Vec<Mode>) -> Vec<String> {
        modes.into_iter().map(|m| m.name).collect()
    }

    #[test]
    fn test_primitive_defaults_to_first() {
        let c = collection("Primitives", &[("1:0", "Base"), ("1:1", "Brand B")]);
        assert_eq!(names(select_modes(&c, &ExportOptions::default())), vec!["Base"]);
    }

    #[test]
    fn test_primitive_all_and_by_id() {
        let c = collection("Core PRIMITIVES", &[("1:0", "Base"), ("1:1", "Brand B")]);

        let mut options = ExportOptions {
            primitive_mode: PrimitiveMode::All,
            ..Default::default()
        };
        assert_eq!(names(select_modes(&c, &options)), vec!["Base", "Brand B"]);

        options.primitive_mode = PrimitiveMode::Id("1:1".to_string());
        assert_eq!(names(select_modes(&c, &options)), vec!["Brand B"]);

        options.primitive_mode = PrimitiveMode::Id("9:9".to_string());
        assert_eq!(names(select_modes(&c, &options)), vec!["Base"]);
    }

    #[test]
    fn test_themed_light_dark() {
        let c = collection("Semantic", &[("2:0", "Light"), ("2:1", "DARK")]);

        let mut options = ExportOptions::default();
        assert_eq!(names(select_modes(&c, &options)), vec!["Light", "DARK"]);

        options.color_mode = ColorMode::Dark;
        assert_eq!(names(select_modes(&c, &options)), vec!["DARK"]);

        options.color_mode = ColorMode::Light;
        assert_eq!(names(select_modes(&c, &options)), vec!["Light"]);
    }

    #[test]
    fn test_themed_fallback_to_first() {
        let c = collection("Semantic", &[("2:0", "Day"), ("2:1", "Night")]);
        let options = ExportOptions {
            color_mode: ColorMode::Dark,
            ..Default::default()
        };
        assert_eq!(names(select_modes(&c, &options)), vec!["Day"]);
    }

    #[test]
    fn test_themed_ignores_primitive_mode() {
        let c = collection("Semantic", &[("2:0", "Light"), ("2:1", "Dark")]);
        let options = ExportOptions {
            primitive_mode: PrimitiveMode::Id("2:1".to_string()),
            ..Default::default()
        };
        assert_eq!(select_modes(&c, &options).len(), 2);
    }
}
