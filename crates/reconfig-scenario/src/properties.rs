//! Property registration table.
//!
//! Scenario files attach properties to modules as a JSON object keyed by
//! property name. A [`PropertyRegistry`] maps each name to a parser that
//! produces a value-typed [`ModuleProperty`].

use crate::error::ScenarioError;
use indexmap::{IndexMap, IndexSet};
use reconfig_core::{Color, ModuleProperty, PropertySet};
use reconfig_lattice::ModuleRecord;
use serde_json::{Map, Value};

/// Parses one property value. Errors are plain reasons; the registry adds
/// the key.
pub type PropertyParser = fn(&Value) -> Result<ModuleProperty, String>;

/// Name → parser table for module properties.
#[derive(Clone, Debug, Default)]
pub struct PropertyRegistry {
    parsers: IndexMap<String, PropertyParser>,
}

impl PropertyRegistry {
    /// An empty registry. Every property key is rejected.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in property kind (`colorProperty`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("colorProperty", parse_color);
        registry
    }

    /// Register (or replace) the parser for `key`.
    pub fn register(&mut self, key: &str, parser: PropertyParser) {
        self.parsers.insert(key.to_string(), parser);
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.parsers.keys().map(String::as_str)
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// Whether no kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Parse a module's `properties` object.
    pub fn parse(&self, defs: &Map<String, Value>) -> Result<PropertySet, ScenarioError> {
        let mut set = PropertySet::new();
        for (key, value) in defs {
            let parser = self
                .parsers
                .get(key)
                .ok_or_else(|| ScenarioError::UnknownProperty { key: key.clone() })?;
            let prop = parser(value).map_err(|reason| ScenarioError::InvalidProperty {
                key: key.clone(),
                reason,
            })?;
            set.insert(prop);
        }
        Ok(set)
    }
}

/// Colors accepted as a packed `0xRRGGBB` integer, an `[r, g, b]` array,
/// or a `"#rrggbb"` string.
fn parse_color(value: &Value) -> Result<ModuleProperty, String> {
    let color = match value {
        Value::Number(n) => {
            let v = n
                .as_u64()
                .filter(|v| *v <= 0xff_ffff)
                .ok_or_else(|| format!("{n} is not a 24-bit color"))?;
            Color::from_int(v as u32)
        }
        Value::Array(parts) => {
            let [r, g, b] = parts.as_slice() else {
                return Err(format!("expected [r, g, b], got {} entries", parts.len()));
            };
            let channel = |v: &Value| {
                v.as_u64()
                    .and_then(|c| u8::try_from(c).ok())
                    .ok_or_else(|| format!("channel {v} is not in 0..=255"))
            };
            Color::new(channel(r)?, channel(g)?, channel(b)?)
        }
        Value::String(s) => {
            let hex = s
                .strip_prefix('#')
                .filter(|h| h.len() == 6)
                .ok_or_else(|| format!("'{s}' is not of the form #rrggbb"))?;
            let v = u32::from_str_radix(hex, 16).map_err(|e| format!("'{s}': {e}"))?;
            Color::from_int(v)
        }
        other => return Err(format!("unsupported color value {other}")),
    };
    Ok(ModuleProperty::Color(color))
}

/// Distinct colors carried by `modules`, in order of first appearance.
pub fn palette(modules: &[ModuleRecord]) -> Vec<Color> {
    modules
        .iter()
        .filter_map(|m| m.properties.color())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn color_forms_agree() {
        let reg = PropertyRegistry::with_builtins();
        let expected = PropertySet::new().with(ModuleProperty::Color(Color::new(255, 128, 0)));
        for v in [json!(0xff8000), json!([255, 128, 0]), json!("#ff8000")] {
            let set = reg.parse(&props(json!({ "colorProperty": v }))).unwrap();
            assert_eq!(set, expected);
        }
    }

    #[test]
    fn bad_colors_are_rejected() {
        let reg = PropertyRegistry::with_builtins();
        for v in [json!([1, 2]), json!([256, 0, 0]), json!("red"), json!(true), json!(-1)] {
            let err = reg.parse(&props(json!({ "colorProperty": v }))).unwrap_err();
            assert!(matches!(err, ScenarioError::InvalidProperty { .. }), "{err}");
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let reg = PropertyRegistry::with_builtins();
        let err = reg.parse(&props(json!({ "weight": 3 }))).unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownProperty { key } if key == "weight"));
        assert!(PropertyRegistry::new()
            .parse(&props(json!({ "colorProperty": 1 })))
            .is_err());
    }

    #[test]
    fn empty_object_gives_empty_set() {
        let reg = PropertyRegistry::with_builtins();
        assert!(reg.parse(&Map::new()).unwrap().is_empty());
        assert_eq!(reg.keys().collect::<Vec<_>>(), ["colorProperty"]);
    }
}
