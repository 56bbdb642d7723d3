use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Presentation settings for rendering label text.
///
/// Backed by a JSON object addressed with dotted paths (`text.lineClass`, `svg.width`, ...).
/// Nothing here is consulted by the parser or the sanitizer.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgmarkConfig(Value);

impl Default for SvgmarkConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl SvgmarkConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Parses a JSON document. The top level must be an object.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(Error::ConfigNotObject);
        }
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    /// Writes `value` at `dotted_path`, replacing any non-object found on the way.
    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        let (parents, leaf) = match dotted_path.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, dotted_path),
        };
        let mut cur = &mut self.0;
        for key in parents.into_iter().flat_map(|p| p.split('.')) {
            cur = object_mut(cur)
                .entry(key)
                .or_insert_with(|| Value::Object(Map::new()));
        }
        object_mut(cur).insert(leaf.to_string(), value);
    }

    /// Overlays `layer` onto this config. Objects merge key by key; any other value in `layer`
    /// replaces what was there.
    pub fn merge(&mut self, layer: SvgmarkConfig) {
        merge_into(&mut self.0, layer.0);
    }
}

fn object_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("coerced to an object above"),
    }
}

fn merge_into(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base_map), Value::Object(layer_map)) => {
            for (key, value) in layer_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_into(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
