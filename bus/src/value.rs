use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name to value mapping carried in a message payload.
pub type PayloadMap = BTreeMap<String, WireValue>;

/// Dynamically-typed payload value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<WireValue>),
    Map(PayloadMap),
}

impl WireValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            WireValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            WireValue::Number(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for WireValue {
    fn from(value: &str) -> Self {
        WireValue::String(value.to_string())
    }
}

impl From<String> for WireValue {
    fn from(value: String) -> Self {
        WireValue::String(value)
    }
}

impl From<bool> for WireValue {
    fn from(value: bool) -> Self {
        WireValue::Bool(value)
    }
}

impl From<f64> for WireValue {
    fn from(value: f64) -> Self {
        WireValue::Number(value)
    }
}

/// Typed read access over an optional payload map.
///
/// Every accessor returns `None` when the map is absent, the field is
/// missing, or the value has a different shape. Decoders use `?` for
/// required fields and `unwrap_or` for optional ones.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: Option<&'a PayloadMap>,
}

impl<'a> Fields<'a> {
    pub fn new(map: Option<&'a PayloadMap>) -> Self {
        Self { map }
    }

    pub fn is_present(&self) -> bool {
        self.map.is_some()
    }

    pub fn get(&self, name: &str) -> Option<&'a WireValue> {
        self.map?.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&'a str> {
        self.get(name)?.as_str()
    }

    /// Like [`Fields::str`] but treats an empty string as missing.
    pub fn non_empty_str(&self, name: &str) -> Option<&'a str> {
        self.str(name).filter(|value| !value.is_empty())
    }

    pub fn string(&self, name: &str) -> Option<String> {
        self.str(name).map(str::to_string)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_f64()
    }
}

/// Write access used when encoding payloads for the wire.
#[derive(Debug, Default)]
pub struct FieldsBuilder {
    map: PayloadMap,
}

impl FieldsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: impl Into<WireValue>) -> Self {
        self.map.insert(name.to_string(), value.into());
        self
    }

    /// Inserts the value only when present.
    pub fn set_opt<V: Into<WireValue>>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(name, value),
            None => self,
        }
    }

    pub fn build(self) -> PayloadMap {
        self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_heterogeneous_values() {
        let map: PayloadMap = serde_json::from_str(
            r#"{"a": "x", "b": true, "c": 3, "d": 1.5, "e": null, "f": [1, "y"], "g": {"h": false}}"#,
        )
        .unwrap();

        assert_eq!(map["a"], WireValue::String("x".into()));
        assert_eq!(map["b"], WireValue::Bool(true));
        assert_eq!(map["c"], WireValue::Number(3.0));
        assert_eq!(map["d"], WireValue::Number(1.5));
        assert_eq!(map["e"], WireValue::Null);
        assert_eq!(
            map["f"],
            WireValue::List(vec![WireValue::Number(1.0), WireValue::String("y".into())])
        );
        let WireValue::Map(inner) = &map["g"] else {
            panic!("expected nested map");
        };
        assert_eq!(inner["h"], WireValue::Bool(false));
    }

    #[test]
    fn accessors_reject_wrong_shapes() {
        let map = FieldsBuilder::new()
            .set("name", "kitchen")
            .set("count", 2.0)
            .set("flag", true)
            .set("empty", "")
            .build();
        let fields = Fields::new(Some(&map));

        assert_eq!(fields.str("name"), Some("kitchen"));
        assert_eq!(fields.str("count"), None);
        assert_eq!(fields.bool("name"), None);
        assert_eq!(fields.number("flag"), None);
        assert_eq!(fields.number("count"), Some(2.0));
        assert_eq!(fields.non_empty_str("empty"), None);
        assert_eq!(fields.str("missing"), None);
    }

    #[test]
    fn absent_map_yields_nothing() {
        let fields = Fields::new(None);
        assert!(!fields.is_present());
        assert_eq!(fields.str("id"), None);
        assert_eq!(fields.bool("dismissable"), None);
    }
}
