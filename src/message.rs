//! Inbound host messages and their JSON boundary.

use anyhow::{Result, anyhow};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::menu::{CategoriesData, CategoryEntry, CategoryKind, OptionEntry};

/// Commands pushed by the host into the overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostMessage {
    /// Replace all menu data and show the overlay.
    Display {
        categories: CategoriesData,
        category_order: Vec<String>,
    },
    /// Hide the overlay, keeping its data.
    Hide,
}

/// Raw message shape as sent by the host. Payload fields stay untyped here
/// so that one malformed entry cannot reject the whole message.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
enum WireMessage {
    Display {
        #[serde(default)]
        categories: Value,
        #[serde(default, rename = "categoryOrder")]
        category_order: Value,
    },
    Hide,
}

impl HostMessage {
    /// Parse one JSON message, applying defaults for missing fields.
    pub fn parse(raw: &str) -> Result<Self> {
        let wire: WireMessage =
            serde_json::from_str(raw).map_err(|e| anyhow!("invalid host message: {e}"))?;
        Ok(wire.into())
    }
}

impl From<WireMessage> for HostMessage {
    fn from(wire: WireMessage) -> Self {
        match wire {
            WireMessage::Display {
                categories,
                category_order,
            } => HostMessage::Display {
                categories: convert_categories(categories),
                category_order: convert_order(category_order),
            },
            WireMessage::Hide => HostMessage::Hide,
        }
    }
}

fn convert_categories(raw: Value) -> CategoriesData {
    let map = match raw {
        Value::Object(map) => map,
        Value::Null => return CategoriesData::new(),
        other => {
            tracing::warn!("categories is not an object: {other}");
            return CategoriesData::new();
        }
    };
    map.into_iter()
        .filter_map(|(key, raw)| {
            let Value::Object(fields) = raw else {
                tracing::warn!("dropping category {key}: not an object");
                return None;
            };
            let entry = convert_category(&key, fields);
            Some((key, entry))
        })
        .collect()
}

fn convert_order(raw: Value) -> Vec<String> {
    match raw {
        Value::Array(keys) => keys.iter().filter_map(as_text).collect(),
        Value::Null => vec![],
        other => {
            tracing::warn!("categoryOrder is not an array: {other}");
            vec![]
        }
    }
}

fn convert_category(key: &str, mut fields: Map<String, Value>) -> CategoryEntry {
    let kind = match fields.get("type").and_then(Value::as_str) {
        Some("input") => CategoryKind::Input,
        _ => CategoryKind::List,
    };
    let options = match fields.remove("options") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|o| convert_option(key, o))
            .collect(),
        Some(Value::Null) | None => vec![],
        Some(other) => {
            tracing::warn!("category {key}: options is not an array: {other}");
            vec![]
        }
    };

    CategoryEntry {
        display_name: fields
            .get("displayName")
            .and_then(as_text)
            .unwrap_or_else(|| key.to_string()),
        kind,
        // modType is opaque and forwarded in its textual form.
        mod_type: fields.get("modType").and_then(as_text).unwrap_or_default(),
        options,
        current_index: fields.get("currentIndex").and_then(as_integer),
    }
}

fn convert_option(key: &str, raw: &Value) -> Option<OptionEntry> {
    let Some(index) = raw.get("index").and_then(as_integer) else {
        tracing::warn!("dropping option without usable index in category {key}");
        return None;
    };
    Some(OptionEntry {
        name: raw.get("name").and_then(as_text).unwrap_or_default(),
        index,
    })
}

/// Text form of a scalar; integral numbers drop their fraction (`23.0` → `"23"`).
fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(_) => Some(
            as_integer(v)
                .map(|i| i.to_string())
                .unwrap_or_else(|| v.to_string()),
        ),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accept integers either as JSON numbers or integer strings.
fn as_integer(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display() {
        let raw = r#"{
            "action": "display",
            "categories": {
                "livery": {
                    "displayName": "Livery",
                    "type": "list",
                    "modType": "48",
                    "options": [{"name": "Stock", "index": -1}, {"name": "Police", "index": 0}],
                    "currentIndex": 0
                },
                "callsign": {"displayName": "Callsign", "type": "input"}
            },
            "categoryOrder": ["livery", "callsign"]
        }"#;
        let HostMessage::Display {
            categories,
            category_order,
        } = HostMessage::parse(raw).unwrap()
        else {
            panic!("expected display");
        };
        assert_eq!(category_order, vec!["livery", "callsign"]);
        let livery = &categories["livery"];
        assert_eq!(livery.kind, CategoryKind::List);
        assert_eq!(livery.mod_type, "48");
        assert_eq!(livery.options.len(), 2);
        assert_eq!(livery.current_index, Some(0));
        let callsign = &categories["callsign"];
        assert_eq!(callsign.kind, CategoryKind::Input);
        assert!(callsign.options.is_empty());
        assert_eq!(callsign.current_index, None);
    }

    #[test]
    fn test_parse_hide() {
        assert_eq!(
            HostMessage::parse(r#"{"action":"hide"}"#).unwrap(),
            HostMessage::Hide
        );
    }

    #[test]
    fn test_parse_display_defaults() {
        let msg = HostMessage::parse(r#"{"action":"display"}"#).unwrap();
        assert_eq!(
            msg,
            HostMessage::Display {
                categories: CategoriesData::new(),
                category_order: vec![],
            }
        );
    }

    #[test]
    fn test_parse_lenient_fields() {
        let raw = r#"{"action":"display","categories":{"wheels":{
            "type":"something","modType":23,
            "options":[{"name":"A","index":"3"},{"name":"B"},{"name":"C","index":4.0}],
            "currentIndex":"4"}}}"#;
        let HostMessage::Display { categories, .. } = HostMessage::parse(raw).unwrap() else {
            panic!("expected display");
        };
        let wheels = &categories["wheels"];
        assert_eq!(wheels.display_name, "wheels");
        assert_eq!(wheels.kind, CategoryKind::List);
        assert_eq!(wheels.mod_type, "23");
        assert_eq!(
            wheels.options.iter().map(|o| o.index).collect::<Vec<_>>(),
            vec![3, 4]
        );
        assert_eq!(wheels.current_index, Some(4));
    }

    #[test]
    fn test_parse_badly_typed_fields_are_defaulted() {
        let raw = r#"{"action":"display","categories":{
            "a":{"displayName":"A","options":null,"currentIndex":0},
            "b":{"displayName":7,"modType":23.0,"options":[{"name":12,"index":0},{"name":"ok","index":1}]},
            "c":"broken"},
            "categoryOrder":["a","b",5,null]}"#;
        let HostMessage::Display {
            categories,
            category_order,
        } = HostMessage::parse(raw).unwrap()
        else {
            panic!("expected display");
        };
        assert_eq!(category_order, vec!["a", "b", "5"]);
        assert!(categories["a"].options.is_empty());
        assert_eq!(categories["a"].current_index, Some(0));

        let b = &categories["b"];
        assert_eq!(b.display_name, "7");
        assert_eq!(b.mod_type, "23");
        assert_eq!(
            b.options.iter().map(|o| o.name.as_str()).collect::<Vec<_>>(),
            vec!["12", "ok"]
        );
        // A non-object category is dropped; the rest of the message survives.
        assert!(!categories.contains_key("c"));
    }

    #[test]
    fn test_parse_non_object_payloads() {
        let msg =
            HostMessage::parse(r#"{"action":"display","categories":null,"categoryOrder":"a"}"#)
                .unwrap();
        assert_eq!(
            msg,
            HostMessage::Display {
                categories: CategoriesData::new(),
                category_order: vec![],
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_action() {
        assert!(HostMessage::parse(r#"{"action":"explode"}"#).is_err());
        assert!(HostMessage::parse("not json").is_err());
    }
}
