//! Typed field access for [`Record`] values.
//!
//! Most platform field types keep a structured copy under `<field>_raw`.
//! Missing or empty structured values are replaced with a shape-compatible
//! empty value so callers can index into the result unconditionally.

use serde_json::{json, Value};

use crate::Record;

/// Platform field type used to pick the extraction rule.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldType {
    Raw,
    Number,
    Date,
    Name,
    Email,
    Image,
    File,
    Address,
    Connection,
    /// Formatted value stored under the bare field key.
    Text,
}

impl Record {
    /// Returns the value of `field` interpreted as `kind`.
    pub fn field_value(&self, field: &str, kind: FieldType) -> Value {
        let raw = self.get(&format!("{field}_raw"));
        match kind {
            FieldType::Text => self.get(field).cloned().unwrap_or(Value::Null),
            FieldType::Raw | FieldType::Number => raw.cloned().unwrap_or(Value::Null),
            FieldType::Date => or_empty(raw, json!({})),
            FieldType::Name => or_empty(raw, json!({ "first": "", "last": "" })),
            FieldType::Email => match raw {
                Some(value) if !is_falsy(value) => {
                    value.get("email").cloned().unwrap_or(Value::Null)
                }
                _ => Value::Null,
            },
            FieldType::Image | FieldType::File => or_empty(raw, json!({ "url": "" })),
            FieldType::Address => or_empty(
                raw,
                json!({ "city": "", "state": "", "street": "", "street2": "", "zip": "" }),
            ),
            FieldType::Connection => connection_value(raw),
        }
    }

    /// Identifier of the first connected record, if any.
    pub fn connection_id(&self, field: &str) -> Option<String> {
        match self.field_value(field, FieldType::Connection) {
            Value::Object(map) => map.get("id").and_then(Value::as_str).map(str::to_owned),
            Value::Array(items) => items
                .first()
                .and_then(|item| item.get("id"))
                .and_then(Value::as_str)
                .map(str::to_owned),
            _ => None,
        }
    }
}

fn connection_value(raw: Option<&Value>) -> Value {
    let empty = json!({ "id": null, "identifier": "" });
    match raw {
        Some(Value::Array(items)) => match items.as_slice() {
            [] => empty,
            [single] => single.clone(),
            _ => Value::Array(items.clone()),
        },
        other => or_empty(other, empty),
    }
}

fn or_empty(raw: Option<&Value>, empty: Value) -> Value {
    match raw {
        Some(value) if !is_falsy(value) => value.clone(),
        _ => empty,
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
