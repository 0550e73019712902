//! Programmatic JSON -> [`FieldNode`]
//!
//! The gateway renders every SBOR value as an object tagged with `kind`.
//! Scalars carry `value` (or `hex` for byte strings), composites carry
//! `fields` or `elements`, maps carry `entries` of `{key, value}` pairs.

use serde_json::{Map, Value};

use crate::core::{FieldNode, LedgerError, LedgerResult, NodeBody};

pub fn decode_programmatic_json(value: &Value) -> LedgerResult<FieldNode> {
    let object = value
        .as_object()
        .ok_or_else(|| malformed(format!("expected an object, found {}", value)))?;

    let kind = object
        .get("kind")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("value without `kind`".to_string()))?
        .to_string();
    let field_name = object
        .get("field_name")
        .and_then(Value::as_str)
        .map(str::to_string);

    let body = if let Some(entries) = object.get("entries") {
        NodeBody::Entries(decode_entries(&kind, entries)?)
    } else if let Some(children) = object.get("fields").or_else(|| object.get("elements")) {
        NodeBody::Fields {
            variant: variant_of(object),
            fields: decode_list(&kind, children)?,
        }
    } else if let Some(scalar) = object.get("value").or_else(|| object.get("hex")) {
        NodeBody::Leaf(scalar_string(&kind, scalar)?)
    } else if object.contains_key("variant_id") {
        // Payload-less enum variant, e.g. `None`
        NodeBody::Fields {
            variant: variant_of(object),
            fields: Vec::new(),
        }
    } else {
        return Err(malformed(format!("unrecognised {} value", kind)));
    };

    Ok(FieldNode {
        kind,
        field_name,
        body,
    })
}

fn decode_list(kind: &str, children: &Value) -> LedgerResult<Vec<FieldNode>> {
    children
        .as_array()
        .ok_or_else(|| malformed(format!("{} children are not an array", kind)))?
        .iter()
        .map(decode_programmatic_json)
        .collect()
}

fn decode_entries(kind: &str, entries: &Value) -> LedgerResult<Vec<(FieldNode, FieldNode)>> {
    entries
        .as_array()
        .ok_or_else(|| malformed(format!("{} entries are not an array", kind)))?
        .iter()
        .map(|entry| {
            let key = entry
                .get("key")
                .ok_or_else(|| malformed(format!("{} entry without key", kind)))?;
            let value = entry
                .get("value")
                .ok_or_else(|| malformed(format!("{} entry without value", kind)))?;
            Ok((decode_programmatic_json(key)?, decode_programmatic_json(value)?))
        })
        .collect()
}

fn variant_of(object: &Map<String, Value>) -> Option<String> {
    object
        .get("variant_name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            object.get("variant_id").map(|id| match id {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        })
}

fn scalar_string(kind: &str, scalar: &Value) -> LedgerResult<String> {
    match scalar {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(malformed(format!("{} value is not a scalar: {}", kind, other))),
    }
}

fn malformed(message: String) -> LedgerError {
    LedgerError::Malformed(message)
}
