//! # Content Schema Validation
//!
//! Structural validation of channel metadata payloads. Only the shape is
//! checked: field semantics (URL form, non-empty name) are not.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shared_types::Kind;

use super::entities::{GroupMetadata, Verdict};
use super::errors::SchemaError;

/// Whether `kind` carries channel metadata in its content.
pub fn is_channel_kind(kind: Kind) -> bool {
    kind == Kind::CHANNEL_CREATION || kind == Kind::CHANNEL_METADATA
}

/// Parse channel metadata from event content.
///
/// The content must be a JSON object or `null` (empty metadata). Field names
/// match case-insensitively and every matching key is type-checked. A `null`
/// field value leaves the field empty, as does a `null` relay entry. Unknown
/// fields are ignored.
pub fn parse_metadata(content: &str) -> Result<GroupMetadata, SchemaError> {
    match serde_json::from_str::<Value>(content).map_err(invalid)? {
        Value::Null => Ok(GroupMetadata::default()),
        Value::Object(fields) => decode_fields(fields),
        other => Err(SchemaError {
            detail: format!("expected an object, found {other}"),
        }),
    }
}

fn decode_fields(fields: Map<String, Value>) -> Result<GroupMetadata, SchemaError> {
    let mut meta = GroupMetadata::default();
    for (key, value) in fields {
        match key.to_lowercase().as_str() {
            "name" => set_field(&mut meta.name, value)?,
            "about" => set_field(&mut meta.about, value)?,
            "picture" => set_field(&mut meta.picture, value)?,
            "relays" => {
                let mut relays: Option<Vec<Option<String>>> = None;
                set_field(&mut relays, value)?;
                if let Some(relays) = relays {
                    meta.relays = relays.into_iter().map(Option::unwrap_or_default).collect();
                }
            }
            _ => {}
        }
    }
    Ok(meta)
}

/// Decode `value` into `slot`; `null` leaves the slot untouched.
fn set_field<T: DeserializeOwned>(slot: &mut T, value: Value) -> Result<(), SchemaError> {
    if !value.is_null() {
        *slot = serde_json::from_value(value).map_err(invalid)?;
    }
    Ok(())
}

fn invalid(e: serde_json::Error) -> SchemaError {
    SchemaError {
        detail: e.to_string(),
    }
}

/// Validate the content of a channel event.
///
/// Events of any other kind are not this validator's concern and pass.
pub fn validate_content(kind: Kind, content: &str) -> Verdict {
    if !is_channel_kind(kind) {
        return Verdict::accept();
    }
    parse_metadata(content).map(|_| ()).into()
}
