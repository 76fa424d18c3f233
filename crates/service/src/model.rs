use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ServiceError;

use common::utils::path::is_safe_segment;

/// File suffix every collection item carries on disk.
pub const ITEM_SUFFIX: &str = ".json";

/// A collection member as exposed over the wire: the file name minus
/// [`ITEM_SUFFIX`] and the parsed file content.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NamedItem {
    pub name: String,
    pub preset: Value,
}

/// Write request for a collection item. Both fields are optional at this
/// stage; the collection's [`ValidationRule`] decides what is required.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemInput {
    pub name: Option<String>,
    pub preset: Option<Value>,
}

impl ItemInput {
    pub fn new(name: impl Into<String>, preset: Value) -> Self {
        Self { name: Some(name.into()), preset: Some(preset) }
    }

    /// Lenient extraction from a request body: non-object bodies, non-string
    /// names and `null` payloads all count as absent.
    pub fn from_body(body: &Value) -> Self {
        let name = body.get("name").and_then(Value::as_str).map(str::to_owned);
        let preset = body.get("preset").filter(|v| !v.is_null()).cloned();
        Self { name, preset }
    }
}

/// Human-facing names of a resource, used in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceLabels {
    /// Capitalized form, e.g. `Preset` in "Preset not found".
    pub title: &'static str,
    pub singular: &'static str,
    pub plural: &'static str,
}

pub const SETTINGS_LABELS: ResourceLabels =
    ResourceLabels { title: "Settings", singular: "settings", plural: "settings" };
pub const PRESET_LABELS: ResourceLabels =
    ResourceLabels { title: "Preset", singular: "preset", plural: "presets" };
pub const THEME_LABELS: ResourceLabels =
    ResourceLabels { title: "Theme", singular: "theme", plural: "themes" };

/// Per-collection precondition checked before any filesystem access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationRule {
    /// Only `name` is mandatory; a missing payload is stored as `null`.
    NameRequired,
    /// Both `name` and `preset` must be present. Empty payloads (`false`,
    /// `0`, `""`) count as missing.
    NameAndPayloadRequired,
}

impl ValidationRule {
    /// Check `input` and split it into the name and the payload to persist.
    pub fn check(self, input: ItemInput, labels: &ResourceLabels) -> Result<(String, Value), ServiceError> {
        let name = input.name.filter(|n| !n.is_empty());
        match (self, name, input.preset) {
            (ValidationRule::NameRequired, Some(name), preset) => Ok((name, preset.unwrap_or(Value::Null))),
            (ValidationRule::NameRequired, None, _) => {
                Err(ServiceError::validation(format!("name is required in {}", labels.singular)))
            }
            (ValidationRule::NameAndPayloadRequired, Some(name), Some(preset)) if !is_blank(&preset) => {
                Ok((name, preset))
            }
            (ValidationRule::NameAndPayloadRequired, _, _) => {
                Err(ServiceError::validation("Both name and preset are required"))
            }
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Reject item names that would resolve outside the collection directory,
/// or that already carry [`ITEM_SUFFIX`] (`foo.json` would be stored as
/// `foo.json.json` and listed under a different name).
pub fn ensure_item_name<'a>(name: &'a str, labels: &ResourceLabels) -> Result<&'a str, ServiceError> {
    if is_safe_segment(name) && !name.ends_with(ITEM_SUFFIX) {
        Ok(name)
    } else {
        Err(ServiceError::validation(format!("Invalid {} name", labels.singular)))
    }
}
