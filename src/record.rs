//! Raw census records and typed field access.
//!
//! A [`Record`] is the unit a [`CensusSource`](crate::source::CensusSource)
//! hands back for one entity instance. The cache layers never look inside
//! it; interpreting the fields is the job of each entity's
//! [`from_record`](crate::entity::CensusEntity::from_record).
//!
//! The census API serialises most scalars as strings (`"42"`, `"1"`,
//! `"0.75"`). The [`Fields`] accessors accept both the string and the native
//! JSON form, and treat `null` the same as a missing key.

use crate::error::{Error, Result};
use crate::locale::LocaleData;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Immutable field-name → value mapping for one entity instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Record(Map::new())
    }

    /// Wrap a JSON value; only objects are records.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Record(map)),
            other => Err(Error::FetchError(format!(
                "expected a JSON object for a record, got {}",
                other
            ))),
        }
    }

    /// Builder-style insert, mostly useful for fixtures.
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// Raw value of a top-level field. `null` reads as absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    /// Raw value at a dotted path such as `name.en`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }

    /// Textual form of the scalar at `path`, as used for term matching.
    pub fn text(&self, path: &str) -> Option<String> {
        self.lookup(path).and_then(scalar_text)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Typed accessors that report failures against `collection`.
    pub fn fields<'a>(&'a self, collection: &'a str) -> Fields<'a> {
        Fields {
            record: self,
            collection,
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record(map)
    }
}

/// Scalars as text. Booleans use the census `"1"`/`"0"` convention.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        _ => None,
    }
}

/// Typed, schema-checked view over a [`Record`].
///
/// Required accessors fail with [`Error::SchemaError`]; `opt_*` accessors
/// return `Ok(None)` for missing fields but still fail on a value of the
/// wrong shape.
#[derive(Clone, Copy)]
pub struct Fields<'a> {
    record: &'a Record,
    collection: &'a str,
}

impl<'a> Fields<'a> {
    fn missing(&self, field: &str) -> Error {
        Error::schema(self.collection, field, "required field is missing")
    }

    fn invalid(&self, field: &str, expected: &str, value: &Value) -> Error {
        Error::schema(
            self.collection,
            field,
            format!("expected {}, found {}", expected, value),
        )
    }

    pub fn opt_int(&self, field: &str) -> Result<Option<i64>> {
        let Some(value) = self.record.get(field) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| self.invalid(field, "an integer", value))
    }

    pub fn int(&self, field: &str) -> Result<i64> {
        self.opt_int(field)?.ok_or_else(|| self.missing(field))
    }

    pub fn opt_float(&self, field: &str) -> Result<Option<f64>> {
        let Some(value) = self.record.get(field) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| self.invalid(field, "a number", value))
    }

    pub fn float(&self, field: &str) -> Result<f64> {
        self.opt_float(field)?.ok_or_else(|| self.missing(field))
    }

    pub fn opt_boolean(&self, field: &str) -> Result<Option<bool>> {
        let Some(value) = self.record.get(field) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|n| n != 0),
            Value::String(s) => match s.trim() {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            },
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| self.invalid(field, "a boolean", value))
    }

    pub fn boolean(&self, field: &str) -> Result<bool> {
        self.opt_boolean(field)?.ok_or_else(|| self.missing(field))
    }

    pub fn opt_string(&self, field: &str) -> Result<Option<String>> {
        match self.record.get(field) {
            None => Ok(None),
            Some(value) => scalar_text(value)
                .map(Some)
                .ok_or_else(|| self.invalid(field, "a string", value)),
        }
    }

    pub fn string(&self, field: &str) -> Result<String> {
        self.opt_string(field)?.ok_or_else(|| self.missing(field))
    }

    /// Localised strings; `None` when the field is absent or `null`.
    pub fn opt_locale(&self, field: &str) -> Result<Option<LocaleData>> {
        match self.record.get(field) {
            None => Ok(None),
            Some(value @ Value::Object(_)) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|_| self.invalid(field, "localised strings", value)),
            Some(value) => Err(self.invalid(field, "localised strings", value)),
        }
    }

    /// Localised strings; a `null` payload reads as [`LocaleData::empty`].
    pub fn locale(&self, field: &str) -> Result<LocaleData> {
        Ok(self.opt_locale(field)?.unwrap_or_default())
    }

    /// Numbered fields `{prefix}1..={prefix}N` as an ordered sequence.
    pub fn params<const N: usize>(&self, prefix: &str) -> [Option<String>; N] {
        std::array::from_fn(|i| {
            self.record
                .get(&format!("{}{}", prefix, i + 1))
                .and_then(scalar_text)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weapon_record() -> Record {
        Record::from_value(json!({
            "weapon_id": "80",
            "turn_modifier": "1.0",
            "equip_ms": 500,
            "is_vehicle_weapon": "0",
            "heat_capacity": null,
            "name": {"en": "Gauss SAW"},
            "param1": "12",
            "param3": 7,
        }))
        .expect("object")
    }

    #[test]
    fn test_census_strings_are_accepted() {
        let record = weapon_record();
        let fields = record.fields("weapon");

        assert_eq!(fields.int("weapon_id").unwrap(), 80);
        assert_eq!(fields.int("equip_ms").unwrap(), 500);
        assert_eq!(fields.float("turn_modifier").unwrap(), 1.0);
        assert!(!fields.boolean("is_vehicle_weapon").unwrap());
        assert_eq!(fields.locale("name").unwrap().get("en"), Some("Gauss SAW"));
    }

    #[test]
    fn test_null_reads_as_absent() {
        let record = weapon_record();
        let fields = record.fields("weapon");

        assert_eq!(fields.opt_int("heat_capacity").unwrap(), None);
        assert!(!record.contains("heat_capacity"));
        assert!(fields.locale("description").unwrap().is_empty());
    }

    #[test]
    fn test_missing_required_field_is_schema_error() {
        let record = weapon_record();
        let err = record.fields("weapon").int("weapon_group_id").unwrap_err();

        match err {
            Error::SchemaError {
                collection, field, ..
            } => {
                assert_eq!(collection, "weapon");
                assert_eq!(field, "weapon_group_id");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_type_is_schema_error() {
        let record = Record::new().with("equip_ms", "fast");
        assert!(matches!(
            record.fields("weapon").opt_int("equip_ms"),
            Err(Error::SchemaError { .. })
        ));
    }

    #[test]
    fn test_params_sequence() {
        let record = weapon_record();
        let params: [Option<String>; 4] = record.fields("weapon").params("param");

        assert_eq!(
            params,
            [Some("12".to_string()), None, Some("7".to_string()), None]
        );
    }

    #[test]
    fn test_dotted_lookup() {
        let record = weapon_record();
        assert_eq!(record.text("name.en"), Some("Gauss SAW".to_string()));
        assert_eq!(record.text("name.de"), None);
        assert_eq!(record.text("weapon_id"), Some("80".to_string()));
        assert_eq!(record.text("is_vehicle_weapon.x"), None);
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(Record::from_value(json!([1, 2])).is_err());
    }
}
