use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{error::FlowPropsError, intern::SourceId, Result};

pub const SOURCE_KEY: &str = "source";
pub const INHERITS_KEY: &str = "inherits";

/// The serialized shape of a flow property record
///
/// `source` is always written (as `null` when absent), `inherits` only when
/// there is a parent source. Reading is permissive: a missing key, or a value
/// that isn't a string, reads as absent. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowPropsRecord {
    #[serde(default, deserialize_with = "lenient_source_id")]
    pub source: Option<SourceId>,

    #[serde(
        default,
        deserialize_with = "lenient_source_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub inherits: Option<SourceId>,
}

impl FlowPropsRecord {
    /// Parse a record out of a generic value, which must be a mapping
    pub fn from_value(value: &Value) -> Result<Self> {
        value
            .as_object()
            .map(Self::from_map)
            .ok_or_else(|| FlowPropsError::expected("object", value))
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            source: string_field(map, SOURCE_KEY),
            inherits: string_field(map, INHERITS_KEY),
        }
    }

    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            SOURCE_KEY.to_string(),
            self.source
                .as_ref()
                .map_or(Value::Null, |source| Value::String(source.to_string())),
        );
        if let Some(inherits) = &self.inherits {
            map.insert(INHERITS_KEY.to_string(), Value::String(inherits.to_string()));
        }
        map
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<SourceId> {
    map.get(key).and_then(Value::as_str).map(SourceId::from)
}

fn lenient_source_id<'de, D>(deserializer: D) -> std::result::Result<Option<SourceId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(SourceId::from(value)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_to_map_key_order_and_omission() {
        let record = FlowPropsRecord {
            source: Some("flowA.job".into()),
            inherits: Some("common.properties".into()),
        };
        let map = record.to_map();
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, vec!["source", "inherits"]);

        let record = FlowPropsRecord {
            source: Some("flowA.job".into()),
            inherits: None,
        };
        assert_eq!(Value::Object(record.to_map()), json!({"source": "flowA.job"}));
    }

    #[test]
    fn test_absent_source_is_written_as_null() {
        let record = FlowPropsRecord::default();
        assert_eq!(Value::Object(record.to_map()), json!({"source": null}));
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({"source": null}));
    }

    #[test]
    fn test_from_map_ignores_wrong_types_and_unknown_keys() {
        let value = json!({"source": 42, "inherits": ["a"], "extra": "ignored"});
        let record = FlowPropsRecord::from_value(&value).unwrap();
        assert_eq!(record, FlowPropsRecord::default());
    }

    #[test]
    fn test_from_value_rejects_non_mapping() {
        for value in [json!(null), json!("flowA.job"), json!([{"source": "a"}]), json!(7)] {
            let err = FlowPropsRecord::from_value(&value).unwrap_err();
            assert!(matches!(err, FlowPropsError::InvalidFormat(_)));
        }
    }

    #[test]
    fn test_serde_deserialize_is_lenient() {
        let record: FlowPropsRecord =
            serde_json::from_str(r#"{"source": "flowA.job", "inherits": false, "x": 1}"#)
                .unwrap();
        assert_eq!(record.source.as_deref(), Some("flowA.job"));
        assert_eq!(record.inherits, None);

        let record: FlowPropsRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, FlowPropsRecord::default());
    }

    #[test]
    fn test_serde_serialize_matches_to_map() {
        let record = FlowPropsRecord {
            source: Some("flowA.job".into()),
            inherits: Some("common.properties".into()),
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            Value::Object(record.to_map())
        );
    }
}
