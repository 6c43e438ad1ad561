use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{error::FlowPropsError, flow::FlowProps, intern::SourceId, Result};

/// Key under which a flow document lists its property records
pub const PROPS_KEY: &str = "props";

/// The property records of one flow, indexed by source
///
/// Records keep the order they were inserted in. Inserting a record whose
/// source is already present replaces the earlier one in place. Records
/// without a source are kept, but can't be looked up.
#[derive(Debug, Clone, Default)]
pub struct FlowPropsSet {
    records: Vec<FlowProps>,
    index: HashMap<SourceId, usize>,
}

impl FlowPropsSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, returning the one it replaced
    pub fn insert(&mut self, props: FlowProps) -> Option<FlowProps> {
        let Some(source) = props.source_id().cloned() else {
            self.records.push(props);
            return None;
        };

        if let Some(&position) = self.index.get(&source) {
            return Some(std::mem::replace(&mut self.records[position], props));
        }

        self.index.insert(source, self.records.len());
        self.records.push(props);
        None
    }

    pub fn get(&self, source: &str) -> Option<&FlowProps> {
        self.index
            .get(source)
            .and_then(|&position| self.records.get(position))
    }

    /// The record named by `source`'s parent source
    pub fn parent_of(&self, source: &str) -> Option<&FlowProps> {
        self.get(source)
            .and_then(FlowProps::parent_source)
            .and_then(|parent| self.get(parent))
    }

    /// Follow `inherits` links starting at `source`
    ///
    /// The chain starts with `source` itself and is empty when no record has
    /// that source. It ends at a record without a parent, at a parent source
    /// no record in this set provides (which is still included), or just
    /// before an identifier would repeat.
    pub fn inheritance_chain(&self, source: &str) -> Vec<SourceId> {
        let Some(start) = self.get(source).and_then(FlowProps::source_id) else {
            return Vec::new();
        };

        let mut chain = vec![start.clone()];
        let mut seen: HashSet<&SourceId> = HashSet::from([start]);
        let mut current = self.get(source);

        while let Some(parent) = current.and_then(FlowProps::parent_source_id) {
            if !seen.insert(parent) {
                tracing::warn!(
                    "Inheritance of {} loops back to {}",
                    chain[0],
                    parent
                );
                break;
            }
            chain.push(parent.clone());
            current = self.get(parent);
        }

        chain
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlowProps> {
        self.records.iter()
    }

    /// Sources of every indexed record, in insertion order
    pub fn sources(&self) -> impl Iterator<Item = &SourceId> {
        self.records.iter().filter_map(FlowProps::source_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Array(
            self.records
                .iter()
                .map(|props| Value::Object(props.to_record()))
                .collect(),
        )
    }

    /// Parse a list of records
    ///
    /// `value` must be an array whose elements are all mappings.
    pub fn from_value(value: &Value) -> Result<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| FlowPropsError::expected("array", value))?;

        items.iter().map(FlowProps::from_record).collect()
    }

    /// Read the records embedded in a flow document
    ///
    /// A document without a `"props"` entry (or with a `null` one) has no
    /// records.
    pub fn from_flow_document(document: &Value) -> Result<Self> {
        let document = document
            .as_object()
            .ok_or_else(|| FlowPropsError::expected("object", document))?;

        match document.get(PROPS_KEY) {
            None | Some(Value::Null) => Ok(Self::new()),
            Some(props) => Self::from_value(props),
        }
    }

    /// Write the records into a flow document, replacing any existing list
    pub fn embed_in(&self, document: &mut Map<String, Value>) {
        document.insert(PROPS_KEY.to_string(), self.to_value());
    }
}

impl FromIterator<FlowProps> for FlowPropsSet {
    fn from_iter<I: IntoIterator<Item = FlowProps>>(iter: I) -> Self {
        let mut set = Self::new();
        for props in iter {
            set.insert(props);
        }
        set
    }
}

impl<'a> IntoIterator for &'a FlowPropsSet {
    type Item = &'a FlowProps;
    type IntoIter = std::slice::Iter<'a, FlowProps>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl PartialEq for FlowPropsSet {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Serialize for FlowPropsSet {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.records.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FlowPropsSet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let records = Vec::<FlowProps>::deserialize(deserializer)?;
        Ok(records.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn props(source: &str, parent: Option<&str>) -> FlowProps {
        FlowProps::new(Some(source), parent)
    }

    fn sample_set() -> FlowPropsSet {
        [
            props("flowA.job", Some("team.properties")),
            props("team.properties", Some("global.properties")),
            props("global.properties", None),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_insert_and_get() {
        let set = sample_set();

        assert_eq!(set.len(), 3);
        assert_eq!(
            set.get("flowA.job").and_then(FlowProps::parent_source),
            Some("team.properties")
        );
        assert!(set.get("missing.job").is_none());
    }

    #[test]
    fn test_insert_replaces_same_source_in_place() {
        let mut set = sample_set();

        let replaced = set.insert(props("team.properties", None));
        assert_eq!(
            replaced,
            Some(props("team.properties", Some("global.properties")))
        );
        assert_eq!(set.len(), 3);

        let sources: Vec<&str> = set.sources().map(|s| s.as_str()).collect();
        assert_eq!(
            sources,
            vec!["flowA.job", "team.properties", "global.properties"]
        );
    }

    #[test]
    fn test_records_without_source_are_kept_unindexed() {
        let mut set = FlowPropsSet::new();
        set.insert(FlowProps::new(None, Some("common.properties")));
        set.insert(FlowProps::default());

        assert_eq!(set.len(), 2);
        assert_eq!(set.sources().count(), 0);
    }

    #[test]
    fn test_parent_of() {
        let set = sample_set();

        assert_eq!(
            set.parent_of("flowA.job").and_then(FlowProps::source),
            Some("team.properties")
        );
        assert!(set.parent_of("global.properties").is_none());
    }

    #[test]
    fn test_inheritance_chain() {
        let set = sample_set();

        let chain = set.inheritance_chain("flowA.job");
        let chain: Vec<&str> = chain.iter().map(|id| id.as_str()).collect();
        assert_eq!(
            chain,
            vec!["flowA.job", "team.properties", "global.properties"]
        );
        assert!(set.inheritance_chain("missing.job").is_empty());
    }

    #[test]
    fn test_inheritance_chain_includes_unknown_parent() {
        let set: FlowPropsSet = [props("flowA.job", Some("elsewhere.properties"))]
            .into_iter()
            .collect();

        assert_eq!(
            set.inheritance_chain("flowA.job"),
            vec![SourceId::new("flowA.job"), SourceId::new("elsewhere.properties")]
        );
    }

    #[test]
    fn test_inheritance_chain_stops_at_cycle() {
        let set: FlowPropsSet = [
            props("a.properties", Some("b.properties")),
            props("b.properties", Some("a.properties")),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            set.inheritance_chain("a.properties"),
            vec![SourceId::new("a.properties"), SourceId::new("b.properties")]
        );
    }

    #[test]
    fn test_flow_document_round_trip() {
        let set = sample_set();
        let mut document = Map::new();
        document.insert("id".to_string(), json!("flowA"));
        set.embed_in(&mut document);

        assert_eq!(
            document[PROPS_KEY],
            json!([
                {"source": "flowA.job", "inherits": "team.properties"},
                {"source": "team.properties", "inherits": "global.properties"},
                {"source": "global.properties"},
            ])
        );

        let parsed = FlowPropsSet::from_flow_document(&Value::Object(document)).unwrap();
        assert_eq!(parsed, set);
    }

    #[test]
    fn test_from_flow_document_without_props() {
        let set = FlowPropsSet::from_flow_document(&json!({"id": "flowA"})).unwrap();
        assert!(set.is_empty());

        let set = FlowPropsSet::from_flow_document(&json!({"props": null})).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_from_flow_document_rejects_bad_shapes() {
        for document in [
            json!(["not", "a", "document"]),
            json!({"props": {"source": "flowA.job"}}),
            json!({"props": [{"source": "flowA.job"}, "flowB.job"]}),
        ] {
            let err = FlowPropsSet::from_flow_document(&document).unwrap_err();
            assert!(matches!(err, FlowPropsError::InvalidFormat(_)));
        }
    }

    #[test]
    fn test_serde_as_list() {
        let set = sample_set();
        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(value, set.to_value());

        let parsed: FlowPropsSet = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, set);
        assert!(parsed.get("team.properties").is_some());
    }
}
