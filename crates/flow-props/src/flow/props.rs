use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{
    error::FlowPropsError, flow::FlowPropsRecord, intern::SourceId, store::PropertyStore,
    Result,
};

/// Everything adoption changes, replaced in a single assignment
#[derive(Debug, Clone, Default)]
struct Binding {
    source: Option<SourceId>,
    parent_source: Option<SourceId>,
    store: Option<Box<dyn PropertyStore>>,
}

impl Binding {
    fn adopted(store: Box<dyn PropertyStore>) -> Self {
        Self {
            source: Some(store.source_id()),
            parent_source: store.parent().map(|parent| parent.source_id()),
            store: Some(store),
        }
    }
}

/// Provenance of one flow property set
///
/// Records where the set's own properties originate (`source`) and which set
/// they inherit from (`parent_source`). A record either holds identifiers
/// only, or is bound to the [`PropertyStore`] it was adopted from, in which
/// case both identifiers mirror the store's.
///
/// Equality compares the identifiers only; the attached store isn't part of
/// a record's identity and isn't serialized.
#[derive(Debug, Clone, Default)]
pub struct FlowProps {
    binding: Binding,
}

impl FlowProps {
    /// Create a record from identifiers alone, with no store attached
    pub fn new<S: Into<SourceId>>(source: Option<S>, parent_source: Option<S>) -> Self {
        Self {
            binding: Binding {
                source: source.map(Into::into),
                parent_source: parent_source.map(Into::into),
                store: None,
            },
        }
    }

    /// Create a record by adopting `store`
    pub fn from_store(store: impl PropertyStore + 'static) -> Self {
        let mut props = Self::default();
        props.adopt(store);
        props
    }

    /// Like [`FlowProps::from_store`], for callers holding an optional store
    pub fn try_from_store(store: Option<impl PropertyStore + 'static>) -> Result<Self> {
        let store = store.ok_or_else(FlowPropsError::missing_store)?;
        Ok(Self::from_store(store))
    }

    /// Bind this record to `store`
    ///
    /// The store, the source, and the parent source are all replaced
    /// together; nothing from a previously adopted store survives. Changing a
    /// store's identifiers after adopting it isn't reflected here until it's
    /// adopted again.
    pub fn adopt(&mut self, store: impl PropertyStore + 'static) {
        self.adopt_boxed(Box::new(store));
    }

    /// Bind this record to an already boxed store; see [`FlowProps::adopt`]
    pub fn adopt_boxed(&mut self, store: Box<dyn PropertyStore>) {
        self.binding = Binding::adopted(store);
        tracing::trace!(
            source = ?self.binding.source,
            parent_source = ?self.binding.parent_source,
            "Adopted property store"
        );
    }

    /// Like [`FlowProps::adopt`], for callers holding an optional store
    ///
    /// The record is left untouched when the store is absent.
    pub fn try_adopt(&mut self, store: Option<impl PropertyStore + 'static>) -> Result<()> {
        let store = store.ok_or_else(FlowPropsError::missing_store)?;
        self.adopt(store);
        Ok(())
    }

    pub fn source(&self) -> Option<&str> {
        self.binding.source.as_deref()
    }

    pub fn parent_source(&self) -> Option<&str> {
        self.binding.parent_source.as_deref()
    }

    pub fn source_id(&self) -> Option<&SourceId> {
        self.binding.source.as_ref()
    }

    pub fn parent_source_id(&self) -> Option<&SourceId> {
        self.binding.parent_source.as_ref()
    }

    pub fn store(&self) -> Option<&dyn PropertyStore> {
        self.binding.store.as_deref()
    }

    pub fn has_store(&self) -> bool {
        self.binding.store.is_some()
    }

    pub fn to_flow_props_record(&self) -> FlowPropsRecord {
        FlowPropsRecord {
            source: self.binding.source.clone(),
            inherits: self.binding.parent_source.clone(),
        }
    }

    /// Serialize the identifiers into a generic key-value record
    ///
    /// `"source"` is always present (`null` without a source); `"inherits"`
    /// only when there is a parent source.
    pub fn to_record(&self) -> Map<String, Value> {
        self.to_flow_props_record().to_map()
    }

    /// Rebuild a record from a generic value
    ///
    /// Fails only when `value` isn't a mapping. Missing or non-string fields
    /// read as absent. No store is attached.
    pub fn from_record(value: &Value) -> Result<Self> {
        FlowPropsRecord::from_value(value).map(Self::from)
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self::from(FlowPropsRecord::from_map(map))
    }
}

impl From<FlowPropsRecord> for FlowProps {
    fn from(record: FlowPropsRecord) -> Self {
        Self::new(record.source, record.inherits)
    }
}

impl From<&FlowProps> for FlowPropsRecord {
    fn from(props: &FlowProps) -> Self {
        props.to_flow_props_record()
    }
}

impl PartialEq for FlowProps {
    fn eq(&self, other: &Self) -> bool {
        self.binding.source == other.binding.source
            && self.binding.parent_source == other.binding.parent_source
    }
}

impl Eq for FlowProps {}

impl Serialize for FlowProps {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_flow_props_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FlowProps {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        FlowPropsRecord::deserialize(deserializer).map(Self::from)
    }
}
