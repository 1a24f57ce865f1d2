use crate::event::Key;

/// One row of a feature-definition table.
///
/// Layout: `id | name | tbl | typ | val | data_type | feat_func | args`.
/// The `(tbl, typ)` pair is the feature key matched against fact keys and
/// event types. `args` is JSON-or-bare-scalar: a list, a map, an atomic
/// scalar, or `Null` when absent. Multiple definitions may share a key.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatureDefinition {
    pub id: i64,
    pub name: String,
    pub table: String,
    pub typ: String,
    pub value: Option<String>,
    pub data_type: Option<String>,
    pub function: String,
    pub args: serde_json::Value,
}

impl FeatureDefinition {
    /// The feature key used to match facts and events.
    pub fn key(&self) -> Key {
        Key::new(self.table.clone(), self.typ.clone())
    }
}
