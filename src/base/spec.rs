use crate::error::{Error, Result};

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SpecString {
    /// The value comes from the environment variable.
    Env { env: String },
    /// The value is defined by the literal string.
    Literal(String),
}

impl Default for SpecString {
    fn default() -> Self {
        SpecString::Literal(String::new())
    }
}

impl SpecString {
    /// Resolves the value, rejecting empty results as a missing parameter.
    pub fn resolve(&self, name: &'static str) -> Result<String> {
        let value = match self {
            SpecString::Literal(s) => s.clone(),
            SpecString::Env { env } => std::env::var(env).map_err(|e| {
                Error::invalid_parameter(name, format!("environment variable `{env}`: {e}"))
            })?,
        };
        if value.trim().is_empty() {
            return Err(Error::MissingParameter(name));
        }
        Ok(value)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    #[default]
    Record,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    #[default]
    Create,
    Get,
    GetAll,
    Update,
    Delete,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OperationKind::Create => "create",
            OperationKind::Get => "get",
            OperationKind::GetAll => "getAll",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        };
        write!(f, "{name}")
    }
}

/// How the fields of a created or updated record are obtained.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    #[default]
    MapEachColumns,
    SendRawData,
}

/// Only consulted when the record kind is `MapEachColumns`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MappingMode {
    #[default]
    MapEachColumnManually,
    AutoMapByColumnNames,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldAssignment {
    pub field_id: String,
    #[serde(default)]
    pub field_value: String,
}

impl FieldAssignment {
    pub fn new(field_id: impl Into<String>, field_value: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            field_value: field_value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValuesToSend {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldAssignment>>,
}

/// User-facing parameters of the node, as resolved for one item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeParameters {
    pub resource: Resource,
    pub operation: OperationKind,
    pub tenant_access_token: SpecString,
    pub app_token: String,
    pub table_id: String,
    pub kind_type_records: RecordKind,
    pub mapping_column_mode: MappingMode,
    pub values_to_send: ValuesToSend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub limit: u32,
    pub return_all: bool,
}

impl Default for NodeParameters {
    fn default() -> Self {
        Self {
            resource: Resource::default(),
            operation: OperationKind::default(),
            tenant_access_token: SpecString::default(),
            app_token: String::new(),
            table_id: String::new(),
            kind_type_records: RecordKind::default(),
            mapping_column_mode: MappingMode::default(),
            values_to_send: ValuesToSend::default(),
            record_id: None,
            limit: DEFAULT_LIMIT,
            return_all: false,
        }
    }
}

/// Supplies the parameters in effect for each item index.
pub trait ParameterSource {
    fn parameters(&self, item_index: usize) -> Result<NodeParameters>;
}

impl ParameterSource for NodeParameters {
    fn parameters(&self, _item_index: usize) -> Result<NodeParameters> {
        Ok(self.clone())
    }
}

/// One parameter set per item, addressed by position.
impl ParameterSource for [NodeParameters] {
    fn parameters(&self, item_index: usize) -> Result<NodeParameters> {
        self.get(item_index).cloned().ok_or_else(|| {
            Error::invalid_parameter(
                "parameters",
                format!("no parameters supplied for item {item_index}"),
            )
        })
    }
}

impl ParameterSource for Vec<NodeParameters> {
    fn parameters(&self, item_index: usize) -> Result<NodeParameters> {
        self.as_slice().parameters(item_index)
    }
}
