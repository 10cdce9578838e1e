//! Assembly of the field set sent on record create and update.

use crate::base::item::{Item, JsonMap};
use crate::base::spec::{FieldAssignment, MappingMode, RecordKind};

use serde_json::Value as JsonValue;

/// The closed set of ways a record payload can be assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadStrategy<'a> {
    /// Explicit (field id, value) pairs; later duplicates overwrite earlier ones.
    Manual(&'a [FieldAssignment]),
    /// The item's own mapping, keys assumed to match the table's fields.
    AutoMap,
    /// The item's mapping forwarded verbatim.
    RawData,
}

impl<'a> PayloadStrategy<'a> {
    /// The mapping mode is only consulted for `MapEachColumns`.
    pub fn select(
        kind: RecordKind,
        mode: MappingMode,
        explicit_fields: Option<&'a [FieldAssignment]>,
    ) -> Self {
        match (kind, mode) {
            (RecordKind::MapEachColumns, MappingMode::MapEachColumnManually) => {
                PayloadStrategy::Manual(explicit_fields.unwrap_or_default())
            }
            (RecordKind::MapEachColumns, MappingMode::AutoMapByColumnNames) => {
                PayloadStrategy::AutoMap
            }
            (RecordKind::SendRawData, _) => PayloadStrategy::RawData,
        }
    }

    pub fn assemble(&self, item: &Item) -> JsonMap {
        match self {
            PayloadStrategy::Manual(fields) => {
                let mut payload = JsonMap::new();
                for field in fields.iter() {
                    payload.insert(
                        field.field_id.clone(),
                        JsonValue::String(field.field_value.clone()),
                    );
                }
                payload
            }
            PayloadStrategy::AutoMap | PayloadStrategy::RawData => item.json.clone(),
        }
    }
}

pub fn build(
    kind: RecordKind,
    mode: MappingMode,
    explicit_fields: Option<&[FieldAssignment]>,
    raw_item: &Item,
) -> JsonMap {
    PayloadStrategy::select(kind, mode, explicit_fields).assemble(raw_item)
}
