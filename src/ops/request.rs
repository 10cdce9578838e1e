use crate::base::item::{Item, JsonMap};
use crate::base::spec::{NodeParameters, OperationKind};
use crate::ops::payload;
use crate::prelude::*;

/// Locates one table within a Base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub app_token: String,
    pub table_id: String,
}

impl TableRef {
    pub fn new(app_token: impl Into<String>, table_id: impl Into<String>) -> Result<Self> {
        let app_token = app_token.into();
        let table_id = table_id.into();
        if app_token.trim().is_empty() {
            return Err(Error::MissingParameter("appToken"));
        }
        if table_id.trim().is_empty() {
            return Err(Error::MissingParameter("tableId"));
        }
        Ok(Self {
            app_token,
            table_id,
        })
    }

    pub fn records_path(&self) -> String {
        format!(
            "apps/{}/tables/{}/records",
            urlencoding::encode(&self.app_token),
            urlencoding::encode(&self.table_id)
        )
    }

    pub fn record_path(&self, record_id: &str) -> String {
        format!(
            "{}/{}",
            self.records_path(),
            urlencoding::encode(record_id)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub return_all: bool,
    pub limit: u32,
}

/// A record operation carrying exactly the inputs it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordRequest {
    Create { fields: JsonMap },
    Get { record_id: String },
    GetAll { list: ListParams },
    Update { record_id: String, fields: JsonMap },
    Delete { record_id: String },
}

impl RecordRequest {
    pub fn resolve(params: &NodeParameters, item: &Item) -> Result<Self> {
        let fields = || {
            payload::build(
                params.kind_type_records,
                params.mapping_column_mode,
                params.values_to_send.fields.as_deref(),
                item,
            )
        };
        let request = match params.operation {
            OperationKind::Create => RecordRequest::Create { fields: fields() },
            OperationKind::Get => RecordRequest::Get {
                record_id: required_record_id(params)?,
            },
            OperationKind::GetAll => RecordRequest::GetAll {
                list: ListParams {
                    return_all: params.return_all,
                    limit: params.limit,
                },
            },
            OperationKind::Update => RecordRequest::Update {
                record_id: required_record_id(params)?,
                fields: fields(),
            },
            OperationKind::Delete => RecordRequest::Delete {
                record_id: required_record_id(params)?,
            },
        };
        Ok(request)
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            RecordRequest::Create { .. } => OperationKind::Create,
            RecordRequest::Get { .. } => OperationKind::Get,
            RecordRequest::GetAll { .. } => OperationKind::GetAll,
            RecordRequest::Update { .. } => OperationKind::Update,
            RecordRequest::Delete { .. } => OperationKind::Delete,
        }
    }
}

fn required_record_id(params: &NodeParameters) -> Result<String> {
    params
        .record_id
        .as_ref()
        .filter(|id| !id.trim().is_empty())
        .cloned()
        .ok_or(Error::MissingParameter("recordId"))
}

/// Everything needed to perform one item's operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemOperation {
    pub table: TableRef,
    pub credential: String,
    pub request: RecordRequest,
}

impl ItemOperation {
    pub fn resolve(params: &NodeParameters, item: &Item) -> Result<Self> {
        let credential = params.tenant_access_token.resolve("tenantAccessToken")?;
        let table = TableRef::new(params.app_token.clone(), params.table_id.clone())?;
        let request = RecordRequest::resolve(params, item)?;
        Ok(Self {
            table,
            credential,
            request,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::spec::{FieldAssignment, MappingMode, RecordKind, SpecString, ValuesToSend};
    use serde_json::json;

    fn params(operation: OperationKind) -> NodeParameters {
        NodeParameters {
            operation,
            tenant_access_token: SpecString::Literal("t-token".to_string()),
            app_token: "bascn123".to_string(),
            table_id: "tbl456".to_string(),
            ..Default::default()
        }
    }

    fn alice() -> Item {
        let JsonValue::Object(map) = json!({ "name": "Alice" }) else {
            unreachable!()
        };
        Item::new(map)
    }

    #[test]
    fn test_create_manual_mapping() {
        let mut p = params(OperationKind::Create);
        p.values_to_send = ValuesToSend {
            fields: Some(vec![FieldAssignment::new("name", "Bob")]),
        };
        let op = ItemOperation::resolve(&p, &alice()).unwrap();
        assert_eq!(op.credential, "t-token");
        assert_eq!(op.table.table_id, "tbl456");
        let RecordRequest::Create { fields } = op.request else {
            panic!("expected create");
        };
        assert_eq!(JsonValue::Object(fields), json!({ "name": "Bob" }));
    }

    #[test]
    fn test_update_raw_data() {
        let mut p = params(OperationKind::Update);
        p.record_id = Some("rec1".to_string());
        p.kind_type_records = RecordKind::SendRawData;
        p.mapping_column_mode = MappingMode::MapEachColumnManually;
        let request = RecordRequest::resolve(&p, &alice()).unwrap();
        assert_eq!(
            request,
            RecordRequest::Update {
                record_id: "rec1".to_string(),
                fields: alice().json,
            }
        );
        assert_eq!(request.kind(), OperationKind::Update);
    }

    #[test]
    fn test_record_id_required() {
        for operation in [OperationKind::Get, OperationKind::Update, OperationKind::Delete] {
            let mut p = params(operation);
            assert!(matches!(
                RecordRequest::resolve(&p, &alice()),
                Err(Error::MissingParameter("recordId"))
            ));
            p.record_id = Some("   ".to_string());
            assert!(matches!(
                RecordRequest::resolve(&p, &alice()),
                Err(Error::MissingParameter("recordId"))
            ));
        }
    }

    #[test]
    fn test_get_all_carries_list_params() {
        let mut p = params(OperationKind::GetAll);
        p.return_all = true;
        p.limit = 20;
        assert_eq!(
            RecordRequest::resolve(&p, &Item::default()).unwrap(),
            RecordRequest::GetAll {
                list: ListParams {
                    return_all: true,
                    limit: 20,
                }
            }
        );
    }

    #[test]
    fn test_table_ref_required() {
        let mut p = params(OperationKind::Create);
        p.app_token = String::new();
        assert!(matches!(
            ItemOperation::resolve(&p, &alice()),
            Err(Error::MissingParameter("appToken"))
        ));
        let mut p = params(OperationKind::Create);
        p.table_id = " ".to_string();
        assert!(matches!(
            ItemOperation::resolve(&p, &alice()),
            Err(Error::MissingParameter("tableId"))
        ));
        let mut p = params(OperationKind::Create);
        p.tenant_access_token = SpecString::default();
        assert!(matches!(
            ItemOperation::resolve(&p, &alice()),
            Err(Error::MissingParameter("tenantAccessToken"))
        ));
    }

    #[test]
    fn test_paths_are_encoded() {
        let table = TableRef::new("app/1", "tbl 2").unwrap();
        assert_eq!(table.records_path(), "apps/app%2F1/tables/tbl%202/records");
        assert_eq!(
            table.record_path("rec?x"),
            "apps/app%2F1/tables/tbl%202/records/rec%3Fx"
        );
    }
}
