use crate::ops::fetcher;
use crate::ops::request::{ItemOperation, ListParams, RecordRequest, TableRef};
use crate::ops::transport::{ApiRequest, Method, PAGE_SIZE, ServiceResponse, Transport};
use crate::prelude::*;
use crate::settings::PageSizeBounds;

use serde_json::json;

/// Turns resolved record operations into calls on the transport.
pub struct Dispatcher<'a> {
    transport: &'a dyn Transport,
    page_size: PageSizeBounds,
}

impl<'a> Dispatcher<'a> {
    pub fn new(transport: &'a dyn Transport, page_size: PageSizeBounds) -> Self {
        Self {
            transport,
            page_size,
        }
    }

    /// The request for the operation; for a list-all, the first page's request.
    pub fn api_request(&self, op: &ItemOperation) -> ApiRequest {
        let table = &op.table;
        let token = op.credential.as_str();
        match &op.request {
            RecordRequest::Create { fields } => {
                ApiRequest::new(Method::Post, table.records_path(), token)
                    .with_body(json!({ "fields": fields }))
            }
            RecordRequest::Get { record_id } => {
                ApiRequest::new(Method::Get, table.record_path(record_id), token)
            }
            RecordRequest::GetAll { list } => self.list_request(table, token, list),
            RecordRequest::Update { record_id, fields } => {
                ApiRequest::new(Method::Put, table.record_path(record_id), token)
                    .with_body(json!({ "fields": fields }))
            }
            RecordRequest::Delete { record_id } => {
                ApiRequest::new(Method::Delete, table.record_path(record_id), token)
            }
        }
    }

    fn list_request(&self, table: &TableRef, token: &str, list: &ListParams) -> ApiRequest {
        let request = ApiRequest::new(Method::Get, table.records_path(), token);
        if list.return_all {
            return request;
        }
        let page_size = self.page_size.clamp(list.limit);
        if page_size != list.limit {
            warn!(
                "limit {} is outside [{}, {}], using {page_size}",
                list.limit, self.page_size.min, self.page_size.max
            );
        }
        request.with_query(PAGE_SIZE, page_size.to_string())
    }

    /// Sends the operation's request, or walks every page of a list-all.
    pub async fn dispatch(&self, op: &ItemOperation) -> Result<ServiceResponse> {
        let request = self.api_request(op);
        if let RecordRequest::GetAll {
            list: ListParams {
                return_all: true, ..
            },
        } = op.request
        {
            let fetched = fetcher::fetch_all(self.transport, request).await?;
            return Ok(fetched.response);
        }
        self.transport.execute(&request).await?.ensure_success()
    }
}
