//! Cursor-driven retrieval of every page of a record listing.

use crate::ops::transport::{ApiRequest, PAGE_SIZE, PAGE_TOKEN, ServiceResponse, Transport};
use crate::prelude::*;

#[derive(Debug)]
pub struct FetchedRecords {
    /// The first page's response, holding every fetched item once more than one page was read.
    pub response: ServiceResponse,
    pub pages: usize,
}

impl FetchedRecords {
    pub fn records(&self) -> &[JsonValue] {
        self.response.items()
    }
}

/// Requests pages until the service reports no further pages.
///
/// A response claiming more pages without a cursor ends the loop. The number
/// of pages is bounded only by the service's signals.
pub async fn fetch_all(transport: &dyn Transport, first_page: ApiRequest) -> Result<FetchedRecords> {
    let mut first_page = first_page;
    first_page.query.retain(|(k, _)| k != PAGE_SIZE && k != PAGE_TOKEN);

    let mut response = transport.execute(&first_page).await?.ensure_success()?;
    let mut pages = 1;
    let Some(mut cursor) = response.next_cursor().map(str::to_owned) else {
        return Ok(FetchedRecords { response, pages });
    };

    let mut records = response.take_items();
    loop {
        let request = first_page.clone().with_query(PAGE_TOKEN, cursor);
        let mut page = transport.execute(&request).await?.ensure_success()?;
        pages += 1;
        records.extend(page.take_items());
        trace!("fetched page {pages}, {} records so far", records.len());

        match page.next_cursor() {
            Some(next) => cursor = next.to_owned(),
            None => break,
        }
    }

    debug!("fetched {} records in {pages} pages", records.len());
    response.set_all_items(records);
    Ok(FetchedRecords { response, pages })
}
