use crate::base::item::{Item, OutputItem};
use crate::base::spec::ParameterSource;
use crate::error::NodeOperationError;
use crate::execution::stats::{Counter, ExecutionStats};
use crate::ops::dispatcher::Dispatcher;
use crate::ops::request::ItemOperation;
use crate::ops::transport::{ApiRequest, ServiceResponse, Transport};
use crate::prelude::*;
use crate::settings::PageSizeBounds;

/// Host state for one invocation of the node.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionContext {
    /// Turn item failures into `{error}` items instead of aborting the run.
    pub continue_on_fail: bool,
}

#[derive(Debug)]
pub struct NodeOutput {
    pub items: Vec<OutputItem>,
    pub stats: ExecutionStats,
}

/// Counts every request handed to the inner transport, whatever its outcome.
struct CountingTransport<'a> {
    inner: &'a dyn Transport,
    sent: &'a Counter,
}

#[async_trait]
impl<'a> Transport for CountingTransport<'a> {
    async fn execute(&self, request: &ApiRequest) -> Result<ServiceResponse> {
        self.sent.inc(1);
        self.inner.execute(request).await
    }
}

/// Runs record operations for a batch of items, one item at a time.
pub struct LarkBaseNode<T: Transport> {
    transport: T,
    page_size: PageSizeBounds,
}

impl<T: Transport> LarkBaseNode<T> {
    pub fn new(transport: T, page_size: PageSizeBounds) -> Self {
        Self {
            transport,
            page_size,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn execute<P: ParameterSource + ?Sized>(
        &self,
        context: &ExecutionContext,
        params: &P,
        items: &[Item],
    ) -> std::result::Result<NodeOutput, NodeOperationError> {
        let stats = ExecutionStats::default();
        let transport = CountingTransport {
            inner: &self.transport,
            sent: &stats.num_requests,
        };
        let dispatcher = Dispatcher::new(&transport, self.page_size);
        let mut output = Vec::with_capacity(items.len());

        for (item_index, item) in items.iter().enumerate() {
            match execute_item(&dispatcher, params, item_index, item).await {
                Ok(json) => {
                    stats.num_succeeded.inc(1);
                    output.push(OutputItem::new(json, item_index));
                }
                Err(error) => {
                    stats.num_failed.inc(1);
                    let outcome = if error.is_parameter_error() {
                        "rejected"
                    } else {
                        "failed"
                    };
                    if !context.continue_on_fail {
                        error!("item {item_index} {outcome}, aborting run: {error}");
                        return Err(NodeOperationError::new(item_index, error));
                    }
                    warn!("item {item_index} {outcome}, continuing: {error}");
                    output.push(OutputItem::error(error.to_string(), item_index));
                }
            }
        }

        info!("LarkBase run finished, {stats}");
        Ok(NodeOutput {
            items: output,
            stats,
        })
    }
}

async fn execute_item<P: ParameterSource + ?Sized>(
    dispatcher: &Dispatcher<'_>,
    params: &P,
    item_index: usize,
    item: &Item,
) -> Result<JsonValue> {
    let params = params.parameters(item_index)?;
    let operation = ItemOperation::resolve(&params, item)?;
    debug!(
        "item {item_index}: {} on table {}",
        operation.request.kind(),
        operation.table.table_id
    );
    let response = dispatcher.dispatch(&operation).await?;
    Ok(serde_json::to_value(response)?)
}
