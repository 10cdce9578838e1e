//! Record operations against the LarkBase (Feishu Bitable) REST API for workflow hosts.

mod prelude;

pub mod base;
pub mod error;
pub mod execution;
pub mod ops;
pub mod settings;
pub mod utils;

pub use base::item::{Item, JsonMap, OutputItem, PairedItem};
pub use base::spec::{
    FieldAssignment, MappingMode, NodeParameters, OperationKind, ParameterSource, RecordKind,
    Resource, SpecString, ValuesToSend,
};
pub use error::{Error, NodeOperationError, Result};
pub use execution::executor::{ExecutionContext, LarkBaseNode, NodeOutput};
pub use execution::stats::ExecutionStats;
pub use ops::transport::{ApiRequest, HttpTransport, Method, ServiceResponse, Transport};
pub use settings::{PageSizeBounds, Settings};
