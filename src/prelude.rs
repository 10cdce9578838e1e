#![allow(unused_imports)]

pub(crate) use crate::error::{Error, Result};
pub(crate) use async_trait::async_trait;
pub(crate) use log::{debug, error, info, trace, warn};
pub(crate) use serde::{Deserialize, Serialize};
pub(crate) use serde_json::Value as JsonValue;
