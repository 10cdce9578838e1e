pub mod http;
pub mod retryable;
pub mod slow_warn;
