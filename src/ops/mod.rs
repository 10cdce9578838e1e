pub mod dispatcher;
pub mod fetcher;
pub mod payload;
pub mod request;
pub mod transport;
