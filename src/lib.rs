//! `knack-proxy-http` is an async HTTP client for the Soluntech Knack proxy.
//!
//! Every call goes through one retrying executor: server errors (status
//! 500 and above) are re-issued up to three times, everything else is
//! returned to the caller as-is. The record helpers are thin wrappers:
//! - [`KnackProxyClient::find`] / [`KnackProxyClient::find_by_id`]
//! - [`KnackProxyClient::create`] / [`KnackProxyClient::update`]
//! - [`KnackProxyClient::delete`] / [`KnackProxyClient::delete_multiple`]
//! - [`KnackProxyClient::upload`]

mod client;
mod error;
mod fields;
mod options;
mod query;
mod request;
mod retry;
mod types;

pub use client::KnackProxyClient;
pub use error::KnackProxyError;
pub use fields::FieldType;
pub use options::{ClientOptions, Environment, DEFAULT_PROXY_URL};
pub use query::{Filter, FindQuery, RowsPerPage, SortOrder};
pub use retry::{RETRY_LIMIT, SERVER_ERROR_THRESHOLD};
pub use request::{FileUpload, RequestBody, RequestDescriptor, APP_ID_HEADER, UPLOAD_FIELD};
pub use types::{AssetType, Record, RecordsPage, UploadedAsset};

pub type Result<T> = std::result::Result<T, KnackProxyError>;
