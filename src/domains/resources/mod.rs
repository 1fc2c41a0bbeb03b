//! Resources domain module.
//!
//! The server exposes its API documentation as static markdown resources
//! under `rebillia://docs/*` so clients can read base URLs, auth, pagination,
//! and enum references without fetching external URLs.

mod error;
mod store;

pub use error::ResourceError;
pub use store::{ApiDoc, DOC_KEYS, DOCS_URI_PREFIX, all_docs, doc_by_key, find_doc};
