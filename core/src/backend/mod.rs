//! Quote Service Backends
//!
//! Abstraction over the remote quotation service.

mod quotable;
mod traits;

pub use quotable::{QuotableBackend, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
pub use traits::{BackendError, QuoteBackend};
