//! Observability subsystem
//!
//! Structured JSON line logging plus per-request lifecycle scopes.
//!
//! ```ignore
//! use tabviewer::observability::{Logger, RequestScope};
//!
//! Logger::info("SERVER_LISTENING", &[("addr", "127.0.0.1:8888")]);
//!
//! let scope = RequestScope::new("DATA");
//! // ... load and query ...
//! scope.complete_with_fields(&[("rows", "42")]);
//! ```

mod logger;
mod scope;

pub use logger::{Logger, Severity};
pub use scope::{RequestScope, Timer};
