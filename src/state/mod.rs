//! State module for tracking crawl progress
//!
//! Every URL a crawl session touches carries a [`PageState`]. Rejections
//! record a [`RejectReason`] for the crawl report.

mod page_state;

// Re-export main types
pub use page_state::{PageState, RejectReason};
