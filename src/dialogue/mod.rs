//! Player chat responses
//!
//! Rule-based replies come from a fixed table; any pluggable generator's output
//! goes through the same `ResponseFilter`.

pub mod filter;
pub mod generator;
pub mod responses;

pub use filter::{truncate, ResponseFilter};
pub use generator::{ResponseContext, ResponseGenerator, RuleResponder};
pub use responses::{canned_response, MessageBucket};
