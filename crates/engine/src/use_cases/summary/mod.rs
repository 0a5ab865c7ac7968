//! Campaign summary use cases.

mod summarize;

pub use summarize::{SummarizeError, SummarizeRoom};
