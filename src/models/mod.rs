mod news;
mod summary;

pub use news::*;
pub use summary::{Sentiment, SourceRef, SummaryRequest, SummaryResult};
