pub mod aggregator;
pub mod feed_parser;
pub mod mock_data;
pub mod normalizer;
pub mod rate_limiter;
pub mod summary_engine;
pub mod vocabulary;
