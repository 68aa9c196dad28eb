pub mod newsapi;
pub mod openai;
pub mod source_client;
