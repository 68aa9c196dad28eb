use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::SourceError;
use crate::external::source_client::{SourceClient, SourceRequest};

#[derive(Debug, Clone)]
pub enum FakeResponse {
    Body(String),
    Status(u16),
    Timeout,
}

/// Answers by URL; unknown URLs fail like an unreachable host.
#[derive(Default)]
pub struct FakeSourceClient {
    responses: Mutex<HashMap<String, FakeResponse>>,
    calls: Mutex<Vec<SourceRequest>>,
}

impl FakeSourceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, url: &str, response: FakeResponse) -> Self {
        self.responses.lock().insert(url.to_string(), response);
        self
    }

    pub fn calls(&self) -> Vec<SourceRequest> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SourceClient for FakeSourceClient {
    async fn fetch(&self, request: SourceRequest) -> Result<String, SourceError> {
        self.calls.lock().push(request.clone());
        let response = self.responses.lock().get(&request.url).cloned();
        match response {
            Some(FakeResponse::Body(body)) => Ok(body),
            Some(FakeResponse::Status(status)) => Err(SourceError::Upstream {
                status,
                body: format!("{{\"status\":\"error\",\"code\":\"http{}\"}}", status),
            }),
            Some(FakeResponse::Timeout) => Err(SourceError::Timeout(Duration::from_secs(10))),
            None => Err(SourceError::Network("connection refused".to_string())),
        }
    }
}

/// RSS 2.0 document with `count` items titled "<prefix> story N".
pub fn rss_fixture(channel_title: &str, prefix: &str, count: usize) -> String {
    let items: String = (1..=count)
        .map(|i| {
            format!(
                "<item><title>{prefix} story {i}</title>\
                 <link>https://news.example.com/{prefix}/{i}</link>\
                 <description>&lt;p&gt;Body of {prefix} story {i} about technology.&lt;/p&gt;</description>\
                 <pubDate>Tue, 10 Jun 2025 04:00:00 GMT</pubDate></item>"
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <rss version=\"2.0\"><channel><title>{channel_title}</title>\
         <link>https://news.example.com</link><description>fixture</description>\
         {items}</channel></rss>"
    )
}
