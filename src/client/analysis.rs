use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::analysis::{normalize, Comment, VideoSummary};
use crate::config::ApiConfig;
use super::error::ClientError;
use super::video_id::VideoId;

/// Client for the upstream comment analysis API. Records are normalized on
/// the way in; no retries.
#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    base_url: String,
    default_max_comments: u32,
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    url_or_id: &'a str,
    max_comments: u32,
}

impl AnalysisClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_max_comments: config.default_max_comments,
        })
    }

    /// Runs upstream analysis on one video. The identifier is validated
    /// before any request goes out.
    pub async fn analyze_video(
        &self,
        url_or_id: &str,
        max_comments: Option<u32>,
    ) -> Result<(VideoId, Vec<Comment>), ClientError> {
        let video_id = VideoId::parse(url_or_id)?;
        let request = AnalyzeRequest {
            url_or_id: video_id.as_str(),
            max_comments: max_comments.unwrap_or(self.default_max_comments),
        };

        let body = self
            .send(self.client.post(self.url("/CommentAnalyzer/")).json(&request))
            .await?;
        let comments = normalize::normalize_all(&body);
        debug!("Analysis of {} returned {} comments", video_id, comments.len());

        Ok((video_id, comments))
    }

    pub async fn all_comments(&self) -> Result<Vec<Comment>, ClientError> {
        let body = self
            .send(self.client.get(self.url("/sentiment-analyzer/all")))
            .await?;
        Ok(normalize::normalize_all(&body))
    }

    pub async fn video_comments(&self, video_id: &VideoId) -> Result<Vec<Comment>, ClientError> {
        let body = self
            .send(self.client.get(self.url(&format!("/sentiment-analyzer/video/{video_id}"))))
            .await?;
        Ok(normalize::normalize_all(&body))
    }

    pub async fn all_video_statistics(&self) -> Result<Vec<VideoSummary>, ClientError> {
        let body = self
            .send(self.client.get(self.url("/video-statistics/all")))
            .await?;
        Ok(normalize::normalize_summaries(&body))
    }

    /// Upstream rollup for one video. A missing rollup is not an error: the
    /// caller recomputes it from comments.
    pub async fn video_statistics(&self, video_id: &VideoId) -> Result<Option<VideoSummary>, ClientError> {
        let result = self
            .send(self.client.get(self.url(&format!("/video-statistics/video/{video_id}"))))
            .await;

        match result {
            Ok(body) => {
                let stats = body.get("statistics").unwrap_or(&body);
                Ok(normalize::normalize_summary(stats))
            }
            Err(ClientError::NotFound(detail)) => {
                debug!("No upstream statistics for {}: {}", video_id, detail);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn saved_comments(&self, video_id: &VideoId) -> Result<Vec<Comment>, ClientError> {
        let body = self
            .send(self.client.get(self.url(&format!("/saved-comments/{video_id}"))))
            .await?;
        Ok(normalize::normalize_all(&body))
    }

    /// Returns the upstream acknowledgement as-is.
    pub async fn delete_saved_comments(&self, video_id: &VideoId) -> Result<Value, ClientError> {
        self.send(self.client.delete(self.url(&format!("/saved-comments/{video_id}"))))
            .await
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        self.send(self.client.get(self.url("/"))).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let detail = error_detail(&text).unwrap_or_else(|| status.to_string());
            if status == StatusCode::NOT_FOUND {
                return Err(ClientError::NotFound(detail));
            }
            warn!("Analysis API returned {}: {}", status, detail);
            return Err(ClientError::Status { status, detail });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// FastAPI-style `{"detail": ...}` bodies, falling back to the raw text.
fn error_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(obj)) => match obj.get("detail") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => Some(body.to_string()),
        },
        _ => Some(body.to_string()),
    }
}
