pub mod error;
pub mod routes;
pub mod sse;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/analyze", post(routes::analyze))
        .route("/api/statistics", get(routes::global_statistics))
        .route("/api/statistics/{video_id}", get(routes::video_statistics))
        .route("/api/comments/{video_id}", get(routes::filtered_comments))
        .route(
            "/api/saved-comments/{video_id}",
            get(routes::saved_comments).delete(routes::delete_saved_comments),
        )
        .route("/api/view", get(routes::current_view))
        .route("/sse", get(sse::sse_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AnalysisClient;
    use crate::config::{ApiConfig, WebConfig};
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VIDEO: &str = "dQw4w9WgXcQ";

    fn router_for(server: &MockServer) -> Router {
        let client = AnalysisClient::new(&ApiConfig {
            base_url: server.uri(),
            timeout_secs: 5,
            default_max_comments: 100,
        })
        .unwrap();
        create_router(AppState::new(client, &WebConfig::default()))
    }

    async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn comments_on(video: &str, toxic: usize, clean: usize) -> Value {
        let mut comments: Vec<Value> = (0..toxic)
            .map(|i| json!({"comment_id": format!("t{i}"), "video_id": video, "is_toxic": true, "like_count": i}))
            .collect();
        comments.extend(
            (0..clean).map(|i| json!({"comment_id": format!("c{i}"), "video_id": video, "sentiment_type": "positive"})),
        );
        json!({ "comments": comments })
    }

    #[tokio::test]
    async fn global_statistics_fetches_both_resources() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sentiment-analyzer/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(comments_on(VIDEO, 3, 7)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/video-statistics/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "video_statistics": [{"video_id": VIDEO, "total_comments": 10, "mean_likes": 1.0}]
            })))
            .mount(&server)
            .await;
        let router = router_for(&server);

        let (status, body) = call(&router, Method::GET, "/api/statistics", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cards"]["total_comments"], 10);
        assert_eq!(body["cards"]["toxic_rate"], 30.0);
        assert_eq!(body["cards"]["high_risk_videos"], 1);
        assert_eq!(body["problematic_videos"][0]["risk_level"], "High");

        let (status, view) = call(&router, Method::GET, "/api/view", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["global"]["cards"]["total_videos"], 1);
        assert!(view["video"].is_null());
    }

    #[tokio::test]
    async fn video_statistics_clamps_page_and_recomputes_missing_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/sentiment-analyzer/video/{VIDEO}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(comments_on(VIDEO, 1, 24)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/video-statistics/video/{VIDEO}")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "missing"})))
            .mount(&server)
            .await;
        let router = router_for(&server);

        let uri = format!("/api/statistics/{VIDEO}?page=99");
        let (status, body) = call(&router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["comments"]["page"], 3);
        assert_eq!(body["comments"]["total_pages"], 3);
        assert_eq!(body["comments"]["items"].as_array().unwrap().len(), 5);
        assert_eq!(body["summary"]["total_comments"], 25);
        assert_eq!(body["risk"]["level"], "Minimal");
        assert_eq!(body["cards"]["sarcasm_candidates"], 0);
    }

    #[tokio::test]
    async fn invalid_video_id_is_bad_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let router = router_for(&server);

        let (status, body) = call(&router, Method::GET, "/api/statistics/nope", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);

        let (status, _) = call(
            &router,
            Method::POST,
            "/api/analyze",
            Some(json!({"url_or_id": "https://example.com/video"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sentiment-analyzer/all"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/video-statistics/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"video_statistics": []})))
            .mount(&server)
            .await;
        let router = router_for(&server);

        let (status, body) = call(&router, Method::GET, "/api/statistics", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], 502);

        let (_, view) = call(&router, Method::GET, "/api/view", None).await;
        assert!(view["global"].is_null());
    }

    #[tokio::test]
    async fn comments_endpoint_applies_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/sentiment-analyzer/video/{VIDEO}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(comments_on(VIDEO, 2, 3)))
            .mount(&server)
            .await;
        let router = router_for(&server);

        let uri = format!("/api/comments/{VIDEO}?category=toxic");
        let (status, body) = call(&router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["categories"], json!(["toxic"]));
    }

    #[tokio::test]
    async fn health_reports_upstream_down_without_failing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let router = router_for(&server);

        let (status, body) = call(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["upstream"], "down");
    }
}
