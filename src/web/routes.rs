use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::analysis::projections::{self, CommentFilter};
use crate::analysis::report::CommentView;
use crate::analysis::{Comment, GlobalReport, VideoReport};
use crate::client::{ClientError, VideoId};
use super::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeBody {
    pub url_or_id: String,
    pub max_comments: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Serialize)]
pub struct HealthView {
    status: &'static str,
    upstream: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

#[derive(Serialize)]
pub struct CurrentView {
    global: Option<GlobalReport>,
    video: Option<VideoReport>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthView> {
    let view = match state.client.health().await {
        Ok(_) => HealthView { status: "ok", upstream: "up", detail: None },
        Err(e) => {
            warn!("Analysis API health check failed: {:#}", e);
            HealthView { status: "ok", upstream: "down", detail: Some(e.to_string()) }
        }
    };
    Json(view)
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<VideoReport>, ClientError> {
    let ticket = state.video.begin();
    let (video_id, comments) = state
        .client
        .analyze_video(&body.url_or_id, body.max_comments)
        .await?;

    info!("Analyzed video {} ({} comments)", video_id, comments.len());
    let options = state.report_options(1, None);
    let report = VideoReport::build(video_id.as_str(), &comments, None, options);
    state.publish_video(ticket, report.clone()).await;

    Ok(Json(report))
}

pub async fn global_statistics(
    State(state): State<AppState>,
) -> Result<Json<GlobalReport>, ClientError> {
    let ticket = state.global.begin();
    let (comments, summaries) = tokio::try_join!(
        state.client.all_comments(),
        state.client.all_video_statistics()
    )?;

    let report = GlobalReport::build(&comments, &summaries);
    state.publish_global(ticket, report.clone()).await;

    Ok(Json(report))
}

pub async fn video_statistics(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<VideoReport>, ClientError> {
    let video_id = VideoId::parse(&video_id)?;
    let ticket = state.video.begin();
    let (comments, cached) = tokio::try_join!(
        state.client.video_comments(&video_id),
        state.client.video_statistics(&video_id)
    )?;

    let mut options = state.report_options(1, query.page_size);
    let last_page = comments.len().div_ceil(options.page_size).max(1);
    options.page = query.page.unwrap_or(1).clamp(1, last_page);

    let report = VideoReport::build(video_id.as_str(), &comments, cached, options);
    state.publish_video(ticket, report.clone()).await;

    Ok(Json(report))
}

pub async fn filtered_comments(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(filter): Query<CommentFilter>,
) -> Result<Json<Vec<CommentView>>, ClientError> {
    let video_id = VideoId::parse(&video_id)?;
    let comments = state.client.video_comments(&video_id).await?;
    let views = projections::filter_comments(&comments, &filter)
        .into_iter()
        .map(CommentView::from)
        .collect();
    Ok(Json(views))
}

pub async fn saved_comments(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ClientError> {
    let video_id = VideoId::parse(&video_id)?;
    Ok(Json(state.client.saved_comments(&video_id).await?))
}

pub async fn delete_saved_comments(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<Value>, ClientError> {
    let video_id = VideoId::parse(&video_id)?;
    let ack = state.client.delete_saved_comments(&video_id).await?;
    info!("Deleted saved comments for {}", video_id);
    Ok(Json(ack))
}

pub async fn current_view(State(state): State<AppState>) -> Json<CurrentView> {
    Json(CurrentView {
        global: state.global.current().await,
        video: state.video.current().await,
    })
}
