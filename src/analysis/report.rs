use serde::Serialize;

use super::category::Category;
use super::metrics::{
    self, BreakdownRow, EngagementMetrics, RiskLevel, SentimentDistribution, SentimentSlice,
};
use super::projections::{self, EngagementGroup, EngagementPoint, IntensityBin, ScatterPoint};
use super::ranking::{self, PageMarker, VideoRiskRow};
use super::types::{Comment, VideoSummary};

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub page_size: usize,
    pub page: usize,
    pub top_n: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { page_size: 10, page: 1, top_n: 5 }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryHighlight {
    pub category: Category,
    pub label: &'static str,
    pub count: usize,
    pub percentage: f64,
}

impl CategoryHighlight {
    fn from_breakdown(breakdown: &metrics::Breakdown) -> Option<Self> {
        metrics::most_frequent_category(breakdown).map(|category| {
            let stat = breakdown.get(category);
            Self {
                category,
                label: category.label(),
                count: stat.count,
                percentage: stat.percentage,
            }
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GlobalCards {
    pub total_comments: usize,
    pub total_videos: usize,
    pub toxic_count: usize,
    pub toxic_rate: f64,
    pub most_frequent: Option<CategoryHighlight>,
    pub high_risk_videos: usize,
}

/// Metrics across every stored comment and video.
#[derive(Debug, Clone, Serialize)]
pub struct GlobalReport {
    pub cards: GlobalCards,
    pub distribution: Vec<BreakdownRow>,
    pub problematic_videos: Vec<VideoRiskRow>,
    pub engagement: Vec<EngagementGroup>,
}

impl GlobalReport {
    pub fn build(comments: &[Comment], summaries: &[VideoSummary]) -> Self {
        let breakdown = metrics::toxicity_breakdown(comments);
        let high_risk_videos =
            ranking::high_risk_video_count(&ranking::video_risk_rows(comments, summaries));
        let problematic_videos = ranking::per_video_risk_analysis(comments, summaries);

        Self {
            cards: GlobalCards {
                total_comments: comments.len(),
                total_videos: summaries.len(),
                toxic_count: metrics::toxic_count(comments),
                toxic_rate: metrics::toxic_rate(comments),
                most_frequent: CategoryHighlight::from_breakdown(&breakdown),
                high_risk_videos,
            },
            distribution: breakdown.distribution_rows(),
            problematic_videos,
            engagement: projections::engagement_comparison(comments),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub color: &'static str,
    pub advice: &'static str,
    pub toxic_rate: f64,
    pub most_problematic: Option<CategoryHighlight>,
    pub sarcasm_warning: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoCards {
    pub total_comments: usize,
    pub toxic_count: usize,
    pub toxic_rate: f64,
    pub sarcasm_candidates: usize,
    pub engagement: EngagementMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentsPage {
    pub items: Vec<CommentView>,
    pub page: usize,
    pub total_pages: usize,
    pub pager: Vec<PageMarker>,
}

/// A comment plus its flagged categories, as listed on the comments tab.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub categories: Vec<Category>,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            comment: comment.clone(),
            categories: projections::toxic_categories_of(comment),
        }
    }
}

/// Metrics for one video's comments.
#[derive(Debug, Clone, Serialize)]
pub struct VideoReport {
    pub video_id: String,
    pub summary: VideoSummary,
    pub cards: VideoCards,
    pub risk: RiskAssessment,
    pub profile: Vec<BreakdownRow>,
    pub sentiment: Vec<SentimentSlice>,
    pub sentiment_counts: SentimentDistribution,
    pub intensity: Vec<IntensityBin>,
    pub scatter: Vec<ScatterPoint>,
    pub engagement_scatter: Vec<EngagementPoint>,
    pub top_liked: Vec<CommentView>,
    pub top_toxic: Vec<CommentView>,
    pub comments: CommentsPage,
}

impl VideoReport {
    /// `cached` is an upstream summary to report instead of recomputing one;
    /// its engagement figure takes precedence for the average-likes card.
    pub fn build(
        video_id: &str,
        comments: &[Comment],
        cached: Option<VideoSummary>,
        options: ReportOptions,
    ) -> Self {
        let breakdown = metrics::toxicity_breakdown(comments);
        let sentiment_counts = metrics::sentiment_distribution(comments);
        let toxic_rate = metrics::toxic_rate(comments);
        let level = metrics::risk_level(toxic_rate);
        let sarcasm = metrics::sarcasm_candidates(comments);

        let mut engagement = metrics::engagement_metrics(comments);
        let summary = match cached {
            Some(summary) => {
                if summary.mean_likes > 0.0 {
                    engagement.mean_likes = summary.mean_likes;
                }
                summary
            }
            None => VideoSummary::from_comments(video_id, comments),
        };

        let page = ranking::paginate(comments, options.page_size, options.page);
        let comments_page = CommentsPage {
            items: page.items.iter().map(CommentView::from).collect(),
            page: page.page,
            total_pages: page.total_pages,
            pager: ranking::page_numbers(page.page, page.total_pages),
        };

        Self {
            video_id: video_id.to_string(),
            summary,
            cards: VideoCards {
                total_comments: comments.len(),
                toxic_count: metrics::toxic_count(comments),
                toxic_rate,
                sarcasm_candidates: sarcasm,
                engagement,
            },
            risk: RiskAssessment {
                level,
                color: level.color(),
                advice: level.advice(),
                toxic_rate,
                most_problematic: CategoryHighlight::from_breakdown(&breakdown),
                sarcasm_warning: sarcasm > 0,
            },
            profile: breakdown.profile_rows(),
            sentiment: sentiment_counts.slices(),
            sentiment_counts,
            intensity: projections::sentiment_intensity_bins(comments),
            scatter: projections::correlation_scatter(comments),
            engagement_scatter: projections::toxicity_engagement_scatter(comments),
            top_liked: ranking::top_n_by_likes(comments, options.top_n)
                .into_iter()
                .map(CommentView::from)
                .collect(),
            top_toxic: ranking::top_n_by_toxicity(comments, options.top_n)
                .into_iter()
                .map(CommentView::from)
                .collect(),
            comments: comments_page,
        }
    }
}
