use std::collections::HashMap;

use serde::Serialize;

use super::metrics::{is_general_toxic, percentage, risk_level, RiskLevel};
use super::types::{Comment, VideoSummary};

/// Videos shown in the "most problematic" table.
pub const PROBLEMATIC_VIDEO_LIMIT: usize = 10;

/// Toxic rate above which a video counts as high risk on the global cards.
pub const HIGH_RISK_RATE: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoRiskRow {
    pub video_id: String,
    pub total_comments: usize,
    pub toxic_count: usize,
    pub toxic_rate_percent: f64,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a> {
    pub items: &'a [Comment],
    pub page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageMarker {
    Page(usize),
    Ellipsis(&'static str),
}

/// Most liked first; equal like counts keep their input order.
pub fn top_n_by_likes(comments: &[Comment], n: usize) -> Vec<&Comment> {
    let mut ranked: Vec<&Comment> = comments.iter().collect();
    ranked.sort_by(|a, b| b.like_count.cmp(&a.like_count));
    ranked.truncate(n);
    ranked
}

/// Comments without a `toxic` probability are excluded rather than ranked as 0.
pub fn top_n_by_toxicity(comments: &[Comment], n: usize) -> Vec<&Comment> {
    let mut ranked: Vec<(&Comment, f64)> = comments
        .iter()
        .filter_map(|c| c.toxic_probability().filter(|p| *p > 0.0).map(|p| (c, p)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().take(n).map(|(c, _)| c).collect()
}

/// The most problematic videos, highest toxic rate first.
pub fn per_video_risk_analysis(comments: &[Comment], summaries: &[VideoSummary]) -> Vec<VideoRiskRow> {
    let mut rows = video_risk_rows(comments, summaries);
    rows.truncate(PROBLEMATIC_VIDEO_LIMIT);
    rows
}

/// One row per summarized video, sorted by toxic rate but not truncated.
pub fn video_risk_rows(comments: &[Comment], summaries: &[VideoSummary]) -> Vec<VideoRiskRow> {
    let mut by_video: HashMap<&str, (usize, usize)> = HashMap::new();
    for comment in comments {
        if let Some(video_id) = comment.video_id.as_deref() {
            let entry = by_video.entry(video_id).or_default();
            entry.0 += 1;
            if is_general_toxic(comment) {
                entry.1 += 1;
            }
        }
    }

    let mut rows: Vec<VideoRiskRow> = summaries
        .iter()
        .map(|summary| {
            let (total, toxic) = by_video
                .get(summary.video_id.as_str())
                .copied()
                .unwrap_or((0, 0));
            let rate = percentage(toxic, total);
            VideoRiskRow {
                video_id: summary.video_id.clone(),
                total_comments: total,
                toxic_count: toxic,
                toxic_rate_percent: rate,
                risk_level: risk_level(rate),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.toxic_rate_percent.total_cmp(&a.toxic_rate_percent));
    rows
}

pub fn high_risk_video_count(rows: &[VideoRiskRow]) -> usize {
    rows.iter()
        .filter(|r| r.toxic_rate_percent > HIGH_RISK_RATE)
        .count()
}

/// Plain 1-indexed slice. Page numbers out of range give an empty page;
/// callers are expected to clamp.
pub fn paginate(comments: &[Comment], page_size: usize, page_number: usize) -> Page<'_> {
    if page_size == 0 {
        return Page { items: &[], page: page_number, total_pages: 0 };
    }
    let total_pages = comments.len().div_ceil(page_size);
    let items = page_number
        .checked_sub(1)
        .and_then(|p| p.checked_mul(page_size))
        .filter(|start| *start < comments.len())
        .map(|start| &comments[start..(start + page_size).min(comments.len())])
        .unwrap_or_default();

    Page { items, page: page_number, total_pages }
}

/// Pager buttons: first, last, and a window of two pages around `current`,
/// with gaps of more than one page collapsed into an ellipsis.
pub fn page_numbers(current: usize, total_pages: usize) -> Vec<PageMarker> {
    const DELTA: usize = 2;

    let window = (1..=total_pages)
        .filter(|i| *i == 1 || *i == total_pages || (i + DELTA >= current && *i <= current + DELTA));

    let mut markers = Vec::new();
    let mut last: Option<usize> = None;
    for i in window {
        if let Some(l) = last {
            if i - l == 2 {
                markers.push(PageMarker::Page(l + 1));
            } else if i - l != 1 {
                markers.push(PageMarker::Ellipsis("..."));
            }
        }
        markers.push(PageMarker::Page(i));
        last = Some(i);
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::category::Category;
    use crate::analysis::types::ToxicityFlags;

    fn liked(id: &str, likes: u64) -> Comment {
        Comment { id: id.to_string(), like_count: likes, ..Default::default() }
    }

    fn on_video(video: &str, toxic: bool) -> Comment {
        let flags = if toxic { vec![Category::Toxic] } else { vec![] };
        Comment {
            video_id: Some(video.to_string()),
            toxicity_flags: ToxicityFlags::from_categories(&flags),
            ..Default::default()
        }
    }

    fn summary(video: &str) -> VideoSummary {
        VideoSummary {
            video_id: video.to_string(),
            total_comments: 0,
            mean_likes: 0.0,
            toxicity: None,
            sentiment: None,
        }
    }

    fn ids(comments: &[&Comment]) -> Vec<String> {
        comments.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn top_liked_is_stable_and_repeatable() {
        let comments = vec![liked("a", 5), liked("b", 9), liked("c", 5), liked("d", 1), liked("e", 9)];

        let first = ids(&top_n_by_likes(&comments, 4));
        let second = ids(&top_n_by_likes(&comments, 4));

        assert_eq!(first, vec!["b", "e", "a", "c"]);
        assert_eq!(first, second);
    }

    #[test]
    fn top_liked_returns_fewer_when_input_is_small() {
        let comments = vec![liked("a", 1)];
        assert_eq!(top_n_by_likes(&comments, 5).len(), 1);
        assert!(top_n_by_likes(&[], 5).is_empty());
    }

    #[test]
    fn top_toxic_excludes_missing_and_zero_probabilities() {
        let mut high = liked("high", 0);
        high.probabilities.set(Category::Toxic, Some(0.9));
        let mut low = liked("low", 0);
        low.probabilities.set(Category::Toxic, Some(0.2));
        let mut zero = liked("zero", 0);
        zero.probabilities.set(Category::Toxic, Some(0.0));
        let mut flagged_only = liked("flagged", 0);
        flagged_only.toxicity_flags.set(Category::Toxic, true);

        let comments = vec![low, zero, flagged_only, high];
        assert_eq!(ids(&top_n_by_toxicity(&comments, 5)), vec!["high", "low"]);
        assert_eq!(ids(&top_n_by_toxicity(&comments, 1)), vec!["high"]);
    }

    #[test]
    fn per_video_rows_sorted_by_rate() {
        let comments = vec![
            on_video("calm", false),
            on_video("calm", false),
            on_video("heated", true),
            on_video("heated", false),
            on_video("orphan", true),
        ];
        let summaries = vec![summary("calm"), summary("heated"), summary("silent")];

        let rows = per_video_risk_analysis(&comments, &summaries);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].video_id, "heated");
        assert_eq!(rows[0].toxic_count, 1);
        assert_eq!(rows[0].toxic_rate_percent, 50.0);
        assert_eq!(rows[0].risk_level, RiskLevel::High);
        assert_eq!(rows[1].video_id, "calm");
        assert_eq!(rows[2].video_id, "silent");
        assert_eq!(rows[2].total_comments, 0);
        assert_eq!(rows[2].toxic_rate_percent, 0.0);
        assert_eq!(high_risk_video_count(&rows), 1);
    }

    #[test]
    fn per_video_rows_capped_at_ten() {
        let summaries: Vec<VideoSummary> = (0..15).map(|i| summary(&format!("v{i}"))).collect();
        assert_eq!(per_video_risk_analysis(&[], &summaries).len(), PROBLEMATIC_VIDEO_LIMIT);
        assert_eq!(video_risk_rows(&[], &summaries).len(), 15);
    }

    #[test]
    fn high_risk_count_covers_videos_past_the_table_cap() {
        let summaries: Vec<VideoSummary> = (0..12).map(|i| summary(&format!("v{i}"))).collect();
        let comments: Vec<Comment> = (0..12).map(|i| on_video(&format!("v{i}"), true)).collect();

        let rows = video_risk_rows(&comments, &summaries);
        assert_eq!(high_risk_video_count(&rows), 12);
        assert_eq!(per_video_risk_analysis(&comments, &summaries).len(), PROBLEMATIC_VIDEO_LIMIT);
    }

    #[test]
    fn paginate_twenty_five_by_ten() {
        let comments: Vec<Comment> = (0..25).map(|i| liked(&i.to_string(), 0)).collect();

        let first = paginate(&comments, 10, 1);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items[0].id, "0");

        let last = paginate(&comments, 10, 3);
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.items[0].id, "20");

        assert!(paginate(&comments, 10, 4).items.is_empty());
        assert!(paginate(&comments, 10, 0).items.is_empty());
        assert_eq!(paginate(&comments, 0, 1).total_pages, 0);
        assert_eq!(paginate(&[], 10, 1).total_pages, 0);
    }

    #[test]
    fn page_numbers_collapse_long_gaps() {
        use PageMarker::*;

        assert_eq!(page_numbers(1, 3), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(
            page_numbers(1, 10),
            vec![Page(1), Page(2), Page(3), Ellipsis("..."), Page(10)]
        );
        assert_eq!(
            page_numbers(5, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Page(7), Ellipsis("..."), Page(10)]
        );
        assert!(page_numbers(1, 0).is_empty());
    }
}
