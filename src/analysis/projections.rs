use serde::{Deserialize, Serialize};

use super::category::Category;
use super::metrics::{is_general_toxic, round1};
use super::sentiment::Sentiment;
use super::types::Comment;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementGroup {
    pub label: &'static str,
    pub avg_likes: f64,
    pub total_comments: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityBin {
    pub range: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub sentiment_score: f64,
    pub toxicity: f64,
    pub size: u64,
    pub is_toxic: bool,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementPoint {
    pub like_count: u64,
    pub toxicity: f64,
    pub sentiment: Sentiment,
}

/// Comment list filter, usable directly as a query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentFilter {
    pub min_toxicity: Option<f64>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_likes: Option<u64>,
}

/// Average likes of toxic vs clean comments. Groups with no members are
/// omitted.
pub fn engagement_comparison(comments: &[Comment]) -> Vec<EngagementGroup> {
    let mut toxic = (0f64, 0usize);
    let mut clean = (0f64, 0usize);
    for comment in comments {
        let bucket = if is_general_toxic(comment) { &mut toxic } else { &mut clean };
        bucket.0 += comment.like_count as f64;
        bucket.1 += 1;
    }

    [("Toxic Comments", toxic), ("Clean Comments", clean)]
        .into_iter()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(label, (likes, count))| EngagementGroup {
            label,
            avg_likes: round1(likes / count as f64),
            total_comments: count,
        })
        .collect()
}

/// Buckets on `sentiment_score`, upper bounds inclusive.
pub fn sentiment_intensity_bins(comments: &[Comment]) -> Vec<IntensityBin> {
    let mut counts = [0usize; 3];
    for comment in comments {
        let intensity = comment.sentiment_score;
        let slot = if intensity <= 0.3 {
            0
        } else if intensity <= 0.6 {
            1
        } else {
            2
        };
        counts[slot] += 1;
    }

    ["0.0 - 0.3", "0.3 - 0.6", "0.6 - 1.0"]
        .into_iter()
        .zip(counts)
        .map(|(range, count)| IntensityBin { range, count })
        .collect()
}

pub fn correlation_scatter(comments: &[Comment]) -> Vec<ScatterPoint> {
    comments
        .iter()
        .map(|c| ScatterPoint {
            sentiment_score: c.sentiment_score,
            toxicity: c.probabilities.max(),
            size: c.like_count.max(1),
            is_toxic: is_general_toxic(c),
            sentiment: c.sentiment_type,
        })
        .collect()
}

/// Likes against the `toxic` probability. Comments without one are left out.
pub fn toxicity_engagement_scatter(comments: &[Comment]) -> Vec<EngagementPoint> {
    comments
        .iter()
        .filter_map(|c| {
            c.toxic_probability().map(|toxicity| EngagementPoint {
                like_count: c.like_count,
                toxicity,
                sentiment: c.sentiment_type,
            })
        })
        .collect()
}

pub fn toxic_categories_of(comment: &Comment) -> Vec<Category> {
    comment.toxicity_flags.flagged().collect()
}

/// Unknown category keys match nothing. Comments that carry no `toxic`
/// probability pass the minimum toxicity check.
pub fn filter_comments<'a>(comments: &'a [Comment], filter: &CommentFilter) -> Vec<&'a Comment> {
    let category = filter.category.as_deref().filter(|c| !c.trim().is_empty());
    let category = category.map(Category::from_key);
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    comments
        .iter()
        .filter(|c| match filter.min_toxicity {
            Some(min) => c.toxic_probability().map_or(true, |p| p >= min),
            None => true,
        })
        .filter(|c| match category {
            Some(Some(cat)) => c.is_flagged(cat),
            Some(None) => false,
            None => true,
        })
        .filter(|c| match &needle {
            Some(needle) => c.text.to_lowercase().contains(needle),
            None => true,
        })
        .filter(|c| filter.min_likes.map_or(true, |min| c.like_count >= min))
        .collect()
}
