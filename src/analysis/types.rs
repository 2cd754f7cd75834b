use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::category::Category;
use super::metrics::{self, Breakdown, SentimentDistribution};
use super::sentiment::Sentiment;

/// Per-category boolean flags, indexed by `Category::index()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToxicityFlags([bool; Category::COUNT]);

impl ToxicityFlags {
    #[cfg(test)]
    pub fn from_categories(categories: &[Category]) -> Self {
        let mut flags = Self::default();
        for category in categories {
            flags.set(*category, true);
        }
        flags
    }

    pub fn get(&self, category: Category) -> bool {
        self.0[category.index()]
    }

    pub fn set(&mut self, category: Category, value: bool) {
        self.0[category.index()] = value;
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|f| *f)
    }

    /// Flagged categories in canonical order.
    pub fn flagged(&self) -> impl Iterator<Item = Category> + '_ {
        Category::all().iter().copied().filter(|c| self.get(*c))
    }
}

impl Serialize for ToxicityFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::COUNT))?;
        for category in Category::all() {
            map.serialize_entry(category.key(), &self.get(*category))?;
        }
        map.end()
    }
}

/// Per-category probabilities in [0, 1]; `None` when upstream omitted the field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Probabilities([Option<f64>; Category::COUNT]);

impl Probabilities {
    pub fn get(&self, category: Category) -> Option<f64> {
        self.0[category.index()]
    }

    pub fn set(&mut self, category: Category, value: Option<f64>) {
        self.0[category.index()] = value;
    }

    /// Highest known probability across categories, 0 if none are known.
    pub fn max(&self) -> f64 {
        self.0.iter().flatten().copied().fold(0.0, f64::max)
    }
}

impl Serialize for Probabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let known = self.0.iter().filter(|p| p.is_some()).count();
        let mut map = serializer.serialize_map(Some(known))?;
        for category in Category::all() {
            if let Some(p) = self.get(*category) {
                map.serialize_entry(category.key(), &p)?;
            }
        }
        map.end()
    }
}

/// One analyzed comment in canonical shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub like_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub sentiment_type: Sentiment,
    pub sentiment_score: f64,
    pub toxicity_flags: ToxicityFlags,
    pub probabilities: Probabilities,
}

impl Comment {
    pub fn is_flagged(&self, category: Category) -> bool {
        self.toxicity_flags.get(category)
    }

    /// The general `toxic` probability used for "most toxic" rankings.
    pub fn toxic_probability(&self) -> Option<f64> {
        self.probabilities.get(Category::Toxic)
    }
}

/// Per-video rollup, either computed locally or supplied by upstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub total_comments: usize,
    pub mean_likes: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toxicity: Option<Breakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentDistribution>,
}

impl VideoSummary {
    pub fn from_comments(video_id: &str, comments: &[Comment]) -> Self {
        let engagement = metrics::engagement_metrics(comments);
        Self {
            video_id: video_id.to_string(),
            total_comments: comments.len(),
            mean_likes: engagement.mean_likes,
            toxicity: Some(metrics::toxicity_breakdown(comments)),
            sentiment: Some(metrics::sentiment_distribution(comments)),
        }
    }
}
