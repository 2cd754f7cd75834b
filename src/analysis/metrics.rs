//! Toxicity, sentiment and risk aggregates over a comment snapshot.
//!
//! Every function here is total: empty input produces zeroed aggregates and
//! divisions by zero are reported as 0.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::category::Category;
use super::sentiment::Sentiment;
use super::types::Comment;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryStat {
    pub count: usize,
    pub percentage: f64,
}

/// Per-category counts over one comment list, in canonical category order.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    pub total: usize,
    stats: [CategoryStat; Category::COUNT],
}

impl Breakdown {
    pub fn get(&self, category: Category) -> CategoryStat {
        self.stats[category.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, CategoryStat)> + '_ {
        Category::all().iter().map(|c| (*c, self.get(*c)))
    }

    /// Chart rows sorted by percentage, descending, keeping only categories
    /// that occur at least once.
    pub fn distribution_rows(&self) -> Vec<BreakdownRow> {
        let mut rows: Vec<BreakdownRow> = self
            .iter()
            .filter(|(_, stat)| stat.count > 0)
            .map(|(category, stat)| BreakdownRow::new(category, stat))
            .collect();
        rows.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
        rows
    }

    /// One row per category in canonical order, zeros included.
    pub fn profile_rows(&self) -> Vec<BreakdownRow> {
        self.iter()
            .map(|(category, stat)| BreakdownRow::new(category, stat))
            .collect()
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::COUNT))?;
        for (category, stat) in self.iter() {
            map.serialize_entry(category.key(), &stat)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub category: Category,
    pub label: &'static str,
    pub color: &'static str,
    pub count: usize,
    pub percentage: f64,
}

impl BreakdownRow {
    fn new(category: Category, stat: CategoryStat) -> Self {
        Self {
            category,
            label: category.label(),
            color: category.color(),
            count: stat.count,
            percentage: stat.percentage,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentDistribution {
    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Pie slices for sentiments that occur, with percentages of the total.
    pub fn slices(&self) -> Vec<SentimentSlice> {
        let total = self.total();
        Sentiment::all()
            .iter()
            .filter(|s| self.get(**s) > 0)
            .map(|s| SentimentSlice {
                sentiment: *s,
                label: s.label(),
                color: s.color(),
                count: self.get(*s),
                percentage: percentage(self.get(*s), total),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSlice {
    pub sentiment: Sentiment,
    pub label: &'static str,
    pub color: &'static str,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "Minimal",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "green",
            RiskLevel::Low => "orange",
            RiskLevel::Medium => "yellow",
            RiskLevel::High => "red",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "Healthy community",
            RiskLevel::Low => "Regular monitoring recommended",
            RiskLevel::Medium => "Review highlighted comments",
            RiskLevel::High => "Urgent moderation required",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EngagementMetrics {
    pub total_likes: u64,
    pub mean_likes: f64,
    pub max_likes: u64,
}

/// `count / total * 100`, rounded to one decimal; 0 when `total` is 0.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(count as f64 / total as f64 * 100.0)
}

pub fn round1(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 10.0).round() / 10.0
}

pub fn is_general_toxic(comment: &Comment) -> bool {
    comment.toxicity_flags.any()
}

pub fn toxicity_breakdown(comments: &[Comment]) -> Breakdown {
    let total = comments.len();
    let mut stats = [CategoryStat::default(); Category::COUNT];

    for comment in comments {
        for category in comment.toxicity_flags.flagged() {
            stats[category.index()].count += 1;
        }
    }
    for stat in stats.iter_mut() {
        stat.percentage = percentage(stat.count, total);
    }

    Breakdown { total, stats }
}

/// Highest count wins; ties go to the earlier category in canonical order.
pub fn most_frequent_category(breakdown: &Breakdown) -> Option<Category> {
    let mut best: Option<(Category, usize)> = None;
    for (category, stat) in breakdown.iter() {
        if stat.count == 0 {
            continue;
        }
        match best {
            Some((_, count)) if count >= stat.count => {}
            _ => best = Some((category, stat.count)),
        }
    }
    best.map(|(category, _)| category)
}

pub fn sentiment_distribution(comments: &[Comment]) -> SentimentDistribution {
    let mut dist = SentimentDistribution::default();
    for comment in comments {
        match comment.sentiment_type {
            Sentiment::Positive => dist.positive += 1,
            Sentiment::Negative => dist.negative += 1,
            Sentiment::Neutral => dist.neutral += 1,
        }
    }
    dist
}

/// Positive-sentiment comments that are nonetheless flagged toxic. A rough
/// proxy for sarcasm, not a classifier.
pub fn sarcasm_candidates(comments: &[Comment]) -> usize {
    comments
        .iter()
        .filter(|c| c.sentiment_type == Sentiment::Positive && is_general_toxic(c))
        .count()
}

pub fn toxic_count(comments: &[Comment]) -> usize {
    comments.iter().filter(|c| is_general_toxic(c)).count()
}

/// Share of generally toxic comments, in percent.
pub fn toxic_rate(comments: &[Comment]) -> f64 {
    percentage(toxic_count(comments), comments.len())
}

/// Boundary values belong to the higher band.
pub fn risk_level(toxic_rate_percent: f64) -> RiskLevel {
    if toxic_rate_percent >= 20.0 {
        RiskLevel::High
    } else if toxic_rate_percent >= 10.0 {
        RiskLevel::Medium
    } else if toxic_rate_percent >= 5.0 {
        RiskLevel::Low
    } else {
        RiskLevel::Minimal
    }
}

pub fn engagement_metrics(comments: &[Comment]) -> EngagementMetrics {
    if comments.is_empty() {
        return EngagementMetrics::default();
    }
    let total_likes = comments
        .iter()
        .fold(0u64, |acc, c| acc.saturating_add(c.like_count));
    let likes_sum: f64 = comments.iter().map(|c| c.like_count as f64).sum();
    let max_likes = comments.iter().map(|c| c.like_count).max().unwrap_or(0);

    EngagementMetrics {
        total_likes,
        mean_likes: likes_sum / comments.len() as f64,
        max_likes,
    }
}
