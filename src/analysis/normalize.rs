use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use super::category::Category;
use super::sentiment::Sentiment;
use super::types::{Comment, Probabilities, ToxicityFlags, VideoSummary};

/// Like-count aliases in resolution order. The first key holding a usable
/// number wins.
const LIKE_COUNT_KEYS: &[&str] = &[
    "likeCount",
    "like_count",
    "totalLikesComment",
    "total_likes_comment",
    "likeCountComment",
    "like_count_comment",
    "likes",
    "thumbsUpCount",
    "thumbs_up_count",
];

const ID_KEYS: &[&str] = &["id", "commentId", "comment_id"];
const VIDEO_ID_KEYS: &[&str] = &["videoId", "video_id"];
const TEXT_KEYS: &[&str] = &["text", "textDisplay", "text_display"];
const AUTHOR_KEYS: &[&str] = &["author", "authorDisplayName", "author_display_name"];
const PUBLISHED_KEYS: &[&str] = &["publishedAt", "published_at"];
const SENTIMENT_KEYS: &[&str] = &["sentimentType", "sentiment_type"];
const SCORE_KEYS: &[&str] = &["sentimentScore", "sentiment_score"];

const TOTAL_COMMENTS_KEYS: &[&str] = &["total_comments", "totalComments", "cantidad_comentarios"];
const MEAN_LIKES_KEYS: &[&str] = &["mean_likes", "meanLikes"];

/// Maps one upstream record onto the canonical comment shape. Never fails:
/// missing or malformed fields fall back to empty/zero/neutral.
pub fn normalize(raw: &Value) -> Comment {
    let Some(obj) = raw.as_object() else {
        return Comment::default();
    };

    let nested_flags = obj.get("toxicityFlags").and_then(Value::as_object);
    let nested_probabilities = obj.get("probabilities").and_then(Value::as_object);

    let mut toxicity_flags = ToxicityFlags::default();
    let mut probabilities = Probabilities::default();
    for category in Category::all() {
        let flag = nested_flags
            .and_then(|m| m.get(category.key()))
            .filter(|v| !v.is_null())
            .or_else(|| obj.get(&category.flag_field()));
        toxicity_flags.set(*category, flag.is_some_and(is_truthy));

        let probability = nested_probabilities
            .and_then(|m| m.get(category.key()))
            .and_then(as_probability)
            .or_else(|| obj.get(&category.probability_field()).and_then(as_probability));
        probabilities.set(*category, probability);
    }

    Comment {
        id: first_text(obj, ID_KEYS).unwrap_or_default(),
        video_id: first_text(obj, VIDEO_ID_KEYS),
        text: first_text(obj, TEXT_KEYS).unwrap_or_default(),
        author: first_text(obj, AUTHOR_KEYS),
        like_count: first_of(obj, LIKE_COUNT_KEYS, as_count).unwrap_or(0),
        published_at: first_of(obj, PUBLISHED_KEYS, as_timestamp),
        sentiment_type: first_text(obj, SENTIMENT_KEYS)
            .map(|s| Sentiment::parse_lenient(&s))
            .unwrap_or_default(),
        sentiment_score: first_of(obj, SCORE_KEYS, as_float).unwrap_or(0.0),
        toxicity_flags,
        probabilities,
    }
}

/// Accepts either a bare array of records or an envelope with a `comments`
/// array. Anything else yields no comments.
pub fn normalize_all(raw: &Value) -> Vec<Comment> {
    envelope_array(raw, "comments")
        .map(|items| items.iter().map(normalize).collect())
        .unwrap_or_default()
}

/// Upstream per-video statistics. Records without a video id are skipped.
pub fn normalize_summary(raw: &Value) -> Option<VideoSummary> {
    let obj = raw.as_object()?;
    let video_id = first_text(obj, VIDEO_ID_KEYS).filter(|id| !id.is_empty())?;

    Some(VideoSummary {
        video_id,
        total_comments: first_of(obj, TOTAL_COMMENTS_KEYS, as_count).unwrap_or(0) as usize,
        mean_likes: first_of(obj, MEAN_LIKES_KEYS, as_float)
            .unwrap_or(0.0)
            .max(0.0),
        toxicity: None,
        sentiment: None,
    })
}

pub fn normalize_summaries(raw: &Value) -> Vec<VideoSummary> {
    envelope_array(raw, "video_statistics")
        .map(|items| items.iter().filter_map(normalize_summary).collect())
        .unwrap_or_default()
}

fn envelope_array<'a>(raw: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    match raw {
        Value::Array(items) => Some(items),
        Value::Object(obj) => obj.get(key).and_then(Value::as_array),
        _ => None,
    }
}

fn first_of<T>(obj: &Map<String, Value>, keys: &[&str], parse: fn(&Value) -> Option<T>) -> Option<T> {
    keys.iter().find_map(|key| obj.get(*key).and_then(parse))
}

fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first_of(obj, keys, as_text)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    f.is_finite().then_some(f)
}

fn as_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    as_float(value).map(|f| f.max(0.0).trunc() as u64)
}

fn as_probability(value: &Value) -> Option<f64> {
    as_float(value).map(|p| p.clamp(0.0, 1.0))
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        Value::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 1.0),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1"),
        _ => false,
    }
}
