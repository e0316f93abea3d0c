use chrono::{DateTime, Utc};

use crate::leads::{Lead, Platform, RawPost, Sentiment};

pub const DEFAULT_INTENT: u8 = 50;
const DEFAULT_AUTHOR: &str = "Unknown";
const DEFAULT_STATUS: &str = "New";

/// Maps a raw post into a `Lead`.
///
/// `index` is the post's position in the concatenated result and becomes the
/// id when the source gave none. `now` stands in for a missing timestamp.
pub fn normalize(raw: RawPost, index: usize, now: DateTime<Utc>) -> Lead {
    let fields = match raw {
        RawPost::Reddit(p) => Fields {
            platform_default: Platform::Reddit,
            id: p.id,
            platform: p.platform,
            author: p.author,
            intent_score: p.intent_score,
            reply_status: p.reply_status,
            created_at: p.created_at,
            content: p.text,
            url: p.url,
            reply_options: p.replies,
        },
        RawPost::Quora(p) => Fields {
            platform_default: Platform::Quora,
            id: p.id,
            platform: p.platform,
            author: p.author,
            intent_score: p.intent_score,
            reply_status: p.reply_status,
            created_at: p.created_at,
            content: p.question,
            url: p.url,
            reply_options: [p.reply_option1, p.reply_option2]
                .into_iter()
                .flatten()
                .filter(|r| !r.is_empty())
                .collect(),
        },
    };

    let intent_score = intent_from(fields.intent_score);

    Lead {
        id: non_empty(fields.id).unwrap_or_else(|| index.to_string()),
        platform: non_empty(fields.platform)
            .unwrap_or_else(|| fields.platform_default.as_str().to_string()),
        author: non_empty(fields.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        intent_score,
        sentiment: Sentiment::from_intent(intent_score),
        status: non_empty(fields.reply_status).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        created_at: fields.created_at.unwrap_or(now),
        content: fields.content.unwrap_or_default(),
        url: non_empty(fields.url),
        reply_options: fields.reply_options,
    }
}

struct Fields {
    platform_default: Platform,
    id: Option<String>,
    platform: Option<String>,
    author: Option<String>,
    intent_score: Option<f64>,
    reply_status: Option<String>,
    created_at: Option<DateTime<Utc>>,
    content: Option<String>,
    url: Option<String>,
    reply_options: Vec<String>,
}

fn intent_from(score: Option<f64>) -> u8 {
    match score {
        Some(s) if s.is_finite() => s.round().clamp(0.0, 100.0) as u8,
        Some(_) => 0,
        None => DEFAULT_INTENT,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
