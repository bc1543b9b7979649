//! Normalization of worker result documents
//!
//! Workers emit either the canonical camelCase [`ProcessedArticle`] layout or
//! the older layout that nests page metadata under `article_data` and flattens
//! translations into `trans_<language>` keys:
//!
//! ```json
//! {
//!   "article_data": {"title": "...", "publish_date": "...", "authors": [],
//!                    "top_image": "...", "images": []},
//!   "summary": "...",
//!   "trans_hindi": "...",
//!   "trans_marathi": "...",
//!   "video_path": "out/video.mp4"
//! }
//! ```
//!
//! Both are folded into one [`ProcessedArticle`]. Unknown keys are dropped.

use crate::error::{Error, WorkerError};
use crate::types::{DEFAULT_LANGUAGE_KEY, ProcessedArticle};
use serde::Deserialize;
use serde_json::{Map, Value};

const TRANSLATION_PREFIX: &str = "trans_";
const VIDEO_PREFIX: &str = "video_";
const LEGACY_VIDEO_KEY: &str = "video_path";
const LEGACY_IMAGE_KEY: &str = "image_path";
const IMAGE_ARTIFACT_KEY: &str = "image";

/// Page metadata block of the older worker layout
#[derive(Debug, Default, Deserialize)]
struct LegacyArticleData {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    publish_date: Option<String>,
    #[serde(default)]
    authors: Option<Vec<String>>,
    #[serde(default)]
    top_image: Option<String>,
    #[serde(default)]
    images: Option<Vec<String>>,
}

/// Build a [`ProcessedArticle`] from a worker's stdout document
///
/// `diagnostics` is attached to any [`WorkerError::InvalidOutput`] raised here.
pub(crate) fn normalize_document(document: Value, diagnostics: &str) -> crate::Result<ProcessedArticle> {
    let mut fields = match document {
        Value::Object(fields) => fields,
        other => {
            return Err(invalid(
                format!("expected a JSON object, got {}", json_kind(&other)),
                diagnostics,
            ));
        }
    };

    // `null` means "absent" for every field; serde defaults only cover missing keys
    fields.retain(|_, value| !value.is_null());
    // A failed translation or render may be reported as a null map entry
    for value in fields.values_mut() {
        if let Value::Object(entries) = value {
            entries.retain(|_, entry| !entry.is_null());
        }
    }

    let legacy = match fields.remove("article_data") {
        Some(data) => serde_json::from_value::<LegacyArticleData>(data)
            .map_err(|e| invalid(format!("malformed article_data: {e}"), diagnostics))?,
        None => LegacyArticleData::default(),
    };
    let flattened = take_flattened_keys(&mut fields);

    let mut article: ProcessedArticle = serde_json::from_value(Value::Object(fields))
        .map_err(|e| invalid(format!("unexpected document shape: {e}"), diagnostics))?;

    article.title = non_blank(article.title.or(legacy.title));
    article.publish_date = non_blank(article.publish_date.or(legacy.publish_date));
    article.top_image = non_blank(article.top_image.or(legacy.top_image));
    if article.authors.is_empty() {
        article.authors = legacy.authors.unwrap_or_default();
    }
    if article.images.is_empty() {
        article.images = legacy.images.unwrap_or_default();
    }

    for (key, value) in flattened {
        if let Some(language) = key.strip_prefix(TRANSLATION_PREFIX) {
            article.translations.entry(language.to_string()).or_insert(value);
        } else if key == LEGACY_VIDEO_KEY {
            article
                .media_artifacts
                .entry(DEFAULT_LANGUAGE_KEY.to_string())
                .or_insert(value);
        } else if key == LEGACY_IMAGE_KEY {
            article
                .media_artifacts
                .entry(IMAGE_ARTIFACT_KEY.to_string())
                .or_insert(value);
        } else if let Some(language) = key.strip_prefix(VIDEO_PREFIX) {
            article.media_artifacts.entry(language.to_string()).or_insert(value);
        }
    }

    article.translations.retain(|_, text| !text.trim().is_empty());
    article.media_artifacts.retain(|_, reference| !reference.trim().is_empty());

    if !article.has_summary() {
        if !article.translations.is_empty() || !article.media_artifacts.is_empty() {
            tracing::warn!(
                translations = article.translations.len(),
                media = article.media_artifacts.len(),
                "worker returned translations or media without a summary, discarding them"
            );
        }
        article.summary.clear();
        article.translations.clear();
        article.media_artifacts.clear();
    }

    Ok(article)
}

/// Remove `trans_*`, `video_*` and `image_path` keys holding strings
fn take_flattened_keys(fields: &mut Map<String, Value>) -> Vec<(String, String)> {
    let keys: Vec<String> = fields
        .keys()
        .filter(|key| is_flattened_key(key))
        .cloned()
        .collect();

    let mut taken = Vec::with_capacity(keys.len());
    for key in keys {
        match fields.remove(&key) {
            Some(Value::String(value)) => taken.push((key, value)),
            Some(other) => {
                tracing::debug!(key = %key, kind = json_kind(&other), "ignoring non-string worker field");
            }
            None => {}
        }
    }
    taken
}

fn is_flattened_key(key: &str) -> bool {
    let language_suffix = |prefix: &str| key.strip_prefix(prefix).is_some_and(|rest| !rest.is_empty());
    key == LEGACY_IMAGE_KEY || language_suffix(TRANSLATION_PREFIX) || language_suffix(VIDEO_PREFIX)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn invalid(reason: String, diagnostics: &str) -> Error {
    Error::Worker(WorkerError::InvalidOutput {
        reason,
        diagnostics: diagnostics.to_string(),
    })
}
