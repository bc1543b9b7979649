//! Provider responses and worker scripts used across integration tests

use serde_json::{Value, json};
use std::path::{Path, PathBuf};

/// One provider record with every field populated
pub fn provider_article(n: usize) -> Value {
    json!({
        "source": {"id": null, "name": "Example News"},
        "author": "Staff",
        "title": format!("AI story {n}"),
        "description": format!("What happened in story {n}"),
        "url": format!("https://news.example/ai/{n}"),
        "urlToImage": format!("https://news.example/ai/{n}.jpg"),
        "publishedAt": "2024-05-01T10:00:00Z",
        "content": format!("Body of story {n} [+2100 chars]")
    })
}

/// Provider response: `good` complete records plus one without a description
pub fn provider_page(good: usize) -> Value {
    let mut articles: Vec<Value> = (1..=good).map(provider_article).collect();
    let mut incomplete = provider_article(99);
    incomplete["description"] = Value::Null;
    articles.insert(1.min(articles.len()), incomplete);

    json!({
        "status": "ok",
        "totalResults": articles.len(),
        "articles": articles
    })
}

/// Write a worker script into `dir` and return the `sh` arguments to run it
pub fn worker_script(dir: &Path, name: &str, body: &str) -> Vec<String> {
    let path: PathBuf = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    vec![path.display().to_string()]
}

/// Worker that emits the older `article_data`/`trans_*` layout with only a
/// Hindi translation and no media
pub const LEGACY_WORKER: &str = r#"cat > /dev/null
echo "Device set to use cpu" >&2
cat <<'EOF'
{"article_data": {"title": "AI story 1", "publish_date": "2024-05-01 00:00:00", "authors": ["Staff"], "top_image": "https://news.example/ai/1.jpg", "images": []}, "summary": "An AI system did something notable.", "trans_hindi": "एक एआई प्रणाली ने कुछ उल्लेखनीय किया।"}
EOF"#;

/// Worker that fails the way the reference worker does on network errors
pub const FAILING_WORKER: &str = r#"cat > /dev/null
echo '{"error": "network timeout"}' >&2
exit 1"#;
