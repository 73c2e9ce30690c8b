//! Builders for npm package pages

use serde_json::{Value, json};

/// Page whose embedded payload lists `versions` as (version, downloads, ts, deprecated)
pub fn payload_page(
    versions: &[(&str, u64, i64, Option<&str>)],
    dist_tags: &[(&str, &str)],
) -> String {
    let downloads: serde_json::Map<String, Value> = versions
        .iter()
        .map(|(version, downloads, _, _)| (version.to_string(), json!(downloads)))
        .collect();
    let entries: Vec<Value> = versions
        .iter()
        .map(|(version, _, ts, deprecated)| match deprecated {
            Some(message) => json!({"version": version, "date": {"ts": ts}, "deprecated": message}),
            None => json!({"version": version, "date": {"ts": ts}}),
        })
        .collect();
    let tags: serde_json::Map<String, Value> = dist_tags
        .iter()
        .map(|(tag, version)| (tag.to_string(), json!(version)))
        .collect();

    let context = json!({
        "context": {
            "versionsDownloads": downloads,
            "packument": {"distTags": tags, "versions": entries}
        }
    });

    format!(
        r#"<!DOCTYPE html><html><head><script integrity="sha512-test" nonce="">window.__context__ = {context};</script></head><body></body></html>"#
    )
}

/// Builds a page exposing only the rendered versions tab
#[derive(Default)]
pub struct PageBuilder {
    items: Vec<String>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, title: &str) -> Self {
        self.items.push(format!("<li><h3>{title}</h3></li>"));
        self
    }

    pub fn tag(mut self, version: &str, tag: &str) -> Self {
        self.items.push(format!(
            r#"<li><a href="/package/demo/v/{version}">{version}</a><ul><li><code>{tag}</code></li></ul></li>"#
        ));
        self
    }

    pub fn version(mut self, version: &str, downloads: &str, time: &str) -> Self {
        self.items.push(format!(
            r#"<li><a href="/package/demo/v/{version}">{version}</a><span class="downloads">{downloads}</span><time dateTime="{time}" title="{time}">some time ago</time></li>"#
        ));
        self
    }

    pub fn build(self) -> String {
        format!(
            r#"<!DOCTYPE html><html><body><main><div id="tabpanel-versions"><div><ul>{}</ul></div></div></main></body></html>"#,
            self.items.concat()
        )
    }
}
