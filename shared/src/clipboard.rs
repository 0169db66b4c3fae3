//! Clipboard export: plain-text and rich-text serializations plus the ordered
//! fallback chain of copy methods.

use async_trait::async_trait;

use crate::{error::ClipboardError, links::MapLink};

pub const NARRATIVE_REGION_ID: &str = "narrative-output";
pub const LINKS_REGION_ID: &str = "map-links-output";

/// Inline style carried by the rich-text rendering, so pasted text keeps its font.
pub const RICH_TEXT_STYLE: &str = "font-family: Arial, Helvetica, sans-serif; font-size: 12pt;";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardContent {
    /// Id of the on-screen element holding the rendered version of this content.
    pub region_id: &'static str,
    pub plain: String,
    pub html: String,
}

impl ClipboardContent {
    pub fn narrative(prose: &str) -> Self {
        Self {
            region_id: NARRATIVE_REGION_ID,
            plain: prose.to_string(),
            html: format!(r#"<p style="{RICH_TEXT_STYLE}">{}</p>"#, escape_html(prose)),
        }
    }

    pub fn links(links: &[MapLink]) -> Self {
        let plain = links
            .iter()
            .map(|link| format!("{}: {}", link.name, link.url))
            .collect::<Vec<_>>()
            .join("\n");
        let anchors = links
            .iter()
            .map(|link| {
                format!(
                    r#"<a href="{}">{}</a>"#,
                    escape_html(&link.url),
                    escape_html(link.name)
                )
            })
            .collect::<Vec<_>>()
            .join("<br>");
        Self {
            region_id: LINKS_REGION_ID,
            plain,
            html: format!(r#"<p style="{RICH_TEXT_STYLE}">{anchors}</p>"#),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.plain.trim().is_empty()
    }
}

/// Ways of getting content onto the system clipboard, tried in [`CopyMethod::FALLBACK_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    /// Select the rendered region and copy it, keeping styling and clickable links.
    RichSelection,
    /// Write the plain-text serialization through the async clipboard API.
    ClipboardApi,
    /// Copy from an off-screen text field holding the plain text.
    SyntheticField,
}

impl CopyMethod {
    pub const FALLBACK_ORDER: [CopyMethod; 3] = [
        CopyMethod::RichSelection,
        CopyMethod::ClipboardApi,
        CopyMethod::SyntheticField,
    ];
}

#[async_trait(?Send)]
pub trait ClipboardBackend {
    /// Returns `true` when the content reached the clipboard.
    async fn attempt(&self, method: CopyMethod, content: &ClipboardContent) -> bool;
}

/// Tries each copy method in order and reports the first one that worked.
pub async fn export<B>(backend: &B, content: &ClipboardContent) -> Result<CopyMethod, ClipboardError>
where
    B: ClipboardBackend + ?Sized,
{
    for method in CopyMethod::FALLBACK_ORDER {
        if backend.attempt(method, content).await {
            tracing::debug!("copied {} via {method:?}", content.region_id);
            return Ok(method);
        }
        tracing::debug!("{method:?} failed for {}, trying next method", content.region_id);
    }
    Err(ClipboardError)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
