//! Assistant context for the active feed item.
//!
//! Renders the published snapshot as a short Markdown block the assistant
//! can splice into its prompt.

use crate::feed::ActiveItem;

/// Maximum excerpt length included in the context block.
const MAX_EXCERPT_CHARS: usize = 280;

/// Generate context describing what the user is looking at.
pub fn assistant_context(item: &ActiveItem) -> String {
    let mut sections = vec![format!(
        "**Currently Viewing:** {} post `{}`",
        item.kind.as_str(),
        item.id
    )];

    if let Some(content) = item.content.as_deref().map(str::trim) {
        if !content.is_empty() {
            sections.push(format!("**Excerpt:** {}", truncate(content, MAX_EXCERPT_CHARS)));
        }
    }

    if let Some(url) = &item.media_url {
        sections.push(format!("**Media:** {}", url));
    }

    sections.join("\n")
}

/// `assistant_context` for an optional snapshot; `None` when nothing is active.
pub fn assistant_context_for(item: Option<&ActiveItem>) -> Option<String> {
    item.map(assistant_context)
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::MediaKind;

    fn item(content: Option<&str>, media_url: Option<&str>) -> ActiveItem {
        ActiveItem {
            id: "post-12".into(),
            content: content.map(String::from),
            media_url: media_url.map(String::from),
            kind: MediaKind::Video,
        }
    }

    #[test]
    fn test_full_context() {
        let ctx = assistant_context(&item(
            Some("Choir rehearsal highlights"),
            Some("https://cdn.example.org/choir.mp4"),
        ));
        assert_eq!(
            ctx,
            "**Currently Viewing:** video post `post-12`\n\
             **Excerpt:** Choir rehearsal highlights\n\
             **Media:** https://cdn.example.org/choir.mp4"
        );
    }

    #[test]
    fn test_blank_content_is_omitted() {
        let ctx = assistant_context(&item(Some("   "), None));
        assert_eq!(ctx, "**Currently Viewing:** video post `post-12`");
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let long = "é".repeat(MAX_EXCERPT_CHARS + 20);
        let ctx = assistant_context(&item(Some(&long), None));
        let excerpt = ctx.lines().nth(1).unwrap();
        assert!(excerpt.ends_with("..."));
        assert_eq!(
            excerpt.trim_start_matches("**Excerpt:** ").chars().count(),
            MAX_EXCERPT_CHARS + 3
        );
    }

    #[test]
    fn test_nothing_active() {
        assert_eq!(assistant_context_for(None), None);
        assert!(assistant_context_for(Some(&item(None, None))).is_some());
    }
}
