//! Structured JSDoc parsing.
//!
//! Splits the content of a JSDoc block (as returned by
//! [`crate::comments::get_jsdoc_content`]) into its free-text description and
//! an ordered list of `@title description` tags.

use serde::Serialize;

/// A single `@title description` tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JsDocTag {
    pub title: String,
    /// Remaining text of the tag, continuation lines joined with `\n`.
    /// `None` when the tag has no text at all.
    pub description: Option<String>,
}

impl JsDocTag {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
        }
    }

    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// A parsed JSDoc block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct JsDoc {
    pub description: String,
    pub tags: Vec<JsDocTag>,
}

impl JsDoc {
    pub fn find_tag(&self, title: &str) -> Option<&JsDocTag> {
        self.tags.iter().find(|t| t.title == title)
    }
}

/// Parse JSDoc content into description and tags.
///
/// A tag starts at a line whose first non-blank character is `@`; the tag
/// title runs up to the first whitespace. Lines that follow a tag without
/// starting a new one continue that tag's description.
pub fn parse_jsdoc(content: &str) -> JsDoc {
    let mut description_lines: Vec<&str> = Vec::new();
    let mut tags: Vec<(String, Vec<&str>)> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix('@') {
            let title_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let (title, text) = rest.split_at(title_end);
            if !title.is_empty() {
                tags.push((title.to_string(), vec![text.trim()]));
                continue;
            }
        }

        match tags.last_mut() {
            Some((_, lines)) => lines.push(trimmed),
            None => description_lines.push(trimmed),
        }
    }

    JsDoc {
        description: description_lines.join("\n").trim().to_string(),
        tags: tags
            .into_iter()
            .map(|(title, lines)| {
                let text = lines.join("\n").trim().to_string();
                JsDocTag::new(title, (!text.is_empty()).then_some(text))
            })
            .collect(),
    }
}
