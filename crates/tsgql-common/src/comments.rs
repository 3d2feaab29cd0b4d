//! Comment ranges and JSDoc extraction.
//!
//! Comments are not part of the AST. The scanner records their ranges while
//! skipping trivia, and declarations look up the JSDoc block that directly
//! precedes them through the helpers here.

use serde::Serialize;

/// A range representing a comment in the source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommentRange {
    /// Start position (byte offset)
    pub pos: u32,
    /// End position (byte offset)
    pub end: u32,
    /// Whether this is a multi-line comment
    pub is_multi_line: bool,
}

impl CommentRange {
    /// Create a new comment range.
    pub fn new(pos: u32, end: u32, is_multi_line: bool) -> Self {
        CommentRange {
            pos,
            end,
            is_multi_line,
        }
    }

    /// Get the comment text from source.
    pub fn get_text<'a>(&self, source: &'a str) -> &'a str {
        source
            .get(self.pos as usize..self.end as usize)
            .unwrap_or("")
    }
}

/// Check if a comment is a JSDoc comment.
pub fn is_jsdoc_comment(comment: &CommentRange, source: &str) -> bool {
    let text = comment.get_text(source);
    text.starts_with("/**") && !text.starts_with("/***") && text.len() >= 5
}

/// Extract the content of a JSDoc comment (without the delimiters).
pub fn get_jsdoc_content(comment: &CommentRange, source: &str) -> String {
    let text = comment.get_text(source);
    let Some(inner) = text
        .strip_prefix("/**")
        .and_then(|rest| rest.strip_suffix("*/"))
    else {
        return text.to_string();
    };

    // Remove leading * from each line
    inner
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            match trimmed.strip_prefix('*') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest).trim_end(),
                None => trimmed.trim_end(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Get the comments directly attached in front of `pos`.
///
/// Walks backwards from `pos` over the cached (position-sorted) comment
/// ranges and keeps collecting while only whitespace separates a comment
/// from the code or comment after it. Comments separated by more than one
/// blank line are not attached.
pub fn get_leading_comments_from_cache(
    comments: &[CommentRange],
    pos: u32,
    source: &str,
) -> Vec<CommentRange> {
    let idx = comments.partition_point(|c| c.end <= pos);
    let mut result: Vec<CommentRange> = Vec::new();
    let mut check_pos = pos;

    for comment in comments[..idx].iter().rev() {
        let Some(text_between) = source.get(comment.end as usize..check_pos as usize) else {
            break;
        };
        if !text_between.chars().all(char::is_whitespace) {
            break;
        }
        if memchr::memchr_iter(b'\n', text_between.as_bytes()).count() > 2 {
            break;
        }

        result.push(comment.clone());
        check_pos = comment.pos;
    }

    result.reverse();
    result
}

/// The content of the JSDoc comment nearest to `pos`, if any.
pub fn get_leading_jsdoc(comments: &[CommentRange], pos: u32, source: &str) -> Option<String> {
    get_leading_comments_from_cache(comments, pos, source)
        .iter()
        .rev()
        .find(|c| is_jsdoc_comment(c, source))
        .map(|c| get_jsdoc_content(c, source))
}
