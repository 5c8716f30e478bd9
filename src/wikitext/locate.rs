use crate::error::ParseError;
use regex::Regex;
use std::sync::OnceLock;

/// Byte span of a template invocation, outer braces included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSpan<'a> {
    /// Offset of the opening `{{`.
    pub start: usize,
    /// Offset just past the closing `}}`.
    pub end: usize,
    /// Text strictly between the outer braces.
    pub body: &'a str,
}

fn opening_regex() -> &'static Regex {
    static OPENING: OnceLock<Regex> = OnceLock::new();
    OPENING.get_or_init(|| {
        Regex::new(r"\{\{\s?([\w\s]*)\s?(\||\})").expect("regex for template openings")
    })
}

/// Locate the first invocation whose leading token contains `template_name`.
pub fn find_template<'a>(text: &'a str, template_name: &str) -> Result<TemplateSpan<'a>, ParseError> {
    let start = opening_regex()
        .captures_iter(text)
        .find(|caps| {
            caps.get(1)
                .is_some_and(|token| token.as_str().contains(template_name))
        })
        .and_then(|caps| caps.get(0))
        .map(|whole| whole.start())
        .ok_or_else(|| ParseError::TemplateNotFound(template_name.to_string()))?;

    let end = closing_offset(text, start).ok_or_else(|| ParseError::UnbalancedTemplate {
        name: template_name.to_string(),
        start,
    })?;

    Ok(TemplateSpan {
        start,
        end,
        body: &text[start + 2..end - 2],
    })
}

/// Walk from the opening `{{` until brace depth returns to zero.
fn closing_offset(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = start;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'{', b'{') => {
                depth += 1;
                i += 2;
            }
            (b'}', b'}') => {
                depth = depth.saturating_sub(1);
                i += 2;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => i += 1,
        }
    }
    None
}
