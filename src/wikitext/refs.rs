use regex::{Captures, Regex};
use std::sync::OnceLock;

const SALT_SEED: &str = "\u{7f}UNIQ";
const MARKER_END: char = '\u{7f}';

/// Reference tags removed from a text, in order of removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    references: Vec<String>,
    salt: String,
}

impl ReferenceTable {
    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn references(&self) -> &[String] {
        &self.references
    }
}

fn reference_regex() -> &'static Regex {
    static REFERENCE: OnceLock<Regex> = OnceLock::new();
    REFERENCE.get_or_init(|| {
        Regex::new(r"<ref\b[^>]*?/>|<ref\b[^>]*>.*?</ref>").expect("regex for reference tags")
    })
}

/// Replace every `<ref>` span with `salt + index + U+007F`.
pub fn strip_references(text: &str) -> (String, ReferenceTable) {
    let mut salt = SALT_SEED.to_string();
    while text.contains(&salt) {
        salt.push('f');
    }

    let mut references = Vec::new();
    let sanitized = reference_regex()
        .replace_all(text, |caps: &Captures<'_>| {
            let marker = format!("{salt}{}{MARKER_END}", references.len());
            references.push(caps[0].to_string());
            marker
        })
        .into_owned();

    (sanitized, ReferenceTable { references, salt })
}

/// Put stripped references back. Works on any fragment of the sanitized text.
pub fn restore_references(text: &str, table: &ReferenceTable) -> String {
    if table.is_empty() {
        return text.to_string();
    }

    let mut restored = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(table.salt.as_str()) {
        restored.push_str(&rest[..pos]);
        let after = &rest[pos + table.salt.len()..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let reference = after[..digits]
            .parse::<usize>()
            .ok()
            .filter(|_| after[digits..].starts_with(MARKER_END))
            .and_then(|index| table.references.get(index));
        match reference {
            Some(reference) => {
                restored.push_str(reference);
                rest = &after[digits + MARKER_END.len_utf8()..];
            }
            None => {
                restored.push_str(&table.salt);
                rest = after;
            }
        }
    }
    restored.push_str(rest);
    restored
}
