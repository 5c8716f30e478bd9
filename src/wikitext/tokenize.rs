use super::refs::{restore_references, ReferenceTable};
use crate::error::ParseError;
use std::collections::BTreeMap;
use std::ops::Range;

/// Literal parameter name → trimmed value, references restored.
pub type RawFieldMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Neutral,
    InFieldName { start: usize },
    InFieldValue { name: Range<usize>, start: usize },
}

/// Splits a template body into parameters.
///
/// `{{ }}`, `[[ ]]` and `< >` spans are opaque: pipes and equals signs inside
/// them never delimit fields.
struct Tokenizer<'a> {
    source: &'a str,
    references: &'a ReferenceTable,
    state: State,
    bracket_depth: usize,
    /// Offset of the outermost span still open.
    span_start: usize,
    fields: RawFieldMap,
}

impl<'a> Tokenizer<'a> {
    fn new(source: &'a str, references: &'a ReferenceTable) -> Self {
        Self {
            source,
            references,
            state: State::Neutral,
            bracket_depth: 0,
            span_start: 0,
            fields: RawFieldMap::new(),
        }
    }

    fn at_top_level(&self) -> bool {
        self.bracket_depth == 0
    }

    fn open_span(&mut self, offset: usize) {
        if self.at_top_level() {
            self.span_start = offset;
        }
        self.bracket_depth += 1;
    }

    fn close_span(&mut self) {
        self.bracket_depth = self.bracket_depth.saturating_sub(1);
    }

    fn on_pipe(&mut self, offset: usize) -> Result<(), ParseError> {
        match std::mem::replace(&mut self.state, State::Neutral) {
            State::Neutral => {}
            State::InFieldName { start } => return Err(unclosed_name(self.source, start)),
            State::InFieldValue { name, start } => self.emit(name, start..offset)?,
        }
        self.state = State::InFieldName { start: offset + 1 };
        Ok(())
    }

    fn on_equals(&mut self, offset: usize) {
        if let State::InFieldName { start } = self.state {
            self.state = State::InFieldValue {
                name: start..offset,
                start: offset + 1,
            };
        }
    }

    fn emit(&mut self, name: Range<usize>, value: Range<usize>) -> Result<(), ParseError> {
        let field_name = self.source[name.clone()].trim();
        if field_name.is_empty() {
            return Err(ParseError::MalformedField {
                offset: name.start,
                detail: "field opened with no name".to_string(),
            });
        }
        let field_value = restore_references(self.source[value].trim(), self.references);
        tracing::trace!(field = field_name, "tokenized field");
        self.fields.insert(field_name.to_string(), field_value);
        Ok(())
    }

    fn finish(mut self) -> Result<RawFieldMap, ParseError> {
        if !self.at_top_level() {
            let excerpt: String = self.source[self.span_start..].chars().take(40).collect();
            return Err(ParseError::MalformedField {
                offset: self.span_start,
                detail: format!("span {:?} is never closed", excerpt.trim()),
            });
        }
        match std::mem::replace(&mut self.state, State::Neutral) {
            State::Neutral => {}
            State::InFieldName { start } => return Err(unclosed_name(self.source, start)),
            State::InFieldValue { name, start } => self.emit(name, start..self.source.len())?,
        }
        Ok(self.fields)
    }
}

fn unclosed_name(source: &str, start: usize) -> ParseError {
    let excerpt: String = source[start..].chars().take(40).collect();
    ParseError::MalformedField {
        offset: start,
        detail: format!("field name {:?} is never closed with `=`", excerpt.trim()),
    }
}

/// Tokenize a reference-sanitized template body.
pub fn tokenize(body: &str, references: &ReferenceTable) -> Result<RawFieldMap, ParseError> {
    let bytes = body.as_bytes();
    let mut tokenizer = Tokenizer::new(body, references);
    let mut i = 0;
    while i < bytes.len() {
        let next = bytes.get(i + 1).copied();
        match (bytes[i], next) {
            (b'{', Some(b'{')) | (b'[', Some(b'[')) => {
                tokenizer.open_span(i);
                i += 2;
                continue;
            }
            (b'}', Some(b'}')) | (b']', Some(b']')) => {
                tokenizer.close_span();
                i += 2;
                continue;
            }
            (b'<', _) => tokenizer.open_span(i),
            (b'>', _) => tokenizer.close_span(),
            (b'|', _) if tokenizer.at_top_level() => tokenizer.on_pipe(i)?,
            (b'=', _) if tokenizer.at_top_level() => tokenizer.on_equals(i),
            _ => {}
        }
        i += 1;
    }
    tokenizer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(body: &str) -> RawFieldMap {
        tokenize(body, &ReferenceTable::default()).expect("tokenize body")
    }

    #[test]
    fn splits_top_level_parameters() {
        let raw = fields("GNF_Protein_box\n | Name = Breast cancer 1\n | Symbol = BRCA1\n");
        assert_eq!(raw.len(), 2);
        assert_eq!(raw["Name"], "Breast cancer 1");
        assert_eq!(raw["Symbol"], "BRCA1");
    }

    #[test]
    fn pipes_inside_links_are_opaque() {
        let raw = fields("box\n | Name = see [[Page|Label]] here\n | Symbol = X");
        assert_eq!(raw.len(), 2);
        assert_eq!(raw["Name"], "see [[Page|Label]] here");
    }

    #[test]
    fn nested_templates_and_tags_are_opaque() {
        let raw = fields(
            "box | PDB = {{PDB2|1ABC}}, {{PDB2|2XYZ}} | Function = {{GNF_GO|id=GO:0005515 |text = protein binding}} | image = <span a=\"b|c\">x</span>",
        );
        assert_eq!(raw.len(), 3);
        assert_eq!(raw["PDB"], "{{PDB2|1ABC}}, {{PDB2|2XYZ}}");
        assert_eq!(
            raw["Function"],
            "{{GNF_GO|id=GO:0005515 |text = protein binding}}"
        );
        assert_eq!(raw["image"], "<span a=\"b|c\">x</span>");
    }

    #[test]
    fn equals_inside_value_is_literal() {
        let raw = fields("| Name = a = b | Symbol =");
        assert_eq!(raw["Name"], "a = b");
        assert_eq!(raw["Symbol"], "");
    }

    #[test]
    fn name_without_equals_is_malformed() {
        let err = tokenize("|Name", &ReferenceTable::default()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedField { offset: 1, .. }));

        let err = tokenize("|Name|Symbol=X", &ReferenceTable::default()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedField { .. }));
    }

    #[test]
    fn empty_name_is_malformed() {
        let err = tokenize("| = value", &ReferenceTable::default()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedField { .. }));
    }

    #[test]
    fn stray_closers_do_not_underflow_depth() {
        let raw = fields("| Name = 5 > 3 | Symbol = X");
        assert_eq!(raw["Name"], "5 > 3");
        assert_eq!(raw["Symbol"], "X");
    }

    #[test]
    fn unclosed_spans_are_malformed() {
        for (body, offset) in [
            ("| Name = p < 0.05 cutoff\n | Symbol = TP53", 11),
            ("| Name = see [[Page\n | Symbol = TP53", 13),
            ("| Name = {{nowrap|a\n | Symbol = TP53", 9),
        ] {
            let err = tokenize(body, &ReferenceTable::default()).unwrap_err();
            assert!(
                matches!(err, ParseError::MalformedField { offset: at, .. } if at == offset),
                "{body:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn references_are_restored_per_value() {
        let (body, table) = super::super::refs::strip_references(
            "| Name = BRCA1<ref name=\"a|b\">cite=1</ref> | Symbol = X<ref>y</ref>",
        );
        let raw = tokenize(&body, &table).unwrap();
        assert_eq!(raw["Name"], "BRCA1<ref name=\"a|b\">cite=1</ref>");
        assert_eq!(raw["Symbol"], "X<ref>y</ref>");
    }
}
