use super::tokenize::RawFieldMap;
use crate::error::ParseError;
use crate::model::{FieldValue, OntologyTerm, ProteinBox, RejectPolicy};
use crate::schema::{self, FieldKind};
use regex::Regex;
use std::sync::OnceLock;

fn pdb_regex() -> &'static Regex {
    static PDB: OnceLock<Regex> = OnceLock::new();
    PDB.get_or_init(|| Regex::new(r"\{\{PDB2\|([\w\d]*)\}\}").expect("regex for PDB2 wrappers"))
}

fn go_regex() -> &'static Regex {
    static GO: OnceLock<Regex> = OnceLock::new();
    GO.get_or_init(|| {
        Regex::new(r"\{\{GNF_GO\s?\|\s?id=(GO:\d*)\s?\|\s?text\s?=\s?([^\}]*)\}\}")
            .expect("regex for GNF_GO wrappers")
    })
}

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[\w\d]+").expect("regex for word characters"))
}

pub(super) fn identifiers(raw: &str) -> Vec<String> {
    pdb_regex()
        .captures_iter(raw)
        .map(|caps| caps[1].to_string())
        .collect()
}

pub(super) fn alternate_names(raw: &str) -> Vec<String> {
    if !word_regex().is_match(raw) {
        return Vec::new();
    }
    raw.split("; ")
        .filter(|name| !name.is_empty() && *name != ";")
        .map(str::to_string)
        .collect()
}

pub(super) fn codes(raw: &str) -> Vec<String> {
    raw.split(", ")
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

pub(super) fn ontology_terms(raw: &str) -> Vec<OntologyTerm> {
    go_regex()
        .captures_iter(raw)
        .map(|caps| OntologyTerm::new(&caps[1], &caps[2]))
        .collect()
}

/// Apply each field's sub-grammar and build the typed record.
pub fn postprocess(raw: &RawFieldMap, policy: RejectPolicy) -> Result<ProteinBox, ParseError> {
    let schema = schema::schema();
    let mut pbox = ProteinBox::default();

    for spec in schema.fields() {
        let Some(value) = raw.get(spec.name).filter(|value| !value.is_empty()) else {
            continue;
        };
        let typed = match spec.kind {
            FieldKind::Scalar => FieldValue::Text(value.clone()),
            FieldKind::IdentifierList => FieldValue::List(identifiers(value)),
            FieldKind::AltNames => FieldValue::List(alternate_names(value)),
            FieldKind::Codes => FieldValue::List(codes(value)),
            FieldKind::Ontology => FieldValue::Terms(ontology_terms(value)),
        };
        pbox.set_with_policy(spec.name, typed, policy)?;
    }

    for name in raw.keys().filter(|name| schema.index_of(name).is_none()) {
        tracing::debug!(field = %name, "ignoring parameter outside the protein box schema");
    }

    pbox.derive_path(policy)?;
    Ok(pbox)
}
