//! Deterministic protein box renderer.
//!
//! The layout is an ordered list of `(literal, field)` segments reproducing the
//! upstream template's parameter layout byte for byte.
use crate::model::{FieldValue, OntologyTerm, ProteinBox};
use crate::schema::{self, FieldKind, AFTER_TEXT, BEFORE_TEXT};
use crate::wikitext::TEMPLATE_NAME;

/// Template parameters in render order; the surrounding text wraps them.
const LAYOUT: &[(&str, &str)] = &[
    ("\n | Name = ", "Name"),
    ("\n | image = ", "image"),
    ("\n | image_source = ", "image_source"),
    ("\n | PDB = ", "PDB"),
    ("\n | HGNCid = ", "HGNCid"),
    ("\n | MGIid = ", "MGIid"),
    ("\n | Symbol = ", "Symbol"),
    ("\n | AltSymbols =", "AltSymbols"),
    ("\n | IUPHAR = ", "IUPHAR"),
    ("\n | ChEMBL = ", "ChEMBL"),
    ("\n | OMIM = ", "OMIM"),
    ("\n | ECnumber = ", "ECnumber"),
    ("\n | Homologene = ", "Homologene"),
    ("\n | GeneAtlas_image1 = ", "GeneAtlas_image1"),
    ("\n | GeneAtlas_image2 = ", "GeneAtlas_image2"),
    ("\n | GeneAtlas_image3 = ", "GeneAtlas_image3"),
    ("\n | Protein_domain_image = ", "Protein_domain_image"),
    ("\n | Function = ", "Function"),
    ("\n | Component = ", "Component"),
    ("\n | Process = ", "Process"),
    ("\n | Hs_EntrezGene = ", "Hs_EntrezGene"),
    ("\n | Hs_Ensembl = ", "Hs_Ensembl"),
    ("\n | Hs_RefseqmRNA = ", "Hs_RefseqmRNA"),
    ("\n | Hs_RefseqProtein = ", "Hs_RefseqProtein"),
    ("\n | Hs_GenLoc_db = ", "Hs_GenLoc_db"),
    ("\n | Hs_GenLoc_chr = ", "Hs_GenLoc_chr"),
    ("\n | Hs_GenLoc_start = ", "Hs_GenLoc_start"),
    ("\n | Hs_GenLoc_end = ", "Hs_GenLoc_end"),
    ("\n | Hs_Uniprot = ", "Hs_Uniprot"),
    ("\n | Mm_EntrezGene = ", "Mm_EntrezGene"),
    ("\n | Mm_Ensembl = ", "Mm_Ensembl"),
    ("\n | Mm_RefseqmRNA = ", "Mm_RefseqmRNA"),
    ("\n | Mm_RefseqProtein = ", "Mm_RefseqProtein"),
    ("\n | Mm_GenLoc_db = ", "Mm_GenLoc_db"),
    ("\n | Mm_GenLoc_chr = ", "Mm_GenLoc_chr"),
    ("\n | Mm_GenLoc_start = ", "Mm_GenLoc_start"),
    ("\n | Mm_GenLoc_end = ", "Mm_GenLoc_end"),
    ("\n | Mm_Uniprot = ", "Mm_Uniprot"),
    ("\n | path = ", "path"),
];

pub fn render(pbox: &ProteinBox) -> String {
    render_as(pbox, TEMPLATE_NAME)
}

/// Render under a configured template name, so `parse_with` finds it again.
pub fn render_as(pbox: &ProteinBox, template_name: &str) -> String {
    let mut out = String::new();
    append_field(&mut out, pbox, BEFORE_TEXT);
    out.push_str("{{");
    out.push_str(template_name);
    for (literal, name) in LAYOUT {
        out.push_str(literal);
        append_field(&mut out, pbox, name);
    }
    out.push_str("\n}}");
    append_field(&mut out, pbox, AFTER_TEXT);
    out
}

fn append_field(out: &mut String, pbox: &ProteinBox, name: &str) {
    let schema = schema::schema();
    if let Some(index) = schema.index_of(name) {
        append_value(out, schema.spec_at(index).kind, pbox.value_at(index));
    }
}

fn append_value(out: &mut String, kind: FieldKind, value: &FieldValue) {
    match value {
        FieldValue::Text(text) => out.push_str(text),
        FieldValue::List(items) => match kind {
            FieldKind::IdentifierList => append_identifiers(out, items),
            FieldKind::AltNames => append_alternate_names(out, items),
            _ => out.push_str(&items.join(", ")),
        },
        FieldValue::Terms(terms) => append_terms(out, terms),
    }
}

fn append_identifiers(out: &mut String, ids: &[String]) {
    let wrapped: Vec<String> = ids
        .iter()
        .filter(|id| !id.trim().is_empty())
        .map(|id| format!("{{{{PDB2|{id}}}}}"))
        .collect();
    out.push_str(&wrapped.join(", "));
}

fn append_alternate_names(out: &mut String, names: &[String]) {
    if names.is_empty() {
        return;
    }
    out.push_str("; ");
    out.push_str(&names.join("; "));
}

/// Terms are joined with a single space, as on live pages.
fn append_terms(out: &mut String, terms: &[OntologyTerm]) {
    let wrapped: Vec<String> = terms
        .iter()
        .map(|term| format!("{{{{GNF_GO|id={} |text = {}}}}}", term.id, term.text))
        .collect();
    out.push_str(&wrapped.join(" "));
}
