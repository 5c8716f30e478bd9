//! The closed `GNF_Protein_box` field schema.
//!
//! Field names mirror the upstream template parameters exactly and appear in
//! render order. Changing this table is a breaking change for every stored page.
use crate::error::FieldError;
use regex::Regex;
use std::sync::OnceLock;

const GENERIC: &str = r"^[\w-]+$";
const DIGITS: &str = r"^\d+$";
const GO_TERM: &str = r"^GO:\d+$";
const REFSEQ_MRNA: &str = r"^NM_\d+(\.\d+)?$";
const REFSEQ_PROTEIN: &str = r"^NP_\d+(\.\d+)?$";
const UNIPROT: &str = r"^(?i)[a-z0-9]{6}$";

/// How a field's markup value is structured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    /// `{{PDB2|ID}}` wrappers separated by `, `.
    IdentifierList,
    /// Alternate symbols separated by `; `.
    AltNames,
    /// Codes separated by `, `.
    Codes,
    /// `{{GNF_GO|id=GO:N |text = T}}` annotations.
    Ontology,
}

impl FieldKind {
    pub fn is_multivalue(self) -> bool {
        !matches!(self, FieldKind::Scalar)
    }
}

/// One schema entry. A missing pattern accepts any value.
#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pattern: Option<&'static str>,
}

const fn scalar(name: &'static str, pattern: Option<&'static str>) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Scalar,
        pattern,
    }
}

const fn multi(name: &'static str, kind: FieldKind, pattern: Option<&'static str>) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        pattern,
    }
}

const FIELD_SPECS: &[FieldSpec] = &[
    scalar("Name", None),
    scalar("image", None),
    scalar("image_source", None),
    multi("PDB", FieldKind::IdentifierList, Some(r"^\w{4}$")),
    scalar("HGNCid", Some(GENERIC)),
    scalar("MGIid", Some(GENERIC)),
    scalar("Symbol", Some(GENERIC)),
    multi("AltSymbols", FieldKind::AltNames, None),
    scalar("IUPHAR", None),
    scalar("ChEMBL", None),
    scalar("OMIM", Some(r"^\d{6}$")),
    multi("ECnumber", FieldKind::Codes, None),
    scalar("Homologene", None),
    scalar("GeneAtlas_image1", None),
    scalar("GeneAtlas_image2", None),
    scalar("GeneAtlas_image3", None),
    scalar("Protein_domain_image", None),
    multi("Function", FieldKind::Ontology, Some(GO_TERM)),
    multi("Component", FieldKind::Ontology, Some(GO_TERM)),
    multi("Process", FieldKind::Ontology, Some(GO_TERM)),
    scalar("Hs_EntrezGene", Some(DIGITS)),
    scalar("Hs_Ensembl", Some(GENERIC)),
    scalar("Hs_RefseqmRNA", Some(REFSEQ_MRNA)),
    scalar("Hs_RefseqProtein", Some(REFSEQ_PROTEIN)),
    scalar("Hs_GenLoc_db", Some(r"^(?i)hg\d+$")),
    scalar("Hs_GenLoc_chr", None),
    scalar("Hs_GenLoc_start", Some(DIGITS)),
    scalar("Hs_GenLoc_end", Some(DIGITS)),
    scalar("Hs_Uniprot", Some(UNIPROT)),
    scalar("Mm_EntrezGene", Some(DIGITS)),
    scalar("Mm_Ensembl", Some(GENERIC)),
    scalar("Mm_RefseqmRNA", Some(REFSEQ_MRNA)),
    scalar("Mm_RefseqProtein", Some(REFSEQ_PROTEIN)),
    scalar("Mm_GenLoc_db", Some(r"^(?i)mm\d+$")),
    scalar("Mm_GenLoc_chr", None),
    scalar("Mm_GenLoc_start", Some(DIGITS)),
    scalar("Mm_GenLoc_end", Some(DIGITS)),
    scalar("Mm_Uniprot", Some(UNIPROT)),
    scalar("path", Some(r"^PBB/\d+$")),
    scalar("before_text", None),
    scalar("after_text", None),
];

pub const IMAGE: &str = "image";
pub const IMAGE_SOURCE: &str = "image_source";
pub const PDB: &str = "PDB";
pub const SYMBOL: &str = "Symbol";
pub const ENTREZ_GENE: &str = "Hs_EntrezGene";
pub const PATH: &str = "path";
pub const BEFORE_TEXT: &str = "before_text";
pub const AFTER_TEXT: &str = "after_text";

/// Prefix of the derived `path` field.
pub const PATH_PREFIX: &str = "PBB";

/// The compiled, process-wide schema.
pub struct FieldSchema {
    specs: &'static [FieldSpec],
    patterns: Vec<Option<Regex>>,
}

impl FieldSchema {
    fn compile(specs: &'static [FieldSpec]) -> Self {
        let patterns = specs
            .iter()
            .map(|spec| {
                spec.pattern
                    .map(|pattern| Regex::new(pattern).expect("regex for field pattern"))
            })
            .collect();
        Self { specs, patterns }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Field specs in render order.
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        let specs: &'static [FieldSpec] = self.specs;
        specs.iter()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|spec| spec.name == name)
    }

    pub(crate) fn spec_at(&self, index: usize) -> &'static FieldSpec {
        &self.specs[index]
    }

    pub fn lookup(&self, name: &str) -> Result<(usize, &'static FieldSpec), FieldError> {
        self.index_of(name)
            .map(|index| (index, &self.specs[index]))
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))
    }

    /// Whether a single entry (or an ontology key) passes the field's pattern.
    pub(crate) fn accepts(&self, index: usize, entry: &str) -> bool {
        match &self.patterns[index] {
            Some(regex) => regex.is_match(entry),
            None => true,
        }
    }
}

pub fn schema() -> &'static FieldSchema {
    static SCHEMA: OnceLock<FieldSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| FieldSchema::compile(FIELD_SPECS))
}
