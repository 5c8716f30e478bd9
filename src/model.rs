//! The protein box record: every schema field, always present.
use crate::error::FieldError;
use crate::schema::{self, FieldKind, FieldSpec, ENTREZ_GENE, IMAGE, PATH, PATH_PREFIX, PDB, SYMBOL};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A single ontology annotation (`GO:0005515` → `protein binding`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyTerm {
    pub id: String,
    pub text: String,
}

impl OntologyTerm {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Terms(Vec<OntologyTerm>),
}

impl FieldValue {
    pub fn empty_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Scalar => FieldValue::Text(String::new()),
            FieldKind::Ontology => FieldValue::Terms(Vec::new()),
            FieldKind::IdentifierList | FieldKind::AltNames | FieldKind::Codes => {
                FieldValue::List(Vec::new())
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Terms(terms) => terms.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_terms(&self) -> Option<&[OntologyTerm]> {
        match self {
            FieldValue::Terms(terms) => Some(terms),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{text:?}"),
            FieldValue::List(items) => write!(f, "{items:?}"),
            FieldValue::Terms(terms) => {
                let pairs: Vec<String> = terms
                    .iter()
                    .map(|term| format!("{}: {}", term.id, term.text))
                    .collect();
                write!(f, "{pairs:?}")
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<OntologyTerm>> for FieldValue {
    fn from(value: Vec<OntologyTerm>) -> Self {
        FieldValue::Terms(value)
    }
}

/// What a rejected value means to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectPolicy {
    /// Log the rejection and keep the field's previous value.
    #[default]
    Keep,
    /// Surface the rejection as an error.
    Abort,
}

impl RejectPolicy {
    /// Resolve a setter result under this policy.
    pub fn resolve(self, result: Result<(), FieldError>) -> Result<(), FieldError> {
        match (self, result) {
            (RejectPolicy::Keep, Err(FieldError::ValidationRejected { field, reason })) => {
                tracing::warn!(field = %field, reason = %reason, "validation failed; keeping previous value");
                Ok(())
            }
            (_, result) => result,
        }
    }
}

/// A fully populated `GNF_Protein_box` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinBox {
    values: Vec<FieldValue>,
}

impl Default for ProteinBox {
    fn default() -> Self {
        let values = schema::schema()
            .fields()
            .map(|spec| FieldValue::empty_for(spec.kind))
            .collect();
        Self { values }
    }
}

/// A box with every field at its zero value.
pub fn default_field_map() -> ProteinBox {
    ProteinBox::default()
}

impl ProteinBox {
    pub fn get(&self, name: &str) -> Result<&FieldValue, FieldError> {
        let (index, _) = schema::schema().lookup(name)?;
        Ok(&self.values[index])
    }

    /// Text of a scalar field, or `""` for a multi-value one.
    pub fn text(&self, name: &str) -> Result<&str, FieldError> {
        Ok(self.get(name)?.as_text().unwrap_or_default())
    }

    /// Fields and values in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldSpec, &FieldValue)> {
        schema::schema().fields().zip(self.values.iter())
    }

    pub(crate) fn value_at(&self, index: usize) -> &FieldValue {
        &self.values[index]
    }

    pub(crate) fn replace_at(&mut self, index: usize, value: FieldValue) {
        self.values[index] = value;
    }

    /// Checked setter: coerces to the field's shape, then validates every entry.
    ///
    /// On rejection the field keeps its previous value.
    pub fn set_field(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), FieldError> {
        let schema = schema::schema();
        let (index, spec) = schema.lookup(name)?;
        let value = coerce(spec, value.into())?;
        if let Some(bad) = first_invalid_entry(index, &value) {
            return Err(FieldError::ValidationRejected {
                field: spec.name.to_string(),
                reason: format!("{bad:?} does not match the field pattern"),
            });
        }
        self.values[index] = value;
        Ok(())
    }

    /// Coerces but skips pattern validation.
    pub fn set_field_unchecked(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), FieldError> {
        let (index, spec) = schema::schema().lookup(name)?;
        self.values[index] = coerce(spec, value.into())?;
        Ok(())
    }

    /// Checked set whose rejection is resolved by `policy`.
    pub fn set_with_policy(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
        policy: RejectPolicy,
    ) -> Result<(), FieldError> {
        policy.resolve(self.set_field(name, value))
    }

    /// `PBB/<Hs_EntrezGene>`, when the gene id is known.
    pub fn derived_path(&self) -> Option<String> {
        let entrez = self.text(ENTREZ_GENE).ok()?;
        (!entrez.is_empty()).then(|| format!("{PATH_PREFIX}/{entrez}"))
    }

    /// Recompute `path` from the human Entrez gene id. No-op without an id.
    pub fn derive_path(&mut self, policy: RejectPolicy) -> Result<(), FieldError> {
        match self.derived_path() {
            Some(path) => self.set_with_policy(PATH, path, policy),
            None => Ok(()),
        }
    }

    /// A structure and symbol are known but nothing is illustrating them yet.
    pub fn needs_image(&self) -> bool {
        let has = |name: &str| self.get(name).map(|value| !value.is_empty());
        matches!(
            (has(PDB), has(SYMBOL), has(IMAGE)),
            (Ok(true), Ok(true), Ok(false))
        )
    }
}

fn coerce(spec: &FieldSpec, value: FieldValue) -> Result<FieldValue, FieldError> {
    let mismatch = |expected: &str| FieldError::ValidationRejected {
        field: spec.name.to_string(),
        reason: format!("expected {expected}"),
    };
    match (spec.kind, value) {
        (FieldKind::Scalar, FieldValue::Text(text)) => Ok(FieldValue::Text(text)),
        (FieldKind::Scalar, _) => Err(mismatch("a single value")),
        (FieldKind::Ontology, FieldValue::Terms(terms)) => Ok(FieldValue::Terms(terms)),
        (FieldKind::Ontology, value) if value.is_empty() => Ok(FieldValue::Terms(Vec::new())),
        (FieldKind::Ontology, _) => Err(mismatch("ontology terms")),
        (_, FieldValue::List(items)) => Ok(FieldValue::List(items)),
        (_, FieldValue::Text(text)) if text.is_empty() => Ok(FieldValue::List(Vec::new())),
        (_, FieldValue::Text(text)) => Ok(FieldValue::List(vec![text])),
        (_, value) if value.is_empty() => Ok(FieldValue::List(Vec::new())),
        (_, FieldValue::Terms(_)) => Err(mismatch("a list of values")),
    }
}

fn first_invalid_entry(index: usize, value: &FieldValue) -> Option<String> {
    let schema = schema::schema();
    match value {
        FieldValue::Text(text) if text.is_empty() => None,
        FieldValue::Text(text) => (!schema.accepts(index, text)).then(|| text.clone()),
        FieldValue::List(items) => items
            .iter()
            .find(|item| !schema.accepts(index, item))
            .cloned(),
        FieldValue::Terms(terms) => terms
            .iter()
            .find(|term| !schema.accepts(index, &term.id))
            .map(|term| term.id.clone()),
    }
}

impl Serialize for ProteinBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (spec, value) in self.iter() {
            map.serialize_entry(spec.name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProteinBox {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, FieldValue>::deserialize(deserializer)?;
        let mut pbox = ProteinBox::default();
        for (name, value) in raw {
            pbox.set_field(&name, value).map_err(D::Error::custom)?;
        }
        Ok(pbox)
    }
}

impl fmt::Display for ProteinBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::render::render(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_is_never_partial() {
        let pbox = default_field_map();
        for (spec, value) in pbox.iter() {
            assert!(value.is_empty(), "{} should start empty", spec.name);
        }
        assert_eq!(pbox.get("PDB").unwrap(), &FieldValue::List(Vec::new()));
        assert_eq!(pbox.get("Process").unwrap(), &FieldValue::Terms(Vec::new()));
        assert_eq!(pbox.text("Symbol").unwrap(), "");
    }

    #[test]
    fn unknown_field_is_an_error() {
        let mut pbox = ProteinBox::default();
        assert_eq!(
            pbox.set_field("Colour", "blue"),
            Err(FieldError::UnknownField("Colour".to_string()))
        );
        assert!(pbox.set_field_unchecked("Colour", "blue").is_err());
        assert!(pbox.get("Colour").is_err());
    }

    #[test]
    fn rejected_scalar_keeps_previous_value() {
        let mut pbox = ProteinBox::default();
        pbox.set_field("OMIM", "113705").unwrap();
        let err = pbox.set_field("OMIM", "not-a-number").unwrap_err();
        assert!(matches!(err, FieldError::ValidationRejected { ref field, .. } if field == "OMIM"));
        assert_eq!(pbox.text("OMIM").unwrap(), "113705");
    }

    #[test]
    fn bare_scalar_is_coerced_for_multivalue_fields() {
        let mut pbox = ProteinBox::default();
        pbox.set_field("PDB", "1JM7").unwrap();
        assert_eq!(pbox.get("PDB").unwrap().as_list(), Some(&["1JM7".to_string()][..]));

        pbox.set_field("ECnumber", "").unwrap();
        assert_eq!(pbox.get("ECnumber").unwrap(), &FieldValue::List(Vec::new()));
    }

    #[test]
    fn multivalue_entries_are_validated_individually() {
        let mut pbox = ProteinBox::default();
        pbox.set_field("PDB", vec!["1JM7", "1T15"]).unwrap();
        assert!(pbox.set_field("PDB", vec!["1JM7", "TOOLONG"]).is_err());
        assert_eq!(pbox.get("PDB").unwrap().as_list().map(<[String]>::len), Some(2));

        pbox.set_field("Function", vec![OntologyTerm::new("GO:0005515", "protein binding")])
            .unwrap();
        let bad = pbox.set_field("Function", vec![OntologyTerm::new("binding", "x")]);
        assert!(bad.is_err());
        assert_eq!(pbox.get("Function").unwrap().as_terms().map(<[OntologyTerm]>::len), Some(1));
    }

    #[test]
    fn unchecked_setter_bypasses_patterns_only() {
        let mut pbox = ProteinBox::default();
        pbox.set_field_unchecked("OMIM", "pending").unwrap();
        assert_eq!(pbox.text("OMIM").unwrap(), "pending");
        assert!(pbox.set_field_unchecked("Symbol", vec!["A", "B"]).is_err());
    }

    #[test]
    fn policy_decides_what_rejection_means() {
        let mut pbox = ProteinBox::default();
        assert!(pbox
            .set_with_policy("Hs_EntrezGene", "abc", RejectPolicy::Keep)
            .is_ok());
        assert_eq!(pbox.text("Hs_EntrezGene").unwrap(), "");
        assert!(pbox
            .set_with_policy("Hs_EntrezGene", "abc", RejectPolicy::Abort)
            .is_err());
        assert!(pbox
            .set_with_policy("Nope", "abc", RejectPolicy::Keep)
            .is_err());
    }

    #[test]
    fn path_is_derived_from_entrez_gene() {
        let mut pbox = ProteinBox::default();
        pbox.set_field("Hs_EntrezGene", "672").unwrap();
        pbox.derive_path(RejectPolicy::Abort).unwrap();
        assert_eq!(pbox.text("path").unwrap(), "PBB/672");

        let mut empty = ProteinBox::default();
        empty.derive_path(RejectPolicy::Keep).unwrap();
        assert_eq!(empty.text("path").unwrap(), "");
    }

    #[test]
    fn needs_image_requires_structure_and_symbol() {
        let mut pbox = ProteinBox::default();
        assert!(!pbox.needs_image());
        pbox.set_field("PDB", vec!["1JM7"]).unwrap();
        pbox.set_field("Symbol", "BRCA1").unwrap();
        assert!(pbox.needs_image());
        pbox.set_field("image", "PBB_Protein_BRCA1_image.jpg").unwrap();
        assert!(!pbox.needs_image());
    }

    #[test]
    fn json_round_trip_keeps_shapes() {
        let mut pbox = ProteinBox::default();
        pbox.set_field("Symbol", "BRCA1").unwrap();
        pbox.set_field("PDB", vec!["1JM7"]).unwrap();
        pbox.set_field("Process", vec![OntologyTerm::new("GO:0006281", "DNA repair")])
            .unwrap();

        let json = serde_json::to_string(&pbox).unwrap();
        assert!(json.starts_with("{\"Name\":\"\""));
        let back: ProteinBox = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pbox);

        let partial: ProteinBox = serde_json::from_str(r#"{"Function": []}"#).unwrap();
        assert_eq!(partial, ProteinBox::default());
        assert!(serde_json::from_str::<ProteinBox>(r#"{"Colour": "blue"}"#).is_err());
    }
}
