//! Parse/render fidelity on real page layouts.

mod common;

use common::TestFixture;
use pbb_sync::{
    default_field_map, parse, reconcile, render, FieldValue, OntologyTerm, ParseError, ProteinBox,
};

fn brca1() -> TestFixture {
    TestFixture::load("brca1").expect("Failed to load brca1 fixture")
}

#[test]
fn canonical_page_renders_back_byte_for_byte() {
    let page = brca1().page();
    let pbox = parse(&page).unwrap();
    assert_eq!(render(&pbox), page);
}

#[test]
fn canonical_page_fields_are_typed() {
    let pbox = parse(&brca1().page()).unwrap();

    assert!(pbox
        .text("Name")
        .unwrap()
        .starts_with("Breast cancer 1, early onset<ref name=\"entrez\">{{cite web"));
    assert_eq!(pbox.get("PDB").unwrap(), &FieldValue::from(vec!["1JM7", "1JNX"]));
    assert_eq!(
        pbox.get("AltSymbols").unwrap(),
        &FieldValue::from(vec!["BRCC1", "RNF53"])
    );
    assert_eq!(
        pbox.get("Function").unwrap().as_terms().unwrap()[1],
        OntologyTerm::new("GO:0008270", "zinc ion binding")
    );
    assert_eq!(
        pbox.text("image_source").unwrap(),
        "[[Protein_Data_Bank|PDB]] rendering based on 1jm7."
    );
    assert!(pbox.text("before_text").unwrap().starts_with("{{PBB_Controls\n"));
    assert!(pbox.text("after_text").unwrap().starts_with("\n{{PBB_Summary\n"));
    assert_eq!(pbox.text("path").unwrap(), "PBB/672");
}

#[test]
fn parse_render_is_idempotent_for_loose_markup() {
    let loose = "{{GNF_Protein_box|Name=Tumor protein p53|Symbol=TP53|PDB={{PDB2|1TUP}}|Hs_EntrezGene=7157|Unknown=ignored}}";
    let first = parse(loose).unwrap();
    let rendered = render(&first);
    let second = parse(&rendered).unwrap();
    assert_eq!(first, second);
    assert_eq!(render(&second), rendered);
    assert_eq!(second.text("path").unwrap(), "PBB/7157");
}

#[test]
fn nested_wrappers_and_links_do_not_split_fields() {
    let page = "{{GNF_Protein_box\n | Name = {{nowrap|Tumor|protein=p53}} [[TP53|p53]]\n | Symbol = TP53\n}}";
    let pbox = parse(page).unwrap();
    assert_eq!(
        pbox.text("Name").unwrap(),
        "{{nowrap|Tumor|protein=p53}} [[TP53|p53]]"
    );
    assert_eq!(pbox.text("Symbol").unwrap(), "TP53");
}

#[test]
fn empty_skeleton_parses_to_default_map() {
    let skeleton = render(&ProteinBox::default());
    assert_eq!(parse(&skeleton).unwrap(), default_field_map());
}

#[test]
fn missing_template_is_reported() {
    let err = parse("{{Infobox gene | Symbol = TP53}}").unwrap_err();
    assert_eq!(err, ParseError::TemplateNotFound("GNF_Protein_box".to_string()));
}

#[test]
fn unbalanced_template_is_reported() {
    let err = parse("{{GNF_Protein_box\n | Name = {{PDB2|1ABC}\n").unwrap_err();
    assert!(matches!(err, ParseError::UnbalancedTemplate { start: 0, .. }));
}

#[test]
fn fresh_data_merges_into_the_fixture_page() {
    let fixture = brca1();
    let current = parse(&fixture.page()).unwrap();
    let incoming: ProteinBox = serde_json::from_str(&fixture.read("incoming.json")).unwrap();

    let result = reconcile(&current, &incoming);
    assert_eq!(result.changes.fields(), vec!["PDB", "Process"]);
    assert_eq!(result.summary, "Updated 2 fields: PDB, Process");
    assert_eq!(
        result.merged.text("image").unwrap(),
        "PBB_Protein_BRCA1_image.jpg"
    );

    let rendered = render(&result.merged);
    assert!(rendered.contains("\n | PDB = {{PDB2|1JM7}}, {{PDB2|1JNX}}, {{PDB2|1N5O}}\n"));
    assert!(rendered.contains("{{GNF_GO|id=GO:0006281 |text = DNA repair}}\n"));
    assert_eq!(parse(&rendered).unwrap(), result.merged);
    assert!(reconcile(&result.merged, &incoming).changes.is_empty());
}
