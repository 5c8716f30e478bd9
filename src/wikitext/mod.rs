//! Wikitext parsing for `GNF_Protein_box` pages.
//!
//! `parse` runs the whole pipeline: locate the template, quarantine `<ref>`
//! tags, scrub known corruptions, tokenize the body and postprocess the raw
//! parameters into a [`ProteinBox`].
mod locate;
mod page;
mod postprocess;
mod refs;
mod tokenize;

pub use locate::{find_template, TemplateSpan};
pub use page::{bots_allowed, entrez_from_title, PAGE_PREFIX};
pub use postprocess::postprocess;
pub use refs::{restore_references, strip_references, ReferenceTable};
pub use tokenize::{tokenize, RawFieldMap};

use crate::error::ParseError;
use crate::model::{ProteinBox, RejectPolicy};
use crate::schema::{AFTER_TEXT, BEFORE_TEXT};

pub const TEMPLATE_NAME: &str = "GNF_Protein_box";

/// Text written into live pages by an earlier bot run that failed its PDB query.
const KNOWN_CORRUPTIONS: &[&str] = &[
    "{{PDB2|Problem creating Query from XML: Problem with parms! }}, {{PDB2|<orgPdbQuery><queryType>org.pdb.query.simple.UpAccessionIdQuery</queryType><accessionIdList></accessionIdList></orgPdbQuery>}}",
];

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions<'a> {
    pub template_name: &'a str,
    pub policy: RejectPolicy,
}

impl Default for ParseOptions<'_> {
    fn default() -> Self {
        Self {
            template_name: TEMPLATE_NAME,
            policy: RejectPolicy::Keep,
        }
    }
}

pub fn parse(text: &str) -> Result<ProteinBox, ParseError> {
    parse_with(text, &ParseOptions::default())
}

pub fn parse_with(text: &str, options: &ParseOptions<'_>) -> Result<ProteinBox, ParseError> {
    let span = find_template(text, options.template_name)?;
    tracing::debug!(start = span.start, end = span.end, "located template");

    let (sanitized, references) = strip_references(span.body);
    let scrubbed = scrub_known_corruptions(sanitized);
    let mut raw = tokenize(scrubbed.trim_matches('\n'), &references)?;
    tracing::debug!(
        fields = raw.len(),
        references = references.len(),
        "tokenized template body"
    );

    raw.insert(BEFORE_TEXT.to_string(), text[..span.start].to_string());
    raw.insert(AFTER_TEXT.to_string(), text[span.end..].to_string());
    postprocess(&raw, options.policy)
}

fn scrub_known_corruptions(mut body: String) -> String {
    for corruption in KNOWN_CORRUPTIONS {
        if body.contains(corruption) {
            tracing::debug!("removing known corrupt PDB query text");
            body = body.replace(corruption, "");
        }
    }
    body
}
