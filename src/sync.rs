//! End-to-end infobox update over external collaborators.
//!
//! Fetching pages, gene data and images happens behind the traits below; this
//! module only sequences the pure parse/reconcile/render steps around them.
use crate::config::SyncConfig;
use crate::model::ProteinBox;
use crate::reconcile::{reconcile, ChangeLog};
use crate::render::render_as;
use crate::schema::{IMAGE, IMAGE_SOURCE};
use crate::wikitext::{bots_allowed, entrez_from_title, parse_with};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;

/// Reads and writes wiki pages.
pub trait PageStore {
    fn fetch(&self, title: &str) -> Result<String>;
    fn write(&mut self, title: &str, text: &str, summary: &str) -> Result<()>;
}

/// Supplies freshly fetched gene data. `None` means no data for this gene.
pub trait GeneSource {
    fn fetch_box(&self, entrez: u64) -> Result<Option<ProteinBox>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedImage {
    pub image: String,
    pub caption: String,
}

/// Finds or renders an illustration for a box.
pub trait ImageSource {
    fn find_image(&self, pbox: &ProteinBox) -> Result<Option<LinkedImage>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Rendering reproduced the page exactly; nothing written.
    Unchanged,
    /// The page excludes this bot; nothing written.
    BotsDenied,
    Written,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    pub title: String,
    pub outcome: UpdateOutcome,
    pub summary: String,
    pub changes: ChangeLog,
}

/// Attach an image when the box has a structure and symbol but no image yet.
///
/// Returns whether the box changed.
pub fn link_image(
    pbox: &mut ProteinBox,
    images: &dyn ImageSource,
    changes: &mut ChangeLog,
) -> Result<bool> {
    if !pbox.needs_image() {
        return Ok(false);
    }
    let Some(linked) = images.find_image(pbox).context("find image")? else {
        return Ok(false);
    };
    for (field, value) in [(IMAGE, linked.image), (IMAGE_SOURCE, linked.caption)] {
        let old = pbox.get(field)?.clone();
        pbox.set_field(field, value)?;
        let new = pbox.get(field)?.clone();
        if old != new {
            changes.record(field, old, new);
        }
    }
    Ok(true)
}

pub struct Updater<'a> {
    config: &'a SyncConfig,
    pages: &'a mut dyn PageStore,
    genes: &'a dyn GeneSource,
    images: Option<&'a dyn ImageSource>,
}

impl<'a> Updater<'a> {
    pub fn new(
        config: &'a SyncConfig,
        pages: &'a mut dyn PageStore,
        genes: &'a dyn GeneSource,
    ) -> Self {
        Self {
            config,
            pages,
            genes,
            images: None,
        }
    }

    pub fn with_images(mut self, images: &'a dyn ImageSource) -> Self {
        self.images = Some(images);
        self
    }

    pub fn update(&mut self, title: &str) -> Result<UpdateReport> {
        let entrez = entrez_from_title(title, &self.config.page_prefix)
            .ok_or_else(|| anyhow!("no Entrez gene id in page title {title:?}"))?;

        let text = self
            .pages
            .fetch(title)
            .with_context(|| format!("fetch page {title}"))?;
        let current = parse_with(&text, &self.config.parse_options())
            .with_context(|| format!("parse page {title}"))?;
        let incoming = self
            .genes
            .fetch_box(entrez)
            .with_context(|| format!("fetch gene data for {entrez}"))?
            .unwrap_or_default();

        let mut result = reconcile(&current, &incoming);
        if let Some(images) = self.images {
            if link_image(&mut result.merged, images, &mut result.changes)? {
                result.summary = result.changes.summary();
            }
        }

        let rendered = render_as(&result.merged, &self.config.template_name);
        let outcome = if rendered == text {
            UpdateOutcome::Unchanged
        } else if !bots_allowed(&text, &self.config.bot_name) {
            UpdateOutcome::BotsDenied
        } else {
            self.pages
                .write(title, &rendered, &result.summary)
                .with_context(|| format!("write page {title}"))?;
            UpdateOutcome::Written
        };

        tracing::info!(
            title,
            outcome = ?outcome,
            changed = result.changes.len(),
            "infobox update finished"
        );
        Ok(UpdateReport {
            title: title.to_string(),
            outcome,
            summary: result.summary,
            changes: result.changes,
        })
    }
}
