//! CLI argument parsing for the protein box tools.
//!
//! Every command works on local files so page text can be inspected and
//! reconciled offline.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "pbb",
    version,
    about = "Parse, reconcile and render GNF_Protein_box infoboxes",
    after_help = "Examples:\n  pbb parse --page BRCA1.wiki\n  pbb render --box BRCA1.json\n  pbb reconcile --page BRCA1.wiki --incoming fresh.json --out BRCA1.new.wiki\n  pbb bots --page BRCA1.wiki --bot ProteinBoxBot",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Optional sync config JSON (defaults to the per-user config)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log debug detail to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Parse(ParseArgs),
    Render(RenderArgs),
    Reconcile(ReconcileArgs),
    Bots(BotsArgs),
    /// Print a default config stub
    Config,
}

#[derive(Parser, Debug)]
#[command(about = "Parse a page's protein box into JSON")]
pub struct ParseArgs {
    /// Wikitext page containing the template
    #[arg(long, value_name = "FILE")]
    pub page: PathBuf,
}

#[derive(Parser, Debug)]
#[command(about = "Render a protein box JSON file as wikitext")]
pub struct RenderArgs {
    /// Protein box JSON (missing fields default to empty)
    #[arg(long = "box", value_name = "FILE")]
    pub box_path: PathBuf,
}

#[derive(Parser, Debug)]
#[command(about = "Merge fresh data into a page's protein box")]
pub struct ReconcileArgs {
    /// Wikitext page containing the current template
    #[arg(long, value_name = "FILE")]
    pub page: PathBuf,

    /// Protein box JSON with freshly fetched values
    #[arg(long, value_name = "FILE")]
    pub incoming: PathBuf,

    /// Write the rendered page here instead of stdout
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Emit the merge result as JSON instead of wikitext
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Exit non-zero when a page excludes the bot")]
pub struct BotsArgs {
    /// Wikitext page to check
    #[arg(long, value_name = "FILE")]
    pub page: PathBuf,

    /// Bot account name (defaults to the configured bot)
    #[arg(long, value_name = "NAME")]
    pub bot: Option<String>,
}
