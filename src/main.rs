use anyhow::{Context, Result};
use clap::Parser;
use pbb_sync::config::{config_stub, resolve_config, SyncConfig};
use pbb_sync::wikitext::bots_allowed;
use pbb_sync::{parse_with, reconcile, render_as, ProteinBox};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{BotsArgs, Command, ParseArgs, ReconcileArgs, RenderArgs, RootArgs};

fn main() -> Result<ExitCode> {
    let args = RootArgs::parse();
    init_logging(args.verbose);

    let config = resolve_config(args.config.as_deref())?;
    match args.command {
        Command::Parse(parse_args) => cmd_parse(&config, parse_args),
        Command::Render(render_args) => cmd_render(&config, render_args),
        Command::Reconcile(reconcile_args) => cmd_reconcile(&config, reconcile_args),
        Command::Bots(bots_args) => cmd_bots(&config, bots_args),
        Command::Config => {
            println!("{}", config_stub());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn cmd_parse(config: &SyncConfig, args: ParseArgs) -> Result<ExitCode> {
    let pbox = load_page(config, &args.page)?;
    print_json(&pbox)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_render(config: &SyncConfig, args: RenderArgs) -> Result<ExitCode> {
    let pbox: ProteinBox = read_json(&args.box_path)?;
    println!("{}", render_as(&pbox, &config.template_name));
    Ok(ExitCode::SUCCESS)
}

fn cmd_reconcile(config: &SyncConfig, args: ReconcileArgs) -> Result<ExitCode> {
    let current = load_page(config, &args.page)?;
    let incoming: ProteinBox = read_json(&args.incoming)?;
    let result = reconcile(&current, &incoming);
    eprintln!("{}", result.summary);

    if args.json {
        print_json(&result)?;
        return Ok(ExitCode::SUCCESS);
    }
    let rendered = render_as(&result.merged, &config.template_name);
    match args.out {
        Some(out) => std::fs::write(&out, &rendered)
            .with_context(|| format!("write page {}", out.display()))?,
        None => println!("{rendered}"),
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_bots(config: &SyncConfig, args: BotsArgs) -> Result<ExitCode> {
    let text = read_page(&args.page)?;
    let bot = args.bot.as_deref().unwrap_or(&config.bot_name);
    if bots_allowed(&text, bot) {
        println!("allowed");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("denied");
        Ok(ExitCode::from(1))
    }
}

fn load_page(config: &SyncConfig, path: &Path) -> Result<ProteinBox> {
    let text = read_page(path)?;
    parse_with(&text, &config.parse_options())
        .with_context(|| format!("parse protein box in {}", path.display()))
}

fn read_page(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read page {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("parse JSON {}", path.display()))?;
    Ok(value)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
