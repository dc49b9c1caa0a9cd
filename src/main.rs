//! popthings - Main Entry Point
//!
//! Reads a TaskPaper template, asks for its placeholder values and imports
//! the result into Things. The actual implementation is in the `popthings`
//! library.

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser};
use popthings::outline::ChecklistNesting;
use popthings::{Config, StdinPrompt, ValueSource, parse_template, things};
use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Import a TaskPaper template with placeholders into Things
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TaskPaper template, or '-' to read stdin
    file: String,

    /// Path to a TOML config file (defaults to $POPTHINGS_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Open the import URL in Things instead of printing it
    #[arg(long)]
    open: bool,

    /// Print the Things JSON instead of the URL
    #[arg(long, conflicts_with = "dry_run")]
    json: bool,

    /// Print the parsed outline and stop
    #[arg(long)]
    dry_run: bool,

    /// Fail on checklist items nested under checklist items
    #[arg(long)]
    strict_checklists: bool,

    /// Placeholder value, skipping the prompt (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    values: Vec<(String, String)>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    let name = name.trim().trim_start_matches('$');
    if name.is_empty() {
        return Err(format!("missing placeholder name in '{}'", raw));
    }
    Ok((name.to_string(), value.to_string()))
}

fn init_tracing(config: &Config, verbose: u8) {
    let default_level = match verbose {
        0 => config.log_level.as_str(),
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_template(file: &str) -> Result<String> {
    if file == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read template from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Failed to read template {}", file))
    }
}

/// Values from `--set` first, then the interactive prompt
struct PresetThenPrompt<P> {
    preset: HashMap<String, String>,
    prompt: Option<P>,
}

impl<P: ValueSource> ValueSource for PresetThenPrompt<P> {
    fn get_value(&mut self, name: &str) -> popthings::Result<String> {
        if let Some(value) = self.preset.get(name) {
            return Ok(value.clone());
        }
        match self.prompt.as_mut() {
            Some(prompt) => prompt.get_value(name),
            None => Err(popthings::Error::Prompt(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!(
                    "no value for placeholder '{}': stdin holds the template, use --set {}=VALUE",
                    name, name
                ),
            ))),
        }
    }
}

fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();
    let config = Config::resolve(args.config.as_deref())?;
    init_tracing(&config, args.verbose);

    let template = read_template(&args.file)?;

    let mut options = config.parse_options();
    if args.strict_checklists {
        options.checklist_nesting = ChecklistNesting::Reject;
    }

    let mut source = PresetThenPrompt {
        preset: args.values.into_iter().collect(),
        // stdin is taken by the template itself
        prompt: (args.file != "-").then(StdinPrompt::stdio),
    };
    let outline = parse_template(&template, &mut source, config.placeholder_symbol, &options)
        .with_context(|| format!("Failed to parse {}", args.file))?;

    if args.dry_run {
        print!("{}", outline);
        return Ok(());
    }

    let items = things::to_json(&outline);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let url = things::build_url(&items)?;
    if args.open || config.open_url {
        things::open_url(&url).map_err(|e| anyhow!("Failed to open Things: {}", e))?;
    } else {
        println!("{}", url);
    }
    Ok(())
}
