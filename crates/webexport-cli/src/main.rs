//! Offline front end: the pure conversion layers over saved HTML files.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use scraper::{Html, Selector};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use webexport::print::populate_print_document;
use webexport::Strings;
use webexport_dom::{element_to_node, Node};
use webexport_markdown::MarkdownService;
use webexport_snapshot::{build_selection_snapshot, PrintPayload, SnapshotOptions, StaticRenderHost};

#[derive(Parser, Debug)]
#[command(name = "webexport")]
#[command(about = "Export parts of saved HTML pages as Markdown or print snapshots", long_about = None)]
struct Args {
    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert the selected elements to one Markdown document
    Markdown {
        #[command(flatten)]
        input: Input,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the presentation-frozen snapshot of the selected elements
    Snapshot {
        #[command(flatten)]
        input: Input,

        /// Keep class, id and style attributes
        #[arg(long)]
        keep_styles: bool,

        /// Emit the standalone print document instead of the bare snapshot
        #[arg(long)]
        document: bool,

        /// Base URL for relative links in the print document
        #[arg(long, default_value = "")]
        base_url: String,
    },
}

#[derive(clap::Args, Debug)]
struct Input {
    /// HTML file, or "-" for stdin
    file: String,

    /// CSS selector of the elements to export; every match is a target, in document order
    #[arg(short, long, default_value = "body")]
    selector: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Markdown { input, output } => {
            let targets = load_targets(&input)?;
            let markdown = MarkdownService::new().convert_all(&targets);
            match output {
                Some(path) => {
                    fs::write(&path, markdown)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), "markdown written");
                }
                None => writeln!(io::stdout(), "{}", markdown)?,
            }
        }
        Command::Snapshot {
            input,
            keep_styles,
            document,
            base_url,
        } => {
            let targets = load_targets(&input)?;
            let options = SnapshotOptions::for_print(keep_styles, false);
            let snapshot = build_selection_snapshot(&targets, &StaticRenderHost, &options)?;
            let html = if document {
                let payload = PrintPayload::new(snapshot, &base_url, keep_styles);
                populate_print_document(&payload, &Strings::default().print_window_title).to_html()
            } else {
                snapshot.outer_html()
            };
            writeln!(io::stdout(), "{}", html)?;
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_targets(input: &Input) -> Result<Vec<Node>> {
    let html = read_input(&input.file)?;
    let selector = Selector::parse(&input.selector)
        .map_err(|err| anyhow!("invalid selector {:?}: {}", input.selector, err))?;

    let document = Html::parse_document(&html);
    let targets: Vec<Node> = document.select(&selector).map(element_to_node).collect();
    if targets.is_empty() {
        bail!("no element matches {:?}", input.selector);
    }
    debug!(count = targets.len(), selector = %input.selector, "targets selected");
    Ok(targets)
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(file).with_context(|| format!("reading {}", file))
}
