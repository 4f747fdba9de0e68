//! svgbook - SVG page folders to self-contained spreads

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use svgbook::io::{Entry, entry_for_path};
use svgbook::{Book, BookLayoutConfig, IngestConfig, Session, Slot, Transfer};

#[derive(Parser)]
#[command(name = "svgbook")]
#[command(version, about = "Ingest SVG pages into a book of two-page spreads", long_about = None)]
#[command(after_help = "EXAMPLES:
    svgbook chapters/                    List pages in natural order
    svgbook --cover --spacer --spread 1 chapters/
                                         Show what the second spread holds
    svgbook --out build/ chapters/       Write self-contained pages")]
struct Cli {
    /// Files or directories to ingest
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Show the first page alone as a cover
    #[arg(long)]
    cover: bool,

    /// Insert a blank slot to flip page parity
    #[arg(long)]
    spacer: bool,

    /// Print the contents of this spread
    #[arg(long, value_name = "N")]
    spread: Option<usize>,

    /// Print the page list as JSON
    #[arg(long)]
    json: bool,

    /// Write each transformed page into this directory
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log per-document detail
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct PageSummary<'a> {
    index: usize,
    name: &'a str,
    width: f64,
    height: f64,
    structured: bool,
    embedded: usize,
    missed: usize,
    redacted: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli);

    let config = IngestConfig::from_env().context("invalid SVGBOOK_* configuration")?;
    let transfer = build_transfer(&cli.inputs, config.listing_batch_size).await?;

    let mut session =
        Session::new(config).with_layout(BookLayoutConfig::new(cli.cover, cli.spacer));
    session.load(transfer).await.context("ingestion failed")?;
    let Some(book) = session.book() else {
        bail!("no book was published");
    };

    if let Some(dir) = &cli.out {
        write_pages(book, dir).await?;
    }

    if cli.json {
        let summaries = summarize(book);
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        print_pages(book);
    }

    if let Some(index) = cli.spread {
        let shown = session.go_to_spread(index);
        if shown != index {
            eprintln!("spread {index} is out of range; showing spread {shown}");
        }
        print_spread(&session);
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new(format!("{}=debug", env!("CARGO_PKG_NAME")))
    } else if cli.quiet {
        EnvFilter::new(format!("{}=warn", env!("CARGO_PKG_NAME")))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_PKG_NAME"))))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// A single directory acts like a drop, plain files like a selection.
async fn build_transfer(inputs: &[PathBuf], batch_size: usize) -> Result<Transfer> {
    let mut entries = Vec::with_capacity(inputs.len());
    for path in inputs {
        let entry = entry_for_path(path, batch_size)
            .await
            .with_context(|| format!("cannot open {}", path.display()))?;
        entries.push(entry);
    }

    if entries.iter().all(|e| matches!(e, Entry::File(_))) {
        let files = entries.into_iter().filter_map(|e| match e {
            Entry::File(file) => Some(file),
            Entry::Directory(_) => None,
        });
        Ok(Transfer::selected(files))
    } else {
        Ok(Transfer::dropped(entries))
    }
}

fn summarize(book: &Book) -> Vec<PageSummary<'_>> {
    book.pages
        .iter()
        .zip(&book.reports)
        .map(|(page, report)| PageSummary {
            index: page.index,
            name: &page.name,
            width: page.width,
            height: page.height,
            structured: report.structured,
            embedded: report.embedded,
            missed: report.missed,
            redacted: report.redacted,
        })
        .collect()
}

fn print_pages(book: &Book) {
    for summary in summarize(book) {
        let mut notes = Vec::new();
        if !summary.structured {
            notes.push("unparsed".to_string());
        }
        if summary.missed > 0 {
            notes.push(format!("{} missing", summary.missed));
        }
        if summary.redacted > 0 {
            notes.push(format!("{} redacted", summary.redacted));
        }

        let notes = if notes.is_empty() {
            String::new()
        } else {
            format!("  ({})", notes.join(", "))
        };
        println!(
            "{:>4}  {}  {}x{}  {} embedded{}",
            summary.index, summary.name, summary.width, summary.height, summary.embedded, notes
        );
    }
}

fn print_spread(session: &Session) {
    let spread = session.spread();
    let describe = |slot: Slot<'_>| match slot {
        Slot::Page(page) => format!("{} ({})", page.index, page.name),
        Slot::Spacer => "spacer".to_string(),
        Slot::Empty => "-".to_string(),
    };

    println!(
        "spread {}/{}{}",
        session.current_spread(),
        session.total_spreads(),
        if spread.is_cover_view { " (cover)" } else { "" }
    );
    println!("  left:  {}", describe(spread.left));
    println!("  right: {}", describe(spread.right));
}

async fn write_pages(book: &Book, dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("cannot create {}", dir.display()))?;

    for page in &book.pages {
        let path = dir.join(format!("{}-{}", page.index, page.name));
        tokio::fs::write(&path, page.content.as_bytes())
            .await
            .with_context(|| format!("cannot write {}", path.display()))?;
    }

    info!(pages = book.len(), dir = %dir.display(), "wrote pages");
    Ok(())
}
