//! richdoc CLI - document layout and editing tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use richdoc::command::SearchState;
use richdoc::render::{self, JsonFormat, PageSelection, RenderOptions};
use richdoc::{
    build_catalog, layout_document, load_document, CatalogEntry, Command, CommandOutput, Document,
    EditorOptions, EditorSession, PaperDirection,
};

#[derive(Parser)]
#[command(name = "richdoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Lay out, inspect and edit richdoc JSON documents", long_about = None)]
struct Cli {
    /// Editor options file (JSON)
    #[arg(long, global = true, value_name = "FILE", env = "RICHDOC_OPTIONS")]
    options: Option<PathBuf>,

    /// Lay out as one continuous page
    #[arg(long, global = true)]
    continuity: bool,

    /// Use landscape paper
    #[arg(long, global = true)]
    landscape: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show document information
    Info {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the page layout as JSON
    Layout {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Render the laid-out pages as plain text
    Text {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Include header and footer rows
        #[arg(long)]
        header_footer: bool,
    },

    /// Search the document body
    Search {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Keyword (case-insensitive)
        #[arg(value_name = "KEYWORD")]
        keyword: String,
    },

    /// Print the heading catalog
    Catalog {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a command script against a document
    Apply {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Command script: a JSON array of commands
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Where to save the edited document (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Info { input } => cmd_info(&cli, input),
        Commands::Layout {
            input,
            output,
            compact,
        } => cmd_layout(&cli, input, output.as_deref(), *compact),
        Commands::Text {
            input,
            output,
            pages,
            header_footer,
        } => cmd_text(&cli, input, output.as_deref(), pages.as_deref(), *header_footer),
        Commands::Search { input, keyword } => cmd_search(&cli, input, keyword),
        Commands::Catalog { input, json } => cmd_catalog(&cli, input, *json),
        Commands::Apply {
            input,
            script,
            output,
        } => cmd_apply(&cli, input, script, output.as_deref()),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn editor_options(cli: &Cli) -> Result<EditorOptions, Box<dyn std::error::Error>> {
    let mut options = match &cli.options {
        Some(path) => EditorOptions::from_json(&fs::read_to_string(path)?)?,
        None => EditorOptions::default(),
    };
    if cli.continuity {
        options = options.continuity();
    }
    if cli.landscape {
        options = options.with_paper_direction(PaperDirection::Horizontal);
    }
    options.validate()?;
    Ok(options)
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_info(cli: &Cli, input: &Path) -> CliResult {
    let options = editor_options(cli)?;
    let session = EditorSession::new(load_document(input)?, options)?;
    let stats = session.stats()?;
    let doc = session.document()?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), stats.page_count);
    println!("{}: {:?}", "Page mode".bold(), session.options()?.page_mode);
    println!(
        "{}: {} / {} / {}",
        "Elements (header/body/footer)".bold(),
        doc.header.len(),
        doc.main.len(),
        doc.footer.len()
    );

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Hyperlinks".bold(), stats.hyperlink_count);
    println!("{}: {}", "Checkboxes".bold(), stats.checkbox_count);

    Ok(())
}

fn cmd_layout(cli: &Cli, input: &Path, output: Option<&Path>, compact: bool) -> CliResult {
    let options = editor_options(cli)?;
    let doc = load_document(input)?;
    let layout = layout_document(&doc, &options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    write_output(output, &render::to_json(&layout, format)?)
}

fn cmd_text(
    cli: &Cli,
    input: &Path,
    output: Option<&Path>,
    pages: Option<&str>,
    header_footer: bool,
) -> CliResult {
    let page_selection = if let Some(p) = pages {
        PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?
    } else {
        PageSelection::All
    };

    let options = editor_options(cli)?;
    let doc = load_document(input)?;
    let layout = layout_document(&doc, &options)?;

    let mut render_options = RenderOptions::new().with_pages(page_selection);
    if header_footer {
        render_options = render_options.with_header_footer();
    }
    write_output(output, &render::to_text(&doc, &layout, &render_options)?)
}

fn cmd_search(cli: &Cli, input: &Path, keyword: &str) -> CliResult {
    let options = editor_options(cli)?;
    let doc = load_document(input)?;
    let layout = layout_document(&doc, &options)?;

    let mut search = SearchState::new();
    let count = search.search(&doc, Some(keyword));
    if count == 0 {
        println!("{} '{}'", "No matches for".yellow(), keyword);
        return Ok(());
    }

    for (i, range) in search.matches().iter().enumerate() {
        let page = layout.page_of(range.start).unwrap_or(1);
        println!(
            "{} {} {}",
            format!("[{}/{}]", i + 1, count).cyan(),
            format!("page {}", page).dimmed(),
            context(&doc, range.start, range.end)
        );
    }
    Ok(())
}

/// Text around a match with the match highlighted.
fn context(doc: &Document, start: usize, end: usize) -> String {
    const RADIUS: usize = 20;
    let text_of = |from: usize, to: usize| -> String {
        doc.main
            .iter()
            .skip(from)
            .take(to - from)
            .map(|e| e.display_text().replace('\n', " "))
            .collect()
    };
    let before = text_of(start.saturating_sub(RADIUS), start);
    let after = text_of(end, (end + RADIUS).min(doc.main.len()));
    format!(
        "{}{}{}",
        before,
        text_of(start, end).yellow().bold(),
        after
    )
}

fn cmd_catalog(cli: &Cli, input: &Path, json: bool) -> CliResult {
    let options = editor_options(cli)?;
    let doc = load_document(input)?;
    let layout = layout_document(&doc, &options)?;
    let catalog = build_catalog(&doc, &layout);

    if json {
        println!("{}", render::to_json(&catalog, JsonFormat::Pretty)?);
    } else if catalog.is_empty() {
        println!("{}", "No headings".yellow());
    } else {
        print_catalog(&catalog, 0);
    }
    Ok(())
}

fn print_catalog(entries: &[CatalogEntry], depth: usize) {
    for entry in entries {
        println!(
            "{}{} {}",
            "  ".repeat(depth),
            entry.name.bold(),
            format!("(p. {})", entry.page_no).dimmed()
        );
        print_catalog(&entry.sub_catalog, depth + 1);
    }
}

fn cmd_apply(cli: &Cli, input: &Path, script: &Path, output: Option<&Path>) -> CliResult {
    let options = editor_options(cli)?;
    let commands: Vec<Command> = serde_json::from_str(&fs::read_to_string(script)?)
        .map_err(|e| format!("Invalid command script: {}", e))?;
    let mut session = EditorSession::new(load_document(input)?, options)?;

    for (i, command) in commands.into_iter().enumerate() {
        let name = command.name();
        let outcome = session
            .dispatch(command)
            .map_err(|e| format!("command {} ({}) failed: {}", i + 1, name, e))?;
        match outcome {
            CommandOutput::None => log::info!("{} ok", name),
            other => eprintln!("{} {}: {:?}", "→".dimmed(), name.bold(), other),
        }
    }

    let json = render::to_json(session.document()?, JsonFormat::Pretty)?;
    write_output(output, &json)
}

fn cmd_version() {
    println!("{} {}", "richdoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Rich-text document layout and editing tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/richdoc".dimmed());
    println!("License: MIT");
}
