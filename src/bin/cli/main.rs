mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pageport_lib::storage::EntityKind;

#[derive(Parser)]
#[command(name = "pageport-cli", about = "Move pages, blocks and media between sites", version)]
struct Cli {
    /// Data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL of this site, overrides settings.json
    #[arg(long, global = true)]
    site_url: Option<String>,

    /// Media fetch timeout in seconds, overrides settings.json
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum KindArg {
    Page,
    Block,
}

impl From<KindArg> for EntityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Page => EntityKind::Page,
            KindArg::Block => EntityKind::Block,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// List pages that can be exported
    List {
        /// Maximum number of pages (default: listLimit setting)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Create a page or block
    New {
        #[arg(long, value_enum, default_value = "page")]
        kind: KindArg,
        #[arg(long)]
        title: String,
        /// Slug (defaults to one derived from the title)
        #[arg(long)]
        slug: Option<String>,
        /// Markup content (use "-" to read from stdin)
        #[arg(long)]
        content: Option<String>,
        #[arg(long, default_value = "publish")]
        status: String,
    },

    /// Export pages with their blocks and media into a package
    Export {
        /// Page ids
        #[arg(required = true)]
        ids: Vec<u64>,
        /// Output path, "-" for stdout (default: export-<timestamp>.json)
        #[arg(long, short)]
        output: Option<String>,
    },

    /// Import a package into this site
    Import {
        /// Package file, "-" for stdin
        path: String,
    },

    /// Validate a package and summarize its contents
    Inspect {
        /// Package file, "-" for stdin
        path: String,
    },

    /// Show or change stored settings
    Config {
        /// Base URL of this site
        #[arg(long = "set-site-url")]
        site_url: Option<String>,
        /// Media fetch timeout in seconds
        #[arg(long = "set-timeout")]
        timeout: Option<u64>,
        /// Default number of pages listed
        #[arg(long = "set-list-limit")]
        list_limit: Option<usize>,
    },
}

/// Read content from stdin if piped, or resolve "-" as stdin
fn resolve_content(content: Option<String>) -> Option<String> {
    match content.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).ok();
            Some(buf)
        }
        Some(_) => content,
        None => {
            if !std::io::stdin().is_terminal() {
                let mut buf = String::new();
                std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).ok();
                if buf.is_empty() { None } else { Some(buf) }
            } else {
                None
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();

    let overrides = app::Overrides {
        data_dir: cli.data_dir,
        site_url: cli.site_url,
        timeout: cli.timeout,
    };
    let app = app::App::new(overrides)?;

    match cli.command {
        Command::List { limit } => {
            commands::list::run(&app, limit, &cli.format, use_color)?;
        }
        Command::New { kind, title, slug, content, status } => {
            let content = resolve_content(content);
            commands::new::run(
                &app,
                kind.into(),
                &title,
                slug.as_deref(),
                content,
                &status,
                &cli.format,
            )?;
        }
        Command::Export { ids, output } => {
            commands::export::run(&app, &ids, output.as_deref(), &cli.format)?;
        }
        Command::Import { path } => {
            commands::import::run(&app, &path, &cli.format, use_color)?;
        }
        Command::Inspect { path } => {
            commands::inspect::run(&path, &cli.format)?;
        }
        Command::Config { site_url, timeout, list_limit } => {
            commands::config::run(&app, site_url, timeout, list_limit, &cli.format)?;
        }
    }

    Ok(())
}
