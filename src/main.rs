//! multipage - generate per-page HTML for a multi-page application

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use multipage::{
    AssetOutputs, BuildOptions, PageGenerator, PagesConfig, PagesConfigFile, RecordingHost,
};

#[derive(Parser)]
#[command(name = "multipage")]
#[command(version, about = "Generate per-page HTML for a multi-page application", long_about = None)]
#[command(after_help = "EXAMPLES:
    multipage src/pages dist                   Render every page into dist/
    multipage src/pages dist -c pages.json     Use template/entry settings from pages.json
    multipage -l src/pages                     List discovered pages")]
struct Cli {
    /// Directory whose subdirectories are pages
    #[arg(value_name = "ROOT")]
    root: PathBuf,

    /// Directory the generated HTML is written to
    #[arg(value_name = "OUTPUT", required_unless_present = "list")]
    output: Option<PathBuf>,

    /// JSON page configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit compact production HTML
    #[arg(short, long)]
    production: bool,

    /// Inject <link rel="stylesheet"> tags for required chunks
    #[arg(long)]
    extract_styles: bool,

    /// Base URL pages are served from (used by the page map)
    #[arg(long, value_name = "URL", default_value = "")]
    public_path: String,

    /// List discovered pages without rendering
    #[arg(short, long)]
    list: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = if cli.list {
        list_pages(&cli)
    } else {
        build(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={default_level}", env!("CARGO_PKG_NAME")))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> multipage::Result<PagesConfig> {
    match path {
        Some(path) => Ok(PagesConfigFile::load(path)?.into_config()),
        None => Ok(PagesConfig::default()),
    }
}

fn list_pages(cli: &Cli) -> multipage::Result<()> {
    let generator = PageGenerator::new(&cli.root, load_config(cli.config.as_deref())?)?;

    for page in generator.pages() {
        let template = page
            .template
            .as_ref()
            .map_or_else(|| "<default>".to_string(), |t| t.display().to_string());
        println!("{}\t{}\t{}\t{}", page.name, page.entry, page.output_file(), template);
    }
    if !cli.quiet {
        eprintln!("{} pages", generator.pages().len());
    }
    Ok(())
}

fn build(cli: &Cli) -> multipage::Result<()> {
    let Some(output) = cli.output.as_deref() else {
        return Err(multipage::Error::InvalidConfig(
            "an output directory is required".to_string(),
        ));
    };

    let options = BuildOptions {
        production: cli.production,
        styles_extracted: cli.extract_styles,
        public_path: cli.public_path.clone(),
    };

    let mut generator = PageGenerator::new(&cli.root, load_config(cli.config.as_deref())?)?;
    let mut host = RecordingHost::default();
    generator.register(&mut host)?;

    let mut assets = AssetOutputs::new();
    for request in &host.html {
        let html = generator.render_page(request, &request.chunks, &options)?;
        assets.insert(request.filename.clone(), html);
    }
    generator.finalize(&options, &mut assets)?;

    fs::create_dir_all(output)?;
    assets.write_to(output)?;

    info!(files = assets.len(), output = %output.display(), "build finished");
    if !cli.quiet {
        for (name, contents) in assets.iter() {
            println!("{:>8}  {}", contents.len(), output.join(name).display());
        }
    }
    Ok(())
}
