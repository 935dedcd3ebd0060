//! `webclone` - cluster a directory of HTML pages into clone groups.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use webclone::{
    WebcloneConfig, attach_visual_features, cluster_documents, load_documents_json, load_html_dir,
    write_report, write_summary_json,
};

#[derive(Debug, Parser)]
#[command(name = "webclone", version, about = "Detect cloned websites and group them into clusters")]
struct Cli {
    /// Directory of HTML pages, or a JSON document file with `--documents`.
    input: PathBuf,

    /// Directory receiving one `cluster_NNN.txt` file per cluster.
    output: PathBuf,

    /// YAML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Treat INPUT as precomputed documents (JSON array or JSON lines).
    #[arg(long)]
    documents: bool,

    /// JSON map of document id to visual feature vector.
    #[arg(long, value_name = "FILE")]
    visual: Option<PathBuf>,

    /// Also write the clusters as JSON to this file.
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => WebcloneConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => WebcloneConfig::default(),
    };
    match cli.verbose {
        0 => {}
        1 => config.log_level = "debug".to_string(),
        _ => config.log_level = "trace".to_string(),
    }
    init_logging(&config.log_filter(), cli.json_logs)?;

    let (mut docs, relative_to) = if cli.documents {
        let docs = load_documents_json(&cli.input)?;
        (docs, None)
    } else {
        let corpus = load_html_dir(&cli.input, &config.extract)?;
        if !corpus.failures.is_empty() {
            tracing::warn!(failures = corpus.failures.len(), "some pages could not be loaded");
        }
        (corpus.documents, Some(cli.input.as_path()))
    };

    if let Some(visual) = &cli.visual {
        attach_visual_features(&mut docs, visual)?;
    }

    let run = cluster_documents(docs, &config)?;
    write_report(&run.clusters, &cli.output, relative_to)?;
    if let Some(summary) = &cli.summary {
        write_summary_json(&run.clusters, summary)?;
    }

    tracing::info!(
        clusters = run.stats.clusters,
        singletons = run.stats.singletons,
        output = %cli.output.display(),
        "done"
    );
    Ok(())
}

fn init_logging(filter: &str, json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter).with_context(|| format!("invalid log filter `{filter}`"))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
