//! Command implementations for the readmark CLI.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use log::info;
use tokio::runtime::Runtime;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::AnnotatorConfig;
use crate::engine::Annotator;
use crate::error::Result;
use crate::store::MemoryStore;

/// Execute a CLI command.
pub fn execute_command(args: ReadmarkArgs) -> Result<()> {
    let runtime = Runtime::new().context("failed to start the async runtime")?;
    runtime.block_on(async {
        match &args.command {
            Command::Annotate(annotate_args) => annotate(annotate_args, &args).await,
            Command::Count(count_args) => count(count_args, &args).await,
            Command::Known(known_args) => known(known_args, &args).await,
        }
    })
}

/// Annotate a text file.
async fn annotate(args: &AnnotateArgs, cli_args: &ReadmarkArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            AnnotatorConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => AnnotatorConfig::default(),
    };
    let text = read_input(&args.input)?;
    let annotator = Annotator::with_config(load_store(&args.store)?, config);

    let start_time = Instant::now();
    let annotation = annotator.annotate(annotator.prepare_input(&text)).await?;
    let mut html = annotator.render(&annotation)?;
    if !args.raw {
        html = annotator.post_process(&html);
    }
    let duration = start_time.elapsed();

    output_annotation(
        &AnnotationResult {
            html,
            phrases_merged: annotation.stats.merged,
            phrases_dropped: annotation.stats.dropped,
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

/// Count the words of a text file by status.
async fn count(args: &CountArgs, cli_args: &ReadmarkArgs) -> Result<()> {
    let text = read_input(&args.input)?;
    let annotator = Annotator::new(load_store(&args.store)?);

    let counts = annotator.count_words(&text).await?;

    output_result(
        "Word counts",
        &CountResult {
            counts,
            total: counts.total(),
        },
        cli_args,
    )
}

/// List the known expressions of a text file.
async fn known(args: &KnownArgs, cli_args: &ReadmarkArgs) -> Result<()> {
    let text = read_input(&args.input)?;
    let annotator = Annotator::new(load_store(&args.store)?);

    let expressions = annotator.known_expressions(&text).await?;

    output_result("Known expressions", &KnownResult { expressions }, cli_args)
}

fn load_store(path: &Path) -> Result<Arc<MemoryStore>> {
    info!("Loading vocabulary store from: {}", path.display());
    let store = MemoryStore::load_from_file(path)
        .with_context(|| format!("failed to load store {}", path.display()))?;
    Ok(Arc::new(store))
}

/// Read the input text from a file, or from stdin when the path is `-`.
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read input {}", path.display()))?;
    Ok(text)
}
