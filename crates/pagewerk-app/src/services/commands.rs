// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `restore` and `inspect` command handlers.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use pagewerk_bridge::{DirectorySink, MirrorSource, PageSource, TracingObserver};
use pagewerk_core::SessionConfig;
use pagewerk_core::error::Result;
use pagewerk_core::types::{FailureKind, export_file_name};
use pagewerk_image::{ImageProcessor, TileDescrambler};
use pagewerk_session::{PageExtractor, PageSnapshot, Session};

use super::data_dir;
use super::settings;
use crate::cli::{InspectArgs, RestoreArgs};

/// Restore an episode from a local mirror and export it.
pub async fn restore(args: RestoreArgs, config_path: &Path) -> Result<()> {
    let mut config = settings::load_config(config_path);
    args.overrides.apply(&mut config);
    if let Some(output) = &args.output {
        config.output_dir = Some(output.clone());
    }
    if args.save_config {
        settings::persist_config(config_path, &config)?;
        info!(path = %config_path.display(), "settings saved");
    }

    let output_dir = resolve_output_dir(&config);
    let input = tokio::fs::read_to_string(&args.episode).await?;

    let mut session = Session::from_episode(
        &input,
        MirrorSource::new(&args.mirror),
        DirectorySink::new(&output_dir),
        TracingObserver,
        config,
    )?;
    info!(
        session = %session.id(),
        started = %session.started_at(),
        pages = session.registry().len(),
        "episode loaded"
    );

    let token = session.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping after the current page");
            token.cancel();
        }
    });

    let batch = session.restore_all().await?;
    println!(
        "restored {}/{} pages ({} failed, {} already restored)",
        batch.succeeded,
        session.registry().len(),
        batch.failed,
        batch.skipped
    );
    for line in failure_lines(&session.snapshot()) {
        println!("  {line}");
    }

    if batch.cancelled {
        println!("interrupted; nothing exported");
        session.teardown();
        return Ok(());
    }

    if !args.no_export {
        let report = session.export_all().await?;
        println!(
            "exported {} pages to {} ({} failed)",
            report.delivered(),
            output_dir.display(),
            report.failed()
        );
    }

    session.teardown();
    Ok(())
}

/// Print the extracted page list, optionally checking each mirrored file.
pub async fn inspect(args: InspectArgs, config_path: &Path) -> Result<()> {
    let config = settings::load_config(config_path);
    let pattern = args.pattern.as_deref().unwrap_or(&config.page_url_pattern);
    let input = tokio::fs::read_to_string(&args.episode).await?;
    let records = PageExtractor::new(pattern)?.extract_any(&input)?;

    let descrambler = TileDescrambler::standard()?;
    let source = args.mirror.as_ref().map(MirrorSource::new);

    println!("{} pages", records.len());
    for record in &records {
        let filename = export_file_name(record.index, records.len());
        let Some(source) = &source else {
            println!("{:>4}  {filename:<8} {}", record.index, record.source_url);
            continue;
        };

        let geometry = match source.fetch(&record.source_url).await {
            Ok(bytes) => describe_geometry(&descrambler, &bytes),
            Err(e) => format!("unavailable: {e}"),
        };
        println!(
            "{:>4}  {filename:<8} {}  {geometry}",
            record.index, record.source_url
        );
    }
    Ok(())
}

/// One-line summary of how a page would be descrambled.
fn describe_geometry(descrambler: &TileDescrambler, bytes: &[u8]) -> String {
    let image = match ImageProcessor::from_bytes(bytes) {
        Ok(image) => image,
        Err(e) => return format!("undecodable: {e}"),
    };
    let (width, height) = (image.width(), image.height());
    let profile = descrambler.profile_for(width, height);
    match descrambler.chunk_size(width, height, &profile) {
        Ok(chunk) => format!(
            "{width}x{height} -> rect {}x{} chunk {}x{}",
            profile.tile_rect_width, profile.tile_rect_height, chunk.width, chunk.height
        ),
        Err(e) => format!("{width}x{height} -> {e}"),
    }
}

/// One line per failed page. Pages interrupted by teardown are not failures
/// and are left out.
fn failure_lines(pages: &[PageSnapshot]) -> Vec<String> {
    pages
        .iter()
        .filter_map(|page| {
            let failure = page.last_error.as_ref()?;
            (failure.kind != FailureKind::Cancelled)
                .then(|| format!("page {}: {}", page.index, failure.message))
        })
        .collect()
}

fn resolve_output_dir(config: &SessionConfig) -> PathBuf {
    config
        .output_dir
        .clone()
        .unwrap_or_else(|| data_dir::data_subdir("export"))
}
