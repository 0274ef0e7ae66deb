// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use pagewerk_core::SessionConfig;

#[derive(Parser, Debug)]
#[command(name = "pagewerk", author, version)]
#[command(about = "Restore tile-scrambled comic pages and export them as JPEG", long_about = None)]
pub struct Cli {
    /// Read settings from this file instead of the data directory
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Restore every page of an episode and export the result
    Restore(RestoreArgs),
    /// List the pages of an episode and the geometry each would use
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Viewer HTML page or bare episode JSON
    #[arg(value_name = "EPISODE")]
    pub episode: PathBuf,

    /// Directory holding the downloaded (scrambled) page files
    #[arg(short, long, value_name = "DIR")]
    pub mirror: PathBuf,

    /// Where restored pages are written
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Restore only, do not export
    #[arg(long)]
    pub no_export: bool,

    /// Write the effective settings back to the config file
    #[arg(long)]
    pub save_config: bool,

    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Viewer HTML page or bare episode JSON
    #[arg(value_name = "EPISODE")]
    pub episode: PathBuf,

    /// Also read each page from this directory and check its geometry
    #[arg(short, long, value_name = "DIR")]
    pub mirror: Option<PathBuf>,

    /// Regex a page URL must match
    #[arg(long)]
    pub pattern: Option<String>,
}

/// Flags that take precedence over the config file.
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    /// Delay between restored pages (ms)
    #[arg(long, value_name = "MS")]
    pub restore_pacing_ms: Option<u64>,

    /// Delay between exported pages (ms)
    #[arg(long, value_name = "MS")]
    pub export_pacing_ms: Option<u64>,

    /// Give up on a single export after this long (ms)
    #[arg(long, value_name = "MS")]
    pub export_timeout_ms: Option<u64>,

    /// JPEG quality of restored pages
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Regex a page URL must match
    #[arg(long)]
    pub pattern: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut SessionConfig) {
        if let Some(ms) = self.restore_pacing_ms {
            config.restore_pacing_ms = ms;
        }
        if let Some(ms) = self.export_pacing_ms {
            config.export_pacing_ms = ms;
        }
        if let Some(ms) = self.export_timeout_ms {
            config.export_timeout_ms = ms;
        }
        if let Some(quality) = self.quality {
            config.jpeg_quality = quality;
        }
        if let Some(pattern) = &self.pattern {
            config.page_url_pattern = pattern.clone();
        }
    }
}
