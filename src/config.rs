//! Command-line configuration.
//!
//! `CliArgs` is what clap parses; `Config` is the validated form the rest
//! of the binary uses, with region and metric names already resolved.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    metric::MetricId,
    presenter::ViewSelection,
    region,
};

#[derive(Debug, Parser)]
#[command(name = "peer_lending_map", about = "Peer lending in the United States, by PUMA")]
pub struct CliArgs {
    /// GeoJSON FeatureCollection with one feature per PUMA.
    #[arg(long = "data", value_name = "PATH", default_value = "data.geojson")]
    pub data: PathBuf,
    /// Initial region, by display name.
    #[arg(long = "region", value_name = "NAME", default_value = "United States")]
    pub region: String,
    /// Initial metric: emergency-borrowing, excess-spending-borrowing,
    /// owed-by-others or amount-owed.
    #[arg(long = "metric", value_name = "METRIC", default_value = "emergency-borrowing")]
    pub metric: String,
    /// Log file; the terminal itself is taken by the map.
    #[arg(long = "log-file", value_name = "PATH", default_value = "peer_lending_map.log")]
    pub log_file: PathBuf,
    /// Write the styled overlay for the initial selection to PATH and exit.
    #[arg(long = "export", value_name = "PATH")]
    pub export: Option<PathBuf>,
    /// Debug-level logging.
    #[arg(long = "verbose", action = clap::ArgAction::SetTrue)]
    pub verbose: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub data_path: PathBuf,
    pub selection: ViewSelection,
    pub log_file: PathBuf,
    pub export: Option<PathBuf>,
    pub verbose: bool,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self> {
        let region = region::lookup(&args.region).context("invalid --region")?;
        let metric = args.metric.parse::<MetricId>().context("invalid --metric")?;

        Ok(Self {
            data_path: args.data,
            selection: ViewSelection { region: region.selector, metric },
            log_file: args.log_file,
            export: args.export,
            verbose: args.verbose,
        })
    }
}
