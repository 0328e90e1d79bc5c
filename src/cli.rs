mod group;
mod labels;
mod measure;

use clap::{Parser, Subcommand};

use crate::cli::{group::GroupArgs, labels::LabelsArgs, measure::MeasureArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Select the cells and assemble them into resistance-balanced modules.
    #[clap(name = "group")]
    Group(Box<GroupArgs>),

    /// Characterize the scanned cells with a source meter.
    #[clap(name = "measure")]
    Measure(Box<MeasureArgs>),

    /// Generate serial number labels for the storage boxes.
    #[clap(name = "labels")]
    Labels(LabelsArgs),
}
