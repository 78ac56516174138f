//! Command-line arguments.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use shelfmove_batch_transfer::{ItemKind, RawEntry, TransferBatch, TransferItem};

use crate::config::Config;

/// Move comics and folders into the library through a shelfmove Move Service.
#[derive(Debug, Parser)]
#[command(name = "shelfmove", version, about)]
pub struct Cli {
    /// Destination folder on the library side.
    #[arg(long = "to", value_name = "DEST")]
    pub destination: String,

    /// File to move. May be repeated.
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<String>,

    /// Directory to move. May be repeated.
    #[arg(long = "dir", value_name = "PATH")]
    pub dirs: Vec<String>,

    /// JSON array of entries: paths or `{"path", "type"}` objects.
    #[arg(long, value_name = "FILE")]
    pub items_json: Option<PathBuf>,

    /// Configuration file to use instead of the default location.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Move Service base URL.
    #[arg(long, value_name = "URL")]
    pub service_url: Option<String>,

    /// Whole-batch timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub batch_timeout: Option<u64>,

    /// Move files through the streamed endpoint too.
    #[arg(long)]
    pub stream_files: bool,

    /// Command-line position of each `--file` and `--dir` value.
    #[arg(skip)]
    positions: Vec<(usize, TransferItem)>,
}

impl Cli {
    /// Parses the process arguments.
    pub fn parse_args() -> Self {
        let matches = Self::command().get_matches();
        match Self::from_matches(&matches) {
            Ok(cli) => cli,
            Err(e) => e.exit(),
        }
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let mut cli = Self::from_arg_matches(matches)?;
        cli.positions = ordered_items(matches);
        Ok(cli)
    }

    /// Applies command-line overrides on top of the file configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.service_url {
            config.service_url = url.clone();
        }
        if let Some(secs) = self.batch_timeout {
            config.batch_timeout_secs = secs;
        }
        if self.stream_files {
            config.stream_files = true;
        }
    }

    /// Builds the batch: `--items-json` entries first, then `--file` and
    /// `--dir` values in the order they were given.
    pub fn batch(&self) -> anyhow::Result<TransferBatch> {
        let mut entries = match &self.items_json {
            Some(path) => read_entries(path)?,
            None => Vec::new(),
        };
        entries.extend(self.positions.iter().map(|(_, item)| RawEntry::Typed {
            path: item.source_path.clone(),
            kind: item.kind.to_string(),
        }));

        anyhow::ensure!(!entries.is_empty(), "nothing to move: pass --file, --dir or --items-json");
        Ok(TransferBatch::from_entries(entries, self.destination.clone())?)
    }
}

fn ordered_items(matches: &ArgMatches) -> Vec<(usize, TransferItem)> {
    let mut items = Vec::new();
    for (id, kind) in [("files", ItemKind::File), ("dirs", ItemKind::Directory)] {
        let (Some(values), Some(indices)) = (matches.get_many::<String>(id), matches.indices_of(id)) else {
            continue;
        };
        items.extend(indices.zip(values).map(|(i, path)| {
            (
                i,
                TransferItem {
                    source_path: path.clone(),
                    kind,
                },
            )
        }));
    }
    items.sort_by_key(|(i, _)| *i);
    items
}

fn read_entries(path: &Path) -> anyhow::Result<Vec<RawEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
