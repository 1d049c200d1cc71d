//! CLI for gdl.

mod fetch;

use anyhow::Result;
use clap::Parser;
use gdl_core::config;
use gdl_core::fetch::FetchRequest;
use std::path::PathBuf;

use fetch::run_fetch;

/// Download one or all files of a Google Drive folder with a service account.
#[derive(Debug, Parser)]
#[command(name = "gdl", version)]
#[command(about = "Download files from a Google Drive folder using a service account", long_about = None)]
pub struct Cli {
    /// Service account JSON key file.
    #[arg(short = 's', long, value_name = "KEY_FILE")]
    pub service_account_key: PathBuf,

    /// Drive folder id (the last segment of the folder URL).
    #[arg(short = 'd', long, value_name = "FOLDER_ID")]
    pub directory_id: String,

    /// Exact name of the file to download. Without it the whole folder is downloaded.
    #[arg(short = 'f', long, value_name = "NAME")]
    pub file: Option<String>,

    /// Directory to download into; created if absent. Defaults to the current directory.
    #[arg(long, visible_alias = "dest", value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Exit with an error when no file was downloaded.
    #[arg(long)]
    pub fail_if_nothing_was_downloaded: bool,

    /// Read settings from this file instead of ~/.config/gdl/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        Cli::parse().run()
    }

    fn run(self) -> Result<()> {
        let cfg = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        run_fetch(&self.into_request(), &cfg)
    }

    pub fn into_request(self) -> FetchRequest {
        FetchRequest {
            service_account_key: self.service_account_key,
            directory_id: self.directory_id,
            file_name: self.file,
            destination: self.destination,
            fail_if_nothing_was_downloaded: self.fail_if_nothing_was_downloaded,
        }
    }
}
