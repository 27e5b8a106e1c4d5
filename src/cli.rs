//! CLI argument definitions using clap derive macros.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use unisys_core::ClientConfig;

use crate::app_config::{CaBundleSetting, FileConfig};

/// Log in to the UII academic portal and print the student record.
///
/// Prints the cumulative credits (SKS) and GPA (IPK) along with the other
/// fields of the academic status page, and optionally saves the student photo.
#[derive(Parser)]
#[command(name = "unisys")]
#[command(author, version, about)]
pub struct Args {
    /// Student number (NIM) to log in with
    #[arg(short = 'u', long, env = "UNISYS_USER_ID")]
    pub user_id: String,

    /// Portal password
    #[arg(short = 'p', long, env = "UNISYS_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Save the student photo to this path (never overwrites)
    #[arg(long, value_name = "PATH")]
    pub photo: Option<PathBuf>,

    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,

    /// Portal base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// PEM bundle of trusted CA certificates for https
    #[arg(long, value_name = "PATH", conflicts_with = "no_ca_bundle")]
    pub ca_bundle: Option<PathBuf>,

    /// Use the built-in root store only
    #[arg(long)]
    pub no_ca_bundle: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("user_id", &self.user_id)
            .field("password", &"[REDACTED]")
            .field("photo", &self.photo)
            .field("json", &self.json)
            .field("base_url", &self.base_url)
            .field("ca_bundle", &self.ca_bundle)
            .field("no_ca_bundle", &self.no_ca_bundle)
            .field("verbose", &self.verbose)
            .field("quiet", &self.quiet)
            .finish()
    }
}

impl Args {
    /// Default log filter. Flags win over the config file's `verbosity`.
    #[must_use]
    pub fn log_level(&self, file: &FileConfig) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => file.verbosity.map_or("info", |v| v.log_level()),
            1 => "debug",
            _ => "trace",
        }
    }

    /// Client configuration: CLI flag > config file > built-in default.
    #[must_use]
    pub fn client_config(&self, file: &FileConfig) -> ClientConfig {
        let mut config = ClientConfig::default();

        if let Some(base_url) = self.base_url.as_ref().or(file.base_url.as_ref()) {
            config = config.with_base_url(base_url.clone());
        }

        if self.no_ca_bundle {
            config = config.with_ca_bundle(None);
        } else if let Some(path) = &self.ca_bundle {
            config = config.with_ca_bundle(Some(path.clone()));
        } else if let Some(setting) = &file.ca_bundle {
            config = config.with_ca_bundle(match setting {
                CaBundleSetting::Path(path) => Some(path.clone()),
                CaBundleSetting::Disabled => None,
            });
        }

        if let Some(user_agent) = &file.user_agent {
            config = config.with_user_agent(user_agent.clone());
        }

        let connect_timeout = file
            .connect_timeout_secs
            .map_or(config.connect_timeout, Duration::from_secs);
        let timeout = file
            .read_timeout_secs
            .map_or(config.timeout, Duration::from_secs);
        config.with_timeouts(connect_timeout, timeout)
    }
}
