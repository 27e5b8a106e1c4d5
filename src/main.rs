//! CLI entry point for the unisys portal client.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use unisys_core::{StudentRecord, UnisysClient};

mod app_config;
mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let file_config = app_config::load_default_file_config()?;

    // Priority: RUST_LOG env var > -q/-v flags > config verbosity > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.log_level(&file_config)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, ?file_config, "CLI arguments parsed");

    let config = args.client_config(&file_config);
    let mut client = UnisysClient::with_config(config).context("Invalid portal base URL")?;

    client
        .authenticate(&args.user_id, &args.password)
        .await
        .with_context(|| format!("Login failed for user '{}'", args.user_id))?;
    info!(user_id = %args.user_id, "Logged in");

    let record = client
        .student_record()
        .await
        .context("Failed to read the academic status page")?;

    {
        let mut stdout = io::stdout().lock();
        if args.json {
            serde_json::to_writer_pretty(&mut stdout, &record)
                .context("Failed to serialize student record")?;
            writeln!(stdout)?;
        } else {
            write_record(&mut stdout, &record)?;
        }
        stdout.flush()?;
    }

    if let Some(photo) = &args.photo {
        client
            .fetch_photo(photo)
            .await
            .with_context(|| format!("Failed to save photo to '{}'", photo.display()))?;
        info!(path = %photo.display(), "Photo saved");
    }

    Ok(())
}

/// Writes the present record fields as aligned `key : value` lines.
fn write_record(out: &mut impl Write, record: &StudentRecord) -> io::Result<()> {
    let fields = record.fields();
    let width = fields.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in fields {
        writeln!(out, "{key:<width$} : {value}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_record_aligns_present_fields() {
        let record = StudentRecord {
            nim: Some("12523001".to_string()),
            name: Some("Ahmad".to_string()),
            sks_ipk: "144 / 3.50".to_string(),
            sks: "144".to_string(),
            ipk: "3.50".to_string(),
            ..StudentRecord::default()
        };
        let mut out = Vec::new();
        write_record(&mut out, &record).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "nim     : 12523001\nname    : Ahmad\nsks_ipk : 144 / 3.50\nsks     : 144\nipk     : 3.50\n"
        );
    }
}
