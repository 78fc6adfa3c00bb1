//! Dataroom CLI: upload files through the endpoint fallback chain.
//!
//! Reads DATAROOM_SITE_URL, SUPABASE_URL, SUPABASE_ANON_KEY and
//! DATAROOM_PUBLIC_BASE_URL (see `ClientConfig::from_env`).

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dataroom_cli::{endpoint_candidates, first_mismatch, init_tracing, truncate_string};
use dataroom_client::{
    render_probes, ClientConfig, DiagnosticsReporter, FallbackSequencer, SessionObjects,
    TimeoutPolicy, UploadFile, UploadProfile, UploadResult,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "dataroom", about = "Dataroom upload client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file, falling back across endpoints
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        #[command(flatten)]
        options: UploadOptions,
        /// Keep the file in session memory if every endpoint fails
        #[arg(long)]
        local_fallback: bool,
        /// Print the per-attempt transcript to stderr
        #[arg(long, short)]
        verbose: bool,
    },
    /// HEAD-probe the endpoints of a profile
    Probe {
        #[arg(long, default_value = "document")]
        profile: UploadProfile,
    },
    /// Upload a file, then fetch its public URL and compare bytes
    Verify {
        /// Path to the file to upload
        file: PathBuf,
        #[command(flatten)]
        options: UploadOptions,
    },
}

#[derive(Args)]
struct UploadOptions {
    /// Upload profile: document, logo or general
    #[arg(long, default_value = "document")]
    profile: UploadProfile,
    /// Endpoint to try instead of the profile's list (repeatable, tried in order)
    #[arg(long = "endpoint", value_name = "URL")]
    endpoints: Vec<String>,
    /// Fixed per-attempt timeout instead of the profile's
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl UploadOptions {
    fn sequencer(&self, config: &ClientConfig) -> anyhow::Result<FallbackSequencer> {
        let mut sequencer = if self.endpoints.is_empty() {
            self.profile.sequencer(config)?
        } else {
            FallbackSequencer::new(endpoint_candidates(&self.endpoints))?
                .with_accept(self.profile.accept_list())
                .with_max_size(self.profile.max_size())
                .with_timeout_policy(self.profile.timeout_policy())
        };
        if let Some(secs) = self.timeout_secs {
            sequencer =
                sequencer.with_timeout_policy(TimeoutPolicy::Fixed(Duration::from_secs(secs)));
        }
        Ok(sequencer)
    }
}

#[derive(Serialize)]
struct VerifyReport<'a> {
    public_url: &'a str,
    uploaded_bytes: usize,
    fetched_bytes: usize,
    status: u16,
    identical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_mismatch: Option<usize>,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context(
        "Failed to load client configuration. Check DATAROOM_SITE_URL and SUPABASE_URL",
    )?;

    match cli.command {
        Commands::Upload {
            file,
            options,
            local_fallback,
            verbose,
        } => {
            let upload = UploadFile::from_path(&file).await?;
            let mut sequencer = options.sequencer(&config)?;
            if local_fallback {
                sequencer = sequencer.with_transient_fallback(Arc::new(SessionObjects::new()));
            }

            let result = sequencer.upload(&upload).await;
            if verbose {
                eprint!("{}", result.diagnostics());
            }
            print_json(&result)?;

            Ok(match result {
                UploadResult::Uploaded { .. } => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            })
        }
        Commands::Probe { profile } => {
            let reporter = DiagnosticsReporter::new()?;
            let reports = reporter.probe(&profile.candidates(&config)).await;
            eprint!("{}", render_probes(&reports));
            print_json(&reports)?;

            Ok(if reports.iter().all(|r| r.is_reachable()) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Verify { file, options } => {
            let upload = UploadFile::from_path(&file).await?;
            let result = options.sequencer(&config)?.upload(&upload).await;
            let Some(public_url) = result.public_url() else {
                eprint!("{}", result.diagnostics());
                print_json(&result)?;
                return Ok(ExitCode::FAILURE);
            };

            let response = reqwest::get(public_url)
                .await
                .with_context(|| format!("Failed to fetch {}", public_url))?;
            let status = response.status().as_u16();
            let fetched = response
                .bytes()
                .await
                .context("Failed to read fetched object")?;

            let mismatch = first_mismatch(&upload.data, &fetched);
            let identical = status == 200 && mismatch.is_none();
            if !identical {
                tracing::error!(
                    public_url = %truncate_string(public_url, 120),
                    status,
                    uploaded_bytes = upload.size(),
                    fetched_bytes = fetched.len(),
                    "Fetched object does not match the upload"
                );
            }

            print_json(&VerifyReport {
                public_url,
                uploaded_bytes: upload.size(),
                fetched_bytes: fetched.len(),
                status,
                identical,
                first_mismatch: mismatch,
            })?;

            Ok(if identical {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
