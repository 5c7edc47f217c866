//! Command line entry point for nanolink.
//!
//! # Usage
//!
//! ```bash
//! # Store a link under a generated id
//! nanolink add https://github.com
//!
//! # Store a link under a chosen id
//! nanolink add --id gh https://github.com
//!
//! # Delete a link
//! nanolink remove gh
//!
//! # Serve redirects until Ctrl-C or SIGTERM
//! nanolink run redirect --host 0.0.0.0 --port 8080
//! ```
//!
//! # Exit codes
//!
//! - `0` on success and for `--help`/`--version`
//! - `1` on argument errors and failed operations

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use nanolink::application::services::{LinkApi, LinkService};
use nanolink::config::{self, Config};
use nanolink::domain::id_provider::IdProvider;
use nanolink::domain::redirect::RedirectOptions;
use nanolink::infrastructure::id::AlphabeticIdProvider;
use nanolink::infrastructure::persistence::{DiskLinkRepository, InMemoryLinkRepository};
use nanolink::server::{Controller, RedirectController};
use nanolink::telemetry;

/// Short link store and redirect server.
#[derive(Parser)]
#[command(name = "nanolink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding link records (overrides NANOLINK_LINKS_DIR)
    #[arg(long, global = true)]
    links_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a new link
    Add {
        /// Link id (random lowercase letters if omitted)
        #[arg(long)]
        id: Option<String>,

        /// Redirect target
        location: String,
    },

    /// Delete a link
    Remove {
        /// Link id
        id: String,
    },

    /// Run a delivery until interrupted
    Run {
        #[command(subcommand)]
        delivery: Delivery,
    },
}

#[derive(Subcommand)]
enum Delivery {
    /// Serve `GET /{id}` as permanent redirects
    Redirect(RedirectArgs),
}

#[derive(Args)]
struct RedirectArgs {
    /// IPv4 or IPv6 address to bind [default: 127.0.0.1]
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, 0 picks a free port [default: 2000]
    #[arg(long, allow_negative_numbers = true)]
    port: Option<i64>,

    /// Serve HTTPS
    #[arg(long)]
    tls: bool,

    /// PEM certificate chain, required with --tls
    #[arg(long)]
    cert_file: Option<PathBuf>,

    /// PEM private key, required with --tls
    #[arg(long)]
    key_file: Option<PathBuf>,

    /// Answer unknown ids with a bare 404 instead of the HTML page
    #[arg(long)]
    no_not_found_template: bool,

    /// Keep links in memory only; nothing is read from or written to disk
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = config::load_from_env().context("Failed to load configuration")?;
    if let Some(dir) = cli.links_dir {
        config.links_dir = dir;
        config.validate()?;
    }

    telemetry::init(&config)?;
    config.print_summary();

    match cli.command {
        Commands::Add { id, location } => add_link(&config, id, location).await,
        Commands::Remove { id } => remove_link(&config, id).await,
        Commands::Run {
            delivery: Delivery::Redirect(args),
        } => run_redirect(&config, args).await,
    }
}

async fn disk_link_api(config: &Config) -> Result<Arc<dyn LinkApi>> {
    let repo = DiskLinkRepository::open(&config.links_dir)
        .await
        .with_context(|| format!("Failed to open {}", config.links_dir.display()))?;

    Ok(Arc::new(LinkService::new(Arc::new(repo))))
}

/// An empty `--id` means "generate one".
fn requested_id(id: Option<String>) -> Option<String> {
    id.filter(|id| !id.is_empty())
}

/// Stores a link, generating the id when none is given.
///
/// Generation runs on the blocking pool and is cancelled by Ctrl-C.
async fn add_link(config: &Config, id: Option<String>, location: String) -> Result<()> {
    let link_api = disk_link_api(config).await?;

    let id = match requested_id(id) {
        Some(id) => id,
        None => {
            let cancel = CancellationToken::new();
            let watcher = tokio::spawn({
                let cancel = cancel.clone();
                async move {
                    if signal::ctrl_c().await.is_ok() {
                        cancel.cancel();
                    }
                }
            });

            let len = config.id_length;
            let generated = tokio::task::spawn_blocking(move || {
                AlphabeticIdProvider::new().generate_id(len, &cancel)
            })
            .await
            .context("Id generation task failed")?;
            watcher.abort();

            generated.context("Failed to generate link id")?
        }
    };

    let link = link_api
        .add_link(&id, &location)
        .await
        .context("Failed to add link")?;

    println!("/{} -> {}", link.id, link.location);
    Ok(())
}

async fn remove_link(config: &Config, id: String) -> Result<()> {
    let link_api = disk_link_api(config).await?;

    link_api
        .remove_link_by_id(&id)
        .await
        .context("Failed to remove link")?;

    println!("{id} removed");
    Ok(())
}

fn redirect_options(args: &RedirectArgs) -> Result<RedirectOptions> {
    let mut builder = RedirectOptions::builder().not_found_template(!args.no_not_found_template);

    if let Some(host) = &args.host {
        builder = builder.host(host)?;
    }
    if let Some(port) = args.port {
        builder = builder.port(port)?;
    }

    if args.tls {
        builder = builder.tls(
            args.cert_file.clone().unwrap_or_default(),
            args.key_file.clone().unwrap_or_default(),
        )?;
    } else if args.cert_file.is_some() || args.key_file.is_some() {
        tracing::warn!("--cert-file and --key-file are ignored without --tls");
    }

    Ok(builder.build())
}

/// Serves redirects until a shutdown signal, then drains in-flight requests
/// for at most `SHUTDOWN_TIMEOUT_SECS`.
async fn run_redirect(config: &Config, args: RedirectArgs) -> Result<()> {
    let options = redirect_options(&args).context("Invalid redirect options")?;

    let link_api: Arc<dyn LinkApi> = if args.ephemeral {
        tracing::warn!("Ephemeral store: links live only as long as this process");
        Arc::new(LinkService::new(Arc::new(InMemoryLinkRepository::new())))
    } else {
        disk_link_api(config).await?
    };

    let controller = Arc::new(RedirectController::new(link_api, options));
    let mut server = tokio::spawn({
        let controller = controller.clone();
        async move { controller.run().await }
    });

    tokio::select! {
        finished = &mut server => {
            // Stopped without a signal, e.g. the address was taken
            finished.context("Redirect task panicked")??;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    controller.shutdown(config.shutdown_timeout()).await;
    server.await.context("Redirect task panicked")??;

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_id_is_generated() {
        assert_eq!(requested_id(None), None);
        assert_eq!(requested_id(Some(String::new())), None);
        assert_eq!(requested_id(Some("gh".to_string())), Some("gh".to_string()));
    }

    #[test]
    fn test_parse_add_with_empty_id() {
        let cli =
            Cli::try_parse_from(["nanolink", "add", "--id", "", "https://github.com"]).unwrap();

        match cli.command {
            Commands::Add { id, location } => {
                assert_eq!(requested_id(id), None);
                assert_eq!(location, "https://github.com");
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_run_redirect_flags() {
        let cli = Cli::try_parse_from([
            "nanolink",
            "--links-dir",
            "/tmp/links",
            "run",
            "redirect",
            "--host",
            "::1",
            "--port",
            "8080",
            "--no-not-found-template",
        ])
        .unwrap();

        assert_eq!(cli.links_dir, Some(PathBuf::from("/tmp/links")));
        let Commands::Run {
            delivery: Delivery::Redirect(args),
        } = cli.command
        else {
            panic!("expected run redirect");
        };

        let options = redirect_options(&args).unwrap();
        assert_eq!(options.socket_addr().to_string(), "[::1]:8080");
        assert!(!options.not_found_template());
        assert!(options.tls().is_none());
    }

    #[test]
    fn test_tls_flag_without_files_is_rejected() {
        let cli = Cli::try_parse_from(["nanolink", "run", "redirect", "--tls"]).unwrap();
        let Commands::Run {
            delivery: Delivery::Redirect(args),
        } = cli.command
        else {
            panic!("expected run redirect");
        };

        assert!(redirect_options(&args).is_err());
    }

    #[test]
    fn test_missing_location_is_an_argument_error() {
        let err = Cli::try_parse_from(["nanolink", "add"]).err().unwrap();
        assert!(err.use_stderr());
    }
}
