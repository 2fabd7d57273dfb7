//! Command line front end of the site composition engine.
//!
//! Loads a JSON site fixture into the in-memory store and prints engine results as JSON on
//! stdout. Logs go to stderr.
//!
//! ```text
//! clic resolve --fixture fixtures/demo-site.json --tenant demo /comprar/apartamento
//! clic resolve --fixture fixtures/demo-site.json --tenant demo --lang en /buy/gym
//! clic audit --fixture fixtures/demo-site.json
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use clic::domain::TenantId;
use clic::domain::config::EngineConfig;
use clic::features::catalog::TagConflict;
use clic::kernel::config::load_config;
use clic::store::MemoryStore;
use clic::{PageOutcome, SiteEngine};
use clic_logger::Logger;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

/// Exit status of a path that resolves to no page.
const NOT_FOUND_EXIT: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "clic", version, about = "Resolve tenant site pages from a site fixture")]
pub struct Cli {
    /// Engine configuration file; the extension may be omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level regardless of configuration
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolves a request path into a hydrated page
    Resolve {
        /// JSON site fixture
        #[arg(long)]
        fixture: PathBuf,
        #[arg(long)]
        tenant: String,
        /// Request language; defaults to `resolution.default_language`
        #[arg(long)]
        lang: Option<String>,
        path: String,
    },
    /// Reports tag alias and slug collisions
    Audit {
        /// JSON site fixture
        #[arg(long)]
        fixture: PathBuf,
        /// Single tenant to audit; every tenant of the fixture when omitted
        #[arg(long)]
        tenant: Option<String>,
    },
}

/// What a command prints.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report {
    Page(PageOutcome),
    Conflicts(BTreeMap<TenantId, Vec<TagConflict>>),
}

impl Report {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Page(PageOutcome::NotFound(_)) => ExitCode::from(NOT_FOUND_EXIT),
            Self::Page(PageOutcome::Found(_)) | Self::Conflicts(_) => ExitCode::SUCCESS,
        }
    }
}

/// Loads configuration, installs logging, runs the command and prints its report.
///
/// # Errors
/// Fails on malformed configuration, unreadable fixtures and infrastructure faults.
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config: EngineConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    if cli.verbose {
        config.logging.level = "debug".to_owned();
    }
    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &config.logging)?;

    let report = execute(cli.command, &config).await?;

    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &report).context("Writing report")?;
    writeln!(out).context("Writing report")?;
    Ok(report.exit_code())
}

/// Runs one command against a freshly loaded fixture.
///
/// # Errors
/// Fails when the fixture cannot be loaded or the engine hits an infrastructure fault.
pub async fn execute(command: Command, config: &EngineConfig) -> anyhow::Result<Report> {
    match command {
        Command::Resolve { fixture, tenant, lang, path } => {
            let (engine, _) = open(&fixture, config).await?;
            let language = lang.unwrap_or_else(|| config.resolution.default_language.clone());
            let outcome = engine.resolve_page(&TenantId::from(tenant), &language, &path).await?;
            Ok(Report::Page(outcome))
        },
        Command::Audit { fixture, tenant } => {
            let (engine, store) = open(&fixture, config).await?;
            let tenants = tenant.map_or_else(|| store.tenants(), |t| vec![TenantId::from(t)]);

            let mut conflicts = BTreeMap::new();
            for tenant in tenants {
                let found = engine.tag_conflicts(&tenant).await?;
                info!(%tenant, conflicts = found.len(), "Tenant audited");
                conflicts.insert(tenant, found);
            }
            Ok(Report::Conflicts(conflicts))
        },
    }
}

async fn open(
    fixture: &Path,
    config: &EngineConfig,
) -> anyhow::Result<(SiteEngine, MemoryStore)> {
    let store = MemoryStore::load(fixture)
        .await
        .with_context(|| format!("Loading fixture {}", fixture.display()))?;
    let engine = SiteEngine::builder(config.clone()).with_store(store.clone()).build()?;
    Ok((engine, store))
}
