use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::io::{self, IsTerminal};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use valoskins::application::coordinator::UpdateCoordinator;
use valoskins::application::pipeline::RefreshPipeline;
use valoskins::config::{Cli, Command, RefreshArgs, ServeArgs, SourceArgs, StoreArgs};
use valoskins::domain::denomination::DenominationTable;
use valoskins::domain::ports::{Refresh, SharedDatasetStore};
use valoskins::error::SkinError;
use valoskins::interfaces::csv::skin_writer::SkinWriter;
use valoskins::interfaces::html::SkinExtractor;
use valoskins::interfaces::http::{AppState, serve};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Command::Serve(args) => run_serve(args).await,
        Command::Refresh(args) => run_refresh(args).await,
        Command::Quote { amount } => run_quote(amount),
        Command::List(store) => run_list(store).await,
        Command::Export { weapon, store } => run_export(&weapon, store).await,
    }
}

fn setup_logging(verbose: bool) {
    let default = if verbose {
        "valoskins=debug,tower_http=debug,warn"
    } else {
        "valoskins=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn pipeline(source: &SourceArgs, store: SharedDatasetStore) -> Result<RefreshPipeline> {
    Ok(RefreshPipeline::new(
        source.fetcher().into_diagnostic()?,
        store,
        SkinExtractor::new(DenominationTable::default()),
        source.weapons(),
    ))
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let store = args.store.open().await.into_diagnostic()?;
    let pipeline = pipeline(&args.source, Arc::clone(&store))?;
    let coordinator = Arc::new(UpdateCoordinator::new(Arc::new(pipeline)));

    if !args.no_bootstrap && store.list().await.into_diagnostic()?.is_empty() {
        info!("No datasets stored yet, running initial refresh");
        coordinator.trigger();
        coordinator.wait_ready().await;
    }

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port)
        .parse()
        .into_diagnostic()?;
    let state = Arc::new(AppState {
        store,
        coordinator,
        table: DenominationTable::default(),
    });
    serve(state, addr).await.into_diagnostic()
}

async fn run_refresh(args: RefreshArgs) -> Result<()> {
    let store = args.store.open().await.into_diagnostic()?;
    let report = pipeline(&args.source, store)?.refresh().await.into_diagnostic()?;

    for (weapon, reason) in &report.failed {
        eprintln!("Failed: {weapon}: {reason}");
    }
    println!("Saved {}/{} weapons", report.saved.len(), report.attempted());
    Ok(())
}

fn run_quote(amount: u32) -> Result<()> {
    let plan = DenominationTable::default()
        .compute_cost(amount)
        .into_diagnostic()?;

    println!("{amount} VP costs ${}", plan.total_cost);
    for pack in plan.formatted_packs() {
        println!("  {pack}");
    }
    Ok(())
}

async fn run_list(store: StoreArgs) -> Result<()> {
    let store = store.open().await.into_diagnostic()?;
    for name in store.list().await.into_diagnostic()? {
        println!("{name}");
    }
    Ok(())
}

async fn run_export(weapon: &str, store: StoreArgs) -> Result<()> {
    let store = store.open().await.into_diagnostic()?;
    let dataset = store
        .load(weapon)
        .await
        .into_diagnostic()?
        .ok_or_else(|| SkinError::DatasetNotFound(weapon.to_string()))
        .into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = SkinWriter::new(stdout.lock());
    writer.write_dataset(&dataset).into_diagnostic()?;
    Ok(())
}
