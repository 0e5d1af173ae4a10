mod cli;

use azdo_harvest::{
    AzureDevOpsClient, FileResult, Harvester, SearchQuery, SearchResultSet, StyleOptions,
};
use cli::{display, Cli, Command, Connection, DownloadArgs, SearchArgs};

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use dotenv::dotenv;
use indicatif::ProgressBar;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Search(args) => search(args).await,
        Command::Download(args) => download(args).await,
    }
}

fn harvester(connection: &Connection) -> Result<Harvester> {
    let client = AzureDevOpsClient::builder(&connection.organization, &connection.pat)
        .retries(connection.retries)
        .build()?;
    Ok(Harvester::with_client(client))
}

/// Run `query`, showing a spinner while the requests are in flight.
async fn run_search(harvester: &Harvester, query: &SearchQuery) -> Result<SearchResultSet> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(azdo_harvest::ProgressBarOpts::spinner().to_progress_style());
    spinner.set_message("Searching Azure DevOps...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let results = harvester.search(query).await;
    spinner.finish_and_clear();
    Ok(results?)
}

async fn search(args: SearchArgs) -> Result<()> {
    let connection = &args.connection;
    display::print_header(&args.term, &connection.organization, connection.project.as_deref());

    let mut query = SearchQuery::new(&args.term)
        .files(!args.repo_only)
        .repositories(!args.file_only)
        .max_results(args.limit);
    if let Some(project) = &connection.project {
        query = query.project(project);
    }

    let results = run_search(&harvester(connection)?, &query).await?;
    display::print_results(&results);

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&results)?;
        tokio::fs::write(path, json)
            .await
            .wrap_err_with(|| format!("writing results to {}", path.display()))?;
        info!("Saved results to {}", path.display());
    }
    Ok(())
}

async fn download(args: DownloadArgs) -> Result<()> {
    let connection = &args.connection;
    let harvester = harvester(connection)?;

    let files: Vec<FileResult> = match (&args.from, &args.term) {
        (Some(path), _) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .wrap_err_with(|| format!("reading {}", path.display()))?;
            let results: SearchResultSet = serde_json::from_str(&json)
                .wrap_err_with(|| format!("parsing {}", path.display()))?;
            results.files.into_iter().take(args.limit).collect()
        }
        (None, Some(term)) => {
            display::print_header(term, &connection.organization, connection.project.as_deref());
            let mut query = SearchQuery::new(term)
                .repositories(false)
                .max_results(args.limit);
            if let Some(project) = &connection.project {
                query = query.project(project);
            }
            run_search(&harvester, &query).await?.files
        }
        (None, None) => return Err(eyre!("a search term or --from is required")),
    };

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing the downloads in progress");
            interrupt.cancel();
        }
    });

    let mut builder = harvester
        .downloader()
        .directory(args.output.clone())
        .concurrency(args.concurrency)
        .overwrite(args.overwrite)
        .cancellation(token);
    if args.quiet {
        builder = builder.style_options(StyleOptions::hidden());
    }

    let outcomes = builder.build().download_all(&files).await?;
    display::print_outcomes(&outcomes, &args.output);
    Ok(())
}
