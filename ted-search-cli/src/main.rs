mod cli;
mod sink;

use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use serde_json::Value;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use ted_search_lib::ClientConfig;
use ted_search_lib::TedClient;
use ted_search_lib::api::query::SearchFacets;
use ted_search_lib::api::query::SearchFacetsBuilder;
use ted_search_lib::api::query::Sort;
use ted_search_lib::retry::RetryConfig;

use crate::cli::Cli;
use crate::cli::Mode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let facets = facets(&cli)?;

    if cli.print_query {
        println!("{}", facets.expression());
        return Ok(());
    }

    let config = ClientConfig::default()
        .with_endpoint(cli.endpoint.clone())
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_retry(
            RetryConfig::default()
                .max_attempts(cli.max_attempts)
                .base_delay(Duration::from_millis(cli.base_delay_ms))
                .max_delay(Duration::from_millis(cli.max_delay_ms)),
        )
        .with_batch_limit(cli.limit);
    let client = TedClient::builder().config(config).build()?;

    let mut out = sink::open(cli.out.as_deref())
        .with_context(|| format!("cannot open output {:?}", cli.out))?;

    match cli.mode {
        Mode::Page => run_pages(&client, &facets, &cli, &mut *out).await,
        Mode::Iteration => run_iteration(&client, &facets, &cli, &mut *out).await,
    }
}

fn facets(cli: &Cli) -> Result<SearchFacets> {
    let facets = SearchFacetsBuilder::parse_window(&cli.date_from, &cli.date_to)?
        .territories(&cli.countries)
        .subject_prefixes(&cli.cpv)
        .keywords(&cli.keywords)
        .form_types(&cli.form_types)
        .fields(&cli.fields)
        .sort(Sort::new(cli.sort_field.clone(), cli.sort_order))
        .build()?;
    Ok(facets)
}

async fn run_pages(client: &TedClient, facets: &SearchFacets, cli: &Cli, out: &mut dyn Write) -> Result<()> {
    if cli.max_pages <= 1 {
        let page = client.search_page(facets, cli.page, cli.limit).await?;
        log_violations(page.violations().len() as u64);
        sink::write_document(out, &page.to_document(), cli.pretty)?;
        return Ok(());
    }

    let mut pages = client.pages(facets, cli.page, cli.limit).max_pages(cli.max_pages);
    let mut documents = Vec::new();
    while let Some(page) = pages.next().await {
        let page = page?;
        log::info!("page {}: {} notices", page.page(), page.len());
        log_violations(page.violations().len() as u64);
        documents.push(page.to_document());
    }

    sink::write_document(out, &Value::Array(documents), cli.pretty)?;
    Ok(())
}

async fn run_iteration(client: &TedClient, facets: &SearchFacets, cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let mut fetcher = client.iterate_with_limit(facets, cli.limit);
    log::info!("iterating: {}", fetcher.query());

    while let Some(record) = fetcher.next().await {
        let record = record?;
        sink::write_line(out, &record.into_value())?;
    }

    if let Some(anomaly) = fetcher.cursor_anomaly() {
        log::warn!("{}", anomaly);
    }
    log_violations(fetcher.violation_count());
    log::info!(
        "{} notices in {} requests",
        fetcher.yielded(),
        fetcher.requests()
    );
    Ok(())
}

fn log_violations(count: u64) {
    if count > 0 {
        log::warn!("skipped {} malformed notices", count);
    }
}
