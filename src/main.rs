use std::io::{Read, Write};
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nutrimap::cache::RunCache;
use nutrimap::catalog::FdcClient;
use nutrimap::config::Config;
use nutrimap::nutrition::GenaiNutritionOracle;
use nutrimap::oracle::ChatOracle;
use nutrimap::pipeline::{Resolver, run_batch};
use nutrimap::querygen::GenaiQueryGenerator;
use nutrimap::semantic::GenaiSemanticOracle;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Reads ingredient names, one per line, from the path argument or stdin
/// when the argument is `-` or absent. Blank lines and `#` comments skipped.
fn read_ingredients(arg: Option<&str>) -> anyhow::Result<Vec<String>> {
    let raw = match arg {
        Some("-") | None => {
            let mut buf = String::new();
            std::io::stdin()
                .lock()
                .read_to_string(&mut buf)
                .context("reading ingredient list from stdin")?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading ingredient list from {path}"))?,
    };

    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().context("loading configuration")?;
    config.validate().context("validating configuration")?;
    let api_key = config.require_fdc_api_key()?.to_string();

    let arg = std::env::args().nth(1);
    let ingredients = read_ingredients(arg.as_deref())?;
    info!(count = ingredients.len(), "ingredient list loaded");

    let catalog = Arc::new(FdcClient::new(&config.fdc_base_url, &api_key));
    let chat = ChatOracle::new(config.oracle_model.clone());
    let resolver = Arc::new(Resolver::new(
        catalog,
        Arc::new(GenaiSemanticOracle::new(chat.clone())),
        Arc::new(GenaiNutritionOracle::new(chat.clone())),
        Arc::new(GenaiQueryGenerator::new(chat)),
        RunCache::with_capacity(config.cache_capacity),
        &config,
    ));

    let results = run_batch(
        resolver,
        &ingredients,
        config.batch_concurrency,
        config.ingredient_budget,
    )
    .await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for result in &results {
        serde_json::to_writer(&mut out, result)?;
        out.write_all(b"\n")?;
    }

    let accepted = results.iter().filter(|r| r.is_accepted()).count();
    info!(
        total = results.len(),
        accepted,
        unmapped = results.len() - accepted,
        "run complete"
    );
    Ok(())
}
