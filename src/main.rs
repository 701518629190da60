mod args;

use anyhow::Context;
use args::Cli;
use clap::Parser;
use property_hub::auth::{service, Access, SessionState};
use property_hub::config::AppConfig;
use property_hub::search;
use property_hub::sources::{seed, FileSessionPersistence, PropertySource};
use property_hub::Marketplace;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🏠 Property Hub - listing search");
    info!("================================");

    let criteria = cli.criteria();
    let order = cli.sort_order();
    if let Err(e) = criteria.validate() {
        warn!("{}", e);
    }

    let mut market = Marketplace::new(seed::store(), config.clone());

    // Fetch through the async source the way a page load would
    let source = market.catalog_source();
    let mut results = source
        .search(&criteria)
        .await
        .context("Failed to load listings")?;
    search::sort(&mut results, order);
    info!("\n✅ {} properties found via {}\n", results.len(), source.source_name());

    for (i, property) in results.iter().enumerate() {
        println!("{}. {} ({} / month)", i + 1, property.title, property.price);
        println!(
            "   {} · {} bed · {} bath · {} sq.ft",
            property.category, property.bedrooms, property.bathrooms, property.area
        );
        println!("   Location: {}", property.location);
        let mut badges = Vec::new();
        if property.verified {
            badges.push("verified");
        }
        if property.featured {
            badges.push("featured");
        }
        if !badges.is_empty() {
            println!("   {}", badges.join(", "));
        }
        println!("   ID: {}", property.id);
        println!();
    }

    let json = serde_json::to_string_pretty(&results)?;
    tokio::fs::write("search_results.json", json).await?;
    info!("💾 Saved results to search_results.json");

    // Optional sign-in, remembered in the configured session file
    if let Some(path) = &config.session_file {
        let mut slot = FileSessionPersistence::new(path);
        let mut state = market.restore(&mut slot);

        if let Some(email) = &cli.login {
            state = match market.sign_in(email, "demo") {
                Ok(session) => SessionState::from(session),
                Err(e) => {
                    warn!("Sign-in failed: {}", e);
                    SessionState::Anonymous
                }
            };
            service::persist(&state, &mut slot)?;
        }

        if market.authorize(&state, Access::Dashboard) {
            let stats = market.dashboard_stats(&state)?;
            info!("📊 Dashboard: {}", serde_json::to_string(&stats)?);
        } else {
            info!("Not signed in; dashboard unavailable");
        }
    } else if cli.login.is_some() {
        warn!("--login needs session_file to be configured; ignoring");
    }

    Ok(())
}
