//! CLI administration tool for store-locator.
//!
//! Lets operators check postal-code handling, run lookups against the live
//! database and audit vendor location data without going through HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Normalize a postal code or service-area entry
//! cargo run --bin store-admin -- zip "atoyac-03310"
//!
//! # Run a nearby lookup
//! cargo run --bin store-admin -- nearby --lat 19.43 --lng -99.13 --postal-code 03310
//!
//! # Check delivery for one vendor
//! cargo run --bin store-admin -- delivery --vendor 7 --lat 19.43 --lng -99.13
//!
//! # Audit vendor area and coordinate data
//! cargo run --bin store-admin -- vendors
//!
//! # Check database connection
//! cargo run --bin store-admin -- db check
//!
//! # Drop cached candidate sets
//! cargo run --bin store-admin -- cache clear
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (see `store_locator::config`). `zip` needs none.

use store_locator::application::services::{DeliveryService, StoreService};
use store_locator::config::Config;
use store_locator::domain::delivery::DeliveryPoint;
use store_locator::domain::entities::{Eligibility, FulfillmentMode, VendorCandidate};
use store_locator::domain::geo::Coordinate;
use store_locator::domain::postal_code::{self, PostalCode};
use store_locator::domain::repositories::VendorRepository;
use store_locator::domain::resolver::NearbyQuery;
use store_locator::domain::service_area::extract_from_area_entry;
use store_locator::infrastructure::cache::{CacheService, NullCache, RedisCache};
use store_locator::infrastructure::persistence::PgVendorRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// CLI tool for operating store-locator.
#[derive(Parser)]
#[command(name = "store-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Show how a raw postal code or service-area entry is normalized
    Zip {
        /// Raw input, e.g. "3310", "atoyac-03310", "Roma Norte (06700)" or a JSON value
        raw: String,
    },

    /// Run a nearby-store lookup against the database
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Search radius in km (default: DEFAULT_MAX_DISTANCE_KM)
        #[arg(long)]
        max_distance: Option<f64>,

        #[arg(long)]
        postal_code: Option<String>,

        /// pickup, delivery or meetupPoint
        #[arg(long)]
        fulfillment: Option<FulfillmentMode>,
    },

    /// Check whether a vendor delivers to a location
    Delivery {
        /// Vendor ID
        #[arg(long)]
        vendor: i64,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        #[arg(long)]
        postal_code: Option<String>,
    },

    /// Audit approved vendors for unusable area or location data
    Vendors,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Cache operations
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

/// Cache operation subcommands.
#[derive(Subcommand)]
enum CacheAction {
    /// Drop cached candidate sets so the next lookup reloads vendors
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Commands::Zip { raw } = &cli.command {
        show_zip(raw);
        return Ok(());
    }

    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Zip { .. } => {}
        Commands::Nearby {
            lat,
            lng,
            max_distance,
            postal_code,
            fulfillment,
        } => {
            let pool = connect(&config).await?;
            let mut query = NearbyQuery::new(
                Coordinate::new(lat, lng),
                max_distance.unwrap_or(config.default_max_distance_km),
            );
            if let Some(code) = postal_code {
                query = query.with_postal_code(code);
            }
            if let Some(mode) = fulfillment {
                query = query.with_fulfillment(mode);
            }
            run_nearby(&config, pool, query).await?;
        }
        Commands::Delivery {
            vendor,
            lat,
            lng,
            postal_code,
        } => {
            let pool = connect(&config).await?;
            let mut point = DeliveryPoint::new(Coordinate::new(lat, lng));
            if let Some(code) = postal_code {
                point = point.with_postal_code(code);
            }
            run_delivery(&config, pool, vendor, point).await?;
        }
        Commands::Vendors => {
            let pool = connect(&config).await?;
            audit_vendors(pool).await?;
        }
        Commands::Db { action } => {
            let pool = connect(&config).await?;
            handle_db_action(action, &pool).await?;
        }
        Commands::Cache { action } => handle_cache_action(action, &config).await?,
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<PgPool> {
    PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

fn repository(pool: PgPool) -> Arc<dyn VendorRepository> {
    Arc::new(PgVendorRepository::new(Arc::new(pool)))
}

/// Prints the canonical code for a raw customer input and for the same
/// text read as a service-area entry.
fn show_zip(raw: &str) {
    println!("{}", "🔎 Postal code".bright_blue().bold());
    println!();

    let as_customer = postal_code::normalize(raw);
    let entry: Value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    let as_entry = extract_from_area_entry(&entry);

    println!("  Input:          {}", raw.cyan());
    println!("  Customer code:  {}", describe(as_customer.as_ref()));
    println!("  Area entry:     {}", describe(as_entry.as_ref()));
    println!();
}

fn describe(code: Option<&PostalCode>) -> ColoredString {
    match code {
        Some(code) => code.as_str().green().bold(),
        None => "not recognized".red(),
    }
}

async fn run_nearby(config: &Config, pool: PgPool, query: NearbyQuery) -> Result<()> {
    println!("{}", "📍 Nearby stores".bright_blue().bold());
    println!();

    let service = StoreService::new(
        repository(pool),
        Arc::new(NullCache::new()),
        Duration::from_secs(config.vendor_source_timeout_secs),
    );

    let resolution = service
        .find_nearby(&query)
        .await
        .map_err(|e| anyhow::anyhow!("Lookup failed: {}", e))?;

    if resolution.stores.is_empty() {
        let reason = resolution
            .report
            .empty_reason()
            .map(|r| r.as_str())
            .unwrap_or("unknown");
        println!("  {} ({})", "No stores found".yellow(), reason.bright_black());
        println!();
        println!("  {:#?}", resolution.report);
        return Ok(());
    }

    println!(
        "  {:<6} {:<32} {:<12} {:<10} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Distance".bright_white().bold(),
        "ETA".bright_white().bold(),
        "Matched by".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for store in &resolution.stores {
        let distance = store
            .distance_km
            .map(|d| format!("{d:.2} km"))
            .unwrap_or_else(|| "-".to_string());
        let eta = store
            .delivery_time_minutes
            .map(|m| format!("{m} min"))
            .unwrap_or_else(|| "-".to_string());
        let matched = match store.eligibility {
            Eligibility::ServiceArea => "service area".green(),
            Eligibility::Distance => "distance".cyan(),
        };

        println!(
            "  {:<6} {:<32} {:<12} {:<10} {}",
            store.id.to_string().bright_black(),
            store.name,
            distance,
            eta,
            matched
        );
    }

    println!();
    println!(
        "  Total: {}",
        resolution.stores.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn run_delivery(
    config: &Config,
    pool: PgPool,
    vendor_id: i64,
    point: DeliveryPoint,
) -> Result<()> {
    println!("{}", "🚚 Delivery check".bright_blue().bold());
    println!();

    let service = DeliveryService::new(repository(pool), config.default_service_radius_km);
    let (vendor, check) = service
        .check(vendor_id, &point)
        .await
        .map_err(|e| anyhow::anyhow!("Delivery check failed: {}", e))?;

    let verdict = if check.within_radius {
        "DELIVERS".green().bold()
    } else {
        "DOES NOT DELIVER".red().bold()
    };

    println!("  Vendor:   {}", vendor.name.cyan());
    println!("  Result:   {}", verdict);
    println!("  Reason:   {:?}", check.reason);
    if let Some(distance) = check.distance_km {
        println!("  Distance: {distance:.2} km");
    }
    println!("  Message:  {}", check.message);
    println!();

    Ok(())
}

/// Lists approved vendors whose data keeps them out of some or all searches.
async fn audit_vendors(pool: PgPool) -> Result<()> {
    println!("{}", "🧾 Vendor data audit".bright_blue().bold());
    println!();

    let vendors = repository(pool)
        .fetch_approved(false)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load vendors: {}", e))?;

    let mut flagged = 0;
    for vendor in &vendors {
        let issues = audit_issues(vendor);
        if issues.is_empty() {
            continue;
        }
        flagged += 1;
        println!(
            "  {} {}",
            vendor.id.to_string().bright_black(),
            vendor.name.cyan()
        );
        for issue in issues {
            println!("      {} {}", "•".yellow(), issue);
        }
    }

    if flagged == 0 {
        println!("{}", "  All approved vendors look reachable".green());
    }

    println!();
    println!(
        "  Approved: {}   Flagged: {}",
        vendors.len().to_string().bright_white().bold(),
        flagged.to_string().yellow().bold()
    );
    println!();

    Ok(())
}

fn audit_issues(vendor: &VendorCandidate) -> Vec<String> {
    let mut issues = Vec::new();

    if let Some(area) = &vendor.service_area {
        if !area.is_usable() {
            issues.push(format!(
                "service area has {} entries and none is a postal code; distance rule applies",
                area.rejected_entries()
            ));
        } else if area.rejected_entries() > 0 {
            issues.push(format!(
                "{} service area entries carry no postal code",
                area.rejected_entries()
            ));
        }
    }

    if vendor.coordinate.is_none() {
        if vendor.usable_service_area().is_some() {
            issues.push("no location: found by postal code only, distance unknown".to_string());
        } else {
            issues.push("no location and no usable service area: never returned".to_string());
        }
    }

    issues
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let approved: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM vendors WHERE approved")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Approved vendors: {}", approved.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}

async fn handle_cache_action(action: CacheAction, config: &Config) -> Result<()> {
    match action {
        CacheAction::Clear => {
            let Some(redis_url) = &config.redis_url else {
                println!("{}", "⚠️  Redis is not configured; nothing to clear".yellow());
                return Ok(());
            };

            let cache = RedisCache::connect(redis_url, config.cache_ttl_seconds)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            let removed = cache
                .invalidate()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to clear cache: {}", e))?;

            println!(
                "{} ({} entries removed)",
                "✅ Candidate cache cleared".green().bold(),
                removed
            );
        }
    }

    Ok(())
}
