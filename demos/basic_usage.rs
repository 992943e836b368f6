//! # Basic Usage Example
//!
//! This example walks through the affiliate stores end to end:
//! - Loading configuration (falls back to local defaults)
//! - Creating the schema with `migrate`
//! - Creating, reading, updating and searching records
//! - Handling `NotFound`
//!
//! Run with `RUST_LOG=debug` to see the store logging.

use affiliate_store::prelude::*;
use anyhow::Context;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🚀 Affiliate Store Basic Usage Example");
    println!("======================================");

    // 1. Setup Database Connection
    println!("\n📊 Step 1: Database Setup");
    let stores = match AppConfig::load() {
        Ok(config) => AffiliateStore::from_config(&config).await?,
        Err(err) => {
            println!("⚠️  No configuration file ({}), using local defaults", err);
            let config = DatabaseConfig::new(
                "localhost".to_string(),
                5432,
                "affiliate".to_string(),
                "postgres".to_string(),
                "password".to_string(),
                1,    // min_connections
                5,    // max_connections
                30,   // connection_timeout_seconds
                600,  // idle_timeout_seconds
                3600, // max_lifetime_seconds
            );
            AffiliateStore::new(config).await?
        }
    };
    stores.health_check().await.context("database is not reachable")?;
    stores.migrate().await.context("schema migration failed")?;
    println!("✅ Connected and schema is up to date");

    let ctx = stores.context();

    // 2. Create an affiliate to hang records on
    let login_name = format!("demo_{}", Uuid::new_v4().simple());
    let affiliate_id: i64 =
        sqlx::query_scalar("INSERT INTO affiliates (login_name) VALUES ($1) RETURNING id")
            .bind(&login_name)
            .fetch_one(stores.pool())
            .await
            .context("failed to insert demo affiliate")?;
    println!("\n👤 Step 2: Affiliate {} ({})", login_name, affiliate_id);

    // 3. CREATE a tracking link and some events
    println!("\n📝 Step 3: Creating Records");
    let now = Utc::now();
    let tracking_id = stores
        .trackings()
        .create(
            &ctx,
            &Tracking {
                affiliate_id,
                name: "Spring campaign".to_string(),
                code: format!("spring-{}", Uuid::new_v4().simple()),
                landing_url: "https://example.com/spring".to_string(),
                status: TrackingStatus::ACTIVE,
                created_at: now,
                updated_at: now,
                ..Default::default()
            },
        )
        .await?;
    for action in [TrackingAction::CLICK, TrackingAction::CLICK, TrackingAction::REGISTRATION] {
        stores
            .trackings()
            .create_log(
                &ctx,
                &TrackingLog {
                    tracking_id,
                    action,
                    ip_address: "198.51.100.7".to_string(),
                    created_at: Utc::now(),
                    ..Default::default()
                },
            )
            .await?;
    }
    println!("✅ Tracking link {} with 3 events", tracking_id);

    let deposit_id = stores
        .deposits()
        .create_deposit(
            &ctx,
            &Deposit {
                affiliate_id,
                transaction_id: format!("DEP-{}", Uuid::new_v4().simple()),
                amount: 250.0,
                currency: "USD".to_string(),
                payment_method: "bank_transfer".to_string(),
                status: DepositStatus::PENDING,
                created_at: now,
                updated_at: now,
                ..Default::default()
            },
        )
        .await?;
    println!("✅ Deposit {}", deposit_id);

    // 4. UPDATE the deposit status and record it in the log
    println!("\n🔄 Step 4: Updating Records");
    let mut deposit: Deposit = {
        let dto = stores.deposits().get_deposit_by_id(&ctx, deposit_id).await?;
        Deposit {
            id: dto.id,
            affiliate_id: dto.affiliate_id,
            transaction_id: dto.transaction_id,
            partner_transaction_id: dto.partner_transaction_id,
            amount: dto.amount,
            currency: dto.currency,
            payment_method: dto.payment_method,
            status: dto.status,
            attachments: dto.attachments,
            remark: dto.remark,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    };
    deposit.status = DepositStatus::APPROVED;
    deposit.remark = "verified".to_string();
    deposit.updated_at = Utc::now();
    stores.deposits().update_status(&ctx, &deposit).await?;
    stores
        .deposits()
        .save_deposit_log(
            &ctx,
            &DepositLog {
                deposit_id,
                status: DepositStatus::APPROVED,
                remark: "verified".to_string(),
                created_by: "demo".to_string(),
                created_at: Utc::now(),
                ..Default::default()
            },
        )
        .await?;
    let logs = stores.deposits().get_deposit_log(&ctx, deposit_id).await?;
    println!("✅ Deposit approved, {} log entries", logs.len());

    // 5. SEARCH and summarize
    println!("\n🔍 Step 5: Searching");
    let deposits = stores
        .deposits()
        .search_deposit(
            &ctx,
            &SearchDepositQuery {
                affiliate_id: Some(affiliate_id),
                ..Default::default()
            },
        )
        .await?;
    println!("✅ {} deposit(s) for {}", deposits.total_count, login_name);

    let summary = stores
        .trackings()
        .get_summary_tracking_log_for_affiliate(
            &ctx,
            &GetSummaryTrackingQuery {
                affiliate_id,
                ..Default::default()
            },
        )
        .await?;
    println!(
        "✅ Clicks: {}, registrations: {}, first deposits: {}",
        summary.clicks, summary.registrations, summary.first_deposits
    );

    // 6. NotFound is distinct from other failures
    println!("\n❓ Step 6: Missing Records");
    match stores.banners().get_by_id(&ctx, i64::MAX).await {
        Err(err) if err.is_not_found() => println!("✅ Missing banner reported as not found"),
        Err(err) => return Err(err.into()),
        Ok(banner) => println!("⚠️  Unexpected banner {}", banner.id),
    }

    println!("\n🎉 Done");
    Ok(())
}
