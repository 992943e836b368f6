//! Integration tests against a live PostgreSQL
//!
//! Set DATABASE_URL to run them; without it every test returns early. Each
//! test works on its own freshly inserted affiliate, so tests can share one
//! database and run in parallel.

use affiliate_store::prelude::*;
use chrono::{Duration, SubsecRound};
use std::collections::HashSet;

async fn setup() -> Option<AffiliateStore> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping integration test");
        return None;
    };

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database");
    let stores = AffiliateStore::from_pool(pool, StoreConfig::default());
    stores.migrate().await.expect("Failed to migrate schema");
    Some(stores)
}

/// Insert an affiliate with a unique login and return (id, login_name)
async fn new_affiliate(stores: &AffiliateStore) -> (i64, String) {
    let login_name = format!("it_{}", Uuid::new_v4().simple());
    let id: i64 = sqlx::query_scalar("INSERT INTO affiliates (login_name) VALUES ($1) RETURNING id")
        .bind(&login_name)
        .fetch_one(stores.pool())
        .await
        .expect("Failed to insert affiliate");
    (id, login_name)
}

/// Current time at the precision PostgreSQL stores
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[tokio::test]
async fn test_banner_create_get_and_update_status() {
    let Some(stores) = setup().await else { return };
    let ctx = stores.context();
    let at = now();

    let banner = Banner {
        name: format!("banner_{}", Uuid::new_v4().simple()),
        image_url: "https://cdn.example/b.png".to_string(),
        link_url: "https://example/b".to_string(),
        language: "en".to_string(),
        width: 300,
        height: 250,
        sort_order: 2,
        status: BannerStatus::ACTIVE,
        created_at: at,
        updated_at: at,
        ..Default::default()
    };
    let id = stores.banners().create(&ctx, &banner).await.unwrap();
    assert!(id > 0);

    let found = stores.banners().get_by_id(&ctx, id).await.unwrap();
    assert_eq!(found, Banner { id, ..banner.clone() });

    let changed = Banner {
        id,
        status: BannerStatus::INACTIVE,
        updated_at: at + Duration::seconds(5),
        ..banner.clone()
    };
    stores.banners().update_status(&ctx, &changed).await.unwrap();
    let found = stores.banners().get_by_id(&ctx, id).await.unwrap();
    assert_eq!(found.status, BannerStatus::INACTIVE);
    assert_eq!(found.updated_at, at + Duration::seconds(5));

    let result = stores
        .banners()
        .search(
            &ctx,
            &SearchBannerQuery {
                name: Some(banner.name.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(result.total_count, 1);
    assert_eq!(result.items[0].id, id);
}

#[tokio::test]
async fn test_commission_create_get_and_update_status() {
    let Some(stores) = setup().await else { return };
    let ctx = stores.context();
    let (affiliate_id, login_name) = new_affiliate(&stores).await;
    let at = now();

    let commission = Commission {
        affiliate_id,
        uuid: Uuid::new_v4(),
        period: "2024-05".to_string(),
        currency: "USD".to_string(),
        net_revenue: 1520.75,
        amount: 380.25,
        active_players: 12,
        min_active_players: 5,
        payout_frequency: "monthly".to_string(),
        commission_status: CommissionStatus::PENDING,
        payment_status: CommissionPaymentStatus::UNPAID,
        created_at: at,
        updated_at: at,
        ..Default::default()
    };
    let id = stores.commissions().create(&ctx, &commission).await.unwrap();
    assert!(id > 0);

    let found = stores.commissions().get_by_id(&ctx, id).await.unwrap();
    assert_eq!(
        found,
        CommissionDTO {
            id,
            affiliate_id,
            login_name,
            uuid: commission.uuid,
            period: commission.period.clone(),
            currency: commission.currency.clone(),
            net_revenue: commission.net_revenue,
            amount: commission.amount,
            active_players: commission.active_players,
            min_active_players: commission.min_active_players,
            payout_frequency: commission.payout_frequency.clone(),
            commission_status: CommissionStatus::PENDING,
            payment_status: CommissionPaymentStatus::UNPAID,
            created_at: at,
            updated_at: at,
        }
    );

    let approved = Commission {
        id,
        commission_status: CommissionStatus::APPROVED,
        payment_status: CommissionPaymentStatus::PAID,
        updated_at: at + Duration::seconds(5),
        ..commission.clone()
    };
    stores.commissions().update_status(&ctx, &approved).await.unwrap();
    let found = stores.commissions().get_by_id(&ctx, id).await.unwrap();
    assert_eq!(found.commission_status, CommissionStatus::APPROVED);
    assert_eq!(found.payment_status, CommissionPaymentStatus::PAID);
    assert_eq!(found.updated_at, at + Duration::seconds(5));
    assert_eq!(found.created_at, at);

    let result = stores
        .commissions()
        .search(
            &ctx,
            &SearchCommissionQuery {
                uuid: Some(commission.uuid),
                has_min_active_player_check: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(result.total_count, 1);
    assert_eq!(result.items[0].id, id);
}

#[tokio::test]
async fn test_annotation_create_get_and_update_status() {
    let Some(stores) = setup().await else { return };
    let ctx = stores.context();
    let (affiliate_id, login_name) = new_affiliate(&stores).await;
    let at = now();

    let annotation = Annotation {
        affiliate_id,
        title: "Payout hold".to_string(),
        content: "waiting for bank details".to_string(),
        status: AnnotationStatus::ACTIVE,
        created_by: "ops".to_string(),
        created_at: at,
        updated_at: at,
        ..Default::default()
    };
    let id = stores.annotations().create(&ctx, &annotation).await.unwrap();

    let found = stores.annotations().get_by_id(&ctx, id).await.unwrap();
    assert_eq!(
        found,
        AnnotationDTO {
            id,
            affiliate_id,
            login_name,
            title: annotation.title.clone(),
            content: annotation.content.clone(),
            status: AnnotationStatus::ACTIVE,
            created_by: annotation.created_by.clone(),
            created_at: at,
            updated_at: at,
            attachments: Vec::new(),
        }
    );

    let inactive = Annotation {
        id,
        status: AnnotationStatus::INACTIVE,
        updated_at: at + Duration::seconds(5),
        ..annotation.clone()
    };
    stores.annotations().update_status(&ctx, &inactive).await.unwrap();
    let found = stores.annotations().get_by_id(&ctx, id).await.unwrap();
    assert_eq!(found.status, AnnotationStatus::INACTIVE);
    assert_eq!(found.updated_at, at + Duration::seconds(5));
    assert_eq!(found.title, annotation.title);
}

#[tokio::test]
async fn test_tracking_create_get_and_update_status() {
    let Some(stores) = setup().await else { return };
    let ctx = stores.context();
    let (affiliate_id, login_name) = new_affiliate(&stores).await;
    let at = now();

    let tracking = Tracking {
        affiliate_id,
        name: "spring campaign".to_string(),
        code: format!("t{}", Uuid::new_v4().simple()),
        landing_url: "https://example/landing".to_string(),
        status: TrackingStatus::ACTIVE,
        created_at: at,
        updated_at: at,
        ..Default::default()
    };
    let id = stores.trackings().create(&ctx, &tracking).await.unwrap();

    let found = stores.trackings().get_tracking_by_id(&ctx, id).await.unwrap();
    assert_eq!(
        found,
        TrackingDTO {
            id,
            affiliate_id,
            login_name,
            name: tracking.name.clone(),
            code: tracking.code.clone(),
            landing_url: tracking.landing_url.clone(),
            status: TrackingStatus::ACTIVE,
            created_at: at,
            updated_at: at,
        }
    );

    let inactive = Tracking {
        id,
        status: TrackingStatus::INACTIVE,
        updated_at: at + Duration::seconds(5),
        ..tracking.clone()
    };
    stores.trackings().update_status(&ctx, &inactive).await.unwrap();
    let found = stores.trackings().get_tracking_by_id(&ctx, id).await.unwrap();
    assert_eq!(found.status, TrackingStatus::INACTIVE);
    assert_eq!(found.updated_at, at + Duration::seconds(5));
    assert_eq!(found.code, tracking.code);
}

#[tokio::test]
async fn test_transfer_create_get_and_update_status() {
    let Some(stores) = setup().await else { return };
    let ctx = stores.context();
    let (from_id, from_login) = new_affiliate(&stores).await;
    let (to_id, to_login) = new_affiliate(&stores).await;
    let at = now();

    let transfer = Transfer {
        transaction_id: format!("TRF-{}", Uuid::new_v4().simple()),
        from_affiliate_id: from_id,
        to_affiliate_id: to_id,
        amount: 75.5,
        currency: "EUR".to_string(),
        status: TransferStatus::PENDING,
        remark: "sub-affiliate share".to_string(),
        created_by: "ops".to_string(),
        created_at: at,
        updated_at: at,
        ..Default::default()
    };
    let id = stores.transfers().create(&ctx, &transfer).await.unwrap();

    let expected = TransferDTO {
        id,
        transaction_id: transfer.transaction_id.clone(),
        from_affiliate_id: from_id,
        from_login_name: from_login,
        to_affiliate_id: to_id,
        to_login_name: to_login,
        amount: transfer.amount,
        currency: transfer.currency.clone(),
        status: TransferStatus::PENDING,
        remark: transfer.remark.clone(),
        created_by: transfer.created_by.clone(),
        created_at: at,
        updated_at: at,
    };
    assert_eq!(stores.transfers().get_by_id(&ctx, id).await.unwrap(), expected);
    assert_eq!(
        stores
            .transfers()
            .get_by_transaction_id(&ctx, &transfer.transaction_id)
            .await
            .unwrap(),
        expected
    );

    let completed = Transfer {
        id,
        status: TransferStatus::COMPLETED,
        remark: "paid".to_string(),
        updated_at: at + Duration::seconds(5),
        ..transfer.clone()
    };
    stores.transfers().update_status(&ctx, &completed).await.unwrap();
    let found = stores.transfers().get_by_id(&ctx, id).await.unwrap();
    assert_eq!(
        found,
        TransferDTO {
            status: TransferStatus::COMPLETED,
            remark: "paid".to_string(),
            updated_at: at + Duration::seconds(5),
            ..expected
        }
    );
}

#[tokio::test]
async fn test_get_by_id_missing_is_not_found() {
    let Some(stores) = setup().await else { return };
    let ctx = stores.context();
    let missing = i64::MAX;

    assert!(stores.banners().get_by_id(&ctx, missing).await.unwrap_err().is_not_found());
    assert!(stores.annotations().get_by_id(&ctx, missing).await.unwrap_err().is_not_found());
    assert!(stores.commissions().get_by_id(&ctx, missing).await.unwrap_err().is_not_found());
    assert!(stores
        .deposits()
        .get_deposit_by_id(&ctx, missing)
        .await
        .unwrap_err()
        .is_not_found());
    assert!(stores.transfers().get_by_id(&ctx, missing).await.unwrap_err().is_not_found());
    assert!(stores
        .trackings()
        .get_tracking_by_id(&ctx, missing)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_tracking_pages_concatenate_to_full_set() {
    let Some(stores) = setup().await else { return };
    let ctx = stores.context();
    let (affiliate_id, _) = new_affiliate(&stores).await;

    let mut created = HashSet::new();
    for n in 0..7 {
        let tracking = Tracking {
            affiliate_id,
            name: format!("link {n}"),
            code: format!("c{}", Uuid::new_v4().simple()),
            status: TrackingStatus::ACTIVE,
            created_at: now(),
            updated_at: now(),
            ..Default::default()
        };
        created.insert(stores.trackings().create(&ctx, &tracking).await.unwrap());
    }

    let page = |page: i64| SearchTrackingQuery {
        affiliate_id: Some(affiliate_id),
        page,
        per_page: 3,
        ..Default::default()
    };

    let mut seen = Vec::new();
    for number in 1..=3 {
        let result = stores.trackings().search(&ctx, &page(number)).await.unwrap();
        assert_eq!(result.total_count, 7);
        assert!(result.len() <= 3);
        seen.extend(result.items.into_iter().map(|t| t.id));
    }
    assert_eq!(seen.len(), 7);
    assert_eq!(seen.iter().copied().collect::<HashSet<_>>(), created);
    assert!(seen.windows(2).all(|w| w[0] > w[1]), "newest first");

    // page 0 behaves as page 1
    let first = stores.trackings().search(&ctx, &page(0)).await.unwrap();
    assert_eq!(
        first.items.iter().map(|t| t.id).collect::<Vec<_>>(),
        seen[..3].to_vec()
    );
}

#[tokio::test]
async fn test_deposit_logs_are_ordered_and_stats_roll_up() {
    let Some(stores) = setup().await else { return };
    let ctx = stores.context();
    let (affiliate_id, login_name) = new_affiliate(&stores).await;
    let at = now();

    let deposit = Deposit {
        affiliate_id,
        transaction_id: format!("DEP-{}", Uuid::new_v4().simple()),
        amount: 120.5,
        currency: "USD".to_string(),
        payment_method: "bank_transfer".to_string(),
        status: DepositStatus::PENDING,
        attachments: vec!["receipt.png".to_string()],
        created_at: at,
        updated_at: at,
        ..Default::default()
    };
    let id = stores.deposits().create_deposit(&ctx, &deposit).await.unwrap();

    let found = stores
        .deposits()
        .get_deposit_by_transaction_id(&ctx, &deposit.transaction_id)
        .await
        .unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.login_name, login_name);
    assert_eq!(found.attachments, vec!["receipt.png".to_string()]);

    assert!(stores.deposits().get_deposit_log(&ctx, id).await.unwrap().is_empty());
    for (offset, status) in [(2, DepositStatus::APPROVED), (1, DepositStatus::PENDING)] {
        let log = DepositLog {
            deposit_id: id,
            status,
            created_by: "ops".to_string(),
            created_at: at + Duration::seconds(offset),
            ..Default::default()
        };
        stores.deposits().save_deposit_log(&ctx, &log).await.unwrap();
    }
    let logs = stores.deposits().get_deposit_log(&ctx, id).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    assert_eq!(logs[0].status, DepositStatus::PENDING);

    let cmd = UpdateDepositAttachmentsCommand {
        id,
        attachments: vec!["a.png".to_string(), "b.png".to_string()],
    };
    stores.deposits().update_deposit_attachments(&ctx, &cmd).await.unwrap();
    let found = stores.deposits().get_deposit_by_id(&ctx, id).await.unwrap();
    assert_eq!(found.attachments, cmd.attachments);

    let approved = Deposit {
        id,
        status: DepositStatus::APPROVED,
        updated_at: now(),
        ..deposit.clone()
    };
    stores.deposits().update_status(&ctx, &approved).await.unwrap();
    assert!(stores
        .deposits()
        .get_deposit_by_status(&ctx, id, DepositStatus::PENDING)
        .await
        .unwrap_err()
        .is_not_found());

    let totals = stores
        .deposits()
        .get_total_by_status(
            &ctx,
            at - Duration::seconds(1),
            at + Duration::seconds(1),
            DepositStatus::APPROVED,
        )
        .await
        .unwrap();
    let usd = totals.iter().find(|s| s.currency == "USD").unwrap();
    assert!(usd.total_count >= 1);
    assert!(usd.total_amount >= 120.5);
}

#[tokio::test]
async fn test_annotation_attachment_deletion_is_isolated() {
    let Some(stores) = setup().await else { return };
    let ctx = stores.context();
    let (affiliate_id, _) = new_affiliate(&stores).await;

    let annotation = Annotation {
        affiliate_id,
        title: "KYC".to_string(),
        content: "documents received".to_string(),
        status: AnnotationStatus::ACTIVE,
        created_at: now(),
        updated_at: now(),
        ..Default::default()
    };
    let first = stores.annotations().create(&ctx, &annotation).await.unwrap();
    let second = stores.annotations().create(&ctx, &annotation).await.unwrap();

    for (annotation_id, file_name) in [(first, "id.png"), (first, "proof.pdf"), (second, "id.png")] {
        let attachment = AnnotationAttachment {
            annotation_id,
            file_name: file_name.to_string(),
            created_at: now(),
            ..Default::default()
        };
        stores.annotations().create_attachment(&ctx, &attachment).await.unwrap();
    }

    stores
        .annotations()
        .delete_attachment_by_id(&ctx, first, "id.png")
        .await
        .unwrap();

    let remaining = stores
        .annotations()
        .get_attachments_by_annotation_id(&ctx, first)
        .await
        .unwrap();
    assert_eq!(remaining, vec!["proof.pdf".to_string()]);
    let untouched = stores
        .annotations()
        .get_attachments_by_annotation_id(&ctx, second)
        .await
        .unwrap();
    assert_eq!(untouched, vec!["id.png".to_string()]);

    let dto = stores.annotations().get_by_id(&ctx, first).await.unwrap();
    assert_eq!(dto.attachments, vec!["proof.pdf".to_string()]);

    let taken = stores
        .annotations()
        .annotation_taken(&ctx, affiliate_id, "kyc", first)
        .await
        .unwrap();
    assert_eq!(taken.iter().map(|a| a.id).collect::<Vec<_>>(), vec![second]);
}

#[tokio::test]
async fn test_transfer_search_grand_total() {
    let Some(stores) = setup().await else { return };
    let ctx = stores.context();
    let (from_id, from_login) = new_affiliate(&stores).await;
    let (to_id, to_login) = new_affiliate(&stores).await;

    for amount in [10.0, 32.5] {
        let transfer = Transfer {
            transaction_id: format!("TRF-{}", Uuid::new_v4().simple()),
            from_affiliate_id: from_id,
            to_affiliate_id: to_id,
            amount,
            currency: "EUR".to_string(),
            status: TransferStatus::COMPLETED,
            created_at: now(),
            updated_at: now(),
            ..Default::default()
        };
        stores.transfers().create(&ctx, &transfer).await.unwrap();
    }

    let result = stores
        .transfers()
        .search(
            &ctx,
            &SearchTransfersQuery {
                login_name: Some(to_login.clone()),
                per_page: 1,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(result.transfers.len(), 1);
    assert_eq!(result.total_count, 2);
    assert_eq!(result.grand_total.total_count, 2);
    assert_eq!(result.grand_total.total_amount, 42.5);
    assert_eq!(result.transfers[0].from_login_name, from_login);
    assert_eq!(result.transfers[0].to_login_name, to_login);

    let logs = stores
        .transfers()
        .get_log_by_id(&ctx, result.transfers[0].id)
        .await
        .unwrap();
    assert!(logs.is_empty());
}

#[tokio::test]
async fn test_tracking_summary_counts_actions() {
    let Some(stores) = setup().await else { return };
    let ctx = stores.context();
    let (affiliate_id, login_name) = new_affiliate(&stores).await;

    let tracking = Tracking {
        affiliate_id,
        name: "summary".to_string(),
        code: format!("s{}", Uuid::new_v4().simple()),
        status: TrackingStatus::ACTIVE,
        created_at: now(),
        updated_at: now(),
        ..Default::default()
    };
    let tracking_id = stores.trackings().create(&ctx, &tracking).await.unwrap();
    for action in [
        TrackingAction::CLICK,
        TrackingAction::CLICK,
        TrackingAction::CLICK,
        TrackingAction::REGISTRATION,
        TrackingAction::FIRST_DEPOSIT,
    ] {
        let log = TrackingLog {
            tracking_id,
            action,
            ip_address: "192.0.2.1".to_string(),
            created_at: now(),
            ..Default::default()
        };
        stores.trackings().create_log(&ctx, &log).await.unwrap();
    }

    let summary = stores
        .trackings()
        .get_summary_tracking_log(
            &ctx,
            &SearchSummaryTrackingLogQuery {
                affiliate_id: Some(affiliate_id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(summary.total_count, 1);
    assert_eq!(
        summary.items,
        vec![TrackingLogSummary {
            tracking_id,
            tracking_name: "summary".to_string(),
            affiliate_id,
            login_name,
            clicks: 3,
            registrations: 1,
            first_deposits: 1,
        }]
    );

    let totals = stores
        .trackings()
        .get_summary_tracking_log_for_affiliate(
            &ctx,
            &GetSummaryTrackingQuery {
                affiliate_id,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(
        totals,
        GetSummaryTrackingResult {
            clicks: 3,
            registrations: 1,
            first_deposits: 1,
        }
    );
}
