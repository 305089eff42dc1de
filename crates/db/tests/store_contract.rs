use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use snapactivate_core::domain::brand::BrandId;
use snapactivate_core::domain::campaign::{CampaignFilter, CampaignId, CampaignStatus};
use snapactivate_core::domain::performance::{PromoterReport, SalesEntry};
use snapactivate_core::domain::promoter::{CheckInStatus, PromoterAssignment};
use snapactivate_core::domain::support::{SupportTicketRequest, TicketPriority};
use snapactivate_db::repositories::{CampaignReportingRepository, PromoterAssignmentRepository};
use snapactivate_db::{
    connect_with_settings, migrations, BackendOperations, DbPool, DemoSeedDataset, OperationError,
    Stores,
};

async fn seeded_pool() -> DbPool {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    migrations::run_pending(&pool).await.expect("migrations");
    DemoSeedDataset::load(&pool).await.expect("seed");
    pool
}

#[tokio::test]
async fn live_statuses_come_from_persisted_assignments() {
    let operations = BackendOperations::new(&Stores::sql(seeded_pool().await));

    let live = operations.campaigns.live_statuses().await.expect("live statuses");

    assert_eq!(live.len(), 1);
    assert_eq!(live[0].campaign_title, "Summer Soda Splash");
    let names = live[0].promoters.iter().map(|promoter| promoter.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Alice Johnson", "Bob Williams", "Charlie Brown"]);
    assert_eq!(live[0].promoters[0].checked_in_time.as_deref(), Some("09:02 AM"));
    assert_eq!(live[0].promoters[2].status, CheckInStatus::AwaitingCheckIn);
    assert_eq!(live[0].promoters[2].checked_in_time, None);
}

#[tokio::test]
async fn performance_summary_aggregates_seeded_reporting_rows() {
    let operations = BackendOperations::new(&Stores::sql(seeded_pool().await));

    let summary =
        operations.performance.summarize_performance("winter warmers", None).await.expect("summary");

    assert_eq!(summary.campaign_name, "Winter Warmers");
    assert_eq!(summary.summary.attendance_rate, "100%");
    assert_eq!(summary.summary.total_sales, "R4,850.00");
    assert_eq!(summary.summary.customer_engagements, "142");
    assert_eq!(
        summary.summary.feedback_highlights,
        "Customers loved the new flavor but asked for a sugar-free option. Event was very busy on Saturday."
    );
}

#[tokio::test]
async fn report_inputs_rank_variants_and_collect_competitor_notes() {
    let operations = BackendOperations::new(&Stores::sql(seeded_pool().await));

    let inputs = operations.performance.report_inputs("Winter Warmers", None).await.expect("inputs");

    assert_eq!(inputs.units_sold, 194);
    assert_eq!(inputs.total_revenue, Decimal::new(4_850_00, 2));
    assert_eq!(inputs.best_selling_variant().map(|variant| variant.name.as_str()), Some("Original"));
    assert_eq!(inputs.competitor_notes.len(), 1);
    assert_eq!(inputs.feedback.len(), 2);
}

#[tokio::test]
async fn booking_over_sql_uses_brand_payment_plan() {
    let stores = Stores::sql(seeded_pool().await);
    let operations = BackendOperations::new(&stores);
    let request = serde_json::from_value(serde_json::json!({
        "title": "Festive Pop-up",
        "locationZone": "Gateway Theatre of Shopping",
        "date": "2026-12-12",
        "packageTier": "Silver",
        "promoters": 2
    }))
    .expect("request json");

    let booked = operations
        .campaigns
        .book_campaign(request, &BrandId("brand-lumen".to_string()))
        .await
        .expect("book");
    assert_eq!(booked.status, CampaignStatus::PendingPo);

    let lumen = operations
        .campaigns
        .campaigns_for_brand(&BrandId("brand-lumen".to_string()))
        .await
        .expect("list for brand");
    assert_eq!(lumen.len(), 2);

    let pending = operations
        .campaigns
        .list_campaigns(&CampaignFilter {
            statuses: vec![CampaignStatus::PendingPayment, CampaignStatus::PendingPo],
            brand_id: None,
        })
        .await
        .expect("list pending");
    assert_eq!(pending.len(), 2);
}

#[tokio::test]
async fn differently_cased_payment_plan_books_pending_review() {
    let pool = seeded_pool().await;
    sqlx::query("UPDATE brands SET payment_plan = 'Standard' WHERE id = 'brand-fizz'")
        .execute(&pool)
        .await
        .expect("update plan");
    let operations = BackendOperations::new(&Stores::sql(pool));
    let request = serde_json::from_value(serde_json::json!({
        "title": "Mall Sampling",
        "locationZone": "Menlyn Park",
        "date": "2026-11-20",
        "packageTier": "Bronze",
        "promoters": 1
    }))
    .expect("request json");

    let booked = operations
        .campaigns
        .book_campaign(request, &BrandId("brand-fizz".to_string()))
        .await
        .expect("book");

    assert_eq!(booked.status, CampaignStatus::PendingReview);
}

#[tokio::test]
async fn booking_for_unknown_brand_writes_nothing() {
    let stores = Stores::sql(seeded_pool().await);
    let operations = BackendOperations::new(&stores);
    let request = serde_json::from_value(serde_json::json!({
        "title": "Ghost Campaign",
        "locationZone": "Nowhere",
        "date": "2026-12-12",
        "packageTier": "Silver",
        "promoterCount": 2
    }))
    .expect("request json");

    let result = operations.campaigns.book_campaign(request, &BrandId("ghost".to_string())).await;

    assert!(matches!(result, Err(OperationError::BrandNotFound(_))));
    let all = operations.campaigns.list_campaigns(&CampaignFilter::default()).await.expect("list");
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn support_ticket_round_trips_through_sql() {
    let operations = BackendOperations::new(&Stores::sql(seeded_pool().await));
    let brand = BrandId("brand-fizz".to_string());

    let reference = operations
        .support
        .create_support_ticket(
            SupportTicketRequest {
                campaign_name: "Summer Soda Splash".to_string(),
                issue_description: "Charlie has not checked in".to_string(),
                priority: TicketPriority::Urgent,
            },
            &brand,
        )
        .await
        .expect("create ticket");

    let tickets = operations.support.tickets_for_brand(&brand).await.expect("tickets");
    assert_eq!(tickets.len(), 1);
    assert_eq!(reference.as_str(), format!("TICKET-{}", tickets[0].id.0[..6].to_uppercase()));
}

#[tokio::test]
async fn reporting_rows_upsert_by_id() {
    let stores = Stores::sql(seeded_pool().await);
    let campaign_id = CampaignId("camp-summer-splash".to_string());
    let at = Utc.with_ymd_and_hms(2026, 10, 17, 15, 0, 0).unwrap();

    stores
        .assignments
        .save(PromoterAssignment {
            id: "pa-splash-charlie".to_string(),
            campaign_id: campaign_id.clone(),
            promoter_name: "Charlie Brown".to_string(),
            status: CheckInStatus::Delayed,
            location: "Downtown Plaza".to_string(),
            checked_in_at: None,
        })
        .await
        .expect("update assignment");
    let assignments = stores.assignments.list_for_campaign(&campaign_id).await.expect("list");
    assert_eq!(assignments.len(), 3);
    assert!(assignments.iter().any(|a| a.status == CheckInStatus::Delayed));

    stores
        .reporting
        .save_sales_entry(SalesEntry {
            id: "sale-splash-lime".to_string(),
            campaign_id: campaign_id.clone(),
            variant: "Lime Zest".to_string(),
            units: 10,
            unit_price: Decimal::new(18_50, 2),
            recorded_at: at,
        })
        .await
        .expect("save sale");
    stores
        .reporting
        .save_promoter_report(PromoterReport {
            id: "pr-splash-alice".to_string(),
            campaign_id: campaign_id.clone(),
            promoter_name: "Alice Johnson".to_string(),
            engaged_customers: 30,
            potential_customers: 12,
            male_customers: 14,
            female_customers: 16,
            age_group: "18-24".to_string(),
            rating: 4,
            sentiment: "Neutral".to_string(),
            comments: "Foot traffic picked up after lunch.".to_string(),
            competitor_notes: None,
            submitted_at: at,
        })
        .await
        .expect("save report");

    let sales = stores.reporting.list_sales(&campaign_id).await.expect("sales");
    assert_eq!(sales.len(), 2);
    assert_eq!(sales[1].recorded_at, at);
    let reports = stores.reporting.list_promoter_reports(&campaign_id).await.expect("reports");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].rating, 4);
}
