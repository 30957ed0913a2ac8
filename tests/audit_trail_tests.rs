// tests/audit_trail_tests.rs
use cargodesk::application::audit::AuditRecorder;
use cargodesk::application::commands::leads::{CreateLeadCommand, LeadCommandService};
use cargodesk::application::error::ApplicationError;
use cargodesk::application::queries::audit::{AuditListParams, AuditQueryService};
use cargodesk::domain::audit::AuditAction;
use std::sync::Arc;

mod support;
use support::*;

#[tokio::test]
async fn commands_record_the_actor_and_request_origin() {
    let audit = Arc::new(RecordingAuditRepo::new());
    let service = LeadCommandService::new(
        Arc::new(InMemoryLeadRepo::new()),
        Arc::new(AuditRecorder::new(audit.clone())),
        Arc::new(FixedClock(fixed_now())),
    );

    service
        .create_lead(
            &back_office(),
            &meta(),
            CreateLeadCommand {
                company: "Acme".into(),
                contact: "Jordan".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let records = audit.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.action, AuditAction::Create);
    assert_eq!(record.role.as_deref(), Some("Back Office"));
    assert_eq!(record.entity_type.as_deref(), Some("Lead"));
    assert_eq!(record.ip_address.as_deref(), Some("203.0.113.9"));
    assert_eq!(record.user_agent.as_deref(), Some("cargodesk-tests/1.0"));
}

#[tokio::test]
async fn a_failing_audit_store_never_fails_the_command() {
    let audit = Arc::new(RecordingAuditRepo::failing());
    let leads = Arc::new(InMemoryLeadRepo::new());
    let service = LeadCommandService::new(
        leads.clone(),
        Arc::new(AuditRecorder::new(audit)),
        Arc::new(FixedClock(fixed_now())),
    );

    let dto = service
        .create_lead(
            &admin(),
            &meta(),
            CreateLeadCommand {
                company: "Acme".into(),
                contact: "Jordan".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(dto.company, "Acme");
}

fn seeded_queries() -> AuditQueryService {
    let repo = Arc::new(SeededAuditRepo::new(vec![
        audit_log(1, AuditAction::Create, "Asha Rao"),
        audit_log(2, AuditAction::Approve, "Asha Rao"),
        audit_log(3, AuditAction::Delete, "Vikram Iyer"),
    ]));
    AuditQueryService::new(repo, Arc::new(FixedClock(fixed_now())))
}

#[tokio::test]
async fn the_trail_is_admin_only() {
    let queries = seeded_queries();
    let err = queries
        .list(&back_office(), AuditListParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));
}

#[tokio::test]
async fn user_filter_accepts_an_id_or_a_name_fragment() {
    let queries = seeded_queries();

    let by_id = queries
        .list(
            &admin(),
            AuditListParams {
                user: Some("3".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_id.page.total, 1);
    assert_eq!(by_id.page.items[0].user_name.as_deref(), Some("Vikram Iyer"));

    let by_name = queries
        .list(
            &admin(),
            AuditListParams {
                user: Some("asha".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_name.page.total, 2);
}

#[tokio::test]
async fn role_filter_matches_whole_names_across_spellings() {
    let mut office = audit_log(4, AuditAction::Update, "Asha Rao");
    office.role = Some("Back Office".into());
    let repo = Arc::new(SeededAuditRepo::new(vec![
        audit_log(1, AuditAction::Create, "Asha Rao"),
        office,
    ]));
    let queries = AuditQueryService::new(repo, Arc::new(FixedClock(fixed_now())));

    let listing = queries
        .list(
            &admin(),
            AuditListParams {
                role: Some("back-office".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(listing.page.total, 1);
    assert_eq!(listing.page.items[0].role.as_deref(), Some("Back Office"));

    let fragment = queries
        .list(
            &admin(),
            AuditListParams {
                role: Some("back".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(fragment.page.total, 0);
}

#[tokio::test]
async fn a_single_date_outside_the_range_matches_nothing() {
    let queries = seeded_queries();

    let disjoint = queries
        .list(
            &admin(),
            AuditListParams {
                date: Some("2026-03-15".into()),
                date_from: Some("2026-04-01".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(disjoint.page.total, 0);

    let agreeing = queries
        .list(
            &admin(),
            AuditListParams {
                date: Some("2026-03-15".into()),
                date_from: Some("2026-03-01".into()),
                date_to: Some("2026-03-31".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(agreeing.page.total, 3);
}

#[tokio::test]
async fn action_stats_are_zero_filled_over_all_eight_actions() {
    let queries = seeded_queries();

    let listing = queries
        .list(
            &admin(),
            AuditListParams {
                include_stats: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stats = listing.stats.unwrap();
    assert_eq!(stats.len(), 8);
    assert_eq!(stats["Create"], 1);
    assert_eq!(stats["Approve"], 1);
    assert_eq!(stats["Delete"], 1);
    assert_eq!(stats["Login"], 0);
    assert_eq!(stats["Send"], 0);
}

#[tokio::test]
async fn csv_export_includes_header_resource_and_timestamped_filename() {
    let queries = seeded_queries();

    let export = queries
        .export_csv(&admin(), AuditListParams::default())
        .await
        .unwrap();

    assert_eq!(export.filename, "audit-logs-20260315-103000.csv");
    let mut lines = export.body.lines();
    assert_eq!(
        lines.next(),
        Some("Timestamp,User Name,User Email,Role,Action,Resource,Details,IP Address,User Agent"),
    );
    assert_eq!(lines.count(), 3);
    assert!(export.body.contains("Quotation #2 (Q-2026-002)"));
}

#[tokio::test]
async fn csv_export_honours_the_action_filter() {
    let queries = seeded_queries();

    let export = queries
        .export_csv(
            &admin(),
            AuditListParams {
                action: Some("approve".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(export.body.lines().count(), 2);
    assert!(export.body.contains("Approve"));
    assert!(!export.body.contains("Delete,"));
}
