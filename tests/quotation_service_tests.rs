// tests/quotation_service_tests.rs
use cargodesk::application::audit::AuditRecorder;
use cargodesk::application::commands::quotations::{
    CreateQuotationCommand, QuotationCommandService, QuotationItemInput, UpdateQuotationCommand,
};
use cargodesk::application::error::ApplicationError;
use cargodesk::domain::audit::AuditAction;
use cargodesk::domain::quotation::{QuotationRepository, QuotationStatus};
use cargodesk::domain::role::RoleName;
use std::sync::Arc;

mod support;
use support::*;

struct Fixture {
    quotations: Arc<InMemoryQuotationRepo>,
    audit: Arc<RecordingAuditRepo>,
    service: QuotationCommandService,
}

fn fixture(quotations: InMemoryQuotationRepo) -> Fixture {
    let quotations = Arc::new(quotations);
    let users = Arc::new(InMemoryUserRepo::seeded(vec![
        user(7, RoleName::Customer),
        user(8, RoleName::Customer),
    ]));
    let audit = Arc::new(RecordingAuditRepo::new());
    let service = QuotationCommandService::new(
        quotations.clone(),
        users,
        Arc::new(AuditRecorder::new(audit.clone())),
        Arc::new(FixedClock(fixed_now())),
    );
    Fixture {
        quotations,
        audit,
        service,
    }
}

fn items() -> Vec<QuotationItemInput> {
    vec![QuotationItemInput {
        description: "Ocean freight 20ft".into(),
        quantity: 2,
        unit: None,
        unit_price: dec(850.0),
    }]
}

#[tokio::test]
async fn first_quotation_of_the_year_is_numbered_001() {
    let fx = fixture(InMemoryQuotationRepo::new());

    let dto = fx
        .service
        .create_quotation(
            &back_office(),
            &meta(),
            CreateQuotationCommand {
                customer_id: 7,
                date: day(2026, 3, 15),
                valid_until: day(2026, 4, 15),
                terms_and_conditions: None,
                items: items(),
            },
        )
        .await
        .unwrap();

    assert_eq!(dto.quote_id, "Q-2026-001");
    assert_eq!(dto.status, QuotationStatus::Draft);
    assert_eq!(dto.total_amount, dec(1_700.0));
    assert_eq!(dto.items[0].unit, "Pieces");
}

#[tokio::test]
async fn numbering_never_reuses_a_deleted_quotation_sequence() {
    let fx = fixture(InMemoryQuotationRepo::seeded(vec![
        quotation(1, 7),
        quotation(2, 7),
    ]));
    fx.quotations
        .soft_delete(cargodesk::domain::quotation::QuotationId(2))
        .await
        .unwrap();

    let dto = fx
        .service
        .create_quotation(
            &back_office(),
            &meta(),
            CreateQuotationCommand {
                customer_id: 7,
                date: day(2026, 3, 15),
                valid_until: day(2026, 4, 15),
                terms_and_conditions: None,
                items: items(),
            },
        )
        .await
        .unwrap();

    assert_eq!(dto.quote_id, "Q-2026-003");
}

#[tokio::test]
async fn create_rejects_inverted_validity_and_unknown_customer() {
    let fx = fixture(InMemoryQuotationRepo::new());

    let err = fx
        .service
        .create_quotation(
            &back_office(),
            &meta(),
            CreateQuotationCommand {
                customer_id: 99,
                date: day(2026, 3, 15),
                valid_until: day(2026, 3, 1),
                terms_and_conditions: None,
                items: vec![],
            },
        )
        .await
        .unwrap_err();

    match err {
        ApplicationError::Validation(fields) => {
            let mut names: Vec<_> = fields.fields().collect();
            names.sort();
            assert_eq!(names, vec!["customer_id", "items", "valid_until"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn updating_items_recomputes_the_total_server_side() {
    let fx = fixture(InMemoryQuotationRepo::seeded(vec![quotation(1, 7)]));

    let dto = fx
        .service
        .update_quotation(
            &back_office(),
            &meta(),
            1,
            UpdateQuotationCommand {
                items: vec![QuotationItemInput {
                    description: "Air freight".into(),
                    quantity: 4,
                    unit: Some("Kg".into()),
                    unit_price: dec(25.0),
                }],
            },
        )
        .await
        .unwrap();

    assert_eq!(dto.total_amount, dec(100.0));
    assert_eq!(dto.items.len(), 1);
    assert_eq!(dto.items[0].total, dec(100.0));
}

#[tokio::test]
async fn update_with_no_items_is_rejected() {
    let fx = fixture(InMemoryQuotationRepo::seeded(vec![quotation(1, 7)]));

    let err = fx
        .service
        .update_quotation(
            &back_office(),
            &meta(),
            1,
            UpdateQuotationCommand { items: vec![] },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Validation(_)));
}

#[tokio::test]
async fn status_labels_are_matched_exactly() {
    let fx = fixture(InMemoryQuotationRepo::seeded(vec![quotation(1, 7)]));

    let dto = fx
        .service
        .update_status(&back_office(), &meta(), 1, "Sent")
        .await
        .unwrap();
    assert_eq!(dto.status, QuotationStatus::Sent);

    let err = fx
        .service
        .update_status(&back_office(), &meta(), 1, "sent")
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Validation(_)));
}

#[tokio::test]
async fn sending_a_quotation_logs_a_send_action() {
    let fx = fixture(InMemoryQuotationRepo::seeded(vec![quotation(1, 7)]));

    fx.service
        .update_status(&back_office(), &meta(), 1, "Sent")
        .await
        .unwrap();

    let records = fx.audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].action, AuditAction::Send);
    assert_eq!(records[0].entity_type.as_deref(), Some("Quotation"));
}

#[tokio::test]
async fn only_the_owning_customer_may_respond() {
    let fx = fixture(InMemoryQuotationRepo::seeded(vec![quotation(1, 7)]));

    let err = fx
        .service
        .respond(&customer(8), &meta(), 1, "Approved", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));

    let dto = fx
        .service
        .respond(&customer(7), &meta(), 1, "Approved", Some("Looks good".into()))
        .await
        .unwrap();
    assert_eq!(dto.status, QuotationStatus::Approved);
    assert_eq!(dto.customer_note.as_deref(), Some("Looks good"));

    let records = fx.audit.records();
    assert_eq!(records.last().unwrap().action, AuditAction::Approve);
}

#[tokio::test]
async fn customers_cannot_respond_with_back_office_statuses() {
    let fx = fixture(InMemoryQuotationRepo::seeded(vec![quotation(1, 7)]));

    let err = fx
        .service
        .respond(&customer(7), &meta(), 1, "Sent", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));
}

#[tokio::test]
async fn delete_hides_the_quotation_from_further_commands() {
    let fx = fixture(InMemoryQuotationRepo::seeded(vec![quotation(1, 7)]));

    fx.service
        .delete_quotation(&admin(), &meta(), 1)
        .await
        .unwrap();

    let err = fx
        .service
        .update_status(&admin(), &meta(), 1, "Sent")
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));
}
