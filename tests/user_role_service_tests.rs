// tests/user_role_service_tests.rs
use cargodesk::application::audit::AuditRecorder;
use cargodesk::application::commands::roles::RoleCommandService;
use cargodesk::application::commands::users::{
    CreateUserCommand, UpdateUserCommand, UserCommandService,
};
use cargodesk::application::error::ApplicationError;
use cargodesk::application::queries::users::{UserListParams, UserQueryService};
use cargodesk::domain::role::RoleName;
use cargodesk::domain::user::{UserRepository, UserStatus};
use std::sync::Arc;

mod support;
use support::*;

fn user_service(users: Arc<InMemoryUserRepo>) -> UserCommandService {
    let audit = Arc::new(RecordingAuditRepo::new());
    UserCommandService::new(
        users,
        Arc::new(InMemoryRoleRepo::seeded()),
        Arc::new(DummyPasswordHasher),
        Arc::new(AuditRecorder::new(audit)),
        Arc::new(FixedClock(fixed_now())),
    )
}

fn create_command() -> CreateUserCommand {
    CreateUserCommand {
        name: "Priya Shah".into(),
        email: "priya@cargodesk.test".into(),
        password: "secret123".into(),
        role: "customer".into(),
        status: None,
        company_name: Some("Shah Imports".into()),
    }
}

#[tokio::test]
async fn create_user_hashes_the_password_and_defaults_to_active() {
    let users = Arc::new(InMemoryUserRepo::new());
    let service = user_service(users.clone());

    let dto = service
        .create_user(&admin(), &meta(), create_command())
        .await
        .unwrap();

    assert_eq!(dto.name, "Priya Shah");
    assert_eq!(dto.role, "Customer");
    assert_eq!(dto.status, UserStatus::Active);
    assert_eq!(dto.company_name.as_deref(), Some("Shah Imports"));

    let stored = users
        .find_by_email(&cargodesk::domain::user::Email::new("priya@cargodesk.test").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.password_hash.as_str(), "hashed:secret123");
}

#[tokio::test]
async fn short_passwords_are_rejected() {
    let service = user_service(Arc::new(InMemoryUserRepo::new()));

    let err = service
        .create_user(
            &admin(),
            &meta(),
            CreateUserCommand {
                password: "short".into(),
                ..create_command()
            },
        )
        .await
        .unwrap_err();

    match err {
        ApplicationError::Validation(fields) => {
            assert_eq!(fields.fields().collect::<Vec<_>>(), vec!["password"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_emails_are_refused_with_the_standard_message() {
    let users = Arc::new(InMemoryUserRepo::new());
    let service = user_service(users.clone());

    service
        .create_user(&admin(), &meta(), create_command())
        .await
        .unwrap();
    let err = service
        .create_user(&admin(), &meta(), create_command())
        .await
        .unwrap_err();

    match err {
        ApplicationError::Validation(fields) => {
            assert!(fields.to_string().contains("The email has already been taken."));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn roles_resolve_by_id_or_any_spelling() {
    let users = Arc::new(InMemoryUserRepo::new());
    let service = user_service(users.clone());

    let by_name = service
        .create_user(
            &admin(),
            &meta(),
            CreateUserCommand {
                email: "one@cargodesk.test".into(),
                role: "back_office".into(),
                ..create_command()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_name.role, "Back Office");

    let by_id = service
        .create_user(
            &admin(),
            &meta(),
            CreateUserCommand {
                email: "two@cargodesk.test".into(),
                role: "4".into(),
                ..create_command()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_id.role, "CHA");
}

#[tokio::test]
async fn user_management_is_admin_only() {
    let service = user_service(Arc::new(InMemoryUserRepo::new()));

    let err = service
        .create_user(&back_office(), &meta(), create_command())
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));
}

#[tokio::test]
async fn update_can_detach_the_company() {
    let users = Arc::new(InMemoryUserRepo::seeded(vec![user(3, RoleName::Customer)]));
    let service = user_service(users.clone());

    let dto = service
        .update_user(
            &admin(),
            &meta(),
            3,
            UpdateUserCommand {
                company_name: Some(None),
                status: Some("inactive".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(dto.company_name, None);
    assert_eq!(dto.status, UserStatus::Inactive);
}

#[tokio::test]
async fn role_change_endpoint_swaps_the_role() {
    let users = Arc::new(InMemoryUserRepo::seeded(vec![user(3, RoleName::Customer)]));
    let service = user_service(users.clone());

    let dto = service
        .update_role(&admin(), &meta(), 3, "Back Office")
        .await
        .unwrap();
    assert_eq!(dto.role, "Back Office");

    let err = service
        .update_role(&admin(), &meta(), 3, "warehouse")
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Validation(_)));
}

#[tokio::test]
async fn deleted_users_release_their_email() {
    let users = Arc::new(InMemoryUserRepo::new());
    let service = user_service(users.clone());

    let first = service
        .create_user(&admin(), &meta(), create_command())
        .await
        .unwrap();
    service.delete_user(&admin(), &meta(), first.id).await.unwrap();

    let second = service
        .create_user(&admin(), &meta(), create_command())
        .await
        .unwrap();
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn user_stats_report_every_role_even_at_zero() {
    let users = Arc::new(InMemoryUserRepo::seeded(vec![
        user(1, RoleName::Admin),
        user(2, RoleName::Customer),
        user(3, RoleName::Customer),
    ]));
    let queries = UserQueryService::new(users);

    let listing = queries
        .list(
            &admin(),
            UserListParams {
                include_stats: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stats = listing.stats.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_role["customer"], 2);
    assert_eq!(stats.by_role["admin"], 1);
    assert_eq!(stats.by_role["back_office"], 0);
    assert_eq!(stats.by_role["cha"], 0);
    assert_eq!(stats.by_role["supplier"], 0);
}

#[tokio::test]
async fn role_deletion_is_blocked_while_users_hold_it() {
    let roles = Arc::new(InMemoryRoleRepo::seeded().with_user_count(RoleName::Cha, 2));
    let service = RoleCommandService::new(roles);

    let err = service
        .delete_role(&admin(), default_role_id(RoleName::Cha))
        .await
        .unwrap_err();
    match err {
        ApplicationError::Conflict(message) => {
            assert_eq!(
                message,
                "Cannot delete role 'CHA' because 2 user(s) are assigned to it"
            );
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    service
        .delete_role(&admin(), default_role_id(RoleName::Supplier))
        .await
        .unwrap();
}

#[tokio::test]
async fn role_names_collide_across_spellings() {
    let service = RoleCommandService::new(Arc::new(InMemoryRoleRepo::seeded()));

    let err = service
        .create_role(&admin(), "back-office")
        .await
        .unwrap_err();
    match err {
        ApplicationError::Validation(fields) => {
            assert!(fields.to_string().contains("The name has already been taken."));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_role_names_are_invalid() {
    let service = RoleCommandService::new(Arc::new(InMemoryRoleRepo::seeded()));
    let err = service.create_role(&admin(), "warehouse").await.unwrap_err();
    assert!(matches!(err, ApplicationError::Validation(_)));
}
