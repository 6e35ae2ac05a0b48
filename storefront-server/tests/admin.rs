//! Admin accounts and the startup seed

mod common;

use common::storefront;
use shared::models::{AdminCreate, AdminRole};
use storefront_server::ErrorCode;

#[tokio::test]
async fn test_default_admin_is_seeded_once() {
    let (_tmp, state) = storefront().await;

    let seeded = state.admins.ensure_default_admin(&state.config).await.unwrap();
    assert_eq!(seeded.email, "admin@example.com");
    assert_eq!(seeded.role, AdminRole::Superadmin);

    let again = state.admins.ensure_default_admin(&state.config).await.unwrap();
    assert_eq!(again.id, seeded.id);

    let user = state
        .admins
        .authenticate("ADMIN@example.com", "admin123")
        .await
        .unwrap();
    assert_eq!(user.id, seeded.id);
}

#[tokio::test]
async fn test_existing_viewer_is_promoted() {
    let (_tmp, state) = storefront().await;

    let viewer = state
        .admins
        .create_admin(AdminCreate {
            email: "admin@example.com".into(),
            password: "viewer-pass".into(),
            role: AdminRole::Viewer,
        })
        .await
        .unwrap();
    assert!(!viewer.role.can_write());

    let promoted = state.admins.ensure_default_admin(&state.config).await.unwrap();
    assert_eq!(promoted.id, viewer.id);
    assert_eq!(promoted.role, AdminRole::Superadmin);

    let stored = state
        .admins
        .find_by_email("admin@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.role.can_write());
}

#[tokio::test]
async fn test_create_and_authenticate_admin() {
    let (_tmp, state) = storefront().await;

    let created = state
        .admins
        .create_admin(AdminCreate {
            email: "Ops@Example.com".into(),
            password: "correct horse".into(),
            role: AdminRole::Viewer,
        })
        .await
        .unwrap();
    assert_eq!(created.email, "ops@example.com");

    let user = state
        .admins
        .authenticate("ops@example.com", "correct horse")
        .await
        .unwrap();
    assert_eq!(user.role, AdminRole::Viewer);

    let err = state
        .admins
        .authenticate("ops@example.com", "wrong password")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidCredentials);

    let err = state
        .admins
        .authenticate("nobody@example.com", "correct horse")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidCredentials);

    let err = state
        .admins
        .create_admin(AdminCreate {
            email: "ops@example.com".into(),
            password: "another pass".into(),
            role: AdminRole::Superadmin,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AdminEmailExists);

    let err = state
        .admins
        .create_admin(AdminCreate {
            email: "short@example.com".into(),
            password: "short".into(),
            role: AdminRole::Viewer,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
}
