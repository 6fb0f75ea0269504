// Authorization and access-administration properties through the service
// layer: grant evaluation, guard ordering and the audit side of mutations.

mod common;

use common::{desktop_context, harness};
use labeldesk_backend::errors::internal::AccessError;
use labeldesk_backend::errors::{AuthError, InternalError};
use labeldesk_backend::services::Authorizer;
use labeldesk_backend::types::internal::{
    PermissionGrants, PermissionLevel, ResourceCategory, Role,
};

fn tracks_editor() -> PermissionGrants {
    PermissionGrants::from_pairs([(
        ResourceCategory::Tracks,
        vec![PermissionLevel::View, PermissionLevel::Update],
    )])
}

#[tokio::test(flavor = "multi_thread")]
async fn test_granted_system_user_is_authorized_exactly() {
    let h = harness().await;
    let admin = h.approved_user("admin@example.com", "hunter2hunter2", Role::SystemAdmin).await;
    let staff = h.approved_user("staff@example.com", "hunter2hunter2", Role::SystemUser).await;

    h.access_service
        .create(&admin, &staff.id, &tracks_editor(), None)
        .await
        .unwrap();

    let access = h.access_service.find_for_user(&staff.id).await.unwrap();
    assert!(Authorizer::is_authorized(
        &staff,
        access.as_ref(),
        ResourceCategory::Tracks,
        PermissionLevel::Update,
    ));
    // Levels the grant does not name stay denied
    assert!(!Authorizer::is_authorized(
        &staff,
        access.as_ref(),
        ResourceCategory::Tracks,
        PermissionLevel::Delete,
    ));
    assert!(!Authorizer::is_authorized(
        &staff,
        access.as_ref(),
        ResourceCategory::Releases,
        PermissionLevel::View,
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_suspended_and_deleted_access_all_deny() {
    let h = harness().await;
    let admin = h.approved_user("a2@example.com", "hunter2hunter2", Role::SystemAdmin).await;
    let staff = h.approved_user("s2@example.com", "hunter2hunter2", Role::SystemUser).await;

    // No record yet
    let access = h.access_service.find_for_user(&staff.id).await.unwrap();
    assert!(access.is_none());
    assert!(!Authorizer::is_authorized(
        &staff,
        None,
        ResourceCategory::Tracks,
        PermissionLevel::View,
    ));

    let created = h
        .access_service
        .create(&admin, &staff.id, &tracks_editor(), None)
        .await
        .unwrap();

    // Suspended record denies without losing the row
    h.access_service.suspend(&admin, &created.id).await.unwrap();
    let access = h.access_service.find_for_user(&staff.id).await.unwrap();
    assert!(!Authorizer::is_authorized(
        &staff,
        access.as_ref(),
        ResourceCategory::Tracks,
        PermissionLevel::View,
    ));

    // Unsuspend restores the original grants
    h.access_service.unsuspend(&admin, &created.id).await.unwrap();
    let access = h.access_service.find_for_user(&staff.id).await.unwrap();
    assert!(Authorizer::is_authorized(
        &staff,
        access.as_ref(),
        ResourceCategory::Tracks,
        PermissionLevel::View,
    ));

    // Deletion strips everything at once and leaves an audit row
    h.access_service.delete(&admin, &created.id).await.unwrap();
    assert!(h.access_service.find_for_user(&staff.id).await.unwrap().is_none());

    let logs = h.audit.list().await.unwrap();
    let deleted = logs.iter().find(|l| l.action == "access_deleted").unwrap();
    assert_eq!(deleted.user_id.as_deref(), Some(admin.id.as_str()));
    assert!(deleted.metadata.contains("before"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_guards_block_self_rank_and_ineligible_targets() {
    let h = harness().await;
    let admin = h.approved_user("a3@example.com", "hunter2hunter2", Role::SystemAdmin).await;
    let peer = h.approved_user("peer@example.com", "hunter2hunter2", Role::SystemAdmin).await;
    let plain = h.approved_user("plain@example.com", "hunter2hunter2", Role::User).await;

    // Self-target
    let result = h
        .access_service
        .create(&admin, &admin.id, &tracks_editor(), None)
        .await;
    assert!(matches!(
        result,
        Err(InternalError::Access(AccessError::SelfTargetForbidden))
    ));

    // Equal rank does not outrank
    let result = h
        .access_service
        .create(&admin, &peer.id, &tracks_editor(), None)
        .await;
    assert!(matches!(
        result,
        Err(InternalError::Access(AccessError::InsufficientRank { .. }))
    ));

    // Grants only attach to system users
    let result = h
        .access_service
        .create(&admin, &plain.id, &tracks_editor(), None)
        .await;
    assert!(matches!(
        result,
        Err(InternalError::Access(AccessError::TargetNotEligible { .. }))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_duplicate_access_row_is_rejected() {
    let h = harness().await;
    let admin = h.approved_user("a4@example.com", "hunter2hunter2", Role::SystemAdmin).await;
    let staff = h.approved_user("s4@example.com", "hunter2hunter2", Role::SystemUser).await;

    h.access_service
        .create(&admin, &staff.id, &tracks_editor(), None)
        .await
        .unwrap();
    let second = h
        .access_service
        .create(&admin, &staff.id, &PermissionGrants::empty(), None)
        .await;
    assert!(matches!(
        second,
        Err(InternalError::Access(AccessError::AlreadyExists { .. }))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_suspending_target_user_blocks_access_edits() {
    let h = harness().await;
    let owner = h.approved_user("owner@example.com", "hunter2hunter2", Role::SystemOwner).await;
    let staff = h.approved_user("s5@example.com", "hunter2hunter2", Role::SystemUser).await;

    let created = h
        .access_service
        .create(&owner, &staff.id, &tracks_editor(), None)
        .await
        .unwrap();

    h.user_service.suspend(&owner, &staff.id).await.unwrap();

    let result = h
        .access_service
        .update_grants(&owner, &created.id, &PermissionGrants::empty(), None)
        .await;
    assert!(matches!(
        result,
        Err(InternalError::Access(AccessError::TargetSuspended { .. }))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_self_suspend_is_rejected_and_leaves_account_untouched() {
    let h = harness().await;
    let admin = h.approved_user("a8@example.com", "hunter2hunter2", Role::SystemAdmin).await;

    let result = h.user_service.suspend(&admin, &admin.id).await;
    assert!(matches!(
        result,
        Err(InternalError::Access(AccessError::SelfTargetForbidden))
    ));

    let reloaded = h.user_service.get(&admin.id).await.unwrap();
    assert!(reloaded.suspended_at.is_none());

    // The account still works, nothing was revoked along the way
    let device = h.sessions.resolve_device(&desktop_context()).await;
    let (_, token) = h.sessions.open(&admin, &device).await.unwrap();
    assert!(h.sessions.authenticate(&token).await.is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_user_suspension_force_logs_out_all_sessions() {
    let h = harness().await;
    let admin = h.approved_user("a6@example.com", "hunter2hunter2", Role::SystemAdmin).await;
    let victim = h.approved_user("v6@example.com", "hunter2hunter2", Role::User).await;

    let device = h.sessions.resolve_device(&desktop_context()).await;
    let (_, token_a) = h.sessions.open(&victim, &device).await.unwrap();
    let (_, token_b) = h.sessions.open(&victim, &device).await.unwrap();

    h.user_service.suspend(&admin, &victim.id).await.unwrap();

    for token in [token_a, token_b] {
        let result = h.sessions.authenticate(&token).await;
        assert!(matches!(result, Err(AuthError::SessionRevoked(_))));
    }

    let logs = h.audit.list().await.unwrap();
    assert!(logs.iter().any(|l| l.action == "user_suspended"));
    assert!(logs.iter().any(|l| l.action == "sessions_bulk_revoked"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_role_change_guards_and_audit() {
    let h = harness().await;
    let owner = h.approved_user("o7@example.com", "hunter2hunter2", Role::SystemOwner).await;
    let admin = h.approved_user("a7@example.com", "hunter2hunter2", Role::SystemAdmin).await;
    let user = h.approved_user("u7@example.com", "hunter2hunter2", Role::User).await;

    // An admin cannot mint a peer admin
    let result = h
        .user_service
        .set_role(&admin, &user.id, Role::SystemAdmin)
        .await;
    assert!(matches!(
        result,
        Err(InternalError::Access(AccessError::InsufficientRank { .. }))
    ));

    // But can promote to system user
    let promoted = h
        .user_service
        .set_role(&admin, &user.id, Role::SystemUser)
        .await
        .unwrap();
    assert_eq!(promoted.role, Role::SystemUser);

    // The owner can mint admins
    let promoted = h
        .user_service
        .set_role(&owner, &user.id, Role::SystemAdmin)
        .await
        .unwrap();
    assert_eq!(promoted.role, Role::SystemAdmin);

    let logs = h.audit.list().await.unwrap();
    let changes: Vec<_> = logs.iter().filter(|l| l.action == "user_role_changed").collect();
    assert_eq!(changes.len(), 2);
}
