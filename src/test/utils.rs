use chrono::Utc;
use migration::{AuditMigrator, IdentityMigrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use uuid::Uuid;

use crate::types::db::user;
use crate::types::internal::{DeviceInfo, DeviceType, Role};

/// Fresh in-memory identity database with migrations applied
pub async fn setup_identity_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    IdentityMigrator::up(&db, None)
        .await
        .expect("Failed to run identity migrations");
    db
}

/// Fresh in-memory audit database with migrations applied
pub async fn setup_audit_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    AuditMigrator::up(&db, None)
        .await
        .expect("Failed to run audit migrations");
    db
}

async fn insert_user(db: &DatabaseConnection, email: &str, role: Role) -> user::Model {
    let now = Utc::now().timestamp();
    user::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        email: Set(email.to_owned()),
        // Not a real hash; tests that verify credentials create users
        // through the store instead
        password_hash: Set("$argon2id$test".to_string()),
        role: Set(role),
        name: Set("Test User".to_string()),
        phone: Set(None),
        avatar_url: Set(None),
        verified_at: Set(Some(now)),
        approved_at: Set(Some(now)),
        suspended_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert test user")
}

/// Approved low-tier user row
pub async fn test_user(db: &DatabaseConnection, email: &str) -> user::Model {
    insert_user(db, email, Role::User).await
}

/// Approved system-user row, eligible for access grants
pub async fn test_system_user(db: &DatabaseConnection, email: &str) -> user::Model {
    insert_user(db, email, Role::SystemUser).await
}

/// Approved admin-tier row
pub async fn test_admin(db: &DatabaseConnection, email: &str) -> user::Model {
    insert_user(db, email, Role::SystemAdmin).await
}

pub fn desktop_device() -> DeviceInfo {
    DeviceInfo {
        fingerprint: "test-fingerprint".to_string(),
        device_type: DeviceType::Desktop,
        brand: Some("Windows".to_string()),
        model: None,
        ip_address: "203.0.113.7".to_string(),
        user_agent: Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string()),
        location: None,
    }
}
