use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::internal::UserError;
use crate::errors::InternalError;
use crate::services::audit_logger::AuditTrail;
use crate::services::authorizer::Authorizer;
use crate::services::notify::MailSender;
use crate::services::session_service::SessionService;
use crate::services::side_effects::SideEffectCounters;
use crate::stores::{NewUser, UserStore};
use crate::types::db::user;
use crate::types::internal::{AuditAction, AuditEntity, AuditRecord, Role};
use serde_json::json;

/// Account lifecycle: self-registration, login checks, profile edits and the
/// administrative approve/suspend/role paths.
pub struct UserService {
    users: Arc<UserStore>,
    sessions: Arc<SessionService>,
    audit: Arc<AuditTrail>,
    mail: Arc<dyn MailSender>,
    counters: Arc<SideEffectCounters>,
}

impl UserService {
    pub fn new(
        users: Arc<UserStore>,
        sessions: Arc<SessionService>,
        audit: Arc<AuditTrail>,
        mail: Arc<dyn MailSender>,
        counters: Arc<SideEffectCounters>,
    ) -> Self {
        Self {
            users,
            sessions,
            audit,
            mail,
            counters,
        }
    }

    /// Self-registration. New accounts land unapproved in the lowest tier and
    /// stay locked out of login until an administrator approves them.
    pub async fn register(
        &self,
        email: String,
        password: String,
        name: String,
        phone: Option<String>,
    ) -> Result<user::Model, InternalError> {
        let created = self
            .users
            .create(NewUser {
                email,
                password,
                name,
                phone,
                role: Role::User,
            })
            .await?;

        info!(user_id = %created.id, "User registered, awaiting approval");

        self.audit
            .record_and_notify(
                AuditRecord::new(AuditAction::UserRegistered, AuditEntity::User, &created.id)
                    .actor(&created.id)
                    .field("email", &created.email),
                &format!("New registration awaiting approval: {}", created.email),
            )
            .await;

        Ok(created)
    }

    /// Credential check plus account-state gates. Suspension outranks the
    /// approval check; failures land in the audit trail before returning.
    pub async fn login(&self, email: &str, password: &str) -> Result<user::Model, InternalError> {
        let user = match self.users.verify_credentials(email, password).await {
            Ok(user) => user,
            Err(e) => {
                self.audit
                    .record(
                        AuditRecord::new(AuditAction::LoginFailure, AuditEntity::User, email)
                            .field("email", email),
                    )
                    .await;
                return Err(e);
            }
        };

        if user.is_suspended() {
            self.audit
                .record(
                    AuditRecord::new(AuditAction::LoginFailure, AuditEntity::User, &user.id)
                        .actor(&user.id)
                        .field("reason", "suspended"),
                )
                .await;
            return Err(UserError::Suspended {
                user_id: user.id.clone(),
            }
            .into());
        }

        if !user.is_approved() {
            return Err(UserError::NotApproved {
                user_id: user.id.clone(),
            }
            .into());
        }

        Ok(user)
    }

    pub async fn get(&self, user_id: &str) -> Result<user::Model, InternalError> {
        self.users.get(user_id).await
    }

    pub async fn list(&self) -> Result<Vec<user::Model>, InternalError> {
        self.users.list().await
    }

    pub async fn update_profile(
        &self,
        actor: &user::Model,
        name: Option<String>,
        phone: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<user::Model, InternalError> {
        let before = json!({
            "name": actor.name,
            "phone": actor.phone,
            "avatar_url": actor.avatar_url,
        });

        let updated = self
            .users
            .update_profile(&actor.id, name, phone, avatar_url)
            .await?;

        self.audit
            .record(
                AuditRecord::new(AuditAction::UserUpdated, AuditEntity::User, &updated.id)
                    .actor(&actor.id)
                    .before(before)
                    .after(json!({
                        "name": updated.name,
                        "phone": updated.phone,
                        "avatar_url": updated.avatar_url,
                    })),
            )
            .await;

        Ok(updated)
    }

    /// Password change requires re-proving the current password.
    pub async fn change_password(
        &self,
        actor: &user::Model,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), InternalError> {
        self.users
            .verify_credentials(&actor.email, current_password)
            .await?;
        self.users.change_password(&actor.id, new_password).await?;

        self.audit
            .record(
                AuditRecord::new(AuditAction::PasswordChanged, AuditEntity::User, &actor.id)
                    .actor(&actor.id),
            )
            .await;

        Ok(())
    }

    /// Approve a pending account and send the welcome mail (best-effort).
    pub async fn approve(
        &self,
        actor: &user::Model,
        user_id: &str,
    ) -> Result<user::Model, InternalError> {
        Authorizer::ensure_not_self(&actor.id, user_id)?;
        let target = self.users.get(user_id).await?;
        Authorizer::ensure_outranks(actor, &target)?;

        let approved = self.users.approve(user_id).await?;

        self.audit
            .record(
                AuditRecord::new(AuditAction::UserApproved, AuditEntity::User, user_id)
                    .actor(&actor.id),
            )
            .await;

        if let Err(e) = self
            .mail
            .send(
                &approved.email,
                "Your account has been approved",
                &format!(
                    "Hi {}, your account has been approved. You can now sign in.",
                    approved.name
                ),
            )
            .await
        {
            self.counters.record_mail_failure();
            warn!(user_id = %user_id, error = %e, "Approval mail failed");
        }

        Ok(approved)
    }

    /// Suspend an account and force-logout every session it holds.
    pub async fn suspend(
        &self,
        actor: &user::Model,
        user_id: &str,
    ) -> Result<user::Model, InternalError> {
        Authorizer::ensure_not_self(&actor.id, user_id)?;
        let target = self.users.get(user_id).await?;
        Authorizer::ensure_outranks(actor, &target)?;

        let suspended = self.users.suspend(user_id).await?;
        let revoked = self.sessions.revoke_all_for_user(&actor.id, user_id).await?;

        info!(actor_id = %actor.id, user_id = %user_id, revoked_sessions = revoked, "User suspended");

        self.audit
            .record(
                AuditRecord::new(AuditAction::UserSuspended, AuditEntity::User, user_id)
                    .actor(&actor.id)
                    .field("revoked_sessions", revoked),
            )
            .await;

        Ok(suspended)
    }

    pub async fn unsuspend(
        &self,
        actor: &user::Model,
        user_id: &str,
    ) -> Result<user::Model, InternalError> {
        Authorizer::ensure_not_self(&actor.id, user_id)?;
        let target = self.users.get(user_id).await?;
        Authorizer::ensure_outranks(actor, &target)?;

        let restored = self.users.unsuspend(user_id).await?;

        self.audit
            .record(
                AuditRecord::new(AuditAction::UserUnsuspended, AuditEntity::User, user_id)
                    .actor(&actor.id),
            )
            .await;

        Ok(restored)
    }

    /// Change a user's role tier. The actor must outrank both the target's
    /// current role and the new role, so nobody can mint a peer.
    pub async fn set_role(
        &self,
        actor: &user::Model,
        user_id: &str,
        role: Role,
    ) -> Result<user::Model, InternalError> {
        Authorizer::ensure_not_self(&actor.id, user_id)?;
        let target = self.users.get(user_id).await?;
        Authorizer::ensure_outranks(actor, &target)?;

        if !actor.role.outranks(role) {
            return Err(InternalError::Access(
                crate::errors::internal::AccessError::InsufficientRank {
                    actor_role: actor.role.as_str().to_owned(),
                    target_role: role.as_str().to_owned(),
                },
            ));
        }

        let previous_role = target.role;
        let updated = self.users.set_role(user_id, role).await?;

        self.audit
            .record(
                AuditRecord::new(AuditAction::UserRoleChanged, AuditEntity::User, user_id)
                    .actor(&actor.id)
                    .field("from", previous_role.as_str())
                    .field("to", role.as_str()),
            )
            .await;

        Ok(updated)
    }
}
