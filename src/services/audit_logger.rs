use std::sync::Arc;
use tracing::{error, warn};

use crate::errors::InternalError;
use crate::services::notify::ChatNotifier;
use crate::services::side_effects::SideEffectCounters;
use crate::stores::AuditStore;
use crate::types::db::audit_log;
use crate::types::internal::AuditRecord;

/// Best-effort audit pipeline.
///
/// Every security-relevant mutation records here AFTER the primary write
/// succeeds. A failed audit write or notification never fails the request:
/// it is logged, counted and swallowed.
pub struct AuditTrail {
    store: AuditStore,
    notifier: Arc<dyn ChatNotifier>,
    counters: Arc<SideEffectCounters>,
}

impl AuditTrail {
    pub fn new(
        store: AuditStore,
        notifier: Arc<dyn ChatNotifier>,
        counters: Arc<SideEffectCounters>,
    ) -> Self {
        Self {
            store,
            notifier,
            counters,
        }
    }

    /// Append an audit row, swallowing failures.
    pub async fn record(&self, record: AuditRecord) {
        let action = record.action.as_str().to_owned();
        if let Err(e) = self.store.append(record).await {
            self.counters.record_audit_failure();
            error!(action = %action, error = %e, "Audit write failed, continuing");
        }
    }

    /// Append an audit row and fan out an operator notification.
    /// Both legs are independent best-effort.
    pub async fn record_and_notify(&self, record: AuditRecord, message: &str) {
        self.record(record).await;
        if let Err(e) = self.notifier.send(message).await {
            self.counters.record_notify_failure();
            warn!(error = %e, "Operator notification failed");
        }
    }

    /// Full trail, newest first.
    pub async fn list(&self) -> Result<Vec<audit_log::Model>, InternalError> {
        self.store.list().await
    }
}
