use crate::db::Store;
use crate::models::{LogFilter, LogPage, NewActivity, Pagination};
use tracing::warn;

/// Audit trail writer and reader.
///
/// Writes are best-effort: a failure is logged and swallowed so the action
/// being audited never fails because of it.
#[derive(Clone)]
pub struct ActivityLogger {
    store: Store,
}

impl ActivityLogger {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn record(&self, activity: NewActivity) {
        let action = activity.action.clone();
        let user_id = activity.user_id;

        if let Err(e) = self.store.add_activity(activity).await {
            warn!(error = %e, action = %action, user_id = ?user_id, "Failed to record activity");
        }
    }

    pub async fn list(&self, filter: &LogFilter, page: u64, limit: u64) -> anyhow::Result<LogPage> {
        let (logs, total) = self.store.get_activity_page(filter, page, limit).await?;

        Ok(LogPage {
            logs,
            pagination: Pagination::new(page, limit, total),
        })
    }

    pub async fn actions(&self) -> anyhow::Result<Vec<String>> {
        self.store.distinct_activity_actions().await
    }
}
