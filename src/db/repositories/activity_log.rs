use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};

use crate::entities::{activity_logs, prelude::*};
use crate::models::{ActivityLogEntry, LogFilter, NewActivity, Pagination, timestamp_now};

pub struct ActivityLogRepository {
    conn: DatabaseConnection,
}

impl ActivityLogRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, activity: NewActivity) -> Result<()> {
        let active_model = activity_logs::ActiveModel {
            user_id: Set(activity.user_id),
            action: Set(activity.action),
            entity_type: Set(activity.entity_type),
            entity_id: Set(activity.entity_id),
            details: Set(activity.details),
            ip_address: Set(activity.ip_address),
            created_at: Set(timestamp_now()),
            ..Default::default()
        };

        ActivityLogs::insert(active_model)
            .exec(&self.conn)
            .await
            .context("Failed to insert activity log")?;
        Ok(())
    }

    fn filtered(filter: &LogFilter) -> Select<ActivityLogs> {
        let mut query = ActivityLogs::find();

        if let Some(user_id) = filter.user_id {
            query = query.filter(activity_logs::Column::UserId.eq(user_id));
        }

        if let Some(action) = &filter.action {
            query = query.filter(activity_logs::Column::Action.eq(action.as_str()));
        }

        query
    }

    /// One page of entries, newest first, plus the total matching the filter.
    pub async fn get_page(
        &self,
        filter: &LogFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<ActivityLogEntry>, u64)> {
        let offset = Pagination::offset(page, limit).context("Page offset out of range")?;

        let total = Self::filtered(filter)
            .count(&self.conn)
            .await
            .context("Failed to count activity logs")?;

        // id breaks ties between entries written in the same microsecond
        let rows = Self::filtered(filter)
            .find_also_related(Users)
            .order_by_desc(activity_logs::Column::CreatedAt)
            .order_by_desc(activity_logs::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query activity logs")?;

        Ok((rows.into_iter().map(ActivityLogEntry::from).collect(), total))
    }

    pub async fn distinct_actions(&self) -> Result<Vec<String>> {
        ActivityLogs::find()
            .select_only()
            .column(activity_logs::Column::Action)
            .distinct()
            .order_by_asc(activity_logs::Column::Action)
            .into_tuple::<String>()
            .all(&self.conn)
            .await
            .context("Failed to query distinct actions")
    }
}
