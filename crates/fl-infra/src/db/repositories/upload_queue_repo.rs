use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use tracing::debug_span;

use fl_core::ids::UploadId;
use fl_core::ports::{ClockPort, QueueCounts, QueueError, UploadPatch, UploadQueuePort};
use fl_core::upload::{UploadItem, UploadStatus};

use crate::db::models::{NewUploadRow, UploadRow};
use crate::db::ports::{DbExecutor, InsertMapper, RowMapper};
use crate::db::schema::t_upload_queue;

/// SQLite-backed upload queue.
///
/// Durability contract: every write goes through a committed SQLite
/// statement before the call returns, so a process restart never loses a
/// record. FIFO order is carried by the `seq` column, not the wall
/// clock.
pub struct DieselUploadQueueRepository<E> {
    executor: E,
    mapper: crate::db::mappers::UploadRowMapper,
    clock: Arc<dyn ClockPort>,
}

impl<E> DieselUploadQueueRepository<E> {
    pub fn new(executor: E, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            executor,
            mapper: crate::db::mappers::UploadRowMapper,
            clock,
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = t_upload_queue)]
struct UploadChangeset {
    status: Option<String>,
    attempts: Option<i32>,
    last_error: Option<Option<String>>,
    updated_at_ms: i64,
}

/// Map a database failure to the queue error taxonomy. Disk-full,
/// read-only and cannot-open failures count as the store being
/// unavailable; everything else is a generic storage error.
fn map_storage_error(err: anyhow::Error) -> QueueError {
    if let Some(diesel::result::Error::DatabaseError(_, info)) =
        err.downcast_ref::<diesel::result::Error>()
    {
        let message = info.message();
        if message.contains("disk")
            || message.contains("readonly")
            || message.contains("unable to open")
            || message.contains("database is locked")
        {
            return QueueError::StorageUnavailable(message.to_string());
        }
    }
    QueueError::Storage(err.to_string())
}

impl<E: DbExecutor> DieselUploadQueueRepository<E> {
    fn list_by_status(&self, status: UploadStatus) -> Result<Vec<UploadItem>, QueueError> {
        let rows = self
            .executor
            .run(|conn| {
                let rows = t_upload_queue::table
                    .filter(t_upload_queue::status.eq(status.as_str()))
                    .order(t_upload_queue::seq.asc())
                    .load::<UploadRow>(conn)?;
                Ok(rows)
            })
            .map_err(map_storage_error)?;

        rows.iter()
            .map(|row| self.mapper.to_domain(row))
            .collect::<Result<Vec<_>>>()
            .map_err(|err| QueueError::Storage(err.to_string()))
    }
}

#[async_trait]
impl<E: DbExecutor> UploadQueuePort for DieselUploadQueueRepository<E> {
    async fn enqueue(&self, item: UploadItem) -> Result<(), QueueError> {
        let span = debug_span!(
            "infra.sqlite.enqueue_upload",
            table = "t_upload_queue",
            upload_id = %item.id,
            size_bytes = item.size_bytes,
        );
        let _enter = span.enter();

        let new_row: NewUploadRow = self
            .mapper
            .to_row(&item)
            .map_err(|err| QueueError::Storage(err.to_string()))?;

        self.executor
            .run(|conn| {
                diesel::insert_into(t_upload_queue::table)
                    .values(&new_row)
                    .execute(conn)?;
                Ok(())
            })
            .map_err(|err| {
                match err.downcast_ref::<diesel::result::Error>() {
                    Some(diesel::result::Error::DatabaseError(
                        DatabaseErrorKind::UniqueViolation,
                        _,
                    )) => QueueError::DuplicateId(item.id.clone()),
                    _ => map_storage_error(err),
                }
            })
    }

    async fn get(&self, id: &UploadId) -> Result<Option<UploadItem>, QueueError> {
        let span = debug_span!(
            "infra.sqlite.get_upload",
            table = "t_upload_queue",
            upload_id = %id,
        );
        let _enter = span.enter();

        let id_str = id.to_string();
        let row = self
            .executor
            .run(|conn| {
                let row = t_upload_queue::table
                    .filter(t_upload_queue::id.eq(&id_str))
                    .first::<UploadRow>(conn)
                    .optional()?;
                Ok(row)
            })
            .map_err(map_storage_error)?;

        match row {
            Some(row) => self
                .mapper
                .to_domain(&row)
                .map(Some)
                .map_err(|err| QueueError::Storage(err.to_string())),
            None => Ok(None),
        }
    }

    async fn list_pending(&self) -> Result<Vec<UploadItem>, QueueError> {
        let span = debug_span!("infra.sqlite.list_pending_uploads", table = "t_upload_queue");
        let _enter = span.enter();

        self.list_by_status(UploadStatus::Pending)
    }

    async fn list_failed(&self) -> Result<Vec<UploadItem>, QueueError> {
        let span = debug_span!("infra.sqlite.list_failed_uploads", table = "t_upload_queue");
        let _enter = span.enter();

        self.list_by_status(UploadStatus::Failed)
    }

    async fn delete(&self, id: &UploadId) -> Result<(), QueueError> {
        let span = debug_span!(
            "infra.sqlite.delete_upload",
            table = "t_upload_queue",
            upload_id = %id,
        );
        let _enter = span.enter();

        let id_str = id.to_string();
        self.executor
            .run(|conn| {
                // Idempotent: zero affected rows is not an error
                diesel::delete(t_upload_queue::table)
                    .filter(t_upload_queue::id.eq(&id_str))
                    .execute(conn)?;
                Ok(())
            })
            .map_err(map_storage_error)
    }

    async fn update(&self, id: &UploadId, patch: UploadPatch) -> Result<(), QueueError> {
        let span = debug_span!(
            "infra.sqlite.update_upload",
            table = "t_upload_queue",
            upload_id = %id,
            status = patch.status.map(|s| s.as_str()),
        );
        let _enter = span.enter();

        let id_str = id.to_string();
        let changeset = UploadChangeset {
            status: patch.status.map(|status| status.as_str().to_string()),
            attempts: patch.attempts,
            last_error: patch.last_error,
            updated_at_ms: self.clock.now_ms(),
        };

        let affected = self
            .executor
            .run(|conn| {
                let affected = diesel::update(
                    t_upload_queue::table.filter(t_upload_queue::id.eq(&id_str)),
                )
                .set(&changeset)
                .execute(conn)?;
                Ok(affected)
            })
            .map_err(map_storage_error)?;

        if affected == 0 {
            return Err(QueueError::NotFound(id.clone()));
        }
        Ok(())
    }

    async fn counts(&self) -> Result<QueueCounts, QueueError> {
        let span = debug_span!("infra.sqlite.count_uploads", table = "t_upload_queue");
        let _enter = span.enter();

        let rows = self
            .executor
            .run(|conn| {
                let rows = t_upload_queue::table
                    .group_by(t_upload_queue::status)
                    .select((t_upload_queue::status, diesel::dsl::count_star()))
                    .load::<(String, i64)>(conn)?;
                Ok(rows)
            })
            .map_err(map_storage_error)?;

        let mut counts = QueueCounts::default();
        for (status, count) in rows {
            match UploadStatus::parse(&status) {
                Some(UploadStatus::Pending) => counts.pending = count,
                Some(UploadStatus::Uploading) => counts.uploading = count,
                Some(UploadStatus::Failed) => counts.failed = count,
                Some(UploadStatus::Done) | None => {}
            }
        }
        Ok(counts)
    }
}
