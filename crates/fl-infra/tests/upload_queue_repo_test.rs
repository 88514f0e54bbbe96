//! Durability tests for the SQLite upload queue: records must survive a
//! simulated process restart (dropping and re-opening the pool).

use std::sync::Arc;

use fl_core::ids::{EntityId, UploadId};
use fl_core::ports::{ClockPort, UploadPatch, UploadQueuePort};
use fl_core::upload::{NewUploadItem, UploadItem, UploadStatus};
use fl_infra::db::pool::init_db_pool;
use fl_infra::db::DieselSqliteExecutor;
use fl_infra::DieselUploadQueueRepository;

struct FixedClock(i64);

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

fn open_repo(database_url: &str) -> DieselUploadQueueRepository<DieselSqliteExecutor> {
    let pool = init_db_pool(database_url).expect("init pool");
    DieselUploadQueueRepository::new(
        DieselSqliteExecutor::new(pool),
        Arc::new(FixedClock(1_700_000_000_000)),
    )
}

fn sample_item(id: &str) -> UploadItem {
    let new = NewUploadItem::new(
        UploadId::from(id),
        format!("{id}.jpg"),
        "image/jpeg",
        vec![9, 9, 9],
        "trip_proof",
        "trip",
        EntityId::from("trip-11"),
    );
    UploadItem::enqueued(new, 1_700_000_000_000)
}

#[tokio::test]
async fn records_survive_reopening_the_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("queue.sqlite");
    let database_url = db_path.to_str().expect("utf-8 path").to_string();

    let item = sample_item("survivor");
    {
        let repo = open_repo(&database_url);
        repo.enqueue(item.clone()).await.expect("enqueue");
        // Pool dropped here, simulating process exit
    }

    let repo = open_repo(&database_url);
    let fetched = repo
        .get(&item.id)
        .await
        .expect("get")
        .expect("record survived restart");
    assert_eq!(fetched, item);
}

#[tokio::test]
async fn fifo_order_survives_reopening_the_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("queue.sqlite");
    let database_url = db_path.to_str().expect("utf-8 path").to_string();

    {
        let repo = open_repo(&database_url);
        for id in ["first", "second", "third"] {
            repo.enqueue(sample_item(id)).await.expect("enqueue");
        }
        repo.delete(&UploadId::from("second")).await.expect("delete");
    }

    let repo = open_repo(&database_url);
    let pending = repo.list_pending().await.expect("list_pending");
    let ids: Vec<_> = pending.iter().map(|item| item.id.to_string()).collect();
    assert_eq!(ids, vec!["first", "third"]);
}

#[tokio::test]
async fn attempt_state_survives_reopening_the_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("queue.sqlite");
    let database_url = db_path.to_str().expect("utf-8 path").to_string();

    let item = sample_item("retrying");
    {
        let repo = open_repo(&database_url);
        repo.enqueue(item.clone()).await.expect("enqueue");
        repo.update(
            &item.id,
            UploadPatch::attempt_failed(UploadStatus::Pending, 2, "timeout".to_string()),
        )
        .await
        .expect("update");
    }

    let repo = open_repo(&database_url);
    let fetched = repo.get(&item.id).await.expect("get").expect("present");
    assert_eq!(fetched.attempts, 2);
    assert_eq!(fetched.last_error.as_deref(), Some("timeout"));
    assert_eq!(fetched.status, UploadStatus::Pending);
    assert_eq!(fetched.idempotency_key, item.idempotency_key);
}
