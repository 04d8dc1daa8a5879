use crate::gateway::Gateway;
use crate::journal::process::process_entry;
use chrono::Utc;
use kokoro_db::journal_entry::{Mutation, Query};
use sea_orm::{DatabaseConnection, DbErr};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{Instrument, instrument};

/// A unit of background work. Scheduling is fire-and-forget: at-least-once
/// attempted execution while the process lives, no ordering between jobs, no
/// durability across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    ProcessEntry { entry_id: i64, user_id: i64 },
}

#[derive(Debug, Error)]
#[error("background worker is not running")]
pub struct DispatchError;

/// Cloneable producer half of the job channel. Handlers enqueue and return;
/// the worker picks the job up after the response has gone out.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Job>,
}

impl Dispatcher {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Job>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn schedule(&self, job: Job) -> Result<(), DispatchError> {
        self.tx.send(job).map_err(|_| DispatchError)
    }
}

/// Spawn the worker task consuming scheduled jobs. The worker owns its own
/// connection handle; it never touches the transaction of the request that
/// scheduled the job.
pub fn spawn_worker(conn: DatabaseConnection, gateway: Arc<dyn Gateway>) -> Dispatcher {
    let (dispatcher, mut rx) = Dispatcher::channel();

    tokio::spawn(
        async move {
            while let Some(job) = rx.recv().await {
                match job {
                    Job::ProcessEntry { entry_id, user_id } => {
                        process_entry(&conn, gateway.as_ref(), entry_id, user_id).await;
                    }
                }
            }
            tracing::debug!("job channel closed, background worker exiting");
        }
        .instrument(tracing::info_span!("background_worker")),
    );

    dispatcher
}

/// Spawn the recovery sweep for entries stuck in `processing` (a crash
/// between claim and completion leaves them there forever otherwise). Runs
/// every `sweep_interval`, requeues entries untouched for `stale_after`.
pub fn spawn_reclaimer(
    conn: DatabaseConnection,
    dispatcher: Dispatcher,
    stale_after: Duration,
    sweep_interval: Duration,
) {
    tokio::spawn(
        async move {
            let mut interval = tokio::time::interval(sweep_interval);
            // The first tick fires immediately; skip it so a fresh deploy does
            // not sweep entries the previous instance is still working on.
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(error) = reclaim_stuck_entries(&conn, &dispatcher, stale_after).await {
                    tracing::error!(error = &error as &dyn Error, "recovery sweep failed");
                }
            }
        }
        .instrument(tracing::info_span!("processing_reclaimer")),
    );
}

#[instrument(skip_all)]
async fn reclaim_stuck_entries(
    conn: &DatabaseConnection,
    dispatcher: &Dispatcher,
    stale_after: Duration,
) -> Result<(), DbErr> {
    let cutoff = Utc::now().fixed_offset() - chrono::Duration::seconds(stale_after.as_secs() as i64);

    let stale = Query::find_stale_processing(conn, cutoff).await?;
    for entry in stale {
        // The touch is a compare-and-swap on the stale stamp: a concurrent
        // sweep on another instance loses and skips the entry.
        if Mutation::touch_processing(conn, entry.id, cutoff).await? {
            tracing::warn!(entry_id = entry.id, "requeueing journal entry stuck in processing");
            if dispatcher
                .schedule(Job::ProcessEntry {
                    entry_id: entry.id,
                    user_id: entry.user_id,
                })
                .is_err()
            {
                tracing::error!(entry_id = entry.id, "background worker is gone, dropping requeue");
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schedule_delivers_jobs_in_order_to_the_channel() {
        let (dispatcher, mut rx) = Dispatcher::channel();
        let job = Job::ProcessEntry { entry_id: 1, user_id: 2 };
        dispatcher.schedule(job).unwrap();
        dispatcher.clone().schedule(Job::ProcessEntry { entry_id: 3, user_id: 2 }).unwrap();

        assert_eq!(rx.recv().await, Some(job));
        assert_eq!(rx.recv().await, Some(Job::ProcessEntry { entry_id: 3, user_id: 2 }));
    }

    #[tokio::test]
    async fn test_schedule_reports_missing_worker() {
        let (dispatcher, rx) = Dispatcher::channel();
        drop(rx);
        assert!(dispatcher.schedule(Job::ProcessEntry { entry_id: 1, user_id: 2 }).is_err());
    }
}
