// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use notepad_app::Locator;
use notepad_db::Store;
use notepad_tui::{InternalEvent, QueryRequest};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

type StoreCall = Box<dyn FnOnce(&Store) + Send>;

enum Job {
    Query {
        request: QueryRequest,
        tx: Sender<InternalEvent>,
    },
    Delete {
        request_id: u64,
        locator: Locator,
        tx: Sender<InternalEvent>,
    },
    Call(StoreCall),
}

// Queries older than the newest submitted one are skipped when they reach
// the front of the queue.
pub struct StoreWorker {
    jobs: Option<Sender<Job>>,
    latest_query: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl StoreWorker {
    pub fn spawn(store: Store) -> Result<Self> {
        let (jobs, rx) = mpsc::channel();
        let latest_query = Arc::new(AtomicU64::new(0));
        let latest = Arc::clone(&latest_query);
        let handle = thread::Builder::new()
            .name("notepad-store".to_owned())
            .spawn(move || run_jobs(&store, &rx, &latest))
            .context("spawn store worker thread")?;
        Ok(Self {
            jobs: Some(jobs),
            latest_query,
            handle: Some(handle),
        })
    }

    pub fn submit_query(&self, request: QueryRequest, tx: Sender<InternalEvent>) -> Result<()> {
        self.latest_query
            .fetch_max(request.request_id, Ordering::SeqCst);
        self.send(Job::Query { request, tx })
    }

    pub fn submit_delete(
        &self,
        request_id: u64,
        locator: Locator,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        self.send(Job::Delete {
            request_id,
            locator,
            tx,
        })
    }

    pub fn call<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Store) -> Result<T> + Send + 'static,
    {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.send(Job::Call(Box::new(move |store| {
            let _ = reply_tx.send(f(store));
        })))?;
        reply_rx
            .recv()
            .map_err(|_| anyhow!("store worker stopped before replying"))?
    }

    fn send(&self, job: Job) -> Result<()> {
        self.jobs
            .as_ref()
            .ok_or_else(|| anyhow!("store worker is shut down"))?
            .send(job)
            .map_err(|_| anyhow!("store worker stopped; restart notepad"))
    }
}

impl Drop for StoreWorker {
    fn drop(&mut self) {
        // Closing the queue ends the worker loop.
        self.jobs = None;
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("store worker panicked");
        }
    }
}

fn run_jobs(store: &Store, rx: &Receiver<Job>, latest_query: &AtomicU64) {
    while let Ok(job) = rx.recv() {
        match job {
            Job::Query { request, tx } => {
                let request_id = request.request_id;
                if request_id < latest_query.load(Ordering::SeqCst) {
                    debug!(request_id, "skipping superseded query");
                    continue;
                }
                let result = store
                    .query(
                        &request.locator,
                        &request.projection,
                        request.filter.as_ref(),
                        request.sort,
                    )
                    .map_err(|error| format!("{error:#}"));
                let _ = tx.send(InternalEvent::QueryFinished { request_id, result });
            }
            Job::Delete {
                request_id,
                locator,
                tx,
            } => {
                let result = store
                    .delete(&locator, None)
                    .map_err(|error| format!("{error:#}"));
                let _ = tx.send(InternalEvent::DeleteFinished {
                    request_id,
                    locator,
                    result,
                });
            }
            Job::Call(call) => call(store),
        }
    }
    debug!("store worker exiting");
}

#[cfg(test)]
mod tests {
    use super::{Job, StoreWorker};
    use anyhow::{Result, anyhow};
    use notepad_app::{LIST_PROJECTION, Locator, NoteId, SortOrder};
    use notepad_db::Store;
    use notepad_testkit::fixture_notes;
    use notepad_tui::{InternalEvent, QueryRequest};
    use std::sync::mpsc;
    use std::time::Duration;

    fn seeded_worker() -> Result<StoreWorker> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        for note in fixture_notes() {
            store.insert(&Locator::notes(), &note)?;
        }
        StoreWorker::spawn(store)
    }

    fn list_request(request_id: u64) -> QueryRequest {
        QueryRequest {
            request_id,
            locator: Locator::notes(),
            projection: LIST_PROJECTION.to_vec(),
            filter: None,
            sort: SortOrder::default(),
        }
    }

    #[test]
    fn query_results_come_back_on_the_channel() -> Result<()> {
        let worker = seeded_worker()?;
        let (tx, rx) = mpsc::channel();
        worker.submit_query(list_request(1), tx)?;

        match rx.recv_timeout(Duration::from_secs(5))? {
            InternalEvent::QueryFinished { request_id, result } => {
                assert_eq!(request_id, 1);
                let snapshot = result.map_err(|error| anyhow!(error))?;
                assert_eq!(snapshot.len(), 3);
            }
            other => panic!("unexpected event {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn queued_superseded_queries_are_skipped() -> Result<()> {
        let worker = seeded_worker()?;
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let (tx, rx) = mpsc::channel();

        // Park the worker so both queries queue up behind the gate.
        let (parked_tx, parked_rx) = mpsc::channel();
        worker.send(Job::Call(Box::new(move |_store| {
            let _ = parked_tx.send(());
            let _ = gate_rx.recv();
        })))?;
        parked_rx.recv_timeout(Duration::from_secs(5))?;

        worker.submit_query(list_request(1), tx.clone())?;
        worker.submit_query(list_request(2), tx)?;
        gate_tx.send(())?;

        match rx.recv_timeout(Duration::from_secs(5))? {
            InternalEvent::QueryFinished { request_id, .. } => assert_eq!(request_id, 2),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
        Ok(())
    }

    #[test]
    fn delete_reports_rows_removed() -> Result<()> {
        let worker = seeded_worker()?;
        let (tx, rx) = mpsc::channel();
        let target = Locator::note(NoteId::new(2));
        worker.submit_delete(7, target, tx.clone())?;
        worker.submit_delete(8, target, tx)?;

        let mut counts = Vec::new();
        for _ in 0..2 {
            match rx.recv_timeout(Duration::from_secs(5))? {
                InternalEvent::DeleteFinished { result, .. } => {
                    counts.push(result.map_err(|error| anyhow!(error))?);
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(counts, vec![1, 0]);
        assert_eq!(worker.call(|store| store.count())?, 2);
        Ok(())
    }

    #[test]
    fn call_propagates_store_errors() -> Result<()> {
        let worker = seeded_worker()?;
        let error = worker
            .call(|store| store.get_note(&Locator::notes()))
            .expect_err("collection locator is not a note");
        assert!(!error.to_string().is_empty());
        Ok(())
    }
}
