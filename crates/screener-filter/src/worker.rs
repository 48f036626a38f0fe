//! Background filter worker.
//!
//! Runs the filter pass on a dedicated thread so the caller's own thread
//! never blocks on a large batch. Each request carries a caller-chosen ticket
//! that is echoed in the reply; callers wanting last-call-wins semantics use
//! [`FilterWorker::recv_ticket`] to skip stale replies.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use screener_model::{FilterRequest, FilterResponse, Result, ScreenerError};

use crate::boundary::handle_request;

struct Job {
    ticket: u64,
    request: FilterRequest,
}

/// Reply to one submitted request.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerReply {
    pub ticket: u64,
    pub response: FilterResponse,
}

/// Handle to the filter thread. Dropping it stops the thread once queued
/// requests are processed.
pub struct FilterWorker {
    jobs: Option<Sender<Job>>,
    replies: Receiver<WorkerReply>,
    handle: Option<JoinHandle<()>>,
}

impl FilterWorker {
    /// Spawn the worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to create the thread.
    pub fn spawn() -> Result<Self> {
        let (jobs, job_receiver) = mpsc::channel::<Job>();
        let (reply_sender, replies) = mpsc::channel::<WorkerReply>();
        let handle = thread::Builder::new()
            .name("filter-worker".to_string())
            .spawn(move || {
                info!("filter worker started");
                for Job { ticket, request } in job_receiver {
                    debug!(ticket, records = request.records.len(), "filter request received");
                    let response = handle_request(request);
                    if reply_sender.send(WorkerReply { ticket, response }).is_err() {
                        break;
                    }
                }
                info!("filter worker stopped");
            })?;
        Ok(Self {
            jobs: Some(jobs),
            replies,
            handle: Some(handle),
        })
    }

    /// Queue a request.
    pub fn submit(&self, ticket: u64, request: FilterRequest) -> Result<()> {
        let jobs = self.jobs.as_ref().ok_or(ScreenerError::WorkerStopped)?;
        jobs.send(Job { ticket, request })
            .map_err(|_| ScreenerError::WorkerStopped)
    }

    /// Block until the next reply arrives.
    pub fn recv(&self) -> Result<WorkerReply> {
        self.replies.recv().map_err(|_| ScreenerError::WorkerStopped)
    }

    /// Next reply if one is ready.
    pub fn try_recv(&self) -> Option<WorkerReply> {
        self.replies.try_recv().ok()
    }

    /// Block until the reply for `ticket` arrives, discarding older replies.
    pub fn recv_ticket(&self, ticket: u64) -> Result<FilterResponse> {
        loop {
            let reply = self.recv()?;
            if reply.ticket == ticket {
                return Ok(reply.response);
            }
            debug!(stale = reply.ticket, wanted = ticket, "discarding stale filter reply");
        }
    }
}

impl Drop for FilterWorker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screener_model::{Condition, Record, Rule};

    fn request(threshold: i64) -> FilterRequest {
        let records = (0..10)
            .map(|premium| Record::new().with("premium", premium))
            .collect();
        FilterRequest::new(records, vec![Rule::new("premium", Condition::Over, threshold)])
    }

    #[test]
    fn replies_echo_tickets() {
        let worker = FilterWorker::spawn().expect("spawn worker");
        worker.submit(7, request(4)).expect("submit");
        let reply = worker.recv().expect("reply");
        assert_eq!(reply.ticket, 7);
        assert_eq!(reply.response.records().len(), 5);
    }

    #[test]
    fn latest_ticket_wins() {
        let worker = FilterWorker::spawn().expect("spawn worker");
        worker.submit(1, request(0)).expect("submit");
        worker.submit(2, request(8)).expect("submit");
        let response = worker.recv_ticket(2).expect("reply");
        assert_eq!(response.records().len(), 1);
        assert!(worker.try_recv().is_none());
    }
}
