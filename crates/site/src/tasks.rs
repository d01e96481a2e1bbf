//! Best-effort background work.
//!
//! Lead submission on the payment path, SMS notifications and confirmation
//! emails must never hold up or fail the request that triggered them. Handlers
//! drop a [`BestEffortTask`] on a bounded queue and return; a worker drains the
//! queue and runs each task on its own so one slow or failing call never
//! delays or cancels another. Failures are logged with the task kind and
//! otherwise ignored. There are no retries.

use std::future::Future;
use std::sync::Arc;

use curbside_core::LeadRequest;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::services::{
    EmailError, EmailService, LeadClient, LeadError, OrderConfirmation, SmsClient, SmsError,
    SmsNotification,
};

/// A side-channel call nobody waits for.
#[derive(Debug, Clone)]
pub enum BestEffortTask {
    SubmitLead(LeadRequest),
    SendSms(SmsNotification),
    SendConfirmationEmail(OrderConfirmation),
}

impl BestEffortTask {
    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SubmitLead(_) => "submit_lead",
            Self::SendSms(_) => "send_sms",
            Self::SendConfirmationEmail(_) => "send_confirmation_email",
        }
    }
}

/// Why a task failed.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Lead(#[from] LeadError),
    #[error(transparent)]
    Sms(#[from] SmsError),
    #[error(transparent)]
    Email(#[from] EmailError),
}

/// Runs tasks taken off the queue.
pub trait TaskHandler: Send + Sync + 'static {
    fn handle(&self, task: BestEffortTask) -> impl Future<Output = Result<(), TaskError>> + Send;
}

/// Sending half of the task queue.
#[derive(Clone)]
pub struct TaskQueue {
    tx: mpsc::Sender<BestEffortTask>,
}

impl TaskQueue {
    /// Create a queue holding at most `capacity` pending tasks.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<BestEffortTask>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Queue a task without waiting.
    ///
    /// Returns `false` if the task was dropped because the queue is full or
    /// the worker has stopped.
    pub fn enqueue(&self, task: BestEffortTask) -> bool {
        match self.tx.try_send(task) {
            Ok(()) => true,
            Err(TrySendError::Full(task)) => {
                warn!(kind = task.kind(), "Task queue full, dropping task");
                false
            }
            Err(TrySendError::Closed(task)) => {
                warn!(kind = task.kind(), "Task worker stopped, dropping task");
                false
            }
        }
    }
}

/// Drain the queue until every sender is gone and in-flight tasks finish.
pub async fn run_worker<H: TaskHandler>(mut rx: mpsc::Receiver<BestEffortTask>, handler: H) {
    let handler = Arc::new(handler);
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            task = rx.recv() => {
                let Some(task) = task else { break };
                let handler = Arc::clone(&handler);
                in_flight.spawn(async move {
                    let kind = task.kind();
                    match handler.handle(task).await {
                        Ok(()) => debug!(kind, "Task completed"),
                        Err(e) => warn!(kind, error = %e, "Best-effort task failed"),
                    }
                });
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    warn!(error = %e, "Best-effort task panicked");
                }
            }
        }
    }

    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "Best-effort task panicked");
        }
    }
    info!("Task worker stopped");
}

/// Spawn [`run_worker`] on the runtime.
pub fn spawn_worker<H: TaskHandler>(
    rx: mpsc::Receiver<BestEffortTask>,
    handler: H,
) -> JoinHandle<()> {
    tokio::spawn(run_worker(rx, handler))
}

/// The production handler: one client per side channel.
///
/// A channel without configuration skips its tasks.
#[derive(Clone, Default)]
pub struct SideChannels {
    pub leads: Option<LeadClient>,
    pub sms: Option<SmsClient>,
    pub email: Option<EmailService>,
}

impl TaskHandler for SideChannels {
    async fn handle(&self, task: BestEffortTask) -> Result<(), TaskError> {
        match task {
            BestEffortTask::SubmitLead(lead) => match &self.leads {
                Some(client) => client.submit(&lead).await?,
                None => debug!("Lead webhook not configured, skipping"),
            },
            BestEffortTask::SendSms(notification) => match &self.sms {
                Some(client) => client.send(&notification).await?,
                None => debug!("SMS webhook not configured, skipping"),
            },
            BestEffortTask::SendConfirmationEmail(order) => match &self.email {
                Some(service) => service.send_order_confirmation(&order).await?,
                None => debug!("Email not configured, skipping"),
            },
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records every task and fails the SMS ones.
    #[derive(Clone, Default)]
    struct Recorder {
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    impl TaskHandler for Recorder {
        async fn handle(&self, task: BestEffortTask) -> Result<(), TaskError> {
            self.seen.lock().unwrap().push(task.kind());
            match task {
                BestEffortTask::SendSms(_) => Err(SmsError::Api { status: 500 }.into()),
                _ => Ok(()),
            }
        }
    }

    fn sms() -> BestEffortTask {
        BestEffortTask::SendSms(SmsNotification {
            phone: "+12815550199".to_string(),
            message: "hi".to_string(),
            transcript: String::new(),
        })
    }

    fn lead() -> BestEffortTask {
        let lead = curbside_core::QuoteDraft {
            email: "pat@example.com".to_owned(),
            phone: "2815550199".to_owned(),
            ..Default::default()
        }
        .validate_lead()
        .unwrap();
        BestEffortTask::SubmitLead(lead)
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_other_tasks() {
        let (queue, rx) = TaskQueue::new(8);
        let recorder = Recorder::default();
        let worker = spawn_worker(rx, recorder.clone());

        assert!(queue.enqueue(sms()));
        assert!(queue.enqueue(lead()));
        assert!(queue.enqueue(sms()));
        drop(queue);
        worker.await.unwrap();

        let mut seen = recorder.seen.lock().unwrap().clone();
        seen.sort_unstable();
        assert_eq!(seen, vec!["send_sms", "send_sms", "submit_lead"]);
    }

    #[tokio::test]
    async fn test_full_queue_drops() {
        let (queue, _rx) = TaskQueue::new(1);
        assert!(queue.enqueue(lead()));
        assert!(!queue.enqueue(sms()));
    }

    #[tokio::test]
    async fn test_closed_queue_drops() {
        let (queue, rx) = TaskQueue::new(4);
        drop(rx);
        assert!(!queue.enqueue(lead()));
    }

    #[tokio::test]
    async fn test_unconfigured_channels_skip() {
        let channels = SideChannels::default();
        assert!(channels.handle(lead()).await.is_ok());
        assert!(channels.handle(sms()).await.is_ok());
    }
}
