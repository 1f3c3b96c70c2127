//! crates/wonderpay_core/src/ingestion.rs
//!
//! Upload a scanned document, poll its OCR status with a bounded number of
//! attempts, then create a draft bill from it.
//!
//! A job moves through `Uploading -> Polling(attempt) -> {Processed, Failed}`.
//! Progress is published on a `watch` channel so a caller can render
//! `attempt/max_attempts`, and the wait between attempts is a `tokio` timer
//! raced against the job's [`CancellationToken`].

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::{ClientHandle, DocumentStatus, NewPayable, Notification, Payable, UploadFile};
use crate::error::{CoreError, CoreResult};
use crate::ports::{DocumentGateway, Notifier};
use crate::session::SessionContext;

pub const MAX_RETRIES: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_millis(2000);

/// Fixed-delay, bounded polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            delay: RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum IngestionState {
    Queued,
    Uploading,
    Polling {
        document_id: String,
        attempt: u32,
        max_attempts: u32,
    },
    Processed {
        document_id: String,
        payable_id: String,
    },
    Failed {
        reason: String,
    },
}

impl IngestionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Processed { .. } | Self::Failed { .. })
    }
}

/// Progress and cancellation for one document.
pub struct IngestionJob {
    state: watch::Sender<IngestionState>,
    cancel: CancellationToken,
}

impl Default for IngestionJob {
    fn default() -> Self {
        Self::new()
    }
}

impl IngestionJob {
    pub fn new() -> Self {
        let (state, _) = watch::channel(IngestionState::Queued);
        Self {
            state,
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> IngestionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<IngestionState> {
        self.state.subscribe()
    }

    /// Stops the job at its next suspension point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn set(&self, state: IngestionState) {
        self.state.send_replace(state);
    }
}

/// The document-to-payable pipeline.
pub struct DocumentPipeline {
    session: Arc<SessionContext>,
    gateway: Arc<dyn DocumentGateway>,
    notifier: Arc<dyn Notifier>,
    policy: RetryPolicy,
}

impl DocumentPipeline {
    pub fn new(
        session: Arc<SessionContext>,
        gateway: Arc<dyn DocumentGateway>,
        notifier: Arc<dyn Notifier>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            session,
            gateway,
            notifier,
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn process_document(&self, file: UploadFile) -> CoreResult<Payable> {
        self.process_with(&IngestionJob::new(), file).await
    }

    /// Runs the pipeline, reporting progress on `job`.
    ///
    /// Every outcome is also surfaced as a notification.
    pub async fn process_with(&self, job: &IngestionJob, file: UploadFile) -> CoreResult<Payable> {
        let Some(client) = self.session.client() else {
            self.notifier
                .notify(Notification::error("OCR service not initialized"));
            job.set(IngestionState::Failed {
                reason: CoreError::NotInitialized.to_string(),
            });
            return Err(CoreError::NotInitialized);
        };

        match self.run(&client, job, file).await {
            Ok((document_id, payable)) => {
                job.set(IngestionState::Processed {
                    document_id,
                    payable_id: payable.id.clone(),
                });
                self.notifier
                    .notify(Notification::success("Document processed successfully"));
                Ok(payable)
            }
            Err(e) => {
                error!(error = %e, "OCR processing error");
                job.set(IngestionState::Failed {
                    reason: e.to_string(),
                });
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        client: &ClientHandle,
        job: &IngestionJob,
        file: UploadFile,
    ) -> CoreResult<(String, Payable)> {
        job.set(IngestionState::Uploading);

        // Upload failures are terminal.
        let uploaded = self
            .gateway
            .upload(client, &file)
            .await
            .map_err(|e| CoreError::Ingestion(format!("failed to upload document: {e}")))?;
        let document_id = uploaded
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CoreError::Ingestion("document upload returned no id".to_string()))?;
        info!(%document_id, file_name = %file.file_name, "Document uploaded");

        let max_attempts = self.policy.attempts();
        let mut attempt = 0;
        job.set(IngestionState::Polling {
            document_id: document_id.clone(),
            attempt,
            max_attempts,
        });

        loop {
            if job.is_cancelled() {
                return Err(CoreError::Ingestion("cancelled".to_string()));
            }

            let checked = self.gateway.status(client, &document_id).await;
            attempt += 1;

            // Any attempt that does not end in a payable is retried until the
            // budget is spent; `None` means the document is not processed yet.
            let failure = match checked {
                Ok(state) if state.status == DocumentStatus::Processed => {
                    debug!(%document_id, attempt, "Document processed");
                    match self
                        .gateway
                        .create_payable(client, &NewPayable::draft_bill(document_id.as_str()))
                        .await
                    {
                        Ok(payable) => {
                            info!(%document_id, payable_id = %payable.id, "Draft payable created");
                            return Ok((document_id, payable));
                        }
                        Err(e) => Some(CoreError::Ingestion(format!(
                            "failed to create payable: {e}"
                        ))),
                    }
                }
                Ok(state) => {
                    debug!(%document_id, attempt, max_attempts, status = ?state.status, "Document not processed yet");
                    None
                }
                Err(e) => Some(CoreError::ingestion(e)),
            };

            if attempt >= max_attempts {
                return Err(failure.unwrap_or_else(|| {
                    CoreError::Ingestion(format!("failed after {max_attempts} attempts"))
                }));
            }
            if let Some(e) = &failure {
                warn!(%document_id, attempt, error = %e, "Processing attempt failed, retrying");
            }

            job.set(IngestionState::Polling {
                document_id: document_id.clone(),
                attempt,
                max_attempts,
            });

            tokio::select! {
                _ = job.cancel.cancelled() => {
                    return Err(CoreError::Ingestion("cancelled".to_string()));
                }
                _ = tokio::time::sleep(self.policy.delay) => {}
            }
        }
    }
}
