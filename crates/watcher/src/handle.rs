//! Handle to a running scan.

use crate::{ScanNotification, ScanOutcome, ScannerError};

use std::{
    future::Future,
    pin::Pin,
    task::{ready, Context, Poll},
};

use commit_scanner_primitives::ExtractedCommitment;
use futures::Stream;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

/// Handle to a [`crate::BatchCommitmentScanner`] task.
///
/// The handle yields the [`ScanNotification`]s in block order, either through
/// [`ScannerHandle::next`] or as a [`ScanStream`]. Dropping the handle stops the scan.
#[derive(Debug)]
pub struct ScannerHandle {
    notifications: mpsc::Receiver<ScanNotification>,
    cancel: CancellationToken,
    task: JoinHandle<Result<ScanOutcome, ScannerError>>,
}

impl ScannerHandle {
    /// Create a new handle.
    pub(crate) const fn new(
        notifications: mpsc::Receiver<ScanNotification>,
        cancel: CancellationToken,
        task: JoinHandle<Result<ScanOutcome, ScannerError>>,
    ) -> Self {
        Self { notifications, cancel, task }
    }

    /// Returns the next notification, or `None` once the scan has stopped.
    pub async fn next(&mut self) -> Option<ScanNotification> {
        self.notifications.recv().await
    }

    /// Requests the scan to stop after the block in progress.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns a token cancelling the scan, e.g. from a signal handler.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Waits for the scan to finish, discarding the notifications not yet received.
    pub async fn wait(mut self) -> Result<ScanOutcome, ScannerError> {
        while self.notifications.recv().await.is_some() {}
        self.task.await?
    }

    /// Drives the scan to its end, collecting the extracted commitments. Commitments emitted
    /// before a fatal error are returned alongside the error.
    pub async fn collect_commitments(
        self,
    ) -> (Vec<ExtractedCommitment>, Result<ScanOutcome, ScannerError>) {
        let (notifications, outcome) = self.collect_notifications().await;
        let commitments = notifications
            .into_iter()
            .filter_map(|notification| match notification {
                ScanNotification::Commitment(commitment) => Some(commitment),
                _ => None,
            })
            .collect();
        (commitments, outcome)
    }

    /// Drives the scan to its end, collecting every notification.
    pub async fn collect_notifications(
        mut self,
    ) -> (Vec<ScanNotification>, Result<ScanOutcome, ScannerError>) {
        let mut notifications = Vec::new();
        while let Some(notification) = self.notifications.recv().await {
            notifications.push(notification);
        }
        let outcome = match self.task.await {
            Ok(outcome) => outcome,
            Err(err) => Err(err.into()),
        };
        (notifications, outcome)
    }

    /// Converts the handle into a [`ScanStream`]. The scan stops when the stream is dropped.
    pub fn into_stream(self) -> ScanStream {
        ScanStream {
            notifications: ReceiverStream::new(self.notifications),
            task: Some(self.task),
        }
    }
}

/// A stream of the notifications of a scan. A scan failing with a fatal error yields the error
/// as its last item.
#[derive(Debug)]
pub struct ScanStream {
    notifications: ReceiverStream<ScanNotification>,
    task: Option<JoinHandle<Result<ScanOutcome, ScannerError>>>,
}

impl Stream for ScanStream {
    type Item = Result<ScanNotification, ScannerError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if let Some(notification) = ready!(Pin::new(&mut this.notifications).poll_next(cx)) {
            return Poll::Ready(Some(Ok(notification)))
        }

        let Some(task) = this.task.as_mut() else { return Poll::Ready(None) };
        let result = ready!(Pin::new(task).poll(cx));
        this.task = None;

        Poll::Ready(match result {
            Ok(Ok(_)) => None,
            Ok(Err(err)) => Some(Err(err)),
            Err(err) => Some(Err(err.into())),
        })
    }
}
