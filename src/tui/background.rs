use anyhow::Result;
use std::future::Future;
use tokio::task::JoinHandle;

use crate::auth::AuthError;

/// A session call running on its own task, so the draw loop keeps ticking
/// while the identity provider answers.
#[derive(Default)]
pub struct BackgroundCall {
    handle: Option<JoinHandle<Result<(), AuthError>>>,
}

impl BackgroundCall {
    pub fn start<F>(&mut self, call: F)
    where
        F: Future<Output = Result<(), AuthError>> + Send + 'static,
    {
        self.handle = Some(tokio::spawn(call));
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// The outcome of the call once it has finished. Never waits on a call
    /// that is still in flight.
    pub async fn finished(&mut self) -> Result<Option<Result<(), AuthError>>> {
        if !self.handle.as_ref().is_some_and(JoinHandle::is_finished) {
            return Ok(None);
        }
        match self.handle.take() {
            Some(handle) => Ok(Some(handle.await?)),
            None => Ok(None),
        }
    }

    /// Forget the call. The task still runs to completion; its outcome is
    /// simply not reported.
    pub fn detach(&mut self) {
        self.handle = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn finished_does_not_wait_for_a_running_call() {
        let mut call = BackgroundCall::default();
        call.start(async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(())
        });

        let started = Instant::now();
        assert!(call.finished().await.unwrap().is_none());
        assert!(started.elapsed() < Duration::from_millis(500));
        assert!(call.is_running());
    }

    #[tokio::test]
    async fn finished_reports_the_outcome_once() {
        let mut call = BackgroundCall::default();
        call.start(async { Err(AuthError::session("remote down")) });

        let mut outcome = None;
        for _ in 0..100 {
            if let Some(result) = call.finished().await.unwrap() {
                outcome = Some(result);
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert!(matches!(outcome, Some(Err(AuthError::Session(_)))));
        assert!(!call.is_running());
        assert!(call.finished().await.unwrap().is_none());
    }
}
