use tokio_util::sync::CancellationToken;

/// Lifetime of a mounted form.
///
/// Ending it (the form closes or unmounts) cancels any submit still
/// waiting on the backend. Clones observe the same lifetime.
#[derive(Debug, Clone, Default)]
pub struct FormLifetime {
    token: CancellationToken,
}

impl FormLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    /// End the lifetime. Idempotent.
    pub fn end(&self) {
        if !self.token.is_cancelled() {
            tracing::debug!("form lifetime ended");
        }
        self.token.cancel();
    }

    pub fn is_ended(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once [`end`](Self::end) has been called.
    pub async fn ended(&self) {
        self.token.cancelled().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn end_is_shared_between_clones() {
        let lifetime = FormLifetime::new();
        let handle = lifetime.clone();
        assert!(!handle.is_ended());

        lifetime.end();
        lifetime.end();
        assert!(handle.is_ended());
    }

    #[tokio::test]
    async fn ended_wakes_waiters() {
        let lifetime = FormLifetime::new();
        let handle = lifetime.clone();

        let waiter = tokio::spawn(async move { handle.ended().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        lifetime.end();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }
}
