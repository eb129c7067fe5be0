//! Single-handle holder backing every lifecycle-managed client.
//!
//! The handle lives behind a synchronous lock so accessors stay cheap and
//! non-async. Initialisation is serialised by a separate async mutex held
//! across the connect future, so concurrent first calls connect once.

use std::future::Future;
use std::sync::{PoisonError, RwLock};

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::domain::ports::LifecycleError;

/// Outcome of [`ClientSlot::init_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InitOutcome {
    Connected,
    AlreadyInitialised,
}

pub(crate) struct ClientSlot<T> {
    component: &'static str,
    init_lock: Mutex<()>,
    handle: RwLock<Option<T>>,
}

impl<T: Clone> ClientSlot<T> {
    pub(crate) fn new(component: &'static str) -> Self {
        Self {
            component,
            init_lock: Mutex::new(()),
            handle: RwLock::new(None),
        }
    }

    pub(crate) fn component(&self) -> &'static str {
        self.component
    }

    /// Run `connect` unless a handle is already held.
    pub(crate) async fn init_with<F, Fut>(&self, connect: F) -> Result<InitOutcome, LifecycleError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, LifecycleError>>,
    {
        let _init = self.init_lock.lock().await;
        if self.is_initialised() {
            warn!(component = self.component, "client already initialised; skipping");
            return Ok(InitOutcome::AlreadyInitialised);
        }

        match connect().await {
            Ok(handle) => {
                *self
                    .handle
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = Some(handle);
                info!(component = self.component, "client initialised");
                Ok(InitOutcome::Connected)
            }
            Err(err) => {
                error!(component = self.component, error = %err, "client initialisation failed");
                Err(err)
            }
        }
    }

    /// Clone out the live handle.
    pub(crate) fn get(&self) -> Result<T, LifecycleError> {
        self.handle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| {
                error!(component = self.component, "client accessed before init");
                LifecycleError::uninitialised(self.component)
            })
    }

    /// Remove the handle, returning it so the caller can close it.
    pub(crate) fn take(&self) -> Option<T> {
        let taken = self
            .handle
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if taken.is_some() {
            info!(component = self.component, "client closed");
        }
        taken
    }

    pub(crate) fn is_initialised(&self) -> bool {
        self.handle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[rstest]
    #[tokio::test]
    async fn second_init_skips_connect() {
        let slot = ClientSlot::<u32>::new("test");
        let calls = AtomicUsize::new(0);

        for expected in [InitOutcome::Connected, InitOutcome::AlreadyInitialised] {
            let outcome = slot
                .init_with(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await
                .expect("init succeeds");
            assert_eq!(outcome, expected);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(slot.get(), Ok(7));
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_first_calls_connect_once() {
        let slot = Arc::new(ClientSlot::<u32>::new("test"));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let slot = Arc::clone(&slot);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    slot.init_with(|| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        Ok(1)
                    })
                    .await
                })
            })
            .collect();
        for task in tasks {
            task.await.expect("task joins").expect("init succeeds");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_init_leaves_slot_empty() {
        let slot = ClientSlot::<u32>::new("test");

        let result = slot
            .init_with(|| async { Err(LifecycleError::connection("test", "refused")) })
            .await;

        assert_eq!(result, Err(LifecycleError::connection("test", "refused")));
        assert!(!slot.is_initialised());
    }

    #[rstest]
    fn access_before_init_is_rejected() {
        let slot = ClientSlot::<u32>::new("test");

        assert_eq!(slot.get(), Err(LifecycleError::uninitialised("test")));
    }

    #[rstest]
    #[tokio::test]
    async fn take_twice_is_harmless() {
        let slot = ClientSlot::<u32>::new("test");
        slot.init_with(|| async { Ok(3) })
            .await
            .expect("init succeeds");

        assert_eq!(slot.take(), Some(3));
        assert_eq!(slot.take(), None);
        assert!(!slot.is_initialised());
        assert!(slot.get().is_err());
    }
}
