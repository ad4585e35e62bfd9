//! Async wrappers for use in Tokio runtimes.
//!
//! [`AsyncPackSdk`] runs blocking catalog fetches and pack generation on the
//! blocking thread pool via [`tokio::task::spawn_blocking`].
//! [`LifecycleDriver`] owns a [`PackLifecycle`] and fires its timed
//! transitions from a Tokio task, so callers only issue user actions.
//!
//! # Example
//!
//! ```no_run
//! use optcg_pack_sdk::{AsyncPackSdk, LifecycleDriver};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk = AsyncPackSdk::builder().build().await.unwrap();
//!     let lifecycle = sdk.open_pack("OP-01").await.unwrap();
//!
//!     let mut driver = LifecycleDriver::new(lifecycle);
//!     driver.tear().unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{PackError, Result};
use crate::lifecycle::{LifecycleSnapshot, PackLifecycle};
use crate::models::{CardSet, PackResult};
use crate::{PackSdk, PackSdkBuilder};

// ---------------------------------------------------------------------------
// AsyncPackSdk
// ---------------------------------------------------------------------------

/// Builder for [`AsyncPackSdk`]; wraps a [`PackSdkBuilder`].
#[derive(Default)]
pub struct AsyncPackSdkBuilder {
    inner: PackSdkBuilder,
}

impl AsyncPackSdkBuilder {
    /// Adjust the underlying sync builder.
    pub fn configure<F>(mut self, f: F) -> Self
    where
        F: FnOnce(PackSdkBuilder) -> PackSdkBuilder,
    {
        self.inner = f(self.inner);
        self
    }

    /// Build the async SDK.
    ///
    /// Initialization runs on the blocking thread pool so it won't block
    /// the async event loop.
    pub async fn build(self) -> Result<AsyncPackSdk> {
        tokio::task::spawn_blocking(move || {
            let sdk = self.inner.build()?;
            Ok(AsyncPackSdk::from_sdk(sdk))
        })
        .await
        .map_err(|e| PackError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

/// Async wrapper around [`PackSdk`].
///
/// The SDK is protected by a [`Mutex`] since its catalog uses `RefCell`
/// internally.
pub struct AsyncPackSdk {
    inner: Arc<Mutex<PackSdk>>,
}

impl AsyncPackSdk {
    pub fn builder() -> AsyncPackSdkBuilder {
        AsyncPackSdkBuilder::default()
    }

    pub fn from_sdk(sdk: PackSdk) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sdk)),
        }
    }

    /// Run a sync SDK operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut PackSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = sdk
                .lock()
                .map_err(|_| PackError::InvalidArgument("SDK lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| PackError::InvalidArgument(format!("Task join error: {e}")))?
    }

    pub async fn sets(&self) -> Result<Vec<CardSet>> {
        self.run(|s| s.sets()).await
    }

    pub async fn generate_pack(&self, set_id: &str) -> Result<PackResult> {
        let set_id = set_id.to_string();
        self.run(move |s| s.generate_pack(&set_id)).await
    }

    pub async fn open_pack(&self, set_id: &str) -> Result<PackLifecycle> {
        let set_id = set_id.to_string();
        self.run(move |s| s.open_pack(&set_id)).await
    }
}

// ---------------------------------------------------------------------------
// LifecycleDriver
// ---------------------------------------------------------------------------

/// Fires a lifecycle's timed transitions on the Tokio timer.
///
/// At most one timer task is alive at a time. Every user action aborts it and
/// starts a new one for whatever transition is then pending. Dropping the
/// driver disposes the lifecycle and aborts the task.
pub struct LifecycleDriver {
    lifecycle: Arc<Mutex<PackLifecycle>>,
    task: Option<JoinHandle<()>>,
}

impl LifecycleDriver {
    /// Must be called from within a Tokio runtime.
    pub fn new(lifecycle: PackLifecycle) -> Self {
        let mut driver = Self {
            lifecycle: Arc::new(Mutex::new(lifecycle)),
            task: None,
        };
        driver.reschedule();
        driver
    }

    pub fn snapshot(&self) -> Result<LifecycleSnapshot> {
        Ok(self.lock()?.snapshot())
    }

    pub fn tear(&mut self) -> Result<bool> {
        let torn = self.lock()?.tear(now());
        self.reschedule();
        Ok(torn)
    }

    pub fn reveal_card(&mut self, index: usize) -> Result<bool> {
        let revealed = self.lock()?.reveal_card(index, now())?;
        self.reschedule();
        Ok(revealed)
    }

    pub fn reveal_all(&mut self) -> Result<bool> {
        let revealed = self.lock()?.reveal_all(now());
        self.reschedule();
        Ok(revealed)
    }

    pub fn open_another(&mut self, pack: PackResult) -> Result<bool> {
        let opened = self.lock()?.open_another(pack);
        self.reschedule();
        Ok(opened)
    }

    /// Dispose the lifecycle and stop the timer.
    pub fn dispose(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if let Ok(mut lifecycle) = self.lifecycle.lock() {
            lifecycle.dispose();
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, PackLifecycle>> {
        self.lifecycle
            .lock()
            .map_err(|_| PackError::InvalidArgument("lifecycle lock poisoned".into()))
    }

    fn reschedule(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        let lifecycle = Arc::clone(&self.lifecycle);
        self.task = Some(tokio::spawn(run_timers(lifecycle)));
    }
}

impl Drop for LifecycleDriver {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Sleep until each pending transition is due and fire it, until none is left.
async fn run_timers(lifecycle: Arc<Mutex<PackLifecycle>>) {
    loop {
        let next = match lifecycle.lock() {
            Ok(guard) => guard.pending().copied(),
            Err(_) => return,
        };
        let Some(next) = next else { return };

        tokio::time::sleep_until(Instant::from_std(next.due)).await;

        let fired = match lifecycle.lock() {
            Ok(mut guard) => guard.fire(next.ticket),
            Err(_) => return,
        };
        if let Err(e) = fired {
            tracing::debug!(error = %e, "timer fired for a superseded transition");
            return;
        }
    }
}

/// Current time on the Tokio clock, so paused test time applies.
fn now() -> std::time::Instant {
    Instant::now().into_std()
}
