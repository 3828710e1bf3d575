//! Lazy session handling for delivery sources
//!
//! Upstream sessions expire silently. [`SessionSource`] logs in on first
//! use and, when a call is rejected as unauthenticated, logs in again and
//! repeats that call once.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use harvest_domain::{FeedRecord, OrderRecord, Result};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::ports::DeliverySource;

pub struct SessionSource {
    inner: Arc<dyn DeliverySource>,
    authenticated: AtomicBool,
    login: Mutex<()>,
}

impl SessionSource {
    pub fn new(inner: Arc<dyn DeliverySource>) -> Self {
        Self { inner, authenticated: AtomicBool::new(false), login: Mutex::new(()) }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    async fn ensure_session(&self) -> Result<()> {
        if self.is_authenticated() {
            return Ok(());
        }
        let _guard = self.login.lock().await;
        // another caller may have logged in while we waited
        if self.is_authenticated() {
            return Ok(());
        }
        self.inner.authenticate().await?;
        self.authenticated.store(true, Ordering::Release);
        debug!(source = self.inner.name(), "Session established");
        Ok(())
    }

    async fn with_session<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: Fn() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
        T: Send,
    {
        self.ensure_session().await?;
        match call().await {
            Err(err) if err.is_auth() => {
                warn!(
                    source = self.inner.name(),
                    operation,
                    error = %err,
                    "Session rejected, re-authenticating"
                );
                self.authenticated.store(false, Ordering::Release);
                self.ensure_session().await?;
                call().await
            }
            other => other,
        }
    }
}

#[async_trait]
impl DeliverySource for SessionSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn supports_pause(&self) -> bool {
        self.inner.supports_pause()
    }

    /// Force a fresh login regardless of the cached session state.
    async fn authenticate(&self) -> Result<()> {
        self.authenticated.store(false, Ordering::Release);
        self.ensure_session().await
    }

    async fn list_schedule(&self) -> Result<Vec<FeedRecord>> {
        self.with_session("list_schedule", || self.inner.list_schedule()).await
    }

    async fn list_order_items(&self, order_id: i64) -> Result<Vec<OrderRecord>> {
        self.with_session("list_order_items", || self.inner.list_order_items(order_id)).await
    }

    async fn create_pause(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
        auto_cancel: bool,
    ) -> Result<()> {
        self.with_session("create_pause", || self.inner.create_pause(from, to, auto_cancel)).await
    }

    async fn remove_pause(&self, pause_id: &str) -> Result<()> {
        self.with_session("remove_pause", || self.inner.remove_pause(pause_id)).await
    }

    async fn close(&self) -> Result<()> {
        self.authenticated.store(false, Ordering::Release);
        self.inner.close().await
    }
}
