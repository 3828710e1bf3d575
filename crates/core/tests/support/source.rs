use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use harvest_core::DeliverySource;
use harvest_domain::{FeedRecord, HarvestError, OrderRecord, Result as DomainResult};

/// One recorded `create_pause` call.
#[derive(Debug, Clone, PartialEq)]
pub struct PauseCall {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    pub auto_cancel: bool,
}

#[derive(Default)]
struct State {
    feed: Vec<FeedRecord>,
    items: HashMap<i64, Vec<OrderRecord>>,
    item_error: Option<HarvestError>,
    schedule_errors: VecDeque<HarvestError>,
    auth_error: Option<HarvestError>,
    pause_responses: VecDeque<DomainResult<()>>,
    remove_error: Option<HarvestError>,
    pause_calls: Vec<PauseCall>,
    removed: Vec<String>,
    auth_calls: usize,
    schedule_calls: usize,
    item_calls: usize,
    closed: bool,
}

/// Scriptable in-memory [`DeliverySource`].
///
/// `create_pause` pops scripted responses in order and succeeds once the
/// script is exhausted.
#[derive(Clone)]
pub struct MockDeliverySource {
    state: Arc<Mutex<State>>,
    supports_pause: bool,
}

impl Default for MockDeliverySource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDeliverySource {
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(State::default())), supports_pause: true }
    }

    pub fn without_pause_support(mut self) -> Self {
        self.supports_pause = false;
        self
    }

    pub fn with_feed(self, feed: Vec<FeedRecord>) -> Self {
        self.state.lock().unwrap().feed = feed;
        self
    }

    pub fn with_items(self, order_id: i64, items: Vec<OrderRecord>) -> Self {
        self.state.lock().unwrap().items.insert(order_id, items);
        self
    }

    pub fn set_feed(&self, feed: Vec<FeedRecord>) {
        self.state.lock().unwrap().feed = feed;
    }

    pub fn fail_items(&self, err: HarvestError) {
        self.state.lock().unwrap().item_error = Some(err);
    }

    pub fn fail_schedule_once(&self, err: HarvestError) {
        self.state.lock().unwrap().schedule_errors.push_back(err);
    }

    pub fn fail_auth(&self, err: HarvestError) {
        self.state.lock().unwrap().auth_error = Some(err);
    }

    pub fn script_pause(&self, responses: Vec<DomainResult<()>>) {
        self.state.lock().unwrap().pause_responses = responses.into();
    }

    pub fn fail_remove(&self, err: HarvestError) {
        self.state.lock().unwrap().remove_error = Some(err);
    }

    pub fn pause_calls(&self) -> Vec<PauseCall> {
        self.state.lock().unwrap().pause_calls.clone()
    }

    pub fn removed_pauses(&self) -> Vec<String> {
        self.state.lock().unwrap().removed.clone()
    }

    pub fn auth_calls(&self) -> usize {
        self.state.lock().unwrap().auth_calls
    }

    pub fn schedule_calls(&self) -> usize {
        self.state.lock().unwrap().schedule_calls
    }

    pub fn item_calls(&self) -> usize {
        self.state.lock().unwrap().item_calls
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

pub fn conflict() -> HarvestError {
    HarvestError::Conflict { status: 409, message: "delivery already planned".into() }
}

#[async_trait]
impl DeliverySource for MockDeliverySource {
    fn name(&self) -> &str {
        "mock"
    }

    fn supports_pause(&self) -> bool {
        self.supports_pause
    }

    async fn authenticate(&self) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        state.auth_calls += 1;
        match state.auth_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn list_schedule(&self) -> DomainResult<Vec<FeedRecord>> {
        let mut state = self.state.lock().unwrap();
        state.schedule_calls += 1;
        match state.schedule_errors.pop_front() {
            Some(err) => Err(err),
            None => Ok(state.feed.clone()),
        }
    }

    async fn list_order_items(&self, order_id: i64) -> DomainResult<Vec<OrderRecord>> {
        let mut state = self.state.lock().unwrap();
        state.item_calls += 1;
        if let Some(err) = state.item_error.clone() {
            return Err(err);
        }
        Ok(state.items.get(&order_id).cloned().unwrap_or_default())
    }

    async fn create_pause(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
        auto_cancel: bool,
    ) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        state.pause_calls.push(PauseCall { from, to, auto_cancel });
        state.pause_responses.pop_front().unwrap_or(Ok(()))
    }

    async fn remove_pause(&self, pause_id: &str) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.remove_error.clone() {
            return Err(err);
        }
        state.removed.push(pause_id.to_string());
        Ok(())
    }

    async fn close(&self) -> DomainResult<()> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}
