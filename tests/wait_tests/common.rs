//! Scripted remotes for integration tests

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use cloudwait::{Action, ActionId, ActionSource, FetchError};

/// A remote resource as a caller would model it
#[derive(Clone, Debug, PartialEq)]
pub struct Volume {
    pub name: String,
    pub status: String,
}

pub fn volume(status: &str) -> Volume {
    Volume {
        name: "pg-data".to_string(),
        status: status.to_string(),
    }
}

/// Replays a fixed sequence of fetch results, repeating the last one forever
#[derive(Clone)]
pub struct Script<T> {
    steps: Arc<Mutex<VecDeque<Result<T, FetchError>>>>,
    calls: Arc<AtomicU32>,
}

impl<T: Clone> Script<T> {
    pub fn new(steps: Vec<Result<T, FetchError>>) -> Self {
        assert!(!steps.is_empty(), "script needs at least one step");
        Self {
            steps: Arc::new(Mutex::new(steps.into())),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Next scripted result
    pub async fn fetch(&self) -> Result<T, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut steps = self.steps.lock();
        if steps.len() > 1 {
            steps.pop_front().expect("non-empty")
        } else {
            steps.front().cloned().expect("non-empty")
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Action source answering each ID from its own script
#[derive(Default)]
pub struct ScriptedActions {
    scripts: HashMap<ActionId, Script<Action>>,
    order: Mutex<Vec<ActionId>>,
}

impl ScriptedActions {
    pub fn with(mut self, id: ActionId, statuses: &[&str]) -> Self {
        let steps = statuses
            .iter()
            .map(|status| Ok(action(id, status)))
            .collect();
        self.scripts.insert(id, Script::new(steps));
        self
    }

    pub fn calls_for(&self, id: ActionId) -> u32 {
        self.scripts.get(&id).map(Script::calls).unwrap_or(0)
    }

    /// IDs in the order they were first fetched
    pub fn fetch_order(&self) -> Vec<ActionId> {
        self.order.lock().clone()
    }
}

#[async_trait]
impl ActionSource for ScriptedActions {
    async fn get_action(&self, id: ActionId) -> Result<Action, FetchError> {
        {
            let mut order = self.order.lock();
            if order.last() != Some(&id) {
                order.push(id);
            }
        }
        match self.scripts.get(&id) {
            Some(script) => script.fetch().await,
            None => Err(FetchError::not_found(format!("action {} not found", id))),
        }
    }
}

pub fn action(id: ActionId, status: &str) -> Action {
    Action {
        id,
        status: status.into(),
        kind: "attach_volume".to_string(),
        resource_id: Some(506),
        resource_type: Some("volume".to_string()),
    }
}
