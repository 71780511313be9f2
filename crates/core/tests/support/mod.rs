//! Shared test helpers for `punchclock-core` integration tests.
//!
//! [`StubGateway`] stands in for the HTTP gateway: it records every request,
//! replays scripted responses per route and can echo punch state like the
//! real backend does.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use punchclock_core::{ApiGateway, ApiRequest, CredentialProvider, CredentialStore};
use punchclock_domain::{ApiError, ApiRoute};
use serde_json::{json, Value};
use tokio::sync::Notify;

#[derive(Default)]
pub struct StubGateway {
    credentials: Option<Arc<CredentialStore>>,
    scripted: Mutex<HashMap<ApiRoute, VecDeque<Result<Value, ApiError>>>>,
    requests: Mutex<Vec<ApiRequest>>,
    echo_punches: bool,
    punch: Mutex<Option<Value>>,
    tasks: Mutex<HashMap<i64, Value>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce and invalidate credentials the way the HTTP gateway does.
    pub fn with_credentials(mut self, store: Arc<CredentialStore>) -> Self {
        self.credentials = Some(store);
        self
    }

    /// Keep a server-side punch that punch in/out mutate and the current
    /// punch endpoint reports.
    pub fn echoing_punches(mut self) -> Self {
        self.echo_punches = true;
        self
    }

    /// Queue a response for the next call to `route`.
    pub fn script(&self, route: ApiRoute, response: Result<Value, ApiError>) {
        self.scripted.lock().unwrap().entry(route).or_default().push_back(response);
    }

    /// Register a task the echo server can embed in the current punch.
    pub fn know_task(&self, task: Value) {
        let id = task["Id"].as_i64().unwrap();
        self.tasks.lock().unwrap().insert(id, task);
    }

    /// Make the next request wait until the returned handle is notified.
    pub fn hold_requests(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, route: ApiRoute) -> Vec<ApiRequest> {
        self.requests().into_iter().filter(|r| r.route == route).collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn echo(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        match request.route {
            ApiRoute::Authenticate => Ok(json!({"AuthToken": "stub-token"})),
            ApiRoute::CurrentPunch if self.echo_punches => {
                Ok(self.punch.lock().unwrap().clone().unwrap_or(Value::Null))
            }
            ApiRoute::PunchIn if self.echo_punches => {
                let task_id: i64 = request.param("taskId").unwrap().parse().unwrap();
                let task = self
                    .tasks
                    .lock()
                    .unwrap()
                    .get(&task_id)
                    .cloned()
                    .unwrap_or_else(|| json!({"Id": task_id, "Number": "", "Name": ""}));
                *self.punch.lock().unwrap() = Some(json!({
                    "InAt": Utc::now().format("%Y-%m-%dT%H:%M:%S%z").to_string(),
                    "InAtTimeZone": request.param("timeZone").unwrap(),
                    "Task": task,
                }));
                Ok(Value::Null)
            }
            ApiRoute::PunchOut if self.echo_punches => {
                *self.punch.lock().unwrap() = None;
                Ok(Value::Null)
            }
            _ => Ok(Value::Null),
        }
    }
}

#[async_trait]
impl ApiGateway for StubGateway {
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError> {
        self.requests.lock().unwrap().push(request.clone());

        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if request.authenticated {
            if let Some(store) = &self.credentials {
                if store.bearer_header().is_none() {
                    return Err(ApiError::Unauthenticated);
                }
            }
        }

        let scripted = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(&request.route)
            .and_then(VecDeque::pop_front);
        let response = match scripted {
            Some(response) => response,
            None => self.echo(&request),
        };

        if request.authenticated && matches!(response, Err(ApiError::Unauthorized)) {
            if let Some(store) = &self.credentials {
                store.invalidate();
            }
        }
        response
    }
}

pub fn task_json(id: i64, number: &str, name: &str) -> Value {
    json!({
        "Id": id,
        "Number": number,
        "Name": name,
        "Job": {
            "Id": 7,
            "Number": "J-7",
            "Name": "Warehouse",
            "CustomerId": 3,
            "Customer": {"Id": 3, "Number": "C-3", "Name": "Acme"}
        }
    })
}
