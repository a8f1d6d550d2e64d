//! Client core for the house-price prediction backend: a thin HTTP
//! client over its three endpoints and the form controller that owns
//! the submit/result/reset lifecycle.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;
use shared::{
    domain::FormInput,
    protocol::{FeatureListResponse, HealthResponse, PredictionRequest, PredictionResponse},
};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub mod animation;
pub mod error;

pub use error::PredictError;

use animation::{format_thousands, COUNT_UP_DURATION, FRAME_INTERVAL};

/// HTTP client for the prediction backend. The backend is a black box
/// behind `POST /api/predict`, `GET /api/health` and `GET /api/features`.
pub struct PredictionClient {
    http: Client,
    server_url: String,
}

impl PredictionClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Sends one coerced payload and resolves to the predicted price.
    /// A non-2xx status or a non-JSON body surfaces as
    /// [`PredictError::Transport`]; a well-formed `success: false`
    /// reply surfaces as a rejection carrying the backend's message.
    pub async fn predict(&self, request: &PredictionRequest) -> Result<f64, PredictError> {
        let body: PredictionResponse = self
            .http
            .post(format!("{}/api/predict", self.server_url))
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !body.success {
            return Err(match body.error {
                Some(message) => PredictError::Rejected(message),
                None => PredictError::RejectedUnspecified,
            });
        }
        body.predicted_price.ok_or(PredictError::MissingPrice)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        self.http
            .get(format!("{}/api/health", self.server_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("health endpoint returned an unreadable body")
    }

    /// The ordered feature columns the model expects. Diagnostic only.
    pub async fn features(&self) -> Result<FeatureListResponse> {
        self.http
            .get(format!("{}/api/features", self.server_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("features endpoint returned an unreadable body")
    }
}

/// Which panel is visible. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Form,
    Result,
}

/// The controller's whole UI-facing state: panel, busy flag, field
/// values, and the latest outcome. Single-instance; every handler
/// mutates this one value.
#[derive(Debug, Clone)]
pub struct ControllerState {
    pub panel: Panel,
    pub busy: bool,
    pub fields: FormInput,
    pub last_price: Option<i64>,
    pub last_error: Option<String>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            panel: Panel::Form,
            busy: false,
            fields: FormInput::with_defaults(),
            last_price: None,
            last_error: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    SubmitStarted,
    /// The backend accepted the request; `price` is already rounded.
    PredictionReady { price: i64, rendered: String },
    /// One frame of the count-up toward the latest price.
    PriceFrame { rendered: String },
    PredictionFailed { message: String },
    FormRestored,
}

/// Mediates between form input, the prediction endpoint, and the
/// two-panel UI. State machine over `(panel, busy)`:
/// `(Form, idle) -> (Form, busy) -> (Result, idle)` on success, back to
/// `(Form, idle)` on any failure; `reset` maps `(Result, idle)` to
/// `(Form, idle)`. `(Result, busy)` is unreachable: submit is a no-op
/// unless the form is visible and idle.
pub struct FormController {
    client: PredictionClient,
    state: Mutex<ControllerState>,
    events: broadcast::Sender<ControllerEvent>,
    /// The running count-up task, if any. Replaced on each successful
    /// submission and aborted on reset so no stale frames outlive the
    /// result panel.
    count_up: Mutex<Option<JoinHandle<()>>>,
}

impl FormController {
    pub fn new(client: PredictionClient) -> Arc<Self> {
        let (events, _) = broadcast::channel(1024);
        Arc::new(Self {
            client,
            state: Mutex::new(ControllerState::default()),
            events,
            count_up: Mutex::new(None),
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> ControllerState {
        self.state.lock().await.clone()
    }

    pub async fn set_field(&self, name: impl Into<String>, raw: impl Into<String>) {
        self.state.lock().await.fields.set(name, raw);
    }

    /// Serializes the current field values, posts them, and drives the
    /// UI transition. The busy flag is set before the request and
    /// cleared on the single path below the await, so it returns to
    /// idle whether the call succeeded, was rejected, or threw.
    pub async fn submit(self: &Arc<Self>) {
        let request = {
            let mut state = self.state.lock().await;
            if state.busy || state.panel != Panel::Form {
                return;
            }
            state.busy = true;
            state.last_error = None;
            PredictionRequest::from_form(&state.fields)
        };
        let _ = self.events.send(ControllerEvent::SubmitStarted);

        let outcome = self.client.predict(&request).await;

        let mut state = self.state.lock().await;
        state.busy = false;
        match outcome {
            Ok(price) => {
                let rounded = price.round() as i64;
                state.panel = Panel::Result;
                state.last_price = Some(rounded);
                drop(state);
                let _ = self.events.send(ControllerEvent::PredictionReady {
                    price: rounded,
                    rendered: format_thousands(rounded),
                });
                self.spawn_count_up(rounded).await;
            }
            Err(err) => {
                let message = err.user_message();
                warn!("prediction failed: {err}");
                state.last_error = Some(message.clone());
                drop(state);
                let _ = self
                    .events
                    .send(ControllerEvent::PredictionFailed { message });
            }
        }
    }

    /// Returns from the result panel to a cleared form. Idempotent:
    /// from the form panel this only restores the default field values.
    /// Also stops any count-up still running, so no frame broadcast
    /// after `FormRestored` refers to the abandoned result.
    pub async fn reset(&self) {
        if let Some(running) = self.count_up.lock().await.take() {
            running.abort();
        }
        {
            let mut state = self.state.lock().await;
            state.panel = Panel::Form;
            state.fields = FormInput::with_defaults();
            state.last_price = None;
            state.last_error = None;
        }
        let _ = self.events.send(ControllerEvent::FormRestored);
    }

    /// Fire-and-forget startup health probe. Reports through tracing
    /// only; no failure here may affect the form.
    pub fn check_health(self: &Arc<Self>) {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            match controller.client.health().await {
                Ok(health) if health.model_loaded => {
                    info!(
                        model_path = health.model_path.as_deref().unwrap_or("unknown"),
                        "prediction backend healthy, model loaded"
                    );
                }
                Ok(_) => {
                    warn!("prediction backend reachable but no model is loaded");
                }
                Err(err) => {
                    warn!("health check failed (backend may be down): {err}");
                }
            }
        });
    }

    async fn spawn_count_up(self: &Arc<Self>, target: i64) {
        let controller = Arc::clone(self);
        let handle = tokio::spawn(async move {
            animation::run_count_up(target, COUNT_UP_DURATION, FRAME_INTERVAL, |rendered| {
                let _ = controller
                    .events
                    .send(ControllerEvent::PriceFrame { rendered });
            })
            .await;
        });
        if let Some(previous) = self.count_up.lock().await.replace(handle) {
            previous.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
