//! Runtime bridge: owns the form controller on a worker thread and
//! forwards its event stream into the UI queue.

use std::thread;

use client_core::{ControllerEvent, FormController, PredictionClient};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(server_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let controller = FormController::new(PredictionClient::new(server_url));

            let mut events = controller.subscribe_events();
            let ui_tx_forward = ui_tx.clone();
            tokio::spawn(async move {
                while let Ok(event) = events.recv().await {
                    let forwarded = match event {
                        ControllerEvent::PredictionReady { rendered, .. } => {
                            UiEvent::PredictionReady { rendered }
                        }
                        ControllerEvent::PriceFrame { rendered } => {
                            UiEvent::PriceFrame { rendered }
                        }
                        ControllerEvent::PredictionFailed { message } => UiEvent::Error(
                            UiError::from_message(UiErrorContext::Predict, message),
                        ),
                        ControllerEvent::SubmitStarted | ControllerEvent::FormRestored => continue,
                    };
                    let _ = ui_tx_forward.try_send(forwarded);
                }
            });

            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));
            // Startup probe; outcome is logged, never shown to the user.
            controller.check_health();

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Predict { fields } => {
                        for (name, raw) in fields.iter() {
                            controller.set_field(name, raw).await;
                        }
                        controller.submit().await;
                    }
                    BackendCommand::Reset => controller.reset().await,
                }
            }
        });
    });
}
