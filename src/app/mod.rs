pub mod controller;

use crate::dish::wire::{wire_errors_to_form_errors, WireDish};
use crate::services::gateway::SubmitOutcome;
use crate::ui::{AppState, Focus, ToastLevel};
use crate::widgets::json_viewer::JsonViewerWidget;
use tracing::{info, warn};

pub enum AppMsg {
    Submitted { outcome: SubmitOutcome },
    ToggleFocus,
    CopyResponse,
}

pub enum Effect {
    SubmitDish {
        dish: WireDish,
    },
    ShowToast {
        text: String,
        level: ToastLevel,
        seconds: u64,
    },
}

pub fn update(state: &mut AppState, msg: AppMsg) -> Vec<Effect> {
    use AppMsg::*;
    let mut effects: Vec<Effect> = Vec::new();
    match msg {
        Submitted { outcome } => {
            // Clear submitting status
            state.status_text = None;
            state.form.controller.on_submit_complete(&outcome);
            match outcome {
                SubmitOutcome::Success(payload) => {
                    let pretty = serde_json::to_string_pretty(&payload)
                        .unwrap_or_else(|_| payload.to_string());
                    state.response = JsonViewerWidget::from_text("Dish added", pretty);
                    state.form.message = None;
                    effects.push(Effect::ShowToast {
                        text: "Dish added".into(),
                        level: ToastLevel::Success,
                        seconds: 3,
                    });
                }
                SubmitOutcome::ValidationFailure(wire_errors) => {
                    let mapped = wire_errors_to_form_errors(&wire_errors);
                    state.form.message = if mapped.values().any(|m| !m.is_empty()) {
                        Some("Please fix the highlighted errors".into())
                    } else {
                        warn!(
                            keys = ?wire_errors.keys().collect::<Vec<_>>(),
                            "server errors name no form field"
                        );
                        None
                    };
                    effects.push(Effect::ShowToast {
                        text: "Server rejected the dish".into(),
                        level: ToastLevel::Error,
                        seconds: 3,
                    });
                }
                SubmitOutcome::GenericFailure => {
                    state.form.message = None;
                    effects.push(Effect::ShowToast {
                        text: controller::GENERIC_FAILURE_MESSAGE.into(),
                        level: ToastLevel::Error,
                        seconds: 3,
                    });
                }
            }
        }
        ToggleFocus => {
            if !state.form.editing {
                state.focus = match state.focus {
                    Focus::Form => Focus::Response,
                    Focus::Response => Focus::Form,
                };
            }
        }
        CopyResponse => {
            let text = state.response.text.clone();
            if text.is_empty() {
                effects.push(Effect::ShowToast {
                    text: "Nothing to copy yet".into(),
                    level: ToastLevel::Info,
                    seconds: 2,
                });
                return effects;
            }
            match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text)) {
                Ok(()) => {
                    info!("response copied to clipboard");
                    effects.push(Effect::ShowToast {
                        text: "Copied to clipboard!".into(),
                        level: ToastLevel::Info,
                        seconds: 2,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "clipboard unavailable");
                    effects.push(Effect::ShowToast {
                        text: format!("Clipboard unavailable: {e}"),
                        level: ToastLevel::Error,
                        seconds: 3,
                    });
                }
            }
        }
    }
    effects
}
