use crate::app::{update, AppMsg, Effect};
use crate::model::AppConfig;
use crate::services::gateway::{spawn_submit, HttpGateway, SubmissionGateway, SubmitOutcome};
use crate::widgets::dish_form::DishFormWidget;
use crate::widgets::header::draw_header;
use crate::widgets::json_viewer::JsonViewerWidget;
use crate::widgets::status_bar::draw_footer;
use crate::widgets::Widget;
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const TICK_RATE: Duration = Duration::from_millis(200);

fn run_effects(state: &mut AppState, effects: Vec<Effect>) {
    for eff in effects {
        match eff {
            Effect::SubmitDish { dish } => match (&state.gateway, &state.tx) {
                (Some(gw), Some(tx)) => {
                    debug!(dish_type = %dish.dish_type(), "submitting dish");
                    state.status_text = Some("Submitting...".into());
                    spawn_submit(Arc::clone(gw), dish, tx.clone());
                }
                _ => {
                    warn!("no gateway configured; submission dropped");
                    let effs = update(
                        state,
                        AppMsg::Submitted {
                            outcome: SubmitOutcome::GenericFailure,
                        },
                    );
                    run_effects(state, effs);
                }
            },
            Effect::ShowToast {
                text,
                level,
                seconds,
            } => {
                let ticks = seconds.saturating_mul(5); // ~200ms tick
                let exp = state.tick.saturating_add(ticks);
                state.toast = Some(Toast {
                    text,
                    level,
                    expires_at_tick: exp,
                });
            }
        }
    }
}

#[derive(Default)]
pub(crate) struct AppState {
    pub(crate) config: AppConfig,
    pub(crate) form: DishFormWidget,
    pub(crate) response: JsonViewerWidget,
    pub(crate) focus: Focus,
    pub(crate) tick: u64,
    // Spinner text while a submission is in flight
    pub(crate) status_text: Option<String>,
    pub(crate) toast: Option<Toast>,
    pub(crate) theme: crate::theme::Theme,
    gateway: Option<Arc<dyn SubmissionGateway>>,
    tx: Option<Sender<SubmitOutcome>>,
    rx: Option<Receiver<SubmitOutcome>>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    #[default]
    Form,
    Response,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    pub expires_at_tick: u64,
}

impl AppState {
    fn with_gateway(config: AppConfig, gateway: Arc<dyn SubmissionGateway>) -> Self {
        let (tx, rx) = mpsc::channel::<SubmitOutcome>();
        Self {
            form: DishFormWidget::new(config.title.clone()),
            config,
            gateway: Some(gateway),
            tx: Some(tx),
            rx: Some(rx),
            ..Default::default()
        }
    }

    fn focused_widget(&mut self) -> &mut dyn Widget {
        match self.focus {
            Focus::Form => &mut self.form,
            Focus::Response => &mut self.response,
        }
    }
}

/// Apply every finished submission reported by the worker thread.
fn pump_outcomes(state: &mut AppState) -> usize {
    let mut drained: Vec<SubmitOutcome> = Vec::new();
    if let Some(rx) = &state.rx {
        while let Ok(outcome) = rx.try_recv() {
            drained.push(outcome);
        }
    }
    let n = drained.len();
    for outcome in drained {
        let effects = update(state, AppMsg::Submitted { outcome });
        run_effects(state, effects);
    }
    n
}

/// Route one key press. Returns true when the app should quit.
fn handle_key(state: &mut AppState, key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    let editing = state.form.editing;
    let effects = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            update(state, AppMsg::CopyResponse)
        }
        KeyCode::Tab | KeyCode::BackTab => update(state, AppMsg::ToggleFocus),
        KeyCode::Char('q') | KeyCode::Esc if !editing => return true,
        code => state.focused_widget().on_key(code),
    };
    run_effects(state, effects);
    false
}

/// One-line JSON report printed at the end of a headless run.
fn smoke_summary(state: &AppState, outcomes_seen: usize) -> serde_json::Value {
    let ctl = &state.form.controller;
    serde_json::json!({
        "ok": ctl.api_error.is_none(),
        "dish_type": ctl.values.dish_type.as_str(),
        "errors": ctl.errors.len(),
        "submitting": ctl.submitting,
        "outcomes_seen": outcomes_seen,
        "response_present": !state.response.text.is_empty(),
    })
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

pub fn run(cfg: AppConfig) -> Result<()> {
    let gateway = HttpGateway::new(cfg.endpoint.clone(), cfg.timeout())
        .context("building HTTP client")?;
    info!(endpoint = %gateway.endpoint(), "dish-tui starting");
    let mut state = AppState::with_gateway(cfg, Arc::new(gateway));
    // Headless smoke mode
    let headless = env_flag("DISH_TUI_HEADLESS");
    let headless_ticks: u64 = std::env::var("DISH_TUI_TICKS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(10);
    let headless_summary = env_flag("DISH_TUI_SMOKE_SUMMARY");
    if headless {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend)?;
        let mut outcomes_seen = 0usize;
        for _ in 0..headless_ticks {
            terminal.draw(|f| ui(f, &mut state))?;
            outcomes_seen += pump_outcomes(&mut state);
            state.tick = state.tick.wrapping_add(1);
            std::thread::sleep(TICK_RATE);
        }
        if headless_summary {
            println!("{}", smoke_summary(&state, outcomes_seen));
        }
        return Ok(());
    }
    // Setup terminal (interactive)
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut last_tick = Instant::now();
    let res: Result<()> = loop {
        if let Err(e) = terminal.draw(|f| ui(f, &mut state)) {
            break Err(e.into());
        }
        let timeout = TICK_RATE
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));
        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => {
                    if handle_key(&mut state, key) {
                        break Ok(());
                    }
                }
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            },
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }
        pump_outcomes(&mut state);
        if last_tick.elapsed() >= TICK_RATE {
            state.tick = state.tick.wrapping_add(1);
            last_tick = Instant::now();
        }
    };
    // Restore
    disable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("dish-tui exiting");
    res
}

fn help_text(state: &AppState) -> &'static str {
    match state.focus {
        Focus::Form if state.form.editing => "type to edit  ↑/↓ step numbers  Enter/Esc done",
        Focus::Form => "↑/↓ move  Enter edit/select  ←/→ type  Tab response  q quit",
        Focus::Response => "↑/↓ scroll  PgUp/PgDn  Home/End  w wrap  ^C copy  Tab form  q quit",
    }
}

fn ui(f: &mut Frame, state: &mut AppState) {
    // Clear expired toast
    if let Some(t) = &state.toast {
        if state.tick >= t.expires_at_tick {
            state.toast = None;
        }
    }

    let screen = f.area();
    let bg = Block::default().style(Style::default().bg(state.theme.bg));
    f.render_widget(bg, screen);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(screen);
    draw_header(f, chunks[0], state);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);
    let tick = state.tick;
    let focus = state.focus;
    state.form.render(f, panes[0], focus == Focus::Form, tick);
    state
        .response
        .render(f, panes[1], focus == Focus::Response, tick);

    draw_footer(f, chunks[2], state, help_text(state));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dish::wire::WireDish;

    struct FixedGateway(SubmitOutcome);

    impl SubmissionGateway for FixedGateway {
        fn submit(&self, _dish: &WireDish) -> SubmitOutcome {
            self.0.clone()
        }
    }

    fn press(state: &mut AppState, code: KeyCode) -> bool {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_into_selected(state: &mut AppState, text: &str) {
        press(state, KeyCode::Enter);
        for c in text.chars() {
            press(state, KeyCode::Char(c));
        }
        press(state, KeyCode::Enter);
    }

    #[test]
    fn q_quits_only_outside_edit_mode() {
        let mut st = AppState::default();
        press(&mut st, KeyCode::Enter);
        assert!(st.form.editing);
        assert!(!press(&mut st, KeyCode::Char('q')));
        assert_eq!(st.form.controller.values.name, "q");
        assert!(!press(&mut st, KeyCode::Esc));
        assert!(!st.form.editing);
        assert!(press(&mut st, KeyCode::Char('q')));
    }

    #[test]
    fn tab_routes_keys_to_response_pane() {
        let mut st = AppState::default();
        press(&mut st, KeyCode::Tab);
        assert_eq!(st.focus, Focus::Response);
        press(&mut st, KeyCode::Char('w'));
        assert!(st.response.wrap);
        assert!(!st.form.editing);
    }

    #[test]
    fn save_round_trip_through_worker() {
        let gw: Arc<dyn SubmissionGateway> = Arc::new(FixedGateway(SubmitOutcome::Success(
            serde_json::json!({"id": 1}),
        )));
        let mut st = AppState::with_gateway(AppConfig::default(), gw);
        type_into_selected(&mut st, "Pasta");
        press(&mut st, KeyCode::Down);
        type_into_selected(&mut st, "00:20:00");
        st.form.selected = st.form.save_index();
        press(&mut st, KeyCode::Enter);
        assert_eq!(st.status_text.as_deref(), Some("Submitting..."));
        assert!(st.form.controller.submitting);
        let deadline = Instant::now() + Duration::from_secs(5);
        while pump_outcomes(&mut st) == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(!st.form.controller.submitting);
        assert!(st.status_text.is_none());
        assert!(st.response.text.contains("\"id\": 1"));
        assert_eq!(
            st.toast.as_ref().map(|t| t.level),
            Some(ToastLevel::Success)
        );
    }

    #[test]
    fn submit_without_gateway_fails_generically() {
        let mut st = AppState::default();
        run_effects(
            &mut st,
            vec![Effect::SubmitDish {
                dish: WireDish::Sandwich {
                    base: crate::dish::wire::WireBase {
                        name: "Club".into(),
                        preparation_time: "00:05:00".into(),
                    },
                    slices_of_bread: 2.into(),
                },
            }],
        );
        assert!(st.form.controller.api_error.is_some());
        assert!(st.status_text.is_none());
    }

    #[test]
    fn toast_expires_after_its_ticks() {
        let mut st = AppState::default();
        run_effects(
            &mut st,
            vec![Effect::ShowToast {
                text: "Reset".into(),
                level: ToastLevel::Info,
                seconds: 1,
            }],
        );
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, &mut st)).unwrap();
        assert!(st.toast.is_some());
        st.tick = 5;
        terminal.draw(|f| ui(f, &mut st)).unwrap();
        assert!(st.toast.is_none());
    }

    #[test]
    fn smoke_summary_reports_form_and_response() {
        let mut st = AppState::default();
        assert_eq!(
            smoke_summary(&st, 0),
            serde_json::json!({
                "ok": true,
                "dish_type": "pizza",
                "errors": 2,
                "submitting": false,
                "outcomes_seen": 0,
                "response_present": false,
            })
        );
        press(&mut st, KeyCode::Down);
        press(&mut st, KeyCode::Down);
        press(&mut st, KeyCode::Right);
        let _ = update(
            &mut st,
            AppMsg::Submitted {
                outcome: SubmitOutcome::GenericFailure,
            },
        );
        let summary = smoke_summary(&st, 1);
        assert_eq!(summary["ok"], false);
        assert_eq!(summary["dish_type"], "soup");
        assert_eq!(summary["outcomes_seen"], 1);
        assert_eq!(summary["response_present"], false);
    }
}
