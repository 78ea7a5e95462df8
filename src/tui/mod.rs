//! Ratatui-based TUI: chat view, memory (concept map) view, status bar.
//!
//! The event loop polls crossterm with a short timeout; network work runs on
//! worker threads (see [`worker`]) and the force layout advances one tick per
//! idle poll, so the UI never blocks and a pending refresh leaves the
//! previous graph visible and interactive.

pub mod widgets;
pub mod worker;

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use miette::IntoDiagnostic;

use crate::client::AgentClient;
use crate::config::ClientConfig;
use crate::graph::{self, AssemblyDiagnostic};
use crate::message::UiMessage;
use crate::refresh::RefreshTracker;
use crate::render::{ForceLayout, RenderAdapter};

use worker::{WorkerEvent, Workers};

/// Which view fills the main area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Chat,
    Memory,
}

/// Latest known backend state, fed by the health poll.
#[derive(Debug, Clone)]
pub enum ConnectionStatus {
    Unknown,
    Healthy { modules_active: Vec<String> },
    Unreachable { error: String },
}

/// Per-launch session identifier sent with every chat turn so the backend
/// can scope its conversation history.
fn new_session_id() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("tui-{}-{secs}", std::process::id())
}

/// TUI application state.
pub struct WeftTui {
    pub(crate) config: ClientConfig,
    workers: Workers,
    pub(crate) base_url: String,
    pub(crate) tab: Tab,
    pub(crate) messages: Vec<UiMessage>,
    pub(crate) input_buffer: String,
    pub(crate) scroll_offset: usize,
    pub(crate) follow_tail: bool,
    pub(crate) connection: ConnectionStatus,
    pub(crate) layout: ForceLayout,
    pub(crate) diagnostics: Vec<AssemblyDiagnostic>,
    pub(crate) awaiting_reply: bool,
    tracker: RefreshTracker,
    memory_viewed: bool,
    session_id: Option<String>,
    should_quit: bool,
}

impl WeftTui {
    pub fn new(config: ClientConfig) -> Self {
        let client = Arc::new(AgentClient::new(&config.backend));
        let base_url = client.base_url().to_string();
        let workers = Workers::new(client);

        Self {
            config,
            workers,
            base_url,
            tab: Tab::Chat,
            messages: vec![UiMessage::system(
                "Connected views: chat (this one) and memory (Tab to switch). \
                 /help for commands, /quit to exit.",
            )],
            input_buffer: String::new(),
            scroll_offset: 0,
            follow_tail: true,
            connection: ConnectionStatus::Unknown,
            layout: ForceLayout::new(),
            diagnostics: Vec::new(),
            awaiting_reply: false,
            tracker: RefreshTracker::new(),
            memory_viewed: false,
            session_id: Some(new_session_id()),
            should_quit: false,
        }
    }

    /// Run the TUI event loop.
    pub fn run(&mut self) -> miette::Result<()> {
        let mut terminal = ratatui::init();

        self.workers
            .spawn_health_poll(Duration::from_secs(self.config.health.poll_interval_secs));

        loop {
            self.drain_worker_events();

            terminal
                .draw(|frame| widgets::render(frame, self))
                .into_diagnostic()?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(100)).into_diagnostic()? {
                if let Event::Key(key) = event::read().into_diagnostic()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    self.handle_key(key.code, key.modifiers);
                }
            } else {
                // Idle tick: advance the layout simulation.
                self.layout.step();
            }
        }

        ratatui::restore();
        Ok(())
    }

    fn push_message(&mut self, msg: UiMessage) {
        self.messages.push(msg);
    }

    /// Drain pending worker results into UI state.
    fn drain_worker_events(&mut self) {
        while let Some(event) = self.workers.try_recv() {
            match event {
                WorkerEvent::ChatReply(reply) => {
                    self.awaiting_reply = false;
                    for line in &reply.logs {
                        self.push_message(UiMessage::log(line));
                    }
                    self.push_message(UiMessage::agent(
                        reply.response,
                        Some(reply.processing_time),
                    ));
                }
                WorkerEvent::ChatFailed { message } => {
                    self.awaiting_reply = false;
                    self.push_message(UiMessage::error_with_help(
                        "chat",
                        message,
                        "the turn was not processed; try again",
                    ));
                }
                WorkerEvent::HealthReport(result) => {
                    self.connection = match result {
                        Ok(check) => ConnectionStatus::Healthy {
                            modules_active: check.modules_active,
                        },
                        Err(error) => ConnectionStatus::Unreachable { error },
                    };
                }
                WorkerEvent::Snapshot { seq, result } => self.apply_snapshot(seq, result),
            }
        }
    }

    fn apply_snapshot(&mut self, seq: u64, result: Result<crate::snapshot::MemorySnapshot, String>) {
        match result {
            Ok(snapshot) => {
                if !self.tracker.try_apply(seq) {
                    return; // superseded by a newer refresh
                }
                let (graph, diagnostics) = graph::build(&snapshot);
                for diag in &diagnostics {
                    self.push_message(UiMessage::system(format!("[memory] {diag}")));
                }
                self.push_message(UiMessage::system(format!(
                    "memory view refreshed: {} concepts, {} links",
                    graph.nodes.len(),
                    graph.edges.len()
                )));
                self.diagnostics = diagnostics;
                self.layout.apply(graph);
            }
            Err(message) => {
                // Settle the sequence bookkeeping; the previous graph stays up.
                let _ = self.tracker.try_apply(seq);
                self.push_message(UiMessage::error_with_help(
                    "memory",
                    message,
                    "showing the last good graph; /refresh to retry",
                ));
            }
        }
    }

    /// Dispatch a new snapshot fetch.
    fn begin_refresh(&mut self) {
        let seq = self.tracker.begin();
        self.workers.fetch_snapshot(seq);
    }

    pub(crate) fn refresh_in_flight(&self) -> bool {
        self.tracker.in_flight()
    }

    fn switch_tab(&mut self) {
        self.tab = match self.tab {
            Tab::Chat => Tab::Memory,
            Tab::Memory => Tab::Chat,
        };
        // First activation of the memory view triggers its initial refresh.
        if self.tab == Tab::Memory && !self.memory_viewed {
            self.memory_viewed = true;
            self.begin_refresh();
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Enter => {
                let input = self.input_buffer.trim().to_string();
                self.input_buffer.clear();
                if input.is_empty() {
                    return;
                }
                self.process_input(&input);
            }
            KeyCode::Tab => self.switch_tab(),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::PageUp => {
                self.follow_tail = false;
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
            }
            KeyCode::PageDown => {
                self.scroll_offset =
                    (self.scroll_offset + 10).min(self.messages.len().saturating_sub(1));
            }
            KeyCode::Home => {
                self.follow_tail = false;
                self.scroll_offset = 0;
            }
            KeyCode::End => {
                self.follow_tail = true;
            }
            KeyCode::Esc => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn process_input(&mut self, input: &str) {
        if let Some(command) = input.strip_prefix('/') {
            self.run_command(command);
            return;
        }

        self.push_message(UiMessage::user(input));
        self.awaiting_reply = true;
        self.workers.send_chat(
            input.to_string(),
            self.session_id.clone(),
            self.config.modules.clone(),
        );
    }

    fn run_command(&mut self, command: &str) {
        let mut parts = command.split_whitespace();
        match parts.next() {
            Some("help") => {
                self.push_message(UiMessage::system(
                    "commands: /refresh (reload memory view), /modules (list toggles), \
                     /module <name> on|off, /status, /quit",
                ));
            }
            Some("quit") => self.should_quit = true,
            Some("refresh") => {
                self.begin_refresh();
                self.push_message(UiMessage::system("refreshing memory view..."));
            }
            Some("modules") => {
                let listing: Vec<String> = self
                    .config
                    .modules
                    .iter()
                    .map(|(name, on)| format!("{name}={}", if on { "on" } else { "off" }))
                    .collect();
                self.push_message(UiMessage::system(format!("modules: {}", listing.join(" "))));
            }
            Some("module") => {
                let (name, state) = (parts.next(), parts.next());
                self.toggle_module(name, state);
            }
            Some("status") => {
                let status = match &self.connection {
                    ConnectionStatus::Unknown => "checking...".to_string(),
                    ConnectionStatus::Healthy { modules_active } => {
                        format!("healthy (active: {})", modules_active.join(", "))
                    }
                    ConnectionStatus::Unreachable { error } => {
                        format!("unreachable ({error})")
                    }
                };
                self.push_message(UiMessage::system(format!(
                    "backend {} :: {status}",
                    self.base_url
                )));
            }
            _ => {
                self.push_message(UiMessage::error(
                    "command",
                    format!("unknown command: /{command} (try /help)"),
                ));
            }
        }
    }

    fn toggle_module(&mut self, name: Option<&str>, state: Option<&str>) {
        let (Some(name), Some(state)) = (name, state) else {
            self.push_message(UiMessage::error("command", "usage: /module <name> on|off"));
            return;
        };
        let enabled = match state {
            "on" => true,
            "off" => false,
            _ => {
                self.push_message(UiMessage::error("command", "usage: /module <name> on|off"));
                return;
            }
        };
        match self.config.modules.set(name, enabled) {
            Ok(()) => self.push_message(UiMessage::system(format!(
                "module {name} {state} (session only; `weft modules` persists)"
            ))),
            Err(e) => self.push_message(UiMessage::error("module", e.to_string())),
        }
    }
}
