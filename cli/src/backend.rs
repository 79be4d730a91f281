//! Demo host: slash commands and a simulated assistant that echoes input.

use std::time::{Duration, Instant};

use weft_engine::{
    CommandRegistry, ConfirmationDialog, DiffPayload, MessageMeta, ProcessingStatus, Role,
    Session, SessionHandler, SpecialKey,
};

const REPLY_DELAY: Duration = Duration::from_millis(800);
/// Elapsed-time refresh while a reply is pending; drives the spinner. Must
/// outlast the redraw debounce or each refresh postpones the previous frame.
const ACTIVITY_TICK: Duration = Duration::from_millis(250);

const SAMPLE_DIFF: &str = "\
@@ -1,3 +1,3 @@
 fn main() {
-    println!(\"hello\");
+    println!(\"hello, weft\");
 }";

/// Parsed slash command with typed arguments.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Help,
    Clear,
    Model(Option<&'a str>),
    File(Option<&'a str>),
    Mcp(Option<&'a str>),
    Confirm,
    Quit,
    Unknown(&'a str),
    Empty,
}

impl<'a> Command<'a> {
    fn parse(raw: &'a str) -> Self {
        let raw = raw.trim();
        let (name, rest) = raw.split_once(char::is_whitespace).unwrap_or((raw, ""));
        let arg = Some(rest.trim()).filter(|s| !s.is_empty());
        match name.to_ascii_lowercase().as_str() {
            "" => Command::Empty,
            "help" | "?" => Command::Help,
            "clear" => Command::Clear,
            "model" => Command::Model(arg),
            "file" => Command::File(arg),
            "mcp" => Command::Mcp(arg),
            "confirm" => Command::Confirm,
            "q" | "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(name),
        }
    }
}

#[derive(Debug)]
struct PendingReply {
    text: String,
    started: Instant,
    due: Instant,
}

#[derive(Debug)]
pub struct DemoBackend {
    registry: CommandRegistry,
    pending: Option<PendingReply>,
    awaiting_confirmation: bool,
    tokens: u64,
    quit: bool,
}

impl DemoBackend {
    pub fn new(prefix: &str) -> Self {
        Self {
            registry: CommandRegistry::builtin(prefix),
            pending: None,
            awaiting_confirmation: false,
            tokens: 0,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// When [`DemoBackend::tick`] next has work to do.
    pub fn deadline(&self, now: Instant) -> Option<Instant> {
        self.pending
            .as_ref()
            .map(|reply| reply.due.min(now + ACTIVITY_TICK))
    }

    pub fn tick(&mut self, session: &mut Session, now: Instant) {
        let Some(reply) = self.pending.take_if(|reply| now >= reply.due) else {
            if let Some(reply) = &self.pending {
                session.set_processing(
                    ProcessingStatus::Thinking,
                    Some(now.saturating_duration_since(reply.started)),
                );
            }
            return;
        };
        self.tokens += estimate_tokens(&reply.text);
        session.add_message(Role::Assistant, reply.text, MessageMeta::default());
        session.set_token_count(Some(self.tokens));
        session.set_processing(ProcessingStatus::Idle, None);
    }

    fn run_command(&mut self, session: &mut Session, command: Command<'_>) {
        match command {
            Command::Help => {
                session.add_message(Role::System, self.registry.help_summary(), MessageMeta::default());
            }
            Command::Clear => {
                session.clear_messages();
                session.request_full_redraw();
            }
            Command::Model(Some(name)) => {
                session.set_model(name);
                tracing::info!(model = name, "model changed");
            }
            Command::Model(None) => self.usage(session, "model"),
            Command::File(path) => session.set_active_file(path.map(str::to_owned)),
            Command::Mcp(status) => session.set_mcp_status(status.map(str::to_owned)),
            Command::Confirm => {
                let dialog = ConfirmationDialog::new(
                    "Apply edit?",
                    "src/main.rs",
                    ["Yes", "No", "Always"],
                )
                .with_diff(DiffPayload::new(SAMPLE_DIFF));
                self.awaiting_confirmation = true;
                session.show_confirmation(dialog);
            }
            Command::Quit => {
                self.quit = true;
                session.request_release();
            }
            Command::Unknown(name) => {
                let text = format!("Unknown command: {}{name}", self.registry.prefix());
                session.add_message(Role::System, text, MessageMeta::default());
            }
            Command::Empty => {}
        }
    }

    fn usage(&self, session: &mut Session, name: &str) {
        if let Some(spec) = self.registry.specs().iter().find(|spec| spec.name == name) {
            let text = format!("Usage: {}{}", self.registry.prefix(), spec.usage);
            session.add_message(Role::System, text, MessageMeta::default());
        }
    }

    fn start_reply(&mut self, session: &mut Session, line: &str) {
        session.add_message(Role::User, line, MessageMeta::default());
        self.tokens += estimate_tokens(line);
        let now = Instant::now();
        self.pending = Some(PendingReply {
            text: format!("echo: {line}"),
            started: now,
            due: now + REPLY_DELAY,
        });
        session.set_token_count(Some(self.tokens));
        session.set_processing(ProcessingStatus::Thinking, Some(Duration::ZERO));
    }
}

impl SessionHandler for DemoBackend {
    fn on_completed_line(&mut self, session: &mut Session, line: &str) {
        if std::mem::take(&mut self.awaiting_confirmation) {
            let outcome = format!("Edit answer: {line}");
            session.add_message(Role::Tool, outcome, MessageMeta::tool("edit").with_file("src/main.rs"));
            return;
        }
        match line.strip_prefix(self.registry.prefix()) {
            Some(raw) if !self.registry.prefix().is_empty() => {
                let command = Command::parse(raw);
                self.run_command(session, command);
            }
            _ => self.start_reply(session, line),
        }
    }

    fn on_special_key(&mut self, session: &mut Session, key: SpecialKey) {
        tracing::debug!(key = key.as_str(), "special key");
        match key {
            SpecialKey::Interrupt => {
                if self.pending.take().is_some() {
                    session.set_processing(ProcessingStatus::Idle, None);
                    session.add_message(Role::System, "Reply cancelled", MessageMeta::default());
                } else {
                    self.quit = true;
                    session.request_release();
                }
            }
            SpecialKey::Cancel => {
                self.awaiting_confirmation = false;
                self.pending = None;
            }
            SpecialKey::Toggle => {
                let mode = if session.state().auto_edit() { "on" } else { "off" };
                tracing::info!(mode, "auto-edit toggled");
            }
            SpecialKey::Redraw => {}
        }
    }
}

fn estimate_tokens(text: &str) -> u64 {
    text.split_whitespace().count() as u64 * 4 / 3 + 1
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use weft_engine::{Key, ProcessingStatus, Role, Session, SessionOptions};

    use super::{ACTIVITY_TICK, Command, DemoBackend, REPLY_DELAY};

    fn type_line(session: &mut Session, backend: &mut DemoBackend, line: &str) {
        for c in line.chars() {
            session.handle_key(Key::Char(c), backend);
        }
        session.hide_suggestions();
        session.handle_key(Key::Enter, backend);
    }

    fn setup() -> (Session, DemoBackend) {
        (Session::new(SessionOptions::default()), DemoBackend::new("/"))
    }

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("Q"), Command::Quit);
        assert_eq!(Command::parse("model"), Command::Model(None));
        assert_eq!(Command::parse("model  gpt-x "), Command::Model(Some("gpt-x")));
        assert_eq!(Command::parse("file src/a b.rs"), Command::File(Some("src/a b.rs")));
        assert_eq!(Command::parse("nope"), Command::Unknown("nope"));
        assert_eq!(Command::parse(""), Command::Empty);
    }

    #[test]
    fn plain_line_is_echoed_after_delay() {
        let (mut session, mut backend) = setup();
        type_line(&mut session, &mut backend, "hello");
        assert_eq!(session.state().status(), ProcessingStatus::Thinking);
        assert_eq!(session.state().messages().len(), 1);

        backend.tick(&mut session, Instant::now() + REPLY_DELAY + Duration::from_millis(1));
        let last = session.state().messages().last().unwrap();
        assert_eq!(last.role(), Role::Assistant);
        assert_eq!(last.content(), "echo: hello");
        assert_eq!(session.state().status(), ProcessingStatus::Idle);
        assert!(session.state().token_count().is_some());
        assert!(!backend.is_busy());
    }

    #[test]
    fn piped_line_with_open_quote_is_still_sent() {
        let (mut session, mut backend) = setup();
        session.submit_line("don't stop", &mut backend);
        let last = session.state().messages().last().unwrap();
        assert_eq!(last.role(), Role::User);
        assert_eq!(last.content(), "don't stop");
        assert!(backend.is_busy());
        assert_eq!(session.editor().buffer().text(), "");
    }

    #[test]
    fn activity_tick_lands_after_the_pending_frame() {
        let (mut session, mut backend) = setup();
        type_line(&mut session, &mut backend, "hello");
        let redraw_at = session.redraw_deadline().unwrap();
        let tick_at = backend.deadline(Instant::now()).unwrap();
        assert!(tick_at > redraw_at);
        assert!(ACTIVITY_TICK > SessionOptions::default().debounce);

        assert!(session.poll_redraw(redraw_at).is_some());
        backend.tick(&mut session, tick_at);
        assert!(session.redraw_deadline().is_some());
    }

    #[test]
    fn interrupt_cancels_then_quits() {
        let (mut session, mut backend) = setup();
        type_line(&mut session, &mut backend, "hello");
        session.handle_key(Key::Interrupt, &mut backend);
        assert!(!backend.is_busy());
        assert!(!backend.should_quit());
        assert_eq!(session.state().status(), ProcessingStatus::Idle);

        session.handle_key(Key::Interrupt, &mut backend);
        assert!(backend.should_quit());
        assert!(session.release_requested());
    }

    #[test]
    fn commands_update_header_state() {
        let (mut session, mut backend) = setup();
        type_line(&mut session, &mut backend, "/model gpt-x");
        type_line(&mut session, &mut backend, "/file src/lib.rs");
        type_line(&mut session, &mut backend, "/mcp 2 servers");
        assert_eq!(session.state().model(), "gpt-x");
        assert_eq!(session.state().active_file(), Some("src/lib.rs"));
        assert_eq!(session.state().mcp_status(), Some("2 servers"));
        assert!(session.state().messages().is_empty());
    }

    #[test]
    fn confirm_answer_is_reported_as_tool_message() {
        let (mut session, mut backend) = setup();
        type_line(&mut session, &mut backend, "/confirm");
        assert!(session.state().dialog().is_some());
        session.handle_key(Key::Char('2'), &mut backend);
        assert!(session.state().dialog().is_none());
        let last = session.state().messages().last().unwrap();
        assert_eq!(last.tool_name(), Some("edit"));
        assert_eq!(last.content(), "Edit answer: No");
    }

    #[test]
    fn escape_cancels_dialog_without_answer() {
        let (mut session, mut backend) = setup();
        type_line(&mut session, &mut backend, "/confirm");
        session.handle_key(Key::Escape, &mut backend);
        assert!(session.state().dialog().is_none());
        type_line(&mut session, &mut backend, "hi");
        assert_eq!(session.state().messages().last().unwrap().role(), Role::User);
    }

    #[test]
    fn unknown_command_and_help_report_system_messages() {
        let (mut session, mut backend) = setup();
        type_line(&mut session, &mut backend, "/bogus");
        type_line(&mut session, &mut backend, "/help");
        let messages = session.state().messages();
        assert_eq!(messages[0].content(), "Unknown command: /bogus");
        assert!(messages[1].content().contains("/quit"));
    }

    #[test]
    fn quit_command_requests_release() {
        let (mut session, mut backend) = setup();
        type_line(&mut session, &mut backend, "/quit");
        assert!(backend.should_quit());
        assert!(session.release_requested());
    }
}
