//! Terminal desktop app backed by the shared virtual file system.
//!
//! Each terminal window keeps a [`TerminalWindowState`] (shell session plus transcript) as its
//! mount state. The runtime forwards submitted lines to [`TerminalApp::submit`] and applies the
//! returned [`TerminalEffect`]s.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod commands;
pub mod completion;
pub mod session;

use desktop_app_contract::{
    AppInitError, AppServices, AppTemplate, ContentMount, MergedWindowOptions, WindowOptions,
};
use platform_host::{VfsEntryKind, VirtualFileSystem};
use serde::{Deserialize, Serialize};

pub use commands::{execute, CommandContext, CommandOutput, TerminalEffect};
pub use completion::{complete, Completion};
pub use session::TerminalSessionState;

/// Registry key for terminal windows.
pub const TERMINAL_APP_TYPE: &str = "terminal";
const MAX_TERMINAL_ENTRIES: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
/// One line of terminal transcript.
pub enum TerminalTranscriptEntry {
    /// Echo of a submitted command.
    Prompt {
        /// Prompt shown when the command was submitted.
        prompt: String,
        /// Submitted command line.
        command: String,
    },
    /// Normal command output.
    Stdout {
        /// Output text (may span several lines).
        text: String,
    },
    /// Error output.
    Stderr {
        /// Output text.
        text: String,
    },
    /// Informational message from the terminal itself.
    System {
        /// Output text.
        text: String,
    },
}

impl TerminalTranscriptEntry {
    /// Text payload (the command for prompt entries).
    pub fn text(&self) -> &str {
        match self {
            Self::Prompt { command, .. } => command,
            Self::Stdout { text } | Self::Stderr { text } | Self::System { text } => text,
        }
    }
}

fn default_terminal_transcript() -> Vec<TerminalTranscriptEntry> {
    vec![
        TerminalTranscriptEntry::System {
            text: "Welcome to Terminal".to_string(),
        },
        TerminalTranscriptEntry::System {
            text: "Type 'help' to see available commands.".to_string(),
        },
    ]
}

fn normalize_terminal_transcript(transcript: &mut Vec<TerminalTranscriptEntry>) {
    if transcript.len() > MAX_TERMINAL_ENTRIES {
        let overflow = transcript.len() - MAX_TERMINAL_ENTRIES;
        transcript.drain(0..overflow);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// State stored in a terminal window's [`ContentMount`].
pub struct TerminalWindowState {
    /// Shell session.
    pub session: TerminalSessionState,
    /// Visible transcript, oldest first.
    pub transcript: Vec<TerminalTranscriptEntry>,
}

impl Default for TerminalWindowState {
    fn default() -> Self {
        Self {
            session: TerminalSessionState::default(),
            transcript: default_terminal_transcript(),
        }
    }
}

impl TerminalWindowState {
    /// Renders the transcript followed by the live prompt.
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = self
            .transcript
            .iter()
            .map(|entry| match entry {
                TerminalTranscriptEntry::Prompt { prompt, command } => {
                    format!("{prompt} {command}")
                }
                other => other.text().to_string(),
            })
            .collect();
        lines.push(self.session.prompt());
        lines.join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Direction of a history recall key press.
pub enum HistoryDirection {
    /// Arrow up.
    Previous,
    /// Arrow down.
    Next,
}

#[derive(Debug, Clone, Copy, Default)]
/// Terminal window template.
pub struct TerminalApp;

impl TerminalApp {
    fn load(mount: &ContentMount) -> TerminalWindowState {
        mount.load_state().unwrap_or_default()
    }

    fn store(mount: &mut ContentMount, state: &TerminalWindowState) -> Result<(), AppInitError> {
        mount.save_state(state)?;
        mount.set_body(state.render());
        Ok(())
    }

    /// Runs one submitted line in the window's session.
    ///
    /// The line is echoed with the current prompt, executed, and recorded in history; its output
    /// is appended to the transcript. `clear` is applied here; window-opening effects are returned
    /// for the host to perform.
    ///
    /// # Errors
    ///
    /// Returns an error when the updated state cannot be stored in the mount.
    pub fn submit(
        mount: &mut ContentMount,
        line: &str,
        ctx: &mut CommandContext<'_>,
    ) -> Result<Vec<TerminalEffect>, AppInitError> {
        let mut state = Self::load(mount);
        let line = line.trim();
        if line.is_empty() {
            return Ok(Vec::new());
        }

        state.transcript.push(TerminalTranscriptEntry::Prompt {
            prompt: state.session.prompt(),
            command: line.to_string(),
        });

        let output = execute(line, &mut state.session, ctx);
        state.session.record(line);
        state.transcript.extend(output.lines);

        let mut host_effects = Vec::new();
        for effect in output.effects {
            match effect {
                TerminalEffect::ClearScreen => state.transcript.clear(),
                other => host_effects.push(other),
            }
        }
        normalize_terminal_transcript(&mut state.transcript);

        Self::store(mount, &state)?;
        Ok(host_effects)
    }

    /// Moves the history cursor and returns the line to show in the input, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the updated state cannot be stored in the mount.
    pub fn recall(
        mount: &mut ContentMount,
        direction: HistoryDirection,
    ) -> Result<Option<String>, AppInitError> {
        let mut state = Self::load(mount);
        let recalled = match direction {
            HistoryDirection::Previous => state.session.recall_previous(),
            HistoryDirection::Next => state.session.recall_next(),
        };
        mount.save_state(&state)?;
        Ok(recalled)
    }

    /// Completes `input` against the window's working directory.
    pub fn complete(mount: &ContentMount, input: &str, vfs: &VirtualFileSystem) -> Completion {
        complete(input, &Self::load(mount).session, vfs)
    }

    /// Current session of a terminal mount.
    pub fn session(mount: &ContentMount) -> TerminalSessionState {
        Self::load(mount).session
    }
}

impl AppTemplate for TerminalApp {
    fn title(&self, _options: &WindowOptions) -> String {
        "Terminal".to_string()
    }

    fn default_size(&self) -> (i32, i32) {
        (500, 300)
    }

    fn init_content(
        &self,
        mount: &mut ContentMount,
        options: &MergedWindowOptions,
        services: &mut AppServices<'_>,
    ) -> Result<(), AppInitError> {
        let mut state = TerminalWindowState::default();
        if let Some(cwd) = options.param_str("cwd") {
            let resolved = VirtualFileSystem::resolve(cwd, &state.session.cwd);
            match services.vfs.stat(&resolved) {
                Ok(meta) if meta.kind == VfsEntryKind::Directory => state.session.cwd = resolved,
                _ => {
                    return Err(AppInitError::InvalidParam {
                        param: "cwd".to_string(),
                        reason: format!("{resolved} is not a directory"),
                    })
                }
            }
        }
        tracing::debug!(window_id = mount.window_id, cwd = %state.session.cwd, "terminal session started");
        Self::store(mount, &state)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::Map;

    use super::*;

    fn merged(params: Map<String, serde_json::Value>) -> MergedWindowOptions {
        MergedWindowOptions {
            top: 0,
            left: 0,
            width: 500,
            height: 300,
            title: "Terminal".to_string(),
            params,
        }
    }

    fn started(vfs: &mut VirtualFileSystem) -> ContentMount {
        let mut mount = ContentMount::new(1, TERMINAL_APP_TYPE);
        let mut services = AppServices { vfs, now_ms: 0 };
        TerminalApp
            .init_content(&mut mount, &merged(Map::new()), &mut services)
            .expect("init");
        mount
    }

    #[test]
    fn init_renders_welcome_banner_and_prompt() {
        let mut vfs = VirtualFileSystem::in_memory();
        let mount = started(&mut vfs);
        assert_eq!(
            mount.body,
            "Welcome to Terminal\nType 'help' to see available commands.\nuser@localhost:~$"
        );
        assert_eq!(TerminalApp::session(&mount).cwd, "/home/user");
    }

    #[test]
    fn init_rejects_cwd_that_is_not_a_directory() {
        let mut vfs = VirtualFileSystem::in_memory();
        let mut mount = ContentMount::new(1, TERMINAL_APP_TYPE);
        let mut services = AppServices {
            vfs: &mut vfs,
            now_ms: 0,
        };
        let options = WindowOptions::default().with_param("cwd", "/bin/hello");
        let err = TerminalApp
            .init_content(&mut mount, &merged(options.params), &mut services)
            .expect_err("file cwd");
        assert!(matches!(err, AppInitError::InvalidParam { .. }));
    }

    #[test]
    fn submit_echoes_prompt_and_output() {
        let mut vfs = VirtualFileSystem::in_memory();
        let mut mount = started(&mut vfs);
        let mut ctx = CommandContext {
            vfs: &mut vfs,
            windows: &[],
            now_ms: 0,
        };
        TerminalApp::submit(&mut mount, "cd Documents", &mut ctx).expect("cd");
        TerminalApp::submit(&mut mount, "pwd", &mut ctx).expect("pwd");

        let body_lines: Vec<&str> = mount.body.lines().collect();
        assert_eq!(
            &body_lines[2..],
            &[
                "user@localhost:~$ cd Documents",
                "user@localhost:~/Documents$ pwd",
                "/home/user/Documents",
                "user@localhost:~/Documents$",
            ]
        );
    }

    #[test]
    fn clear_drops_transcript_but_keeps_history() {
        let mut vfs = VirtualFileSystem::in_memory();
        let mut mount = started(&mut vfs);
        let mut ctx = CommandContext {
            vfs: &mut vfs,
            windows: &[],
            now_ms: 0,
        };
        TerminalApp::submit(&mut mount, "echo hi", &mut ctx).expect("echo");
        let effects = TerminalApp::submit(&mut mount, "clear", &mut ctx).expect("clear");

        assert!(effects.is_empty());
        assert_eq!(mount.body, "user@localhost:~$");
        assert_eq!(
            TerminalApp::session(&mount).history,
            vec!["echo hi", "clear"]
        );
    }

    #[test]
    fn recall_persists_cursor_in_mount() {
        let mut vfs = VirtualFileSystem::in_memory();
        let mut mount = started(&mut vfs);
        let mut ctx = CommandContext {
            vfs: &mut vfs,
            windows: &[],
            now_ms: 0,
        };
        TerminalApp::submit(&mut mount, "pwd", &mut ctx).expect("pwd");
        TerminalApp::submit(&mut mount, "ls", &mut ctx).expect("ls");

        assert_eq!(
            TerminalApp::recall(&mut mount, HistoryDirection::Previous).expect("recall"),
            Some("ls".to_string())
        );
        assert_eq!(
            TerminalApp::recall(&mut mount, HistoryDirection::Previous).expect("recall"),
            Some("pwd".to_string())
        );
        assert_eq!(
            TerminalApp::recall(&mut mount, HistoryDirection::Next).expect("recall"),
            Some("ls".to_string())
        );
    }

    #[test]
    fn repeated_commands_each_enter_history() {
        let mut vfs = VirtualFileSystem::in_memory();
        let mut mount = started(&mut vfs);
        let mut ctx = CommandContext {
            vfs: &mut vfs,
            windows: &[],
            now_ms: 0,
        };
        TerminalApp::submit(&mut mount, "ls", &mut ctx).expect("ls");
        TerminalApp::submit(&mut mount, "ls", &mut ctx).expect("ls again");

        assert_eq!(TerminalApp::session(&mount).history, vec!["ls", "ls"]);
        for _ in 0..2 {
            assert_eq!(
                TerminalApp::recall(&mut mount, HistoryDirection::Previous).expect("recall"),
                Some("ls".to_string())
            );
        }
        assert_eq!(
            TerminalApp::recall(&mut mount, HistoryDirection::Previous).expect("recall"),
            None
        );
    }

    #[test]
    fn history_lists_earlier_commands_only() {
        let mut vfs = VirtualFileSystem::in_memory();
        let mut mount = started(&mut vfs);
        let mut ctx = CommandContext {
            vfs: &mut vfs,
            windows: &[],
            now_ms: 0,
        };
        TerminalApp::submit(&mut mount, "pwd", &mut ctx).expect("pwd");
        TerminalApp::submit(&mut mount, "history", &mut ctx).expect("history");

        let body_lines: Vec<&str> = mount.body.lines().collect();
        assert_eq!(
            &body_lines[body_lines.len() - 3..],
            &["user@localhost:~$ history", "    1  pwd", "user@localhost:~$"]
        );
        assert_eq!(TerminalApp::session(&mount).history, vec!["pwd", "history"]);
    }

    #[test]
    fn transcript_is_capped() {
        let mut vfs = VirtualFileSystem::in_memory();
        let mut mount = started(&mut vfs);
        let mut ctx = CommandContext {
            vfs: &mut vfs,
            windows: &[],
            now_ms: 0,
        };
        for index in 0..150 {
            TerminalApp::submit(&mut mount, &format!("echo {index}"), &mut ctx).expect("echo");
        }
        let state: TerminalWindowState = mount.load_state().expect("state");
        assert_eq!(state.transcript.len(), MAX_TERMINAL_ENTRIES);
        assert_eq!(state.transcript.last().map(|e| e.text()), Some("149"));
    }
}
