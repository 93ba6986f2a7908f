//! Per-window shell session: history, working directory, and environment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Home directory of the simulated user.
pub const HOME_DIR: &str = "/home/user";
const HOSTNAME: &str = "localhost";

fn default_env() -> BTreeMap<String, String> {
    [
        ("USER", "user"),
        ("HOME", HOME_DIR),
        ("PATH", "/bin:/usr/bin"),
        ("TERM", "xterm-256color"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Shell state owned by one terminal window.
///
/// `history_index` stays within `0..=history.len()`; `history.len()` means the user is editing a
/// fresh line.
pub struct TerminalSessionState {
    /// Submitted command lines, oldest first.
    pub history: Vec<String>,
    /// Recall cursor into `history`.
    pub history_index: usize,
    /// Absolute working directory.
    pub cwd: String,
    /// Environment variables.
    pub env: BTreeMap<String, String>,
}

impl Default for TerminalSessionState {
    fn default() -> Self {
        Self {
            history: Vec::new(),
            history_index: 0,
            cwd: HOME_DIR.to_string(),
            env: default_env(),
        }
    }
}

impl TerminalSessionState {
    /// `$HOME`, falling back to the default home directory.
    pub fn home(&self) -> &str {
        self.env.get("HOME").map_or(HOME_DIR, String::as_str)
    }

    /// Appends a submitted line to history and resets the recall cursor.
    ///
    /// History is append-only; blank lines are the only input not recorded.
    pub fn record(&mut self, line: &str) {
        let line = line.trim();
        if !line.is_empty() {
            self.history.push(line.to_string());
        }
        self.history_index = self.history.len();
    }

    /// Steps back through history (arrow up).
    pub fn recall_previous(&mut self) -> Option<String> {
        if self.history_index == 0 {
            return None;
        }
        self.history_index = self.history_index.min(self.history.len()) - 1;
        self.history.get(self.history_index).cloned()
    }

    /// Steps forward through history (arrow down). Returns an empty line when moving past the
    /// newest entry.
    pub fn recall_next(&mut self) -> Option<String> {
        let len = self.history.len();
        if self.history_index + 1 < len {
            self.history_index += 1;
            self.history.get(self.history_index).cloned()
        } else if self.history_index + 1 == len {
            self.history_index = len;
            Some(String::new())
        } else {
            None
        }
    }

    /// Prompt text such as `user@localhost:~/Documents$`.
    pub fn prompt(&self) -> String {
        let user = self.env.get("USER").map_or("user", String::as_str);
        let home = self.home();
        let dir = if self.cwd == home {
            "~".to_string()
        } else if let Some(rest) = self
            .cwd
            .strip_prefix(home)
            .filter(|rest| rest.starts_with('/'))
        {
            format!("~{rest}")
        } else {
            self.cwd.clone()
        };
        format!("{user}@{HOSTNAME}:{dir}$")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_match_simulated_user() {
        let session = TerminalSessionState::default();
        assert_eq!(session.cwd, "/home/user");
        assert_eq!(session.env["PATH"], "/bin:/usr/bin");
        assert_eq!(session.env["TERM"], "xterm-256color");
        assert_eq!(session.prompt(), "user@localhost:~$");
    }

    #[test]
    fn record_keeps_repeats_and_skips_blank_lines() {
        let mut session = TerminalSessionState::default();
        session.record("ls");
        session.record("ls");
        session.record("   ");
        session.record("pwd");
        assert_eq!(session.history, vec!["ls", "ls", "pwd"]);
        assert_eq!(session.history_index, 3);
    }

    #[test]
    fn recall_walks_history_and_returns_to_fresh_line() {
        let mut session = TerminalSessionState::default();
        session.record("one");
        session.record("two");

        assert_eq!(session.recall_previous(), Some("two".to_string()));
        assert_eq!(session.recall_previous(), Some("one".to_string()));
        assert_eq!(session.recall_previous(), None);
        assert_eq!(session.history_index, 0);

        assert_eq!(session.recall_next(), Some("two".to_string()));
        assert_eq!(session.recall_next(), Some(String::new()));
        assert_eq!(session.history_index, 2);
        assert_eq!(session.recall_next(), None);
    }

    #[test]
    fn prompt_abbreviates_home_only_on_segment_boundary() {
        let mut session = TerminalSessionState::default();
        session.cwd = "/home/user/Documents".to_string();
        assert_eq!(session.prompt(), "user@localhost:~/Documents$");
        session.cwd = "/home/username".to_string();
        assert_eq!(session.prompt(), "user@localhost:/home/username$");
        session.cwd = "/".to_string();
        assert_eq!(session.prompt(), "user@localhost:/$");
    }
}
