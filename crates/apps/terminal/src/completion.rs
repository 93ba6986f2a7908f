//! Tab completion for command names and path arguments.

use platform_host::{VfsEntryKind, VirtualFileSystem};

use crate::{
    commands::{command_names, decorated_name, takes_path_argument},
    session::TerminalSessionState,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Result of completing the current input line.
pub struct Completion {
    /// Input line after completion (unchanged when nothing could be completed).
    pub input: String,
    /// Candidates to show when the completion was ambiguous.
    pub candidates: Vec<String>,
}

/// Completes the command name or, for path-taking commands, the last path argument.
///
/// Directory candidates end in `/` and executables in `*`; the `*` marker is never inserted
/// into the input.
pub fn complete(
    input: &str,
    session: &TerminalSessionState,
    vfs: &VirtualFileSystem,
) -> Completion {
    if input.trim().is_empty() {
        return Completion {
            input: input.to_string(),
            candidates: command_names().map(str::to_string).collect(),
        };
    }

    let parts: Vec<&str> = input.trim().split(' ').collect();
    let command = parts[0].to_lowercase();
    let completing_arg = parts.len() > 1 && !input.ends_with(' ');

    if completing_arg && takes_path_argument(&command) {
        complete_path(input, &parts, session, vfs)
    } else {
        complete_command(input, &parts, &command, session)
    }
}

fn complete_command(
    input: &str,
    parts: &[&str],
    command: &str,
    session: &TerminalSessionState,
) -> Completion {
    let mut known: Vec<String> = command_names().map(str::to_string).collect();
    for line in &session.history {
        if let Some(name) = line.split(' ').next().filter(|name| !name.is_empty()) {
            if !known.iter().any(|known| known == name) {
                known.push(name.to_string());
            }
        }
    }
    let matches: Vec<String> = known
        .into_iter()
        .filter(|name| name.starts_with(command))
        .collect();
    let rest = parts[1..].join(" ");
    let with_rest = |head: &str| {
        if rest.is_empty() {
            head.to_string()
        } else {
            format!("{head} {rest}")
        }
    };

    match matches.as_slice() {
        [] => unchanged(input),
        [only] if rest.is_empty() => Completion {
            input: format!("{only} "),
            candidates: Vec::new(),
        },
        [only] => Completion {
            input: with_rest(only.as_str()),
            candidates: Vec::new(),
        },
        _ => {
            let prefix = common_prefix(&matches);
            Completion {
                input: if prefix.len() > command.len() {
                    with_rest(prefix.as_str())
                } else {
                    input.to_string()
                },
                candidates: matches,
            }
        }
    }
}

fn complete_path(
    input: &str,
    parts: &[&str],
    session: &TerminalSessionState,
    vfs: &VirtualFileSystem,
) -> Completion {
    let (head, current) = parts.split_at(parts.len() - 1);
    let current = current[0];
    let (dir_prefix, search) = match current.rfind('/') {
        Some(idx) => current.split_at(idx + 1),
        None => ("", current),
    };
    let base = if dir_prefix.is_empty() {
        session.cwd.clone()
    } else {
        VirtualFileSystem::resolve(dir_prefix, &session.cwd)
    };
    let Ok(entries) = vfs.list_dir(&base) else {
        return unchanged(input);
    };

    let matching: Vec<_> = entries
        .iter()
        .filter(|entry| entry.name.starts_with(search))
        .collect();
    let replace_last = |replacement: &str| {
        let mut words: Vec<&str> = head.to_vec();
        words.push(replacement);
        words.join(" ")
    };

    match matching.as_slice() {
        [] => unchanged(input),
        [only] => {
            let mut input = replace_last(format!("{dir_prefix}{}", only.name).as_str());
            match only.kind {
                VfsEntryKind::Directory => input.push('/'),
                VfsEntryKind::File => input.push(' '),
            }
            Completion {
                input,
                candidates: Vec::new(),
            }
        }
        many => {
            let names: Vec<String> = many.iter().map(|entry| entry.name.clone()).collect();
            let prefix = common_prefix(&names);
            Completion {
                input: if prefix.len() > search.len() {
                    replace_last(format!("{dir_prefix}{prefix}").as_str())
                } else {
                    input.to_string()
                },
                candidates: many
                    .iter()
                    .map(|entry| format!("{dir_prefix}{}", decorated_name(entry)))
                    .collect(),
            }
        }
    }
}

fn unchanged(input: &str) -> Completion {
    Completion {
        input: input.to_string(),
        candidates: Vec::new(),
    }
}

fn common_prefix(values: &[String]) -> String {
    let Some((first, rest)) = values.split_first() else {
        return String::new();
    };
    let mut prefix_len = first.len();
    for value in rest {
        prefix_len = first
            .char_indices()
            .zip(value.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map_or(0, |((idx, ch), _)| idx + ch.len_utf8())
            .min(prefix_len);
    }
    first[..prefix_len].to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn complete_in_home(input: &str) -> Completion {
        let vfs = VirtualFileSystem::in_memory();
        complete(input, &TerminalSessionState::default(), &vfs)
    }

    #[test]
    fn empty_input_lists_every_command() {
        let completion = complete_in_home("");
        assert_eq!(completion.input, "");
        assert!(completion.candidates.contains(&"reset-fs".to_string()));
        assert_eq!(completion.candidates[0], "help");
    }

    #[test]
    fn unique_command_prefix_completes_with_space() {
        assert_eq!(complete_in_home("pw").input, "pwd ");
        assert_eq!(complete_in_home("mkd").input, "mkdir ");
    }

    #[test]
    fn ambiguous_command_prefix_lists_candidates() {
        let completion = complete_in_home("c");
        assert_eq!(completion.input, "c");
        assert_eq!(completion.candidates, vec!["clear", "cd", "cat", "cp", "chmod"]);

        let completion = complete_in_home("ch");
        assert_eq!(completion.input, "chmod ");
    }

    #[test]
    fn history_commands_join_the_candidates() {
        let vfs = VirtualFileSystem::in_memory();
        let mut session = TerminalSessionState::default();
        session.record("neofetch --small");
        assert_eq!(complete("neo", &session, &vfs).input, "neofetch ");
    }

    #[test]
    fn unique_directory_completion_keeps_descending() {
        assert_eq!(complete_in_home("cd Doc").input, "cd Documents/");
        assert_eq!(
            complete_in_home("cat Documents/wel").input,
            "cat Documents/welcome.txt "
        );
    }

    #[test]
    fn executable_marker_is_display_only() {
        let completion = complete_in_home("cat /bin/h");
        assert_eq!(completion.input, "cat /bin/hello ");
    }

    #[test]
    fn ambiguous_paths_extend_common_prefix_and_list_candidates() {
        let mut vfs = VirtualFileSystem::in_memory();
        let _ = vfs.write_file("/tmp/report-a.txt", "").expect("write");
        let _ = vfs.write_file("/tmp/report-b.txt", "").expect("write");
        let _ = vfs.mkdir("/tmp/reports").expect("mkdir");

        let completion = complete("ls /tmp/r", &TerminalSessionState::default(), &vfs);
        assert_eq!(completion.input, "ls /tmp/report");
        assert_eq!(
            completion.candidates,
            vec!["/tmp/report-a.txt", "/tmp/report-b.txt", "/tmp/reports/"]
        );
    }

    #[test]
    fn missing_base_directory_leaves_input_alone() {
        let completion = complete_in_home("ls /nope/x");
        assert_eq!(completion.input, "ls /nope/x");
        assert!(completion.candidates.is_empty());
    }

    #[test]
    fn common_prefix_handles_disjoint_values() {
        assert_eq!(
            common_prefix(&["abc".to_string(), "abd".to_string()]),
            "ab"
        );
        assert_eq!(common_prefix(&["x".to_string(), "y".to_string()]), "");
        assert_eq!(common_prefix(&[]), "");
    }
}
