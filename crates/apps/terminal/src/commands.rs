//! Built-in shell commands executed against the virtual file system.

use chrono::{TimeZone, Utc};
use desktop_app_contract::{WindowOptions, WindowSummary};
use platform_host::{
    normalize_virtual_path, SaveStatus, VfsEntry, VfsEntryKind, VfsError, VirtualFileSystem,
};
use thiserror::Error;

use crate::{session::TerminalSessionState, TerminalTranscriptEntry};

/// Services a command may touch while running.
pub struct CommandContext<'a> {
    /// Shared virtual file system.
    pub vfs: &'a mut VirtualFileSystem,
    /// Open windows, for `windows`.
    pub windows: &'a [WindowSummary],
    /// Current time in unix milliseconds, for `date`.
    pub now_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
/// Side effects a command asks the host to perform after it returns.
pub enum TerminalEffect {
    /// Drop the visible transcript.
    ClearScreen,
    /// Open a new desktop window.
    OpenWindow {
        /// Registry key of the app to open.
        app_type: String,
        /// Creation options.
        options: WindowOptions,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Lines and effects produced by one command line.
pub struct CommandOutput {
    /// Output lines in emission order (never contains prompts).
    pub lines: Vec<TerminalTranscriptEntry>,
    /// Requested host effects.
    pub effects: Vec<TerminalEffect>,
}

impl CommandOutput {
    fn stdout(&mut self, text: impl Into<String>) {
        self.lines
            .push(TerminalTranscriptEntry::Stdout { text: text.into() });
    }

    fn stderr(&mut self, text: impl Into<String>) {
        self.lines
            .push(TerminalTranscriptEntry::Stderr { text: text.into() });
    }

    fn system(&mut self, text: impl Into<String>) {
        self.lines
            .push(TerminalTranscriptEntry::System { text: text.into() });
    }

    /// Returns `true` when any line is an error line.
    pub fn has_errors(&self) -> bool {
        self.lines
            .iter()
            .any(|line| matches!(line, TerminalTranscriptEntry::Stderr { .. }))
    }

    /// Plain text of every line, for assertions and logs.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(TerminalTranscriptEntry::text).collect()
    }
}

#[derive(Debug, Error)]
enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("{path}: No such file or directory")]
    NoSuchPath { path: String },
    #[error("{path}: Not a directory")]
    NotADirectory { path: String },
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: VfsError,
    },
    #[error(transparent)]
    Vfs(#[from] VfsError),
}

impl CommandError {
    fn render(&self, command: &str) -> String {
        match self {
            Self::Usage(_) => self.to_string(),
            _ => format!("{command}: {self}"),
        }
    }
}

type CommandHandler = fn(
    &[String],
    &mut TerminalSessionState,
    &mut CommandContext<'_>,
    &mut CommandOutput,
) -> Result<(), CommandError>;

struct CommandSpec {
    name: &'static str,
    usage: &'static str,
    summary: &'static str,
    takes_path: bool,
    handler: CommandHandler,
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "help",
        usage: "help",
        summary: "Show this help message",
        takes_path: false,
        handler: help,
    },
    CommandSpec {
        name: "echo",
        usage: "echo <text>",
        summary: "Print text to the terminal",
        takes_path: false,
        handler: echo,
    },
    CommandSpec {
        name: "clear",
        usage: "clear",
        summary: "Clear the terminal screen",
        takes_path: false,
        handler: clear,
    },
    CommandSpec {
        name: "ls",
        usage: "ls [-l] [path]",
        summary: "List directory contents (use -l for detailed view)",
        takes_path: true,
        handler: ls,
    },
    CommandSpec {
        name: "cd",
        usage: "cd <dir>",
        summary: "Change directory",
        takes_path: true,
        handler: cd,
    },
    CommandSpec {
        name: "pwd",
        usage: "pwd",
        summary: "Print working directory",
        takes_path: false,
        handler: pwd,
    },
    CommandSpec {
        name: "cat",
        usage: "cat <file>",
        summary: "Display file contents",
        takes_path: true,
        handler: cat,
    },
    CommandSpec {
        name: "touch",
        usage: "touch <file>",
        summary: "Create an empty file or update timestamp",
        takes_path: true,
        handler: touch,
    },
    CommandSpec {
        name: "mkdir",
        usage: "mkdir <dir>",
        summary: "Create a new directory",
        takes_path: true,
        handler: mkdir,
    },
    CommandSpec {
        name: "rm",
        usage: "rm [-r] <path>",
        summary: "Remove a file or directory (-r for recursive)",
        takes_path: true,
        handler: rm,
    },
    CommandSpec {
        name: "edit",
        usage: "edit <file>",
        summary: "Open file in code editor",
        takes_path: true,
        handler: edit,
    },
    CommandSpec {
        name: "mv",
        usage: "mv <src> <dst>",
        summary: "Move/rename file or directory",
        takes_path: true,
        handler: mv,
    },
    CommandSpec {
        name: "cp",
        usage: "cp <src> <dst>",
        summary: "Copy file or directory",
        takes_path: true,
        handler: cp,
    },
    CommandSpec {
        name: "chmod",
        usage: "chmod +x|-x <f>",
        summary: "Make file executable (+x) or not (-x)",
        takes_path: true,
        handler: chmod,
    },
    CommandSpec {
        name: "reset-fs",
        usage: "reset-fs --yes",
        summary: "Reset file system to default state (CAUTION!)",
        takes_path: false,
        handler: reset_fs,
    },
    CommandSpec {
        name: "windows",
        usage: "windows",
        summary: "List all open windows with IDs",
        takes_path: false,
        handler: windows,
    },
    CommandSpec {
        name: "date",
        usage: "date",
        summary: "Show current date and time",
        takes_path: false,
        handler: date,
    },
    CommandSpec {
        name: "history",
        usage: "history",
        summary: "Show command history",
        takes_path: false,
        handler: history,
    },
    CommandSpec {
        name: "env",
        usage: "env",
        summary: "Print environment variables",
        takes_path: false,
        handler: env,
    },
];

fn find_command(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// Names of all built-in commands in help order.
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|spec| spec.name)
}

/// Returns `true` when the command's arguments are file system paths.
pub fn takes_path_argument(name: &str) -> bool {
    find_command(name).is_some_and(|spec| spec.takes_path)
}

/// Parses and runs one command line.
///
/// The line is tokenized with shell quoting rules; the command name is case-insensitive.
/// Failures are rendered as error lines rather than returned.
pub fn execute(
    line: &str,
    session: &mut TerminalSessionState,
    ctx: &mut CommandContext<'_>,
) -> CommandOutput {
    let mut out = CommandOutput::default();
    let words = match shell_words::split(line) {
        Ok(words) => words,
        Err(err) => {
            out.stderr(format!("parse error: {err}"));
            return out;
        }
    };
    let Some((name, args)) = words.split_first() else {
        return out;
    };
    let name = name.to_lowercase();

    match find_command(&name) {
        Some(spec) => {
            if let Err(err) = (spec.handler)(args, session, ctx, &mut out) {
                tracing::debug!(command = spec.name, "terminal command failed: {err}");
                out.stderr(err.render(spec.name));
            }
        }
        None => out.stderr(format!(
            "Command not found: {name}. Type 'help' to see available commands."
        )),
    }
    out
}

fn resolve(session: &TerminalSessionState, path: &str) -> String {
    normalize_virtual_path(path, &session.cwd)
}

fn note_save(status: SaveStatus, out: &mut CommandOutput) {
    if !status.is_saved() {
        out.system("warning: storage unavailable; change kept in memory only");
    }
}

fn format_timestamp(unix_ms: u64, pattern: &str) -> String {
    i64::try_from(unix_ms)
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map_or_else(|| "-".to_string(), |at| at.format(pattern).to_string())
}

pub(crate) fn decorated_name(entry: &VfsEntry) -> String {
    match entry.kind {
        VfsEntryKind::Directory => format!("{}/", entry.name),
        VfsEntryKind::File if entry.executable => format!("{}*", entry.name),
        VfsEntryKind::File => entry.name.clone(),
    }
}

fn help(
    _args: &[String],
    _session: &mut TerminalSessionState,
    _ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    out.stdout("Available commands:");
    for spec in COMMANDS {
        out.stdout(format!("  {:<16}- {}", spec.usage, spec.summary));
    }
    Ok(())
}

fn echo(
    args: &[String],
    _session: &mut TerminalSessionState,
    _ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    out.stdout(args.join(" "));
    Ok(())
}

fn clear(
    _args: &[String],
    _session: &mut TerminalSessionState,
    _ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    out.effects.push(TerminalEffect::ClearScreen);
    Ok(())
}

fn ls(
    args: &[String],
    session: &mut TerminalSessionState,
    ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    let long = args.iter().any(|arg| arg == "-l");
    let target = args
        .iter()
        .find(|arg| !arg.starts_with('-'))
        .map_or_else(|| session.cwd.clone(), |path| resolve(session, path));
    let entries = ctx.vfs.list_dir(&target)?;

    if long {
        out.stdout("Type  Size      Modified             Name");
        out.stdout("----  --------  -------------------  ---------------");
        for entry in &entries {
            let type_char = match entry.kind {
                VfsEntryKind::Directory => 'd',
                VfsEntryKind::File if entry.executable => 'x',
                VfsEntryKind::File => '-',
            };
            let size = entry
                .size
                .map_or_else(|| " ".repeat(8), |size| format!("{size:>8}"));
            let name = match entry.kind {
                VfsEntryKind::Directory => format!("{}/", entry.name),
                VfsEntryKind::File => entry.name.clone(),
            };
            out.stdout(format!(
                "{type_char}     {size}  {}  {name}",
                format_timestamp(entry.modified_at_unix_ms, "%Y-%m-%d %H:%M:%S")
            ));
        }
    } else if !entries.is_empty() {
        out.stdout(
            entries
                .iter()
                .map(decorated_name)
                .collect::<Vec<_>>()
                .join("  "),
        );
    }
    Ok(())
}

fn cd(
    args: &[String],
    session: &mut TerminalSessionState,
    ctx: &mut CommandContext<'_>,
    _out: &mut CommandOutput,
) -> Result<(), CommandError> {
    let Some(path) = args.first() else {
        session.cwd = session.home().to_string();
        return Ok(());
    };
    let resolved = resolve(session, path);
    match ctx.vfs.stat(&resolved) {
        Err(_) => Err(CommandError::NoSuchPath { path: path.clone() }),
        Ok(meta) if meta.kind != VfsEntryKind::Directory => {
            Err(CommandError::NotADirectory { path: path.clone() })
        }
        Ok(_) => {
            session.cwd = resolved;
            Ok(())
        }
    }
}

fn pwd(
    _args: &[String],
    session: &mut TerminalSessionState,
    _ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    out.stdout(session.cwd.clone());
    Ok(())
}

fn cat(
    args: &[String],
    session: &mut TerminalSessionState,
    ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    let path = args.first().ok_or(CommandError::Usage("cat <file>"))?;
    let resolved = resolve(session, path);
    if !ctx.vfs.exists(&resolved) {
        return Err(CommandError::NoSuchPath { path: path.clone() });
    }
    out.stdout(ctx.vfs.read_file(&resolved)?);
    Ok(())
}

fn touch(
    args: &[String],
    session: &mut TerminalSessionState,
    ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    let path = args.first().ok_or(CommandError::Usage("touch <file>"))?;
    let resolved = resolve(session, path);
    if ctx.vfs.exists(&resolved) {
        let content = ctx.vfs.read_file(&resolved)?;
        let status = ctx.vfs.write_file(&resolved, &content)?;
        out.stdout(format!("Updated timestamp for {path}"));
        note_save(status, out);
    } else {
        let status = ctx.vfs.write_file(&resolved, "")?;
        out.stdout(format!("Created {path}"));
        note_save(status, out);
    }
    Ok(())
}

fn mkdir(
    args: &[String],
    session: &mut TerminalSessionState,
    ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    let path = args.first().ok_or(CommandError::Usage("mkdir <directory>"))?;
    let status = ctx.vfs.mkdir(&resolve(session, path))?;
    out.stdout(format!("Created directory {path}"));
    note_save(status, out);
    Ok(())
}

fn rm(
    args: &[String],
    session: &mut TerminalSessionState,
    ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    let (recursive, path) = match args {
        [] => return Err(CommandError::Usage("rm [-r] <path>")),
        [flag, rest @ ..] if flag == "-r" => (
            true,
            rest.first().ok_or(CommandError::Usage("rm -r <path>"))?,
        ),
        [path, ..] => (false, path),
    };
    let status = ctx.vfs.remove(&resolve(session, path), recursive)?;
    out.stdout(format!("Removed {path}"));
    note_save(status, out);
    Ok(())
}

fn edit(
    args: &[String],
    session: &mut TerminalSessionState,
    ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    let path = args.first().ok_or(CommandError::Usage("edit <file>"))?;
    let resolved = resolve(session, path);
    let content = if ctx.vfs.exists(&resolved) {
        ctx.vfs
            .read_file(&resolved)
            .map_err(|source| CommandError::Unreadable {
                path: path.clone(),
                source,
            })?
    } else {
        String::new()
    };

    out.effects.push(TerminalEffect::OpenWindow {
        app_type: "code-editor".to_string(),
        options: WindowOptions::default()
            .with_param("code", content)
            .with_param("filePath", resolved),
    });
    Ok(())
}

fn two_paths<'a>(
    args: &'a [String],
    usage: &'static str,
) -> Result<(&'a String, &'a String), CommandError> {
    match args {
        [source, dest] => Ok((source, dest)),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn mv(
    args: &[String],
    session: &mut TerminalSessionState,
    ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    let (source, dest) = two_paths(args, "mv <source> <destination>")?;
    let status = ctx
        .vfs
        .rename(&resolve(session, source), &resolve(session, dest))?;
    out.stdout(format!("Moved {source} to {dest}"));
    note_save(status, out);
    Ok(())
}

fn cp(
    args: &[String],
    session: &mut TerminalSessionState,
    ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    let (source, dest) = two_paths(args, "cp <source> <destination>")?;
    let status = ctx
        .vfs
        .copy(&resolve(session, source), &resolve(session, dest))?;
    out.stdout(format!("Copied {source} to {dest}"));
    note_save(status, out);
    Ok(())
}

fn chmod(
    args: &[String],
    session: &mut TerminalSessionState,
    ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    let (executable, path) = match args {
        [mode, path] if mode == "+x" => (true, path),
        [mode, path] if mode == "-x" => (false, path),
        _ => return Err(CommandError::Usage("chmod +x|-x <file>")),
    };
    let status = ctx.vfs.chmod(&resolve(session, path), executable)?;
    out.stdout(format!("Changed permissions for {path}"));
    note_save(status, out);
    Ok(())
}

fn reset_fs(
    args: &[String],
    session: &mut TerminalSessionState,
    ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    if !args.iter().any(|arg| arg == "--yes" || arg == "-y") {
        out.system("This will reset the file system to default. All your files will be lost.");
        out.system("Run 'reset-fs --yes' to continue.");
        return Ok(());
    }
    let status = ctx.vfs.reset();
    session.cwd = session.home().to_string();
    out.stdout("File system has been reset to default.");
    note_save(status, out);
    Ok(())
}

fn windows(
    _args: &[String],
    _session: &mut TerminalSessionState,
    ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    if ctx.windows.is_empty() {
        out.stdout("No windows are currently open.");
        return Ok(());
    }
    out.stdout("Open windows:");
    for window in ctx.windows {
        out.stdout(format!(
            "  window-{} ({}): {}",
            window.id, window.app_type, window.title
        ));
    }
    Ok(())
}

fn date(
    _args: &[String],
    _session: &mut TerminalSessionState,
    ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    out.stdout(format_timestamp(ctx.now_ms, "%a %b %e %H:%M:%S UTC %Y"));
    Ok(())
}

fn history(
    _args: &[String],
    session: &mut TerminalSessionState,
    _ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    for (index, line) in session.history.iter().enumerate() {
        out.stdout(format!("{:>5}  {line}", index + 1));
    }
    Ok(())
}

fn env(
    _args: &[String],
    session: &mut TerminalSessionState,
    _ctx: &mut CommandContext<'_>,
    out: &mut CommandOutput,
) -> Result<(), CommandError> {
    for (key, value) in &session.env {
        out.stdout(format!("{key}={value}"));
    }
    Ok(())
}
