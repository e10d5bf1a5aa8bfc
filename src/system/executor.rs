// src/system/executor.rs

use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Shell setting '{0}' could not be parsed.")]
    ShellParse(String),
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{command}' exited with status {code}.")]
    NonZeroExitStatus { command: String, code: i32 },
    #[error("Command '{0}' was terminated by a signal.")]
    Terminated(String),
}

/// The program and leading arguments used to hand a command line to a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl ShellInvocation {
    /// Builds the invocation for a configured shell (e.g. `"bash -l"`), or the
    /// platform default when none is configured.
    pub fn for_shell(shell: Option<&str>) -> Result<Self, ExecutionError> {
        let Some(shell) = shell else {
            return Ok(Self::platform_default());
        };

        // A single word is taken verbatim: shlex would eat the backslashes of a
        // Windows path such as `C:\Windows\System32\cmd.exe`.
        let trimmed = shell.trim();
        let mut parts = if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
            shlex::split(trimmed)
                .filter(|parts| !parts.is_empty())
                .ok_or_else(|| ExecutionError::ShellParse(shell.to_string()))?
        } else {
            vec![trimmed.to_string()]
        };
        let program = parts.remove(0);
        let command_flag = command_flag_for(&program);
        parts.push(command_flag.to_string());

        Ok(Self {
            program,
            args: parts,
        })
    }

    fn platform_default() -> Self {
        if cfg!(target_os = "windows") {
            Self {
                program: "cmd".to_string(),
                args: vec!["/C".to_string()],
            }
        } else {
            Self {
                program: "sh".to_string(),
                args: vec!["-c".to_string()],
            }
        }
    }
}

/// The flag that makes a shell read its command from the next argument.
/// Both separators are accepted, so a Windows path in the config is read the same
/// way on every platform.
fn command_flag_for(program: &str) -> &'static str {
    let file_name = program.rsplit(['/', '\\']).next().unwrap_or(program);
    let stem = file_name.to_lowercase();
    let stem = stem.strip_suffix(".exe").unwrap_or(&stem);
    match stem {
        "cmd" => "/C",
        "powershell" | "pwsh" => "-Command",
        _ => "-c",
    }
}

/// Runs a final command line through the shell, inheriting the terminal.
/// Returns an error carrying the exit code when the command fails.
pub fn execute_command(
    command_line: &str,
    cwd: &Path,
    shell: Option<&str>,
) -> Result<(), ExecutionError> {
    let trimmed_command = command_line.trim();
    if trimmed_command.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }

    let invocation = ShellInvocation::for_shell(shell)?;
    log::debug!(
        "Executing via {} {:?}: {}",
        invocation.program,
        invocation.args,
        trimmed_command
    );

    let status = StdCommand::new(&invocation.program)
        .args(&invocation.args)
        .arg(trimmed_command)
        .current_dir(dunce::simplified(cwd))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| ExecutionError::CommandFailed(trimmed_command.to_string(), e))?;

    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(ExecutionError::NonZeroExitStatus {
            command: trimmed_command.to_string(),
            code,
        }),
        None => Err(ExecutionError::Terminated(trimmed_command.to_string())),
    }
}
