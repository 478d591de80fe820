use crate::model::RawLine;
use crate::params::{self, Params};
use crate::util;
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::{Command, Stdio};

const STDERR_LOG_BYTES: usize = 512;

#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub status: Option<i32>,
}

/// Runs an external program to completion and captures its output.
pub trait ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput>;
}

/// Spawns real processes with stdin closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("run {program}"))?;
        Ok(ProcessOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            status: output.status.code(),
        })
    }
}

/// Program plus the arguments shared by every tag file of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl SearchCommand {
    pub fn build(params: &Params, pattern: &str, limit: usize) -> Result<Self> {
        let mut tokens = params::substitute(&params.cmd, pattern).into_iter();
        let Some(program) = tokens.next().filter(|program| !program.trim().is_empty()) else {
            bail!("empty search command");
        };
        let mut args: Vec<String> = tokens.collect();
        args.extend(params.args.iter().cloned());
        args.push("--max-count".to_string());
        args.push(limit.to_string());
        Ok(Self { program, args })
    }

    pub fn args_for(&self, tag_file: &Path) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(tag_file.to_string_lossy().to_string());
        args
    }
}

/// Run the search against one tag file and append at most `limit` total
/// lines to `lines`. Returns the number of lines appended.
pub fn search_tag_file(
    runner: &dyn ProcessRunner,
    command: &SearchCommand,
    tag_file: &Path,
    limit: usize,
    lines: &mut Vec<RawLine>,
) -> usize {
    let args = command.args_for(tag_file);
    let output = match runner.run(&command.program, &args) {
        Ok(output) => output,
        Err(err) => {
            tracing::warn!("search in {} failed: {err:#}", tag_file.display());
            return 0;
        }
    };
    match output.status {
        Some(0) | Some(1) => {}
        status => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(
                "{} exited with {:?} for {}: {}",
                command.program,
                status,
                tag_file.display(),
                util::truncate_str_bytes(stderr.trim(), STDERR_LOG_BYTES)
            );
        }
    }
    let before = lines.len();
    let room = limit.saturating_sub(before);
    lines.extend(util::decode_lines(&output.stdout).into_iter().take(room));
    lines.len() - before
}
