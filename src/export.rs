/// Running the coverage exporters (`xccov`, `llvm-cov`) as subprocesses.
///
/// Each run invokes at most one exporter, once, and waits for it. A non-zero
/// exit is fatal and reported with the exporter's own output; nothing is
/// retried since the coverage data cannot change within a run.
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{CrapError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A fully specified exporter invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ExportCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `xcrun xccov view --report --json <bundle>`
    pub fn xccov(xcresult: &Path) -> Self {
        Self::new(
            "xcrun",
            vec![
                "xccov".to_string(),
                "view".to_string(),
                "--report".to_string(),
                "--json".to_string(),
                xcresult.display().to_string(),
            ],
        )
    }

    /// `llvm-cov export -instr-profile=<profdata> <binary> --format=text`,
    /// through `xcrun` on macOS.
    pub fn llvm_cov(profdata: &Path, binary: &Path) -> Self {
        let mut args = vec![
            "export".to_string(),
            format!("-instr-profile={}", profdata.display()),
            binary.display().to_string(),
            "--format=text".to_string(),
        ];
        if cfg!(target_os = "macos") {
            args.insert(0, "llvm-cov".to_string());
            Self::new("xcrun", args)
        } else {
            Self::new("llvm-cov", args)
        }
    }

    /// Name used in error messages, e.g. `xcrun xccov`.
    pub fn tool_name(&self) -> String {
        match self.args.first() {
            Some(sub) if self.program == "xcrun" => format!("{} {}", self.program, sub),
            _ => self.program.clone(),
        }
    }

    /// Run to completion and return stdout.
    ///
    /// With a `timeout`, the child is killed once it elapses.
    pub fn run(&self, timeout: Option<Duration>) -> Result<Vec<u8>> {
        log::info!("running {} {}", self.program, self.args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain both pipes on their own threads so a chatty child cannot
        // block on a full pipe while we wait for it.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match timeout {
            Some(limit) => match wait_with_deadline(&mut child, limit)? {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CrapError::ToolTimeout {
                        tool: self.tool_name(),
                        secs: limit.as_secs(),
                    });
                }
            },
            None => child.wait()?,
        };

        let stdout = join(stdout)?;
        let stderr = join(stderr)?;

        if !status.success() {
            let mut output = String::from_utf8_lossy(&stderr).into_owned();
            output.push_str(&String::from_utf8_lossy(&stdout));
            return Err(CrapError::ToolFailed {
                tool: self.tool_name(),
                code: status.code(),
                output,
            });
        }

        log::debug!("{} produced {} bytes", self.tool_name(), stdout.len());
        Ok(stdout)
    }
}

type Drain = thread::JoinHandle<std::io::Result<Vec<u8>>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Drain> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf)?;
            Ok(buf)
        })
    })
}

fn join(handle: Option<Drain>) -> Result<Vec<u8>> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| CrapError::Io(std::io::Error::other("output reader panicked")))?
            .map_err(CrapError::Io),
        None => Ok(Vec::new()),
    }
}

fn wait_with_deadline(
    child: &mut Child,
    limit: Duration,
) -> Result<Option<std::process::ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
