use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Something worth keeping a record of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEvent<'a> {
    /// A command really ran; `exit_code` is `None` when a signal killed it
    Executed {
        command: &'a str,
        exit_code: Option<i32>,
    },
    /// A command was only simulated
    DryRun { command: &'a str },
    /// A command was approved but its process never ran to completion
    /// (the shell could not start or its output could not be collected)
    Failed { command: &'a str, reason: &'a str },
    /// The policy refused the model's command
    ///
    /// The instruction sits next to the raw model output so prompt abuse and
    /// model misbehaviour can be traced later.
    Rejected {
        instruction: &'a str,
        llm_output: &'a str,
        reason: &'a str,
    },
}

impl fmt::Display for AuditEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEvent::Executed {
                command,
                exit_code: Some(code),
            } => write!(f, "[exit:{}] {}", code, command),
            AuditEvent::Executed {
                command,
                exit_code: None,
            } => write!(f, "[exit:signal] {}", command),
            AuditEvent::DryRun { command } => write!(f, "[DRY-RUN] {}", command),
            AuditEvent::Failed { command, reason } => {
                write!(f, "[EXEC-FAILED] {} reason={:?}", command, reason)
            }
            // Debug quoting keeps multi-line model output on one line
            AuditEvent::Rejected {
                instruction,
                llm_output,
                reason,
            } => write!(
                f,
                "[VALIDATION-REJECTED] instruction={:?} llm_output={:?} reason={:?}",
                instruction, llm_output, reason
            ),
        }
    }
}

/// Append-only history file, one line per event
///
/// Once the file grows past `max_bytes` it is moved aside to `<file>.1`
/// (replacing any previous backup) and a fresh file is started.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    path: PathBuf,
    max_bytes: u64,
}

impl AuditLogger {
    /// Log to `path`, creating its parent directories
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        Ok(Self {
            path,
            max_bytes: DEFAULT_MAX_BYTES,
        })
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line describing `event` run from `cwd`
    pub fn record(&self, event: &AuditEvent<'_>, cwd: &Path) -> io::Result<()> {
        let mut file = self.writable_file()?;

        let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());
        writeln!(
            file,
            "[{}] [{}] [{}] {}",
            Utc::now().to_rfc3339(),
            user,
            cwd.display(),
            event
        )?;
        file.flush()
    }

    fn writable_file(&self) -> io::Result<File> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > self.max_bytes => fs::rename(&self.path, self.backup_path())?,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        OpenOptions::new().create(true).append(true).open(&self.path)
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".1");
        PathBuf::from(name)
    }
}
