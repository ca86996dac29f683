//! Supervisor for a locally running `dhcpd`.
//!
//! [`Dhcpd`] owns the live [`ConfigRoot`]. Reloading parses the configured
//! file into a fresh root and swaps it in only on success, so a broken file
//! never replaces a working configuration. Starting the daemon writes the
//! current root to disk first, under the same lock, so the daemon always
//! reads what the supervisor holds.

use std::io;
use std::process::Command;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Instant;

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use serde::Serialize;
use thiserror::Error;

use crate::config_file::{load_config, save_config, ConfigError};
use crate::decode::DecodeWarning;
use crate::process::find_processes;
use crate::root::ConfigRoot;
use crate::settings::DaemonSettings;

/// Whether the daemon process is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DaemonStatus {
    Running,
    Stopped,
}

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to scan {path} for processes: {source}")]
    ProcessScan { path: String, source: io::Error },
    #[error("failed to run '{command}': {source}")]
    Spawn { command: String, source: io::Error },
    #[error("'{command}' failed ({status})\noutput: {output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },
    #[error("cannot run: no {name} process after start")]
    CannotRun { name: String },
    #[error("failed to send {signal} to pid {pid}: {source}")]
    Signal {
        signal: Signal,
        pid: i32,
        source: Errno,
    },
    #[error("{name} (pid {pid}) survived SIGKILL")]
    StopTimeout { name: String, pid: i32 },
    #[error("BUG: {0} lock poisoned")]
    LockPoisoned(&'static str),
}

pub struct Dhcpd {
    settings: DaemonSettings,
    root: Mutex<ConfigRoot>,
    // Serializes start/stop so two callers never race on the process.
    process: Mutex<()>,
}

impl Dhcpd {
    pub fn new(settings: DaemonSettings) -> Self {
        Self {
            settings,
            root: Mutex::new(ConfigRoot::new()),
            process: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &DaemonSettings {
        &self.settings
    }

    /// Replace the live root with the contents of the configured file.
    pub fn reload_config(&self) -> Result<Vec<DecodeWarning>, DaemonError> {
        let mut root = self.lock_root()?;
        let loaded = load_config(&self.settings.config_path)?;
        *root = loaded.root;
        Ok(loaded.warnings)
    }

    /// Write the live root to the configured file.
    pub fn save_config(&self) -> Result<(), DaemonError> {
        let root = self.lock_root()?;
        save_config(&root, &self.settings.config_path)?;
        Ok(())
    }

    /// Snapshot of the live root.
    pub fn root(&self) -> Result<ConfigRoot, DaemonError> {
        Ok(self.lock_root()?.clone())
    }

    /// Mutate the live root in place.
    pub fn update<T>(&self, f: impl FnOnce(&mut ConfigRoot) -> T) -> Result<T, DaemonError> {
        let mut root = self.lock_root()?;
        Ok(f(&mut root))
    }

    pub fn status(&self) -> Result<DaemonStatus, DaemonError> {
        Ok(if self.pids()?.is_empty() {
            DaemonStatus::Stopped
        } else {
            DaemonStatus::Running
        })
    }

    /// Save the configuration and launch the daemon.
    pub fn start(&self) -> Result<(), DaemonError> {
        let root = self.lock_root()?;
        let _process = self.lock_process()?;
        save_config(&root, &self.settings.config_path)?;
        self.run_start_command()?;

        if self.status()? != DaemonStatus::Running {
            return Err(DaemonError::CannotRun {
                name: self.settings.process_name.clone(),
            });
        }
        tracing::info!(name = %self.settings.process_name, "daemon started");
        Ok(())
    }

    /// Terminate every matching process: SIGTERM, then SIGKILL after the
    /// stop timeout. Does nothing when the daemon is not running.
    pub fn stop(&self) -> Result<(), DaemonError> {
        let _process = self.lock_process()?;
        let pids = self.pids()?;
        if pids.is_empty() {
            tracing::debug!(name = %self.settings.process_name, "daemon already stopped");
            return Ok(());
        }

        for pid in &pids {
            self.signal(*pid, Signal::SIGTERM)?;
        }
        let survivors = self.wait_for_exit()?;
        if survivors.is_empty() {
            tracing::info!(name = %self.settings.process_name, "daemon stopped");
            return Ok(());
        }

        tracing::warn!(
            name = %self.settings.process_name,
            count = survivors.len(),
            "daemon ignored SIGTERM, sending SIGKILL"
        );
        for pid in &survivors {
            self.signal(*pid, Signal::SIGKILL)?;
        }
        match self.wait_for_exit()?.first() {
            None => Ok(()),
            Some(pid) => Err(DaemonError::StopTimeout {
                name: self.settings.process_name.clone(),
                pid: pid.as_raw(),
            }),
        }
    }

    pub fn restart(&self) -> Result<(), DaemonError> {
        self.stop()?;
        self.start()
    }

    fn lock_root(&self) -> Result<MutexGuard<'_, ConfigRoot>, DaemonError> {
        self.root
            .lock()
            .map_err(|_| DaemonError::LockPoisoned("configuration"))
    }

    fn lock_process(&self) -> Result<MutexGuard<'_, ()>, DaemonError> {
        self.process
            .lock()
            .map_err(|_| DaemonError::LockPoisoned("process"))
    }

    fn pids(&self) -> Result<Vec<Pid>, DaemonError> {
        find_processes(&self.settings.proc_root, &self.settings.process_name).map_err(|source| {
            DaemonError::ProcessScan {
                path: self.settings.proc_root.display().to_string(),
                source,
            }
        })
    }

    fn signal(&self, pid: Pid, signal: Signal) -> Result<(), DaemonError> {
        match kill(pid, signal) {
            // Exited between the scan and the signal.
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(source) => Err(DaemonError::Signal {
                signal,
                pid: pid.as_raw(),
                source,
            }),
        }
    }

    /// Poll until no matching process remains or the stop timeout passes.
    /// Returns the processes still present.
    fn wait_for_exit(&self) -> Result<Vec<Pid>, DaemonError> {
        let deadline = Instant::now() + self.settings.stop_timeout();
        loop {
            let pids = self.pids()?;
            if pids.is_empty() || Instant::now() >= deadline {
                return Ok(pids);
            }
            thread::sleep(self.settings.poll_interval());
        }
    }

    fn run_start_command(&self) -> Result<(), DaemonError> {
        let command = self.settings.start_command.join(" ");
        let Some((program, args)) = self.settings.start_command.split_first() else {
            return Err(DaemonError::Spawn {
                command,
                source: io::Error::new(io::ErrorKind::InvalidInput, "start command is empty"),
            });
        };

        tracing::debug!(%command, "running start command");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| DaemonError::Spawn {
                command: command.clone(),
                source,
            })?;
        if output.status.success() {
            return Ok(());
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(DaemonError::CommandFailed {
            command,
            status: output.status.to_string(),
            output: combined.trim_end().to_string(),
        })
    }
}
