use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::process::{run_command_passthrough, RunOutput};
use crate::python_sys::{self, SysProbe};
use uenv_venv_domain::EnvSnapshot;

/// Cross-process interpreter introspection, injectable so tests can
/// substitute fixed probe data for real subprocesses.
pub trait PythonProber: Send + Sync {
    fn detect_interpreter(&self, snapshot: &EnvSnapshot) -> Result<PathBuf>;
    fn sys_probe(&self, python: &Path) -> Result<SysProbe>;
    fn purelib(&self, python: &Path) -> Result<PathBuf>;
}

/// External tool invocation (venv creators, installers). `run` inherits
/// stdio: the child's progress output belongs on the user's terminal.
pub trait ToolRunner: Send + Sync {
    fn which(&self, program: &str) -> Option<PathBuf>;
    fn run(&self, program: &str, args: &[String]) -> Result<RunOutput>;
}

pub trait Effects: Send + Sync {
    fn python(&self) -> &dyn PythonProber;
    fn runner(&self) -> &dyn ToolRunner;
}

pub struct SystemEffects {
    python: Arc<SystemPythonProber>,
    runner: Arc<SystemToolRunner>,
}

impl SystemEffects {
    #[must_use]
    pub fn new() -> Self {
        Self {
            python: Arc::new(SystemPythonProber),
            runner: Arc::new(SystemToolRunner),
        }
    }
}

impl Default for SystemEffects {
    fn default() -> Self {
        Self::new()
    }
}

impl Effects for SystemEffects {
    fn python(&self) -> &dyn PythonProber {
        self.python.as_ref()
    }

    fn runner(&self) -> &dyn ToolRunner {
        self.runner.as_ref()
    }
}

struct SystemPythonProber;

impl PythonProber for SystemPythonProber {
    fn detect_interpreter(&self, snapshot: &EnvSnapshot) -> Result<PathBuf> {
        python_sys::detect_interpreter(snapshot)
    }

    fn sys_probe(&self, python: &Path) -> Result<SysProbe> {
        python_sys::probe_sys(python)
    }

    fn purelib(&self, python: &Path) -> Result<PathBuf> {
        python_sys::probe_purelib(python)
    }
}

struct SystemToolRunner;

impl ToolRunner for SystemToolRunner {
    fn which(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn run(&self, program: &str, args: &[String]) -> Result<RunOutput> {
        run_command_passthrough(program, args)
    }
}

pub type SharedEffects = Arc<dyn Effects>;
