use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Result};

use crate::effects::{Effects, PythonProber, ToolRunner};
use crate::process::{display_command, RunOutput};
use crate::python_sys::SysProbe;
use uenv_venv_domain::EnvSnapshot;

/// Scripted effects for unit tests: fixed probe data, no subprocesses,
/// recorded tool invocations.
pub(crate) struct FakeEffects {
    pub version: String,
    pub sys_path: Vec<PathBuf>,
    pub purelib: Option<PathBuf>,
    pub interpreter: Option<PathBuf>,
    tools: Vec<&'static str>,
    exit_codes: Vec<(&'static str, i32)>,
    calls: Mutex<Vec<String>>,
}

impl FakeEffects {
    pub fn new() -> Self {
        Self {
            version: "3.11".to_string(),
            sys_path: Vec::new(),
            purelib: None,
            interpreter: None,
            tools: Vec::new(),
            exit_codes: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Programs `which` should find (at `/fake/bin/<name>`).
    pub fn with_tools(mut self, tools: &[&'static str]) -> Self {
        self.tools = tools.to_vec();
        self
    }

    /// `(needle, code)` rules; the first needle contained in the rendered
    /// command line decides the exit code (default 0).
    pub fn with_exit_codes(mut self, rules: &[(&'static str, i32)]) -> Self {
        self.exit_codes = rules.to_vec();
        self
    }

    pub fn with_sys_path(mut self, entries: &[PathBuf]) -> Self {
        self.sys_path = entries.to_vec();
        self
    }

    pub fn with_purelib(mut self, purelib: PathBuf) -> Self {
        self.purelib = Some(purelib);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn code_for(&self, display: &str) -> i32 {
        self.exit_codes
            .iter()
            .find(|(needle, _)| display.contains(needle))
            .map_or(0, |(_, code)| *code)
    }
}

impl Effects for FakeEffects {
    fn python(&self) -> &dyn PythonProber {
        self
    }

    fn runner(&self) -> &dyn ToolRunner {
        self
    }
}

impl PythonProber for FakeEffects {
    fn detect_interpreter(&self, _snapshot: &EnvSnapshot) -> Result<PathBuf> {
        self.interpreter
            .clone()
            .ok_or_else(|| anyhow!("no interpreter configured"))
    }

    fn sys_probe(&self, _python: &Path) -> Result<SysProbe> {
        Ok(SysProbe {
            version: self.version.clone(),
            sys_path: self
                .sys_path
                .iter()
                .map(|path| path.to_string_lossy().into_owned())
                .collect(),
        })
    }

    fn purelib(&self, _python: &Path) -> Result<PathBuf> {
        self.purelib
            .clone()
            .ok_or_else(|| anyhow!("no purelib configured"))
    }
}

impl ToolRunner for FakeEffects {
    fn which(&self, program: &str) -> Option<PathBuf> {
        self.tools
            .contains(&program)
            .then(|| PathBuf::from(format!("/fake/bin/{program}")))
    }

    fn run(&self, program: &str, args: &[String]) -> Result<RunOutput> {
        let display = display_command(program, args);
        let code = self.code_for(&display);
        self.calls.lock().expect("calls lock").push(display);
        Ok(RunOutput {
            code,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}
