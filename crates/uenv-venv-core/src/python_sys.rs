use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use which::which;

use crate::process::run_command;
use uenv_venv_domain::EnvSnapshot;

/// Explicit interpreter override consulted before the PATH scan.
pub const PYTHON_OVERRIDE_VAR: &str = "UENV_VENV_PYTHON";

const SYS_PROBE_SCRIPT: &str = r#"import json, sys
print(json.dumps({"version": f"{sys.version_info[0]}.{sys.version_info[1]}", "sys_path": sys.path}))
"#;

const PURELIB_SCRIPT: &str = "import sysconfig; print(sysconfig.get_paths()['purelib'])";

/// What an interpreter reports about itself: major.minor version and its
/// full module search path.
#[derive(Clone, Debug, Deserialize)]
pub struct SysProbe {
    pub version: String,
    pub sys_path: Vec<String>,
}

/// Picks the interpreter that seeds the venv when none was given on the
/// command line. Under an active uenv view the view's python is first on
/// PATH, so the scan lands on it.
///
/// # Errors
///
/// Returns an error when no candidate is found.
pub(crate) fn detect_interpreter(snapshot: &EnvSnapshot) -> Result<PathBuf> {
    if let Some(explicit) = snapshot.var(PYTHON_OVERRIDE_VAR) {
        return Ok(PathBuf::from(explicit));
    }
    for candidate in ["python3", "python"] {
        if let Ok(path) = which(candidate) {
            return Ok(path);
        }
    }
    bail!("no python interpreter found on PATH; pass --python or set {PYTHON_OVERRIDE_VAR}")
}

/// Asks the interpreter for its version and module search path.
///
/// # Errors
///
/// Returns an error when the interpreter cannot be invoked or the payload
/// is malformed.
pub(crate) fn probe_sys(python: &Path) -> Result<SysProbe> {
    let payload = run_probe(python, SYS_PROBE_SCRIPT, "version and search path")?;
    serde_json::from_str(&payload).context("invalid interpreter probe payload")
}

/// Asks the interpreter where its packages install to (one plain line).
///
/// # Errors
///
/// Returns an error when the interpreter cannot be invoked or reports
/// nothing.
pub(crate) fn probe_purelib(python: &Path) -> Result<PathBuf> {
    let payload = run_probe(python, PURELIB_SCRIPT, "install paths")?;
    let line = payload
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .ok_or_else(|| anyhow!("empty install-path report from {}", python.display()))?;
    Ok(PathBuf::from(line))
}

fn run_probe(python: &Path, script: &str, guide: &str) -> Result<String> {
    let program = python.to_string_lossy();
    let args = ["-c".to_string(), script.to_string()];
    let output = run_command(&program, &args)
        .with_context(|| format!("failed to probe {guide} via {program}"))?;
    if output.code != 0 {
        bail!("python {guide} probe failed: {}", output.stderr.trim());
    }
    Ok(output.stdout)
}
