use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::effects::Effects;
use crate::outcome::ToolFailure;
use crate::process::display_command;

/// Which external facility produced the venv; reported in the summary the
/// way the facility is invoked (`uv` / `venv`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreationMethod {
    Uv,
    Stdlib,
}

impl CreationMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CreationMethod::Uv => "uv",
            CreationMethod::Stdlib => "venv",
        }
    }
}

/// Creation methods tried in order; every method except the last demotes
/// its failure to a fallback attempt.
const CREATION_ORDER: [CreationMethod; 2] = [CreationMethod::Uv, CreationMethod::Stdlib];

/// unix venv layout throughout; the interpreter a venv exposes always
/// lands at bin/python.
pub(crate) fn venv_interpreter(target: &Path) -> PathBuf {
    target.join("bin").join("python")
}

/// Builds the venv at `target`, seeded from `python`.
///
/// # Errors
///
/// Returns an error (carrying a [`ToolFailure`] when the child exited
/// non-zero) once the last method in the order has failed.
pub(crate) fn create_venv(
    effects: &dyn Effects,
    target: &Path,
    python: &Path,
    copies: bool,
) -> Result<CreationMethod> {
    let mut methods = CREATION_ORDER.iter().copied().peekable();
    while let Some(method) = methods.next() {
        match attempt(effects, method, target, python, copies) {
            Ok(()) => return Ok(method),
            Err(err) if methods.peek().is_some() => {
                tracing::debug!(method = method.as_str(), %err, "creation method failed; falling back");
            }
            Err(err) => return Err(err),
        }
    }
    Err(anyhow!("no venv creation methods configured"))
}

fn attempt(
    effects: &dyn Effects,
    method: CreationMethod,
    target: &Path,
    python: &Path,
    copies: bool,
) -> Result<()> {
    match method {
        CreationMethod::Uv => {
            let uv = effects
                .runner()
                .which("uv")
                .ok_or_else(|| anyhow!("uv not found on PATH"))?;
            let mut args = vec![
                "venv".to_string(),
                target.to_string_lossy().into_owned(),
                "--python".to_string(),
                python.to_string_lossy().into_owned(),
                "--seed".to_string(),
            ];
            if copies {
                args.push("--copies".to_string());
            }
            run_checked(effects, &uv.to_string_lossy(), &args)
        }
        CreationMethod::Stdlib => {
            let mut args = vec![
                "-m".to_string(),
                "venv".to_string(),
                target.to_string_lossy().into_owned(),
            ];
            if copies {
                args.push("--copies".to_string());
            }
            run_checked(effects, &python.to_string_lossy(), &args)
        }
    }
}

/// Makes sure the fresh venv carries a current packaging toolchain.
///
/// ensurepip may legitimately be unavailable or already satisfied, so its
/// failure is only logged; the follow-up upgrade is the authoritative step
/// and its failure is fatal.
pub(crate) fn bootstrap_packaging(effects: &dyn Effects, venv_python: &Path) -> Result<()> {
    let python = venv_python.to_string_lossy().into_owned();

    let ensure: Vec<String> = ["-m", "ensurepip", "--upgrade"]
        .iter()
        .map(ToString::to_string)
        .collect();
    match effects.runner().run(&python, &ensure) {
        Ok(output) if output.code == 0 => {}
        Ok(output) => {
            tracing::debug!(code = output.code, "ensurepip reported failure; continuing");
        }
        Err(err) => tracing::debug!(%err, "ensurepip could not run; continuing"),
    }

    if let Some(uv) = effects.runner().which("uv") {
        let args: Vec<String> = ["pip", "install", "-p", python.as_str(), "-U", "pip", "setuptools", "wheel"]
            .iter()
            .map(ToString::to_string)
            .collect();
        run_checked(effects, &uv.to_string_lossy(), &args)
    } else {
        let args: Vec<String> = ["-m", "pip", "install", "-U", "pip", "setuptools", "wheel"]
            .iter()
            .map(ToString::to_string)
            .collect();
        run_checked(effects, &python, &args)
    }
}

fn run_checked(effects: &dyn Effects, program: &str, args: &[String]) -> Result<()> {
    tracing::debug!(program, ?args, "spawning");
    let output = effects.runner().run(program, args)?;
    if output.code != 0 {
        return Err(ToolFailure {
            command: display_command(program, args),
            code: output.code,
        }
        .into());
    }
    Ok(())
}
