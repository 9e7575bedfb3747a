use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;

use crate::discover::{discover_view_site_packages, SiteDiscovery};
use crate::effects::{Effects, SharedEffects, SystemEffects};
use crate::linker::link_view_packages;
use crate::outcome::{tool_failure_outcome, ExecutionOutcome};
use crate::venv::{bootstrap_packaging, create_venv, venv_interpreter};
use uenv_venv_domain::{
    detect_active_uenv, interpreter_within_mount, pythonpath_conflict, ActiveUenv, EnvSnapshot,
    PYTHONPATH_VAR,
};

#[derive(Clone, Debug)]
pub struct CreateRequest {
    pub venv_dir: PathBuf,
    pub python: Option<PathBuf>,
    pub force: bool,
    pub copies: bool,
}

/// Runs the full create pipeline against the real process environment.
///
/// # Errors
///
/// Returns an error only for unexpected failures (unspawnable probes,
/// filesystem errors); every anticipated refusal is reported through the
/// returned outcome.
pub fn execute(request: &CreateRequest) -> Result<ExecutionOutcome> {
    let effects: SharedEffects = Arc::new(SystemEffects::new());
    let snapshot = EnvSnapshot::capture();
    create_layered_venv(&snapshot, effects.as_ref(), request)
}

/// The gate sequence. Every stage is a hard gate: the first refusal wins,
/// and nothing below the target-preparation step touches the filesystem.
///
/// # Errors
///
/// See [`execute`].
pub fn create_layered_venv(
    snapshot: &EnvSnapshot,
    effects: &dyn Effects,
    request: &CreateRequest,
) -> Result<ExecutionOutcome> {
    let Some(uenv) = detect_active_uenv(snapshot) else {
        return Ok(ExecutionOutcome::user_error(
            "Could not detect an active uenv.",
            json!({
                "reason": "uenv_undetected",
                "hint": "start a uenv with a view before creating a layered venv",
            }),
        ));
    };
    if uenv.name.is_empty() {
        return Ok(ExecutionOutcome::user_error(
            "Could not detect the uenv name.",
            json!({ "reason": "name_undetected" }),
        ));
    }
    if !uenv.mount.is_dir() {
        return Ok(ExecutionOutcome::user_error(
            format!("uenv mount point does not exist: {}", uenv.mount.display()),
            json!({
                "reason": "mount_missing",
                "mount": uenv.mount.display().to_string(),
            }),
        ));
    }
    if uenv.view.is_empty() {
        return Ok(ExecutionOutcome::user_error(
            "Could not detect the active uenv view.",
            json!({ "reason": "view_undetected" }),
        ));
    }

    let python = match &request.python {
        Some(explicit) => explicit.clone(),
        None => match effects.python().detect_interpreter(snapshot) {
            Ok(detected) => detected,
            Err(err) => {
                return Ok(ExecutionOutcome::user_error(
                    format!("no usable python interpreter: {err}"),
                    json!({
                        "reason": "python_undetected",
                        "hint": seed_hint(&uenv),
                    }),
                ))
            }
        },
    };
    let Ok(python) = python.canonicalize() else {
        return Ok(ExecutionOutcome::user_error(
            format!("--python not found: {}", python.display()),
            json!({
                "reason": "python_missing",
                "python": python.display().to_string(),
            }),
        ));
    };
    if !interpreter_within_mount(&python, &uenv.mount) {
        return Ok(ExecutionOutcome::user_error(
            format!(
                "selected python is not inside the uenv mount\n  python: {}\n  mount:  {}",
                python.display(),
                uenv.mount.display()
            ),
            json!({
                "reason": "python_outside_uenv",
                "python": python.display().to_string(),
                "mount": uenv.mount.display().to_string(),
                "hint": seed_hint(&uenv),
            }),
        ));
    }

    let site = match discover_view_site_packages(effects, &uenv.mount, &uenv.view, &python)? {
        SiteDiscovery::Found(site) => site,
        SiteDiscovery::Missing { looked_for } => {
            return Ok(ExecutionOutcome::user_error(
                format!(
                    "could not locate the uenv view's site-packages\n  looked for: {}",
                    looked_for.display()
                ),
                json!({
                    "reason": "site_packages_unresolved",
                    "looked_for": looked_for.display().to_string(),
                    "hint": "ensure the uenv is active and exposes its view on sys.path",
                }),
            ))
        }
    };

    if let Some(value) = pythonpath_conflict(snapshot) {
        return Ok(ExecutionOutcome::user_error(
            format!("{PYTHONPATH_VAR} is set and would break venv tooling: {PYTHONPATH_VAR}={value}"),
            json!({
                "reason": "pythonpath_set",
                "pythonpath": value,
                "hint": "unset it and rerun (bash/zsh: `unset PYTHONPATH`; fish: `set -e PYTHONPATH`; csh/tcsh: `unsetenv PYTHONPATH`)",
            }),
        ));
    }

    let target = &request.venv_dir;
    if request.force && target.exists() {
        fs::remove_dir_all(target)
            .with_context(|| format!("removing existing venv {}", target.display()))?;
    }
    if target.exists() && !dir_is_empty(target) {
        return Ok(ExecutionOutcome::user_error(
            format!(
                "venv directory exists and is not empty: {}",
                target.display()
            ),
            json!({
                "reason": "target_not_empty",
                "target": target.display().to_string(),
                "hint": "pass --force to replace it",
            }),
        ));
    }
    fs::create_dir_all(target)
        .with_context(|| format!("creating venv directory {}", target.display()))?;

    let method = match create_venv(effects, target, &python, request.copies) {
        Ok(method) => method,
        Err(err) => return fatal(err),
    };
    let venv_python = venv_interpreter(target);
    if let Err(err) = bootstrap_packaging(effects, &venv_python) {
        return fatal(err);
    }
    let link = link_view_packages(effects, &venv_python, &site.path)?;

    let activate = target.join("bin").join("activate");
    let message = format!(
        "uenv-venv created with {method}\n  venv:                 {venv}\n  python:               {python}\n  uenv mount/name/view: {mount} / {name} / {view}\n  uenv site-pkgs:       {uenv_site}\n  venv site-pkgs:       {venv_site}\n  wrote:                {pth}\n\nActivate with:\nsource {activate}",
        method = method.as_str(),
        venv = target.display(),
        python = python.display(),
        mount = uenv.mount.display(),
        name = uenv.name,
        view = uenv.view,
        uenv_site = site.path.display(),
        venv_site = link.venv_site_packages.display(),
        pth = link.pth_file.display(),
        activate = activate.display(),
    );
    Ok(ExecutionOutcome::success(
        message,
        json!({
            "method": method.as_str(),
            "venv": target.display().to_string(),
            "python": python.display().to_string(),
            "mount": uenv.mount.display().to_string(),
            "name": uenv.name,
            "view": uenv.view,
            "uenv_site_packages": site.path.display().to_string(),
            "venv_site_packages": link.venv_site_packages.display().to_string(),
            "pth": link.pth_file.display().to_string(),
            "discovered_via": site.discovered_via.as_str(),
        }),
    ))
}

fn seed_hint(uenv: &ActiveUenv) -> String {
    format!(
        "pass --python {}/env/{}/bin/python",
        uenv.mount.display(),
        uenv.view
    )
}

fn fatal(err: anyhow::Error) -> Result<ExecutionOutcome> {
    match tool_failure_outcome(&err) {
        Some(outcome) => Ok(outcome),
        None => Err(err),
    }
}

fn dir_is_empty(path: &Path) -> bool {
    // A non-directory at the target counts as a conflict too.
    fs::read_dir(path).map_or(false, |mut entries| entries.next().is_none())
}
