use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::effects::Effects;

/// Name of the path-injection file dropped into the venv's site-packages.
pub const PTH_FILE_NAME: &str = "uenv.pth";

#[derive(Clone, Debug)]
pub(crate) struct LinkReport {
    pub venv_site_packages: PathBuf,
    pub pth_file: PathBuf,
}

/// Writes the path-injection file that makes the venv's interpreter see
/// the view's packages: one line, the absolute view site-packages path.
/// Rerunning with the same inputs rewrites the same bytes.
pub(crate) fn link_view_packages(
    effects: &dyn Effects,
    venv_python: &Path,
    view_site_packages: &Path,
) -> Result<LinkReport> {
    let venv_site_packages = effects.python().purelib(venv_python)?;
    let pth_file = venv_site_packages.join(PTH_FILE_NAME);
    let contents = format!("{}\n", view_site_packages.display());
    fs::write(&pth_file, contents).with_context(|| format!("writing {}", pth_file.display()))?;
    tracing::debug!(pth = %pth_file.display(), "linked view site-packages into the venv");
    Ok(LinkReport {
        venv_site_packages,
        pth_file,
    })
}
