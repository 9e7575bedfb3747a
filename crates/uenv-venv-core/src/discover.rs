use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::effects::Effects;
use uenv_venv_domain::{
    canonical_view_site_packages, has_resolved_prefix, DiscoveredVia, ViewSitePackages,
};

pub(crate) enum SiteDiscovery {
    Found(ViewSitePackages),
    Missing { looked_for: PathBuf },
}

/// Locates the view's site-packages for the chosen interpreter.
///
/// The interpreter's own report of its module search path is authoritative:
/// startup hooks can expose a view through entries the deterministic guess
/// does not predict. The canonical view path is only consulted when the
/// report has no match.
///
/// # Errors
///
/// Returns an error when the interpreter cannot be probed.
pub(crate) fn discover_view_site_packages(
    effects: &dyn Effects,
    mount: &Path,
    view: &str,
    python: &Path,
) -> Result<SiteDiscovery> {
    let probe = effects.python().sys_probe(python)?;
    tracing::debug!(version = %probe.version, entries = probe.sys_path.len(), "probed interpreter");

    let mount = mount.canonicalize().unwrap_or_else(|_| mount.to_path_buf());
    let want = canonical_view_site_packages(&mount, view, &probe.version);
    let want = want.canonicalize().unwrap_or(want);

    for entry in &probe.sys_path {
        let Ok(resolved) = Path::new(entry).canonicalize() else {
            continue;
        };
        if resolved.is_dir() && has_resolved_prefix(&resolved, &want) {
            return Ok(SiteDiscovery::Found(ViewSitePackages {
                path: resolved,
                discovered_via: DiscoveredVia::SysPath,
            }));
        }
    }

    if want.is_dir() {
        return Ok(SiteDiscovery::Found(ViewSitePackages {
            path: want,
            discovered_via: DiscoveredVia::Fallback,
        }));
    }

    Ok(SiteDiscovery::Missing { looked_for: want })
}
