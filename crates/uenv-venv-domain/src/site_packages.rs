use std::path::{Path, PathBuf};

/// How the view's site-packages directory was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscoveredVia {
    /// Taken from the interpreter's own module search path report.
    SysPath,
    /// The deterministic view path, used when the report had no match.
    Fallback,
}

impl DiscoveredVia {
    pub fn as_str(self) -> &'static str {
        match self {
            DiscoveredVia::SysPath => "sys-path",
            DiscoveredVia::Fallback => "fallback",
        }
    }
}

/// A view's site-packages directory, owned by the base environment and
/// never written to by this tool.
#[derive(Clone, Debug)]
pub struct ViewSitePackages {
    pub path: PathBuf,
    pub discovered_via: DiscoveredVia,
}

/// Deterministic guess for where a view keeps its installed packages.
pub fn canonical_view_site_packages(mount: &Path, view: &str, python_version: &str) -> PathBuf {
    mount
        .join("env")
        .join(view)
        .join("lib")
        .join(format!("python{python_version}"))
        .join("site-packages")
}

/// Prefix-or-equal comparison on resolved path strings.
///
/// Interpreters can expose a view through entries nested below the
/// canonical directory, so anything at or under it counts. Unlike the
/// provenance check, equality with `prefix` matches, and the comparison is
/// on raw strings, not path components.
pub fn has_resolved_prefix(path: &Path, prefix: &Path) -> bool {
    path.to_string_lossy()
        .starts_with(prefix.to_string_lossy().as_ref())
}
