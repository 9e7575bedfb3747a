use std::path::Path;

/// Whether `python` physically resides inside `mount`.
///
/// Both sides are fully resolved first, so a symlinked interpreter is
/// judged by where it actually lives, then compared as strings with a
/// trailing separator appended to the mount. Any resolution failure counts
/// as "outside": this gate protects the site-packages linkage and fails
/// closed.
pub fn interpreter_within_mount(python: &Path, mount: &Path) -> bool {
    let (Ok(python), Ok(mount)) = (python.canonicalize(), mount.canonicalize()) else {
        return false;
    };
    let mut prefix = mount.to_string_lossy().into_owned();
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    python.to_string_lossy().starts_with(&prefix)
}
