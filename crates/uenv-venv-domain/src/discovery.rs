use std::path::PathBuf;

use crate::snapshot::EnvSnapshot;

/// Composite descriptor: `mount:name:view`.
pub const UENV_VIEW_VAR: &str = "UENV_VIEW";
/// Fallback descriptor: whitespace/comma-separated `squashfs:mount` tokens.
pub const UENV_MOUNT_LIST_VAR: &str = "UENV_MOUNT_LIST";
/// Its mere presence (non-empty) aborts the run; venvs and a global search
/// path override do not mix.
pub const PYTHONPATH_VAR: &str = "PYTHONPATH";

/// The active base environment as advertised by the uenv runtime.
///
/// `name` and `view` are empty when discovery had to fall back to the mount
/// list; callers treat empty fields as fatal before creating anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveUenv {
    pub mount: PathBuf,
    pub name: String,
    pub view: String,
}

/// Locates the active uenv from the captured environment.
///
/// The composite `UENV_VIEW` descriptor wins when it splits into exactly
/// three colon-delimited fields (empty fields are accepted here and
/// rejected by later gates). Otherwise the last `squashfs:mount` token of
/// `UENV_MOUNT_LIST` supplies the mount: later entries are the more
/// specific, overlay-like mounts. Returns `None` when neither variable
/// yields a mount.
pub fn detect_active_uenv(snapshot: &EnvSnapshot) -> Option<ActiveUenv> {
    if let Some(composite) = snapshot.var(UENV_VIEW_VAR) {
        if !composite.is_empty() {
            let fields: Vec<&str> = composite.splitn(4, ':').collect();
            if fields.len() == 3 {
                return Some(ActiveUenv {
                    mount: PathBuf::from(fields[0]),
                    name: fields[1].to_string(),
                    view: fields[2].to_string(),
                });
            }
            tracing::debug!(
                value = composite,
                "malformed {UENV_VIEW_VAR}; trying {UENV_MOUNT_LIST_VAR}"
            );
        }
    }

    let list = snapshot.var(UENV_MOUNT_LIST_VAR).unwrap_or_default();
    for token in list.trim().split([' ', ',']).rev() {
        if token.is_empty() || !token.contains(':') {
            continue;
        }
        let mount = token.rsplit(':').next().unwrap_or_default();
        return Some(ActiveUenv {
            mount: PathBuf::from(mount),
            name: String::new(),
            view: String::new(),
        });
    }
    None
}

/// Returns the offending `PYTHONPATH` value when it is set and non-empty.
pub fn pythonpath_conflict(snapshot: &EnvSnapshot) -> Option<&str> {
    snapshot.var(PYTHONPATH_VAR).filter(|value| !value.is_empty())
}
