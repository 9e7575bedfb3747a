#![deny(clippy::all, warnings)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod discovery;
pub mod provenance;
pub mod site_packages;
pub mod snapshot;

pub use discovery::{
    detect_active_uenv, pythonpath_conflict, ActiveUenv, PYTHONPATH_VAR, UENV_MOUNT_LIST_VAR,
    UENV_VIEW_VAR,
};
pub use provenance::interpreter_within_mount;
pub use site_packages::{
    canonical_view_site_packages, has_resolved_prefix, DiscoveredVia, ViewSitePackages,
};
pub use snapshot::EnvSnapshot;
