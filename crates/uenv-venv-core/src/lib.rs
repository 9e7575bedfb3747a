#![deny(clippy::all, warnings)]

mod create;
mod discover;
mod effects;
mod linker;
mod outcome;
mod process;
mod python_sys;
#[cfg(test)]
mod testing;
mod venv;

pub use create::{create_layered_venv, execute, CreateRequest};
pub use effects::{Effects, PythonProber, SharedEffects, SystemEffects, ToolRunner};
pub use linker::PTH_FILE_NAME;
pub use outcome::{
    to_json_response, tool_failure_outcome, CommandStatus, ExecutionOutcome, ToolFailure,
};
pub use process::RunOutput;
pub use python_sys::{SysProbe, PYTHON_OVERRIDE_VAR};
pub use venv::CreationMethod;
