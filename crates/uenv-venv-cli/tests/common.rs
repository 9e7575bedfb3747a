#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;

/// PATH for child processes: standard tools, no `uv`.
pub const SAFE_PATH: &str = "/usr/bin:/bin";

/// The binary with uenv/venv-related variables scrubbed so the host
/// environment cannot leak into a test.
pub fn uenv_venv_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("uenv-venv");
    cmd.env_remove("UENV_VIEW");
    cmd.env_remove("UENV_MOUNT_LIST");
    cmd.env_remove("PYTHONPATH");
    cmd.env_remove("UENV_VENV_PYTHON");
    cmd.env_remove("NO_COLOR");
    cmd.env("PATH", SAFE_PATH);
    cmd
}

pub struct FakeUenv {
    pub temp: tempfile::TempDir,
    pub mount: PathBuf,
    pub python: PathBuf,
    pub site_packages: PathBuf,
    pub view: String,
}

impl FakeUenv {
    pub fn composite(&self) -> String {
        format!("{}:base:{}", self.mount.display(), self.view)
    }

    pub fn workdir(&self) -> &Path {
        self.temp.path()
    }
}

#[cfg(unix)]
pub enum FakePython {
    Working,
    VenvExits(i32),
}

/// A uenv mount tree with a scripted interpreter inside it. The script
/// answers the two introspection probes, fakes `-m venv` by copying
/// itself into the target, and treats ensurepip/pip as no-ops.
#[cfg(unix)]
pub fn fake_uenv() -> FakeUenv {
    fake_uenv_with(&FakePython::Working)
}

#[cfg(unix)]
pub fn fake_uenv_with(python_kind: &FakePython) -> FakeUenv {
    let temp = tempfile::tempdir().expect("tempdir");
    let mount = temp.path().join("image");
    let view = "default".to_string();
    let view_root = mount.join("env").join(&view);
    let site_packages = view_root
        .join("lib")
        .join("python3.11")
        .join("site-packages");
    std::fs::create_dir_all(&site_packages).expect("create site-packages");
    let bin = view_root.join("bin");
    std::fs::create_dir_all(&bin).expect("create bin");
    let python = bin.join("python");
    write_fake_python(&python, &site_packages, python_kind);
    FakeUenv {
        temp,
        mount,
        python,
        site_packages,
        view,
    }
}

#[cfg(unix)]
fn write_fake_python(path: &Path, site: &Path, kind: &FakePython) {
    let venv_action = match kind {
        FakePython::Working => "target=\"$3\"\n      mkdir -p \"$target/bin\" \"$target/lib/python3.11/site-packages\"\n      cp \"$0\" \"$target/bin/python\"\n      chmod +x \"$target/bin/python\"".to_string(),
        FakePython::VenvExits(code) => format!("exit {code}"),
    };
    let script = format!(
        r#"#!/bin/sh
# python stand-in: answers the probes and fakes venv creation
site="{site}"
if [ "$1" = "-c" ]; then
  case "$2" in
    *sys_path*)
      printf '{{"version": "3.11", "sys_path": ["%s"]}}\n' "$site"
      ;;
    *purelib*)
      here=$(CDPATH= cd -- "$(dirname -- "$0")/.." && pwd)
      printf '%s\n' "$here/lib/python3.11/site-packages"
      ;;
    *)
      exit 1
      ;;
  esac
  exit 0
fi
if [ "$1" = "-m" ]; then
  case "$2" in
    venv)
      {venv_action}
      ;;
    ensurepip|pip)
      :
      ;;
    *)
      exit 1
      ;;
  esac
  exit 0
fi
exit 1
"#,
        site = site.display(),
        venv_action = venv_action,
    );
    write_executable(path, &script);
}

/// A `uv` stand-in handling `uv venv` and `uv pip`, for the fast-path
/// tests. Returns the directory to prepend to PATH.
#[cfg(unix)]
pub fn write_fake_uv(dir: &Path) -> PathBuf {
    std::fs::create_dir_all(dir).expect("create tool dir");
    let script = r#"#!/bin/sh
# uv stand-in: create the venv by copying the seeding python
if [ "$1" = "venv" ]; then
  target="$2"
  shift 2
  python=""
  while [ $# -gt 0 ]; do
    if [ "$1" = "--python" ]; then
      python="$2"
      shift 2
    else
      shift
    fi
  done
  mkdir -p "$target/bin" "$target/lib/python3.11/site-packages"
  cp "$python" "$target/bin/python"
  chmod +x "$target/bin/python"
  exit 0
fi
if [ "$1" = "pip" ]; then
  exit 0
fi
exit 1
"#;
    write_executable(&dir.join("uv"), script);
    dir.to_path_buf()
}

#[cfg(unix)]
fn write_executable(path: &Path, contents: &str) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, contents).expect("write script");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("mark executable");
}

pub fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

pub fn stderr_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
}
