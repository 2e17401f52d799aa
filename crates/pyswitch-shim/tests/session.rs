#![cfg(unix)]

use pretty_assertions::assert_eq;
use pyswitch_discovery::{CommandProbe, Probe, SearchRoots};
use pyswitch_platform::env::{Export, Vars};
use pyswitch_shim::{ClearOutcome, Decision, Failure, ResolutionRequest, Session, SessionConfig};
use pyswitch_version::MajorMinor;
use std::cell::Cell;
use std::ffi::OsString;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::{TempDir, tempdir};

struct Host {
    home: TempDir,
}

impl Host {
    /// A home with python3.11 and python3.12 under `~/pythons` and an empty
    /// `~/path` directory standing in for `PATH`.
    fn new() -> Self {
        let host = Self {
            home: tempdir().unwrap(),
        };
        host.interpreter("pythons/python3.11", "3.11.9");
        host.interpreter("pythons/python3.12", "3.12.4");
        std::fs::create_dir_all(host.path("path")).unwrap();
        host
    }

    fn path(&self, rel: &str) -> PathBuf { self.home.path().join(rel) }

    fn interpreter(&self, rel: &str, version: &str) -> PathBuf {
        script(&self.path(rel), &format!("echo 'Python {version}'"))
    }

    fn vars(&self, extra: &[(&str, &str)]) -> Vars {
        let mut vars = Vars::from_pairs([
            ("HOME", self.home.path().display().to_string()),
            ("PATH", self.path("path").display().to_string()),
        ]);
        for (k, v) in extra {
            vars.set(*k, *v);
        }
        vars
    }

    fn config(&self) -> SessionConfig {
        let mut config = SessionConfig::new(self.home.path());
        config.roots = SearchRoots::new(["~/.local/bin".to_string(), "~/pythons".to_string()]);
        config
    }

    fn session(&self, extra: &[(&str, &str)]) -> Session { Session::new(self.config(), self.vars(extra)) }

    fn venv(&self, rel: &str, version: &str) -> PathBuf {
        let root = self.path(rel);
        self.interpreter(&format!("{rel}/bin/python"), version);
        std::fs::write(root.join("bin/activate"), "").unwrap();
        std::fs::write(root.join("pyvenv.cfg"), format!("version = {version}\n")).unwrap();
        root
    }
}

fn script(path: &Path, body: &str) -> PathBuf {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_path_buf()
}

fn request(name: &str, args: &[&str]) -> ResolutionRequest {
    ResolutionRequest::new(name, args.iter().copied()).unwrap()
}

fn args(list: &[&str]) -> Vec<OsString> { list.iter().map(OsString::from).collect() }

#[test]
fn test_registry_is_stable_across_rebuilds() {
    let host = Host::new();
    let mut session = host.session(&[]);

    let first = session.registry().clone();
    let second = session.rebuild_registry().clone();
    assert_eq!(first, second);
    assert_eq!(first.versions(), vec![MajorMinor::new(3, 11), MajorMinor::new(3, 12)]);
    assert_eq!(first.get(&MajorMinor::new(3, 12)).unwrap().patch, Some(4));
}

#[test]
fn test_set_publishes_and_dispatches() {
    let host = Host::new();
    let mut session = host.session(&[]);
    let py312 = host.path("pythons/python3.12");

    let exports = session.set(" Python3.12 ", false).unwrap();
    assert!(exports.contains(&Export::set("PYTHON", py312.display().to_string())));
    assert!(exports.contains(&Export::set("PYSWITCH_VERSION", "3.12")));
    assert_eq!(std::fs::read_link(host.path(".local/bin/python3")).unwrap(), py312);

    assert_eq!(
        session.resolve(&request("python", &["app.py"])),
        Ok(Decision::new(&py312, args(&["app.py"])))
    );
    assert_eq!(
        session.resolve(&request("python3.11", &[])),
        Ok(Decision::new(host.path("pythons/python3.11"), vec![]))
    );

    // Published links are never rediscovered as interpreters.
    assert_eq!(session.rebuild_registry().len(), 2);
}

#[test]
fn test_set_leaves_user_local_interpreter_alone() {
    let host = Host::new();
    let user_python = host.interpreter(".local/bin/python3", "3.13.1");
    let mut session = host.session(&[]);
    assert_eq!(
        session.registry().versions(),
        vec![MajorMinor::new(3, 11), MajorMinor::new(3, 12), MajorMinor::new(3, 13)]
    );

    let err = session.set("3.12", false).unwrap_err();
    assert!(matches!(err, Failure::PublishFailed { ref path, .. } if *path == user_python));
    assert!(!std::fs::symlink_metadata(&user_python).unwrap().file_type().is_symlink());
    assert_eq!(session.state().selected(), None);
    assert!(session.rebuild_registry().get(&MajorMinor::new(3, 13)).is_some());

    let err = session.set("3.13", false).unwrap_err();
    assert!(matches!(err, Failure::PublishFailed { .. }));
}

#[test]
fn test_set_rejects_bad_input() {
    let host = Host::new();
    let mut session = host.session(&[]);

    assert_eq!(
        session.set("three", false),
        Err(Failure::InvalidVersionFormat {
            input: "three".to_string()
        })
    );
    assert_eq!(
        session.set("3.9", false),
        Err(Failure::VersionNotFound {
            requested: MajorMinor::new(3, 9),
            available: vec![MajorMinor::new(3, 12), MajorMinor::new(3, 11)],
        })
    );
    assert_eq!(session.state().selected(), None);
    assert!(!host.path(".local/bin/python").exists());
}

#[test]
fn test_set_sees_interpreters_installed_later() {
    let host = Host::new();
    let mut session = host.session(&[]);
    assert!(!session.registry().contains(&MajorMinor::new(3, 13)));

    host.interpreter("pythons/python3.13", "3.13.0");
    assert!(session.set("3.13", false).is_ok());
}

#[test]
fn test_pip_blocked_then_build_mode_then_cleared() {
    let host = Host::new();
    let mut session = host.session(&[]);
    let py312 = host.path("pythons/python3.12");

    assert_eq!(
        session.resolve(&request("pip", &["install", "rich"])),
        Err(Failure::PipBlocked { override_version: None })
    );

    session.set("3.12", false).unwrap();
    assert_eq!(
        session.resolve(&request("python", &["-m", "pip", "install", "rich"])),
        Err(Failure::PipBlocked {
            override_version: Some(MajorMinor::new(3, 12))
        })
    );

    let exports = session.set("3.12", true).unwrap();
    assert!(exports.contains(&Export::set("PIP_REQUIRE_VIRTUALENV", "false")));
    assert_eq!(
        session.resolve(&request("pip", &["install", "rich"])),
        Ok(Decision::new(&py312, args(&["-m", "pip", "install", "rich"])))
    );

    // Switching versions keeps build mode.
    session.set("3.11", false).unwrap();
    assert!(session.state().build_mode());

    let ClearOutcome {
        exports,
        artifacts_pending,
    } = session.clear();
    assert!(artifacts_pending);
    assert!(exports.contains(&Export::set("PIP_REQUIRE_VIRTUALENV", "true")));
    assert_eq!(
        session.resolve(&request("pip", &["install", "rich"])),
        Err(Failure::PipBlocked { override_version: None })
    );
    assert_eq!(
        session.resolve(&request("python", &[])),
        Err(Failure::NoDefaultInterpreter {
            available: vec![MajorMinor::new(3, 12), MajorMinor::new(3, 11)]
        })
    );
}

#[test]
fn test_remove_artifacts_after_clear() {
    let host = Host::new();
    let mut session = host.session(&[]);
    session.set("3.11", false).unwrap();
    session.clear();

    let exports = session.remove_artifacts().unwrap();
    assert!(exports.contains(&Export::unset("PYTHON")));
    assert!(std::fs::symlink_metadata(host.path(".local/bin/python")).is_err());
    assert!(std::fs::symlink_metadata(host.path(".local/bin/python3")).is_err());
    assert!(!session.state().symlink_managed());
}

#[test]
fn test_environment_beats_override() {
    let host = Host::new();
    let root = host.venv("proj/.venv", "3.11.9");
    let venv = root.display().to_string();
    let mut session = host.session(&[("VIRTUAL_ENV", venv.as_str())]);
    session.set("3.12", false).unwrap();

    assert_eq!(
        session.resolve(&request("python", &[])),
        Ok(Decision::new(root.join("bin/python"), vec![]))
    );
    assert_eq!(
        session.resolve(&request("python3.12", &[])),
        Err(Failure::VersionMismatch {
            requested: MajorMinor::new(3, 12),
            actual:    MajorMinor::new(3, 11),
        })
    );
    assert_eq!(
        session.resolve(&request("python3.11", &["-V"])),
        Ok(Decision::new(root.join("bin/python"), args(&["-V"])))
    );
}

#[test]
fn test_venv_adopted_from_path() {
    let host = Host::new();
    let root = host.venv("proj/.venv", "3.12.4");
    let path = root.join("bin").display().to_string();
    let mut session = host.session(&[("PATH", path.as_str())]);

    assert_eq!(
        session.resolve(&request("python", &[])),
        Ok(Decision::new(root.join("bin/python"), vec![]))
    );
    assert_eq!(
        session.take_exports(),
        vec![Export::set("VIRTUAL_ENV", root.display().to_string())]
    );
    assert!(session.take_exports().is_empty());
}

#[test]
fn test_stale_override_is_reported() {
    let host = Host::new();
    let mut session = host.session(&[]);
    session.set("3.12", false).unwrap();
    std::fs::remove_file(host.path("pythons/python3.12")).unwrap();

    let stale = Failure::StaleOverride {
        version: MajorMinor::new(3, 12),
    };
    assert_eq!(session.validate(), Err(stale.clone()));
    assert_eq!(session.resolve(&request("python", &[])), Err(stale));
    assert_eq!(session.state().selected(), Some(MajorMinor::new(3, 12)));
}

/// Counts `--version` probes so tests can tell whether a scan happened.
#[derive(Clone, Default)]
struct CountingProbe {
    banners: Rc<Cell<usize>>,
}

impl Probe for CountingProbe {
    fn banner(&self, exe: &Path) -> Option<String> {
        self.banners.set(self.banners.get() + 1);
        CommandProbe.banner(exe)
    }

    fn introspect(&self, exe: &Path) -> Option<String> { CommandProbe.introspect(exe) }
}

#[test]
fn test_bypass_skips_scan_when_path_has_the_command() {
    let host = Host::new();
    let system_python = script(&host.path("path/python3"), "exit 0");
    let probe = CountingProbe::default();
    let vars = host.vars(&[("CI", "1")]);
    let mut session = Session::with_probe(host.config(), vars, probe.clone());

    assert_eq!(
        session.resolve(&request("python3", &["-V"])),
        Ok(Decision::new(system_python, args(&["-V"])))
    );
    assert_eq!(probe.banners.get(), 0);

    // No unmanaged pip: the fallback needs the registry.
    assert_eq!(
        session.resolve(&request("pip", &["list"])),
        Ok(Decision::new(host.path("pythons/python3.12"), args(&["-m", "pip", "list"])))
    );
    assert_eq!(probe.banners.get(), 2);
}

#[test]
fn test_bypass_dispatches_unmanaged() {
    let host = Host::new();
    let system_pip = script(&host.path("path/pip"), "exit 0");
    let mut session = host.session(&[("GITHUB_ACTIONS", "true")]);
    session.set("3.12", false).unwrap();

    assert_eq!(
        session.resolve(&request("pip", &["install", "rich"])),
        Ok(Decision::new(system_pip, args(&["install", "rich"])))
    );
    assert_eq!(
        session.resolve(&request("python", &[])),
        Ok(Decision::new(host.path("pythons/python3.12"), vec![]))
    );
}

#[test]
fn test_state_carried_by_exports() {
    let host = Host::new();
    let mut first = host.session(&[]);
    let exports = first.set("3.11", true).unwrap();

    let mut vars = host.vars(&[]);
    for export in &exports {
        vars.apply(export);
    }
    let mut second = Session::new(host.config(), vars);
    assert_eq!(second.state().selected(), Some(MajorMinor::new(3, 11)));
    assert!(second.state().build_mode());
    assert!(second.state().symlink_managed());
    assert_eq!(
        second.resolve(&request("pip", &[])),
        Ok(Decision::new(host.path("pythons/python3.11"), args(&["-m", "pip"])))
    );
}
