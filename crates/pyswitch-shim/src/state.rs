//! Override and build-mode state, carried between invocations of one shell
//! session through the `PYSWITCH_*` variables.

use pyswitch_platform::env::{Export, Vars};
use pyswitch_version::MajorMinor;

pub const VERSION_VAR: &str = "PYSWITCH_VERSION";
pub const BUILD_MODE_VAR: &str = "PYSWITCH_BUILD_MODE";
pub const SYMLINKS_VAR: &str = "PYSWITCH_SYMLINKS";
pub const PIP_REQUIRE_VIRTUALENV: &str = "PIP_REQUIRE_VIRTUALENV";

/// `build_mode` is only ever true while `selected` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverrideState {
    selected:        Option<MajorMinor>,
    build_mode:      bool,
    symlink_managed: bool,
}

impl OverrideState {
    pub fn from_vars(vars: &Vars) -> Self {
        let selected = vars.get(VERSION_VAR).and_then(|v| MajorMinor::parse(v.trim()).ok());
        Self {
            selected,
            build_mode: selected.is_some() && vars.is_truthy(BUILD_MODE_VAR),
            symlink_managed: vars.is_truthy(SYMLINKS_VAR),
        }
    }

    pub fn selected(&self) -> Option<MajorMinor> { self.selected }

    pub fn build_mode(&self) -> bool { self.build_mode }

    pub fn symlink_managed(&self) -> bool { self.symlink_managed }

    /// Select `version`. Build mode is switched on when requested and
    /// otherwise left as it was.
    pub(crate) fn select(&mut self, version: MajorMinor, build_mode: bool) -> Vec<Export> {
        self.selected = Some(version);
        self.build_mode |= build_mode;

        let mut exports = vec![
            Export::set(VERSION_VAR, version.to_string()),
            Export::set(BUILD_MODE_VAR, if self.build_mode { "1" } else { "0" }),
        ];
        if build_mode {
            exports.push(Export::set(PIP_REQUIRE_VIRTUALENV, "false"));
        }
        exports
    }

    pub(crate) fn clear(&mut self) -> Vec<Export> {
        self.selected = None;
        self.build_mode = false;
        vec![
            Export::unset(VERSION_VAR),
            Export::unset(BUILD_MODE_VAR),
            Export::set(PIP_REQUIRE_VIRTUALENV, "true"),
        ]
    }

    pub(crate) fn mark_published(&mut self, managed: bool) -> Export {
        self.symlink_managed = managed;
        if managed {
            Export::set(SYMLINKS_VAR, "1")
        } else {
            Export::unset(SYMLINKS_VAR)
        }
    }
}
