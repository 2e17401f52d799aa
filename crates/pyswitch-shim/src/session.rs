use crate::policy::{self, Decision, Indicators, Inputs, PolicyMarkers};
use crate::{Failure, Locate, OverrideState, PathLocator, Publisher, ResolutionRequest, Result};
use pyswitch_context::{Detection, Detector, VersionCache};
use pyswitch_discovery::{CommandProbe, Probe, Registry, Scanner, SearchRoots};
use pyswitch_platform::env::{Export, Vars};
use pyswitch_version::MajorMinor;
use std::path::PathBuf;

/// Where a session looks and what it owns.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub roots:        SearchRoots,
    pub home:         PathBuf,
    pub user_local:   PathBuf,
    pub artifact_dir: PathBuf,
    pub markers:      PolicyMarkers,
    /// Whether requests come from an interactive shell. `false` bypasses
    /// the policy.
    pub interactive:  bool,
}

impl SessionConfig {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let user_local = pyswitch_platform::dir::user_local_bin(&home);
        Self {
            roots: SearchRoots::default(),
            artifact_dir: user_local.clone(),
            user_local,
            home,
            markers: PolicyMarkers::default(),
            interactive: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearOutcome {
    pub exports:           Vec<Export>,
    /// Published links are still in place; call
    /// [`Session::remove_artifacts`] once the user agrees.
    pub artifacts_pending: bool,
}

/// One shell session's view of the engine.
///
/// The session never touches the process environment. Every variable change
/// is applied to its own [`Vars`] and returned as an [`Export`] for the
/// calling layer.
pub struct Session<P = CommandProbe> {
    config:    SessionConfig,
    scanner:   Scanner<P>,
    detector:  Detector<P>,
    publisher: Publisher,
    managed:   Vec<PathBuf>,
    vars:      Vars,
    state:     OverrideState,
    registry:  Option<Registry>,
    versions:  VersionCache,
    pending:   Vec<Export>,
}

impl Session<CommandProbe> {
    pub fn new(config: SessionConfig, vars: Vars) -> Self { Self::with_probe(config, vars, CommandProbe) }
}

impl<P: Probe + Clone> Session<P> {
    pub fn with_probe(config: SessionConfig, vars: Vars, probe: P) -> Self {
        let publisher = Publisher::new(&config.artifact_dir);
        let managed = publisher.artifacts();
        let scanner = Scanner::new(config.roots.clone(), &config.home, probe.clone())
            .user_local(&config.user_local)
            .managed(managed.clone());
        let detector = Detector::new(probe).managed(managed.clone());

        Self {
            state: OverrideState::from_vars(&vars),
            config,
            scanner,
            detector,
            publisher,
            managed,
            vars,
            registry: None,
            versions: VersionCache::new(),
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> &OverrideState { &self.state }

    pub fn vars(&self) -> &Vars { &self.vars }

    pub fn config(&self) -> &SessionConfig { &self.config }

    pub fn publisher(&self) -> &Publisher { &self.publisher }

    /// Cached registry, scanned on first use.
    pub fn registry(&mut self) -> &Registry {
        self.registry.get_or_insert_with(|| self.scanner.scan())
    }

    pub fn rebuild_registry(&mut self) -> &Registry {
        tracing::debug!("rebuilding interpreter registry");
        self.registry.insert(self.scanner.scan())
    }

    /// Detect the active environment, recording any export it produces.
    pub fn detect(&mut self) -> Detection {
        let detection = self.detector.detect(&mut self.vars);
        if let Some(export) = &detection.export {
            self.pending.push(export.clone());
        }
        detection
    }

    pub fn own_version(&mut self, detection: &Detection) -> Option<MajorMinor> {
        self.detector.own_version(&detection.context, &mut self.versions)
    }

    /// Exports produced as side effects of resolution since the last call.
    pub fn take_exports(&mut self) -> Vec<Export> { std::mem::take(&mut self.pending) }

    pub fn set(&mut self, input: &str, build_mode: bool) -> Result<Vec<Export>> {
        let version = MajorMinor::normalize(input).map_err(|_| Failure::InvalidVersionFormat {
            input: input.to_string(),
        })?;

        let registry = self.rebuild_registry();
        let record = registry
            .get(&version)
            .cloned()
            .ok_or_else(|| Failure::VersionNotFound {
                requested: version,
                available: registry.versions_descending(),
            })?;

        let mut exports = self.publisher.publish(&record.path)?;
        exports.push(self.state.mark_published(true));
        exports.extend(self.state.select(version, build_mode));
        tracing::info!(%version, build_mode = self.state.build_mode(), "override selected");

        self.apply(&exports);
        Ok(exports)
    }

    pub fn clear(&mut self) -> ClearOutcome {
        let exports = self.state.clear();
        self.apply(&exports);
        tracing::info!("override cleared");
        ClearOutcome {
            exports,
            artifacts_pending: self.state.symlink_managed(),
        }
    }

    pub fn remove_artifacts(&mut self) -> Result<Vec<Export>> {
        let published = self.vars.get(crate::publish::PYSWITCH_PYTHON_VAR).map(PathBuf::from);
        let mut exports = self.publisher.retract(published.as_deref())?;
        exports.push(self.state.mark_published(false));
        self.apply(&exports);
        Ok(exports)
    }

    /// Rescan, then check that the override still maps to an executable.
    pub fn validate(&mut self) -> Result<()> {
        let selected = self.state.selected();
        let registry = self.rebuild_registry();
        let Some(version) = selected else {
            return Ok(());
        };
        match registry.get(&version) {
            Some(record) if pyswitch_fs::is_executable(&record.path) => Ok(()),
            _ => {
                tracing::debug!(%version, "selected interpreter is gone");
                Err(Failure::StaleOverride { version })
            }
        }
    }

    pub fn indicators(&self) -> Indicators {
        Indicators::from_vars(&self.vars, &self.config.markers, self.config.interactive)
    }

    pub fn resolve(&mut self, request: &ResolutionRequest) -> Result<Decision> {
        let indicators = self.indicators();
        if indicators.bypass {
            // The registry is only needed when nothing unmanaged is on PATH.
            let locator = PathLocator::new(&self.vars, &self.managed);
            if let Some(program) = locator.unmanaged(&request.name) {
                tracing::debug!(command = %request.name, program = %program.display(), "bypassed");
                return Ok(Decision::new(program, request.args.clone()));
            }
        }
        let detection = if indicators.bypass {
            Detection {
                context: Default::default(),
                export:  None,
            }
        } else {
            self.detect()
        };
        let own_version = if detection.context.is_active() {
            self.own_version(&detection)
        } else {
            None
        };

        if !indicators.bypass && !detection.context.is_active() && self.state.selected().is_some() {
            self.validate()?;
        }

        let registry = self.registry.get_or_insert_with(|| self.scanner.scan());
        let locator = PathLocator::new(&self.vars, &self.managed);
        let decision = policy::decide(
            &Inputs {
                request,
                registry,
                context: &detection.context,
                own_version,
                state: &self.state,
                indicators,
            },
            &locator,
        );

        match &decision {
            Ok(d) => tracing::debug!(command = %request.name, program = %d.program.display(), "resolved"),
            Err(err) => tracing::debug!(command = %request.name, error = %err, "refused"),
        }
        decision
    }

    fn apply(&mut self, exports: &[Export]) {
        for export in exports {
            self.vars.apply(export);
        }
    }
}
