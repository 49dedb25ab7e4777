//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the two user-facing workflows:
//!
//! - `init_project`: resolve the project root, render the project (and an
//!   optional first study), write it, optionally initialise git and open
//!   the project file.
//! - `add_study`: find the project, resolve the study's authoring mode,
//!   write the study, patch the README's study list, optionally commit.
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).
//! Nothing is ever rolled back: a failed run leaves what it wrote, and
//! re-running with the keep-existing policy completes it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, IdeOpener, VcsRunner},
        services::{materializer::ArtifactMaterializer, path_policy::PathPolicy},
    },
    domain::{
        ArtifactKind, ArtifactPlan, ArtifactStatus, AuthoringMode, DetectedMode, DomainValidator,
        HeadingPattern, IndexDocument, NameKind, Outcome, OverwritePolicy, PatchStatus,
        ProjectConfig, StudyListing, StudySummary, StudyUnit, layout, mode_detector, plan,
        templates,
    },
    error::{ScaffoldError, ScaffoldResult},
};

/// Heading of the README section that lists the studies.
pub const STUDIES_HEADING: &str = "Studies";
const STUDIES_HEADING_LEVEL: usize = 2;

/// Progress of a scaffold run, logged at each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Validating,
    ModeResolved,
    DirectoriesCreated,
    FilesRendered,
    StudyCreated,
    IndexPatched,
    VcsInitialised,
    VcsStaged,
    Opened,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::ModeResolved => "mode-resolved",
            Self::DirectoriesCreated => "directories-created",
            Self::FilesRendered => "files-rendered",
            Self::StudyCreated => "study-created",
            Self::IndexPatched => "index-patched",
            Self::VcsInitialised => "vcs-initialised",
            Self::VcsStaged => "vcs-staged",
            Self::Opened => "opened",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Options for [`ScaffoldService::init_project`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitOptions {
    /// First study to create alongside the project.
    pub study: Option<String>,
    /// Run `git init`, `git add .` and an initial commit.
    pub vcs: bool,
    /// Open the project file afterwards.
    pub open: bool,
}

/// Input of [`ScaffoldService::add_study`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddStudyRequest {
    pub name: String,
    /// `None` infers the mode from existing studies.
    pub mode: Option<AuthoringMode>,
    pub overwrite_policy: OverwritePolicy,
    /// Stage and commit the new study when the project is a git repository.
    pub vcs: bool,
}

impl AddStudyRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: None,
            overwrite_policy: OverwritePolicy::default(),
            vcs: false,
        }
    }

    pub fn mode(mut self, mode: AuthoringMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn overwrite_policy(mut self, policy: OverwritePolicy) -> Self {
        self.overwrite_policy = policy;
        self
    }

    pub fn vcs(mut self, vcs: bool) -> Self {
        self.vcs = vcs;
        self
    }
}

/// Where the authoring mode of a study came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeSource {
    Explicit,
    Detected,
    Default,
}

impl fmt::Display for ModeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => f.write_str("explicit"),
            Self::Detected => f.write_str("detected"),
            Self::Default => f.write_str("default"),
        }
    }
}

/// What happened to the README.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexOutcome {
    /// Rendered from scratch as part of the project skeleton.
    Rendered,
    /// Study list replaced.
    Patched,
    /// Study list already current.
    Unchanged,
    /// Left alone; see the warnings.
    Skipped,
    NotTouched,
}

/// What happened on the version-control side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VcsOutcome {
    NotRequested,
    Committed,
    Skipped,
    Failed,
}

/// Non-fatal conditions collected during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScaffoldWarning {
    SectionNotFound { heading: String },
    IndexMissing { path: String },
    ModeUndetectable { fallback: AuthoringMode },
    VcsSkipped { reason: String },
    VcsFailed { command: String, reason: String },
    OpenFailed { reason: String },
}

impl fmt::Display for ScaffoldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SectionNotFound { heading } => {
                write!(f, "README has no '{heading}' section; study list not updated")
            }
            Self::IndexMissing { path } => write!(f, "{path} not found; study list not updated"),
            Self::ModeUndetectable { fallback } => write!(
                f,
                "could not infer the authoring mode from existing studies; using {fallback}"
            ),
            Self::VcsSkipped { reason } => write!(f, "git step skipped: {reason}"),
            Self::VcsFailed { command, reason } => write!(f, "`git {command}` failed: {reason}"),
            Self::OpenFailed { reason } => write!(f, "could not open the project: {reason}"),
        }
    }
}

/// Result of a scaffold run (or, with `dry_run`, of planning one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldReport {
    pub project_root: PathBuf,
    pub project_name: String,
    pub study: Option<String>,
    pub mode: AuthoringMode,
    pub mode_source: ModeSource,
    pub statuses: Vec<ArtifactStatus>,
    pub index: IndexOutcome,
    pub vcs: VcsOutcome,
    pub warnings: Vec<ScaffoldWarning>,
    pub dry_run: bool,
}

impl ScaffoldReport {
    pub fn written(&self) -> usize {
        self.count(Outcome::Written)
    }

    pub fn skipped(&self) -> usize {
        self.count(Outcome::Skipped)
    }

    fn count(&self, action: Outcome) -> usize {
        self.statuses.iter().filter(|s| s.action == action).count()
    }
}

/// Everything decided before the first mutation of an `init` call.
struct PreparedInit {
    project_root: PathBuf,
    study: Option<StudyUnit>,
    plan: ArtifactPlan,
}

/// Everything decided before the first mutation of an `add-study` call.
struct PreparedStudy {
    project_root: PathBuf,
    project_name: String,
    study: StudyUnit,
    mode_source: ModeSource,
    plan: ArtifactPlan,
    warnings: Vec<ScaffoldWarning>,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    vcs: Box<dyn VcsRunner>,
    opener: Box<dyn IdeOpener>,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use compendium_core::application::ScaffoldService;
    ///
    /// let service = ScaffoldService::new(
    ///     filesystem, // impl Filesystem
    ///     vcs,        // impl VcsRunner
    ///     opener,     // impl IdeOpener
    /// );
    /// ```
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        vcs: Box<dyn VcsRunner>,
        opener: Box<dyn IdeOpener>,
    ) -> Self {
        Self {
            filesystem,
            vcs,
            opener,
        }
    }

    // -------------------------------------------------------------------------
    // init-project
    // -------------------------------------------------------------------------

    /// Scaffold a new project, or complete an existing one.
    #[instrument(
        skip_all,
        fields(
            project = %config.project_name(),
            root = %config.root().display(),
            mode = %config.authoring_mode(),
            policy = %config.overwrite_policy()
        )
    )]
    pub fn init_project(
        &self,
        config: &ProjectConfig,
        options: &InitOptions,
    ) -> ScaffoldResult<ScaffoldReport> {
        let prepared = self.prepare_init(config, options)?;
        let root = prepared.project_root.as_path();

        let mut statuses = self.materialize_staged(root, &prepared.plan, config.overwrite_policy())?;
        let mut warnings = Vec::new();

        let mut index = IndexOutcome::Rendered;
        if let Some(study) = &prepared.study {
            self.enter(Stage::StudyCreated);
            // A README kept from an earlier run still lists the old studies.
            if readme_kept(&statuses) {
                index = match self.patch_index(root, study, &mut warnings) {
                    Ok((outcome, status)) => {
                        if let Some(status) = status.filter(|s| s.action == Outcome::Written) {
                            for existing in statuses.iter_mut().filter(|s| s.path == status.path) {
                                existing.action = Outcome::Written;
                            }
                        }
                        outcome
                    }
                    Err(source) => {
                        return Err(ApplicationError::PartialFailure {
                            completed: statuses,
                            source: Box::new(source),
                        }
                        .into());
                    }
                };
                self.enter(Stage::IndexPatched);
            }
        }

        let vcs = if options.vcs {
            let outcome = self.run_vcs(
                root,
                &[
                    git(&["init"]),
                    git(&["add", "."]),
                    git(&["commit", "-m", "Initial project scaffold"]),
                ],
                &mut warnings,
            );
            self.enter(Stage::VcsInitialised);
            outcome
        } else {
            VcsOutcome::NotRequested
        };

        if options.open {
            let project_file = root.join(layout::project_file(config.project_name()).as_path());
            if let Err(e) = self.opener.open(&project_file) {
                warn!(error = %e, "Could not open project");
                warnings.push(ScaffoldWarning::OpenFailed {
                    reason: e.to_string(),
                });
            }
            self.enter(Stage::Opened);
        }

        self.enter(Stage::Done);
        let report = ScaffoldReport {
            project_root: prepared.project_root,
            project_name: config.project_name().to_string(),
            study: prepared.study.as_ref().map(|s| s.name().to_string()),
            mode: config.authoring_mode(),
            mode_source: ModeSource::Explicit,
            statuses,
            index,
            vcs,
            warnings,
            dry_run: false,
        };
        info!(
            written = report.written(),
            skipped = report.skipped(),
            "Project scaffold completed"
        );
        Ok(report)
    }

    /// What [`init_project`](Self::init_project) would do, without writing.
    pub fn plan_init(
        &self,
        config: &ProjectConfig,
        options: &InitOptions,
    ) -> ScaffoldResult<ScaffoldReport> {
        let prepared = self.prepare_init(config, options)?;
        let statuses = self.materializer().preview(
            &prepared.project_root,
            &prepared.plan,
            config.overwrite_policy(),
        );

        Ok(ScaffoldReport {
            project_root: prepared.project_root,
            project_name: config.project_name().to_string(),
            study: prepared.study.map(|s| s.name().to_string()),
            mode: config.authoring_mode(),
            mode_source: ModeSource::Explicit,
            statuses,
            index: IndexOutcome::Rendered,
            vcs: VcsOutcome::NotRequested,
            warnings: Vec::new(),
            dry_run: true,
        })
    }

    fn prepare_init(
        &self,
        config: &ProjectConfig,
        options: &InitOptions,
    ) -> ScaffoldResult<PreparedInit> {
        self.enter(Stage::Validating);

        let study = options
            .study
            .as_deref()
            .map(|name| StudyUnit::new(name, config.authoring_mode()))
            .transpose()?;
        let resolved = self.path_policy().resolve_project(config)?;
        if let Some(study) = &study {
            // Re-running init with the same study is the recovery path, so
            // only a file squatting on the study folder conflicts here.
            self.path_policy()
                .resolve_study(&resolved.path, study.name(), OverwritePolicy::Overwrite)?;
        }

        // A README rendered over an existing project lists what is there.
        let mut studies = if resolved.existed {
            self.discover_studies(&resolved.path)
        } else {
            Vec::new()
        };
        if let Some(study) = &study {
            studies.retain(|s| s.name != study.name());
            studies.push(StudySummary::from(study));
            studies.sort_by(|a, b| a.name.cmp(&b.name));
        }

        let mut artifacts = plan::project_plan(config, &studies);
        if let Some(study) = &study {
            artifacts.extend(plan::study_plan(config.project_name(), study));
        }
        DomainValidator::validate_plan(&artifacts)?;

        Ok(PreparedInit {
            project_root: resolved.path,
            study,
            plan: artifacts,
        })
    }

    // -------------------------------------------------------------------------
    // add-study
    // -------------------------------------------------------------------------

    /// Add a study to the project rooted at `root`.
    #[instrument(
        skip_all,
        fields(root = %root.display(), study = %request.name, policy = %request.overwrite_policy)
    )]
    pub fn add_study(
        &self,
        root: &Path,
        request: &AddStudyRequest,
    ) -> ScaffoldResult<ScaffoldReport> {
        let prepared = self.prepare_study(root, request)?;
        let project_root = prepared.project_root.as_path();
        let mut warnings = prepared.warnings;

        let mut statuses =
            self.materialize_staged(project_root, &prepared.plan, request.overwrite_policy)?;

        let index = match self.patch_index(project_root, &prepared.study, &mut warnings) {
            Ok((outcome, status)) => {
                statuses.extend(status);
                outcome
            }
            Err(source) => {
                return Err(ApplicationError::PartialFailure {
                    completed: statuses,
                    source: Box::new(source),
                }
                .into());
            }
        };
        self.enter(Stage::IndexPatched);

        let vcs = if request.vcs {
            let outcome = if self.filesystem.is_dir(&project_root.join(layout::VCS_DIR)) {
                let study_root = prepared.study.relative_root().to_portable();
                let message = format!("Add study {}", prepared.study.name());
                self.run_vcs(
                    project_root,
                    &[
                        git(&["add", study_root.as_str()]),
                        git(&["add", layout::README_FILE]),
                        git(&["commit", "-m", message.as_str()]),
                    ],
                    &mut warnings,
                )
            } else {
                warn!("No git repository found, skipping commit");
                warnings.push(ScaffoldWarning::VcsSkipped {
                    reason: format!("{} is not a git repository", project_root.display()),
                });
                VcsOutcome::Skipped
            };
            self.enter(Stage::VcsStaged);
            outcome
        } else {
            VcsOutcome::NotRequested
        };

        self.enter(Stage::Done);
        let report = ScaffoldReport {
            project_root: prepared.project_root.clone(),
            project_name: prepared.project_name,
            study: Some(prepared.study.name().to_string()),
            mode: prepared.study.authoring_mode(),
            mode_source: prepared.mode_source,
            statuses,
            index,
            vcs,
            warnings,
            dry_run: false,
        };
        info!(
            written = report.written(),
            skipped = report.skipped(),
            mode = %report.mode,
            "Study scaffold completed"
        );
        Ok(report)
    }

    /// What [`add_study`](Self::add_study) would do, without writing.
    pub fn plan_study(
        &self,
        root: &Path,
        request: &AddStudyRequest,
    ) -> ScaffoldResult<ScaffoldReport> {
        let prepared = self.prepare_study(root, request)?;
        let statuses = self.materializer().preview(
            &prepared.project_root,
            &prepared.plan,
            request.overwrite_policy,
        );

        Ok(ScaffoldReport {
            project_root: prepared.project_root,
            project_name: prepared.project_name,
            study: Some(prepared.study.name().to_string()),
            mode: prepared.study.authoring_mode(),
            mode_source: prepared.mode_source,
            statuses,
            index: IndexOutcome::NotTouched,
            vcs: VcsOutcome::NotRequested,
            warnings: prepared.warnings,
            dry_run: true,
        })
    }

    fn prepare_study(&self, root: &Path, request: &AddStudyRequest) -> ScaffoldResult<PreparedStudy> {
        self.enter(Stage::Validating);

        DomainValidator::validate_name(NameKind::Study, &request.name)?;
        let policy = self.path_policy();
        let project_name = policy.find_project_marker(root)?;
        policy.resolve_study(root, &request.name, request.overwrite_policy)?;

        let mut warnings = Vec::new();
        let (mode, mode_source) = match request.mode {
            Some(mode) => (mode, ModeSource::Explicit),
            None => match self.detect_mode(root, &request.name) {
                DetectedMode::Unknown => {
                    let fallback = AuthoringMode::default();
                    warn!(%fallback, "Authoring mode undetectable, using default");
                    warnings.push(ScaffoldWarning::ModeUndetectable { fallback });
                    (fallback, ModeSource::Default)
                }
                detected => (
                    detected.into_mode().unwrap_or_default(),
                    ModeSource::Detected,
                ),
            },
        };
        let study = StudyUnit::new(request.name.as_str(), mode)?;
        self.enter(Stage::ModeResolved);
        debug!(%mode, source = %mode_source, "Authoring mode resolved");

        let artifacts = plan::study_plan(&project_name, &study);
        DomainValidator::validate_plan(&artifacts)?;

        Ok(PreparedStudy {
            project_root: root.to_path_buf(),
            project_name,
            study,
            mode_source,
            plan: artifacts,
            warnings,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn materializer(&self) -> ArtifactMaterializer<'_> {
        ArtifactMaterializer::new(self.filesystem.as_ref())
    }

    fn path_policy(&self) -> PathPolicy<'_> {
        PathPolicy::new(self.filesystem.as_ref())
    }

    fn enter(&self, stage: Stage) {
        info!(%stage, "Stage");
    }

    /// Materialize `plan`, entering each stage as its pass completes.
    fn materialize_staged(
        &self,
        root: &Path,
        plan: &ArtifactPlan,
        policy: OverwritePolicy,
    ) -> ScaffoldResult<Vec<ArtifactStatus>> {
        self.materializer()
            .materialize_in_passes(root, plan, policy, |kind| match kind {
                ArtifactKind::Directory => self.enter(Stage::DirectoriesCreated),
                ArtifactKind::File => self.enter(Stage::FilesRendered),
            })
    }

    /// Study directories under `studies/`, in name order, with the file
    /// names of each code folder. Unreadable folders list as empty.
    fn study_listings(&self, project_root: &Path) -> Vec<StudyListing> {
        let studies = project_root.join(layout::studies_dir().as_path());
        if !self.filesystem.is_dir(&studies) {
            return Vec::new();
        }

        let dirs = match self.filesystem.list_dir(&studies) {
            Ok(entries) => entries.into_iter().filter(|e| e.is_dir).map(|e| e.name),
            Err(e) => {
                warn!(error = %e, "Could not list studies");
                return Vec::new();
            }
        };

        mode_detector::candidate_studies(dirs)
            .into_iter()
            .map(|name| {
                let code = project_root.join(layout::study_code_dir(&name).as_path());
                let files = self
                    .filesystem
                    .list_dir(&code)
                    .map(|entries| {
                        entries
                            .into_iter()
                            .filter(|e| !e.is_dir)
                            .map(|e| e.name)
                            .collect()
                    })
                    .unwrap_or_default();
                StudyListing {
                    name,
                    code_files: files,
                }
            })
            .collect()
    }

    /// Best effort: never fails, degrades to `Unknown`.
    ///
    /// A study being rewritten keeps the mode its own code is in. Only a
    /// target folder without classifiable code (an interrupted run) defers
    /// to the other studies.
    fn detect_mode(&self, project_root: &Path, target: &str) -> DetectedMode {
        let (own, others): (Vec<StudyListing>, Vec<StudyListing>) = self
            .study_listings(project_root)
            .into_iter()
            .partition(|l| l.name == target);

        let detected = match own.first().map(|l| mode_detector::classify(&l.code_files)) {
            Some(DetectedMode::Unknown) | None => mode_detector::detect(&others),
            Some(mode) => mode,
        };
        debug!(%detected, candidates = others.len() + own.len(), "Mode detection");
        detected
    }

    fn discover_studies(&self, project_root: &Path) -> Vec<StudySummary> {
        self.study_listings(project_root)
            .into_iter()
            .map(|listing| StudySummary {
                mode: mode_detector::classify(&listing.code_files).into_mode(),
                name: listing.name,
            })
            .collect()
    }

    /// Re-render the study list inside the README.
    ///
    /// Missing README or section is a warning. Read and write failures are
    /// errors.
    fn patch_index(
        &self,
        project_root: &Path,
        study: &StudyUnit,
        warnings: &mut Vec<ScaffoldWarning>,
    ) -> ScaffoldResult<(IndexOutcome, Option<ArtifactStatus>)> {
        let readme = project_root.join(layout::README_FILE);
        if !self.filesystem.is_file(&readme) {
            warn!(path = %readme.display(), "README not found");
            warnings.push(ScaffoldWarning::IndexMissing {
                path: layout::README_FILE.to_string(),
            });
            return Ok((IndexOutcome::Skipped, None));
        }

        let mut studies = self.discover_studies(project_root);
        match studies.iter_mut().find(|s| s.name == study.name()) {
            Some(summary) => summary.mode = Some(study.authoring_mode()),
            None => studies.push(StudySummary::from(study)),
        }
        studies.sort_by(|a, b| a.name.cmp(&b.name));

        let pattern = HeadingPattern::new(STUDIES_HEADING_LEVEL, STUDIES_HEADING);
        let current = self.filesystem.read_to_string(&readme)?;
        let patch = IndexDocument::parse(&current).patch(&pattern, &templates::studies_section(&studies));

        let status = |action| ArtifactStatus {
            path: layout::README_FILE.to_string(),
            kind: ArtifactKind::File,
            action,
        };

        match patch.status {
            PatchStatus::Replaced { heading_line } => {
                self.filesystem.write_file(&readme, &patch.document)?;
                debug!(heading_line, "README study list replaced");
                Ok((IndexOutcome::Patched, Some(status(Outcome::Written))))
            }
            PatchStatus::Unchanged { .. } => {
                Ok((IndexOutcome::Unchanged, Some(status(Outcome::Skipped))))
            }
            PatchStatus::NotFound => {
                warn!(heading = %pattern, "README section not found");
                warnings.push(ScaffoldWarning::SectionNotFound {
                    heading: pattern.to_string(),
                });
                Ok((IndexOutcome::Skipped, None))
            }
        }
    }

    /// Run commands in order, stopping at the first failure.
    fn run_vcs(
        &self,
        workdir: &Path,
        commands: &[Vec<String>],
        warnings: &mut Vec<ScaffoldWarning>,
    ) -> VcsOutcome {
        for args in commands {
            if let Err(e) = self.vcs.run(workdir, args) {
                let command = args.join(" ");
                let reason = match e {
                    ScaffoldError::Application(ApplicationError::VcsFailed { reason, .. }) => reason,
                    other => other.to_string(),
                };
                warn!(%command, %reason, "git command failed");
                warnings.push(ScaffoldWarning::VcsFailed { command, reason });
                return VcsOutcome::Failed;
            }
            debug!(command = %args.join(" "), "git command succeeded");
        }
        VcsOutcome::Committed
    }
}

fn readme_kept(statuses: &[ArtifactStatus]) -> bool {
    statuses
        .iter()
        .any(|s| s.path == layout::README_FILE && s.action == Outcome::Skipped)
}

fn git(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}
