//! End-to-end scaffolding against real and in-memory filesystems.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use compendium_adapters::{LocalFilesystem, MemoryFilesystem, NoopOpener};
use compendium_core::{
    application::{
        AddStudyRequest, ApplicationError, IndexOutcome, InitOptions, ModeSource, ScaffoldService,
        ScaffoldWarning, VcsOutcome,
    },
    domain::{AuthoringMode, LicenseInfo, Outcome, OverwritePolicy, ProjectConfig},
    error::{ScaffoldError, ScaffoldResult},
    prelude::{Filesystem, VcsRunner},
};
use tempfile::TempDir;
use walkdir::WalkDir;

// ============================================================================
// Helpers
// ============================================================================

type Calls = Arc<Mutex<Vec<(PathBuf, Vec<String>)>>>;

/// Records git invocations instead of running them.
#[derive(Clone, Default)]
struct RecordingVcs {
    calls: Calls,
}

impl VcsRunner for RecordingVcs {
    fn run(&self, workdir: &Path, args: &[String]) -> ScaffoldResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((workdir.to_path_buf(), args.to_vec()));
        Ok(())
    }
}

fn local_service() -> ScaffoldService {
    ScaffoldService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(RecordingVcs::default()),
        Box::new(NoopOpener),
    )
}

fn memory_service(fs: &MemoryFilesystem) -> ScaffoldService {
    ScaffoldService::new(
        Box::new(fs.clone()),
        Box::new(RecordingVcs::default()),
        Box::new(NoopOpener),
    )
}

fn config(root: &Path, mode: AuthoringMode, policy: OverwritePolicy) -> ProjectConfig {
    ProjectConfig::builder(root)
        .name("demo")
        .authoring_mode(mode)
        .overwrite_policy(policy)
        .license(LicenseInfo::new("Jane Doe", 2026))
        .build()
        .unwrap()
}

fn with_pilot() -> InitOptions {
    InitOptions {
        study: Some("pilot".into()),
        ..InitOptions::default()
    }
}

/// Relative path -> file content (`None` for directories).
fn snapshot(root: &Path) -> BTreeMap<String, Option<String>> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| {
            let entry = entry.unwrap();
            let rel = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            let content = entry
                .file_type()
                .is_file()
                .then(|| std::fs::read_to_string(entry.path()).unwrap());
            (rel, content)
        })
        .collect()
}

/// A literate `demo` project with study `pilot` under a fresh temp dir.
fn demo_project() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), AuthoringMode::Literate, OverwritePolicy::KeepExisting);
    let report = local_service().init_project(&cfg, &with_pilot()).unwrap();
    let root = report.project_root;
    (dir, root)
}

// ============================================================================
// init-project
// ============================================================================

#[test]
fn init_demo_with_pilot_creates_full_layout() {
    let (_dir, root) = demo_project();

    for dir in [
        "literature",
        "writeup",
        "studies/pilot/code",
        "studies/pilot/data/raw",
        "studies/pilot/data/processed",
        "studies/pilot/outputs/plots",
        "studies/pilot/outputs/fitted_models",
        "studies/pilot/outputs/results",
        "studies/pilot/materials",
        "studies/pilot/preregistration",
    ] {
        assert!(root.join(dir).is_dir(), "missing directory {dir}");
    }
    for file in [
        "studies/pilot/code/01-processing.qmd",
        "studies/pilot/code/02-analysis.qmd",
        "studies/pilot/data/README.md",
        "README.md",
        "LICENSE",
        ".gitignore",
        ".gitattributes",
        "demo.Rproj",
        "literature/_references.bib",
    ] {
        assert!(root.join(file).is_file(), "missing file {file}");
    }
    assert!(!root.join("studies/pilot/code/00-run-all.R").exists());

    let readme = std::fs::read_to_string(root.join("README.md")).unwrap();
    assert!(readme.contains("[pilot](studies/pilot/)"));
}

#[test]
fn init_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), AuthoringMode::Literate, OverwritePolicy::KeepExisting);
    let service = local_service();

    let first = service.init_project(&cfg, &with_pilot()).unwrap();
    assert!(first.statuses.iter().all(|s| s.action == Outcome::Written));
    let before = snapshot(dir.path());

    let second = service.init_project(&cfg, &with_pilot()).unwrap();
    assert!(second.statuses.iter().all(|s| s.action == Outcome::Skipped));
    assert_eq!(first.statuses.len(), second.statuses.len());
    assert_eq!(snapshot(dir.path()), before);
}

#[test]
fn init_with_another_study_refreshes_the_kept_readme() {
    let (dir, root) = demo_project();
    let cfg = config(dir.path(), AuthoringMode::Literate, OverwritePolicy::KeepExisting);
    let options = InitOptions {
        study: Some("second".into()),
        ..InitOptions::default()
    };

    let report = local_service().init_project(&cfg, &options).unwrap();

    assert!(root.join("studies/second/code/01-processing.qmd").is_file());
    assert_eq!(report.index, IndexOutcome::Patched);
    let readme = report.statuses.iter().find(|s| s.path == "README.md").unwrap();
    assert_eq!(readme.action, Outcome::Written);

    let readme = std::fs::read_to_string(root.join("README.md")).unwrap();
    assert!(readme.contains("[pilot](studies/pilot/)"));
    assert!(readme.contains("[second](studies/second/)"));
}

#[test]
fn init_rejects_a_file_at_the_study_path() {
    let (dir, root) = demo_project();
    std::fs::write(root.join("studies/second"), "not a directory").unwrap();
    let before = snapshot(&root);

    let cfg = config(dir.path(), AuthoringMode::Literate, OverwritePolicy::KeepExisting);
    let options = InitOptions {
        study: Some("second".into()),
        ..InitOptions::default()
    };
    let err = local_service().init_project(&cfg, &options).unwrap_err();

    assert!(matches!(
        err,
        ScaffoldError::Application(ApplicationError::AlreadyExists { .. })
    ));
    assert_eq!(snapshot(&root), before);
}

#[test]
fn keep_existing_preserves_user_edits() {
    let (dir, root) = demo_project();
    let license = root.join("LICENSE");
    std::fs::write(&license, "All rights reserved.\n").unwrap();

    let cfg = config(dir.path(), AuthoringMode::Literate, OverwritePolicy::KeepExisting);
    local_service().init_project(&cfg, &with_pilot()).unwrap();

    assert_eq!(
        std::fs::read_to_string(&license).unwrap(),
        "All rights reserved.\n"
    );
}

#[test]
fn overwrite_replaces_content_but_never_deletes() {
    let (dir, root) = demo_project();
    std::fs::write(root.join("LICENSE"), "edited\n").unwrap();
    std::fs::write(root.join("writeup/draft.qmd"), "my paper\n").unwrap();
    std::fs::write(root.join("studies/pilot/data/raw/survey.csv"), "id\n1\n").unwrap();

    let cfg = config(dir.path(), AuthoringMode::Literate, OverwritePolicy::Overwrite);
    let report = local_service().init_project(&cfg, &with_pilot()).unwrap();

    let license = std::fs::read_to_string(root.join("LICENSE")).unwrap();
    assert!(license.contains("Copyright (c) 2026 Jane Doe"));
    assert_eq!(
        std::fs::read_to_string(root.join("writeup/draft.qmd")).unwrap(),
        "my paper\n"
    );
    assert!(root.join("studies/pilot/data/raw/survey.csv").is_file());
    assert!(
        report
            .statuses
            .iter()
            .filter(|s| s.kind == compendium_core::domain::ArtifactKind::File)
            .all(|s| s.action == Outcome::Written)
    );
}

#[test]
fn init_in_current_directory_uses_folder_name() {
    let dir = tempfile::tempdir().unwrap();
    let here = dir.path().join("my-project");
    std::fs::create_dir(&here).unwrap();

    let cfg = ProjectConfig::builder(&here).in_current_dir().build().unwrap();
    let report = local_service()
        .init_project(&cfg, &InitOptions::default())
        .unwrap();

    assert_eq!(report.project_root, here);
    assert!(here.join("my-project.Rproj").is_file());
    assert!(!here.join("my-project").exists());
}

#[test]
fn file_at_project_path_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("demo"), "not a directory").unwrap();
    let before = snapshot(dir.path());

    let cfg = config(dir.path(), AuthoringMode::Literate, OverwritePolicy::KeepExisting);
    let err = local_service()
        .init_project(&cfg, &InitOptions::default())
        .unwrap_err();

    assert!(matches!(
        err,
        ScaffoldError::Application(ApplicationError::AlreadyExists { .. })
    ));
    assert_eq!(snapshot(dir.path()), before);
}

#[test]
fn scripted_study_gets_run_all_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), AuthoringMode::Scripted, OverwritePolicy::KeepExisting);
    let report = local_service().init_project(&cfg, &with_pilot()).unwrap();

    let run_all =
        std::fs::read_to_string(report.project_root.join("studies/pilot/code/00-run-all.R"))
            .unwrap();
    let processing = run_all.find("01-processing.R").unwrap();
    let analysis = run_all.find("02-analysis.R").unwrap();
    assert!(processing < analysis);
    assert!(!run_all.contains(&dir.path().to_string_lossy().to_string()));
}

#[test]
fn no_committed_artifact_contains_the_absolute_root() {
    let (dir, root) = demo_project();
    let absolute = dir.path().to_string_lossy().to_string();

    for (path, content) in snapshot(&root) {
        if let Some(content) = content {
            assert!(!content.contains(&absolute), "{path} leaks the absolute root");
        }
    }
}

#[test]
fn init_with_git_runs_in_project_root() {
    let dir = tempfile::tempdir().unwrap();
    let vcs = RecordingVcs::default();
    let service = ScaffoldService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(vcs.clone()),
        Box::new(NoopOpener),
    );

    let cfg = config(dir.path(), AuthoringMode::Literate, OverwritePolicy::KeepExisting);
    let options = InitOptions {
        vcs: true,
        ..InitOptions::default()
    };
    let report = service.init_project(&cfg, &options).unwrap();

    let calls = vcs.calls.lock().unwrap();
    let commands: Vec<String> = calls.iter().map(|(_, args)| args.join(" ")).collect();
    assert_eq!(
        commands,
        ["init", "add .", "commit -m Initial project scaffold"]
    );
    assert!(calls.iter().all(|(dir, _)| dir == &report.project_root));
    assert_eq!(report.vcs, VcsOutcome::Committed);
}

// ============================================================================
// add-study
// ============================================================================

#[test]
fn followup_inherits_literate_mode_from_pilot() {
    let (_dir, root) = demo_project();

    let report = local_service()
        .add_study(&root, &AddStudyRequest::new("followup"))
        .unwrap();

    assert_eq!(report.mode, AuthoringMode::Literate);
    assert_eq!(report.mode_source, ModeSource::Detected);
    assert!(root.join("studies/followup/code/01-processing.qmd").is_file());
    assert!(root.join("studies/followup/code/02-analysis.qmd").is_file());
    assert_eq!(report.index, IndexOutcome::Patched);

    let readme = std::fs::read_to_string(root.join("README.md")).unwrap();
    let followup = readme.find("[followup](studies/followup/)").unwrap();
    let pilot = readme.find("[pilot](studies/pilot/)").unwrap();
    assert!(followup < pilot, "study list is sorted by name");
}

#[test]
fn first_study_by_name_decides_the_mode() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), AuthoringMode::Scripted, OverwritePolicy::KeepExisting);
    let options = InitOptions {
        study: Some("a-baseline".into()),
        ..InitOptions::default()
    };
    let root = local_service().init_project(&cfg, &options).unwrap().project_root;

    let service = local_service();
    service
        .add_study(&root, &AddStudyRequest::new("b-literate").mode(AuthoringMode::Literate))
        .unwrap();
    let report = service
        .add_study(&root, &AddStudyRequest::new("c-next"))
        .unwrap();

    assert_eq!(report.mode, AuthoringMode::Scripted);
    assert!(root.join("studies/c-next/code/00-run-all.R").is_file());
}

#[test]
fn project_without_studies_defaults_to_literate_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), AuthoringMode::Scripted, OverwritePolicy::KeepExisting);
    let root = local_service()
        .init_project(&cfg, &InitOptions::default())
        .unwrap()
        .project_root;

    let report = local_service()
        .add_study(&root, &AddStudyRequest::new("pilot"))
        .unwrap();

    assert_eq!(report.mode, AuthoringMode::Literate);
    assert_eq!(report.mode_source, ModeSource::Default);
    assert!(
        report
            .warnings
            .iter()
            .any(|w| matches!(w, ScaffoldWarning::ModeUndetectable { .. }))
    );
}

#[test]
fn existing_study_is_rejected_without_writes() {
    let (_dir, root) = demo_project();
    let before = snapshot(&root);

    let err = local_service()
        .add_study(&root, &AddStudyRequest::new("pilot"))
        .unwrap_err();

    assert!(matches!(
        err,
        ScaffoldError::Application(ApplicationError::AlreadyExists { .. })
    ));
    assert_eq!(snapshot(&root), before);
}

#[test]
fn add_study_outside_a_project_is_rejected_without_writes() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("README.md"), "# not a project\n").unwrap();
    let before = snapshot(dir.path());

    let err = local_service()
        .add_study(dir.path(), &AddStudyRequest::new("pilot"))
        .unwrap_err();

    assert!(matches!(
        err,
        ScaffoldError::Application(ApplicationError::NoProjectMarker { .. })
    ));
    assert_eq!(snapshot(dir.path()), before);
}

#[test]
fn readme_edits_outside_study_list_survive() {
    let (_dir, root) = demo_project();
    let readme_path = root.join("README.md");
    let edited = std::fs::read_to_string(&readme_path)
        .unwrap()
        .replace(
            "Describe the research question",
            "We ask whether X causes Y.\nDescribe the research question",
        );
    let edited = format!("{edited}\n## Acknowledgements\n\nThanks to everyone.  \n");
    std::fs::write(&readme_path, &edited).unwrap();

    let service = local_service();
    service
        .add_study(&root, &AddStudyRequest::new("followup"))
        .unwrap();
    service
        .add_study(&root, &AddStudyRequest::new("replication"))
        .unwrap();

    let readme = std::fs::read_to_string(&readme_path).unwrap();
    assert!(readme.contains("We ask whether X causes Y.\n"));
    assert!(readme.ends_with("\n## Acknowledgements\n\nThanks to everyone.  \n"));
    assert!(readme.contains("[replication](studies/replication/)"));

    let (head, _) = edited.split_once("## Studies").unwrap();
    assert!(readme.starts_with(head));
}

#[test]
fn readme_without_studies_section_is_left_alone() {
    let (_dir, root) = demo_project();
    let readme_path = root.join("README.md");
    std::fs::write(&readme_path, "# demo\n\nHand-written.\n").unwrap();

    let report = local_service()
        .add_study(&root, &AddStudyRequest::new("followup"))
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&readme_path).unwrap(),
        "# demo\n\nHand-written.\n"
    );
    assert_eq!(report.index, IndexOutcome::Skipped);
    assert!(
        report
            .warnings
            .iter()
            .any(|w| matches!(w, ScaffoldWarning::SectionNotFound { .. }))
    );
}

#[test]
fn interrupted_study_is_completed_by_rerun() {
    let (_dir, root) = demo_project();
    std::fs::create_dir_all(root.join("studies/followup/code")).unwrap();
    std::fs::write(root.join("studies/followup/code/02-analysis.qmd"), "kept\n").unwrap();

    let report = local_service()
        .add_study(&root, &AddStudyRequest::new("followup"))
        .unwrap();

    assert!(root.join("studies/followup/code/01-processing.qmd").is_file());
    assert_eq!(
        std::fs::read_to_string(root.join("studies/followup/code/02-analysis.qmd")).unwrap(),
        "kept\n"
    );
    let analysis = report
        .statuses
        .iter()
        .find(|s| s.path == "studies/followup/code/02-analysis.qmd")
        .unwrap();
    assert_eq!(analysis.action, Outcome::Skipped);
}

#[test]
fn overwriting_a_study_keeps_its_own_mode() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), AuthoringMode::Scripted, OverwritePolicy::KeepExisting);
    let service = local_service();
    let root = service.init_project(&cfg, &with_pilot()).unwrap().project_root;
    service
        .add_study(&root, &AddStudyRequest::new("alpha").mode(AuthoringMode::Literate))
        .unwrap();

    let report = service
        .add_study(
            &root,
            &AddStudyRequest::new("pilot").overwrite_policy(OverwritePolicy::Overwrite),
        )
        .unwrap();

    assert_eq!(report.mode, AuthoringMode::Scripted);
    assert_eq!(report.mode_source, ModeSource::Detected);
    assert!(report.warnings.is_empty());
    assert!(root.join("studies/pilot/code/00-run-all.R").is_file());
    assert!(!root.join("studies/pilot/code/01-processing.qmd").exists());

    let readme = std::fs::read_to_string(root.join("README.md")).unwrap();
    assert!(readme.contains("studies/pilot/code/00-run-all.R"));
}

#[test]
fn add_study_commits_only_inside_a_repository() {
    let (_dir, root) = demo_project();
    let vcs = RecordingVcs::default();
    let service = ScaffoldService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(vcs.clone()),
        Box::new(NoopOpener),
    );

    let report = service
        .add_study(&root, &AddStudyRequest::new("followup").vcs(true))
        .unwrap();
    assert_eq!(report.vcs, VcsOutcome::Skipped);
    assert!(vcs.calls.lock().unwrap().is_empty());

    std::fs::create_dir(root.join(".git")).unwrap();
    let report = service
        .add_study(&root, &AddStudyRequest::new("replication").vcs(true))
        .unwrap();
    assert_eq!(report.vcs, VcsOutcome::Committed);

    let commands: Vec<String> = vcs
        .calls
        .lock()
        .unwrap()
        .iter()
        .map(|(_, args)| args.join(" "))
        .collect();
    assert_eq!(
        commands,
        [
            "add studies/replication",
            "add README.md",
            "commit -m Add study replication"
        ]
    );
}

#[test]
fn dry_run_touches_nothing() {
    let (_dir, root) = demo_project();
    let before = snapshot(&root);

    let report = local_service()
        .plan_study(&root, &AddStudyRequest::new("followup"))
        .unwrap();

    assert!(report.dry_run);
    assert!(report.statuses.iter().all(|s| s.action == Outcome::Written));
    assert_eq!(snapshot(&root), before);
}

// ============================================================================
// Partial failure (in-memory)
// ============================================================================

#[test]
fn partial_failure_reports_completed_and_rerun_finishes() {
    let fs = MemoryFilesystem::new();
    fs.fail_writes_to("/work/demo/LICENSE");
    let cfg = config(Path::new("/work"), AuthoringMode::Literate, OverwritePolicy::KeepExisting);
    let service = memory_service(&fs);

    let err = service.init_project(&cfg, &with_pilot()).unwrap_err();
    let completed: Vec<&str> = err.completed().iter().map(|s| s.path.as_str()).collect();
    assert!(completed.contains(&"README.md"));
    assert!(!completed.contains(&"LICENSE"));
    assert!(err.is_retryable());
    assert!(fs.exists(Path::new("/work/demo/README.md")));

    fs.clear_failures();
    let report = service.init_project(&cfg, &with_pilot()).unwrap();
    let action = |path: &str| {
        report
            .statuses
            .iter()
            .find(|s| s.path == path)
            .map(|s| s.action)
    };
    assert_eq!(action("README.md"), Some(Outcome::Skipped));
    assert_eq!(action("LICENSE"), Some(Outcome::Written));
    assert_eq!(
        action("studies/pilot/code/01-processing.qmd"),
        Some(Outcome::Written)
    );
}

#[test]
fn readme_write_failure_after_study_is_partial() {
    let fs = MemoryFilesystem::new();
    let cfg = config(Path::new("/work"), AuthoringMode::Literate, OverwritePolicy::KeepExisting);
    let service = memory_service(&fs);
    service.init_project(&cfg, &with_pilot()).unwrap();

    fs.fail_writes_to("/work/demo/README.md");
    let err = service
        .add_study(Path::new("/work/demo"), &AddStudyRequest::new("followup"))
        .unwrap_err();

    assert!(
        err.completed()
            .iter()
            .any(|s| s.path == "studies/followup/code/01-processing.qmd")
    );
    assert!(fs.is_file(Path::new("/work/demo/studies/followup/code/01-processing.qmd")));
}

#[test]
fn memory_and_local_filesystems_agree() {
    let (_dir, root) = demo_project();
    let local: Vec<String> = snapshot(&root).into_keys().collect();

    let fs = MemoryFilesystem::new();
    let cfg = config(Path::new("/work"), AuthoringMode::Literate, OverwritePolicy::KeepExisting);
    memory_service(&fs).init_project(&cfg, &with_pilot()).unwrap();
    let memory: Vec<String> = fs
        .paths()
        .into_iter()
        .filter_map(|p| {
            p.strip_prefix("/work/demo")
                .ok()
                .filter(|rel| !rel.as_os_str().is_empty())
                .map(|rel| rel.to_string_lossy().replace('\\', "/"))
        })
        .collect();

    let mut local = local;
    let mut memory = memory;
    local.sort();
    memory.sort();
    assert_eq!(local, memory);
}
