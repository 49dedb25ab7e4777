//! Artifact plans: layout paths paired with rendered content.

use crate::domain::{
    entities::{
        ArtifactPlan,
        config::{ProjectConfig, StudyUnit},
    },
    layout::{self, StudyDocument},
    templates::{self, StudySummary},
    value_objects::AuthoringMode,
};

/// Project-level skeleton: top-level directories and documents.
///
/// `studies` feeds the README's study list.
pub fn project_plan(config: &ProjectConfig, studies: &[StudySummary]) -> ArtifactPlan {
    ArtifactPlan::new()
        .with_directory(layout::LITERATURE_DIR.into())
        .with_directory(layout::WRITEUP_DIR.into())
        .with_directory(layout::studies_dir())
        .with_file(
            layout::project_file(config.project_name()),
            templates::render_project_file(),
        )
        .with_file(
            layout::README_FILE.into(),
            templates::render_readme(config, studies),
        )
        .with_file(layout::LICENSE_FILE.into(), templates::render_license(config))
        .with_file(
            layout::GITIGNORE_FILE.into(),
            templates::render_gitignore(config.ignore_large_outputs()),
        )
        .with_file(
            layout::GITATTRIBUTES_FILE.into(),
            templates::render_gitattributes(),
        )
        .with_file(layout::references_file(), templates::render_references())
}

/// Study skeleton.
///
/// The processing document is always the last file: its presence marks the
/// study as complete, so an interrupted run can be finished by re-running.
pub fn study_plan(project_name: &str, study: &StudyUnit) -> ArtifactPlan {
    let name = study.name();
    let mode = study.authoring_mode();
    let mut plan = ArtifactPlan::new();

    for segments in layout::STUDY_DIRECTORIES {
        plan.add_directory(layout::study_directory(name, segments));
    }

    plan.add_file(
        layout::study_data_readme(name),
        templates::render_data_readme(study),
    );
    plan.add_file(
        layout::study_document(name, StudyDocument::Analysis, mode),
        templates::render_study_document(project_name, study, StudyDocument::Analysis),
    );
    if mode == AuthoringMode::Scripted {
        plan.add_file(
            layout::study_document(name, StudyDocument::RunAll, mode),
            templates::render_run_all(project_name, study),
        );
    }
    plan.add_file(
        layout::study_document(name, StudyDocument::Processing, mode),
        templates::render_study_document(project_name, study, StudyDocument::Processing),
    );

    plan
}
