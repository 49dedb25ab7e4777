//! The persisted project layout, expressed as semantic path segments.
//!
//! ```text
//! <project>/
//! ├── <project>.Rproj
//! ├── README.md  LICENSE  .gitignore  .gitattributes
//! ├── literature/_references.bib
//! ├── writeup/
//! └── studies/<name>/
//!     ├── materials/  preregistration/
//!     ├── code/{00-run-all.R, 01-processing.<ext>, 02-analysis.<ext>}
//!     ├── data/{raw,processed}/  data/README.md
//!     └── outputs/{plots,fitted_models,results}/
//! ```
//!
//! Every path handed out here is relative to the project root.

use crate::domain::{entities::common::RelativePath, value_objects::AuthoringMode};

pub const STUDIES_DIR: &str = "studies";
pub const WRITEUP_DIR: &str = "writeup";
pub const LITERATURE_DIR: &str = "literature";
pub const VCS_DIR: &str = ".git";

/// Top-level names that are never studies.
pub const RESERVED_NAMES: [&str; 3] = [WRITEUP_DIR, LITERATURE_DIR, VCS_DIR];

pub const README_FILE: &str = "README.md";
pub const LICENSE_FILE: &str = "LICENSE";
pub const GITIGNORE_FILE: &str = ".gitignore";
pub const GITATTRIBUTES_FILE: &str = ".gitattributes";
pub const REFERENCES_FILE: &str = "_references.bib";
pub const PROJECT_FILE_EXTENSION: &str = "Rproj";

pub const CODE_DIR: &str = "code";
pub const DATA_DIR: &str = "data";

/// Study subdirectories, each as a list of segments under `studies/<name>`.
pub const STUDY_DIRECTORIES: [&[&str]; 8] = [
    &["materials"],
    &[CODE_DIR],
    &[DATA_DIR, "raw"],
    &[DATA_DIR, "processed"],
    &["outputs", "plots"],
    &["outputs", "fitted_models"],
    &["outputs", "results"],
    &["preregistration"],
];

/// Code documents generated for every study.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyDocument {
    RunAll,
    Processing,
    Analysis,
}

impl StudyDocument {
    pub const fn stem(self) -> &'static str {
        match self {
            Self::RunAll => "00-run-all",
            Self::Processing => "01-processing",
            Self::Analysis => "02-analysis",
        }
    }

    /// Run-all is always a plain script, whatever the study's mode.
    pub const fn extension(self, mode: AuthoringMode) -> &'static str {
        match self {
            Self::RunAll => AuthoringMode::Scripted.extension(),
            Self::Processing | Self::Analysis => mode.extension(),
        }
    }
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

pub fn studies_dir() -> RelativePath {
    RelativePath::from(STUDIES_DIR)
}

pub fn study_root(name: &str) -> RelativePath {
    RelativePath::from_segments([STUDIES_DIR, name])
}

pub fn study_code_dir(name: &str) -> RelativePath {
    study_root(name).child(CODE_DIR)
}

pub fn study_directory(name: &str, segments: &[&str]) -> RelativePath {
    segments
        .iter()
        .fold(study_root(name), |acc, segment| acc.child(segment))
}

pub fn study_document(name: &str, document: StudyDocument, mode: AuthoringMode) -> RelativePath {
    study_code_dir(name).child(&format!(
        "{}.{}",
        document.stem(),
        document.extension(mode)
    ))
}

pub fn study_data_readme(name: &str) -> RelativePath {
    RelativePath::from_segments([STUDIES_DIR, name, DATA_DIR, README_FILE])
}

/// Every path a processing document can have, across modes and spellings.
///
/// Its presence is what makes a study "existing".
pub fn processing_candidates(name: &str) -> Vec<RelativePath> {
    let code = study_code_dir(name);
    ["qmd", "Rmd", "R"]
        .iter()
        .map(|ext| code.child(&format!("{}.{ext}", StudyDocument::Processing.stem())))
        .collect()
}

pub fn project_file(project_name: &str) -> RelativePath {
    RelativePath::from(format!("{project_name}.{PROJECT_FILE_EXTENSION}").as_str())
}

pub fn references_file() -> RelativePath {
    RelativePath::from_segments([LITERATURE_DIR, REFERENCES_FILE])
}
