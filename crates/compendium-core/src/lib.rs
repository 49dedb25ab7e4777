//! Scaffolding logic for research compendia.
//!
//! The crate is split the same way data flows through it:
//!
//! - [`domain`] is pure: the project layout, file templates, authoring-mode
//!   detection and README section patching. Nothing here touches the disk.
//! - [`application`] holds the use cases ([`application::ScaffoldService`])
//!   and the traits they need from the outside world: a filesystem, a
//!   version-control runner and an IDE opener.
//! - [`error`] joins both layers' failures into [`error::ScaffoldError`].
//!
//! Concrete filesystem, git and opener implementations live in
//! `compendium-adapters`; the binary in `compendium-cli` wires them in.
//!
//! ```rust,ignore
//! use compendium_core::prelude::*;
//!
//! let config = ProjectConfig::builder("/work")
//!     .name("demo")
//!     .authoring_mode(AuthoringMode::Literate)
//!     .build()?;
//!
//! let service = ScaffoldService::new(filesystem, vcs, opener);
//! let options = InitOptions { study: Some("pilot".into()), ..Default::default() };
//! let report = service.init_project(&config, &options)?;
//!
//! // No mode given: "followup" copies the mode "pilot" was written in.
//! service.add_study(&report.project_root, &AddStudyRequest::new("followup"))?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

/// The types a caller needs to drive a scaffold run.
pub mod prelude {
    pub use crate::application::{
        AddStudyRequest, InitOptions, ScaffoldReport, ScaffoldService, ScaffoldWarning,
        ports::{DirEntry, Filesystem, IdeOpener, VcsRunner},
    };
    pub use crate::domain::{
        ArtifactKind, ArtifactStatus, AuthoringMode, LicenseInfo, Outcome, OverwritePolicy,
        ProjectConfig, StudyUnit,
    };
    pub use crate::error::{ScaffoldError, ScaffoldResult};
}
