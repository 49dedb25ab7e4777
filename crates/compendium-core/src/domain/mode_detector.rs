//! Inference of the authoring mode earlier studies used.
//!
//! Best-effort by contract: absence of signal degrades to
//! [`DetectedMode::Unknown`], never to an error.

use std::fmt;

use crate::domain::{layout, value_objects::AuthoringMode};

/// Outcome of mode detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedMode {
    Literate,
    Scripted,
    Unknown,
}

impl DetectedMode {
    /// Map to a concrete mode, `None` when nothing could be inferred.
    pub fn into_mode(self) -> Option<AuthoringMode> {
        match self {
            Self::Literate => Some(AuthoringMode::Literate),
            Self::Scripted => Some(AuthoringMode::Scripted),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for DetectedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literate => f.write_str("literate"),
            Self::Scripted => f.write_str("scripted"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// A study directory and the file names found in its code folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyListing {
    pub name: String,
    pub code_files: Vec<String>,
}

impl StudyListing {
    pub fn new<I, S>(name: impl Into<String>, code_files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            code_files: code_files.into_iter().map(Into::into).collect(),
        }
    }
}

/// Drop reserved and hidden names, keeping enumeration order.
pub fn candidate_studies<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().to_string())
        .filter(|n| !layout::is_reserved(n) && !n.starts_with('.'))
        .collect()
}

/// Mode of a single code folder. Literate is checked first and wins ties.
pub fn classify<S: AsRef<str>>(code_files: &[S]) -> DetectedMode {
    let has = |mode: AuthoringMode| {
        code_files
            .iter()
            .filter_map(|f| f.as_ref().rsplit_once('.').map(|(_, ext)| ext))
            .any(|ext| mode.recognises(ext))
    };

    if has(AuthoringMode::Literate) {
        DetectedMode::Literate
    } else if has(AuthoringMode::Scripted) {
        DetectedMode::Scripted
    } else {
        DetectedMode::Unknown
    }
}

/// Mode of the first candidate study.
///
/// `listings` must already be in enumeration order; reserved names are
/// skipped here as well, so callers may pass raw directory listings.
pub fn detect(listings: &[StudyListing]) -> DetectedMode {
    listings
        .iter()
        .find(|l| !layout::is_reserved(&l.name) && !l.name.starts_with('.'))
        .map(|l| classify(&l.code_files))
        .unwrap_or(DetectedMode::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_study_decides_regardless_of_others() {
        let listings = [
            StudyListing::new("a-pilot", ["01-processing.qmd", "02-analysis.qmd"]),
            StudyListing::new("b-followup", ["00-run-all.R", "01-processing.R"]),
        ];
        assert_eq!(detect(&listings), DetectedMode::Literate);
    }

    #[test]
    fn scripted_study_is_detected() {
        let listings = [StudyListing::new("pilot", ["00-run-all.R", "01-processing.R"])];
        assert_eq!(detect(&listings), DetectedMode::Scripted);
    }

    #[test]
    fn literate_wins_ties() {
        assert_eq!(classify(&["helpers.R", "report.qmd"]), DetectedMode::Literate);
    }

    #[test]
    fn rmd_and_lowercase_r_are_recognised() {
        assert_eq!(classify(&["report.Rmd"]), DetectedMode::Literate);
        assert_eq!(classify(&["clean.r"]), DetectedMode::Scripted);
    }

    #[test]
    fn empty_or_foreign_code_folder_is_unknown() {
        assert_eq!(classify::<&str>(&[]), DetectedMode::Unknown);
        assert_eq!(classify(&["notes.txt", "Makefile"]), DetectedMode::Unknown);
    }

    #[test]
    fn reserved_names_are_skipped() {
        let listings = [
            StudyListing::new("literature", ["x.qmd"]),
            StudyListing::new(".git", ["y.qmd"]),
            StudyListing::new("pilot", ["01-processing.R"]),
        ];
        assert_eq!(detect(&listings), DetectedMode::Scripted);
    }

    #[test]
    fn no_studies_is_unknown() {
        assert_eq!(detect(&[]), DetectedMode::Unknown);
    }

    #[test]
    fn candidate_filter_keeps_order() {
        let names = ["writeup", "pilot", ".DS_Store", "followup", "literature", ".git"];
        assert_eq!(candidate_studies(names), vec!["pilot", "followup"]);
    }

    #[test]
    fn detected_mode_maps_to_authoring_mode() {
        assert_eq!(DetectedMode::Scripted.into_mode(), Some(AuthoringMode::Scripted));
        assert_eq!(DetectedMode::Unknown.into_mode(), None);
    }
}
