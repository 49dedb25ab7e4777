//! Built-in artifact templates and their renderer.
//!
//! Rendering is pure: the same [`ProjectConfig`] / [`StudyUnit`] and template
//! always produce byte-identical output. Nothing here reads the clock, the
//! environment or the filesystem, and no template ever receives an absolute
//! path. Every path written into an artifact is portable and relative.
//!
//! ## Variables
//!
//! | Variable          | Example                      | Source              |
//! |-------------------|------------------------------|---------------------|
//! | `PROJECT_NAME`    | "demo"                       | [`ProjectConfig`]   |
//! | `LICENSE_HOLDER`  | "Jane Doe"                   | [`LicenseInfo`]     |
//! | `YEAR`            | "2026"                       | [`LicenseInfo`]     |
//! | `STUDY_NAME`      | "pilot"                      | [`StudyUnit`]       |
//! | `TITLE`           | "01-processing"              | [`derive_title`]    |
//! | `STUDIES_SECTION` | "\n- [pilot](studies/pilot/)…" | [`studies_section`] |

use std::collections::BTreeMap;

use crate::domain::{
    entities::{
        common::RelativePath,
        config::{LicenseInfo, ProjectConfig, StudyUnit},
    },
    layout::{self, StudyDocument},
    value_objects::AuthoringMode,
};

/// Context for template rendering.
///
/// Backed by an ordered map so substitution order, and therefore output, is
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    variables: BTreeMap<&'static str, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_project(project_name: &str, license: &LicenseInfo) -> Self {
        Self::new()
            .with_variable("PROJECT_NAME", project_name)
            .with_variable("LICENSE_HOLDER", license.holder.as_str())
            .with_variable("YEAR", license.year.to_string())
    }

    pub fn with_variable(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.variables.insert(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Replace `{{VARIABLE}}` placeholders. Unknown placeholders stay as-is.
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }
        result
    }
}

/// What the README needs to know about one study.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySummary {
    pub name: String,
    pub mode: Option<AuthoringMode>,
}

impl From<&StudyUnit> for StudySummary {
    fn from(study: &StudyUnit) -> Self {
        Self {
            name: study.name().to_string(),
            mode: Some(study.authoring_mode()),
        }
    }
}

// ============================================================================
// Project-level artifacts
// ============================================================================

const README_TEMPLATE: &str = "\
# {{PROJECT_NAME}}

## Overview

Research compendium for **{{PROJECT_NAME}}**. Describe the research question
and how the studies below address it.

## Studies
{{STUDIES_SECTION}}## Reproducibility

Every study under `studies/` is self-contained:

- `data/raw/` holds untouched input data; `data/processed/` holds derived data.
- `code/` holds the processing and analysis documents. Processing runs before
  analysis.
- `outputs/` holds plots, fitted models and result tables.

References live in `literature/_references.bib` and manuscripts in `writeup/`.

## License

See [LICENSE](LICENSE).
";

const LICENSE_TEMPLATE: &str = "\
MIT License

Copyright (c) {{YEAR}} {{LICENSE_HOLDER}}

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the \"Software\"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
";

const REFERENCES_TEMPLATE: &str = "\
@article{wickham2014tidy,
  title   = {Tidy Data},
  author  = {Wickham, Hadley},
  journal = {Journal of Statistical Software},
  volume  = {59},
  number  = {10},
  pages   = {1--23},
  year    = {2014},
  doi     = {10.18637/jss.v059.i10}
}
";

const GITIGNORE_TEMPLATE: &str = "\
# R session state
.Rhistory
.RData
.Ruserdata
.Rproj.user/

# Quarto / knitr caches
.quarto/
*_cache/
*_files/

# OS clutter
.DS_Store
Thumbs.db
";

const GITIGNORE_LARGE_OUTPUTS: &str = "
# Large generated artifacts
studies/*/outputs/fitted_models/
studies/*/outputs/results/*.rds
";

const GITATTRIBUTES_TEMPLATE: &str = "\
* text=auto eol=lf

*.rds binary
*.RData binary
*.png binary
*.pdf binary
";

const PROJECT_FILE_TEMPLATE: &str = "\
Version: 1.0

RestoreWorkspace: No
SaveWorkspace: No
AlwaysSaveHistory: No

EnableCodeIndexing: Yes
UseSpacesForTab: Yes
NumSpacesForTab: 2
Encoding: UTF-8

RnwWeave: knitr
LaTeX: pdfLaTeX
";

pub fn render_readme(config: &ProjectConfig, studies: &[StudySummary]) -> String {
    RenderContext::for_project(config.project_name(), config.license())
        .with_variable("STUDIES_SECTION", studies_section(studies))
        .render(README_TEMPLATE)
}

/// Body of the `## Studies` README section.
///
/// Starts and ends with a blank line so it sits between two headings.
pub fn studies_section(studies: &[StudySummary]) -> String {
    if studies.is_empty() {
        return "\n_No studies yet._\n\n".to_string();
    }

    let mut body = String::from("\n");
    for study in studies {
        let root = layout::study_root(&study.name).to_portable();
        match study.mode {
            Some(mode) => {
                let first = match mode {
                    AuthoringMode::Literate => StudyDocument::Processing,
                    AuthoringMode::Scripted => StudyDocument::RunAll,
                };
                let entry = layout::study_document(&study.name, first, mode);
                body.push_str(&format!(
                    "- [{name}]({root}/) ({mode}, start at `{entry}`)\n",
                    name = study.name,
                ));
            }
            None => body.push_str(&format!("- [{name}]({root}/)\n", name = study.name)),
        }
    }
    body.push('\n');
    body
}

pub fn render_license(config: &ProjectConfig) -> String {
    RenderContext::for_project(config.project_name(), config.license()).render(LICENSE_TEMPLATE)
}

pub fn render_references() -> String {
    REFERENCES_TEMPLATE.to_string()
}

pub fn render_gitignore(ignore_large_outputs: bool) -> String {
    let mut out = GITIGNORE_TEMPLATE.to_string();
    if ignore_large_outputs {
        out.push_str(GITIGNORE_LARGE_OUTPUTS);
    }
    out
}

pub fn render_gitattributes() -> String {
    GITATTRIBUTES_TEMPLATE.to_string()
}

pub fn render_project_file() -> String {
    PROJECT_FILE_TEMPLATE.to_string()
}

// ============================================================================
// Study-level artifacts
// ============================================================================

const LITERATE_HEADER: &str = "\
---
title: \"{{TITLE}}\"
subtitle: \"Study {{STUDY_NAME}} of {{PROJECT_NAME}}\"
format: html
bibliography: ../../../literature/_references.bib
---

<!-- {{PURPOSE}} -->
";

const SCRIPT_HEADER: &str = "\
# {{TITLE}}
# Study: {{STUDY_NAME}}
# Project: {{PROJECT_NAME}}
#
# {{PURPOSE}}
";

const DATA_README_TEMPLATE: &str = "\
# Data for study {{STUDY_NAME}}

## raw/

Untouched input data, exactly as collected. Never edit these files by hand.

## processed/

Data derived from `raw/` by `code/01-processing`.

## Variables

| Variable | Type | Description |
|----------|------|-------------|
";

/// Title of a study document: its path without the code-folder prefix and
/// without the extension.
///
/// Both strips are anchored, the prefix to the start and the extension to the
/// end, so a study or file name that merely contains `code` or `qmd` keeps it.
pub fn derive_title(document: &RelativePath, code_dir: &RelativePath) -> String {
    let full = document.to_portable();
    let prefix = format!("{}/", code_dir.to_portable());
    let without_prefix = full.strip_prefix(prefix.as_str()).unwrap_or(full.as_str());

    let title = match document.extension() {
        Some(ext) => without_prefix
            .strip_suffix(format!(".{ext}").as_str())
            .unwrap_or(without_prefix),
        None => without_prefix,
    };
    title.to_string()
}

fn purpose(document: StudyDocument) -> &'static str {
    match document {
        StudyDocument::RunAll => "Run from the project root. Processing always runs before analysis.",
        StudyDocument::Processing => "Reads data/raw/ and writes data/processed/.",
        StudyDocument::Analysis => "Reads data/processed/ and writes outputs/.",
    }
}

fn study_context(project_name: &str, study: &StudyUnit, document: StudyDocument) -> RenderContext {
    let path = layout::study_document(study.name(), document, study.authoring_mode());
    let code_dir = layout::study_code_dir(study.name());
    RenderContext::new()
        .with_variable("PROJECT_NAME", project_name)
        .with_variable("STUDY_NAME", study.name())
        .with_variable("TITLE", derive_title(&path, &code_dir))
        .with_variable("PURPOSE", purpose(document))
}

/// Header of a processing or analysis document in the study's mode.
pub fn render_study_document(
    project_name: &str,
    study: &StudyUnit,
    document: StudyDocument,
) -> String {
    let template = match study.authoring_mode() {
        AuthoringMode::Literate => LITERATE_HEADER,
        AuthoringMode::Scripted => SCRIPT_HEADER,
    };
    study_context(project_name, study, document).render(template)
}

/// Master script for a scripted study: sources processing, then analysis.
pub fn render_run_all(project_name: &str, study: &StudyUnit) -> String {
    let mut out = study_context(project_name, study, StudyDocument::RunAll).render(SCRIPT_HEADER);
    out.push('\n');
    for document in [StudyDocument::Processing, StudyDocument::Analysis] {
        let path = layout::study_document(study.name(), document, AuthoringMode::Scripted);
        out.push_str(&format!("source(\"{}\")\n", path.to_portable()));
    }
    out
}

pub fn render_data_readme(study: &StudyUnit) -> String {
    RenderContext::new()
        .with_variable("STUDY_NAME", study.name())
        .render(DATA_README_TEMPLATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::config::LicenseInfo;

    fn config() -> ProjectConfig {
        ProjectConfig::builder("/home/someone/work")
            .name("demo")
            .license(LicenseInfo::new("Jane Doe", 2026))
            .build()
            .unwrap()
    }

    fn study(mode: AuthoringMode) -> StudyUnit {
        StudyUnit::new("pilot", mode).unwrap()
    }

    #[test]
    fn render_context_replaces_known_and_keeps_unknown() {
        let ctx = RenderContext::new().with_variable("PROJECT_NAME", "demo");
        assert_eq!(
            ctx.render("{{PROJECT_NAME}} {{UNKNOWN}}"),
            "demo {{UNKNOWN}}"
        );
    }

    #[test]
    fn readme_references_project_and_studies() {
        let readme = render_readme(&config(), &[StudySummary::from(&study(AuthoringMode::Literate))]);
        assert!(readme.starts_with("# demo\n"));
        assert!(readme.contains("- [pilot](studies/pilot/) (literate, start at `studies/pilot/code/01-processing.qmd`)"));
        assert!(readme.contains("## Studies\n\n- [pilot]"));
        assert!(readme.contains("\n\n## Reproducibility\n"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let studies = [StudySummary::from(&study(AuthoringMode::Scripted))];
        assert_eq!(render_readme(&config(), &studies), render_readme(&config(), &studies));
        assert_eq!(render_license(&config()), render_license(&config()));
    }

    #[test]
    fn license_carries_holder_and_year() {
        assert!(render_license(&config()).contains("Copyright (c) 2026 Jane Doe"));
    }

    #[test]
    fn bibliography_has_exactly_one_entry() {
        assert_eq!(render_references().matches('@').count(), 1);
    }

    #[test]
    fn gitignore_large_outputs_are_configurable() {
        assert!(render_gitignore(true).contains("studies/*/outputs/fitted_models/"));
        assert!(!render_gitignore(false).contains("fitted_models"));
        assert!(render_gitignore(false).contains(".Rhistory"));
        assert!(render_gitignore(false).contains(".quarto/"));
    }

    #[test]
    fn title_strips_prefix_and_extension() {
        let doc = RelativePath::from("studies/pilot/code/01-processing.qmd");
        let code = RelativePath::from("studies/pilot/code");
        assert_eq!(derive_title(&doc, &code), "01-processing");
    }

    #[test]
    fn title_strip_is_anchored() {
        // The study is called "code" and the file name mentions both "code" and "qmd".
        let doc = RelativePath::from("studies/code/code/code-qmd-review.qmd");
        let code = RelativePath::from("studies/code/code");
        assert_eq!(derive_title(&doc, &code), "code-qmd-review");
    }

    #[test]
    fn title_without_matching_prefix_keeps_path() {
        let doc = RelativePath::from("writeup/paper.qmd");
        let code = RelativePath::from("studies/pilot/code");
        assert_eq!(derive_title(&doc, &code), "writeup/paper");
    }

    #[test]
    fn literate_header_has_front_matter() {
        let out = render_study_document("demo", &study(AuthoringMode::Literate), StudyDocument::Analysis);
        assert!(out.starts_with("---\ntitle: \"02-analysis\"\n"));
        assert!(out.contains("bibliography: ../../../literature/_references.bib"));
    }

    #[test]
    fn script_header_is_commented() {
        let out = render_study_document("demo", &study(AuthoringMode::Scripted), StudyDocument::Processing);
        assert!(out.starts_with("# 01-processing\n# Study: pilot\n# Project: demo\n"));
    }

    #[test]
    fn run_all_sources_processing_before_analysis() {
        let out = render_run_all("demo", &study(AuthoringMode::Scripted));
        let processing = out
            .find("source(\"studies/pilot/code/01-processing.R\")")
            .unwrap();
        let analysis = out.find("source(\"studies/pilot/code/02-analysis.R\")").unwrap();
        assert!(processing < analysis);
        assert!(out.starts_with("# 00-run-all\n"));
    }

    #[test]
    fn no_artifact_embeds_the_absolute_root() {
        let cfg = config();
        let s = study(AuthoringMode::Scripted);
        let rendered = [
            render_readme(&cfg, &[StudySummary::from(&s)]),
            render_license(&cfg),
            render_run_all(cfg.project_name(), &s),
            render_study_document(cfg.project_name(), &s, StudyDocument::Analysis),
            render_data_readme(&s),
        ];
        for text in rendered {
            assert!(!text.contains("/home/someone"), "absolute path leaked: {text}");
        }
    }

    #[test]
    fn empty_studies_section_has_placeholder() {
        assert_eq!(studies_section(&[]), "\n_No studies yet._\n\n");
    }
}
