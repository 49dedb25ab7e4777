//! `compendium add-study`: add a study to an existing project.

use tracing::{info, instrument};

use compendium_core::{
    application::{AddStudyRequest, ModeSource},
    domain::{AuthoringMode, OverwritePolicy},
};

use crate::{
    cli::AddStudyArgs,
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `compendium add-study` command.
#[instrument(skip_all, fields(study = %args.name))]
pub fn execute(args: AddStudyArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let root = super::resolve_root(args.root.as_deref())?;
    let request = study_request(&args, config);
    let service = super::scaffold_service(false);

    if args.dry_run {
        let report = service
            .plan_study(&root, &request)
            .with_cli_context(|| format!("planning study '{}'", args.name))?;
        output.info(&format!(
            "Dry run: '{}' would use {} mode ({})",
            args.name, report.mode, report.mode_source
        ))?;
        output.report(&report)?;
        return Ok(());
    }

    let report = service
        .add_study(&root, &request)
        .with_cli_context(|| format!("adding study '{}'", args.name))?;
    info!(
        mode = %report.mode,
        source = %report.mode_source,
        written = report.written(),
        "Study added"
    );

    output.report(&report)?;
    let origin = match report.mode_source {
        ModeSource::Explicit => "as requested",
        ModeSource::Detected => "matching the existing studies",
        ModeSource::Default => "the default",
    };
    output.success(&format!(
        "Study '{}' added in {} mode, {origin}",
        args.name, report.mode
    ))?;

    Ok(())
}

/// The configured default mode is deliberately not applied here: without
/// `--mode` the mode is inferred from the studies already on disk.
fn study_request(args: &AddStudyArgs, config: &AppConfig) -> AddStudyRequest {
    let request = AddStudyRequest::new(args.name.clone())
        .overwrite_policy(OverwritePolicy::from_flag(args.overwrite))
        .vcs(args.git || config.defaults.git);
    match args.mode {
        Some(mode) => request.mode(AuthoringMode::from(mode)),
        None => request,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ModeArg;

    fn args(name: &str) -> AddStudyArgs {
        AddStudyArgs {
            name: name.into(),
            root: None,
            mode: None,
            overwrite: false,
            git: false,
            dry_run: false,
        }
    }

    #[test]
    fn mode_left_open_for_detection() {
        let mut config = AppConfig::default();
        config.defaults.mode = Some(AuthoringMode::Scripted);

        let request = study_request(&args("followup"), &config);
        assert_eq!(request.name, "followup");
        assert_eq!(request.mode, None);
        assert_eq!(request.overwrite_policy, OverwritePolicy::KeepExisting);
    }

    #[test]
    fn flags_map_onto_the_request() {
        let mut explicit = args("followup");
        explicit.mode = Some(ModeArg::Scripted);
        explicit.overwrite = true;
        explicit.git = true;

        let request = study_request(&explicit, &AppConfig::default());
        assert_eq!(request.mode, Some(AuthoringMode::Scripted));
        assert_eq!(request.overwrite_policy, OverwritePolicy::Overwrite);
        assert!(request.vcs);
    }
}
