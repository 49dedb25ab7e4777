//! `compendium init`: create a research project skeleton.

use std::path::PathBuf;

use tracing::{info, instrument};

use compendium_core::{
    application::InitOptions,
    domain::{AuthoringMode, OverwritePolicy, ProjectConfig},
    error::ScaffoldError,
};

use crate::{
    cli::InitArgs,
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `compendium init` command.
///
/// Dispatch sequence:
/// 1. Resolve the root and build a validated `ProjectConfig`
/// 2. Merge flags with configured defaults into `InitOptions`
/// 3. Plan only (`--dry-run`) or scaffold via `ScaffoldService`
/// 4. Print the status table, warnings and next steps
#[instrument(skip_all, fields(name = args.name.as_deref().unwrap_or("."), here = args.here))]
pub fn execute(args: InitArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let root = super::resolve_root(args.root.as_deref())?;
    let project = project_config(&args, config, root)?;
    let options = init_options(&args, config);

    let service = super::scaffold_service(options.open && !args.dry_run);

    if args.dry_run {
        let report = service
            .plan_init(&project, &options)
            .with_cli_context(|| "planning init")?;
        output.info("Dry run: nothing was written")?;
        output.report(&report)?;
        return Ok(());
    }

    output.header(&format!("Creating '{}'...", project.project_name()))?;
    let report = service
        .init_project(&project, &options)
        .with_cli_context(|| format!("initialising '{}'", project.project_name()))?;
    info!(
        written = report.written(),
        skipped = report.skipped(),
        "Init finished"
    );

    output.report(&report)?;
    output.success(&format!(
        "Project '{}' ready ({} written, {} skipped)",
        report.project_name,
        report.written(),
        report.skipped()
    ))?;

    output.print("")?;
    output.print("Next steps:")?;
    if !args.here {
        output.print(&format!("  cd {}", report.project_name))?;
    }
    match &report.study {
        Some(study) => output.print(&format!("  open studies/{study}/code/ and start"))?,
        None => output.print("  compendium add-study <name>")?,
    }

    Ok(())
}

fn project_config(args: &InitArgs, config: &AppConfig, root: PathBuf) -> CliResult<ProjectConfig> {
    let mode = args
        .mode
        .map(AuthoringMode::from)
        .unwrap_or_else(|| config.default_mode());

    let mut builder = ProjectConfig::builder(root)
        .authoring_mode(mode)
        .overwrite_policy(OverwritePolicy::from_flag(args.overwrite))
        .license(config.license_info())
        .ignore_large_outputs(config.templates.ignore_large_outputs);
    if args.here {
        builder = builder.in_current_dir();
    }
    if let Some(name) = &args.name {
        builder = builder.name(name.clone());
    }

    Ok(builder.build().map_err(ScaffoldError::from)?)
}

fn init_options(args: &InitArgs, config: &AppConfig) -> InitOptions {
    InitOptions {
        study: args.study.clone().or_else(|| config.defaults.study.clone()),
        vcs: args.git || config.defaults.git,
        open: args.open || config.defaults.open,
    }
}
