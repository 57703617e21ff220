//! Implementation of the `anvil new` command.
//!
//! Responsibility: translate CLI arguments into a `StackSelection`, call the
//! core scaffold service, display results and run the install step. No merge
//! logic lives here.

use std::path::{Component, Path, PathBuf};

use indicatif::ProgressBar;
use tracing::{debug, info, instrument};

use anvil_adapters::{Catalog, CommandInstaller, DirectoryCatalog, LocalFilesystem};
use anvil_core::{
    application::{GenerationObserver, GenerationPlan, PackageInstaller, ScaffoldService},
    domain::{FileMergeRecord, GenerationReport, GenerationWarning, PackageManager, StackSelection},
};

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::{OutputManager, warning_line},
};

/// Execute the `anvil new` command.
///
/// Dispatch sequence:
/// 1. Resolve and validate the project name / destination
/// 2. Load the template catalog and pick base + addons (prompting if needed)
/// 3. Build the `StackSelection`
/// 4. Early-exit with the resolved plan if `--dry-run`
/// 5. Confirm with user unless `--yes` or `--quiet`
/// 6. Generate via `ScaffoldService`
/// 7. Install dependencies unless disabled
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Destination
    let cwd = std::env::current_dir()?;
    let (project_name, destination) = resolve_destination(&args.name, &cwd)?;
    validate_project_name(&project_name)?;

    // 2. Catalog and choices
    let root = config.template_root(args.templates.as_deref());
    let filesystem = LocalFilesystem::new();
    let catalog = if root.is_dir() {
        DirectoryCatalog::new(&root).load(&filesystem)?
    } else {
        Catalog::default()
    };

    let interactive = !args.yes && !global.quiet && is_interactive();
    let (base, addons) = match args.base.clone() {
        Some(base) => (base, args.addons.clone()),
        None if interactive => {
            let base = prompt::base(&catalog)?;
            let addons = if args.addons.is_empty() {
                prompt::addons(&catalog)?
            } else {
                args.addons.clone()
            };
            (base, addons)
        }
        None => {
            return Err(CliError::InvalidInput {
                message: "--base is required when not running interactively".into(),
                source: None,
            });
        }
    };

    // 3. Selection
    let selection = build_selection(&args, &catalog, &base, addons, &project_name, &destination)?;
    debug!(
        selection = %selection,
        framework = selection.framework(),
        root = %root.display(),
        "Selection resolved"
    );

    let service = ScaffoldService::new(&root, Box::new(filesystem))
        .with_fallback_framework(config.templates.fallback_framework.clone());

    // 4. Dry run: describe but do not write.
    if args.dry_run {
        let plan = service.plan(&selection)?;
        if output.is_json() {
            output.json(&plan)?;
        } else {
            show_plan(&plan, &output)?;
        }
        return Ok(());
    }

    // 5. Confirm
    if interactive {
        show_configuration(&selection, &root, &output)?;
        if !prompt::confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    // 6. Generate
    let spinner = output.spinner(&format!("Creating '{project_name}'..."));
    let observer = ConsoleObserver {
        spinner: spinner.clone(),
        verbose: output.is_verbose() && !output.is_json(),
        quiet: output.is_quiet(),
        no_color: !output.supports_color(),
    };
    info!(destination = %destination.display(), "Generation started");

    let result = service
        .with_observer(Box::new(observer))
        .generate(&selection);
    spinner.finish_and_clear();
    let report = result?;

    if output.is_json() {
        output.json(&report)?;
    } else {
        show_summary(&report, &output)?;
    }

    // 7. Install
    let manager = args
        .package_manager
        .map(PackageManager::from)
        .unwrap_or(config.install.package_manager);

    if args.skip_install || !config.install.enabled {
        debug!("Install step disabled");
    } else if !destination.join("package.json").is_file() {
        output.info("No package.json generated, skipping dependency install")?;
    } else {
        output.header(&format!("Installing dependencies with {manager}..."))?;
        let installer = CommandInstaller::new().quiet(global.quiet || output.is_json());
        install_dependencies(&installer, &destination, manager)?;
        output.success("Dependencies installed")?;
    }

    if !global.quiet && !output.is_json() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", display_relative(&destination, &cwd)))?;
        output.print(&format!("  {} run dev", manager.program()))?;
    }

    Ok(())
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// Split `name` into the project name and an absolute destination.
pub fn resolve_destination(name: &str, cwd: &Path) -> CliResult<(String, PathBuf)> {
    let path = Path::new(name);

    let project_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidProjectName {
            name: name.into(),
            reason: "cannot extract valid project name".into(),
        })?
        .to_string();

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    let destination = absolute
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    Ok((project_name, destination))
}

fn validate_project_name(name: &str) -> CliResult<()> {
    if name.is_empty() {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot be empty".into(),
        });
    }
    if name.starts_with('.') {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot start with '.'".into(),
        });
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: format!("character '{c}' is not allowed"),
        });
    }
    Ok(())
}

fn display_relative(path: &Path, cwd: &Path) -> String {
    path.strip_prefix(cwd)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ── Selection construction ────────────────────────────────────────────────────

fn build_selection(
    args: &NewArgs,
    catalog: &Catalog,
    base: &str,
    addons: Vec<String>,
    project_name: &str,
    destination: &Path,
) -> CliResult<StackSelection> {
    let mut builder = StackSelection::builder()
        .base(base)
        .addons(addons)
        .destination(destination)
        .project_name(project_name);

    // explicit flag, then the catalog's declared type, then the base id prefix
    let framework = args
        .framework
        .clone()
        .or_else(|| catalog.framework_of(base).map(String::from));
    if let Some(framework) = framework {
        builder = builder.framework(framework);
    }

    for param in &args.params {
        builder = builder.addon_param(&param.addon, &param.key, &param.value);
    }

    builder.build().map_err(|e| CliError::Core(e.into()))
}

// ── Install ───────────────────────────────────────────────────────────────────

fn install_dependencies(
    installer: &dyn PackageInstaller,
    project: &Path,
    manager: PackageManager,
) -> CliResult<()> {
    installer
        .install(project, manager)
        .map_err(|e| CliError::ExternalCommandFailed {
            command: format!("{} {}", manager.program(), manager.install_args().join(" ")),
            project: project.to_path_buf(),
            source: Some(Box::new(e)),
        })
}

// ── Progress ──────────────────────────────────────────────────────────────────

/// Streams generation events to the terminal around the spinner.
struct ConsoleObserver {
    spinner: ProgressBar,
    verbose: bool,
    quiet: bool,
    no_color: bool,
}

impl GenerationObserver for ConsoleObserver {
    fn addon_started(&self, addon: &str, _root: &Path) {
        self.spinner.set_message(format!("Applying {addon}..."));
    }

    fn file_integrated(&self, record: &FileMergeRecord) {
        if self.verbose {
            self.spinner.suspend(|| println!("  {record}"));
        }
    }

    fn warning(&self, warning: &GenerationWarning) {
        if !self.quiet {
            let line = warning_line(&warning.to_string(), self.no_color);
            self.spinner.suspend(|| eprintln!("{line}"));
        }
    }
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_plan(plan: &GenerationPlan, out: &OutputManager) -> CliResult<()> {
    out.info(&format!(
        "Dry run: would create {}",
        plan.destination.display()
    ))?;
    if plan.destination_exists {
        out.warning("Destination already exists; generation would fail")?;
    }

    let base_state = if plan.base_exists { "" } else { "  (missing)" };
    out.print(&format!(
        "  Base:       {} -> {}{base_state}",
        plan.base_template,
        plan.base_dir.display()
    ))?;
    out.print(&format!("  Framework:  {}", plan.framework))?;

    for (i, (addon, dir)) in plan.addons.iter().enumerate() {
        let location = match dir {
            Some(dir) => dir.display().to_string(),
            None => "not found, would be skipped".into(),
        };
        out.print(&format!("  Addon {}:    {addon} -> {location}", i + 1))?;
    }
    Ok(())
}

fn show_configuration(selection: &StackSelection, root: &Path, out: &OutputManager) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Project:    {}", selection.project_name()))?;
    out.print(&format!("  Base:       {}", selection.base_template()))?;
    out.print(&format!("  Framework:  {}", selection.framework()))?;
    if !selection.addons().is_empty() {
        out.print(&format!("  Addons:     {}", selection.addons().join(", ")))?;
    }
    out.print(&format!("  Templates:  {}", root.display()))?;
    out.print(&format!("  Location:   {}", selection.destination().display()))?;
    out.print("")?;
    Ok(())
}

fn show_summary(report: &GenerationReport, out: &OutputManager) -> CliResult<()> {
    use anvil_core::domain::MergeOutcome;

    out.success(&format!(
        "Project created at {}",
        report.destination().display()
    ))?;
    out.print(&format!(
        "  {} addon(s) applied: {} added, {} merged, {} replaced, {} overwritten",
        report.applied_addons().len(),
        report.count(MergeOutcome::Added),
        report.count(MergeOutcome::Merged),
        report.count(MergeOutcome::Replaced),
        report.count(MergeOutcome::OverwrittenWarning),
    ))?;
    if !report.warnings().is_empty() {
        out.warning(&format!("{} warning(s) during generation", report.warnings().len()))?;
    }
    Ok(())
}

fn is_interactive() -> bool {
    use std::io::IsTerminal;
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

// ── Prompts ───────────────────────────────────────────────────────────────────

#[cfg(feature = "interactive")]
mod prompt {
    use std::io;

    use anvil_adapters::Catalog;
    use dialoguer::{Confirm, MultiSelect, Select, theme::ColorfulTheme};

    use crate::error::{CliError, CliResult};

    fn prompt_error(e: dialoguer::Error) -> CliError {
        CliError::IoError {
            message: "failed to read interactive input".into(),
            source: io::Error::other(e),
        }
    }

    pub fn base(catalog: &Catalog) -> CliResult<String> {
        if catalog.bases.is_empty() {
            return Err(CliError::InvalidInput {
                message: "no base templates found; pass --templates or --base".into(),
                source: None,
            });
        }
        let labels: Vec<String> = catalog.bases.iter().map(|b| b.name.clone()).collect();
        let index = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Base template")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(prompt_error)?;
        Ok(catalog.bases[index].id.clone())
    }

    pub fn addons(catalog: &Catalog) -> CliResult<Vec<String>> {
        if catalog.addons.is_empty() {
            return Ok(Vec::new());
        }
        let labels: Vec<String> = catalog
            .addons
            .iter()
            .map(|a| match a.category {
                Some(category) => format!("{} ({category})", a.name),
                None => a.name.clone(),
            })
            .collect();
        let picked = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Addons (space to toggle, applied top to bottom)")
            .items(&labels)
            .interact()
            .map_err(prompt_error)?;
        Ok(picked
            .into_iter()
            .map(|i| catalog.addons[i].id.clone())
            .collect())
    }

    pub fn confirm() -> CliResult<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Continue?")
            .default(true)
            .interact()
            .map_err(prompt_error)
    }
}

#[cfg(not(feature = "interactive"))]
mod prompt {
    use anvil_adapters::Catalog;

    use crate::error::{CliError, CliResult};

    pub fn base(_catalog: &Catalog) -> CliResult<String> {
        Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        })
    }

    pub fn addons(_catalog: &Catalog) -> CliResult<Vec<String>> {
        Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        })
    }

    pub fn confirm() -> CliResult<bool> {
        use std::io::{self, Write};

        print!("Continue? [Y/n] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        let input = input.trim().to_ascii_lowercase();
        Ok(input.is_empty() || input == "y" || input == "yes")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
