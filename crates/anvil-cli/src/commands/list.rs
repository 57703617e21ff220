//! Implementation of the `anvil list` command.

use std::path::Path;

use tracing::instrument;

use anvil_adapters::{Catalog, CatalogEntry, DirectoryCatalog, LocalFilesystem};
use anvil_core::application::ApplicationError;

use crate::{
    cli::{ListArgs, ListFormat, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(
    args: ListArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let root = config.template_root(args.templates.as_deref());
    let catalog = load_catalog(&root)?;

    match args.format {
        ListFormat::Table => {
            output.header(&format!("Base templates ({})", root.display()))?;
            if catalog.bases.is_empty() {
                output.print("  (none)")?;
            }
            for base in &catalog.bases {
                output.print(&table_row(base))?;
            }

            output.print("")?;
            output.header("Addons")?;
            if catalog.addons.is_empty() {
                output.print("  (none)")?;
            }
            for addon in &catalog.addons {
                output.print(&table_row(addon))?;
            }
        }

        // Bypasses OutputManager suppression so pipes always get data.
        ListFormat::Json => output.json(&catalog)?,

        ListFormat::List => {
            for entry in catalog.bases.iter().chain(&catalog.addons) {
                println!("{}", entry.id);
            }
        }
    }

    Ok(())
}

fn load_catalog(root: &Path) -> CliResult<Catalog> {
    if !root.is_dir() {
        return Err(CliError::Core(
            ApplicationError::TemplateRootMissing {
                path: root.to_path_buf(),
            }
            .into(),
        ));
    }
    Ok(DirectoryCatalog::new(root).load(&LocalFilesystem::new())?)
}

fn table_row(entry: &CatalogEntry) -> String {
    let mut row = format!("  {:<24}", entry.id);
    if let Some(category) = entry.category {
        row.push_str(&format!(" {:<12}", category.to_string()));
    }
    if !entry.frameworks.is_empty() {
        row.push_str(&format!(" [{}]", entry.frameworks.join(", ")));
    }
    if let Some(description) = &entry.description {
        row.push_str(&format!("  {description}"));
    } else if entry.name != entry.id {
        row.push_str(&format!("  {}", entry.name));
    }
    row
}
