//! File Merge Dispatcher.
//!
//! Decides, for every file an addon contributes, whether it is copied,
//! replaced, skipped, merged or overwritten, and performs that action on the
//! staged tree.

use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::{
    application::ports::Filesystem,
    domain::{
        AddonTemplate, DomainError, FileMergeRecord, MergeOutcome, MergeStrategy, RelativePath,
        merge::{self, strip_override},
    },
    error::AnvilResult,
};

/// Applies addon files onto a destination tree through a [`Filesystem`].
pub struct FileMergeDispatcher<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> FileMergeDispatcher<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    /// Integrate every file of `addon` into `dest_root`, in sorted order.
    ///
    /// Stops at the first fatal error; files already handled stay modified,
    /// so callers run this against a staging area they can discard.
    #[instrument(skip_all, fields(addon = addon.id(), dest = %dest_root.display()))]
    pub fn integrate(
        &self,
        addon: &AddonTemplate,
        dest_root: &Path,
    ) -> AnvilResult<Vec<FileMergeRecord>> {
        let mut records = Vec::with_capacity(addon.files().len());
        for file in addon.files() {
            let record = self.integrate_file(addon, file, dest_root)?;
            debug!(path = %record.path, outcome = %record.outcome, "File integrated");
            records.push(record);
        }
        Ok(records)
    }

    /// Apply one addon file.
    pub fn integrate_file(
        &self,
        addon: &AddonTemplate,
        file: &RelativePath,
        dest_root: &Path,
    ) -> AnvilResult<FileMergeRecord> {
        let source = addon.source_of(file);
        let dest = dest_root.join(file);
        let strategy = MergeStrategy::for_path(file);
        let record = |outcome| FileMergeRecord::new(addon.id(), file.clone(), outcome, strategy);

        let incoming = self.fs.read_file(&source)?;
        let overridden = std::str::from_utf8(&incoming)
            .ok()
            .and_then(strip_override);

        if !self.fs.exists(&dest) {
            if let Some(parent) = dest.parent() {
                self.fs.create_dir_all(parent)?;
            }
            match overridden {
                Some(body) => self.fs.write_file(&dest, body.as_bytes())?,
                None => self.fs.copy_file(&source, &dest)?,
            }
            return Ok(record(MergeOutcome::Added));
        }

        if let Some(body) = overridden {
            self.fs.write_file(&dest, body.as_bytes())?;
            return Ok(record(MergeOutcome::Replaced));
        }

        let Some(strategy) = strategy else {
            warn!(
                addon = addon.id(),
                path = %file,
                "No merger for file type, overwriting"
            );
            self.fs.write_file(&dest, &incoming)?;
            return Ok(record(MergeOutcome::OverwrittenWarning));
        };

        // only mergeable types may skip
        let existing = self.fs.read_file(&dest)?;
        if existing == incoming {
            return Ok(record(MergeOutcome::Skipped));
        }

        let path = file.to_slash_string();
        let existing = as_text(&existing, &path, strategy, "existing")?;
        let incoming_text = as_text(&incoming, &path, strategy, "addon")?;
        let merged = merge::merge(strategy, &path, existing, incoming_text)?;
        self.fs.write_file(&dest, merged.as_bytes())?;

        Ok(record(MergeOutcome::Merged))
    }
}

fn as_text<'b>(
    bytes: &'b [u8],
    path: &str,
    strategy: MergeStrategy,
    side: &str,
) -> Result<&'b str, DomainError> {
    std::str::from_utf8(bytes).map_err(|e| {
        DomainError::merge_failed(path, strategy, format!("{side} content is not UTF-8: {e}"))
    })
}
