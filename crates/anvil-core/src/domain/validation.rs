use crate::domain::{
    entities::{AddonTemplate, StackSelection, common::RelativePath},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_selection(selection: &StackSelection) -> Result<(), DomainError> {
        selection.validate()
    }

    /// Every listed addon file must stay inside the addon root.
    pub fn validate_addon(addon: &AddonTemplate) -> Result<(), DomainError> {
        for file in addon.files() {
            RelativePath::try_new(file.as_path())?;
        }
        Ok(())
    }
}
