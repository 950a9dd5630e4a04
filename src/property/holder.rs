//! Named value cell bound to one validation strategy

use crate::error::PropertyError;
use crate::property::validator::{
    AnyValue, BooleanHook, BooleanValidator, EnumeratedValidator, ValueValidator,
};

/// A single property: its current value, its immutable default, help text,
/// and the validator deciding which transitions are allowed.
///
/// The current value only changes after the validator accepts a candidate;
/// on rejection the holder is untouched and the error is returned unchanged.
pub struct PropertyHolder {
    current: String,
    default: String,
    description: String,
    long_help: Option<String>,
    validator: Box<dyn ValueValidator>,
}

impl PropertyHolder {
    /// Build a holder around an explicit validator. The initial current value
    /// is the default, installed without a validated transition.
    pub fn new(
        default: impl Into<String>,
        description: impl Into<String>,
        validator: Box<dyn ValueValidator>,
    ) -> Self {
        let default = default.into();
        Self {
            current: default.clone(),
            default,
            description: description.into(),
            long_help: None,
            validator,
        }
    }

    /// Free-form string property accepting any value.
    pub fn string(default: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(default, description, Box::new(AnyValue))
    }

    /// Property constrained to an ordered set of declared values.
    pub fn enumerated<I, S>(
        declared: I,
        default: impl Into<String>,
        description: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            default,
            description,
            Box::new(EnumeratedValidator::new(declared)),
        )
    }

    /// Boolean property preset to `initial` without validation.
    pub fn boolean(initial: bool, description: impl Into<String>) -> Self {
        Self::new(
            if initial { "true" } else { "false" },
            description,
            Box::new(BooleanValidator::new()),
        )
    }

    /// Boolean property whose accepted transitions also drive a hook.
    pub fn boolean_with_hook(
        initial: bool,
        description: impl Into<String>,
        hook: BooleanHook,
    ) -> Self {
        Self::new(
            if initial { "true" } else { "false" },
            description,
            Box::new(BooleanValidator::new().with_hook(hook)),
        )
    }

    /// Attach long-form help shown by the single-argument set verb.
    pub fn with_long_help(mut self, help: impl Into<String>) -> Self {
        self.long_help = Some(help.into());
        self
    }

    pub fn value(&self) -> &str {
        &self.current
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Long-form help, falling back to the short description.
    pub fn help(&self) -> &str {
        self.long_help.as_deref().unwrap_or(&self.description)
    }

    /// Validate and apply `raw`. Returns the canonical value actually stored.
    pub fn set_value(&mut self, raw: &str) -> Result<String, PropertyError> {
        let canonical = self.validator.validate(raw)?;
        self.current = canonical.clone();
        Ok(canonical)
    }

    /// Re-apply the default through normal validation.
    pub fn reset(&mut self) -> Result<String, PropertyError> {
        let default = self.default.clone();
        self.set_value(&default)
    }

    /// Candidate completions for a partial value, or `None` when the bound
    /// validator has no completion support.
    pub fn complete_value(&self, partial: &str) -> Option<Vec<String>> {
        self.validator.complete(partial)
    }
}

impl std::fmt::Debug for PropertyHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyHolder")
            .field("current", &self.current)
            .field("default", &self.default)
            .field("description", &self.description)
            .finish()
    }
}
