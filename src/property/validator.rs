//! Pluggable validation strategies for property values
//!
//! A validator accepts, rejects, or canonicalizes a raw string. The built-in
//! strategies are "any value", "enumerated set" (with prefix resolution), and
//! "boolean" (an enumerated set with fixed spellings). New property kinds
//! implement [`ValueValidator`] rather than extending a type hierarchy.

use crate::error::PropertyError;

/// Change hook for enumerated validators: receives the resolved index into
/// the declared sequence and the full declared value.
pub type EnumeratedHook = Box<dyn FnMut(usize, &str) -> Result<(), PropertyError>>;

/// Change hook for boolean validators.
pub type BooleanHook = Box<dyn FnMut(bool) -> Result<(), PropertyError>>;

/// Accepted boolean spellings. The first three canonicalize to `"false"`,
/// the last three to `"true"`.
pub const BOOLEAN_VALUES: [&str; 6] = ["0", "off", "false", "1", "on", "true"];

/// Validation capability bound to a property holder.
pub trait ValueValidator {
    /// Accept and canonicalize `raw`, or reject it. Rejection must leave all
    /// observable validator state unchanged.
    fn validate(&mut self, raw: &str) -> Result<String, PropertyError>;

    /// Declared values the partial input could complete to. `None` means the
    /// strategy does not support completion at all.
    fn complete(&self, _partial: &str) -> Option<Vec<String>> {
        None
    }
}

/// Accepts any value unchanged; free-form string properties.
#[derive(Debug, Default)]
pub struct AnyValue;

impl ValueValidator for AnyValue {
    fn validate(&mut self, raw: &str) -> Result<String, PropertyError> {
        Ok(raw.to_string())
    }
}

/// Resolve a raw input against a declared value sequence by prefix.
///
/// Returns the index and full text of the single declared value the trimmed
/// input is a prefix of. Zero matches and multiple matches are distinct
/// failures carrying the candidate list.
fn resolve_prefix<'a>(
    declared: &'a [String],
    raw: &str,
) -> Result<(usize, &'a str), PropertyError> {
    let trimmed = raw.trim();
    let matches: Vec<&String> = declared
        .iter()
        .filter(|v| v.starts_with(trimmed))
        .collect();
    match matches.len() {
        0 => Err(PropertyError::NoMatch {
            value: trimmed.to_string(),
            candidates: declared.to_vec(),
        }),
        1 => {
            let resolved = matches[0].as_str();
            // Declared sets are small; a linear scan for the index is fine.
            let index = declared
                .iter()
                .position(|v| v == resolved)
                .unwrap_or_default();
            Ok((index, resolved))
        }
        _ => Err(PropertyError::Ambiguous {
            value: trimmed.to_string(),
            candidates: matches.into_iter().cloned().collect(),
        }),
    }
}

/// Validator constrained to an ordered, non-empty set of declared values.
///
/// Input resolves by unambiguous prefix; the canonical result is always the
/// full declared value. An optional change hook observes each accepted
/// transition and may veto it.
pub struct EnumeratedValidator {
    declared: Vec<String>,
    hook: Option<EnumeratedHook>,
}

impl EnumeratedValidator {
    /// Build a validator over `declared`. Panics on an empty sequence; an
    /// enumerated property with nothing to enumerate is a construction bug.
    pub fn new<I, S>(declared: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let declared: Vec<String> = declared.into_iter().map(Into::into).collect();
        assert!(
            !declared.is_empty(),
            "enumerated validator requires at least one declared value"
        );
        Self {
            declared,
            hook: None,
        }
    }

    /// Attach a change hook invoked with the resolved index and full value.
    pub fn with_hook(mut self, hook: EnumeratedHook) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn declared_values(&self) -> &[String] {
        &self.declared
    }
}

impl ValueValidator for EnumeratedValidator {
    fn validate(&mut self, raw: &str) -> Result<String, PropertyError> {
        let (index, resolved) = resolve_prefix(&self.declared, raw)?;
        let resolved = resolved.to_string();
        if let Some(hook) = self.hook.as_mut() {
            hook(index, &resolved)?;
        }
        Ok(resolved)
    }

    fn complete(&self, partial: &str) -> Option<Vec<String>> {
        Some(
            self.declared
                .iter()
                .filter(|v| v.starts_with(partial))
                .cloned()
                .collect(),
        )
    }
}

/// Boolean validator over the fixed [`BOOLEAN_VALUES`] sequence.
///
/// Whatever spelling the input resolves to, the canonical value is exactly
/// `"true"` or `"false"`.
pub struct BooleanValidator {
    declared: Vec<String>,
    hook: Option<BooleanHook>,
}

impl BooleanValidator {
    pub fn new() -> Self {
        Self {
            declared: BOOLEAN_VALUES.iter().map(|v| v.to_string()).collect(),
            hook: None,
        }
    }

    /// Attach a change hook invoked with the resolved truth value.
    pub fn with_hook(mut self, hook: BooleanHook) -> Self {
        self.hook = Some(hook);
        self
    }
}

impl Default for BooleanValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueValidator for BooleanValidator {
    fn validate(&mut self, raw: &str) -> Result<String, PropertyError> {
        let (index, _) = resolve_prefix(&self.declared, raw)?;
        // The declared sequence splits into a false half and a true half.
        let value = index >= BOOLEAN_VALUES.len() / 2;
        if let Some(hook) = self.hook.as_mut() {
            hook(value)?;
        }
        Ok(if value { "true" } else { "false" }.to_string())
    }

    fn complete(&self, partial: &str) -> Option<Vec<String>> {
        Some(
            self.declared
                .iter()
                .filter(|v| v.starts_with(partial))
                .cloned()
                .collect(),
        )
    }
}
