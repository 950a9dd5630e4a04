//! Verb semantics for the property command surface
//!
//! The interactive layer owns tokenizing the command line down to a verb and
//! its argument tail; this module owns what the tail means. Dispatch, line
//! editing, and rendering stay outside the core.

use crate::error::PropertyError;
use crate::property::PropertyRegistry;

/// One row of the zero-argument listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyListing {
    pub name: String,
    pub value: String,
    pub description: String,
}

/// Long-form help for a single property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyHelp {
    pub name: String,
    pub value: String,
    pub default: String,
    pub help: String,
}

/// What a set-property invocation resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// No arguments: every registered property in registration order.
    Listing(Vec<PropertyListing>),
    /// One argument: long-form help for that property.
    Help(PropertyHelp),
    /// Name plus value: the value was validated and applied.
    Applied { name: String, value: String },
}

/// Execute the set-property verb on the argument tail after the verb token.
///
/// Zero tokens list all properties; one token shows help; with two or more
/// tokens, everything after the first is the value, with surrounding single
/// or double quotes stripped only when both ends match.
pub fn set_command(
    registry: &mut PropertyRegistry,
    args: &str,
) -> Result<SetOutcome, PropertyError> {
    let args = args.trim();
    if args.is_empty() {
        let listing = registry
            .iter()
            .map(|(name, holder)| PropertyListing {
                name: name.to_string(),
                value: holder.value().to_string(),
                description: holder.description().to_string(),
            })
            .collect();
        return Ok(SetOutcome::Listing(listing));
    }

    let (name, rest) = match args.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (args, ""),
    };

    if rest.is_empty() {
        let holder = registry
            .get(name)
            .ok_or_else(|| PropertyError::UnknownProperty(name.to_string()))?;
        return Ok(SetOutcome::Help(PropertyHelp {
            name: name.to_string(),
            value: holder.value().to_string(),
            default: holder.default_value().to_string(),
            help: holder.help().to_string(),
        }));
    }

    let value = strip_quotes(rest);
    let canonical = registry.set_property(name, value)?;
    Ok(SetOutcome::Applied {
        name: name.to_string(),
        value: canonical,
    })
}

/// Execute the reset-property verb. Exactly one token is required; any other
/// count is a syntax error, distinct from a validation failure. The default
/// is re-applied through normal validation.
pub fn reset_command(registry: &mut PropertyRegistry, args: &str) -> Result<String, PropertyError> {
    let mut tokens = args.split_whitespace();
    let name = match (tokens.next(), tokens.next()) {
        (Some(name), None) => name,
        _ => {
            return Err(PropertyError::Syntax(
                "usage: reset-property <name>".to_string(),
            ))
        }
    };
    registry.reset_property(name)
}

/// Strip one pair of surrounding quotes, but only when both ends match.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyHolder;

    fn sample_registry() -> PropertyRegistry {
        let mut reg = PropertyRegistry::new();
        reg.register("color", PropertyHolder::boolean(true, "colored output"));
        reg.register(
            "format",
            PropertyHolder::enumerated(["table", "vertical"], "table", "output format")
                .with_long_help("How result rows are rendered: table or vertical."),
        );
        reg.register("prompt", PropertyHolder::string("> ", "prompt text"));
        reg
    }

    #[test]
    fn no_arguments_lists_everything_in_order() {
        let mut reg = sample_registry();
        match set_command(&mut reg, "").unwrap() {
            SetOutcome::Listing(rows) => {
                let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
                assert_eq!(names, vec!["color", "format", "prompt"]);
                assert_eq!(rows[0].value, "true");
                assert_eq!(rows[0].description, "colored output");
            }
            other => panic!("expected Listing, got {other:?}"),
        }
    }

    #[test]
    fn single_argument_shows_long_help() {
        let mut reg = sample_registry();
        match set_command(&mut reg, "format").unwrap() {
            SetOutcome::Help(help) => {
                assert_eq!(help.name, "format");
                assert_eq!(help.default, "table");
                assert!(help.help.contains("rendered"));
            }
            other => panic!("expected Help, got {other:?}"),
        }
    }

    #[test]
    fn single_unknown_argument_fails() {
        let mut reg = sample_registry();
        assert_eq!(
            set_command(&mut reg, "nope").unwrap_err(),
            PropertyError::UnknownProperty("nope".to_string())
        );
    }

    #[test]
    fn value_is_remainder_of_line() {
        let mut reg = sample_registry();
        let outcome = set_command(&mut reg, "prompt sql shell >").unwrap();
        assert_eq!(
            outcome,
            SetOutcome::Applied {
                name: "prompt".to_string(),
                value: "sql shell >".to_string(),
            }
        );
        assert_eq!(reg.get("prompt").unwrap().value(), "sql shell >");
    }

    #[test]
    fn matching_quotes_are_stripped() {
        let mut reg = sample_registry();
        set_command(&mut reg, "prompt \"db > \"").unwrap();
        assert_eq!(reg.get("prompt").unwrap().value(), "db > ");

        set_command(&mut reg, "prompt '> '").unwrap();
        assert_eq!(reg.get("prompt").unwrap().value(), "> ");
    }

    #[test]
    fn mismatched_quotes_are_kept() {
        let mut reg = sample_registry();
        set_command(&mut reg, "prompt \"half'").unwrap();
        assert_eq!(reg.get("prompt").unwrap().value(), "\"half'");
    }

    #[test]
    fn set_propagates_validation_failures() {
        let mut reg = sample_registry();
        assert!(matches!(
            set_command(&mut reg, "format xml").unwrap_err(),
            PropertyError::NoMatch { .. }
        ));
        assert_eq!(reg.get("format").unwrap().value(), "table");
    }

    #[test]
    fn reset_requires_exactly_one_token() {
        let mut reg = sample_registry();
        assert!(matches!(
            reset_command(&mut reg, "").unwrap_err(),
            PropertyError::Syntax(_)
        ));
        assert!(matches!(
            reset_command(&mut reg, "color format").unwrap_err(),
            PropertyError::Syntax(_)
        ));
    }

    #[test]
    fn reset_reapplies_the_default() {
        let mut reg = sample_registry();
        reg.set_property("color", "off").unwrap();
        assert_eq!(reset_command(&mut reg, "color").unwrap(), "true");
        assert_eq!(reg.get("color").unwrap().value(), "true");
    }

    #[test]
    fn reset_unknown_property_is_not_a_syntax_error() {
        let mut reg = sample_registry();
        assert_eq!(
            reset_command(&mut reg, "nope").unwrap_err(),
            PropertyError::UnknownProperty("nope".to_string())
        );
    }
}
