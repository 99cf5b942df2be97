//! Built-in assets compiled into the binary.
//!
//! These form the final layer of the resolution chain: a reference that
//! matches no file and no registry entry falls through to the tables here.
//! Validators wrap the rules in `prefs::validation`; behaviors are the stock
//! text transforms. There are no built-in actions.

use super::{Action, Behavior, ParamMap, ValidatorRule, expand_tilde};
use crate::prefs::validation::{self, Verdict};

/// Look up a built-in action by canonical name.
///
/// There are no built-in actions; this is the (empty) final resolution layer
/// for the kind. Actions come from the registry.
pub fn action(_name: &str) -> Option<Box<dyn Action>> {
    None
}

/// Look up a built-in validator by canonical name.
pub fn validator(name: &str) -> Option<Box<dyn ValidatorRule>> {
    let rule: fn(&str) -> Verdict = match name {
        "alphabetic" => validation::alphabetic,
        "alphanumeric" => validation::alphanumeric,
        "date" => validation::date,
        "non_nil" => validation::non_nil,
        "numeric" => validation::numeric,
        "url" => validation::url,
        _ => return None,
    };
    Some(Box::new(RuleValidator { rule }))
}

/// Look up a built-in behavior by canonical name.
pub fn behavior(name: &str) -> Option<Box<dyn Behavior>> {
    match name {
        "capitalize" => Some(Box::new(CapitalizeBehavior)),
        "lowercase" => Some(Box::new(LowercaseBehavior)),
        "uppercase" => Some(Box::new(UppercaseBehavior)),
        "titlecase" => Some(Box::new(TitlecaseBehavior)),
        "prefix" => Some(Box::new(AffixBehavior::prefix())),
        "suffix" => Some(Box::new(AffixBehavior::suffix())),
        "expand_filepath" => Some(Box::new(ExpandFilepathBehavior)),
        _ => None,
    }
}

/// A validator backed by one of the stock rule functions.
struct RuleValidator {
    rule: fn(&str) -> Verdict,
}

impl ValidatorRule for RuleValidator {
    fn validate(&self, text: &str) -> Verdict {
        (self.rule)(text)
    }
}

/// Uppercase the first character, leave the rest untouched.
struct CapitalizeBehavior;

impl Behavior for CapitalizeBehavior {
    fn evaluate(&self, text: &str) -> String {
        let mut chars = text.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

struct LowercaseBehavior;

impl Behavior for LowercaseBehavior {
    fn evaluate(&self, text: &str) -> String {
        text.to_lowercase()
    }
}

struct UppercaseBehavior;

impl Behavior for UppercaseBehavior {
    fn evaluate(&self, text: &str) -> String {
        text.to_uppercase()
    }
}

/// Capitalize every whitespace-separated word.
struct TitlecaseBehavior;

impl Behavior for TitlecaseBehavior {
    fn evaluate(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| CapitalizeBehavior.evaluate(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Prepend or append the `text` parameter.
struct AffixBehavior {
    affix: String,
    prepend: bool,
}

impl AffixBehavior {
    fn prefix() -> Self {
        Self {
            affix: String::new(),
            prepend: true,
        }
    }

    fn suffix() -> Self {
        Self {
            affix: String::new(),
            prepend: false,
        }
    }
}

impl Behavior for AffixBehavior {
    fn set_parameters(&mut self, params: &ParamMap) {
        if let Some(text) = params.get("text") {
            self.affix = text.clone();
        }
    }

    fn evaluate(&self, text: &str) -> String {
        if self.prepend {
            format!("{}{}", self.affix, text)
        } else {
            format!("{}{}", text, self.affix)
        }
    }
}

/// Tilde-expand and absolutize a filesystem path.
struct ExpandFilepathBehavior;

impl Behavior for ExpandFilepathBehavior {
    fn evaluate(&self, text: &str) -> String {
        let expanded = expand_tilde(text);
        let absolute = if expanded.is_absolute() {
            expanded
        } else {
            match std::env::current_dir() {
                Ok(cwd) => cwd.join(expanded),
                Err(_) => expanded,
            }
        };
        absolute.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_stock_validators_resolve() {
        for name in ["alphabetic", "alphanumeric", "date", "non_nil", "numeric", "url"] {
            assert!(validator(name).is_some(), "missing built-in: {}", name);
        }
        assert!(validator("unknown").is_none());
    }

    #[test]
    fn test_stock_validator_applies_rule() {
        let v = validator("numeric").unwrap();
        assert!(v.validate("42").is_valid);
        let verdict = v.validate("12a");
        assert!(!verdict.is_valid);
        assert_eq!(verdict.message, "Response is not a number: 12a");
    }

    #[test]
    fn test_capitalize() {
        let b = behavior("capitalize").unwrap();
        assert_eq!(b.evaluate("ada lovelace"), "Ada lovelace");
        assert_eq!(b.evaluate(""), "");
    }

    #[test]
    fn test_case_behaviors() {
        assert_eq!(behavior("lowercase").unwrap().evaluate("ShOut"), "shout");
        assert_eq!(behavior("uppercase").unwrap().evaluate("quiet"), "QUIET");
        assert_eq!(
            behavior("titlecase").unwrap().evaluate("ada king lovelace"),
            "Ada King Lovelace"
        );
    }

    #[test]
    fn test_prefix_and_suffix_take_text_parameter() {
        let mut params = ParamMap::new();
        params.insert("text".to_string(), "Dr. ".to_string());

        let mut prefix = behavior("prefix").unwrap();
        prefix.set_parameters(&params);
        assert_eq!(prefix.evaluate("Lovelace"), "Dr. Lovelace");

        let mut params = ParamMap::new();
        params.insert("text".to_string(), ", PhD".to_string());
        let mut suffix = behavior("suffix").unwrap();
        suffix.set_parameters(&params);
        assert_eq!(suffix.evaluate("Lovelace"), "Lovelace, PhD");
    }

    #[test]
    fn test_affix_without_parameters_is_identity() {
        let prefix = behavior("prefix").unwrap();
        assert_eq!(prefix.evaluate("text"), "text");
    }

    #[test]
    fn test_expand_filepath_absolutizes() {
        let b = behavior("expand_filepath").unwrap();
        let result = b.evaluate("some/relative/path");
        assert!(result.ends_with("some/relative/path"));
        assert!(std::path::Path::new(&result).is_absolute());
    }

    #[test]
    fn test_unknown_behavior_is_none() {
        assert!(behavior("reticulate").is_none());
    }
}
