//! Pluggable wizard assets: Actions, Behaviors, and Validators.
//!
//! A preference references its assets by name (or filesystem path); the
//! [`resolver`] turns those references into live trait objects. Three kinds
//! exist:
//!
//! - [`Action`] - side-effecting unit run as part of a pre/post hook
//! - [`Behavior`] - transform applied to a validated answer
//! - [`ValidatorRule`] - predicate with a failure message, used to reject input
//!
//! Custom assets are supplied through an [`AssetRegistry`]: an
//! explicitly-scoped, kind-partitioned map from canonical name to factory
//! function, passed by reference to the resolver. Built-in assets live in
//! [`builtin`] and form the final resolution layer.

pub mod builtin;
pub mod resolver;

pub use resolver::AssetResolver;

use crate::Result;
use crate::prefs::validation::Verdict;
use crate::terminal::Terminal;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Parameters declared on an asset reference, attached after construction.
pub type ParamMap = HashMap<String, String>;

/// The three asset kinds, used for resolution and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Action,
    Behavior,
    Validator,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Action => write!(f, "Action"),
            AssetKind::Behavior => write!(f, "Behavior"),
            AssetKind::Validator => write!(f, "Validator"),
        }
    }
}

/// A side-effecting unit run when a pre/post hook fires.
pub trait Action {
    /// Attach the parameters declared on the referencing hook.
    fn set_parameters(&mut self, _params: &ParamMap) {}

    /// Perform the side effect. Errors are reported as warnings by the
    /// caller and never abort delivery.
    fn run(&mut self, terminal: &mut dyn Terminal) -> Result<()>;
}

/// A transform applied to a validated answer.
///
/// Behaviors are pure by contract: same input, same output, no side effects.
pub trait Behavior {
    /// Attach the parameters declared on the referencing preference.
    fn set_parameters(&mut self, _params: &ParamMap) {}

    /// Transform the text, returning the next pipeline stage's input.
    fn evaluate(&self, text: &str) -> String;
}

/// A predicate used to accept or reject a raw response.
pub trait ValidatorRule {
    /// Check the text, returning pass/fail plus the failure message.
    fn validate(&self, text: &str) -> Verdict;
}

type ActionFactory = Box<dyn Fn() -> Box<dyn Action>>;
type BehaviorFactory = Box<dyn Fn() -> Box<dyn Behavior>>;
type ValidatorFactory = Box<dyn Fn() -> Box<dyn ValidatorRule>>;

/// Kind-partitioned registry of custom asset factories.
///
/// Names are canonicalized (lowercased) on registration so lookups match the
/// normalization the resolver applies to references.
#[derive(Default)]
pub struct AssetRegistry {
    actions: HashMap<String, ActionFactory>,
    behaviors: HashMap<String, BehaviorFactory>,
    validators: HashMap<String, ValidatorFactory>,
}

impl AssetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom Action under a canonical name.
    pub fn register_action<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Action> + 'static,
    {
        self.actions
            .insert(name.into().to_lowercase(), Box::new(factory));
    }

    /// Register a custom Behavior under a canonical name.
    pub fn register_behavior<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Behavior> + 'static,
    {
        self.behaviors
            .insert(name.into().to_lowercase(), Box::new(factory));
    }

    /// Register a custom Validator under a canonical name.
    pub fn register_validator<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn ValidatorRule> + 'static,
    {
        self.validators
            .insert(name.into().to_lowercase(), Box::new(factory));
    }

    pub(crate) fn action(&self, name: &str) -> Option<Box<dyn Action>> {
        self.actions.get(name).map(|f| f())
    }

    pub(crate) fn behavior(&self, name: &str) -> Option<Box<dyn Behavior>> {
        self.behaviors.get(name).map(|f| f())
    }

    pub(crate) fn validator(&self, name: &str) -> Option<Box<dyn ValidatorRule>> {
        self.validators.get(name).map(|f| f())
    }
}

/// Expand a leading `~` to the user's home directory.
///
/// Paths without a tilde are returned unchanged; if no home directory can be
/// determined the original path is kept.
pub(crate) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// The canonical name of an asset reference: the file stem of the final path
/// component, lowercased. `"~/rules/shouty_validator.rs"` and
/// `"Shouty_Validator"` both canonicalize to `"shouty_validator"`.
pub(crate) fn canonical_name(name_or_path: &str) -> String {
    Path::new(name_or_path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| name_or_path.to_lowercase())
}
