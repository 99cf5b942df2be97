//! Fallback resolution for asset references.
//!
//! References are resolved in layers, first match wins:
//!
//! 1. **Explicit path** - a reference that names an existing file contributes
//!    its file stem as the canonical name
//! 2. **Registry** - custom assets registered under the canonical name
//! 3. **Built-in** - the stock tables in `assets::builtin`
//!
//! A reference that survives all three layers is reported as a warning and
//! resolves to nothing; the calling preference degrades gracefully (missing
//! validators pass vacuously, missing behaviors are identity, missing actions
//! are skipped). Resolution is never fatal.

use super::{
    Action, AssetKind, AssetRegistry, Behavior, ValidatorRule, canonical_name, expand_tilde,
};
use crate::terminal::Terminal;

/// Resolves asset references against a registry and the built-in tables.
pub struct AssetResolver<'a> {
    registry: &'a AssetRegistry,
}

impl<'a> AssetResolver<'a> {
    /// Create a resolver over the given registry.
    pub fn new(registry: &'a AssetRegistry) -> Self {
        Self { registry }
    }

    /// Resolve an Action reference. `None` (after a warning) when unresolvable.
    pub fn resolve_action(
        &self,
        name_or_path: &str,
        terminal: &mut dyn Terminal,
    ) -> Option<Box<dyn Action>> {
        let name = Self::canonicalize(name_or_path);
        self.registry
            .action(&name)
            .or_else(|| super::builtin::action(&name))
            .or_else(|| {
                warn_unresolved(terminal, AssetKind::Action, name_or_path);
                None
            })
    }

    /// Resolve a Behavior reference. `None` (after a warning) when unresolvable.
    pub fn resolve_behavior(
        &self,
        name_or_path: &str,
        terminal: &mut dyn Terminal,
    ) -> Option<Box<dyn Behavior>> {
        let name = Self::canonicalize(name_or_path);
        self.registry
            .behavior(&name)
            .or_else(|| super::builtin::behavior(&name))
            .or_else(|| {
                warn_unresolved(terminal, AssetKind::Behavior, name_or_path);
                None
            })
    }

    /// Resolve a Validator reference. `None` (after a warning) when unresolvable.
    pub fn resolve_validator(
        &self,
        name_or_path: &str,
        terminal: &mut dyn Terminal,
    ) -> Option<Box<dyn ValidatorRule>> {
        let name = Self::canonicalize(name_or_path);
        self.registry
            .validator(&name)
            .or_else(|| super::builtin::validator(&name))
            .or_else(|| {
                warn_unresolved(terminal, AssetKind::Validator, name_or_path);
                None
            })
    }

    /// Reduce a reference to its canonical name.
    ///
    /// A reference that names an existing file (after tilde expansion) is a
    /// path reference; its stem is the canonical name. Everything else is
    /// treated as a bare name, which canonicalizes the same way, so the two
    /// layers share one computation.
    fn canonicalize(name_or_path: &str) -> String {
        let expanded = expand_tilde(name_or_path);
        if expanded.is_file() {
            canonical_name(&expanded.to_string_lossy())
        } else {
            canonical_name(name_or_path)
        }
    }
}

fn warn_unresolved(terminal: &mut dyn Terminal, kind: AssetKind, name_or_path: &str) {
    terminal.warn(&format!(
        "Skipping undefined preference {}: {}",
        kind, name_or_path
    ));
}
