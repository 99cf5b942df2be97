//! Preference elicitation: load prompts, deliver them in dependency order,
//! collect the answers.
//!
//! A [`PrefSet`] owns the ordered preferences and runs the two-phase delivery
//! protocol:
//!
//! 1. **Phase 1** - every preference without requirements, in declared order
//! 2. **Phase 2** - every preference with requirements, in declared order,
//!    delivered only if all of its requirements match an already-collected
//!    answer; otherwise silently skipped, final for the run
//!
//! The split keeps unconditional questions in a stable, predictable order and
//! lets conditional prompts depend only on unconditional or earlier
//! conditional answers - never forward references - without a dependency
//! graph or topological sort.

pub mod pref;
pub mod schema;
pub mod validation;

pub use pref::Pref;
pub use schema::{AssetSpec, HookSpec, PrefSpec, PromptsFile, Requirement};
pub use validation::Verdict;

use crate::assets::AssetResolver;
use crate::terminal::Terminal;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// The ordered collection of preferences for one elicitation run.
pub struct PrefSet {
    prefs: Vec<Pref>,
    source_path: Option<PathBuf>,
}

impl PrefSet {
    /// Load preferences from a TOML prompts document.
    ///
    /// Fails with a configuration error if the path does not name a file, and
    /// with a parse error if the document is malformed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::Configuration(format!(
                "Invalid prompts file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path)?;
        let file: PromptsFile = toml::from_str(&raw)?;
        let mut set = Self::from_specs(file.prompts);
        set.source_path = Some(path.to_path_buf());
        Ok(set)
    }

    /// Build a set from in-memory specs, preserving their order.
    pub fn from_specs(specs: Vec<PrefSpec>) -> Self {
        let prefs = specs
            .into_iter()
            .map(|mut spec| {
                spec.normalize();
                Pref::from_spec(spec)
            })
            .collect();
        Self {
            prefs,
            source_path: None,
        }
    }

    /// Run the two-phase delivery protocol, collecting answers as it goes.
    pub fn ask(&mut self, resolver: &AssetResolver<'_>, terminal: &mut dyn Terminal) -> Result<()> {
        // Phase 1: unconditional preferences, declared order.
        for i in 0..self.prefs.len() {
            if !self.prefs[i].has_requirements() {
                self.prefs[i].deliver(resolver, terminal)?;
            }
        }

        // Phase 2: requirement-gated preferences, declared order. Eligibility
        // is decided against the answers collected so far and never
        // revisited.
        for i in 0..self.prefs.len() {
            if self.prefs[i].has_requirements() && self.requirements_fulfilled(i) {
                self.prefs[i].deliver(resolver, terminal)?;
            }
        }
        Ok(())
    }

    /// Whether every requirement of the preference at `index` matches an
    /// already-answered preference (exact equality on key and answer).
    fn requirements_fulfilled(&self, index: usize) -> bool {
        self.prefs[index].requirements.iter().all(|req| {
            self.prefs.iter().any(|p| {
                p.key() == req.key && p.answer.as_deref() == Some(req.value.as_str())
            })
        })
    }

    /// All preferences, in declared order.
    pub fn prefs(&self) -> &[Pref] {
        &self.prefs
    }

    /// The preferences that collected an answer, in declared order.
    pub fn answered(&self) -> impl Iterator<Item = &Pref> {
        self.prefs.iter().filter(|p| p.answer.is_some())
    }

    /// The file this set was loaded from, when it came from one.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetRegistry;
    use crate::terminal::testing::ScriptedTerminal;
    use std::io::Write;

    fn unconditional(prompt: &str, key: &str) -> PrefSpec {
        PrefSpec::new(prompt, "app", key)
    }

    fn gated(prompt: &str, key: &str, req_key: &str, req_value: &str) -> PrefSpec {
        let mut spec = PrefSpec::new(prompt, "app", key);
        spec.requirements = vec![Requirement {
            key: req_key.to_string(),
            value: req_value.to_string(),
        }];
        spec
    }

    #[test]
    fn test_from_file_loads_prompts_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[[prompts]]
prompt = "First?"
config_section = "app"
config_key = "first"

[[prompts]]
prompt = "Second?"
config_section = "app"
config_key = "second"
"#
        )
        .unwrap();

        let set = PrefSet::from_file(&path).unwrap();
        assert_eq!(set.prefs().len(), 2);
        assert_eq!(set.prefs()[0].prompt_text, "First?");
        assert_eq!(set.prefs()[1].prompt_text, "Second?");
        assert_eq!(set.source_path(), Some(path.as_path()));
    }

    #[test]
    fn test_from_file_missing_path_is_configuration_error() {
        let result = PrefSet::from_file("/definitely/not/here.toml");
        match result {
            Err(Error::Configuration(msg)) => assert!(msg.contains("Invalid prompts file")),
            other => panic!("expected configuration error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_from_file_malformed_document_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.toml");
        std::fs::write(&path, "prompts = \"not an array\"\n").unwrap();

        let result = PrefSet::from_file(&path);
        assert!(matches!(result, Err(Error::TomlParse(_))));
    }

    #[test]
    fn test_phase_one_delivers_in_declared_order() {
        let registry = AssetRegistry::new();
        let resolver = AssetResolver::new(&registry);
        let mut term = ScriptedTerminal::new(["a", "b", "c"]);

        let mut set = PrefSet::from_specs(vec![
            unconditional("One?", "one"),
            unconditional("Two?", "two"),
            unconditional("Three?", "three"),
        ]);
        set.ask(&resolver, &mut term).unwrap();

        assert_eq!(term.prompts, ["One?", "Two?", "Three?"]);
        let answers: Vec<_> = set.answered().map(|p| p.answer.clone().unwrap()).collect();
        assert_eq!(answers, ["a", "b", "c"]);
    }

    #[test]
    fn test_gated_prefs_wait_for_phase_two() {
        let registry = AssetRegistry::new();
        let resolver = AssetResolver::new(&registry);
        let mut term = ScriptedTerminal::new(["advanced", "blue", "deep"]);

        // Declared first but gated: must still deliver after the
        // unconditional prompts.
        let mut set = PrefSet::from_specs(vec![
            gated("Depth?", "depth", "mode", "advanced"),
            unconditional("Mode?", "mode"),
            unconditional("Color?", "color"),
        ]);
        set.ask(&resolver, &mut term).unwrap();

        assert_eq!(term.prompts, ["Mode?", "Color?", "Depth?"]);
        assert_eq!(set.prefs()[0].answer.as_deref(), Some("deep"));
    }

    #[test]
    fn test_unmet_requirement_skips_silently() {
        let registry = AssetRegistry::new();
        let resolver = AssetResolver::new(&registry);
        let mut term = ScriptedTerminal::new(["basic"]);

        let mut set = PrefSet::from_specs(vec![
            unconditional("Mode?", "mode"),
            gated("Depth?", "depth", "mode", "advanced"),
        ]);
        set.ask(&resolver, &mut term).unwrap();

        // Only the first prompt was shown; no error, no warning, no answer.
        assert_eq!(term.prompts, ["Mode?"]);
        assert!(term.errors.is_empty());
        assert!(term.warns.is_empty());
        assert!(set.prefs()[1].answer.is_none());
        assert_eq!(set.answered().count(), 1);
    }

    #[test]
    fn test_requirement_matches_explicit_key() {
        let registry = AssetRegistry::new();
        let resolver = AssetResolver::new(&registry);
        let mut term = ScriptedTerminal::new(["advanced", "42"]);

        // The answering pref stores under config_key "use_advanced" but
        // exposes requirement key "mode".
        let mut first = unconditional("Mode?", "use_advanced");
        first.key = Some("mode".to_string());

        let mut set = PrefSet::from_specs(vec![
            first,
            gated("Depth?", "depth", "mode", "advanced"),
        ]);
        set.ask(&resolver, &mut term).unwrap();

        assert_eq!(set.prefs()[1].answer.as_deref(), Some("42"));
    }

    #[test]
    fn test_all_requirements_must_match() {
        let registry = AssetRegistry::new();
        let resolver = AssetResolver::new(&registry);
        let mut term = ScriptedTerminal::new(["advanced", "no"]);

        let mut both = PrefSpec::new("Depth?", "app", "depth");
        both.requirements = vec![
            Requirement {
                key: "mode".to_string(),
                value: "advanced".to_string(),
            },
            Requirement {
                key: "confirm".to_string(),
                value: "yes".to_string(),
            },
        ];

        let mut set = PrefSet::from_specs(vec![
            unconditional("Mode?", "mode"),
            unconditional("Confirm?", "confirm"),
            both,
        ]);
        set.ask(&resolver, &mut term).unwrap();

        // One of the two requirements missed; the gated pref never ran.
        assert_eq!(term.prompts.len(), 2);
        assert!(set.prefs()[2].answer.is_none());
    }

    #[test]
    fn test_phase_two_can_chain_on_earlier_phase_two_answers() {
        let registry = AssetRegistry::new();
        let resolver = AssetResolver::new(&registry);
        let mut term = ScriptedTerminal::new(["advanced", "deep", "ocean"]);

        // Third pref depends on the second, which is itself gated: the
        // chain resolves because phase 2 runs in declared order.
        let mut set = PrefSet::from_specs(vec![
            unconditional("Mode?", "mode"),
            gated("Depth?", "depth", "mode", "advanced"),
            gated("Where?", "where", "depth", "deep"),
        ]);
        set.ask(&resolver, &mut term).unwrap();

        assert_eq!(term.prompts, ["Mode?", "Depth?", "Where?"]);
        assert_eq!(set.prefs()[2].answer.as_deref(), Some("ocean"));
    }

    #[test]
    fn test_requirement_value_is_the_transformed_answer() {
        let registry = AssetRegistry::new();
        let resolver = AssetResolver::new(&registry);
        let mut term = ScriptedTerminal::new(["advanced", "yes"]);

        // The behavior uppercases the stored answer, so a requirement on the
        // raw response no longer matches; one on the transformed value does.
        let mut first = unconditional("Mode?", "mode");
        first.behaviors = vec![AssetSpec::named("uppercase")];

        let mut set = PrefSet::from_specs(vec![
            first,
            gated("Raw?", "raw", "mode", "advanced"),
            gated("Transformed?", "transformed", "mode", "ADVANCED"),
        ]);
        set.ask(&resolver, &mut term).unwrap();

        assert!(set.prefs()[1].answer.is_none());
        assert_eq!(set.prefs()[2].answer.as_deref(), Some("yes"));
    }
}
