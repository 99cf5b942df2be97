//! A single preference and its delivery state machine.
//!
//! Delivery walks `Pending -> (pre hook) -> prompt loop -> behaviors ->
//! (post hook) -> Answered`. There is no failed state: an invalid response
//! shows the retained failure message and re-prompts, without limit. The only
//! way out of the loop is a valid answer.

use crate::assets::{AssetResolver, Behavior, ValidatorRule};
use crate::prefs::schema::{AssetSpec, HookSpec, PrefSpec, Requirement};
use crate::terminal::Terminal;
use crate::Result;

/// Assets materialized for one preference, created on first delivery and
/// reused across its retry loop. Never shared between preferences.
struct ResolvedAssets {
    behaviors: Vec<Box<dyn Behavior>>,
    validators: Vec<Box<dyn ValidatorRule>>,
}

/// One question: its options/default, validators, behaviors, hooks, and the
/// requirements gating second-phase delivery. The `answer` field is written
/// exactly once, when delivery succeeds.
pub struct Pref {
    /// Question shown to the user.
    pub prompt_text: String,
    /// Default answer, resolved on an empty response.
    pub default: Option<String>,
    /// When present, the raw answer must be a member.
    pub options: Option<Vec<String>>,
    /// Destination section in the configuration document.
    pub config_section: String,
    /// Destination key in the configuration document.
    pub config_key: String,
    /// Conditions that must match already-answered preferences.
    pub requirements: Vec<Requirement>,
    /// The collected answer, set once delivery succeeds.
    pub answer: Option<String>,
    /// Failure message from the most recent validation, shown on re-prompt.
    pub last_error_message: Option<String>,

    key: Option<String>,
    behaviors: Vec<AssetSpec>,
    validators: Vec<AssetSpec>,
    pre: Option<HookSpec>,
    post: Option<HookSpec>,
    resolved: Option<ResolvedAssets>,
}

impl Pref {
    /// Build a preference from a (normalized) spec.
    pub fn from_spec(spec: PrefSpec) -> Self {
        Self {
            prompt_text: spec.prompt,
            default: spec.default,
            options: spec.options,
            config_section: spec.config_section,
            config_key: spec.config_key,
            requirements: spec.requirements,
            answer: None,
            last_error_message: None,
            key: spec.key,
            behaviors: spec.behaviors,
            validators: spec.validators,
            pre: spec.pre,
            post: spec.post,
            resolved: None,
        }
    }

    /// The identifying key requirement matching compares against: the
    /// explicit `key` when declared, `config_key` otherwise.
    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.config_key)
    }

    /// Whether this preference is gated to the second delivery phase.
    pub fn has_requirements(&self) -> bool {
        !self.requirements.is_empty()
    }

    /// Deliver the prompt: run the pre hook once, loop until a response
    /// validates, pipe it through the behaviors, store the answer, run the
    /// post hook. Only terminal I/O failures propagate.
    pub fn deliver(
        &mut self,
        resolver: &AssetResolver<'_>,
        terminal: &mut dyn Terminal,
    ) -> Result<()> {
        self.materialize(resolver, terminal);

        // The pre hook is evaluated once per delivery, not once per retry.
        if let Some(hook) = &self.pre {
            run_hook(hook, resolver, terminal)?;
        }

        loop {
            let response = terminal.prompt(&self.prompt_text, self.default.as_deref())?;
            if self.validate(&response) {
                self.answer = Some(self.evaluate_behaviors(&response));
                break;
            }
            if let Some(message) = &self.last_error_message {
                terminal.error(message);
            }
        }

        if let Some(hook) = &self.post {
            run_hook(hook, resolver, terminal)?;
        }
        Ok(())
    }

    /// Resolve the declared validators and behaviors into live objects.
    /// Idempotent; called automatically on first delivery. Unresolvable
    /// references have already been warned about and are simply absent.
    pub fn materialize(&mut self, resolver: &AssetResolver<'_>, terminal: &mut dyn Terminal) {
        if self.resolved.is_some() {
            return;
        }

        let mut behaviors = Vec::new();
        for spec in &self.behaviors {
            if let Some(mut behavior) = resolver.resolve_behavior(&spec.name, terminal) {
                behavior.set_parameters(&spec.parameters);
                behaviors.push(behavior);
            }
        }

        let mut validators = Vec::new();
        for spec in &self.validators {
            if let Some(validator) = resolver.resolve_validator(&spec.name, terminal) {
                validators.push(validator);
            }
        }

        self.resolved = Some(ResolvedAssets {
            behaviors,
            validators,
        });
    }

    /// Validate a response against the options and the materialized
    /// validators, recording the failure message to show on re-prompt.
    ///
    /// When the option check fails the validators are not consulted. Within
    /// the validator list every rule runs even after one fails; the retained
    /// message is the last failure's, so the user sees the message of the
    /// final rule that rejected the response.
    pub fn validate(&mut self, text: &str) -> bool {
        if let Some(message) = self.check_options(text) {
            self.last_error_message = Some(message);
            return false;
        }

        let mut valid = true;
        if let Some(assets) = &self.resolved {
            for validator in &assets.validators {
                let verdict = validator.validate(text);
                if !verdict.is_valid {
                    self.last_error_message = Some(verdict.message);
                    valid = false;
                }
            }
        }
        valid
    }

    /// Pipe text through the materialized behaviors, each stage receiving
    /// the previous stage's output.
    pub fn evaluate_behaviors(&self, text: &str) -> String {
        let mut current = text.to_string();
        if let Some(assets) = &self.resolved {
            for behavior in &assets.behaviors {
                current = behavior.evaluate(&current);
            }
        }
        current
    }

    fn check_options(&self, text: &str) -> Option<String> {
        let options = self.options.as_ref()?;
        if options.iter().any(|o| o == text) {
            None
        } else {
            Some(format!(
                "Invalid option chosen (\"{}\"); valid options are: {:?}",
                text, options
            ))
        }
    }
}

/// Fire a pre/post hook: show the message, wait for acknowledgement, and run
/// the named Action when one is declared. A hook never aborts delivery; an
/// unresolvable or failing Action degrades to a warning.
fn run_hook(
    hook: &HookSpec,
    resolver: &AssetResolver<'_>,
    terminal: &mut dyn Terminal,
) -> Result<()> {
    terminal.info(&hook.message);
    terminal.prompt("Press enter to continue", None)?;

    if let Some(spec) = &hook.action {
        if let Some(mut action) = resolver.resolve_action(&spec.name, terminal) {
            action.set_parameters(&spec.parameters);
            if let Err(e) = action.run(terminal) {
                terminal.warn(&format!("Action '{}' failed: {}", spec.name, e));
            }
        }
    }
    Ok(())
}
