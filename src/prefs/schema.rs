//! Schema for the prompts document.
//!
//! A prompts document is a TOML file with a `prompts` array:
//!
//! ```toml
//! [[prompts]]
//! prompt = "What is your name?"
//! config_section = "personal"
//! config_key = "name"
//! validators = ["non_nil"]
//! behaviors = [{ name = "titlecase" }]
//!
//! [[prompts]]
//! prompt = "Enable advanced mode?"
//! options = ["yes", "no"]
//! default = "no"
//! config_section = "app"
//! config_key = "advanced"
//! key = "mode"
//!
//! [[prompts]]
//! prompt = "Advanced cache size?"
//! config_section = "app"
//! config_key = "cache_size"
//! validators = ["numeric"]
//! requirements = [{ key = "mode", value = "yes" }]
//! ```
//!
//! Section/key names are case-insensitive; they are lowercased once here, at
//! the load boundary.

use crate::assets::ParamMap;
use serde::{Deserialize, Serialize};

/// Top-level prompts document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptsFile {
    pub prompts: Vec<PrefSpec>,
}

/// Declarative description of one question: its options/default, ordered
/// validators and behaviors, optional pre/post hooks, and the requirement
/// conditions gating second-phase delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefSpec {
    /// Question shown to the user.
    pub prompt: String,

    /// Default answer, resolved when the user submits an empty line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// When present, the raw answer must be exactly one of these.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    /// Destination section in the configuration document.
    pub config_section: String,

    /// Destination key in the configuration document.
    pub config_key: String,

    /// Identifying key used by requirement matching. Falls back to
    /// `config_key` when unspecified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Transforms applied to the validated answer, in listed order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub behaviors: Vec<AssetSpec>,

    /// Rules the raw answer must pass, applied in listed order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<AssetSpec>,

    /// Hook run once before the prompt loop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<HookSpec>,

    /// Hook run after the answer is finalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<HookSpec>,

    /// Conditions gating delivery to the second phase. Empty means
    /// unconditional (first phase).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<Requirement>,
}

impl PrefSpec {
    /// Minimal spec for an unconditional free-text prompt.
    pub fn new(
        prompt: impl Into<String>,
        config_section: impl Into<String>,
        config_key: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            default: None,
            options: None,
            config_section: config_section.into(),
            config_key: config_key.into(),
            key: None,
            behaviors: Vec::new(),
            validators: Vec::new(),
            pre: None,
            post: None,
            requirements: Vec::new(),
        }
    }

    /// Lowercase the symbolic keys. Applied once when a spec enters a
    /// `PrefSet`; requirement values are answers and stay untouched.
    pub(crate) fn normalize(&mut self) {
        self.config_section = self.config_section.to_lowercase();
        self.config_key = self.config_key.to_lowercase();
        if let Some(key) = &self.key {
            self.key = Some(key.to_lowercase());
        }
        for req in &mut self.requirements {
            req.key = req.key.to_lowercase();
        }
    }
}

/// Reference to a pluggable asset: a name or filesystem path, plus optional
/// parameters attached after construction.
///
/// In TOML a bare string is shorthand for a reference with no parameters:
/// `validators = ["non_nil"]` and
/// `validators = [{ name = "non_nil" }]` are equivalent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "AssetSpecInput")]
pub struct AssetSpec {
    pub name: String,
    #[serde(skip_serializing_if = "ParamMap::is_empty")]
    pub parameters: ParamMap,
}

impl AssetSpec {
    /// Reference by name with no parameters.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: ParamMap::new(),
        }
    }

    /// Attach a parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AssetSpecInput {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        parameters: ParamMap,
    },
}

impl From<AssetSpecInput> for AssetSpec {
    fn from(input: AssetSpecInput) -> Self {
        match input {
            AssetSpecInput::Name(name) => AssetSpec::named(name),
            AssetSpecInput::Full { name, parameters } => AssetSpec { name, parameters },
        }
    }
}

/// A pre/post hook: a message shown at informational level, plus an optional
/// Action run after the user acknowledges it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookSpec {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<AssetSpec>,
}

/// One delivery condition: a previously-collected answer's identifying key
/// and the value it must equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub key: String,
    pub value: String,
}
