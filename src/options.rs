//! Session init options
//!
//! The option set handed to a tracking client when a session is created.
//! Known keys live in [`keys`]; anything else arrives as a pass-through
//! extra and is stored verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Known init option keys.
pub mod keys {
    /// Session display name
    pub const NAME: &str = "name";
    /// Grouping namespace for the session
    pub const PROJECT: &str = "project";
    /// Session resume identifier
    pub const ID: &str = "id";
    /// Local directory for session artifacts
    pub const DIR: &str = "dir";
    /// Resume policy
    pub const RESUME: &str = "resume";
    /// Anonymous-access mode
    pub const ANONYMOUS: &str = "anonymous";
}

/// Resume value the logger always requests.
pub const RESUME_ALLOW: &str = "allow";

/// Anonymous-access value for `anonymous = true`.
pub const ANONYMOUS_ALLOW: &str = "allow";

/// Map the tri-state `anonymous` flag onto the option value.
///
/// `Some(true)` becomes `"allow"`, `Some(false)` and `None` become null.
#[must_use]
pub fn anonymous_mode(anonymous: Option<bool>) -> Value {
    match anonymous {
        Some(true) => Value::from(ANONYMOUS_ALLOW),
        Some(false) | None => Value::Null,
    }
}

/// How a client treats an `id` that may already name a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumePolicy {
    /// Continue the run if it exists, otherwise start it.
    Allow,
    /// The run must already exist.
    Must,
    /// The run must not exist yet.
    Never,
}

impl ResumePolicy {
    /// Parse a `resume` option value.
    ///
    /// `"auto"` and `true` are treated as [`ResumePolicy::Allow`]; null,
    /// `false` and unrecognized values yield `None`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(true) => Some(Self::Allow),
            Value::String(s) => match s.as_str() {
                "allow" | "auto" => Some(Self::Allow),
                "must" => Some(Self::Must),
                "never" => Some(Self::Never),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Option mapping passed to session creation.
///
/// Values are JSON so that extras of any shape pass through untouched.
/// A key mapped to `null` is present but unset, the same as an absent key
/// for the typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InitOptions(Map<String, Value>);

impl InitOptions {
    /// Create an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Union `extras` into the option set. Extras win on key collision.
    pub fn merge(&mut self, extras: Map<String, Value>) {
        self.0.extend(extras);
    }

    /// Raw value for `key`, including explicit nulls.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value for `key`; `None` when absent, null, or not a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Whether `key` is present (possibly null).
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Session display name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get_str(keys::NAME)
    }

    /// Project namespace.
    #[must_use]
    pub fn project(&self) -> Option<&str> {
        self.get_str(keys::PROJECT)
    }

    /// Session resume identifier.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get_str(keys::ID)
    }

    /// Local artifact directory.
    #[must_use]
    pub fn dir(&self) -> Option<&str> {
        self.get_str(keys::DIR)
    }

    /// Resume option as given.
    #[must_use]
    pub fn resume(&self) -> Option<&str> {
        self.get_str(keys::RESUME)
    }

    /// Anonymous-access mode as given.
    #[must_use]
    pub fn anonymous(&self) -> Option<&str> {
        self.get_str(keys::ANONYMOUS)
    }

    /// Parsed resume policy, if the `resume` value is recognized.
    #[must_use]
    pub fn resume_policy(&self) -> Option<ResumePolicy> {
        self.get(keys::RESUME).and_then(ResumePolicy::from_value)
    }

    /// Number of keys, nulls included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no keys are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all keys and values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrow the underlying JSON map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for InitOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
