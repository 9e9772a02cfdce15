use std::collections::HashMap;

use indexmap::IndexMap;

use crate::value::{Payload, Value, ValueKind};

/// Registration-time failure. These indicate a programming error in the CLI
/// definition; callers typically abort startup on them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The name or alias is already taken (as either a name or an alias)
    /// within its namespace.
    #[error("duplicate {namespace} definition: `{word}` is already registered")]
    DuplicateDefinition {
        namespace: &'static str,
        word: String,
    },

    /// Structurally invalid entry (empty name, alias, or description).
    #[error("invalid definition: {reason}")]
    InvalidDefinition { reason: String },
}

/// One identifier namespace (commands or flags): canonical names mapped to
/// values, plus a bijective alias table kept in lockstep.
///
/// Insertion order is preserved so help output lists entries the way they
/// were registered.
#[derive(Debug, Clone)]
pub(crate) struct Namespace {
    label: &'static str,
    values: IndexMap<String, Value>,
    alias_by_name: HashMap<String, String>,
    name_by_alias: HashMap<String, String>,
}

impl Namespace {
    fn new(label: &'static str) -> Self {
        Namespace {
            label,
            values: IndexMap::new(),
            alias_by_name: HashMap::new(),
            name_by_alias: HashMap::new(),
        }
    }

    /// Registers `name`/`alias` with `value`. All checks run before any
    /// mutation, so a failed insert leaves the namespace unchanged.
    pub(crate) fn insert(
        &mut self,
        name: &str,
        alias: &str,
        value: Value,
    ) -> Result<(), SchemaError> {
        if name.is_empty() || alias.is_empty() {
            return Err(SchemaError::InvalidDefinition {
                reason: format!("{} name and alias must not be empty", self.label),
            });
        }
        if self.is_taken(name) {
            return Err(SchemaError::DuplicateDefinition {
                namespace: self.label,
                word: name.to_string(),
            });
        }
        if self.is_taken(alias) {
            return Err(SchemaError::DuplicateDefinition {
                namespace: self.label,
                word: alias.to_string(),
            });
        }

        self.alias_by_name.insert(name.to_string(), alias.to_string());
        self.name_by_alias.insert(alias.to_string(), name.to_string());
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    fn is_taken(&self, word: &str) -> bool {
        self.values.contains_key(word) || self.name_by_alias.contains_key(word)
    }

    /// Canonical-name match only (the long-flag form never matches aliases).
    pub(crate) fn lookup_name(&self, name: &str) -> Option<(String, ValueKind)> {
        let value = self.values.get(name)?;
        Some((name.to_string(), value.kind()))
    }

    /// Alias match only (the short-flag form).
    pub(crate) fn lookup_alias(&self, alias: &str) -> Option<(String, ValueKind)> {
        let name = self.name_by_alias.get(alias)?;
        let value = self.values.get(name)?;
        Some((name.clone(), value.kind()))
    }

    /// Canonical name or alias (bare command tokens accept either).
    pub(crate) fn lookup(&self, token: &str) -> Option<(String, ValueKind)> {
        self.lookup_name(token).or_else(|| self.lookup_alias(token))
    }

    /// Value lookup by canonical name or alias.
    pub(crate) fn get(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.values.get(key) {
            return Some(value);
        }
        let name = self.name_by_alias.get(key)?;
        self.values.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }

    pub(crate) fn alias_of(&self, name: &str) -> Option<&str> {
        self.alias_by_name.get(name).map(String::as_str)
    }

    pub(crate) fn resolve(&self, key: &str) -> Option<&str> {
        if let Some((name, _)) = self.values.get_key_value(key) {
            return Some(name.as_str());
        }
        self.name_by_alias.get(key).map(String::as_str)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The registry of commands and flags an application accepts.
///
/// Commands and flags live in disjoint namespaces: a command name may equal a
/// flag name without conflict. Within a namespace, names and aliases are
/// unique and checked at registration time.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    description: String,
    pub(crate) commands: Namespace,
    pub(crate) flags: Namespace,
}

impl Schema {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Schema {
            name: name.into(),
            description: description.into(),
            commands: Namespace::new("command"),
            flags: Namespace::new("flag"),
        }
    }

    /// Application name shown in help output.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Registers a command matched as a bare token (by name or alias). The
    /// default's type fixes the command's kind: a bool command is a pure
    /// switch, any other kind consumes one following argument token.
    ///
    /// Registration is atomic: on error the registry is unchanged.
    pub fn register_command(
        &mut self,
        name: &str,
        alias: &str,
        description: &str,
        default: impl Into<Payload>,
    ) -> Result<(), SchemaError> {
        let value = Value::new(default, description)?;
        self.commands.insert(name, alias, value)?;
        tracing::debug!(name, alias, "registered command");
        Ok(())
    }

    /// Registers a flag matched as `--name` or `-alias`. Same kind and
    /// atomicity rules as [`Schema::register_command`].
    pub fn register_flag(
        &mut self,
        name: &str,
        alias: &str,
        description: &str,
        default: impl Into<Payload>,
    ) -> Result<(), SchemaError> {
        let value = Value::new(default, description)?;
        self.flags.insert(name, alias, value)?;
        tracing::debug!(name, alias, "registered flag");
        Ok(())
    }

    /// Whether `token` names a registered flag (long or short form) or a
    /// registered command. Used by the parser to refuse flag/command tokens
    /// where a value is required.
    pub(crate) fn is_known_token(&self, token: &str) -> bool {
        if let Some(rest) = token.strip_prefix("--") {
            return self.flags.lookup_name(rest).is_some();
        }
        if let Some(rest) = token.strip_prefix('-') {
            return self.flags.lookup_alias(rest).is_some();
        }
        self.commands.lookup(token).is_some()
    }
}
