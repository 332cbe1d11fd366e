//! `module:callable` references.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid entry point '{0}': expected `module` or `module:callable` made of Python identifiers")]
pub struct EntryPointError(pub String);

/// What the archive runs on start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    module: String,
    attr: Option<String>,
}

impl EntryPoint {
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Attribute path inside the module; `None` runs the module as `__main__`.
    pub fn attr(&self) -> Option<&str> {
        self.attr.as_deref()
    }
}

fn is_dotted_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c == '_' || c.is_alphabetic())
                && chars.all(|c| c == '_' || c.is_alphanumeric())
        })
}

impl FromStr for EntryPoint {
    type Err = EntryPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (module, attr) = match trimmed.split_once(':') {
            Some((m, a)) => (m.trim(), Some(a.trim())),
            None => (trimmed, None),
        };

        if !is_dotted_identifier(module) || attr.is_some_and(|a| !is_dotted_identifier(a)) {
            return Err(EntryPointError(s.to_string()));
        }

        Ok(Self {
            module: module.to_string(),
            attr: attr.map(str::to_string),
        })
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attr {
            Some(attr) => write!(f, "{}:{}", self.module, attr),
            None => f.write_str(&self.module),
        }
    }
}
