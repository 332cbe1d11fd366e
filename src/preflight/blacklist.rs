//! Installer arguments that conflict with how the build drives the installer.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use anyhow::{bail, Result};

/// One disallowed argument and all of its spellings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentRule {
    pub aliases: BTreeSet<String>,
    pub reason: String,
}

/// Rule table keyed by canonical identifier, with a flat alias index.
#[derive(Debug, Clone)]
pub struct Blacklist {
    rules: BTreeMap<String, ArgumentRule>,
    index: HashMap<String, String>,
}

impl Blacklist {
    /// Build a blacklist from `(id, aliases, reason)` triples.
    ///
    /// Fails if an id repeats or an alias belongs to more than one rule.
    pub fn new<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a [&'a str], &'a str)>,
    {
        let mut rules = BTreeMap::new();
        let mut index = HashMap::new();

        for (id, aliases, reason) in entries {
            if rules.contains_key(id) {
                bail!("duplicate blacklist rule '{}'", id);
            }
            for alias in aliases {
                if let Some(owner) = index.insert(alias.to_string(), id.to_string()) {
                    bail!(
                        "argument '{}' appears in both '{}' and '{}' rules",
                        alias,
                        owner,
                        id
                    );
                }
            }
            rules.insert(
                id.to_string(),
                ArgumentRule {
                    aliases: aliases.iter().map(|a| a.to_string()).collect(),
                    reason: reason.to_string(),
                },
            );
        }

        Ok(Self { rules, index })
    }

    /// Arguments pip must not receive from the user.
    pub fn pip() -> Self {
        let entries: [(&str, &[&str], &str); 4] = [
            (
                "target",
                &["-t", "--target"],
                "the build supplies its own install target, so overriding it is not allowed",
            ),
            (
                "editable",
                &["--editable"],
                "editable installs are only linked, not installed, so they cannot be archived",
            ),
            (
                "download",
                &["-d", "--download"],
                "the build needs a real install, not merely a download",
            ),
            (
                "location",
                &["--user", "--root", "--prefix"],
                "this conflicts with the build's internal use of --target",
            ),
        ];
        match Self::new(entries) {
            Ok(list) => list,
            // Static table, aliases are disjoint.
            Err(e) => unreachable!("built-in pip blacklist is invalid: {e}"),
        }
    }

    /// Find the rule matching `token`.
    ///
    /// `--flag=value` matches on `--flag`.
    pub fn lookup(&self, token: &str) -> Option<(&str, &ArgumentRule)> {
        let id = self.index.get(token).or_else(|| {
            token
                .strip_prefix("--")
                .and_then(|rest| rest.split_once('='))
                .and_then(|(flag, _)| self.index.get(&format!("--{}", flag)))
        })?;
        self.rules.get_key_value(id).map(|(k, v)| (k.as_str(), v))
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, &ArgumentRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every alias across all rules.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.rules
            .values()
            .flat_map(|rule| rule.aliases.iter().map(|a| a.as_str()))
    }
}
