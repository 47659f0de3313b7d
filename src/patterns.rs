//! Deletion set loading and matching from artifacts.toml.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::ffi::OsStr;

/// Structure to deserialize artifact names from TOML
#[derive(Debug, Deserialize)]
struct ArtifactConfig {
    #[serde(flatten)]
    build_systems: HashMap<String, BuildSystemConfig>,
}

#[derive(Debug, Deserialize)]
struct BuildSystemConfig {
    /// Display name, e.g. "Unreal Engine"
    name: String,
    /// Category tables (build, intermediate, ...). The category label is informational only.
    #[serde(flatten)]
    categories: HashMap<String, PatternConfig>,
}

#[derive(Debug, Deserialize)]
struct PatternConfig {
    patterns: Vec<String>,
}

// Embed the TOML file directly in the binary at compile time
const ARTIFACTS_TOML: &str = include_str!("../artifacts.toml");

/// Immutable set of directory names that are removed wherever they are found.
///
/// Matching is exact and case-sensitive against a directory's own base name.
/// There is no globbing and no path-relative matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionSet {
    names: BTreeSet<String>,
    build_systems: BTreeSet<String>,
}

impl DeletionSet {
    /// Build a deletion set from plain directory names.
    ///
    /// Rejects an empty set, and any name that is empty, `.`/`..`, or
    /// contains a path separator or wildcard character.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let name = name.into();
            validate_name(&name)?;
            set.insert(name);
        }

        if set.is_empty() {
            bail!("Deletion set must contain at least one directory name");
        }

        Ok(Self {
            names: set,
            build_systems: BTreeSet::new(),
        })
    }

    /// The Unreal Engine build-artifact folders declared in the embedded artifacts.toml.
    pub fn unreal() -> Result<Self> {
        Self::from_toml(ARTIFACTS_TOML).context("Failed to load embedded artifacts.toml")
    }

    /// Parse a deletion set from artifacts.toml-formatted content
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ArtifactConfig =
            toml::from_str(content).context("Failed to parse artifacts TOML")?;

        let mut build_systems = BTreeSet::new();
        let mut names = Vec::new();
        for system in config.build_systems.into_values() {
            build_systems.insert(system.name);
            for category in system.categories.into_values() {
                names.extend(category.patterns);
            }
        }

        let mut set = Self::new(names)?;
        set.build_systems = build_systems;
        Ok(set)
    }

    /// Check whether a directory base name is a member of the set.
    /// Names that are not valid UTF-8 never match.
    pub fn contains(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.names.contains(n))
    }

    /// Display names of the build systems the set was loaded for.
    /// Empty for sets built from plain names.
    pub fn build_systems(&self) -> impl Iterator<Item = &str> {
        self.build_systems.iter().map(String::as_str)
    }

    /// Names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Deletion set entry must not be empty");
    }
    if name == "." || name == ".." {
        bail!("Deletion set entry '{}' is not a directory name", name);
    }
    if name.contains(['/', '\\']) {
        bail!(
            "Deletion set entry '{}' must be a plain name without path separators",
            name
        );
    }
    if name.contains(['*', '?']) {
        bail!("Deletion set entry '{}' must not contain wildcards", name);
    }
    Ok(())
}
