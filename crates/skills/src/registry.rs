//! Skill catalog and registry.
//!
//! The catalog maps skill names to factories the host registers at startup.
//! The registry resolves configured names through the catalog and keeps the
//! flat, ordered list of repliers the selector calls on every turn.

use std::collections::HashMap;
use std::sync::Arc;

use parley_core::error::SkillError;
use parley_core::reply::Reply;
use parley_core::skill::{Replier, SkillOptions};
use tracing::{info, warn};

/// Builds every replier a skill provides from its options.
pub type SkillFactory =
    dyn Fn(&SkillOptions) -> Result<Vec<Replier>, SkillError> + Send + Sync;

/// Legacy suffix accepted on skill names (`pattern_bots` is `pattern`).
const LEGACY_SUFFIX: &str = "_bots";

/// Strip whitespace and the legacy suffix from a skill name.
pub fn canonical_name(name: &str) -> &str {
    let name = name.trim();
    name.strip_suffix(LEGACY_SUFFIX).unwrap_or(name)
}

/// Name → factory map for every skill the host knows how to build.
#[derive(Clone, Default)]
pub struct SkillCatalog {
    factories: HashMap<String, Arc<SkillFactory>>,
}

impl SkillCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory. Replaces any existing factory with the same name.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&SkillOptions) -> Result<Vec<Replier>, SkillError> + Send + Sync + 'static,
    {
        self.factories
            .insert(canonical_name(name).to_string(), Arc::new(factory));
    }

    /// Register a bare reply function as a single-replier skill.
    pub fn register_fn<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&str) -> Result<Reply, SkillError> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let replier_name = canonical_name(name).to_string();
        self.register(name, move |_options| {
            let f = Arc::clone(&f);
            Ok(vec![Replier::function(replier_name.clone(), move |s: &str| (*f)(s))])
        });
    }

    /// Look up a factory by name (legacy suffix accepted).
    pub fn resolve(&self, name: &str) -> Option<Arc<SkillFactory>> {
        self.factories.get(canonical_name(name)).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(canonical_name(name))
    }

    /// All registered skill names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// The live set of loaded repliers, in load order.
pub struct SkillRegistry {
    catalog: SkillCatalog,
    names: Vec<String>,
    repliers: Vec<Replier>,
}

impl SkillRegistry {
    /// Create an empty registry backed by a catalog.
    pub fn new(catalog: SkillCatalog) -> Self {
        Self {
            catalog,
            names: Vec::new(),
            repliers: Vec::new(),
        }
    }

    /// Build a registry and load every named bot, stopping at the first failure.
    pub fn from_bots<F>(catalog: SkillCatalog, bots: &[String], options: F) -> Result<Self, SkillError>
    where
        F: Fn(&str) -> SkillOptions,
    {
        let mut registry = Self::new(catalog);
        for bot in bots {
            registry.load_skill(bot, &options(canonical_name(bot)))?;
        }
        info!(repliers = ?registry.repliers, "Loaded skills");
        Ok(registry)
    }

    /// Resolve a skill by name, build it, and append its repliers.
    ///
    /// Either every replier the factory returns is added, or none is.
    pub fn load_skill(&mut self, name: &str, options: &SkillOptions) -> Result<Vec<Replier>, SkillError> {
        let name = canonical_name(name);
        info!(skill = %name, "Adding skill");

        let factory = self
            .catalog
            .resolve(name)
            .ok_or_else(|| SkillError::NotFound(name.to_string()))?;

        let new_repliers = factory(options)?;
        if new_repliers.is_empty() {
            warn!(skill = %name, "Skill provided no repliers");
        }

        self.names.push(name.to_string());
        self.repliers.extend(new_repliers.iter().cloned());
        Ok(new_repliers)
    }

    /// Every active replier, in load order.
    pub fn repliers(&self) -> &[Replier] {
        &self.repliers
    }

    /// Names of loaded skills, in load order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.repliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repliers.is_empty()
    }
}
