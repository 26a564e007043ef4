//! Skill catalog, registry, and built-in skills for Parley.
//!
//! Skills propose candidate replies; the registry holds the ones named in
//! configuration. Hosts can add their own skills to the catalog before
//! building the registry.

pub mod echo;
pub mod pattern;
pub mod registry;

pub use echo::EchoBot;
pub use pattern::PatternBot;
pub use registry::{SkillCatalog, SkillFactory, SkillRegistry, canonical_name};

/// Create a catalog with all built-in skills.
///
/// - `pattern`: regex small-talk rules, scored
/// - `echo`: repeats the statement, unscored
pub fn default_catalog() -> SkillCatalog {
    let mut catalog = SkillCatalog::new();
    catalog.register("pattern", pattern::factory);
    catalog.register("echo", echo::factory);
    catalog
}
