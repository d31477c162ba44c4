//! Grouping skills into the fixed taxonomy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::taxonomy::SkillCategory;
use crate::types::SkillName;

/// Number of skills surfaced as "top skills" in an overview.
pub const TOP_SKILLS: usize = 5;

/// Skills grouped by category.
///
/// Iterates in taxonomy order; within a category, skills keep their input
/// order. Categories that received nothing are not present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorizedSkills {
    groups: BTreeMap<SkillCategory, Vec<SkillName>>,
}

impl CategorizedSkills {
    /// Skills placed in `category`, if any.
    pub fn get(&self, category: SkillCategory) -> Option<&[SkillName]> {
        self.groups.get(&category).map(Vec::as_slice)
    }

    /// Iterate non-empty categories in taxonomy order.
    pub fn iter(&self) -> impl Iterator<Item = (SkillCategory, &[SkillName])> {
        self.groups.iter().map(|(c, skills)| (*c, skills.as_slice()))
    }

    pub fn categories(&self) -> impl Iterator<Item = SkillCategory> + '_ {
        self.groups.keys().copied()
    }

    /// Number of non-empty categories.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of skills across every category.
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn into_inner(self) -> BTreeMap<SkillCategory, Vec<SkillName>> {
        self.groups
    }
}

/// Pick the category for a single skill: first keyword match wins,
/// [`SkillCategory::Other`] if nothing matches.
pub fn classify(skill: &str) -> SkillCategory {
    let lower = skill.to_lowercase();
    SkillCategory::ALL
        .into_iter()
        .find(|c| c.matches(&lower))
        .unwrap_or(SkillCategory::Other)
}

/// Group `skills` by category. Every input skill appears exactly once in
/// the output.
pub fn categorize(skills: &[SkillName]) -> CategorizedSkills {
    let mut groups: BTreeMap<SkillCategory, Vec<SkillName>> = BTreeMap::new();
    for skill in skills {
        groups.entry(classify(skill)).or_default().push(skill.clone());
    }
    CategorizedSkills { groups }
}

/// A skill paired with the category it was placed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: SkillName,
    pub category: SkillCategory,
}

/// Pair every skill with its category, keeping input order.
pub fn annotate(skills: &[SkillName]) -> Vec<SkillEntry> {
    skills
        .iter()
        .map(|name| SkillEntry {
            name: name.clone(),
            category: classify(name),
        })
        .collect()
}

/// Summary of a profile's skills for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillsOverview {
    /// Number of skills.
    pub total: usize,
    /// Number of non-empty categories.
    pub category_count: usize,
    /// The first [`TOP_SKILLS`] skills, in stored order.
    pub top: Vec<SkillName>,
    pub categories: CategorizedSkills,
}

impl SkillsOverview {
    pub fn from_skills(skills: &[SkillName]) -> Self {
        let categories = categorize(skills);
        Self {
            total: skills.len(),
            category_count: categories.len(),
            top: skills.iter().take(TOP_SKILLS).cloned().collect(),
            categories,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
