//! Priority-bucketed skill gap roadmap

use crate::processing::skills::PriorityTiers;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Critical,
    Important,
    Optional,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Critical, Tier::Important, Tier::Optional];

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Critical => "critical",
            Tier::Important => "important",
            Tier::Optional => "optional",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Missing skills split into three disjoint, sorted tiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGapRoadmap {
    pub critical: Vec<String>,
    pub important: Vec<String>,
    pub optional: Vec<String>,
}

impl SkillGapRoadmap {
    pub fn tier(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::Critical => &self.critical,
            Tier::Important => &self.important,
            Tier::Optional => &self.optional,
        }
    }

    /// Tiers in fixed priority order
    pub fn tiers(&self) -> impl Iterator<Item = (Tier, &[String])> + '_ {
        Tier::ALL.into_iter().map(move |t| (t, self.tier(t)))
    }

    pub fn total(&self) -> usize {
        self.critical.len() + self.important.len() + self.optional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Bucket `jd_skills - resume_skills` by priority
pub fn classify_gaps(
    jd_skills: &BTreeSet<String>,
    resume_skills: &BTreeSet<String>,
    tiers: &PriorityTiers,
) -> SkillGapRoadmap {
    let jd: BTreeSet<String> = jd_skills.iter().map(|s| s.trim().to_lowercase()).collect();
    let resume: BTreeSet<String> = resume_skills.iter().map(|s| s.trim().to_lowercase()).collect();

    let mut roadmap = SkillGapRoadmap::default();

    // BTreeSet iteration keeps every tier sorted
    for skill in jd.difference(&resume) {
        if skill.is_empty() {
            continue;
        }
        let bucket = match tiers.tier_of(skill) {
            Tier::Critical => &mut roadmap.critical,
            Tier::Important => &mut roadmap.important,
            Tier::Optional => &mut roadmap.optional,
        };
        bucket.push(skill.clone());
    }

    roadmap
}
