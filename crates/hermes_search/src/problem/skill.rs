use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Skill(String);

impl Skill {
    pub fn new(skill: impl Into<String>) -> Self {
        Skill(skill.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether `provided` covers every skill in `required`.
pub fn has_all_skills(provided: &[Skill], required: &[Skill]) -> bool {
    required.iter().all(|skill| provided.contains(skill))
}
