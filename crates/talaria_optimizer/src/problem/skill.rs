use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Skill(String);

impl Skill {
    pub fn new(skill: impl Into<String>) -> Self {
        Skill(skill.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
