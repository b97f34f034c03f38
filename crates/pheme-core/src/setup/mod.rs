//! World Setup
//!
//! Scenario loading and the built-in demo world.

pub mod scenario;

use crate::error::ConfigError;

pub use scenario::{
    CharacterSpec, PersonalitySpec, RelationshipSpec, Scenario, ScheduledInteraction,
};

const DEMO_SCENARIO: &str = r#"
[[characters]]
name = "Alice"
personality = { agreeableness = 0.2, extraversion = 0.1 }
emotions = { happiness = 0.2, fear = 0.8 }

[[characters]]
name = "Jacky"
personality = { agreeableness = 0.8, extraversion = 0.5 }
emotions = { happiness = 0.8, fear = 0.1 }

[[characters]]
name = "Peter"
personality = { agreeableness = 0.6, extraversion = 0.5 }
emotions = { happiness = 0.8, fear = 0.1 }

[[relationships]]
source = "Peter"
target = "Jacky"
preset = "lovely"

[[relationships]]
source = "Jacky"
target = "Peter"
preset = "lovely"

[[relationships]]
source = "Alice"
target = "Jacky"
preset = "unfriendly"

[[relationships]]
source = "Jacky"
target = "Alice"
preset = "unfriendly"

[[interactions]]
tick = 1
actor = "Alice"
target = "Jacky"
template = "insulted"
scope = "private"

[[interactions]]
tick = 3
actor = "Peter"
target = "Jacky"
template = "comforted"
scope = "secret"
"#;

/// Three characters: a couple, and an outsider who dislikes one of them
pub fn demo_scenario() -> Result<Scenario, ConfigError> {
    Scenario::from_toml(DEMO_SCENARIO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scenario_is_valid() {
        let scenario = demo_scenario().unwrap();
        assert_eq!(scenario.characters.len(), 3);
        assert_eq!(scenario.relationships.len(), 4);
        assert_eq!(scenario.interactions.len(), 2);
        assert!(scenario.validate().is_ok());
    }
}
