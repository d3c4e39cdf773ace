//! Monster instances built from the species table.

use hunter_common::ContentResult;
use serde::{Deserialize, Serialize};

use crate::content::{AssetProvider, MonsterStats};

/// A monster owned by the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    /// Species name
    pub name: String,
    /// Level
    pub level: u32,
    /// Element, copied from the species stats
    pub element: String,
    /// Base stats of the species
    pub stats: MonsterStats,
}

impl Monster {
    /// Create a monster of species `name`. Unknown species are a content
    /// error.
    pub fn new(name: &str, level: u32, assets: &impl AssetProvider) -> ContentResult<Self> {
        let stats = assets.monster_stats(name)?.clone();
        Ok(Self {
            name: name.to_string(),
            level,
            element: stats.element.clone(),
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Content;
    use hunter_common::ContentError;

    fn content() -> Content {
        let mut content = Content::default();
        content.insert_monster(
            "Pluma",
            MonsterStats {
                element: "water".into(),
                max_health: 16.0,
                max_energy: 10.0,
                attack: 2.0,
                defense: 4.0,
                recovery: 1.0,
                speed: 1.0,
            },
        );
        content
    }

    #[test]
    fn test_monster_from_table() {
        let monster = Monster::new("Pluma", 4, &content()).expect("known species");
        assert_eq!(monster.element, "water");
        assert_eq!(monster.level, 4);
        assert_eq!(monster.stats.defense, 4.0);
    }

    #[test]
    fn test_unknown_species() {
        assert_eq!(
            Monster::new("Nobody", 1, &content()),
            Err(ContentError::UnknownMonster("Nobody".into()))
        );
    }
}
