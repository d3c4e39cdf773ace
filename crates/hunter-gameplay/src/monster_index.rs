//! Monster index selection logic: browsing and reordering the roster.
//!
//! Layout and drawing live in presentation code; this module only tracks the
//! highlighted entry, the pending swap selection and the list scroll offset.

use thiserror::Error;
use tracing::debug;

use crate::input::{InputSource, Key};
use crate::monster::Monster;

/// Rows shown at once.
pub const VISIBLE_ITEMS: usize = 6;

/// Error types for the monster index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonsterIndexError {
    /// The roster has no monsters
    #[error("The monster roster is empty")]
    EmptyRoster,
}

/// Browsable, reorderable monster roster.
#[derive(Debug, Clone)]
pub struct MonsterIndex {
    monsters: Vec<Monster>,
    index: usize,
    selected: Option<usize>,
}

impl MonsterIndex {
    /// Open the index on the first monster.
    pub fn new(monsters: Vec<Monster>) -> Result<Self, MonsterIndexError> {
        if monsters.is_empty() {
            return Err(MonsterIndexError::EmptyRoster);
        }
        Ok(Self {
            monsters,
            index: 0,
            selected: None,
        })
    }

    /// Monsters in roster order.
    #[must_use]
    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    /// Give the roster back.
    #[must_use]
    pub fn into_monsters(self) -> Vec<Monster> {
        self.monsters
    }

    /// Highlighted entry.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Entry picked for a swap, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Handle one frame of input.
    ///
    /// Up and down move the highlight, wrapping at both ends. Interact picks
    /// the highlighted entry; a second interact swaps it with the picked one
    /// and clears the pick.
    pub fn handle_input(&mut self, input: &impl InputSource) {
        let len = self.monsters.len() as i64;
        let mut index = self.index as i64;
        if input.just_pressed(Key::Up) {
            index -= 1;
        }
        if input.just_pressed(Key::Down) {
            index += 1;
        }
        self.index = index.rem_euclid(len) as usize;

        if input.just_pressed(Key::Interact) {
            match self.selected.take() {
                Some(selected) => {
                    self.monsters.swap(selected, self.index);
                    debug!(from = selected, to = self.index, "swapped monsters");
                },
                None => self.selected = Some(self.index),
            }
        }
    }

    /// Vertical scroll offset keeping the highlight in view.
    #[must_use]
    pub fn list_offset(&self, item_height: f32) -> f32 {
        if self.index < VISIBLE_ITEMS {
            0.0
        } else {
            -((self.index - VISIBLE_ITEMS + 1) as f32) * item_height
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MonsterStats;
    use crate::input::InputState;

    fn roster(n: usize) -> Vec<Monster> {
        (0..n)
            .map(|i| Monster {
                name: format!("m{i}"),
                level: 1,
                element: "normal".into(),
                stats: MonsterStats {
                    element: "normal".into(),
                    max_health: 10.0,
                    max_energy: 10.0,
                    attack: 1.0,
                    defense: 1.0,
                    recovery: 1.0,
                    speed: 1.0,
                },
            })
            .collect()
    }

    fn press(index: &mut MonsterIndex, keys: &[Key]) {
        let mut input = InputState::new();
        input.update_all(keys);
        index.handle_input(&input);
    }

    fn names(index: &MonsterIndex) -> Vec<&str> {
        index.monsters().iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_empty_roster() {
        assert_eq!(
            MonsterIndex::new(Vec::new()).err(),
            Some(MonsterIndexError::EmptyRoster)
        );
    }

    #[test]
    fn test_wraps_both_ways() {
        let mut index = MonsterIndex::new(roster(3)).expect("non-empty");
        press(&mut index, &[Key::Up]);
        assert_eq!(index.index(), 2);
        press(&mut index, &[Key::Down]);
        assert_eq!(index.index(), 0);
    }

    #[test]
    fn test_select_then_swap() {
        let mut index = MonsterIndex::new(roster(4)).expect("non-empty");
        press(&mut index, &[Key::Interact]);
        assert_eq!(index.selected(), Some(0));

        press(&mut index, &[Key::Down]);
        press(&mut index, &[Key::Down]);
        press(&mut index, &[Key::Interact]);
        assert_eq!(names(&index), ["m2", "m1", "m0", "m3"]);
        assert_eq!(index.selected(), None);
        assert_eq!(index.index(), 2);
    }

    #[test]
    fn test_list_offset() {
        let mut index = MonsterIndex::new(roster(10)).expect("non-empty");
        for _ in 0..5 {
            press(&mut index, &[Key::Down]);
        }
        assert_eq!(index.list_offset(50.0), 0.0);
        press(&mut index, &[Key::Down]);
        assert_eq!(index.index(), 6);
        assert_eq!(index.list_offset(50.0), -50.0);
        press(&mut index, &[Key::Down]);
        assert_eq!(index.list_offset(50.0), -100.0);
    }
}
