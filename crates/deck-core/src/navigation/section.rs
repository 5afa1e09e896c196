//! Named groups of slides used for coarse jump navigation

use std::collections::BTreeSet;
use ahash::AHashMap;

use crate::{DeckError, Result};

/// A named grouping of slide indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub slide_indices: BTreeSet<usize>,
}

impl Section {
    pub fn new(id: impl Into<String>, slide_indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            id: id.into(),
            slide_indices: slide_indices.into_iter().collect(),
        }
    }

    /// Lowest slide index in the section
    pub fn first_slide(&self) -> Option<usize> {
        self.slide_indices.iter().next().copied()
    }
}

/// Validated set of sections covering every slide exactly once
#[derive(Debug, Clone, Default)]
pub struct SectionTable {
    sections: Vec<Section>,
    by_id: AHashMap<String, usize>,
    owner: Vec<usize>,
}

impl SectionTable {
    /// Build a table for a deck of `slide_count` slides.
    ///
    /// Fails if a section is empty, ids repeat, an index is out of range,
    /// or a slide belongs to zero or several sections.
    pub fn new(sections: Vec<Section>, slide_count: usize) -> Result<Self> {
        let mut by_id = AHashMap::new();
        let mut owner: Vec<Option<usize>> = vec![None; slide_count];

        for (pos, section) in sections.iter().enumerate() {
            if section.slide_indices.is_empty() {
                return Err(DeckError::InvalidDeckConfig(format!(
                    "section '{}' has no slides", section.id
                )));
            }
            if by_id.insert(section.id.clone(), pos).is_some() {
                return Err(DeckError::InvalidDeckConfig(format!(
                    "duplicate section id '{}'", section.id
                )));
            }
            for &index in &section.slide_indices {
                let slot = owner.get_mut(index).ok_or_else(|| {
                    DeckError::InvalidDeckConfig(format!(
                        "section '{}' references slide {} but the deck has {} slides",
                        section.id, index, slide_count
                    ))
                })?;
                if let Some(other) = slot.replace(pos) {
                    return Err(DeckError::InvalidDeckConfig(format!(
                        "slide {} belongs to both '{}' and '{}'",
                        index, sections[other].id, section.id
                    )));
                }
            }
        }

        let owner = owner
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    DeckError::InvalidDeckConfig(format!("slide {} is not in any section", index))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { sections, by_id, owner })
    }

    pub fn get(&self, id: &str) -> Option<&Section> {
        self.by_id.get(id).map(|&pos| &self.sections[pos])
    }

    /// Section owning slide `index`
    pub fn section_of(&self, index: usize) -> Option<&Section> {
        self.owner.get(index).map(|&pos| &self.sections[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_contiguous_section_resolves_to_lowest_index() {
        let table = SectionTable::new(
            vec![Section::new("intro", [0, 2]), Section::new("demo", [3, 1])],
            4,
        ).unwrap();
        assert_eq!(table.get("demo").unwrap().first_slide(), Some(1));
        assert_eq!(table.section_of(2).unwrap().id, "intro");
    }

    #[test]
    fn test_rejects_uncovered_slide() {
        let err = SectionTable::new(vec![Section::new("intro", [0])], 2).unwrap_err();
        assert!(matches!(err, DeckError::InvalidDeckConfig(_)));
    }

    #[test]
    fn test_rejects_overlap_and_out_of_range() {
        let overlap = SectionTable::new(
            vec![Section::new("a", [0, 1]), Section::new("b", [1])],
            2,
        );
        assert!(overlap.is_err());

        let out_of_range = SectionTable::new(vec![Section::new("a", [0, 5])], 1);
        assert!(out_of_range.is_err());
    }
}
