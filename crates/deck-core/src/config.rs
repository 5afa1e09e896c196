//! Deck configuration loaded from JSON

use std::fs;
use std::path::Path;
use ahash::AHashSet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::job_flow::job_flow_script;
use crate::navigation::{Section, SectionTable};
use crate::slides::{default_slides, SlideDescriptor};
use crate::{DeckError, Result};

/// Explicit section: an id and the slide indices it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub id: String,
    pub slides: Vec<usize>,
}

/// Settings for the job-flow demo slide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub looping: bool,
    pub loop_delay_ms: i64,
    pub default_queue: String,
    /// Start the demo as soon as its slide becomes active
    pub auto_start: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            looping: true,
            loop_delay_ms: 1500,
            default_queue: "gpu-queue".to_string(),
            auto_start: true,
        }
    }
}

/// Whole-deck configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    pub slides: Vec<SlideDescriptor>,
    pub sections: Vec<SectionSpec>,
    pub demo: DemoConfig,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            slides: default_slides(),
            sections: Vec::new(),
            demo: DemoConfig::default(),
        }
    }
}

impl DeckConfig {
    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: DeckConfig = serde_json::from_str(&text)?;
        info!(path = %path.display(), slides = config.slides.len(), "deck config loaded");
        Ok(config)
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Check the config and build its section table
    pub fn validate(&self) -> Result<SectionTable> {
        if self.slides.is_empty() {
            return Err(DeckError::InvalidDeckConfig("deck has no slides".to_string()));
        }

        let mut seen = AHashSet::new();
        for slide in &self.slides {
            if !seen.insert(slide.id.as_str()) {
                return Err(DeckError::InvalidDeckConfig(format!("duplicate slide id '{}'", slide.id)));
            }
        }

        job_flow_script(&self.demo.default_queue, &self.demo)?;

        SectionTable::new(self.resolve_sections(), self.slide_count())
    }

    /// Explicit sections, or ones derived from the slides' `section` tags.
    ///
    /// Tagged slides are grouped by tag in order of first appearance; an
    /// untagged slide becomes a section named after its own id.
    pub fn resolve_sections(&self) -> Vec<Section> {
        if !self.sections.is_empty() {
            return self
                .sections
                .iter()
                .map(|spec| Section::new(spec.id.clone(), spec.slides.iter().copied()))
                .collect();
        }

        let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
        for (index, slide) in self.slides.iter().enumerate() {
            let key = slide.section.as_deref().unwrap_or(slide.id.as_str());
            groups.entry(key).or_default().push(index);
        }

        groups
            .into_iter()
            .map(|(id, indices)| Section::new(id, indices))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::SlideKind;

    #[test]
    fn test_default_config_is_valid() {
        let config = DeckConfig::default();
        let sections = config.validate().unwrap();
        assert_eq!(sections.len(), 4);
        assert_eq!(sections.get("demo").unwrap().first_slide(), Some(3));
    }

    #[test]
    fn test_sections_derived_from_tags() {
        let mut config = DeckConfig::default();
        config.slides[0].section = Some("intro".to_string());
        config.slides[1].section = Some("intro".to_string());

        let sections = config.validate().unwrap();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections.section_of(1).unwrap().id, "intro");
        assert_eq!(sections.section_of(2).unwrap().id, "personas");
    }

    #[test]
    fn test_explicit_sections_must_cover_deck() {
        let mut config = DeckConfig::default();
        config.sections = vec![SectionSpec { id: "intro".to_string(), slides: vec![0, 1] }];

        let err = config.validate().unwrap_err();
        assert!(matches!(err, DeckError::InvalidDeckConfig(_)));
    }

    #[test]
    fn test_duplicate_slide_ids_rejected() {
        let mut config = DeckConfig::default();
        config.slides.push(SlideDescriptor::new("demo", "Again", SlideKind::Demo));
        assert!(matches!(config.validate(), Err(DeckError::InvalidDeckConfig(_))));
    }

    #[test]
    fn test_empty_deck_rejected() {
        let config = DeckConfig { slides: Vec::new(), ..DeckConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_demo_settings_rejected() {
        let mut config = DeckConfig::default();
        config.demo.loop_delay_ms = -5;
        assert!(matches!(config.validate(), Err(DeckError::InvalidStageConfig(_))));

        let mut config = DeckConfig::default();
        config.demo.default_queue = "nope".to_string();
        assert!(matches!(config.validate(), Err(DeckError::UnknownQueue(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DeckConfig = serde_json::from_str(r#"{ "demo": { "looping": false } }"#).unwrap();
        assert_eq!(config.slides.len(), 4);
        assert!(!config.demo.looping);
        assert_eq!(config.demo.loop_delay_ms, 1500);
    }

    #[test]
    fn test_load_missing_file() {
        let err = DeckConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, DeckError::Io(_)));
    }
}
