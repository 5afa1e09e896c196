//! Stage tables and their validation

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use serde::{Deserialize, Serialize};

use super::{EntityMap, EntityStatus, Point};
use crate::{DeckError, Result};

/// Pure mutation applied when a stage fires
pub type StageFn = Arc<dyn Fn(&EntityMap) -> EntityMap + Send + Sync>;

/// Partial update of one entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityUpdate {
    pub id: String,
    pub position: Option<Point>,
    pub status: Option<EntityStatus>,
    pub label: Option<String>,
}

impl EntityUpdate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }

    pub fn status(mut self, status: EntityStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn patch(&self, entities: &mut EntityMap) {
        if let Some(entity) = entities.get_mut(&self.id) {
            if let Some(position) = self.position {
                entity.position = position;
            }
            if let Some(status) = self.status {
                entity.status = status;
            }
            if let Some(label) = &self.label {
                entity.label = label.clone();
            }
        }
    }
}

/// One step of a script: wait `delay` after the previous stage, then apply
#[derive(Clone)]
pub struct Stage {
    delay: Duration,
    label: String,
    apply: StageFn,
    targets: Vec<String>,
}

impl Stage {
    /// Stage backed by an arbitrary pure function
    pub fn from_fn<F>(delay_ms: i64, label: impl Into<String>, apply: F) -> Result<Self>
    where
        F: Fn(&EntityMap) -> EntityMap + Send + Sync + 'static,
    {
        let label = label.into();
        Ok(Self {
            delay: delay_from_ms(delay_ms, &label)?,
            label,
            apply: Arc::new(apply),
            targets: Vec::new(),
        })
    }

    /// Stage that patches entities with a list of partial updates
    pub fn from_updates(delay_ms: i64, label: impl Into<String>, updates: Vec<EntityUpdate>) -> Result<Self> {
        let label = label.into();
        let targets = updates.iter().map(|update| update.id.clone()).collect();
        let updates = Arc::new(updates);

        Ok(Self {
            delay: delay_from_ms(delay_ms, &label)?,
            label,
            apply: Arc::new(move |entities: &EntityMap| {
                let mut next = entities.clone();
                for update in updates.iter() {
                    update.patch(&mut next);
                }
                next
            }),
            targets,
        })
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Compute the entity map after this stage
    pub fn apply(&self, entities: &EntityMap) -> EntityMap {
        (self.apply)(entities)
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("delay", &self.delay)
            .field("label", &self.label)
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

fn delay_from_ms(delay_ms: i64, what: &str) -> Result<Duration> {
    u64::try_from(delay_ms)
        .map(Duration::from_millis)
        .map_err(|_| DeckError::InvalidStageConfig(format!("negative delay {}ms for '{}'", delay_ms, what)))
}

/// Immutable, validated stage table plus looping behaviour
#[derive(Debug, Clone)]
pub struct Script {
    initial: EntityMap,
    stages: Vec<Stage>,
    loop_delay: Duration,
    looping: bool,
}

impl Script {
    /// Validate and build a script.
    ///
    /// Rejects an empty stage list, a negative loop delay, stages updating
    /// entities missing from `initial`, and looping scripts whose whole
    /// cycle takes no time.
    pub fn new(initial: EntityMap, stages: Vec<Stage>, loop_delay_ms: i64, looping: bool) -> Result<Self> {
        if stages.is_empty() {
            return Err(DeckError::InvalidStageConfig("script has no stages".to_string()));
        }

        let loop_delay = delay_from_ms(loop_delay_ms, "loop")?;

        for stage in &stages {
            if let Some(missing) = stage.targets.iter().find(|id| !initial.contains_key(id.as_str())) {
                return Err(DeckError::InvalidStageConfig(format!(
                    "stage '{}' updates unknown entity '{}'",
                    stage.label, missing
                )));
            }
        }

        let script = Self {
            initial,
            stages,
            loop_delay,
            looping,
        };

        if looping && script.cycle_duration().is_zero() {
            return Err(DeckError::InvalidStageConfig(
                "looping script must take a non-zero time per cycle".to_string(),
            ));
        }

        Ok(script)
    }

    /// Build a script from its declarative form
    pub fn from_spec(spec: ScriptSpec) -> Result<Self> {
        let stages = spec
            .stages
            .into_iter()
            .map(|stage| Stage::from_updates(stage.delay_ms, stage.label, stage.updates))
            .collect::<Result<Vec<_>>>()?;
        Self::new(spec.initial, stages, spec.loop_delay_ms, spec.looping)
    }

    pub fn initial(&self) -> &EntityMap {
        &self.initial
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn loop_delay(&self) -> Duration {
        self.loop_delay
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Time from start to the loop reset
    pub fn cycle_duration(&self) -> Duration {
        self.stages.iter().map(Stage::delay).sum::<Duration>() + self.loop_delay
    }
}

/// Declarative stage, deserializable from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSpec {
    pub delay_ms: i64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub updates: Vec<EntityUpdate>,
}

/// Declarative script, deserializable from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptSpec {
    #[serde(default)]
    pub initial: EntityMap,
    pub stages: Vec<StageSpec>,
    #[serde(default = "default_loop_delay_ms")]
    pub loop_delay_ms: i64,
    #[serde(default = "default_looping")]
    pub looping: bool,
}

fn default_loop_delay_ms() -> i64 {
    3000
}

fn default_looping() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::EntitySnapshot;

    fn one_entity() -> EntityMap {
        let mut initial = EntityMap::new();
        initial.insert("job".to_string(), EntitySnapshot::default());
        initial
    }

    #[test]
    fn test_negative_delay_rejected() {
        let err = Stage::from_updates(-1, "bad", Vec::new()).unwrap_err();
        assert!(matches!(err, DeckError::InvalidStageConfig(_)));
    }

    #[test]
    fn test_empty_script_rejected() {
        let err = Script::new(one_entity(), Vec::new(), 1000, true).unwrap_err();
        assert!(matches!(err, DeckError::InvalidStageConfig(_)));
    }

    #[test]
    fn test_zero_length_loop_rejected() {
        let stage = Stage::from_updates(0, "instant", Vec::new()).unwrap();
        assert!(Script::new(one_entity(), vec![stage.clone()], 0, true).is_err());
        assert!(Script::new(one_entity(), vec![stage], 0, false).is_ok());
    }

    #[test]
    fn test_unknown_entity_rejected() {
        let stage = Stage::from_updates(100, "move", vec![EntityUpdate::new("ghost").position(1.0, 1.0)]).unwrap();
        let err = Script::new(one_entity(), vec![stage], 1000, true).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_updates_patch_only_given_fields() {
        let stage = Stage::from_updates(
            0,
            "run",
            vec![EntityUpdate::new("job").status(EntityStatus::Running)],
        ).unwrap();

        let mut initial = one_entity();
        initial["job"].label = "keep me".to_string();
        let next = stage.apply(&initial);

        assert_eq!(next["job"].status, EntityStatus::Running);
        assert_eq!(next["job"].label, "keep me");
        assert_eq!(initial["job"].status, EntityStatus::Idle);
    }

    #[test]
    fn test_closure_stage() {
        let stage = Stage::from_fn(250, "shift", |entities: &EntityMap| {
            let mut next = entities.clone();
            for entity in next.values_mut() {
                entity.position.x += 10.0;
            }
            next
        })
        .unwrap();

        let next = stage.apply(&one_entity());
        assert_eq!(next["job"].position, Point::new(10.0, 0.0));
        assert_eq!(stage.delay(), Duration::from_millis(250));
        assert!(Script::new(one_entity(), vec![stage], 0, true).is_ok());
    }

    #[test]
    fn test_script_spec_from_json() {
        let json = r#"{
            "initial": { "job": { "position": { "x": 0, "y": 0 }, "status": "hidden", "label": "" } },
            "stages": [
                { "delay_ms": 500, "label": "show", "updates": [ { "id": "job", "status": "active" } ] },
                { "delay_ms": 500, "label": "move", "updates": [ { "id": "job", "position": { "x": 10, "y": 0 } } ] }
            ],
            "loop_delay_ms": 2000
        }"#;
        let spec: ScriptSpec = serde_json::from_str(json).unwrap();
        let script = Script::from_spec(spec).unwrap();

        assert_eq!(script.len(), 2);
        assert!(script.is_looping());
        assert_eq!(script.cycle_duration(), Duration::from_millis(3000));
    }
}
