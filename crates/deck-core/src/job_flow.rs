//! Scripted job-routing demo
//!
//! A job is submitted to a local queue, queued on the hub, routed by
//! placement to one of the queue's candidate clusters, run, and completed.
//! Routing is a static lookup, not a scheduler: the candidate with the most
//! GPUs wins.

use serde::{Deserialize, Serialize};

use crate::config::DemoConfig;
use crate::sequencer::{EntityMap, EntitySnapshot, EntityStatus, EntityUpdate, Point, Script, Stage};
use crate::{DeckError, Result};

/// A worker cluster shown in the demo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cluster {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub gpus: u32,
}

/// A local queue and the clusters it may route to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Queue {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub targets: &'static [&'static str],
}

pub const CLUSTERS: [Cluster; 4] = [
    Cluster { id: "cpu", name: "Cheap CPUs", icon: "🖥️", gpus: 0 },
    Cluster { id: "gpu", name: "Workhorse GPUs", icon: "⚡", gpus: 16 },
    Cluster { id: "mixed", name: "Mixed", icon: "🔀", gpus: 8 },
    Cluster { id: "gold", name: "Premium A100s", icon: "👑", gpus: 32 },
];

pub const QUEUES: [Queue; 3] = [
    Queue { id: "cpu-queue", name: "CPULocalQueue", icon: "🖥️", targets: &["cpu"] },
    Queue { id: "gpu-queue", name: "GPULocalQueue", icon: "⚡", targets: &["gpu", "mixed"] },
    Queue { id: "gold-queue", name: "GoldGPULocalQueue", icon: "👑", targets: &["gold"] },
];

/// Entity id of the travelling job
pub const JOB: &str = "job";
/// Entity id of the placement hub
pub const HUB: &str = "hub";

pub fn queue_entity(queue_id: &str) -> String {
    format!("queue:{}", queue_id)
}

pub fn cluster_entity(cluster_id: &str) -> String {
    format!("cluster:{}", cluster_id)
}

pub fn find_queue(queue_id: &str) -> Result<&'static Queue> {
    QUEUES
        .iter()
        .find(|queue| queue.id == queue_id)
        .ok_or_else(|| DeckError::UnknownQueue(queue_id.to_string()))
}

pub fn find_cluster(cluster_id: &str) -> Option<&'static Cluster> {
    CLUSTERS.iter().find(|cluster| cluster.id == cluster_id)
}

/// Cluster a job on `queue` is placed on
pub fn pick_target(queue: &Queue) -> Option<&'static Cluster> {
    best_cluster(queue.targets.iter().filter_map(|id| find_cluster(id)))
}

/// Most GPUs wins; on a tie the later candidate wins
pub fn best_cluster<'a>(candidates: impl IntoIterator<Item = &'a Cluster>) -> Option<&'a Cluster> {
    candidates.into_iter().max_by_key(|cluster| cluster.gpus)
}

/// Lifecycle of the demo job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    #[default]
    Idle,
    Submitting,
    Queued,
    Routing,
    Running,
    Completed,
}

impl JobState {
    pub const STAGES: [JobState; 5] = [
        JobState::Submitting,
        JobState::Queued,
        JobState::Routing,
        JobState::Running,
        JobState::Completed,
    ];

    pub fn icon(&self) -> &'static str {
        match self {
            JobState::Idle => "⏸️",
            JobState::Submitting => "📤",
            JobState::Queued => "📋",
            JobState::Routing => "🎯",
            JobState::Running => "⚡",
            JobState::Completed => "✅",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JobState::Idle => "Ready - Click a queue to submit a job",
            JobState::Submitting => "Submitting job to hub...",
            JobState::Queued => "Job queued in ClusterQueue",
            JobState::Routing => "Placement evaluating best cluster...",
            JobState::Running => "Job running on worker cluster!",
            JobState::Completed => "Job completed successfully!",
        }
    }

    /// Delay after the previous state, in milliseconds
    pub fn delay_ms(&self) -> i64 {
        match self {
            JobState::Idle | JobState::Submitting => 0,
            JobState::Queued => 600,
            JobState::Routing => 800,
            JobState::Running => 1000,
            JobState::Completed => 1600,
        }
    }

    /// Horizontal position of the job marker
    pub fn job_x(&self) -> f32 {
        match self {
            JobState::Idle => 0.0,
            JobState::Submitting => 50.0,
            JobState::Queued => 150.0,
            JobState::Routing => 280.0,
            JobState::Running | JobState::Completed => 420.0,
        }
    }

    /// Recover the job state from the job entity's label
    pub fn from_label(label: &str) -> JobState {
        Self::STAGES
            .into_iter()
            .find(|state| state.message() == label)
            .unwrap_or(JobState::Idle)
    }
}

const QUEUE_X: f32 = 0.0;
const HUB_X: f32 = 280.0;
const CLUSTER_X: f32 = 420.0;
const ROW_HEIGHT: f32 = 60.0;

fn queue_y(queue_id: &str) -> f32 {
    QUEUES.iter().position(|queue| queue.id == queue_id).unwrap_or(0) as f32 * ROW_HEIGHT
}

fn cluster_y(cluster_id: &str) -> f32 {
    CLUSTERS.iter().position(|cluster| cluster.id == cluster_id).unwrap_or(0) as f32 * ROW_HEIGHT
}

fn cluster_caption(cluster: &Cluster) -> String {
    if cluster.gpus > 0 {
        format!("{} · {} GPUs available", cluster.name, cluster.gpus)
    } else {
        format!("{} · CPU only", cluster.name)
    }
}

/// Entities before any job is submitted
pub fn initial_entities() -> EntityMap {
    let mut entities = EntityMap::new();
    entities.insert(
        JOB.to_string(),
        EntitySnapshot::new(Point::new(JobState::Idle.job_x(), 0.0), EntityStatus::Hidden, JobState::Idle.message()),
    );
    entities.insert(
        HUB.to_string(),
        EntitySnapshot::new(Point::new(HUB_X, ROW_HEIGHT), EntityStatus::Idle, "Placement"),
    );
    for queue in &QUEUES {
        entities.insert(
            queue_entity(queue.id),
            EntitySnapshot::new(Point::new(QUEUE_X, queue_y(queue.id)), EntityStatus::Idle, queue.name),
        );
    }
    for cluster in &CLUSTERS {
        entities.insert(
            cluster_entity(cluster.id),
            EntitySnapshot::new(Point::new(CLUSTER_X, cluster_y(cluster.id)), EntityStatus::Idle, cluster_caption(cluster)),
        );
    }
    entities
}

fn job_update(state: JobState, y: f32, status: EntityStatus) -> EntityUpdate {
    EntityUpdate::new(JOB)
        .position(state.job_x(), y)
        .status(status)
        .label(state.message())
}

/// Build the job-flow script for a submission to `queue_id`
pub fn job_flow_script(queue_id: &str, demo: &DemoConfig) -> Result<Script> {
    let queue = find_queue(queue_id)?;
    let target = pick_target(queue)
        .ok_or_else(|| DeckError::InvalidStageConfig(format!("queue '{}' has no target clusters", queue.id)))?;

    let queue_key = queue_entity(queue.id);
    let cluster_key = cluster_entity(target.id);
    let start_y = queue_y(queue.id);
    let hub_y = ROW_HEIGHT;
    let target_y = cluster_y(target.id);

    let stages = vec![
        Stage::from_updates(
            JobState::Submitting.delay_ms(),
            "submitting",
            vec![
                EntityUpdate::new(&queue_key).status(EntityStatus::Selected),
                job_update(JobState::Submitting, start_y, EntityStatus::Active),
            ],
        )?,
        Stage::from_updates(
            JobState::Queued.delay_ms(),
            "queued",
            vec![job_update(JobState::Queued, hub_y, EntityStatus::Active)],
        )?,
        Stage::from_updates(
            JobState::Routing.delay_ms(),
            "routing",
            vec![
                EntityUpdate::new(HUB).status(EntityStatus::Active).label("Evaluating clusters..."),
                job_update(JobState::Routing, hub_y, EntityStatus::Active),
            ],
        )?,
        Stage::from_updates(
            JobState::Running.delay_ms(),
            "running",
            vec![
                EntityUpdate::new(HUB).status(EntityStatus::Idle).label("Placement"),
                EntityUpdate::new(&cluster_key).status(EntityStatus::Running),
                job_update(JobState::Running, target_y, EntityStatus::Running),
            ],
        )?,
        Stage::from_updates(
            JobState::Completed.delay_ms(),
            "completed",
            vec![
                EntityUpdate::new(&cluster_key).status(EntityStatus::Completed),
                job_update(JobState::Completed, target_y, EntityStatus::Completed),
            ],
        )?,
    ];

    Script::new(initial_entities(), stages, demo.loop_delay_ms, demo.looping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::{Sequencer, SequencerEvent};
    use std::time::Duration;

    #[test]
    fn test_pick_target_prefers_most_gpus() {
        let gpu_queue = find_queue("gpu-queue").unwrap();
        assert_eq!(pick_target(gpu_queue).unwrap().id, "gpu");

        let gold_queue = find_queue("gold-queue").unwrap();
        assert_eq!(pick_target(gold_queue).unwrap().id, "gold");

        let cpu_queue = find_queue("cpu-queue").unwrap();
        assert_eq!(pick_target(cpu_queue).unwrap().id, "cpu");
    }

    #[test]
    fn test_tie_goes_to_later_candidate() {
        let first = Cluster { id: "a", name: "A", icon: "", gpus: 16 };
        let second = Cluster { id: "b", name: "B", icon: "", gpus: 16 };
        let small = Cluster { id: "c", name: "C", icon: "", gpus: 4 };

        assert_eq!(best_cluster([&first, &second, &small]).unwrap().id, "b");
        assert_eq!(best_cluster([&second, &first]).unwrap().id, "a");
        assert!(best_cluster(std::iter::empty::<&Cluster>()).is_none());

        const UNKNOWN: Queue = Queue { id: "none", name: "None", icon: "", targets: &["tpu"] };
        assert!(pick_target(&UNKNOWN).is_none());
    }

    #[test]
    fn test_unknown_queue() {
        let err = job_flow_script("tpu-queue", &DemoConfig::default()).unwrap_err();
        assert!(matches!(err, DeckError::UnknownQueue(ref id) if id == "tpu-queue"));
    }

    #[test]
    fn test_one_shot_flow_timeline() {
        let demo = DemoConfig { looping: false, ..DemoConfig::default() };
        let mut seq = Sequencer::new(job_flow_script("gold-queue", &demo).unwrap());
        seq.start();

        let job_state = |seq: &Sequencer| JobState::from_label(&seq.state().entities[JOB].label);

        seq.advance(Duration::ZERO);
        assert_eq!(job_state(&seq), JobState::Submitting);

        seq.advance(Duration::from_millis(1400));
        assert_eq!(job_state(&seq), JobState::Routing);
        assert_eq!(seq.state().entities[HUB].status, EntityStatus::Active);

        seq.advance(Duration::from_millis(1000));
        assert_eq!(job_state(&seq), JobState::Running);
        assert_eq!(seq.state().entities["cluster:gold"].status, EntityStatus::Running);
        assert_eq!(seq.state().entities["cluster:gpu"].status, EntityStatus::Idle);

        seq.advance(Duration::from_millis(1600));
        assert_eq!(job_state(&seq), JobState::Completed);

        let events = seq.advance(Duration::from_millis(1500));
        assert_eq!(events, vec![SequencerEvent::Finished]);
        assert_eq!(job_state(&seq), JobState::Idle);
        assert!(!seq.is_running());
    }

    #[test]
    fn test_initial_entities_cover_every_queue_and_cluster() {
        let entities = initial_entities();
        assert_eq!(entities.len(), 2 + QUEUES.len() + CLUSTERS.len());
        assert_eq!(entities[JOB].status, EntityStatus::Hidden);
        assert!(entities["cluster:cpu"].label.contains("CPU only"));
    }
}
