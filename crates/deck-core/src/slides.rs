//! Slide descriptors and the exhaustive slide-kind dispatch
//!
//! Every slide has a [`SlideKind`]. Rendering goes through the
//! [`SlideRenderer`] visitor, so adding a kind is a compile error in every
//! renderer until it is handled.

use serde::{Deserialize, Serialize};

use crate::persona::{visible_cards, Persona};

/// Kind of content a slide shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SlideKind {
    Title,
    /// Architecture build-up, showing the given step
    Architecture {
        #[serde(default)]
        step: usize,
    },
    Persona,
    Demo,
}

impl SlideKind {
    /// Dispatch to the renderer method for this kind
    pub fn render<R: SlideRenderer>(
        &self,
        slide: &SlideDescriptor,
        ctx: &SlideContext,
        renderer: &mut R,
    ) -> R::Output {
        match *self {
            SlideKind::Title => renderer.title(slide, ctx),
            SlideKind::Architecture { step } => {
                let index = step.min(ARCHITECTURE_STEPS.len() - 1);
                renderer.architecture(slide, index, &ARCHITECTURE_STEPS[index], ctx)
            }
            SlideKind::Persona => renderer.persona(slide, ctx),
            SlideKind::Demo => renderer.demo(slide, ctx),
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, SlideKind::Demo)
    }
}

/// Static description of one slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideDescriptor {
    pub id: String,
    pub title: String,
    pub kind: SlideKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl SlideDescriptor {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: SlideKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            section: None,
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }
}

/// The four slides of the stock deck
pub fn default_slides() -> Vec<SlideDescriptor> {
    vec![
        SlideDescriptor::new("title", "GPU-as-a-Service", SlideKind::Title),
        SlideDescriptor::new("architecture", "Architecture", SlideKind::Architecture { step: 0 }),
        SlideDescriptor::new("personas", "Use Cases", SlideKind::Persona),
        SlideDescriptor::new("demo", "Interactive Demo", SlideKind::Demo),
    ]
}

/// Where the slide sits in the deck, plus the active persona filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideContext {
    pub index: usize,
    pub slide_count: usize,
    pub persona: Persona,
}

/// One step of the architecture build-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchitectureStep {
    pub title: &'static str,
    pub description: &'static str,
    pub highlight: &'static str,
}

pub const ARCHITECTURE_STEPS: [ArchitectureStep; 9] = [
    ArchitectureStep {
        title: "RHACM Hub with Managed Clusters",
        description: "Start with a standard RHACM hub managing multiple OpenShift clusters",
        highlight: "Foundation of multi-cluster management",
    },
    ArchitectureStep {
        title: "Label Clusters by Hardware",
        description: "Tag clusters with their capabilities: CPU-only, NVIDIA GPUs, Mixed workloads, Premium A100s",
        highlight: "Enables intelligent workload routing",
    },
    ArchitectureStep {
        title: "Enable MultiKueue Addon",
        description: "Install Red Hat Build of Kueue (RHBoK) on hub and all managed clusters",
        highlight: "Hub becomes Kueue Manager Cluster",
    },
    ArchitectureStep {
        title: "Create Placements",
        description: "Admin creates GPUPlacement, CPUPlacement, and GoldClassPlacement to define routing rules",
        highlight: "RHACM Placement → Kueue config",
    },
    ArchitectureStep {
        title: "Auto-Generate Kueue Resources",
        description: "RHACM Controller automatically creates LocalQueues and ClusterQueues from Placements",
        highlight: "Zero manual Kueue configuration",
    },
    ArchitectureStep {
        title: "Hub Admin Ready",
        description: "Admin has configured the platform. Data Scientists can now be onboarded.",
        highlight: "Admin only knows Placement API",
    },
    ArchitectureStep {
        title: "Data Scientists Submit Jobs",
        description: "Scientists submit jobs to LocalQueues on the hub. They only need to know queue names.",
        highlight: "Scientists only know Kueue API",
    },
    ArchitectureStep {
        title: "Jobs Dispatched to Clusters",
        description: "Kueue Admission Controller routes jobs to the best available worker cluster",
        highlight: "Automatic multi-cluster scheduling",
    },
    ArchitectureStep {
        title: "Complete GPU-as-a-Service",
        description: "Full system operational: single entry point, intelligent routing, multi-cluster execution",
        highlight: "🎉 Production Ready!",
    },
];

/// Visitor over slide kinds
pub trait SlideRenderer {
    type Output;

    fn title(&mut self, slide: &SlideDescriptor, ctx: &SlideContext) -> Self::Output;

    fn architecture(
        &mut self,
        slide: &SlideDescriptor,
        step_index: usize,
        step: &ArchitectureStep,
        ctx: &SlideContext,
    ) -> Self::Output;

    fn persona(&mut self, slide: &SlideDescriptor, ctx: &SlideContext) -> Self::Output;

    fn demo(&mut self, slide: &SlideDescriptor, ctx: &SlideContext) -> Self::Output;
}

/// Renders a one-line text outline of a slide
#[derive(Debug, Default, Clone, Copy)]
pub struct OutlineRenderer;

impl SlideRenderer for OutlineRenderer {
    type Output = String;

    fn title(&mut self, slide: &SlideDescriptor, ctx: &SlideContext) -> String {
        format!("[{}/{}] {}", ctx.index + 1, ctx.slide_count, slide.title)
    }

    fn architecture(
        &mut self,
        slide: &SlideDescriptor,
        step_index: usize,
        step: &ArchitectureStep,
        ctx: &SlideContext,
    ) -> String {
        format!(
            "[{}/{}] {}: step {}/{} {}",
            ctx.index + 1,
            ctx.slide_count,
            slide.title,
            step_index + 1,
            ARCHITECTURE_STEPS.len(),
            step.title
        )
    }

    fn persona(&mut self, slide: &SlideDescriptor, ctx: &SlideContext) -> String {
        let headings: Vec<_> = visible_cards(ctx.persona).iter().map(|card| card.heading).collect();
        format!(
            "[{}/{}] {} ({}): {}",
            ctx.index + 1,
            ctx.slide_count,
            slide.title,
            ctx.persona.label(),
            headings.join(", ")
        )
    }

    fn demo(&mut self, slide: &SlideDescriptor, ctx: &SlideContext) -> String {
        format!("[{}/{}] {}", ctx.index + 1, ctx.slide_count, slide.title)
    }
}
