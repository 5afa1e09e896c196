//! Persona-based content filtering
//!
//! A persona only decides which descriptive cards are shown. It has no
//! effect on navigation or on the animation sequencer.

use serde::{Deserialize, Serialize};

/// Viewer persona selected in the toggle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Admin,
    Scientist,
    #[default]
    All,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::Admin, Persona::Scientist, Persona::All];

    pub fn label(&self) -> &'static str {
        match self {
            Persona::Admin => "Hub Admin",
            Persona::Scientist => "Data Scientist",
            Persona::All => "Both",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Persona::Admin => "🔧",
            Persona::Scientist => "🧪",
            Persona::All => "👥",
        }
    }

    /// Whether content aimed at `audience` is visible for this persona
    pub fn shows(&self, audience: Audience) -> bool {
        match self {
            Persona::All => true,
            Persona::Admin => audience == Audience::Admin,
            Persona::Scientist => audience == Audience::Scientist,
        }
    }
}

/// Who a piece of content is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Audience {
    Admin,
    Scientist,
}

/// One numbered step on a persona card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonaStep {
    pub title: &'static str,
    pub description: &'static str,
}

/// A card describing one persona's workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaCard {
    pub audience: Audience,
    pub heading: &'static str,
    pub knows: &'static str,
    pub steps: &'static [PersonaStep],
}

const ADMIN_STEPS: &[PersonaStep] = &[
    PersonaStep { title: "Enable MultiKueue Addon", description: "Install RHBoK on hub and managed clusters" },
    PersonaStep { title: "Label Clusters", description: "Tag clusters with hardware capabilities" },
    PersonaStep { title: "Create Placements", description: "Define GPUPlacement, CPUPlacement, etc." },
    PersonaStep { title: "Done!", description: "RHACM auto-creates Kueue resources" },
];

const SCIENTIST_STEPS: &[PersonaStep] = &[
    PersonaStep { title: "Ask Admin", description: "\"Which queue should I use for GPU training?\"" },
    PersonaStep { title: "Submit Job", description: "Add label: kueue.x-k8s.io/queue-name: gpu-queue" },
    PersonaStep { title: "Wait", description: "Job automatically routes to best cluster" },
    PersonaStep { title: "Get Results", description: "Results sync back to hub" },
];

/// All persona cards in display order
pub fn persona_cards() -> [PersonaCard; 2] {
    [
        PersonaCard {
            audience: Audience::Admin,
            heading: "Hub Admin",
            knows: "Placements, Clusters",
            steps: ADMIN_STEPS,
        },
        PersonaCard {
            audience: Audience::Scientist,
            heading: "Data Scientist",
            knows: "Queues, Jobs",
            steps: SCIENTIST_STEPS,
        },
    ]
}

/// Cards visible for `persona`, in display order
pub fn visible_cards(persona: Persona) -> Vec<PersonaCard> {
    persona_cards()
        .into_iter()
        .filter(|card| persona.shows(card.audience))
        .collect()
}
