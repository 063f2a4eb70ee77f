use boidbox_core::{Agent, ModelKind};
use serde::{Deserialize, Serialize};

use crate::heading::debug_circle_radius;
use crate::settings::Theme;

/// What a renderer needs to draw one agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSnapshot {
    pub index: usize,
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub scale: f32,
    pub model_kind: ModelKind,
    /// Asset name from the active theme, if the kind resolves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Present when the host draws wander circles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wander_circle: Option<f32>,
}

/// Committed state of the whole flock after one tick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub agents: Vec<AgentSnapshot>,
}

impl FrameSnapshot {
    /// Copies the flock for presentation. `wander_radius` is given when the
    /// debug wander circle should be included.
    pub fn capture(tick: u64, agents: &[Agent], theme: &Theme, wander_radius: Option<f32>) -> Self {
        let agents = agents
            .iter()
            .enumerate()
            .map(|(index, agent)| AgentSnapshot {
                index,
                position: agent.position.to_array(),
                velocity: agent.velocity.to_array(),
                scale: agent.scale,
                model_kind: agent.model_kind,
                model: theme.model_name(agent.model_kind).map(str::to_string),
                wander_circle: wander_radius.map(|radius| debug_circle_radius(radius, agent.scale)),
            })
            .collect();

        Self { tick, agents }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
