//! Cost knobs and search limits.
//!
//! Both structs derive serde so hosts can load them from whatever config
//! format they already use; the pathfinder itself never touches a file.

use serde::{Deserialize, Serialize};

/// Per-search movement capabilities and cost multipliers. Immutable for the
/// duration of a single search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathingOptions {
    /// Multiplier (times |dy|) for steps that jump or drop while moving
    /// horizontally.
    pub jump_drop_cost: f64,
    /// Multiplier for passing through a door, gate, or trapdoor.
    pub traverse_toggleable_cost: f64,
    /// Multiplier for walking on road blocks. Below 1.0 attracts paths onto
    /// roads.
    pub on_path_cost: f64,
    /// Multiplier while riding rails.
    pub on_rail_cost: f64,
    /// Multiplier for the step leaving a rail line.
    pub rails_exit_cost: f64,
    /// Multiplier while on a ladder.
    pub on_ladder_cost: f64,
    /// Multiplier while swimming.
    pub swim_cost: f64,
    /// Multiplier for the step that enters water.
    pub swim_cost_enter: f64,
    pub can_swim: bool,
    pub can_use_ladders: bool,
    pub can_use_rails: bool,
    /// Emit swim waypoints one block below their node, steadying the agent
    /// on the surface.
    pub lower_swim_waypoints: bool,
}

impl Default for PathingOptions {
    fn default() -> Self {
        Self {
            jump_drop_cost: 2.0,
            traverse_toggleable_cost: 3.0,
            on_path_cost: 0.75,
            on_rail_cost: 0.4,
            rails_exit_cost: 3.0,
            on_ladder_cost: 1.5,
            swim_cost: 2.0,
            swim_cost_enter: 5.0,
            can_swim: false,
            can_use_ladders: true,
            can_use_rails: true,
            lower_swim_waypoints: false,
        }
    }
}

/// Process-wide search limits, shared by every job a host submits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfinderConfig {
    /// Hard cap on visited nodes per search; the effective budget is
    /// `min(max_nodes, range^2)`.
    pub max_nodes: usize,
    /// Rail annotations are only emitted when a path rides rails for at
    /// least this many waypoints.
    pub min_rails_run: usize,
    /// Continue walking in the same direction while the heuristic improves.
    /// Faster, but can produce strange paths; off by default.
    pub allow_jump_point_search: bool,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            max_nodes: 5000,
            min_rails_run: 5,
            allow_jump_point_search: false,
        }
    }
}
