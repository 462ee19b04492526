use bevy::prelude::*;

/// Raised on a goal right after it has been inserted into a container.
///
/// # Observers
/// - Kind-specific setup: self-targeting goals pick the container owner, warp point goals pick
///   a random location.
#[derive(EntityEvent, Debug, Clone, Copy)]
pub struct GoalInserted {
    pub entity: Entity,
    /// The container the goal was inserted into.
    pub container: Entity,
}

/// Raised on a goal when its stored progress changes.
#[derive(EntityEvent, Debug, Clone, Copy)]
pub struct GoalProgressChanged {
    pub entity: Entity,
    pub old: f64,
    pub new: f64,
}

/// Raised on a goal after its target has changed and marker bookkeeping is done.
#[derive(EntityEvent, Debug, Clone, Copy)]
pub struct GoalTargetChanged {
    pub entity: Entity,
    pub old: Option<Entity>,
    pub new: Option<Entity>,
}

/// Request to hand a goal table to a mind as personal goals.
///
/// The goals land in the mind's individual container, which is created if needed.
#[derive(EntityEvent, Debug, Clone)]
pub struct GrantIndividualGoals {
    /// The mind receiving the goals.
    pub entity: Entity,
    /// Id of a goal table in the catalog.
    pub table: String,
}
