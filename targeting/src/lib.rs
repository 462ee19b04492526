//! Generic single-target tracking for goals.
//!
//! A targeted goal points at one entity. The target carries a marker component per goal kind
//! tracking it, and the [`TargetRegistry`] counts which goals rely on each marker. The marker
//! is inserted on the first attach and removed on the last detach; despawning the target
//! detaches every goal still tracking it.

mod commands;
mod engine;
mod registry;
mod systems;

#[cfg(test)]
mod tests;

pub use commands::*;
pub use engine::*;
pub use registry::*;

use {
    bevy::prelude::*,
    goal_assets::GoalComponentDef,
    goal_components::TargetedGoal,
    goals::GoalsAppExt,
    std::marker::PhantomData,
    systems::*,
};

/// Component placed on a tracked entity by one kind of targeted goal.
pub trait TargetMarker: Component + Default {}

/// Names a target for display. Receives the goal and the target.
pub type TargetNameFn = fn(&World, Entity, Entity) -> Option<String>;

pub struct TargetingPlugin;

impl Plugin for TargetingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TargetRegistry>()
            .init_resource::<TargetKinds>()
            .register_goal_installer(install_targeted_goal)
            .add_observer(detach_removed_goal);
    }
}

/// Wires goal kind `G` to marker `M`.
///
/// Goals carrying `G` attach `M` to their target, and removing `M` from an entity (or
/// despawning it) clears the target of every goal that relied on it.
pub struct TargetedGoalPlugin<G, M> {
    _marker: PhantomData<fn() -> (G, M)>,
}

impl<G, M> Default for TargetedGoalPlugin<G, M> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<G: Component, M: TargetMarker> Plugin for TargetedGoalPlugin<G, M> {
    fn build(&self, app: &mut App) {
        app.init_resource::<TargetRegistry>()
            .init_resource::<TargetKinds>();
        app.world_mut()
            .resource_mut::<TargetKinds>()
            .register::<G, M>();
        app.add_observer(release_removed_marker::<M>);
    }
}

pub trait TargetingAppExt {
    /// Refreshes every goal tracking an entity marked with `M` whenever `E` fires on it.
    fn refresh_targets_on<E: EntityEvent, M: TargetMarker>(&mut self) -> &mut Self;

    /// Overrides how targets of goals carrying `G` are named in rendered text.
    fn register_target_namer<G: Component>(&mut self, namer: TargetNameFn) -> &mut Self;
}

impl TargetingAppExt for App {
    fn refresh_targets_on<E: EntityEvent, M: TargetMarker>(&mut self) -> &mut Self {
        self.add_observer(refresh_marked_target::<E, M>)
    }

    fn register_target_namer<G: Component>(&mut self, namer: TargetNameFn) -> &mut Self {
        self.init_resource::<TargetKinds>();
        self.world_mut()
            .resource_mut::<TargetKinds>()
            .register_namer::<G>(namer);
        self
    }
}

fn install_targeted_goal(def: &GoalComponentDef, entity: &mut EntityWorldMut<'_>) -> bool {
    let GoalComponentDef::Targeted { title, description } = def else {
        return false;
    };

    entity.insert(TargetedGoal {
        title: title.clone(),
        description: description.clone(),
        ..default()
    });
    true
}
