use {
    bevy::prelude::*,
    goal_components::TargetedGoal,
    goals::GoalsAppExt,
    targeting::{TargetMarker, TargetedGoalPlugin, TargetingAppExt, marked_target},
    world_components::{Mind, MindMobStateChanged, is_character_dead},
};

/// Complete while the targeted mind is alive in character.
#[derive(Component, Reflect, Default, Debug, Clone, Copy)]
#[reflect(Component, Default)]
#[require(TargetedGoal)]
pub struct TargetSurvivesGoal;

/// Placed on minds tracked by a [`TargetSurvivesGoal`].
#[derive(Component, Reflect, Default, Debug, Clone, Copy)]
#[reflect(Component, Default)]
pub struct TargetedSurvives;

impl TargetMarker for TargetedSurvives {}

pub struct SurvivesGoalPlugin;

impl Plugin for SurvivesGoalPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<TargetSurvivesGoal>()
            .register_type::<TargetedSurvives>()
            .add_plugins(TargetedGoalPlugin::<TargetSurvivesGoal, TargetedSurvives>::default())
            .register_progress_strategy::<TargetSurvivesGoal>(survives_progress)
            .refresh_targets_on::<MindMobStateChanged, TargetedSurvives>();
    }
}

fn survives_progress(world: &World, goal: Entity) -> Option<f64> {
    let target = marked_target::<TargetedSurvives>(world, goal)?;
    let mind = world.get::<Mind>(target)?;
    Some(if is_character_dead(world, mind) { 0.0 } else { 1.0 })
}
