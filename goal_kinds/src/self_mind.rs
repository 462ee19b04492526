use {
    bevy::prelude::*,
    goal_components::{GoalContainer, TargetedGoal},
    goal_events::GoalInserted,
    targeting::SetTarget,
};

/// Targets the owner of the individual container the goal is inserted into.
#[derive(Component, Reflect, Default, Debug, Clone, Copy)]
#[reflect(Component, Default)]
#[require(TargetedGoal)]
pub struct TargetSelfMindGoal;

pub struct SelfMindGoalPlugin;

impl Plugin for SelfMindGoalPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<TargetSelfMindGoal>()
            .add_observer(target_container_owner);
    }
}

fn target_container_owner(
    trigger: On<GoalInserted>,
    goals: Query<(), With<TargetSelfMindGoal>>,
    containers: Query<&GoalContainer>,
    mut commands: Commands,
) {
    let event = trigger.event();
    if !goals.contains(event.entity) {
        return;
    }

    let Some(owner) = containers
        .get(event.container)
        .ok()
        .and_then(|container| container.individual_owner)
    else {
        debug!(goal = ?event.entity, "self-targeting goal inserted into a shared container");
        return;
    };

    commands.queue(SetTarget {
        goal: event.entity,
        target: Some(owner),
    });
}
