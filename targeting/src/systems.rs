use {
    crate::{DetachTarget, RefreshMarkerObservers, SetTarget, TargetMarker, TargetRegistry},
    bevy::prelude::*,
    goal_components::{MarkerKind, TargetedGoal},
};

/// The marker left its target: every goal relying on it loses the target.
pub(crate) fn release_removed_marker<M: TargetMarker>(
    trigger: On<Remove, M>,
    mut registry: ResMut<TargetRegistry>,
    mut commands: Commands,
) {
    let target = trigger.event().entity;
    let kind = MarkerKind::of::<M>();
    let goals = registry.take(target, kind);
    if goals.is_empty() {
        return;
    }

    debug!(?target, %kind, goals = goals.len(), "target lost its marker, clearing goal targets");
    for goal in goals {
        commands.queue(SetTarget { goal, target: None });
    }
}

pub(crate) fn detach_removed_goal(
    trigger: On<Remove, TargetedGoal>,
    goals: Query<&TargetedGoal>,
    mut commands: Commands,
) {
    let goal = trigger.event().entity;
    let Ok(record) = goals.get(goal) else {
        return;
    };

    if let (Some(target), Some(kind)) = (record.target, record.target_kind) {
        commands.queue(DetachTarget { goal, target, kind });
    }
}

pub(crate) fn refresh_marked_target<E: EntityEvent, M: TargetMarker>(
    trigger: On<E>,
    marked: Query<(), With<M>>,
    mut commands: Commands,
) {
    let target = trigger.event().event_target();
    if !marked.contains(target) {
        return;
    }

    commands.queue(RefreshMarkerObservers {
        target,
        kind: MarkerKind::of::<M>(),
    });
}
