use {
    crate::GrantGoalTable,
    bevy::prelude::*,
    goal_components::{Goal, GoalContainer, GoalContainerObserver},
    goal_events::GrantIndividualGoals,
    goal_resources::ViewSubscriptions,
    world_components::{PlayerAttached, PlayerDetached},
};

/// Keeps container membership in sync when a goal goes away.
pub(crate) fn remove_goal_from_container(
    trigger: On<Remove, Goal>,
    goals: Query<&Goal>,
    mut containers: Query<&mut GoalContainer>,
) {
    let goal = trigger.event().entity;
    let Ok(record) = goals.get(goal) else {
        return;
    };
    let Ok(mut container) = containers.get_mut(record.container) else {
        return;
    };

    container.goals.retain(|g| *g != goal);
    trace!(?goal, container = ?record.container, "removed goal from container");
}

/// Drops every reference observers and subscriptions hold to a removed container.
///
/// Goals are not despawned with their container; they stay alive pointing at it.
pub(crate) fn release_removed_container(
    trigger: On<Remove, GoalContainer>,
    containers: Query<&GoalContainer>,
    mut observers: Query<(Entity, &mut GoalContainerObserver)>,
    mut subscriptions: ResMut<ViewSubscriptions>,
) {
    let container = trigger.event().entity;
    if let Ok(record) = containers.get(container)
        && !record.goals.is_empty()
    {
        warn!(
            ?container,
            goals = record.goals.len(),
            "goal container removed while still holding goals"
        );
    }

    for (observer, mut record) in &mut observers {
        if record.observed.contains(&container) {
            record.observed.retain(|c| *c != container);
            trace!(?observer, ?container, "observer lost removed container");
        }
        if record.owned_container == Some(container) {
            record.owned_container = None;
        }
    }

    subscriptions.forget_container(container);
}

pub(crate) fn subscribe_attached_player(
    trigger: On<PlayerAttached>,
    observers: Query<&GoalContainerObserver>,
    mut subscriptions: ResMut<ViewSubscriptions>,
) {
    let event = trigger.event();
    let Ok(record) = observers.get(event.entity) else {
        return;
    };

    for container in &record.observed {
        subscriptions.add(*container, event.session);
    }
    debug!(mind = ?event.entity, session = ?event.session, "subscribed player to observed containers");
}

pub(crate) fn unsubscribe_detached_player(
    trigger: On<PlayerDetached>,
    observers: Query<&GoalContainerObserver>,
    mut subscriptions: ResMut<ViewSubscriptions>,
) {
    let event = trigger.event();
    let Ok(record) = observers.get(event.entity) else {
        return;
    };

    for container in &record.observed {
        subscriptions.remove(*container, event.session);
    }
    debug!(mind = ?event.entity, session = ?event.session, "unsubscribed player from observed containers");
}

pub(crate) fn grant_individual_goals(trigger: On<GrantIndividualGoals>, mut commands: Commands) {
    let event = trigger.event();
    commands.queue(GrantGoalTable {
        mind: event.entity,
        table: event.table.clone(),
    });
}
