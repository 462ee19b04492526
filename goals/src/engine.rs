use {
    crate::{GoalInstallers, PROGRESS_EPSILON, ProgressStrategies},
    bevy::prelude::*,
    goal_assets::{GoalCatalog, GoalSelector},
    goal_components::{Goal, GoalContainer, GoalContainerObserver, GoalDescription, GoalPrototype},
    goal_events::{GoalInserted, GoalProgressChanged},
    goal_resources::{GoalRng, ViewSubscriptions},
    world_components::Mind,
};

/// Goals engine operations.
///
/// Every operation runs to completion before returning: notifications it raises and the
/// commands queued by their observers are flushed, so dependent state (targets, progress,
/// rendered text) is already up to date for the caller. Invalid references fail closed
/// with `false`, `None` or an empty list.
pub trait GoalsWorldExt {
    /// Spawns an empty, unowned container. `name` is only used for diagnostics.
    fn spawn_goal_container(&mut self, name: &str) -> Entity;

    /// Spawns a goal from the catalog definition `kind` into `container`.
    fn try_add_goal(&mut self, container: Entity, kind: &str) -> Option<Entity>;

    /// Spawns a goal made of `bundle` into `container`.
    ///
    /// A [`Goal`] inside the bundle is accepted (to carry an icon) but its `container` is
    /// always overwritten.
    fn try_add_goal_with(&mut self, container: Entity, bundle: impl Bundle) -> Option<Entity>;

    /// Resolves `selector` and adds every resulting goal kind. Stops at the first failure;
    /// goals added before it stay.
    fn try_add_goals(&mut self, container: Entity, selector: &GoalSelector) -> bool;

    /// [`GoalsWorldExt::try_add_goals`] with a goal table from the catalog.
    fn try_add_goals_from(&mut self, container: Entity, table: &str) -> bool;

    fn observe_container(&mut self, observer: Entity, container: Entity);

    fn unobserve_container(&mut self, observer: Entity, container: Entity);

    fn is_observing_container(&self, observer: Entity, container: Entity) -> bool;

    /// The personal container of `observer`, created and observed on first use.
    fn individual_goal_container(&mut self, observer: Entity) -> Option<Entity>;

    fn individual_goal_owner(&self, container: Entity) -> Option<Entity>;

    /// Goals of every observed container, container order first, then insertion order.
    fn goals(&self, observer: Entity) -> Vec<Entity>;

    /// [`GoalsWorldExt::goals`] restricted to goals carrying `T`.
    fn goals_with<T: Component>(&self, observer: Entity) -> Vec<Entity>;

    /// Recomputes and stores the progress of `goal`.
    fn refresh_progress(&mut self, goal: Entity);
}

impl GoalsWorldExt for World {
    fn spawn_goal_container(&mut self, name: &str) -> Entity {
        let container = self
            .spawn((
                GoalContainer::default(),
                Name::new(format!("Goals container - {name}")),
            ))
            .id();

        debug!(?container, name, "spawned goal container");
        container
    }

    fn try_add_goal(&mut self, container: Entity, kind: &str) -> Option<Entity> {
        if self.get::<GoalContainer>(container).is_none() {
            debug!(?container, kind, "cannot add goal, not a goal container");
            return None;
        }

        let Some(definition) = self
            .get_resource::<GoalCatalog>()
            .and_then(|catalog| catalog.definition(kind))
            .cloned()
        else {
            warn!(kind, "unknown goal kind");
            return None;
        };

        let installers = self
            .get_resource::<GoalInstallers>()
            .map(|i| i.installers().to_vec())
            .unwrap_or_default();

        let mut record = Goal::new(container);
        record.icon = definition.icon.clone();
        let mut entity = self.spawn((record, GoalPrototype(definition.id.clone())));
        if let Some(name) = &definition.name {
            entity.insert(Name::new(name.clone()));
        }
        if let Some(description) = &definition.description {
            entity.insert(GoalDescription(description.clone()));
        }

        for component in &definition.components {
            if !installers.iter().any(|install| install(component, &mut entity)) {
                warn!(kind, ?component, "no installer for goal component");
            }
        }

        let goal = entity.id();
        insert_into_container(self, container, goal)
    }

    fn try_add_goal_with(&mut self, container: Entity, bundle: impl Bundle) -> Option<Entity> {
        if self.get::<GoalContainer>(container).is_none() {
            debug!(?container, "cannot add goal, not a goal container");
            return None;
        }

        let mut entity = self.spawn(Goal::new(container));
        entity.insert(bundle);
        if let Some(mut record) = entity.get_mut::<Goal>() {
            record.container = container;
        }

        let goal = entity.id();
        insert_into_container(self, container, goal)
    }

    fn try_add_goals(&mut self, container: Entity, selector: &GoalSelector) -> bool {
        let Some(mut rng) = self.get_resource_mut::<GoalRng>() else {
            return false;
        };
        let kinds = selector.resolve(&mut rng.0);

        trace!(?container, ?kinds, "adding goal batch");
        kinds
            .iter()
            .all(|kind| self.try_add_goal(container, kind).is_some())
    }

    fn try_add_goals_from(&mut self, container: Entity, table: &str) -> bool {
        let Some(selector) = self
            .get_resource::<GoalCatalog>()
            .and_then(|catalog| catalog.table(table))
            .cloned()
        else {
            warn!(table, "unknown goal table");
            return false;
        };

        self.try_add_goals(container, &selector)
    }

    fn observe_container(&mut self, observer: Entity, container: Entity) {
        if self.get::<GoalContainer>(container).is_none() {
            return;
        }

        {
            let Some(mut record) = self.get_mut::<GoalContainerObserver>(observer) else {
                return;
            };
            if record.observed.contains(&container) {
                return;
            }
            record.observed.push(container);
        }

        debug!(?observer, ?container, "observing goal container");
        let session = self.get::<Mind>(observer).and_then(|mind| mind.session);
        if let Some(session) = session
            && let Some(mut subscriptions) = self.get_resource_mut::<ViewSubscriptions>()
        {
            subscriptions.add(container, session);
        }
    }

    fn unobserve_container(&mut self, observer: Entity, container: Entity) {
        if self.get::<GoalContainer>(container).is_none() {
            return;
        }

        {
            let Some(mut record) = self.get_mut::<GoalContainerObserver>(observer) else {
                return;
            };
            if !record.observed.contains(&container) {
                return;
            }
            record.observed.retain(|c| *c != container);
        }

        debug!(?observer, ?container, "stopped observing goal container");
        let session = self.get::<Mind>(observer).and_then(|mind| mind.session);
        if let Some(session) = session
            && let Some(mut subscriptions) = self.get_resource_mut::<ViewSubscriptions>()
        {
            subscriptions.remove(container, session);
        }
    }

    fn is_observing_container(&self, observer: Entity, container: Entity) -> bool {
        self.get::<GoalContainer>(container).is_some()
            && self
                .get::<GoalContainerObserver>(observer)
                .is_some_and(|record| record.observed.contains(&container))
    }

    fn individual_goal_container(&mut self, observer: Entity) -> Option<Entity> {
        let owned = self.get::<GoalContainerObserver>(observer)?.owned_container;
        if let Some(owned) = owned {
            return Some(owned);
        }

        let name = self
            .get::<Name>(observer)
            .map(|name| name.as_str().to_owned())
            .unwrap_or_else(|| format!("{observer:?}"));
        let container = self.spawn_goal_container(&name);
        self.get_mut::<GoalContainer>(container)?.individual_owner = Some(observer);
        self.get_mut::<GoalContainerObserver>(observer)?.owned_container = Some(container);
        self.observe_container(observer, container);

        debug!(?observer, ?container, "created individual goal container");
        Some(container)
    }

    fn individual_goal_owner(&self, container: Entity) -> Option<Entity> {
        self.get::<GoalContainer>(container)?.individual_owner
    }

    fn goals(&self, observer: Entity) -> Vec<Entity> {
        self.goals_with::<Goal>(observer)
    }

    fn goals_with<T: Component>(&self, observer: Entity) -> Vec<Entity> {
        let Some(record) = self.get::<GoalContainerObserver>(observer) else {
            return Vec::new();
        };

        record
            .observed
            .iter()
            .filter_map(|container| self.get::<GoalContainer>(*container))
            .flat_map(|container| container.goals.iter().copied())
            .filter(|goal| self.get::<T>(*goal).is_some())
            .collect()
    }

    fn refresh_progress(&mut self, goal: Entity) {
        let Some(old) = self.get::<Goal>(goal).map(|record| record.progress) else {
            return;
        };

        let world: &World = self;
        let raw = world
            .get_resource::<ProgressStrategies>()
            .and_then(|strategies| strategies.compute(world, goal))
            .unwrap_or(0.0);
        if raw.is_nan() {
            warn!(?goal, "progress strategy produced NaN, keeping previous progress");
            return;
        }

        let new = raw.clamp(0.0, 1.0);
        if (new - old).abs() <= PROGRESS_EPSILON {
            return;
        }

        if let Some(mut record) = self.get_mut::<Goal>(goal) {
            record.progress = new;
        }

        trace!(?goal, old, new, "goal progress changed");
        self.trigger(GoalProgressChanged {
            entity: goal,
            old,
            new,
        });
        self.flush();
    }
}

fn insert_into_container(world: &mut World, container: Entity, goal: Entity) -> Option<Entity> {
    let Some(mut record) = world.get_mut::<GoalContainer>(container) else {
        world.despawn(goal);
        return None;
    };
    record.goals.push(goal);

    debug!(?goal, ?container, "inserted goal");
    world.trigger(GoalInserted {
        entity: goal,
        container,
    });
    world.flush();
    Some(goal)
}
