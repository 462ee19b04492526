use {
    crate::{TargetKinds, TargetMarker, TargetRegistry, default_target_name},
    bevy::prelude::*,
    goal_components::{MarkerKind, TargetedGoal},
    goal_events::GoalTargetChanged,
    goals::{GoalsWorldExt, render_template, set_goal_text},
};

pub trait TargetingWorldExt {
    /// Points `goal` at `target`, moving its marker along, then refreshes progress and text.
    ///
    /// No-op when the goal is not targeted, the target is unchanged or `target` is not a
    /// live entity.
    fn set_target(&mut self, goal: Entity, target: Option<Entity>);

    /// Current target of a targeted goal.
    fn goal_target(&self, goal: Entity) -> Option<Entity>;

    /// Refreshes the progress of every goal tracking `target` through marker `kind`.
    fn refresh_marker_observers(&mut self, target: Entity, kind: MarkerKind);
}

impl TargetingWorldExt for World {
    fn set_target(&mut self, goal: Entity, target: Option<Entity>) {
        let Some(current) = self.get::<TargetedGoal>(goal) else {
            debug!(?goal, "cannot set target, goal is not targeted");
            return;
        };
        if current.target == target {
            return;
        }
        let (old, old_kind) = (current.target, current.target_kind);

        if let Some(new) = target
            && self.get_entity(new).is_err()
        {
            debug!(?goal, target = ?new, "cannot set target, entity does not exist");
            return;
        }

        let world: &World = self;
        let new_kind = target.and_then(|_| {
            world
                .get_resource::<TargetKinds>()
                .and_then(|kinds| kinds.marker_for(world, goal))
        });

        if let (Some(old), Some(kind)) = (old, old_kind) {
            detach_from_marker(self, goal, old, kind);
        }
        if let (Some(new), Some(kind)) = (target, new_kind) {
            attach_to_marker(self, goal, new, kind);
        }

        if let Some(mut record) = self.get_mut::<TargetedGoal>(goal) {
            record.target = target;
            record.target_kind = new_kind;
        }

        debug!(?goal, ?old, new = ?target, "goal target changed");
        self.trigger(GoalTargetChanged {
            entity: goal,
            old,
            new: target,
        });
        self.flush();

        self.refresh_progress(goal);
        render_targeted_text(self, goal);
    }

    fn goal_target(&self, goal: Entity) -> Option<Entity> {
        self.get::<TargetedGoal>(goal)?.target
    }

    fn refresh_marker_observers(&mut self, target: Entity, kind: MarkerKind) {
        let goals = self
            .get_resource::<TargetRegistry>()
            .map(|registry| registry.observers(target, kind).to_vec())
            .unwrap_or_default();

        trace!(?target, %kind, goals = goals.len(), "refreshing goals tracking target");
        for goal in goals {
            self.refresh_progress(goal);
        }
    }
}

/// Target of `goal` if it is currently tracked through marker `M`.
pub fn marked_target<M: TargetMarker>(world: &World, goal: Entity) -> Option<Entity> {
    let record = world.get::<TargetedGoal>(goal)?;
    if record.target_kind != Some(MarkerKind::of::<M>()) {
        return None;
    }
    record.target
}

pub(crate) fn attach_to_marker(world: &mut World, goal: Entity, target: Entity, kind: MarkerKind) {
    let Some(hooks) = world
        .get_resource::<TargetKinds>()
        .and_then(|kinds| kinds.hooks(kind))
    else {
        return;
    };
    let Some(mut registry) = world.get_resource_mut::<TargetRegistry>() else {
        return;
    };

    if registry.attach(target, kind, goal) {
        trace!(?target, %kind, "marking target");
    }
    (hooks.ensure)(world, target);
}

pub(crate) fn detach_from_marker(world: &mut World, goal: Entity, target: Entity, kind: MarkerKind) {
    let Some(mut registry) = world.get_resource_mut::<TargetRegistry>() else {
        return;
    };
    if !registry.detach(target, kind, goal) {
        return;
    }

    trace!(?target, %kind, "last goal detached, unmarking target");
    if let Some(hooks) = world
        .get_resource::<TargetKinds>()
        .and_then(|kinds| kinds.hooks(kind))
    {
        (hooks.remove)(world, target);
    }
}

fn render_targeted_text(world: &mut World, goal: Entity) {
    let Some(record) = world.get::<TargetedGoal>(goal) else {
        return;
    };
    let Some(target) = record.target else {
        return;
    };
    if record.title.is_none() && record.description.is_none() {
        return;
    }

    let target_name = match world.get_resource::<TargetKinds>() {
        Some(kinds) => kinds.name_target(world, goal, target),
        None => default_target_name(world, target),
    };
    let target_id = format!("{target:?}");
    let args = [("target", target_id.as_str()), ("targetName", target_name.as_str())];
    let title = record.title.as_deref().map(|t| render_template(t, &args));
    let description = record.description.as_deref().map(|d| render_template(d, &args));

    set_goal_text(world, goal, title, description);
}
