use {
    crate::{TargetingWorldExt, detach_from_marker},
    bevy::prelude::*,
    goal_components::MarkerKind,
};

/// Deferred [`TargetingWorldExt::set_target`].
#[derive(Debug, Clone, Copy)]
pub struct SetTarget {
    pub goal: Entity,
    pub target: Option<Entity>,
}

impl Command for SetTarget {
    fn apply(self, world: &mut World) {
        world.set_target(self.goal, self.target);
    }
}

/// Releases the marker reference of a goal that is going away.
#[derive(Debug, Clone, Copy)]
pub struct DetachTarget {
    pub goal: Entity,
    pub target: Entity,
    pub kind: MarkerKind,
}

impl Command for DetachTarget {
    fn apply(self, world: &mut World) {
        detach_from_marker(world, self.goal, self.target, self.kind);
    }
}

/// Deferred [`TargetingWorldExt::refresh_marker_observers`].
#[derive(Debug, Clone, Copy)]
pub struct RefreshMarkerObservers {
    pub target: Entity,
    pub kind: MarkerKind,
}

impl Command for RefreshMarkerObservers {
    fn apply(self, world: &mut World) {
        world.refresh_marker_observers(self.target, self.kind);
    }
}
