use {
    crate::{ContainerState, GoalState, NetEntity, ObserverState, RecordKind, RecordState, StateDiff},
    bevy::{platform::collections::HashMap, prelude::*},
};

/// Diffs received from the authority, waiting to be applied.
#[derive(Resource, Default, Debug)]
pub struct ReplicationInbox(pub Vec<StateDiff>);

/// Read-only shadow of the goal records visible to this client.
#[derive(Resource, Default, Debug)]
pub struct GoalMirror {
    goals: HashMap<NetEntity, GoalState>,
    containers: HashMap<NetEntity, ContainerState>,
    observers: HashMap<NetEntity, ObserverState>,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct MirroredGoalChanged {
    pub entity: NetEntity,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct MirroredContainerChanged {
    pub entity: NetEntity,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct MirroredObserverChanged {
    pub entity: NetEntity,
}

impl GoalMirror {
    /// Replaces or drops one record. Returns `false` when nothing changed.
    pub fn apply(&mut self, diff: StateDiff) -> bool {
        let StateDiff {
            entity,
            kind,
            state,
        } = diff;

        match (kind, state) {
            (RecordKind::Goal, Some(RecordState::Goal(state))) => {
                self.goals.insert(entity, state.clone()) != Some(state)
            }
            (RecordKind::Container, Some(RecordState::Container(state))) => {
                self.containers.insert(entity, state.clone()) != Some(state)
            }
            (RecordKind::Observer, Some(RecordState::Observer(state))) => {
                self.observers.insert(entity, state.clone()) != Some(state)
            }
            (RecordKind::Goal, None) => self.goals.remove(&entity).is_some(),
            (RecordKind::Container, None) => self.containers.remove(&entity).is_some(),
            (RecordKind::Observer, None) => self.observers.remove(&entity).is_some(),
            (kind, Some(state)) => {
                debug!(?entity, ?kind, actual = ?state.kind(), "dropping mismatched state diff");
                false
            }
        }
    }

    pub fn goal(&self, entity: NetEntity) -> Option<&GoalState> {
        self.goals.get(&entity)
    }

    pub fn container(&self, entity: NetEntity) -> Option<&ContainerState> {
        self.containers.get(&entity)
    }

    pub fn observer(&self, entity: NetEntity) -> Option<&ObserverState> {
        self.observers.get(&entity)
    }

    /// Goals visible to `observer` as far as the mirror knows, in container then list order.
    pub fn goals(&self, observer: NetEntity) -> Vec<NetEntity> {
        let Some(record) = self.observers.get(&observer) else {
            return Vec::new();
        };

        record
            .observed
            .iter()
            .filter_map(|container| self.containers.get(container))
            .flat_map(|container| container.goals.iter().copied())
            .filter(|goal| self.goals.contains_key(goal))
            .collect()
    }
}

pub fn apply_inbound_state(
    mut inbox: ResMut<ReplicationInbox>,
    mut mirror: ResMut<GoalMirror>,
    mut commands: Commands,
) {
    for diff in inbox.0.drain(..) {
        let (entity, kind) = (diff.entity, diff.kind);
        if !mirror.apply(diff) {
            continue;
        }

        trace!(?entity, ?kind, "mirrored record changed");
        match kind {
            RecordKind::Goal => commands.trigger(MirroredGoalChanged { entity }),
            RecordKind::Container => commands.trigger(MirroredContainerChanged { entity }),
            RecordKind::Observer => commands.trigger(MirroredObserverChanged { entity }),
        }
    }
}
