use {
    crate::{TargetMarker, TargetNameFn},
    bevy::{platform::collections::HashMap, prelude::*},
    goal_components::MarkerKind,
};

/// Side table of which goals track which target, per marker kind.
///
/// An entry exists exactly while its marker component is on the target.
#[derive(Resource, Default, Debug)]
pub struct TargetRegistry {
    observers: HashMap<(Entity, MarkerKind), Vec<Entity>>,
}

impl TargetRegistry {
    /// Goals tracking `target` through marker `kind`, in attach order.
    pub fn observers(&self, target: Entity, kind: MarkerKind) -> &[Entity] {
        self.observers
            .get(&(target, kind))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_marked(&self, target: Entity, kind: MarkerKind) -> bool {
        self.observers.contains_key(&(target, kind))
    }

    /// Number of live markers across all targets.
    pub fn marker_count(&self) -> usize {
        self.observers.len()
    }

    /// Returns `true` when this created the entry.
    pub(crate) fn attach(&mut self, target: Entity, kind: MarkerKind, goal: Entity) -> bool {
        let mut created = false;
        let goals = self.observers.entry((target, kind)).or_insert_with(|| {
            created = true;
            Vec::new()
        });
        if !goals.contains(&goal) {
            goals.push(goal);
        }
        created
    }

    /// Returns `true` when this emptied and dropped the entry.
    pub(crate) fn detach(&mut self, target: Entity, kind: MarkerKind, goal: Entity) -> bool {
        let Some(goals) = self.observers.get_mut(&(target, kind)) else {
            return false;
        };

        goals.retain(|g| *g != goal);
        if goals.is_empty() {
            self.observers.remove(&(target, kind));
            return true;
        }
        false
    }

    /// Drops the entry without touching the marker component.
    pub(crate) fn take(&mut self, target: Entity, kind: MarkerKind) -> Vec<Entity> {
        self.observers.remove(&(target, kind)).unwrap_or_default()
    }
}

struct GoalKindEntry {
    goal_kind: &'static str,
    applies: fn(&World, Entity) -> bool,
    marker: MarkerKind,
}

#[derive(Clone, Copy)]
pub(crate) struct MarkerHooks {
    pub ensure: fn(&mut World, Entity),
    pub remove: fn(&mut World, Entity),
}

struct NamerEntry {
    applies: fn(&World, Entity) -> bool,
    name: TargetNameFn,
}

/// Which marker each targeted goal kind uses, and how to add, remove and name it.
#[derive(Resource, Default)]
pub struct TargetKinds {
    goal_kinds: Vec<GoalKindEntry>,
    markers: HashMap<MarkerKind, MarkerHooks>,
    namers: Vec<NamerEntry>,
}

impl TargetKinds {
    pub fn register<G: Component, M: TargetMarker>(&mut self) {
        let marker = MarkerKind::of::<M>();
        let goal_kind = std::any::type_name::<G>();
        debug!(goal_kind, %marker, "registered targeted goal kind");

        self.goal_kinds.push(GoalKindEntry {
            goal_kind,
            applies: has_component::<G>,
            marker,
        });
        self.markers.insert(
            marker,
            MarkerHooks {
                ensure: ensure_marker::<M>,
                remove: remove_marker::<M>,
            },
        );
    }

    pub fn register_namer<G: Component>(&mut self, name: TargetNameFn) {
        self.namers.push(NamerEntry {
            applies: has_component::<G>,
            name,
        });
    }

    /// The marker kind a goal attaches to its target. With several matching kinds the
    /// first registered wins.
    pub fn marker_for(&self, world: &World, goal: Entity) -> Option<MarkerKind> {
        let mut matching = self.goal_kinds.iter().filter(|k| (k.applies)(world, goal));
        let first = matching.next()?;
        for other in matching {
            warn!(
                ?goal,
                used = first.goal_kind,
                ignored = other.goal_kind,
                "goal matches several targeted goal kinds"
            );
        }
        Some(first.marker)
    }

    pub(crate) fn hooks(&self, kind: MarkerKind) -> Option<MarkerHooks> {
        self.markers.get(&kind).copied()
    }

    /// Display name of `target` as seen by `goal`. Falls back to the target's [`Name`].
    pub fn name_target(&self, world: &World, goal: Entity, target: Entity) -> String {
        self.namers
            .iter()
            .filter(|n| (n.applies)(world, goal))
            .find_map(|n| (n.name)(world, goal, target))
            .unwrap_or_else(|| default_target_name(world, target))
    }
}

pub fn default_target_name(world: &World, target: Entity) -> String {
    world
        .get::<Name>(target)
        .map(|name| name.as_str().to_owned())
        .unwrap_or_else(|| format!("{target:?}"))
}

fn has_component<C: Component>(world: &World, entity: Entity) -> bool {
    world.get::<C>(entity).is_some()
}

fn ensure_marker<M: TargetMarker>(world: &mut World, target: Entity) {
    if let Ok(mut entity) = world.get_entity_mut(target)
        && !entity.contains::<M>()
    {
        entity.insert(M::default());
    }
}

fn remove_marker<M: TargetMarker>(world: &mut World, target: Entity) {
    if let Ok(mut entity) = world.get_entity_mut(target) {
        entity.remove::<M>();
    }
}
