use {
    bevy::{
        platform::collections::{HashMap, HashSet},
        prelude::*,
    },
    rand::{SeedableRng, rngs::StdRng},
    world_components::SessionId,
};

/// Which sessions may see the goals of which container.
///
/// Written by the goals engine when minds observe or stop observing containers and when
/// players attach to or leave minds. Read by replication to route container and goal state.
#[derive(Resource, Default, Debug)]
pub struct ViewSubscriptions {
    subscribers: HashMap<Entity, HashSet<SessionId>>,
}

impl ViewSubscriptions {
    /// Returns `true` if the session was not subscribed yet.
    pub fn add(&mut self, container: Entity, session: SessionId) -> bool {
        self.subscribers
            .entry(container)
            .or_default()
            .insert(session)
    }

    /// Returns `true` if the session was subscribed.
    pub fn remove(&mut self, container: Entity, session: SessionId) -> bool {
        let Some(sessions) = self.subscribers.get_mut(&container) else {
            return false;
        };

        let removed = sessions.remove(&session);
        if sessions.is_empty() {
            self.subscribers.remove(&container);
        }
        removed
    }

    pub fn forget_container(&mut self, container: Entity) {
        self.subscribers.remove(&container);
    }

    pub fn is_subscribed(&self, container: Entity, session: SessionId) -> bool {
        self.subscribers
            .get(&container)
            .is_some_and(|sessions| sessions.contains(&session))
    }

    /// Containers visible to a session.
    pub fn visible_to(&self, session: SessionId) -> impl Iterator<Item = Entity> + '_ {
        self.subscribers
            .iter()
            .filter(move |(_, sessions)| sessions.contains(&session))
            .map(|(container, _)| *container)
    }

    /// Every session subscribed to at least one container.
    pub fn sessions(&self) -> HashSet<SessionId> {
        self.subscribers.values().flatten().copied().collect()
    }
}

/// Random source for goal setup (numeric targets, table rolls, target picks).
#[derive(Resource)]
pub struct GoalRng(pub StdRng);

impl GoalRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for GoalRng {
    fn default() -> Self {
        Self(StdRng::from_os_rng())
    }
}
