//! Minimal contracts of the simulated world the goal engine reads from.
//!
//! Minds, bodies, player sessions and warp points are owned by other systems; this crate only
//! carries the pieces goal kinds depend on.

use bevy::prelude::*;

pub struct WorldComponentsPlugin;

impl Plugin for WorldComponentsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Mind>()
            .register_type::<MindContainer>()
            .register_type::<MobState>()
            .register_type::<WarpPoint>()
            .add_observer(relay_mob_state_to_mind);
    }
}

/// Identifies a connected player session.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u32);

/// A player's mind. Survives body swaps and is the entity goals are assigned to.
#[derive(Component, Reflect, Default, Debug, Clone)]
#[reflect(Component, Default)]
pub struct Mind {
    /// The body this mind currently controls.
    pub body: Option<Entity>,
    /// The session playing this mind, if any.
    pub session: Option<SessionId>,
}

/// Back-reference from a body to the mind controlling it.
#[derive(Component, Reflect, Default, Debug, Clone)]
#[reflect(Component, Default)]
pub struct MindContainer {
    pub mind: Option<Entity>,
}

#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub enum MobState {
    #[default]
    Alive,
    Critical,
    Dead,
}

/// A named location on the station.
#[derive(Component, Reflect, Default, Debug, Clone)]
#[reflect(Component, Default)]
pub struct WarpPoint {
    /// Display name of the location. Warp points without one are not valid goal targets.
    pub location: Option<String>,
    pub tags: Vec<String>,
}

/// Triggered on a body when its mob state changes.
#[derive(EntityEvent, Debug, Clone, Copy)]
pub struct MobStateChanged {
    pub entity: Entity,
    pub old: MobState,
    pub new: MobState,
}

/// [`MobStateChanged`] relayed onto the mind controlling the body.
#[derive(EntityEvent, Debug, Clone, Copy)]
pub struct MindMobStateChanged {
    pub entity: Entity,
    pub old: MobState,
    pub new: MobState,
}

/// Triggered on a mind when a player session attaches to it.
#[derive(EntityEvent, Debug, Clone, Copy)]
pub struct PlayerAttached {
    pub entity: Entity,
    pub session: SessionId,
}

/// Triggered on a mind when a player session detaches from it.
#[derive(EntityEvent, Debug, Clone, Copy)]
pub struct PlayerDetached {
    pub entity: Entity,
    pub session: SessionId,
}

fn relay_mob_state_to_mind(
    trigger: On<MobStateChanged>,
    bodies: Query<&MindContainer>,
    mut commands: Commands,
) {
    let event = trigger.event();
    let Some(mind) = bodies.get(event.entity).ok().and_then(|c| c.mind) else {
        return;
    };

    trace!(body = ?event.entity, ?mind, new = ?event.new, "relaying mob state to mind");
    commands.trigger(MindMobStateChanged {
        entity: mind,
        old: event.old,
        new: event.new,
    });
}

/// Spawns a mind controlling a fresh body and links both directions.
pub fn spawn_mind_with_body(world: &mut World, name: &str) -> (Entity, Entity) {
    let mind = world.spawn((Mind::default(), Name::new(format!("{name} (mind)")))).id();
    let body = world
        .spawn((
            MobState::Alive,
            MindContainer { mind: Some(mind) },
            Name::new(name.to_string()),
        ))
        .id();

    if let Some(mut comp) = world.get_mut::<Mind>(mind) {
        comp.body = Some(body);
    }
    (mind, body)
}

/// Changes the mob state of a body and notifies everything depending on it.
pub fn change_mob_state(world: &mut World, body: Entity, state: MobState) {
    let old = {
        let Some(mut current) = world.get_mut::<MobState>(body) else {
            return;
        };
        let old = *current;
        if old == state {
            return;
        }
        *current = state;
        old
    };

    world.trigger(MobStateChanged {
        entity: body,
        old,
        new: state,
    });
    world.flush();
}

/// A mind counts as dead in character when it has no body or its body is dead.
pub fn is_character_dead(world: &World, mind: &Mind) -> bool {
    let Some(body) = mind.body else {
        return true;
    };

    matches!(world.get::<MobState>(body), Some(MobState::Dead))
}

pub fn attach_player(world: &mut World, mind: Entity, session: SessionId) {
    match world.get_mut::<Mind>(mind) {
        Some(mut comp) => comp.session = Some(session),
        None => return,
    }

    world.trigger(PlayerAttached {
        entity: mind,
        session,
    });
    world.flush();
}

pub fn detach_player(world: &mut World, mind: Entity) {
    let Some(session) = world.get_mut::<Mind>(mind).and_then(|mut comp| comp.session.take()) else {
        return;
    };

    world.trigger(PlayerDetached {
        entity: mind,
        session,
    });
    world.flush();
}
