use {
    bevy::prelude::*,
    goal_assets::GoalCatalog,
    goal_components::NumericGoal,
    goal_events::GrantIndividualGoals,
    goal_kinds::TargetSurvivesGoal,
    goals::{GoalsCommand, GoalsWorldExt},
    numeric_goals::NumericGoalsWorldExt,
    replication::ReplicationOutbox,
    world_components::{
        MobState, SessionId, WarpPoint, attach_player, change_mob_state, spawn_mind_with_body,
    },
};

const DEMO_SESSION: SessionId = SessionId(1);
const STARTER_TABLE: &str = "starter";

#[derive(Resource, Default, Debug)]
pub struct DemoCrew {
    mind: Option<Entity>,
    body: Option<Entity>,
    granted: bool,
    frame: u32,
}

pub fn spawn_demo_crew(world: &mut World) {
    info!("spawning demo crew");
    for (location, tags) in [
        ("Bar", vec!["service"]),
        ("Bridge", vec!["command"]),
        ("Vault", vec!["restricted"]),
    ] {
        world.spawn((
            WarpPoint {
                location: Some(location.to_string()),
                tags: tags.into_iter().map(str::to_string).collect(),
            },
            Name::new(format!("Warp point ({location})")),
        ));
    }

    let (mind, body) = spawn_mind_with_body(world, "Urist McCrew");
    attach_player(world, mind, DEMO_SESSION);

    let mut crew = world.resource_mut::<DemoCrew>();
    crew.mind = Some(mind);
    crew.body = Some(body);
}

/// Hands out the starter table once it finished loading.
pub fn grant_starter_goals(
    mut crew: ResMut<DemoCrew>,
    catalog: Res<GoalCatalog>,
    mut commands: Commands,
) {
    if crew.granted || catalog.table(STARTER_TABLE).is_none() {
        return;
    }
    let Some(mind) = crew.mind else {
        return;
    };

    info!(table = STARTER_TABLE, "granting starter goals");
    commands.trigger(GrantIndividualGoals {
        entity: mind,
        table: STARTER_TABLE.to_string(),
    });
    crew.granted = true;
}

/// Plays a short script against the granted goals and prints the goal listing.
pub fn advance_demo(world: &mut World) {
    let (mind, body, frame) = {
        let mut crew = world.resource_mut::<DemoCrew>();
        if !crew.granted {
            return;
        }
        crew.frame += 1;
        let (Some(mind), Some(body)) = (crew.mind, crew.body) else {
            return;
        };
        (mind, body, crew.frame)
    };

    match frame {
        10 | 20 => {
            for goal in world.goals_with::<NumericGoal>(mind) {
                world.change_current(goal, 2.0);
            }
        }
        30 => change_mob_state(world, body, MobState::Dead),
        40 => change_mob_state(world, body, MobState::Alive),
        _ => {}
    }

    if frame % 10 == 0 {
        let listing = GoalsCommand::Get { observer: mind }.execute(world);
        info!(frame, "goals of the demo crew:\n{listing}");

        let survive_goals = world.goals_with::<TargetSurvivesGoal>(mind).len();
        let diffs = world
            .resource_mut::<ReplicationOutbox>()
            .drain(DEMO_SESSION)
            .len();
        debug!(frame, survive_goals, diffs, "demo tick");
    }
}
