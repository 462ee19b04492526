use {
    bevy::prelude::*,
    goal_assets::{GoalCatalog, GoalComponentDef, GoalDefinition, GoalSelector},
    goal_components::{Goal, GoalContainer, GoalContainerObserver, NumericGoal, TargetedGoal},
    goal_events::GrantIndividualGoals,
    goal_kinds::*,
    goal_resources::GoalRng,
    goals::{GoalsPlugin, GoalsWorldExt},
    numeric_goals::{NumericGoalsPlugin, NumericGoalsWorldExt},
    targeting::{TargetRegistry, TargetingPlugin, TargetingWorldExt},
    world_components::{
        MobState, WarpPoint, WorldComponentsPlugin, change_mob_state, spawn_mind_with_body,
    },
};

fn setup_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        WorldComponentsPlugin,
        GoalsPlugin,
        TargetingPlugin,
        NumericGoalsPlugin,
        GoalKindsPlugin,
    ))
    .insert_resource(GoalRng::seeded(11));

    let mut catalog = app.world_mut().resource_mut::<GoalCatalog>();
    catalog.insert_definition(GoalDefinition::new("BlankGoal"));
    catalog.insert_definition(
        GoalDefinition::new("survive")
            .with_component(GoalComponentDef::Targeted {
                title: Some("Keep {targetName} alive".into()),
                description: None,
            })
            .with_component(GoalComponentDef::TargetSelfMind)
            .with_component(GoalComponentDef::TargetSurvives),
    );
    catalog.insert_definition(
        GoalDefinition::new("visit")
            .with_component(GoalComponentDef::Targeted {
                title: Some("Visit {targetName}".into()),
                description: Some("Spend some time at {targetName}.".into()),
            })
            .with_component(GoalComponentDef::TargetWarpPoint {
                blacklist: vec!["restricted".into()],
            }),
    );
    catalog.insert_definition(GoalDefinition::new("deliver").with_component(
        GoalComponentDef::Numeric {
            target: 10.0,
            target_range: None,
            resolution: 1.0,
            title: None,
            description: None,
        },
    ));
    catalog.insert_table(
        "personal",
        GoalSelector::All(vec![GoalSelector::goal("survive"), GoalSelector::goal("deliver")]),
    );
    app
}

fn progress(world: &World, goal: Entity) -> f64 {
    world.get::<Goal>(goal).unwrap().progress
}

#[test]
fn blank_goal_is_listed_once_observed() {
    let mut app = setup_app();
    let world = app.world_mut();
    let (observer, _) = spawn_mind_with_body(world, "Observer");
    let container = world.spawn_goal_container("T");

    let goal = world.try_add_goal(container, "BlankGoal");
    assert!(goal.is_some());
    world.observe_container(observer, container);

    assert_eq!(world.goals(observer).len(), 1);
}

#[test]
fn destroyed_goal_leaves_container_in_place() {
    let mut app = setup_app();
    let world = app.world_mut();
    let (observer, _) = spawn_mind_with_body(world, "Observer");
    let container = world.spawn_goal_container("T");
    let goal = world.try_add_goal(container, "BlankGoal").unwrap();
    world.observe_container(observer, container);

    world.despawn(goal);

    assert!(world.goals(observer).is_empty());
    assert!(world.get::<GoalContainer>(container).is_some());
}

#[test]
fn survive_goal_follows_mob_state() {
    let mut app = setup_app();
    let world = app.world_mut();
    let (mind, body) = spawn_mind_with_body(world, "Urist");
    let container = world.individual_goal_container(mind).unwrap();

    let goal = world.try_add_goal(container, "survive").unwrap();
    assert_eq!(world.goal_target(goal), Some(mind));
    assert!(world.get::<TargetedSurvives>(mind).is_some());
    assert_eq!(world.get::<Name>(goal).map(|n| n.as_str()), Some("Keep Urist (mind) alive"));
    assert!(progress(world, goal) >= 1.0 - 1e-6);

    change_mob_state(world, body, MobState::Dead);
    assert!(progress(world, goal) <= 1e-6);

    change_mob_state(world, body, MobState::Alive);
    assert!(progress(world, goal) >= 1.0 - 1e-6);

    change_mob_state(world, body, MobState::Dead);
    change_mob_state(world, body, MobState::Critical);
    assert!(progress(world, goal) >= 1.0 - 1e-6);
}

#[test]
fn survive_goal_without_body_counts_as_dead() {
    let mut app = setup_app();
    let world = app.world_mut();
    let (mind, body) = spawn_mind_with_body(world, "Urist");
    let container = world.individual_goal_container(mind).unwrap();
    let goal = world.try_add_goal(container, "survive").unwrap();

    world.despawn(body);
    world.get_mut::<world_components::Mind>(mind).unwrap().body = None;
    world.refresh_progress(goal);

    assert_eq!(progress(world, goal), 0.0);
}

#[test]
fn self_targeting_goal_in_shared_container_has_no_target() {
    let mut app = setup_app();
    let world = app.world_mut();
    let container = world.spawn_goal_container("shared");

    let goal = world.try_add_goal(container, "survive").unwrap();

    assert_eq!(world.goal_target(goal), None);
    assert_eq!(progress(world, goal), 0.0);
    assert_eq!(world.resource::<TargetRegistry>().marker_count(), 0);
}

#[test]
fn numeric_goal_clamps_at_completion() {
    let mut app = setup_app();
    let world = app.world_mut();
    let container = world.spawn_goal_container("T");
    let goal = world.try_add_goal(container, "deliver").unwrap();
    assert_eq!(world.get::<NumericGoal>(goal).unwrap().target, 10.0);

    world.set_current(goal, 5.0);
    assert_eq!(progress(world, goal), 0.5);

    world.change_current(goal, 5.0);
    assert_eq!(progress(world, goal), 1.0);
}

#[test]
fn unobserving_owned_container_keeps_it() {
    let mut app = setup_app();
    let world = app.world_mut();
    let (mind, _) = spawn_mind_with_body(world, "Urist");
    let container = world.individual_goal_container(mind).unwrap();

    world.unobserve_container(mind, container);

    assert!(world.get::<GoalContainer>(container).is_some());
    assert_eq!(
        world.get::<GoalContainerObserver>(mind).unwrap().owned_container,
        Some(container)
    );
    assert!(!world.is_observing_container(mind, container));
}

#[test]
fn warp_point_goal_targets_allowed_named_location() {
    let mut app = setup_app();
    let world = app.world_mut();
    world.spawn(WarpPoint {
        location: Some("Vault".into()),
        tags: vec!["restricted".into()],
    });
    world.spawn(WarpPoint {
        location: None,
        tags: Vec::new(),
    });
    let bar = world
        .spawn(WarpPoint {
            location: Some("Bar".into()),
            tags: vec!["service".into()],
        })
        .id();
    let container = world.spawn_goal_container("T");

    let goal = world.try_add_goal(container, "visit").unwrap();

    assert_eq!(world.goal_target(goal), Some(bar));
    assert!(world.get::<TargetedWarpPoint>(bar).is_some());
    assert_eq!(world.get::<Name>(goal).map(|n| n.as_str()), Some("Visit Bar"));

    world.despawn(bar);
    world.flush();

    assert_eq!(world.goal_target(goal), None);
    assert_eq!(world.get::<TargetedGoal>(goal).unwrap().target_kind, None);
    assert_eq!(world.resource::<TargetRegistry>().marker_count(), 0);
}

#[test]
fn warp_point_goal_without_candidates_stays_untargeted() {
    let mut app = setup_app();
    let world = app.world_mut();
    world.spawn(WarpPoint {
        location: Some("Vault".into()),
        tags: vec!["restricted".into()],
    });
    let container = world.spawn_goal_container("T");

    let goal = world.try_add_goal(container, "visit").unwrap();

    assert_eq!(world.goal_target(goal), None);
}

#[test]
fn granted_table_targets_the_receiving_mind() {
    let mut app = setup_app();
    let (mind, body) = spawn_mind_with_body(app.world_mut(), "Urist");

    app.world_mut().trigger(GrantIndividualGoals {
        entity: mind,
        table: "personal".into(),
    });
    app.world_mut().flush();
    app.update();

    let world = app.world_mut();
    let survive = world.goals_with::<TargetSurvivesGoal>(mind);
    assert_eq!(survive.len(), 1);
    assert_eq!(world.goals_with::<NumericGoal>(mind).len(), 1);
    assert_eq!(world.goal_target(survive[0]), Some(mind));

    change_mob_state(world, body, MobState::Dead);
    assert_eq!(progress(world, survive[0]), 0.0);
}

#[test]
fn two_survive_goals_share_one_marker() {
    let mut app = setup_app();
    let world = app.world_mut();
    let (mind, _) = spawn_mind_with_body(world, "Urist");
    let container = world.individual_goal_container(mind).unwrap();
    let first = world.try_add_goal(container, "survive").unwrap();
    let second = world.try_add_goal(container, "survive").unwrap();

    world.despawn(first);
    world.flush();
    assert!(world.get::<TargetedSurvives>(mind).is_some());

    world.despawn(second);
    world.flush();
    assert!(world.get::<TargetedSurvives>(mind).is_none());
}
