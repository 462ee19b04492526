use {
    crate::*,
    bevy::prelude::*,
    goal_components::{Goal, GoalDescription, MarkerKind, TargetedGoal},
    goal_events::GoalTargetChanged,
    goals::{GoalsAppExt, GoalsPlugin, GoalsWorldExt},
};

#[derive(Component, Default)]
#[require(TargetedGoal)]
struct ChaseGoal;

#[derive(Component, Default)]
struct Chased;

impl TargetMarker for Chased {}

#[derive(Component)]
struct Stamina(f64);

#[derive(EntityEvent)]
struct StaminaChanged {
    entity: Entity,
}

#[derive(Resource, Default)]
struct TargetLog(Vec<(Option<Entity>, Option<Entity>)>);

fn chase_progress(world: &World, goal: Entity) -> Option<f64> {
    let target = marked_target::<Chased>(world, goal)?;
    world.get::<Stamina>(target).map(|s| 1.0 - s.0)
}

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        GoalsPlugin,
        TargetingPlugin,
        TargetedGoalPlugin::<ChaseGoal, Chased>::default(),
    ))
    .init_resource::<TargetLog>()
    .register_progress_strategy::<ChaseGoal>(chase_progress)
    .refresh_targets_on::<StaminaChanged, Chased>()
    .add_observer(|trigger: On<GoalTargetChanged>, mut log: ResMut<TargetLog>| {
        let event = trigger.event();
        log.0.push((event.old, event.new));
    });
    app
}

fn chase_goal(world: &mut World, container: Entity) -> Entity {
    world.try_add_goal_with(container, ChaseGoal).unwrap()
}

fn is_marked(world: &World, target: Entity) -> bool {
    let marked = world.get::<Chased>(target).is_some();
    assert_eq!(
        world
            .resource::<TargetRegistry>()
            .is_marked(target, MarkerKind::of::<Chased>()),
        marked
    );
    marked
}

#[test]
fn marker_lives_until_last_goal_detaches() {
    let orders: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    for order in orders {
        let mut app = test_app();
        let world = app.world_mut();
        let container = world.spawn_goal_container("test");
        let target = world.spawn(Stamina(1.0)).id();
        let goals: Vec<Entity> = (0..3).map(|_| chase_goal(world, container)).collect();
        for goal in &goals {
            world.set_target(*goal, Some(target));
        }
        assert_eq!(
            world
                .resource::<TargetRegistry>()
                .observers(target, MarkerKind::of::<Chased>()),
            goals.as_slice()
        );

        for (step, index) in order.iter().enumerate() {
            assert!(is_marked(world, target));
            world.set_target(goals[*index], None);
            assert_eq!(is_marked(world, target), step < 2, "order {order:?}");
        }
        assert_eq!(world.resource::<TargetRegistry>().marker_count(), 0);
    }
}

#[test]
fn despawned_target_clears_every_goal() {
    let mut app = test_app();
    let world = app.world_mut();
    let container = world.spawn_goal_container("test");
    let target = world.spawn(Stamina(0.0)).id();
    let first = chase_goal(world, container);
    let second = chase_goal(world, container);
    world.set_target(first, Some(target));
    world.set_target(second, Some(target));
    assert_eq!(world.get::<Goal>(first).unwrap().progress, 1.0);

    world.despawn(target);
    world.flush();

    for goal in [first, second] {
        let record = world.get::<TargetedGoal>(goal).unwrap();
        assert_eq!(record.target, None);
        assert_eq!(record.target_kind, None);
        assert_eq!(world.get::<Goal>(goal).unwrap().progress, 0.0);
    }
    assert_eq!(world.resource::<TargetRegistry>().marker_count(), 0);
}

#[test]
fn despawned_goal_releases_marker() {
    let mut app = test_app();
    let world = app.world_mut();
    let container = world.spawn_goal_container("test");
    let target = world.spawn(Stamina(1.0)).id();
    let first = chase_goal(world, container);
    let second = chase_goal(world, container);
    world.set_target(first, Some(target));
    world.set_target(second, Some(target));

    world.despawn(first);
    world.flush();
    assert!(is_marked(world, target));

    world.despawn(second);
    world.flush();
    assert!(!is_marked(world, target));
    assert_eq!(world.resource::<TargetRegistry>().marker_count(), 0);
}

#[test]
fn retargeting_moves_the_marker() {
    let mut app = test_app();
    let container = app.world_mut().spawn_goal_container("test");
    let first = app.world_mut().spawn(Stamina(1.0)).id();
    let second = app.world_mut().spawn(Stamina(0.25)).id();
    let goal = chase_goal(app.world_mut(), container);

    app.world_mut().set_target(goal, Some(first));
    app.world_mut().set_target(goal, Some(first));
    app.world_mut().set_target(goal, Some(second));

    let world = app.world();
    assert!(!is_marked(world, first));
    assert!(is_marked(world, second));
    assert_eq!(world.goal_target(goal), Some(second));
    assert_eq!(world.get::<Goal>(goal).unwrap().progress, 0.75);
    assert_eq!(
        world.resource::<TargetLog>().0,
        vec![(None, Some(first)), (Some(first), Some(second))]
    );
}

#[test]
fn missing_target_or_untargeted_goal_is_ignored() {
    let mut app = test_app();
    let world = app.world_mut();
    let container = world.spawn_goal_container("test");
    let goal = chase_goal(world, container);
    let plain = world.try_add_goal_with(container, ()).unwrap();
    let gone = world.spawn_empty().id();
    world.despawn(gone);
    let target = world.spawn(Stamina(1.0)).id();

    world.set_target(goal, Some(gone));
    world.set_target(plain, Some(target));

    assert_eq!(world.goal_target(goal), None);
    assert!(world.get::<TargetedGoal>(plain).is_none());
    assert!(!is_marked(world, target));
    assert!(world.resource::<TargetLog>().0.is_empty());
}

#[test]
fn watched_event_refreshes_tracking_goals() {
    let mut app = test_app();
    let world = app.world_mut();
    let container = world.spawn_goal_container("test");
    let target = world.spawn(Stamina(1.0)).id();
    let goal = chase_goal(world, container);
    world.set_target(goal, Some(target));
    assert_eq!(world.get::<Goal>(goal).unwrap().progress, 0.0);

    world.get_mut::<Stamina>(target).unwrap().0 = 0.4;
    world.trigger(StaminaChanged { entity: target });
    world.flush();

    assert!((world.get::<Goal>(goal).unwrap().progress - 0.6).abs() < 1e-9);
}

#[test]
fn targeted_text_uses_target_name() {
    let mut app = test_app();
    app.register_target_namer::<ChaseGoal>(|world, _goal, target| {
        world.get::<Stamina>(target).map(|s| format!("runner at {:.0}%", s.0 * 100.0))
    });
    let world = app.world_mut();
    let container = world.spawn_goal_container("test");
    let named = world.spawn((Stamina(0.5), Name::new("Runner"))).id();
    let goal = world
        .try_add_goal_with(
            container,
            (
                ChaseGoal,
                TargetedGoal {
                    title: Some("Chase {targetName}".into()),
                    description: Some("Catch {targetName} before they rest.".into()),
                    ..default()
                },
            ),
        )
        .unwrap();

    world.set_target(goal, Some(named));

    assert_eq!(
        world.get::<Name>(goal).map(|n| n.as_str()),
        Some("Chase runner at 50%")
    );
    assert_eq!(
        world.get::<GoalDescription>(goal).map(|d| d.0.as_str()),
        Some("Catch runner at 50% before they rest.")
    );
}

#[test]
fn default_target_name_is_entity_name() {
    let mut app = test_app();
    let world = app.world_mut();
    let named = world.spawn(Name::new("Runner")).id();
    let unnamed = world.spawn_empty().id();

    assert_eq!(default_target_name(world, named), "Runner");
    assert_eq!(default_target_name(world, unnamed), format!("{unnamed:?}"));
}
