use {
    bevy::prelude::*,
    goal_assets::GoalAssetsPlugin,
    goal_kinds::GoalKindsPlugin,
    goals::GoalsPlugin,
    numeric_goals::NumericGoalsPlugin,
    replication::GoalReplicationPlugin,
    system_schedule::GoalsSchedule,
    targeting::TargetingPlugin,
    world_components::WorldComponentsPlugin,
};

mod systems;

/// Authoritative goal tracking: engine, targeting, goal kinds, asset loading and replication.
pub struct GoalsCorePlugin;

impl Plugin for GoalsCorePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            WorldComponentsPlugin,
            GoalAssetsPlugin,
            GoalsPlugin,
            TargetingPlugin,
            NumericGoalsPlugin,
            GoalKindsPlugin,
            GoalReplicationPlugin,
        ));
    }
}

/// Small headless crew exercising the goal kinds shipped in `assets/goals`.
pub struct DemoScenePlugin;

impl Plugin for DemoScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<systems::DemoCrew>()
            .add_systems(Startup, systems::spawn_demo_crew)
            .add_systems(
                Update,
                (systems::grant_starter_goals, systems::advance_demo)
                    .chain()
                    .in_set(GoalsSchedule::Simulate),
            );
    }
}
