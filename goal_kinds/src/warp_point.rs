use {
    bevy::prelude::*,
    goal_components::TargetedGoal,
    goal_events::GoalInserted,
    goal_resources::GoalRng,
    rand::seq::IndexedRandom,
    targeting::{SetTarget, TargetMarker, TargetedGoalPlugin, TargetingAppExt},
    world_components::WarpPoint,
};

/// Targets a random named warp point.
#[derive(Component, Reflect, Default, Debug, Clone)]
#[reflect(Component, Default)]
#[require(TargetedGoal)]
pub struct TargetWarpPointGoal {
    /// Warp points carrying any of these tags are never picked.
    pub blacklist: Vec<String>,
}

/// Placed on warp points tracked by a [`TargetWarpPointGoal`].
#[derive(Component, Reflect, Default, Debug, Clone, Copy)]
#[reflect(Component, Default)]
pub struct TargetedWarpPoint;

impl TargetMarker for TargetedWarpPoint {}

pub struct WarpPointGoalPlugin;

impl Plugin for WarpPointGoalPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<TargetWarpPointGoal>()
            .register_type::<TargetedWarpPoint>()
            .add_plugins(TargetedGoalPlugin::<TargetWarpPointGoal, TargetedWarpPoint>::default())
            .register_target_namer::<TargetWarpPointGoal>(warp_point_location)
            .add_observer(pick_warp_point);
    }
}

fn pick_warp_point(
    trigger: On<GoalInserted>,
    goals: Query<&TargetWarpPointGoal>,
    warp_points: Query<(Entity, &WarpPoint)>,
    mut rng: ResMut<GoalRng>,
    mut commands: Commands,
) {
    let goal = trigger.event().entity;
    let Ok(settings) = goals.get(goal) else {
        return;
    };

    let mut candidates: Vec<Entity> = warp_points
        .iter()
        .filter(|(_, warp)| warp.location.is_some())
        .filter(|(_, warp)| !warp.tags.iter().any(|tag| settings.blacklist.contains(tag)))
        .map(|(entity, _)| entity)
        .collect();

    candidates.sort();
    let Some(target) = candidates.choose(&mut rng.0) else {
        debug!(?goal, "no warp point to target");
        return;
    };

    commands.queue(SetTarget {
        goal,
        target: Some(*target),
    });
}

fn warp_point_location(world: &World, _goal: Entity, target: Entity) -> Option<String> {
    world.get::<WarpPoint>(target)?.location.clone()
}
