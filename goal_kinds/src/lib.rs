//! Concrete goal kinds built on the targeting engine.

mod self_mind;
mod survives;
mod warp_point;

pub use self_mind::*;
pub use survives::*;
pub use warp_point::*;

use {
    bevy::prelude::*,
    goal_assets::GoalComponentDef,
    goals::GoalsAppExt,
};

pub struct GoalKindsPlugin;

impl Plugin for GoalKindsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((SelfMindGoalPlugin, SurvivesGoalPlugin, WarpPointGoalPlugin))
            .register_goal_installer(install_goal_kind);
    }
}

fn install_goal_kind(def: &GoalComponentDef, entity: &mut EntityWorldMut<'_>) -> bool {
    match def {
        GoalComponentDef::TargetSelfMind => {
            entity.insert(TargetSelfMindGoal);
        }
        GoalComponentDef::TargetSurvives => {
            entity.insert(TargetSurvivesGoal);
        }
        GoalComponentDef::TargetWarpPoint { blacklist } => {
            entity.insert(TargetWarpPointGoal {
                blacklist: blacklist.clone(),
            });
        }
        _ => return false,
    }
    true
}
