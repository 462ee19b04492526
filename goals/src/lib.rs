mod commands;
mod console;
mod engine;
mod strategies;
mod systems;
mod text;


pub use commands::*;
pub use console::*;
pub use engine::*;
pub use strategies::*;
pub use text::*;

use {
    bevy::prelude::*,
    goal_assets::GoalCatalog,
    goal_components::{GoalComponentsPlugin, GoalContainerObserver},
    goal_resources::{GoalRng, ViewSubscriptions},
    systems::*,
    world_components::Mind,
};

/// Differences in progress at or below this are not worth a notification.
pub const PROGRESS_EPSILON: f64 = 1e-7;

/// Goals engine: container, goal and observer bookkeeping plus progress refresh.
///
/// Does not load assets on its own; add `GoalAssetsPlugin` for that or fill the
/// [`GoalCatalog`] directly.
pub struct GoalsPlugin;

impl Plugin for GoalsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(GoalComponentsPlugin)
            // Resources
            .init_resource::<GoalCatalog>()
            .init_resource::<GoalInstallers>()
            .init_resource::<GoalRng>()
            .init_resource::<ProgressStrategies>()
            .init_resource::<ViewSubscriptions>()
            // Every mind can observe containers
            .register_required_components::<Mind, GoalContainerObserver>()
            // Lifecycle
            .add_observer(remove_goal_from_container)
            .add_observer(release_removed_container)
            // Session visibility
            .add_observer(subscribe_attached_player)
            .add_observer(unsubscribe_detached_player)
            // Personal goals
            .add_observer(grant_individual_goals);
    }
}
