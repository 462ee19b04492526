use {
    bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*},
    sim_core::{DemoScenePlugin, GoalsCorePlugin},
    std::time::Duration,
};

/// Frames the headless demo runs before exiting.
const DEMO_FRAMES: u32 = 120;

fn main() {
    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_millis(50))),
            LogPlugin {
                filter: "error,goals=debug,\
                    targeting=debug,\
                    numeric_goals=debug,\
                    goal_kinds=debug,\
                    goal_assets=debug,\
                    replication=info,\
                    sim_core=trace"
                    .into(),
                level: bevy::log::Level::TRACE,
                ..Default::default()
            },
            AssetPlugin::default(),
        ))
        .add_plugins((GoalsCorePlugin, DemoScenePlugin))
        .add_systems(Last, exit_after_demo)
        .run();
}

fn exit_after_demo(mut frames: Local<u32>, mut exit: MessageWriter<AppExit>) {
    *frames += 1;
    if *frames >= DEMO_FRAMES {
        info!("demo finished");
        exit.write(AppExit::Success);
    }
}
