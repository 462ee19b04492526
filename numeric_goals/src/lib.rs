//! Goals whose progress compares a current value to a target value.


use {
    bevy::prelude::*,
    goal_assets::GoalComponentDef,
    goal_components::{GoalDescription, NumericGoal, TargetRange},
    goal_resources::GoalRng,
    goals::{GoalsAppExt, GoalsWorldExt, PROGRESS_EPSILON, render_template},
    rand::Rng,
};

pub struct NumericGoalsPlugin;

impl Plugin for NumericGoalsPlugin {
    fn build(&self, app: &mut App) {
        app.register_progress_strategy::<NumericGoal>(numeric_progress)
            .register_goal_installer(install_numeric_goal)
            .add_observer(activate_numeric_goal);
    }
}

pub trait NumericGoalsWorldExt {
    /// Sets the current value (never below zero) and refreshes progress when it changed.
    fn set_current(&mut self, goal: Entity, value: f64);

    fn change_current(&mut self, goal: Entity, delta: f64);
}

impl NumericGoalsWorldExt for World {
    fn set_current(&mut self, goal: Entity, value: f64) {
        let value = value.max(0.0);
        {
            let Some(mut numeric) = self.get_mut::<NumericGoal>(goal) else {
                return;
            };
            if (numeric.current - value).abs() <= PROGRESS_EPSILON {
                return;
            }
            numeric.current = value;
        }

        trace!(?goal, value, "numeric goal current changed");
        self.refresh_progress(goal);
    }

    fn change_current(&mut self, goal: Entity, delta: f64) {
        let Some(current) = self.get::<NumericGoal>(goal).map(|numeric| numeric.current) else {
            return;
        };
        self.set_current(goal, current + delta);
    }
}

/// Picks a target from `range` in steps of `resolution`, both ends included.
///
/// The last step may overshoot `max` and is clamped back onto it. A non-positive resolution
/// or an empty range yields `min`.
pub fn roll_target(range: TargetRange, resolution: f64, rng: &mut impl Rng) -> f64 {
    if range.min.is_nan() || range.max.is_nan() || range.min > range.max {
        warn!(?range, "numeric goal target range is empty, using its minimum");
        return range.min;
    }
    if !(resolution.is_finite() && resolution > 0.0) {
        warn!(resolution, "numeric goal resolution must be positive, using range minimum");
        return range.min;
    }

    let steps = ((range.max - range.min) / resolution).ceil();
    let steps = if steps.is_finite() { steps as u64 } else { 0 };
    let picked = rng.random_range(0..=steps);
    (range.min + picked as f64 * resolution).clamp(range.min, range.max)
}

fn numeric_progress(world: &World, goal: Entity) -> Option<f64> {
    let numeric = world.get::<NumericGoal>(goal)?;
    Some(numeric.current / numeric.target)
}

/// Resolves a ranged target once, when the record lands on a goal, and renders its text.
fn activate_numeric_goal(
    trigger: On<Add, NumericGoal>,
    mut goals: Query<&mut NumericGoal>,
    mut rng: ResMut<GoalRng>,
    mut commands: Commands,
) {
    let goal = trigger.event().entity;
    let Ok(mut numeric) = goals.get_mut(goal) else {
        return;
    };

    if let Some(range) = numeric.target_range {
        numeric.target = roll_target(range, numeric.resolution, &mut rng.0);
        debug!(?goal, target = numeric.target, "rolled numeric goal target");
    }

    let target = numeric.target.to_string();
    let args = [("target", target.as_str())];
    let mut entity = commands.entity(goal);
    if let Some(title) = &numeric.title {
        entity.insert(Name::new(render_template(title, &args)));
    }
    if let Some(description) = &numeric.description {
        entity.insert(GoalDescription(render_template(description, &args)));
    }
}

fn install_numeric_goal(def: &GoalComponentDef, entity: &mut EntityWorldMut<'_>) -> bool {
    let GoalComponentDef::Numeric {
        target,
        target_range,
        resolution,
        title,
        description,
    } = def
    else {
        return false;
    };

    entity.insert(NumericGoal {
        current: 0.0,
        target: *target,
        target_range: target_range.map(|(min, max)| TargetRange { min, max }),
        resolution: *resolution,
        title: title.clone(),
        description: description.clone(),
    });
    true
}
