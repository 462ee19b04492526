use {
    bevy::prelude::*,
    goal_assets::GoalComponentDef,
    std::any::{TypeId, type_name},
};

/// Computes the raw progress of a goal. `None` means the strategy has nothing to say
/// about this goal right now (for example a targeted goal without a target).
pub type ProgressFn = fn(&World, Entity) -> Option<f64>;

/// Attaches the records described by one [`GoalComponentDef`] to a freshly spawned goal.
/// Returns `false` when the definition is not handled by this installer.
pub type GoalInstaller = fn(&GoalComponentDef, &mut EntityWorldMut<'_>) -> bool;

struct ProgressStrategy {
    component: TypeId,
    kind: &'static str,
    applies: fn(&World, Entity) -> bool,
    compute: ProgressFn,
}

/// Explicit dispatch table from goal extension record to its progress function.
///
/// # Usage
/// Filled at app build time through [`GoalsAppExt::register_progress_strategy`]. Every
/// strategy whose record is present on a goal runs, in registration order, and the last
/// `Some` wins. Goals claimed by more than one strategy are reported with `warn!`.
#[derive(Resource, Default)]
pub struct ProgressStrategies {
    strategies: Vec<ProgressStrategy>,
}

impl ProgressStrategies {
    pub fn register<C: Component>(&mut self, compute: ProgressFn) {
        let kind = short_type_name::<C>();
        if let Some(existing) = self
            .strategies
            .iter_mut()
            .find(|s| s.component == TypeId::of::<C>())
        {
            warn!(kind, "progress strategy registered twice, keeping the latest");
            existing.compute = compute;
            return;
        }

        debug!(kind, "registered progress strategy");
        self.strategies.push(ProgressStrategy {
            component: TypeId::of::<C>(),
            kind,
            applies: has_component::<C>,
            compute,
        });
    }

    /// Names of the strategies claiming a goal, in registration order.
    pub fn claims(&self, world: &World, goal: Entity) -> Vec<&'static str> {
        self.strategies
            .iter()
            .filter(|s| (s.applies)(world, goal))
            .map(|s| s.kind)
            .collect()
    }

    /// Raw, unclamped progress of a goal. `None` when no strategy produced a value.
    pub fn compute(&self, world: &World, goal: Entity) -> Option<f64> {
        let mut claimed = self.strategies.iter().filter(|s| (s.applies)(world, goal));
        let first = claimed.next()?;
        let mut value = (first.compute)(world, goal);
        let mut kinds = vec![first.kind];

        for strategy in claimed {
            kinds.push(strategy.kind);
            value = (strategy.compute)(world, goal).or(value);
        }

        if kinds.len() > 1 {
            warn!(?goal, ?kinds, "goal is claimed by several progress strategies");
        }
        value
    }
}

/// Installers for the records a goal definition may list.
#[derive(Resource, Default)]
pub struct GoalInstallers {
    installers: Vec<GoalInstaller>,
}

impl GoalInstallers {
    pub fn register(&mut self, installer: GoalInstaller) {
        self.installers.push(installer);
    }

    pub fn installers(&self) -> &[GoalInstaller] {
        &self.installers
    }
}

pub trait GoalsAppExt {
    /// Registers how goals carrying `C` compute their progress.
    fn register_progress_strategy<C: Component>(&mut self, compute: ProgressFn) -> &mut Self;

    /// Registers an installer for one or more [`GoalComponentDef`] variants.
    fn register_goal_installer(&mut self, installer: GoalInstaller) -> &mut Self;
}

impl GoalsAppExt for App {
    fn register_progress_strategy<C: Component>(&mut self, compute: ProgressFn) -> &mut Self {
        self.init_resource::<ProgressStrategies>();
        self.world_mut()
            .resource_mut::<ProgressStrategies>()
            .register::<C>(compute);
        self
    }

    fn register_goal_installer(&mut self, installer: GoalInstaller) -> &mut Self {
        self.init_resource::<GoalInstallers>();
        self.world_mut()
            .resource_mut::<GoalInstallers>()
            .register(installer);
        self
    }
}

fn has_component<C: Component>(world: &World, entity: Entity) -> bool {
    world.get::<C>(entity).is_some()
}

pub(crate) fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
