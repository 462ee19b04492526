use {
    bevy::prelude::*,
    std::any::{TypeId, type_name},
};

pub struct GoalComponentsPlugin;

impl Plugin for GoalComponentsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Goal>()
            .register_type::<GoalContainer>()
            .register_type::<GoalContainerObserver>()
            .register_type::<GoalDescription>()
            .register_type::<GoalPrototype>()
            .register_type::<NumericGoal>();
    }
}

/// A trackable objective held by exactly one [`GoalContainer`].
///
/// # Usage
/// - **Membership**: `container` always points at the container whose `goals` list holds this
///   entity. The goals engine maintains both sides; despawning the goal removes it from the list.
/// - **Progress**: Written only by `refresh_progress`, always within `[0, 1]`.
#[derive(Component, Reflect, Debug, Clone, PartialEq)]
#[reflect(Component)]
pub struct Goal {
    /// The container this goal belongs to.
    pub container: Entity,
    /// The current progress of the goal, from 0 to 1.
    pub progress: f64,
    /// Asset path of the icon used to represent the goal in the UI.
    pub icon: Option<String>,
}

impl Goal {
    pub fn new(container: Entity) -> Self {
        Self {
            container,
            progress: 0.0,
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Id of the goal definition a goal was spawned from.
#[derive(Component, Reflect, Debug, Clone, PartialEq, Eq, Deref)]
#[reflect(Component)]
pub struct GoalPrototype(pub String);

/// Groups an ordered set of goals.
#[derive(Component, Reflect, Default, Debug, Clone, PartialEq)]
#[reflect(Component, Default)]
pub struct GoalContainer {
    /// Contained goals, in insertion order.
    pub goals: Vec<Entity>,
    /// If this is an individual container, the observer that owns it.
    pub individual_owner: Option<Entity>,
}

/// Lives on a mind-like entity watching the goals of one or more containers.
///
/// Observation and ownership are independent: unobserving the owned container leaves
/// `owned_container` in place.
#[derive(Component, Reflect, Default, Debug, Clone, PartialEq)]
#[reflect(Component, Default)]
pub struct GoalContainerObserver {
    /// Observed containers, in the order they were first observed. Never holds duplicates.
    pub observed: Vec<Entity>,
    /// The personal container of this observer, created lazily.
    pub owned_container: Option<Entity>,
}

/// Rendered description text of a goal. The title is carried by bevy's [`Name`].
#[derive(Component, Reflect, Default, Debug, Clone, PartialEq, Deref, DerefMut)]
#[reflect(Component, Default)]
pub struct GoalDescription(pub String);

/// Type tag identifying which marker component a targeted goal attached to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerKind {
    type_id: TypeId,
    name: &'static str,
}

impl MarkerKind {
    pub fn of<M: 'static>() -> Self {
        let full = type_name::<M>();
        Self {
            type_id: TypeId::of::<M>(),
            name: full.rsplit("::").next().unwrap_or(full),
        }
    }
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Goal that focuses on a single target entity.
#[derive(Component, Default, Debug, Clone, PartialEq)]
pub struct TargetedGoal {
    /// The target entity of the goal.
    pub target: Option<Entity>,
    /// The marker kind attached to `target` on behalf of this goal.
    pub target_kind: Option<MarkerKind>,
    /// Title template. `{target}` and `{targetName}` are substituted.
    pub title: Option<String>,
    /// Description template. `{target}` and `{targetName}` are substituted.
    pub description: Option<String>,
}

/// Inclusive range a [`NumericGoal`] target is drawn from.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct TargetRange {
    pub min: f64,
    pub max: f64,
}

/// A goal that sets its progress by comparing a current value to a target value.
#[derive(Component, Reflect, Debug, Clone, PartialEq)]
#[reflect(Component)]
pub struct NumericGoal {
    pub current: f64,
    pub target: f64,
    /// If set, the target is randomized on spawn.
    pub target_range: Option<TargetRange>,
    /// The minimum difference between any two targets drawn from `target_range`.
    pub resolution: f64,
    /// Title template. `{target}` is substituted.
    pub title: Option<String>,
    /// Description template. `{target}` is substituted.
    pub description: Option<String>,
}

impl Default for NumericGoal {
    fn default() -> Self {
        Self {
            current: 0.0,
            target: 1.0,
            target_range: None,
            resolution: 1.0,
            title: None,
            description: None,
        }
    }
}

impl NumericGoal {
    pub fn with_target(target: f64) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    pub fn with_range(min: f64, max: f64, resolution: f64) -> Self {
        Self {
            target_range: Some(TargetRange { min, max }),
            resolution,
            ..Default::default()
        }
    }
}
