use {
    bevy::{asset::LoadedFolder, platform::collections::HashMap, prelude::*},
    bevy_common_assets::ron::RonAssetPlugin,
    rand::Rng,
    serde::{Deserialize, Serialize},
};

#[cfg(test)]
mod tests;

/// Loads goal definitions and goal tables from the `goals` asset folder into the [`GoalCatalog`].
pub struct GoalAssetsPlugin;

impl Plugin for GoalAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            RonAssetPlugin::<GoalDefinition>::new(&["goal.ron"]),
            RonAssetPlugin::<GoalTableDefinition>::new(&["goal_table.ron"]),
        ))
        .init_resource::<GoalCatalog>()
        .add_systems(Startup, load_goal_folder)
        .add_systems(Update, (sync_goal_definitions, sync_goal_tables));
    }
}

/// A goal kind loaded from `.goal.ron`.
///
/// Spawning a definition creates a goal entity carrying one record per entry in `components`.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct GoalDefinition {
    /// Unique identifier (e.g., "survive", "collect_ore").
    pub id: String,
    /// Display name, overwritten by kinds that render a title template.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Asset path of the UI icon.
    #[serde(default)]
    pub icon: Option<String>,
    /// Records attached to the goal entity.
    #[serde(default)]
    pub components: Vec<GoalComponentDef>,
}

impl GoalDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            icon: None,
            components: Vec::new(),
        }
    }

    pub fn with_component(mut self, component: GoalComponentDef) -> Self {
        self.components.push(component);
        self
    }
}

/// Data for a single goal record. Each variant is installed by the plugin owning that kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GoalComponentDef {
    /// Progress is `current / target`.
    Numeric {
        #[serde(default = "default_numeric_target")]
        target: f64,
        /// Inclusive `(min, max)` range the target is drawn from on spawn.
        #[serde(default)]
        target_range: Option<(f64, f64)>,
        #[serde(default = "default_resolution")]
        resolution: f64,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    /// The goal focuses on a single target entity.
    Targeted {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    /// Targets the owner of the individual container the goal is inserted into.
    TargetSelfMind,
    /// Complete while the target mind is alive.
    TargetSurvives,
    /// Targets a random warp point whose tags are not blacklisted.
    TargetWarpPoint {
        #[serde(default)]
        blacklist: Vec<String>,
    },
}

fn default_numeric_target() -> f64 {
    1.0
}

fn default_resolution() -> f64 {
    1.0
}

fn default_probability() -> f64 {
    1.0
}

fn default_amount() -> u32 {
    1
}

/// A named goal table loaded from `.goal_table.ron`.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct GoalTableDefinition {
    pub id: String,
    pub selector: GoalSelector,
}

/// Data-driven batch selector resolving into goal definition ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GoalSelector {
    /// A single goal kind, rolled with `prob` and spawned `amount` times.
    Goal {
        id: String,
        #[serde(default = "default_probability")]
        prob: f64,
        #[serde(default = "default_amount")]
        amount: u32,
    },
    /// Every child selector.
    All(Vec<GoalSelector>),
    /// Exactly one child, picked by weight.
    Group(Vec<WeightedSelector>),
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedSelector {
    #[serde(default = "default_probability")]
    pub weight: f64,
    pub selector: GoalSelector,
}

impl GoalSelector {
    pub fn goal(id: impl Into<String>) -> Self {
        Self::Goal {
            id: id.into(),
            prob: 1.0,
            amount: 1,
        }
    }

    /// Resolves the selector into goal definition ids, in spawn order.
    pub fn resolve(&self, rng: &mut impl Rng) -> Vec<String> {
        let mut out = Vec::new();
        self.resolve_into(rng, &mut out);
        out
    }

    fn resolve_into(&self, rng: &mut impl Rng, out: &mut Vec<String>) {
        match self {
            GoalSelector::Goal { id, prob, amount } => {
                let prob = if prob.is_nan() { 0.0 } else { prob.clamp(0.0, 1.0) };
                if prob < 1.0 && !rng.random_bool(prob) {
                    return;
                }
                out.extend(std::iter::repeat_n(id.clone(), *amount as usize));
            }
            GoalSelector::All(children) => {
                for child in children {
                    child.resolve_into(rng, out);
                }
            }
            GoalSelector::Group(children) => {
                let weight = |c: &WeightedSelector| {
                    if c.weight.is_finite() && c.weight > 0.0 {
                        c.weight
                    } else {
                        0.0
                    }
                };
                let total: f64 = children.iter().map(weight).sum();
                if !(total.is_finite() && total > 0.0) {
                    if total > 0.0 {
                        warn!(total, "goal group weights overflow, selecting nothing");
                    }
                    return;
                }

                let mut roll = rng.random_range(0.0..total);
                for child in children {
                    let w = weight(child);
                    if w <= 0.0 {
                        continue;
                    }
                    if roll < w {
                        child.selector.resolve_into(rng, out);
                        return;
                    }
                    roll -= w;
                }
            }
            GoalSelector::Nothing => {}
        }
    }
}

/// All goal kinds and goal tables known to the engine, keyed by id.
#[derive(Resource, Default, Debug)]
pub struct GoalCatalog {
    definitions: HashMap<String, GoalDefinition>,
    tables: HashMap<String, GoalSelector>,
}

impl GoalCatalog {
    pub fn insert_definition(&mut self, definition: GoalDefinition) {
        self.definitions.insert(definition.id.clone(), definition);
    }

    pub fn insert_table(&mut self, id: impl Into<String>, selector: GoalSelector) {
        self.tables.insert(id.into(), selector);
    }

    pub fn definition(&self, id: &str) -> Option<&GoalDefinition> {
        self.definitions.get(id)
    }

    pub fn table(&self, id: &str) -> Option<&GoalSelector> {
        self.tables.get(id)
    }
}

#[derive(Debug, Resource)]
struct GoalsFolderHandle(pub Handle<LoadedFolder>);

fn load_goal_folder(mut commands: Commands, asset_server: Res<AssetServer>) {
    info!("loading goal definitions");
    let handle = asset_server.load_folder("goals");
    commands.insert_resource(GoalsFolderHandle(handle));
}

fn sync_goal_definitions(
    mut catalog: ResMut<GoalCatalog>,
    assets: Res<Assets<GoalDefinition>>,
    mut events: MessageReader<AssetEvent<GoalDefinition>>,
) {
    for event in events.read() {
        let (AssetEvent::Added { id } | AssetEvent::Modified { id }) = event else {
            continue;
        };
        let Some(definition) = assets.get(*id) else {
            continue;
        };

        debug!(goal_id = %definition.id, "registered goal definition");
        catalog.insert_definition(definition.clone());
    }
}

fn sync_goal_tables(
    mut catalog: ResMut<GoalCatalog>,
    assets: Res<Assets<GoalTableDefinition>>,
    mut events: MessageReader<AssetEvent<GoalTableDefinition>>,
) {
    for event in events.read() {
        let (AssetEvent::Added { id } | AssetEvent::Modified { id }) = event else {
            continue;
        };
        let Some(table) = assets.get(*id) else {
            continue;
        };

        debug!(table_id = %table.id, "registered goal table");
        catalog.insert_table(table.id.clone(), table.selector.clone());
    }
}
