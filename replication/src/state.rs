use {
    bevy::prelude::*,
    goal_components::{Goal, GoalContainer, GoalContainerObserver},
    serde::{Deserialize, Serialize},
};

/// Entity id as sent over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NetEntity(pub u64);

impl From<Entity> for NetEntity {
    fn from(entity: Entity) -> Self {
        Self(entity.to_bits())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordKind {
    Container,
    Goal,
    Observer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalState {
    pub container: NetEntity,
    pub progress: f64,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl GoalState {
    pub fn capture(goal: &Goal, name: Option<&Name>, description: Option<&str>) -> Self {
        Self {
            container: goal.container.into(),
            progress: goal.progress,
            icon: goal.icon.clone(),
            name: name.map(|name| name.as_str().to_owned()),
            description: description.map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerState {
    pub goals: Vec<NetEntity>,
    #[serde(default)]
    pub individual_owner: Option<NetEntity>,
}

impl From<&GoalContainer> for ContainerState {
    fn from(container: &GoalContainer) -> Self {
        Self {
            goals: container.goals.iter().copied().map(NetEntity::from).collect(),
            individual_owner: container.individual_owner.map(NetEntity::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverState {
    pub observed: Vec<NetEntity>,
    #[serde(default)]
    pub owned_container: Option<NetEntity>,
}

impl From<&GoalContainerObserver> for ObserverState {
    fn from(observer: &GoalContainerObserver) -> Self {
        Self {
            observed: observer.observed.iter().copied().map(NetEntity::from).collect(),
            owned_container: observer.owned_container.map(NetEntity::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordState {
    Container(ContainerState),
    Goal(GoalState),
    Observer(ObserverState),
}

impl RecordState {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordState::Container(_) => RecordKind::Container,
            RecordState::Goal(_) => RecordKind::Goal,
            RecordState::Observer(_) => RecordKind::Observer,
        }
    }
}

/// One record update for one entity. `state: None` means the record is gone or no longer
/// visible to the receiving session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDiff {
    pub entity: NetEntity,
    pub kind: RecordKind,
    pub state: Option<RecordState>,
}
