use {
    crate::GoalsWorldExt,
    bevy::prelude::*,
    goal_components::Goal,
    std::fmt,
};

/// Administrative operations, one per engine operation.
#[derive(Debug, Clone, PartialEq)]
pub enum GoalsCommand {
    /// Lists the goals an observer can see.
    Get { observer: Entity },
    /// Reads the stored progress of a goal.
    Progress { goal: Entity },
    /// Returns (creating if needed) the individual container of an observer.
    Individual { observer: Entity },
    Add { container: Entity, kind: String },
    CreateContainer { name: String },
    Observe { observer: Entity, container: Entity },
    Unobserve { observer: Entity, container: Entity },
}

#[derive(Debug, Clone, PartialEq)]
pub enum GoalsCommandOutput {
    Goals(Vec<GoalLine>),
    /// NaN when the entity is not a goal.
    Progress(f64),
    Container(Option<Entity>),
    Goal(Option<Entity>),
    Observing(bool),
}

/// One row of a goal listing.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalLine {
    pub goal: Entity,
    pub name: String,
    pub progress: f64,
}

impl GoalsCommand {
    pub fn execute(self, world: &mut World) -> GoalsCommandOutput {
        info!(command = ?self, "executing goals command");
        match self {
            GoalsCommand::Get { observer } => {
                let view: &World = world;
                let lines = view
                    .goals(observer)
                    .into_iter()
                    .filter_map(|goal| goal_line(view, goal))
                    .collect();
                GoalsCommandOutput::Goals(lines)
            }
            GoalsCommand::Progress { goal } => GoalsCommandOutput::Progress(
                world
                    .get::<Goal>(goal)
                    .map_or(f64::NAN, |record| record.progress),
            ),
            GoalsCommand::Individual { observer } => {
                GoalsCommandOutput::Container(world.individual_goal_container(observer))
            }
            GoalsCommand::Add { container, kind } => {
                GoalsCommandOutput::Goal(world.try_add_goal(container, &kind))
            }
            GoalsCommand::CreateContainer { name } => {
                GoalsCommandOutput::Container(Some(world.spawn_goal_container(&name)))
            }
            GoalsCommand::Observe {
                observer,
                container,
            } => {
                world.observe_container(observer, container);
                GoalsCommandOutput::Observing(world.is_observing_container(observer, container))
            }
            GoalsCommand::Unobserve {
                observer,
                container,
            } => {
                world.unobserve_container(observer, container);
                GoalsCommandOutput::Observing(world.is_observing_container(observer, container))
            }
        }
    }
}

impl fmt::Display for GoalsCommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalsCommandOutput::Goals(lines) if lines.is_empty() => f.write_str("No goals"),
            GoalsCommandOutput::Goals(lines) => {
                for line in lines {
                    writeln!(
                        f,
                        "{:?} {}: {:.0}%",
                        line.goal,
                        line.name,
                        line.progress * 100.0
                    )?;
                }
                Ok(())
            }
            GoalsCommandOutput::Progress(progress) => write!(f, "{progress}"),
            GoalsCommandOutput::Container(Some(container))
            | GoalsCommandOutput::Goal(Some(container)) => write!(f, "{container:?}"),
            GoalsCommandOutput::Container(None) | GoalsCommandOutput::Goal(None) => {
                f.write_str("Failed")
            }
            GoalsCommandOutput::Observing(observing) => write!(f, "{observing}"),
        }
    }
}

fn goal_line(world: &World, goal: Entity) -> Option<GoalLine> {
    let record = world.get::<Goal>(goal)?;
    Some(GoalLine {
        goal,
        name: world
            .get::<Name>(goal)
            .map(|name| name.as_str().to_owned())
            .unwrap_or_default(),
        progress: record.progress,
    })
}
