use {
    crate::GoalsWorldExt,
    bevy::prelude::*,
};

/// Adds a goal table to the individual container of a mind.
#[derive(Debug, Clone)]
pub struct GrantGoalTable {
    pub mind: Entity,
    pub table: String,
}

impl Command for GrantGoalTable {
    fn apply(self, world: &mut World) {
        let Some(container) = world.individual_goal_container(self.mind) else {
            warn!(mind = ?self.mind, table = %self.table, "cannot grant goals, entity observes no goals");
            return;
        };

        if !world.try_add_goals_from(container, &self.table) {
            warn!(mind = ?self.mind, table = %self.table, "failed to grant every goal of the table");
        }
    }
}
