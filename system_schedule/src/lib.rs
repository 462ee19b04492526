use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum GoalsSchedule {
    /// Inbound replicated state is applied to the mirror.
    ReceiveState,
    /// Goal systems driven by the simulation.
    Simulate,
    /// Outbound state diffs are collected.
    ReplicateState,
}
