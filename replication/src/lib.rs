//! Replication of goal state from the authority to remote mirrors.
//!
//! The authority recomputes, per session, the goal, container and observer records that
//! session may see and queues the differences against what it sent last. Mirrors apply
//! inbound diffs to a read-only shadow, replacing each record wholesale. Moving diffs
//! between the two is left to the transport; [`encode_diffs`] and [`decode_diffs`] give it
//! a text form.

mod authority;
mod codec;
mod mirror;
mod state;


pub use authority::*;
pub use codec::*;
pub use mirror::*;
pub use state::*;

use {bevy::prelude::*, goal_resources::ViewSubscriptions, system_schedule::GoalsSchedule};

/// Authority side: collects outbound diffs after the simulation ran.
pub struct GoalReplicationPlugin;

impl Plugin for GoalReplicationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ReplicationOutbox>()
            .init_resource::<ReplicationLedger>()
            .init_resource::<ViewSubscriptions>()
            .add_systems(
                PostUpdate,
                collect_state_diffs.in_set(GoalsSchedule::ReplicateState),
            );
    }
}

/// Mirror side: applies inbound diffs before anything reads the shadow.
pub struct GoalMirrorPlugin;

impl Plugin for GoalMirrorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ReplicationInbox>()
            .init_resource::<GoalMirror>()
            .add_systems(
                PreUpdate,
                apply_inbound_state.in_set(GoalsSchedule::ReceiveState),
            );
    }
}
