use {
    crate::{GoalState, NetEntity, RecordKind, RecordState, StateDiff},
    bevy::{
        platform::collections::{HashMap, HashSet},
        prelude::*,
    },
    goal_components::{Goal, GoalContainer, GoalContainerObserver, GoalDescription},
    goal_resources::ViewSubscriptions,
    std::collections::BTreeMap,
    world_components::{Mind, SessionId},
};

type View = BTreeMap<(RecordKind, NetEntity), RecordState>;

/// Diffs waiting to be handed to the transport, per session.
#[derive(Resource, Default, Debug)]
pub struct ReplicationOutbox {
    pending: HashMap<SessionId, Vec<StateDiff>>,
}

impl ReplicationOutbox {
    /// Takes every diff queued for `session`, oldest first.
    pub fn drain(&mut self, session: SessionId) -> Vec<StateDiff> {
        self.pending.remove(&session).unwrap_or_default()
    }

    pub fn pending(&self, session: SessionId) -> &[StateDiff] {
        self.pending
            .get(&session)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Last state sent to each session.
#[derive(Resource, Default, Debug)]
pub struct ReplicationLedger {
    sent: HashMap<SessionId, View>,
}

/// Recomputes what every session may see and queues what changed since the last send.
///
/// A session sees the containers it is subscribed to, the goals listed in them and the
/// observer record of the mind it plays.
pub fn collect_state_diffs(
    subscriptions: Res<ViewSubscriptions>,
    containers: Query<&GoalContainer>,
    goals: Query<(&Goal, Option<&Name>, Option<&GoalDescription>)>,
    observers: Query<(Entity, &Mind, &GoalContainerObserver)>,
    mut ledger: ResMut<ReplicationLedger>,
    mut outbox: ResMut<ReplicationOutbox>,
) {
    let mut visible: HashMap<SessionId, View> = HashMap::new();

    for session in subscriptions.sessions() {
        let view = visible.entry(session).or_default();
        for container_entity in subscriptions.visible_to(session) {
            let Ok(container) = containers.get(container_entity) else {
                continue;
            };
            view.insert(
                (RecordKind::Container, container_entity.into()),
                RecordState::Container(container.into()),
            );

            for goal_entity in &container.goals {
                let Ok((goal, name, description)) = goals.get(*goal_entity) else {
                    continue;
                };
                let description = description.map(|d| d.0.as_str());
                view.insert(
                    (RecordKind::Goal, (*goal_entity).into()),
                    RecordState::Goal(GoalState::capture(goal, name, description)),
                );
            }
        }
    }

    for (entity, mind, observer) in &observers {
        let Some(session) = mind.session else {
            continue;
        };
        visible.entry(session).or_default().insert(
            (RecordKind::Observer, entity.into()),
            RecordState::Observer(observer.into()),
        );
    }

    let sessions: HashSet<SessionId> = visible
        .keys()
        .chain(ledger.sent.keys())
        .copied()
        .collect();
    for session in sessions {
        let view = visible.remove(&session).unwrap_or_default();
        let sent = ledger.sent.remove(&session).unwrap_or_default();

        let diffs = diff_views(&sent, &view);
        if !diffs.is_empty() {
            trace!(?session, diffs = diffs.len(), "queued goal state diffs");
            outbox.pending.entry(session).or_default().extend(diffs);
        }
        if !view.is_empty() {
            ledger.sent.insert(session, view);
        }
    }
}

fn diff_views(sent: &View, view: &View) -> Vec<StateDiff> {
    let changed = view
        .iter()
        .filter(|(key, state)| sent.get(*key) != Some(*state))
        .map(|((kind, entity), state)| StateDiff {
            entity: *entity,
            kind: *kind,
            state: Some(state.clone()),
        });
    let removed = sent
        .keys()
        .filter(|key| !view.contains_key(*key))
        .map(|(kind, entity)| StateDiff {
            entity: *entity,
            kind: *kind,
            state: None,
        });

    changed.chain(removed).collect()
}
