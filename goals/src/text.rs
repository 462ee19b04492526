use {bevy::prelude::*, goal_components::GoalDescription};

/// Substitutes `{key}` placeholders. Unknown placeholders are left as they are.
pub fn render_template(template: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(template.to_owned(), |text, (key, value)| {
        text.replace(&format!("{{{key}}}"), value)
    })
}

/// Overwrites the displayed title and description of a goal. `None` leaves the current text.
pub fn set_goal_text(
    world: &mut World,
    goal: Entity,
    title: Option<String>,
    description: Option<String>,
) {
    let Ok(mut entity) = world.get_entity_mut(goal) else {
        return;
    };

    if let Some(title) = title {
        entity.insert(Name::new(title));
    }
    if let Some(description) = description {
        entity.insert(GoalDescription(description));
    }
}
