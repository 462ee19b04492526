use {
    crate::*,
    rand::{SeedableRng, rngs::StdRng},
};

#[test]
fn all_selector_keeps_declaration_order() {
    let mut rng = StdRng::seed_from_u64(7);
    let selector = GoalSelector::All(vec![
        GoalSelector::goal("survive"),
        GoalSelector::Goal {
            id: "collect".to_string(),
            prob: 1.0,
            amount: 2,
        },
        GoalSelector::Nothing,
        GoalSelector::goal("visit"),
    ]);

    assert_eq!(
        selector.resolve(&mut rng),
        vec!["survive", "collect", "collect", "visit"]
    );
}

#[test]
fn zero_probability_goal_never_rolls() {
    let mut rng = StdRng::seed_from_u64(1);
    let selector = GoalSelector::Goal {
        id: "never".to_string(),
        prob: 0.0,
        amount: 1,
    };

    for _ in 0..32 {
        assert!(selector.resolve(&mut rng).is_empty());
    }
}

#[test]
fn group_picks_exactly_one_weighted_child() {
    let mut rng = StdRng::seed_from_u64(42);
    let selector = GoalSelector::Group(vec![
        WeightedSelector {
            weight: 1.0,
            selector: GoalSelector::goal("a"),
        },
        WeightedSelector {
            weight: 0.0,
            selector: GoalSelector::goal("never"),
        },
        WeightedSelector {
            weight: 3.0,
            selector: GoalSelector::goal("b"),
        },
    ]);

    for _ in 0..64 {
        let picked = selector.resolve(&mut rng);
        assert_eq!(picked.len(), 1);
        assert!(picked[0] == "a" || picked[0] == "b");
    }
}

#[test]
fn group_without_positive_weight_is_empty() {
    let mut rng = StdRng::seed_from_u64(3);
    let selector = GoalSelector::Group(vec![WeightedSelector {
        weight: f64::NAN,
        selector: GoalSelector::goal("a"),
    }]);

    assert!(selector.resolve(&mut rng).is_empty());
}

#[test]
fn group_with_overflowing_weights_is_empty() {
    let mut rng = StdRng::seed_from_u64(3);
    let selector = GoalSelector::Group(vec![
        WeightedSelector {
            weight: f64::MAX,
            selector: GoalSelector::goal("a"),
        },
        WeightedSelector {
            weight: f64::MAX,
            selector: GoalSelector::goal("b"),
        },
    ]);

    assert!(selector.resolve(&mut rng).is_empty());
}

#[test]
fn goal_definition_parses_from_ron() {
    let source = r#"(
        id: "collect_ore",
        icon: Some("icons/ore.png"),
        components: [
            Numeric(
                target_range: Some((0.0, 10.0)),
                resolution: 3.0,
                title: Some("Collect {target} ore"),
            ),
        ],
    )"#;

    let definition: GoalDefinition = ron::from_str(source).expect("valid goal definition");
    assert_eq!(definition.id, "collect_ore");
    assert_eq!(definition.icon.as_deref(), Some("icons/ore.png"));
    assert_eq!(
        definition.components,
        vec![GoalComponentDef::Numeric {
            target: 1.0,
            target_range: Some((0.0, 10.0)),
            resolution: 3.0,
            title: Some("Collect {target} ore".to_string()),
            description: None,
        }]
    );
}

#[test]
fn catalog_looks_up_by_id() {
    let mut catalog = GoalCatalog::default();
    catalog.insert_definition(GoalDefinition::new("blank"));
    catalog.insert_table("starter", GoalSelector::goal("blank"));

    assert!(catalog.definition("blank").is_some());
    assert!(catalog.definition("missing").is_none());
    assert_eq!(catalog.table("starter"), Some(&GoalSelector::goal("blank")));
}

#[test]
fn shipped_goal_assets_parse() {
    let definitions = [
        include_str!("../../../assets/goals/survive.goal.ron"),
        include_str!("../../../assets/goals/visit_location.goal.ron"),
        include_str!("../../../assets/goals/deliver_ore.goal.ron"),
    ];
    for text in definitions {
        let definition: GoalDefinition = ron::from_str(text).unwrap();
        assert!(!definition.components.is_empty(), "{}", definition.id);
    }

    let table: GoalTableDefinition =
        ron::from_str(include_str!("../../../assets/goals/starter.goal_table.ron")).unwrap();
    assert_eq!(table.id, "starter");
    assert!(matches!(table.selector, GoalSelector::All(ref children) if children.len() == 3));
}
