use statkit::condition::{predicate, when_tag};
use statkit::*;
use std::sync::{Arc, Mutex};

fn id(s: &str) -> StatId {
    StatId::new(s).unwrap()
}

fn src(s: &str) -> StatSourceId {
    StatSourceId::new(s).unwrap()
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn registry(definitions: Vec<StatDefinition>) -> Arc<StatRegistry> {
    let mut registry = StatRegistry::new();
    registry.register_all(definitions).unwrap();
    Arc::new(registry)
}

fn recording(registry: Arc<StatRegistry>) -> (StatContainer, Arc<Mutex<Vec<StatValueChange>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let container = StatContainer::new(registry)
        .with_listener(move |change| sink.lock().unwrap().push(change.clone()));
    (container, log)
}

/// Equip and unequip a single flat item.
#[test]
fn test_equip_and_unequip() {
    let armor = id("armor");
    let mut stats = StatContainer::new(registry(vec![
        StatDefinition::new(armor.clone(), 0.0, 0.0, f64::INFINITY).unwrap(),
    ]));

    stats
        .add_modifier(StatModifier::flat(armor.clone(), src("boots"), 5.0))
        .unwrap();
    assert_eq!(stats.get_stat(&armor).unwrap(), 5.0);

    stats.clear_source(&src("boots"));
    assert_eq!(stats.get_stat(&armor).unwrap(), 0.0);
}

/// Conditional multiplier applies only under a matching context.
#[test]
fn test_conditional_enchantment() {
    let damage = id("attack_damage");
    let mut stats = StatContainer::new(registry(vec![
        StatDefinition::new(damage.clone(), 4.0, 0.0, 2048.0).unwrap(),
    ]));

    stats
        .add_modifier(StatModifier::percent_mult(
            damage.clone(),
            src("enchant:sharpness"),
            0.5,
        ))
        .unwrap();
    stats
        .add_modifier(
            StatModifier::percent_mult(damage.clone(), src("enchant:smite"), 0.25)
                .with_condition(when_tag("target:undead")),
        )
        .unwrap();

    let vs_undead = ConditionContext::empty().with_tag("target:undead");
    assert!(approx_eq(stats.compute_stat(&damage, &vs_undead).unwrap(), 7.5));
    assert!(approx_eq(
        stats.compute_stat(&damage, ConditionContext::empty()).unwrap(),
        6.0
    ));
    assert!(approx_eq(stats.get_stat(&damage).unwrap(), 6.0));
}

/// Large negative flat modifiers clamp to the lower bound.
#[test]
fn test_poison_clamps_to_zero() {
    let health = id("health");
    let mut stats = StatContainer::new(registry(vec![
        StatDefinition::new(health.clone(), 20.0, 0.0, 20.0).unwrap(),
    ]));

    stats
        .add_modifier(StatModifier::flat(health.clone(), src("poison"), -999.0))
        .unwrap();
    assert_eq!(stats.get_stat(&health).unwrap(), 0.0);
}

#[test]
fn test_duplicate_registration() {
    let speed = id("speed");
    let mut registry = StatRegistry::new();
    registry
        .register(StatDefinition::new(speed.clone(), 0.1, 0.0, 1.0).unwrap())
        .unwrap();

    let result = registry.register(StatDefinition::new(speed.clone(), 0.5, 0.0, 1.0).unwrap());
    assert!(matches!(result, Err(StatError::DuplicateStat(ref dup)) if dup == &speed));

    let matching: Vec<_> = registry.all().into_iter().filter(|d| d.id() == &speed).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].base(), 0.1);
}

/// Clearing a source reports exactly one change per affected stat.
#[test]
fn test_clear_source_across_stats() {
    let armor = id("armor");
    let damage = id("attack_damage");
    let speed = id("movement_speed");
    let (mut stats, log) = recording(Arc::new(StatRegistry::with_defaults()));

    stats
        .add_modifier(StatModifier::flat(armor.clone(), src("itemA"), 3.0))
        .unwrap();
    stats
        .add_modifier(StatModifier::percent_add(damage.clone(), src("itemA"), 1.0))
        .unwrap();
    stats
        .add_modifier(StatModifier::flat(speed.clone(), src("itemB"), 0.05))
        .unwrap();
    log.lock().unwrap().clear();

    assert_eq!(stats.clear_source(&src("itemA")), 2);

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 2);
    assert!(log.iter().all(|change| change.stat_id != speed));
    assert!(log.iter().any(|c| c.stat_id == armor && c.old_value == 3.0 && c.new_value == 0.0));
    assert!(log.iter().any(|c| c.stat_id == damage && c.old_value == 2.0 && c.new_value == 1.0));
    drop(log);

    assert!(approx_eq(stats.get_stat(&speed).unwrap(), 0.15));
}

/// ((b + f) * (1 + p)) * (1 + m) on an unbounded stat.
#[test]
fn test_op_ordering_law() {
    let cases = [
        (10.0, 5.0, 0.2, 0.5),
        (-3.0, 1.5, -0.4, 2.0),
        (0.0, 0.0, 0.0, 0.0),
        (7.25, -20.0, 1.75, -0.9),
    ];

    for (b, f, p, m) in cases {
        let stat = id("unbounded");
        let mut stats = StatContainer::new(registry(vec![StatDefinition::new(
            stat.clone(),
            b,
            f64::NEG_INFINITY,
            f64::INFINITY,
        )
        .unwrap()]));

        // Insert in reverse op order; evaluation order must not depend on it.
        stats
            .add_modifier(StatModifier::percent_mult(stat.clone(), src("m"), m))
            .unwrap();
        stats
            .add_modifier(StatModifier::percent_add(stat.clone(), src("p"), p))
            .unwrap();
        stats
            .add_modifier(StatModifier::flat(stat.clone(), src("f"), f))
            .unwrap();

        let expected = ((b + f) * (1.0 + p)) * (1.0 + m);
        assert!(approx_eq(stats.get_stat(&stat).unwrap(), expected));
    }
}

#[test]
fn test_final_value_stays_in_bounds() {
    let stat = id("armor");
    let mut stats = StatContainer::new(registry(vec![
        StatDefinition::new(stat.clone(), 5.0, 0.0, 30.0).unwrap(),
    ]));

    let pathological = [
        StatModifier::flat(stat.clone(), src("a"), -1e9),
        StatModifier::percent_add(stat.clone(), src("b"), -5.0),
        StatModifier::percent_mult(stat.clone(), src("c"), 1e6),
        StatModifier::flat(stat.clone(), src("d"), 1e9),
        StatModifier::percent_mult(stat.clone(), src("e"), -3.0),
    ];

    for modifier in pathological {
        stats.add_modifier(modifier).unwrap();
        let value = stats.get_stat(&stat).unwrap();
        assert!((0.0..=30.0).contains(&value), "{} out of bounds", value);
    }
}

/// Overflowing modifiers that collapse to NaN still yield an in-bounds value.
#[test]
fn test_overflow_to_nan_stays_in_bounds() {
    let stat = id("armor");
    let mut stats = StatContainer::new(registry(vec![
        StatDefinition::new(stat.clone(), 5.0, 0.0, 30.0).unwrap(),
    ]));

    stats
        .add_modifier(StatModifier::flat(stat.clone(), src("a"), f64::MAX))
        .unwrap();
    stats
        .add_modifier(StatModifier::flat(stat.clone(), src("b"), f64::MAX))
        .unwrap();
    stats
        .add_modifier(StatModifier::percent_add(stat.clone(), src("c"), -1.0))
        .unwrap();

    let value = stats.get_stat(&stat).unwrap();
    assert!((0.0..=30.0).contains(&value), "{} out of bounds", value);
    assert_eq!(value, 5.0);

    let vs_undead = ConditionContext::empty().with_tag("target:undead");
    let value = stats.compute_stat(&stat, &vs_undead).unwrap();
    assert!((0.0..=30.0).contains(&value));
}

#[test]
fn test_nan_base_is_rejected() {
    let result = StatDefinition::new(id("health"), f64::NAN, 0.0, 20.0);
    assert!(matches!(result, Err(StatError::InvalidBase { .. })));
}

#[test]
fn test_compute_is_deterministic() {
    let stat = id("attack_speed");
    let mut stats = StatContainer::new(Arc::new(StatRegistry::with_defaults()));
    stats
        .add_modifier(StatModifier::percent_add(stat.clone(), src("haste"), 0.3))
        .unwrap();
    stats
        .add_modifier(
            StatModifier::flat(stat.clone(), src("rage"), 2.0)
                .with_condition(predicate("low health", |ctx| {
                    ctx.attribute::<f64>("health_fraction")
                        .is_some_and(|fraction| fraction < 0.25)
                })),
        )
        .unwrap();

    let context = ConditionContext::empty().with_attribute("health_fraction", 0.1);
    let first = stats.compute_stat(&stat, &context).unwrap();
    for _ in 0..10 {
        assert_eq!(stats.compute_stat(&stat, &context).unwrap(), first);
    }
    assert!(approx_eq(first, 7.8));
    assert!(approx_eq(stats.get_stat(&stat).unwrap(), 5.2));
}

#[test]
fn test_clear_source_is_scoped() {
    let (armor, damage) = (id("armor"), id("attack_damage"));
    let mut stats = StatContainer::new(Arc::new(StatRegistry::with_defaults()));

    for (stat, source) in [
        (&armor, "itemA"),
        (&armor, "itemB"),
        (&damage, "itemA"),
        (&damage, "itemA"),
    ] {
        stats
            .add_modifier(StatModifier::flat(stat.clone(), src(source), 1.0))
            .unwrap();
    }
    stats
        .add_modifier(StatModifier::percent_mult(damage.clone(), src("itemA"), 0.5))
        .unwrap();

    stats.clear_source(&src("itemA"));

    for snapshot in stats.debug_view() {
        assert_eq!(snapshot.modifiers_from(&src("itemA")).count(), 0);
    }
    assert_eq!(stats.get_stat(&armor).unwrap(), 1.0);
    assert_eq!(stats.get_stat(&damage).unwrap(), 1.0);
}

#[test]
fn test_noop_removal() {
    let armor = id("armor");
    let (mut stats, log) = recording(Arc::new(StatRegistry::with_defaults()));
    stats
        .add_modifier(StatModifier::flat(armor.clone(), src("boots"), 2.0))
        .unwrap();
    log.lock().unwrap().clear();

    assert!(!stats.remove_modifier(&armor, &src("helmet")).unwrap());
    assert_eq!(stats.get_stat(&armor).unwrap(), 2.0);

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert!(!log[0].has_changed(0.0));
}

#[test]
fn test_cache_coherence() {
    let armor = id("armor");
    let mut stats = StatContainer::new(Arc::new(StatRegistry::with_defaults()));

    assert_eq!(stats.get_stat(&armor).unwrap(), 0.0);
    stats.set_base(&armor, 4.0).unwrap();
    assert_eq!(stats.get_stat(&armor).unwrap(), 4.0);
    stats
        .add_modifier(StatModifier::flat(armor.clone(), src("boots"), 2.0))
        .unwrap();
    assert_eq!(stats.get_stat(&armor).unwrap(), 6.0);
    assert!(stats.remove_modifier(&armor, &src("boots")).unwrap());
    assert_eq!(stats.get_stat(&armor).unwrap(), 4.0);
}

#[test]
fn test_customization_gate() {
    let toughness = id("armor_toughness");
    let mut stats = StatContainer::new(Arc::new(StatRegistry::with_defaults()));

    assert!(!stats.is_customized(&toughness).unwrap());
    assert!(stats.set_base_if_uncustomized(&toughness, 2.0).unwrap());
    assert!(stats.is_customized(&toughness).unwrap());

    assert!(!stats.set_base_if_uncustomized(&toughness, 8.0).unwrap());
    assert_eq!(stats.get_stat(&toughness).unwrap(), 2.0);

    stats.set_base(&toughness, 0.0).unwrap();
    assert!(!stats.is_customized(&toughness).unwrap());
    stats
        .add_modifier(StatModifier::flat(toughness.clone(), src("plate"), 1.0))
        .unwrap();
    assert!(!stats.set_base_if_uncustomized(&toughness, 8.0).unwrap());
    assert_eq!(stats.get_stat(&toughness).unwrap(), 1.0);
}

#[test]
fn test_unknown_stat_is_an_error() {
    let mut stats = StatContainer::new(Arc::new(StatRegistry::with_defaults()));
    let mana = id("mana");

    assert!(matches!(stats.get_stat(&mana), Err(StatError::UnknownStat(_))));
    assert!(matches!(stats.set_base(&mana, 1.0), Err(StatError::UnknownStat(_))));
    assert!(matches!(
        stats.add_modifier(StatModifier::flat(mana.clone(), src("x"), 1.0)),
        Err(StatError::UnknownStat(_))
    ));
    assert!(stats.is_empty());
}

#[test]
fn test_debug_view_breakdown() {
    let damage = id("attack_damage");
    let mut stats = StatContainer::new(Arc::new(StatRegistry::with_defaults()));
    stats.set_base(&damage, 4.0).unwrap();
    stats
        .add_modifier(StatModifier::percent_add(damage.clone(), src("sword"), 0.5).with_priority(3))
        .unwrap();
    stats
        .add_modifier(
            StatModifier::flat(damage.clone(), src("rune"), 1.0).with_condition(when_tag("night")),
        )
        .unwrap();

    let view = stats.debug_view();
    assert_eq!(view.len(), 1);

    let snapshot = &view[0];
    assert_eq!(snapshot.base_value, 4.0);
    assert!(snapshot.base_overridden);
    assert_eq!(snapshot.final_value, 6.0);
    assert_eq!(snapshot.modifiers[0].op, ModifierOp::Flat);
    assert_eq!(snapshot.modifiers[0].condition, "tag(night)");
    assert_eq!(snapshot.modifiers[1].priority, 3);
}

#[test]
fn test_shared_registry_independent_containers() {
    let registry = Arc::new(StatRegistry::with_defaults());
    let health = id("health");
    let mut player = StatContainer::new(Arc::clone(&registry));
    let mut zombie = StatContainer::new(Arc::clone(&registry));

    player.set_base(&health, 40.0).unwrap();
    assert_eq!(player.get_stat(&health).unwrap(), 40.0);
    assert_eq!(zombie.get_stat(&health).unwrap(), 20.0);
    assert!(Arc::ptr_eq(player.registry(), zombie.registry()));
}
