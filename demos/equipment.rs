//! Equip a character, read its stats and dump the breakdown.
//!
//! Run with: `RUST_LOG=debug cargo run --example equipment`

use statkit::condition::when_tag;
use statkit::registry::builtin;
use statkit::*;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let registry = Arc::new(StatRegistry::with_defaults());
    let mut player = StatContainer::new(registry).with_listener(|change| {
        if change.has_changed(1e-9) {
            println!(
                "  {} {:.2} -> {:.2} ({:+.2})",
                change.stat_id,
                change.old_value,
                change.new_value,
                change.delta()
            );
        }
    });

    let armor = StatId::new(builtin::ARMOR)?;
    let damage = StatId::new(builtin::ATTACK_DAMAGE)?;
    let health = StatId::new(builtin::HEALTH)?;

    let chestplate = StatSourceId::new("item:iron_chestplate")?;
    let sword = StatSourceId::new("item:iron_sword")?;
    let smite = StatSourceId::new("enchant:smite")?;

    println!("Seeding class defaults:");
    player.set_base_if_uncustomized(&damage, 4.0)?;
    player.set_base_if_uncustomized(&health, 24.0)?;

    println!("Equipping gear:");
    player.add_modifier(StatModifier::flat(armor.clone(), chestplate.clone(), 6.0))?;
    player.add_modifier(StatModifier::flat(damage.clone(), sword.clone(), 2.0))?;
    player.add_modifier(StatModifier::percent_add(damage.clone(), sword.clone(), 0.25))?;
    player.add_modifier(
        StatModifier::percent_mult(damage.clone(), smite, 0.25)
            .with_condition(when_tag("target:undead")),
    )?;

    let vs_undead = ConditionContext::empty().with_tag("target:undead");
    println!(
        "Attack damage: {:.2} (vs undead {:.2})",
        player.get_stat(&damage)?,
        player.compute_stat(&damage, &vs_undead)?
    );

    println!();
    for snapshot in player.debug_view() {
        print!("{}", snapshot);
    }

    println!();
    println!("Unequipping sword:");
    player.clear_source(&sword);

    println!();
    println!("{}", serde_json::to_string_pretty(&player.debug_view())?);

    Ok(())
}
