//! Sporeling Headless Simulation Harness
//!
//! Loads the bundled balance and level data, then drives scripted scenarios
//! through the engine. Runs entirely in-process, with no window or renderer.
//!
//! Usage:
//!   cargo run -p sporeling-simtest
//!   cargo run -p sporeling-simtest -- --verbose
//!   RUST_LOG=debug cargo run -p sporeling-simtest

use sporeling_core::prelude::*;
use sporeling_core::generation::SpawnSpec;
use sporeling_logic::damage::Vitals;
use sporeling_logic::economy::{PlayerEconomy, UpgradeCost};
use sporeling_logic::interaction::{classify_contact, Contact};
use sporeling_logic::win::is_notable;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── Bundled data (same JSON a game build ships) ─────────────────────────
const BALANCE_JSON: &str = include_str!("../../../data/balance.json");
const LEVEL_JSON: &str = include_str!("../../../data/level.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    init_tracing();
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Sporeling Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Bundled data
    let data = validate_data(&mut results, verbose);

    // 2. Damage pipeline
    results.extend(validate_damage());

    // 3. Economy
    results.extend(validate_economy());

    // 4. Interaction table
    results.extend(validate_interactions(verbose));

    if let Some((balance, level)) = data {
        // 5. Scripted level run
        results.extend(scenario_harvest_and_morph(&balance, &level, verbose));

        // 6. Long random soak
        results.extend(scenario_soak(&balance, &level, verbose));
    }

    // 7. Victory and defeat
    results.extend(scenario_end_states());

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Bundled Data ─────────────────────────────────────────────────────

fn validate_data(
    results: &mut Vec<TestResult>,
    verbose: bool,
) -> Option<(BalanceConfig, LevelLayout)> {
    println!("--- Bundled Data ---");

    let balance = match BalanceConfig::from_json_str(BALANCE_JSON) {
        Ok(b) => b,
        Err(e) => {
            results.push(check("balance_parse", false, format!("{}", e)));
            return None;
        }
    };
    results.push(check("balance_parse", true, "balance.json loaded and validated"));

    let level = match LevelLayout::from_json_str(LEVEL_JSON) {
        Ok(l) => l,
        Err(e) => {
            results.push(check("level_parse", false, format!("{}", e)));
            return None;
        }
    };
    results.push(check(
        "level_parse",
        true,
        format!("'{}' with {} spawns", level.name, level.spawns.len()),
    ));

    // Enough notable creatures exist to reach the win target
    let notable = level.spawns.iter().filter(|s| is_notable(s.size_multiplier)).count() as u32;
    results.push(check(
        "level_win_reachable",
        notable >= level.win_target,
        format!("{} notable spawns for target {}", notable, level.win_target),
    ));

    // One tick of movement cannot tunnel through an obstacle
    let reach = balance.max_step_distance();
    let smallest = level.smallest_obstacle_radius().unwrap_or(f32::INFINITY);
    results.push(check(
        "level_no_tunneling",
        reach < smallest,
        format!("max step {:.2} vs smallest obstacle {:.2}", reach, smallest),
    ));

    // Spawns are not placed on top of the player
    let crowded: Vec<&SpawnSpec> = level
        .spawns
        .iter()
        .filter(|s| s.class != ActorClass::Critter)
        .filter(|s| s.position.distance(&level.player_start) < 5.0)
        .collect();
    results.push(check(
        "level_safe_start",
        crowded.is_empty(),
        format!("{} fighters within 5 units of the start", crowded.len()),
    ));

    if verbose {
        println!("  Spawn roster:");
        for class in ActorClass::ALL {
            let n = level.spawns.iter().filter(|s| s.class == class).count();
            println!("    {:9}: {}", class, n);
        }
    }

    Some((balance, level))
}

// ── 2. Damage Pipeline ──────────────────────────────────────────────────

fn validate_damage() -> Vec<TestResult> {
    println!("--- Damage Pipeline ---");
    let mut results = Vec::new();

    let mut v = Vitals {
        max_hp: 100,
        current_hp: 100,
        shield: 10,
    };
    let out = v.apply_damage(30, 5);
    results.push(check(
        "damage_shield_then_armor",
        out.shield_absorbed == 10 && out.hp_lost == 15 && v.shield == 0,
        format!("absorbed {} lost {} shield {}", out.shield_absorbed, out.hp_lost, v.shield),
    ));

    let mut v = Vitals::full(50);
    let out = v.apply_damage(3, 10);
    results.push(check(
        "damage_minimum_one",
        out.hp_lost == 1,
        format!("raw 3 vs armor 10 lost {}", out.hp_lost),
    ));

    let mut v = Vitals {
        max_hp: 40,
        current_hp: 10,
        shield: 0,
    };
    v.apply_damage(-50, 0);
    results.push(check(
        "damage_heal_capped",
        v.current_hp == 40,
        format!("healed to {}/40", v.current_hp),
    ));

    results
}

// ── 3. Economy ──────────────────────────────────────────────────────────

fn validate_economy() -> Vec<TestResult> {
    println!("--- Economy ---");
    let mut results = Vec::new();
    let curve = UpgradeCost {
        base_biomass: 50,
        base_gas: 50,
        step_biomass: 50,
        step_gas: 50,
    };

    let mut poor = PlayerEconomy::new(Currencies::new(40, 40, 0));
    let rejected = poor.purchase_upgrade(UpgradeKind::Attack, &curve).is_err();
    results.push(check(
        "economy_upgrade_unaffordable",
        rejected && poor.wallet == Currencies::new(40, 40, 0) && poor.attack_level == 0,
        "40/40 cannot buy a 50/50 upgrade",
    ));

    let mut rich = PlayerEconomy::new(Currencies::new(100, 100, 0));
    let bought = rich.purchase_upgrade(UpgradeKind::Attack, &curve);
    results.push(check(
        "economy_upgrade_once",
        bought == Ok(1) && rich.wallet == Currencies::new(50, 50, 0),
        format!("level {:?}, wallet {:?}", bought, rich.wallet),
    ));

    let next = curve.at_level(rich.attack_level);
    results.push(check(
        "economy_cost_curve",
        next == Currencies::new(100, 100, 0),
        format!("level 1 costs {:?}", next),
    ));

    results
}

// ── 4. Interaction Table ────────────────────────────────────────────────

fn validate_interactions(verbose: bool) -> Vec<TestResult> {
    println!("--- Interaction Table ---");
    let mut results = Vec::new();

    let mut asymmetric = Vec::new();
    for a in ActorClass::ALL {
        for b in ActorClass::ALL {
            let fwd = classify_contact(a, b) == Contact::Fight;
            let back = classify_contact(b, a) == Contact::Fight;
            if fwd != back {
                asymmetric.push(format!("{}/{}", a, b));
            }
        }
    }
    results.push(check(
        "interaction_fight_symmetric",
        asymmetric.is_empty(),
        if asymmetric.is_empty() {
            "fight rule is symmetric".to_string()
        } else {
            asymmetric.join(", ")
        },
    ));

    let eaters = ActorClass::ALL
        .iter()
        .filter(|c| classify_contact(**c, ActorClass::Critter) == Contact::Eat)
        .count();
    results.push(check(
        "interaction_critters_edible",
        eaters == ActorClass::ALL.len() - 1,
        format!("{} classes can eat critters", eaters),
    ));

    if verbose {
        for class in ActorClass::ALL {
            let s = class.stats();
            println!(
                "    {:9} hp {:3} armor {} dmg {:2} cd {:.1}s r {:.1} speed {:.1}",
                class, s.max_hp, s.armor, s.damage, s.attack_cooldown, s.radius, s.speed
            );
        }
    }

    results
}

// ── 5. Scripted Level Run ───────────────────────────────────────────────

fn scenario_harvest_and_morph(
    balance: &BalanceConfig,
    level: &LevelLayout,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Scripted Level Run ---");
    let mut results = Vec::new();
    let mut engine = SimulationEngine::new(balance.clone());
    engine.start_level(level.clone());

    let start = engine.economy().wallet;
    engine.set_movement(MoveFlags {
        right: true,
        ..Default::default()
    });
    for _ in 0..10 {
        engine.update(0.1);
    }
    engine.set_movement(MoveFlags::default());
    engine.update(0.1);

    let after_harvest = engine.economy().wallet;
    let harvested = engine
        .drain_events()
        .iter()
        .filter(|e| matches!(e, GameEvent::NodeHarvested { .. }))
        .count();
    results.push(check(
        "run_harvest_node",
        harvested >= 1 && after_harvest.biomass >= start.biomass + 60,
        format!("{} nodes, biomass {} -> {}", harvested, start.biomass, after_harvest.biomass),
    ));

    let cost = ActorClass::Drone.stats().morph_cost;
    engine.request_morph_named("drone");
    engine.update(0.1);
    let cocooned = engine.is_morphing() && engine.player_entity().is_none();
    let steps = (balance.morph_duration_seconds / 0.1).ceil() as usize + 5;
    for _ in 0..steps {
        engine.update(0.1);
    }
    let status = engine.player_status();
    let hatched_as = status.map(|s| s.class);
    results.push(check(
        "run_morph_cycle",
        cocooned && hatched_as == Some(ActorClass::Drone),
        format!("cocooned={} hatched as {:?}", cocooned, hatched_as),
    ));

    let wallet = engine.economy().wallet;
    results.push(check(
        "run_morph_cost_once",
        wallet.biomass + cost.biomass >= after_harvest.biomass,
        format!("biomass {} -> {} (cost {})", after_harvest.biomass, wallet.biomass, cost.biomass),
    ));

    engine.request_morph_named("wyvern");
    engine.update(0.1);
    results.push(check(
        "run_unknown_morph_ignored",
        !engine.is_morphing(),
        "unknown class names are dropped",
    ));

    let snapshot = serde_json::to_string(&engine.player_status());
    results.push(check(
        "run_status_serializes",
        snapshot.is_ok(),
        match &snapshot {
            Ok(json) => format!("{} bytes", json.len()),
            Err(e) => e.to_string(),
        },
    ));

    if verbose {
        if let Ok(json) = snapshot {
            println!("  Player status: {}", json);
        }
    }
    results
}

// ── 6. Random Soak ──────────────────────────────────────────────────────

fn scenario_soak(balance: &BalanceConfig, level: &LevelLayout, verbose: bool) -> Vec<TestResult> {
    println!("--- Random Soak ---");
    let mut results = Vec::new();
    let mut engine = SimulationEngine::new(balance.clone());
    engine.start_level(level.clone());
    let inset = balance.boundary_inset;
    let bounds = *engine.bounds();

    let inputs = [
        MoveFlags { up: true, ..Default::default() },
        MoveFlags { right: true, up: true, ..Default::default() },
        MoveFlags { left: true, ..Default::default() },
        MoveFlags { down: true, right: true, ..Default::default() },
        MoveFlags::default(),
    ];

    let mut escaped = 0;
    let mut bad_vitals = 0;
    let mut double_booked = 0;
    let mut ticks = 0;
    for i in 0..3000usize {
        if i % 40 == 0 {
            engine.set_movement(inputs[(i / 40) % inputs.len()]);
        }
        engine.update(1.0 / 60.0);
        ticks += 1;

        for view in engine.actors() {
            if !bounds.contains_inset(view.position, inset - 1e-3) {
                escaped += 1;
            }
            if view.current_hp < 0 || view.current_hp > view.max_hp || view.shield < 0 {
                bad_vitals += 1;
            }
        }
        let mut seen = Vec::new();
        for row in engine.engagements().iter() {
            if seen.contains(&row.a) || seen.contains(&row.b) {
                double_booked += 1;
            }
            seen.push(row.a);
            seen.push(row.b);
        }
        if engine.is_game_over() {
            break;
        }
    }

    info!(ticks, game_over = engine.is_game_over(), "soak finished");
    results.push(check(
        "soak_arena_containment",
        escaped == 0,
        format!("{} escapes in {} ticks", escaped, ticks),
    ));
    results.push(check(
        "soak_vitals_in_bounds",
        bad_vitals == 0,
        format!("{} bad readings", bad_vitals),
    ));
    results.push(check(
        "soak_single_engagement",
        double_booked == 0,
        format!("{} double bookings", double_booked),
    ));

    if verbose {
        println!(
            "  Soak: {} ticks, {:.1}s simulated, {} actors left, wallet {:?}",
            ticks,
            engine.sim_time(),
            engine.actors().len(),
            engine.economy().wallet
        );
    }
    results
}

// ── 7. Victory and Defeat ───────────────────────────────────────────────

#[derive(Default)]
struct Tally {
    wins: u32,
    deaths: u32,
}

impl GameEventListener for Tally {
    fn on_player_death(&mut self) {
        self.deaths += 1;
    }
    fn on_win(&mut self) {
        self.wins += 1;
    }
}

fn duel(player_class: ActorClass, foes: Vec<SpawnSpec>) -> (SimulationEngine, Tally) {
    let layout = LevelLayout {
        name: "duel".into(),
        obstacles: Vec::new(),
        resource_nodes: Vec::new(),
        hazard_nodes: Vec::new(),
        spawns: foes,
        player_class,
        win_target: 1,
        ..LevelLayout::default()
    };
    let config = BalanceConfig {
        seed: Some(3),
        ..BalanceConfig::default()
    };
    let mut engine = SimulationEngine::new(config);
    engine.start_level(layout);

    let mut tally = Tally::default();
    for _ in 0..400 {
        engine.update(0.1);
        engine.dispatch_events(&mut tally);
    }
    (engine, tally)
}

fn scenario_end_states() -> Vec<TestResult> {
    println!("--- Victory and Defeat ---");
    let mut results = Vec::new();
    let start = LevelLayout::default().player_start;
    let foe = |class, dx: f32, size| SpawnSpec {
        class,
        position: Vec2::new(start.x + dx, start.y),
        size_multiplier: size,
    };

    let (engine, tally) = duel(
        ActorClass::Behemoth,
        vec![foe(ActorClass::Larva, 2.0, 1.5), foe(ActorClass::Larva, -2.0, 1.5)],
    );
    results.push(check(
        "end_victory_once",
        tally.wins == 1 && engine.is_victory() && !engine.is_game_over(),
        format!("wins {} counter {}", tally.wins, engine.win_progress().counter),
    ));

    let (engine, tally) = duel(ActorClass::Larva, vec![foe(ActorClass::Behemoth, 3.0, 2.0)]);
    results.push(check(
        "end_defeat",
        tally.deaths == 1 && engine.is_game_over() && engine.player_status().is_none(),
        format!("deaths {} game_over {}", tally.deaths, engine.is_game_over()),
    ));

    results
}
