//! Registry Simulation
//!
//! Drives the registry through several host sessions in which every entity is
//! destroyed and recreated, then samples the weighted index and prints a JSON
//! summary of identities, weights and pick counts.

use clap::Parser;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use entity_model::{Behavior, Entity, HandleId, IdentityHandle};
use entity_registry::{EntityHost, EntityTable, Registry, RegistryConfig, RegistryError, SourceWeight};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "registry_sim")]
#[command(about = "Runs the entity registry against a simulated host")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of host sessions to simulate
    #[arg(long, default_value_t = 3)]
    sessions: u32,

    /// Weighted picks to draw after the last session
    #[arg(long, default_value_t = 1000)]
    picks: u32,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Debug, Serialize)]
struct IdentitySummary {
    handle: HandleId,
    fingerprint: String,
    origin: String,
    live: bool,
    weight: f64,
    picks: u32,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    sessions: u32,
    picks: u32,
    identities: Vec<IdentitySummary>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), RegistryError> {
    let config = match &args.config {
        Some(path) => RegistryConfig::from_file(path)?,
        None => RegistryConfig::default(),
    };

    if args.print_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    init_logging(&config);

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let mut registry = Registry::new(config);
    let mut table = EntityTable::new();
    let catalog = catalog();

    registry.subscribe(|handle: &IdentityHandle| {
        tracing::info!("New identity {}: {}", handle.id(), handle.fingerprint);
    });

    for session in 1..=args.sessions {
        tracing::info!("Starting session {}", session);
        run_session(&mut registry, &mut table, &catalog, &mut rng);
    }

    let mut counts: HashMap<HandleId, u32> = HashMap::new();
    if !registry.index().is_empty() {
        for _ in 0..args.picks {
            let picked = registry.sample(&mut rng)?;
            *counts.entry(picked).or_insert(0) += 1;
        }
    }

    let ids: Vec<HandleId> = registry.discovered().to_vec();
    let mut identities = Vec::with_capacity(ids.len());
    for id in ids {
        let live = registry.resolve(id, &table).is_some();
        let Some(handle) = registry.handle(id) else {
            continue;
        };
        identities.push(IdentitySummary {
            handle: id,
            fingerprint: handle.fingerprint.clone(),
            origin: registry.origin_label(id).unwrap_or_default(),
            live,
            weight: registry.weight_of_handle(id),
            picks: counts.get(&id).copied().unwrap_or(0),
        });
    }

    let summary = RunSummary {
        seed: args.seed,
        sessions: args.sessions,
        picks: args.picks,
        identities,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// One host session: load a scene, construct the rest, capture weights.
fn run_session(registry: &mut Registry, table: &mut EntityTable, catalog: &[Entity], rng: &mut SmallRng) {
    // Session boundary destroys every instance
    table.clear();

    let split = catalog.len() / 2;
    for entity in &catalog[..split] {
        table.spawn(entity.clone());
    }
    registry.on_scene_transition(&*table);

    let mut constructed = Vec::new();
    for entity in &catalog[split..] {
        let instance = table.spawn(entity.clone());
        registry.on_constructed(instance);
        constructed.push(instance);
    }

    // Sometimes the host destroys an entity before it finished initializing
    if rng.gen_bool(0.5) {
        if let Some(instance) = constructed.pop() {
            table.destroy(instance);
        }
    }

    for _ in 0..=registry.config().discovery.construction_delay_ticks {
        registry.tick(&*table);
    }

    let sources: Vec<SourceWeight> = table
        .live_entities()
        .into_iter()
        .map(|(instance, _)| SourceWeight::new(instance, rng.gen_range(1..=100_u32)))
        .collect();
    registry.on_source_list_captured(&*table, Some(&sources));
}

fn init_logging(config: &RegistryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Entities the simulated host knows how to build.
fn catalog() -> Vec<Entity> {
    let base = "Assembly-CSharp";
    vec![
        Entity::new("FlashlightItem", "Flashlight", 3)
            .with_scan_label("Flashlight")
            .with_behavior(Behavior::new("FlashlightItem", "FlashlightItem(Clone)").with_origin(base)),
        Entity::new("Shovel", "Shovel", 5)
            .with_scan_label("Shovel")
            .with_behavior(Behavior::new("Shovel", "Shovel(Clone)").with_origin(base)),
        Entity::new("Blueprint", "Blueprint", 40).with_scan_label("Blueprint"),
        Entity::new("LargeAxle", "Large axle", 18)
            .with_scan_label("Large axle")
            .with_behavior(Behavior::new("PhysicsProp", "LargeAxle(Clone)").with_origin(base)),
        Entity::new("BigBolt", "Big bolt", 19)
            .with_behavior(Behavior::new("PhysicsProp", "BigBolt(Clone)").with_origin(base)),
        Entity::new("Airhorn", "Airhorn", 21)
            .with_scan_label("Airhorn")
            .with_behavior(Behavior::new("NoisemakerProp", "Airhorn(Clone)").with_origin(base)),
        Entity::new("Plushie", "Plushie", 19)
            .with_scan_label("Plushie")
            .with_behavior(Behavior::new("PlushieProp", "Plushie(Clone)").with_origin("PlushieMod")),
    ]
}
