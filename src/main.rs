//! Civitas - batch runner
//!
//! Thin collaborator around the simulation core: builds a world from CLI
//! parameters, advances it a fixed number of steps, and reports the
//! statistics snapshot along the way. No simulation logic lives here.

use clap::Parser;

use civitas::core::error::Result;
use civitas::core::WorldConfig;
use civitas::World;

#[derive(Parser, Debug)]
#[command(name = "civitas", about = "Emergent city-society simulation")]
struct Args {
    /// Steps to simulate
    #[arg(long, default_value_t = 500)]
    steps: u64,

    /// RNG seed (identical seeds reproduce identical runs)
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Grid width
    #[arg(long, default_value_t = 20)]
    width: i32,

    /// Grid height
    #[arg(long, default_value_t = 20)]
    height: i32,

    /// Initial citizen count
    #[arg(long, default_value_t = 50)]
    citizens: u32,

    /// Print the stats snapshot every N steps (0 = only at the end)
    #[arg(long, default_value_t = 100)]
    report_every: u64,

    /// Emit the final snapshot as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("civitas=info")),
        )
        .init();

    let args = Args::parse();
    let config = WorldConfig {
        width: args.width,
        height: args.height,
        citizens: args.citizens,
        seed: args.seed,
        ..WorldConfig::default()
    };

    let mut world = World::new(config)?;
    tracing::info!(
        citizens = args.citizens,
        width = args.width,
        height = args.height,
        seed = args.seed,
        "world created"
    );

    for step in 0..args.steps {
        world.step();
        if args.report_every > 0 && (step + 1) % args.report_every == 0 {
            report(&world);
        }
        if world.stats().alive_citizens == 0 {
            tracing::warn!(step, "population extinct, stopping early");
            break;
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(world.stats())?);
    } else {
        report(&world);
    }
    Ok(())
}

fn report(world: &World) {
    let stats = world.stats();
    println!(
        "step {:>5} | alive {:>3} dead {:>3} | hunger {:>5.1} energy {:>5.1} health {:>5.1} | \
         coins {:>5.1} | families {:>2} | tech {:>2} leaders {} conflicts {} art {}",
        stats.step,
        stats.alive_citizens,
        stats.dead_citizens,
        stats.avg_hunger,
        stats.avg_energy,
        stats.avg_health,
        stats.avg_coins,
        stats.families,
        stats.technologies,
        stats.leaders,
        stats.active_conflicts,
        stats.art_works,
    );
}
