use std::path::PathBuf;

use anyhow::Context as _;
use gapath_world::GridWorld;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateWorldArg {
    /// Number of rows and columns of the grid
    #[arg(long, default_value_t = 10)]
    size: usize,
    /// Number of obstacles
    #[arg(long, default_value_t = 0)]
    obstacles: usize,
    /// Seed of the random number generator
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateWorldArg) -> anyhow::Result<()> {
    let GenerateWorldArg {
        size,
        obstacles,
        seed,
        output,
    } = arg;

    let (seed, mut rng) = util::seeded_rng(*seed);
    let world = GridWorld::random(*size, *obstacles, &mut rng).with_context(|| {
        format!("Failed to generate a {size}x{size} world with {obstacles} obstacles")
    })?;
    eprintln!(
        "Generated world (seed {seed}): start {}, destination {}, {} obstacles",
        world.start(),
        world.destination(),
        world.obstacle_count()
    );

    Output::save_json(&world, output.clone())?;
    Ok(())
}
