use clap::{Parser, Subcommand};

use self::{generate_world::GenerateWorldArg, search::SearchArg};

mod generate_world;
mod search;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Search paths with the genetic algorithm over a sweep of configurations
    Search(#[clap(flatten)] SearchArg),
    /// Generate a random world and write it as JSON
    GenerateWorld(#[clap(flatten)] GenerateWorldArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Search(arg) => search::run(&arg)?,
        Mode::GenerateWorld(arg) => generate_world::run(&arg)?,
    }
    Ok(())
}
