//! Artifact replay
//!
//! Loads a written artifact, rebuilds trajectories, and prints the state at a
//! chosen frame. With `--animate` it steps through every frame instead.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use orbit_ledger::core::error::Result;
use orbit_ledger::core::types::AgentId;
use orbit_ledger::playback::{load_artifact, Playback, Trajectories};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "replay")]
#[command(about = "Inspect a simulation artifact frame by frame")]
struct Args {
    /// Artifact written by orbit-ledger
    #[arg(default_value = "data.json")]
    artifact: PathBuf,

    /// Frame to show; defaults to the last one
    #[arg(long)]
    frame: Option<usize>,

    /// Print every frame from the start
    #[arg(long)]
    animate: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("orbit_ledger=info")),
        )
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let records = load_artifact(&args.artifact)?;
    let trajectories = Trajectories::from_records(&records);
    let mut playback = Playback::new(records.len());

    println!("{} frames from {}", records.len(), args.artifact.display());
    for id in trajectories.agents() {
        if let Some(track) = trajectories.get(id) {
            println!("  {}: {} points", id, track.len());
        }
    }
    if let Some(b) = trajectories.bounds() {
        println!(
            "  x in [{:.4}, {:.4}], y in [{:.4}, {:.4}]",
            b.min_x, b.max_x, b.min_y, b.max_y
        );
    }

    if args.animate {
        playback.play();
        print_frame(&trajectories, playback.index());
        while playback.tick() {
            print_frame(&trajectories, playback.index());
        }
        return Ok(());
    }

    match args.frame {
        Some(frame) => playback.seek(frame),
        None => playback.skip_to_end(),
    }
    print_frame(&trajectories, playback.index());
    Ok(())
}

fn print_frame(trajectories: &Trajectories, frame: usize) {
    match trajectories
        .get(AgentId::Satellite)
        .and_then(|track| track.state_at(frame))
    {
        Some(s) => println!(
            "Frame {:>5}  satellite vx = {:.5}  vy = {:.5}  time = {:.5}",
            frame, s.vx, s.vy, s.time
        ),
        None => println!("Frame {:>5}  satellite not recorded yet", frame),
    }
}
