use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use cms_model::{ObjectRole, Simulation, ViewState};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the default log filter.
const LOG_ENV: &str = "CMS_MODEL_LOG";

#[derive(Parser, Debug)]
#[command(name = "cms-model", version)]
struct Cli {
    /// Log filter (e.g. `debug`, `cms_model=trace`). Overrides `CMS_MODEL_LOG`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a simulation document and report whether it is valid.
    Validate(ValidateArgs),
    /// Print topography and pedestrian details of a simulation document.
    Inspect(InspectArgs),
    /// Load a simulation document and write it back in canonical form.
    Normalize(NormalizeArgs),
    /// Print the path of one pedestrian.
    Trajectory(TrajectoryArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input simulation JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input simulation JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Step index (0-based) used for the pedestrian details.
    #[arg(long, default_value_t = 0)]
    step: usize,

    /// Roster index of the pedestrian to describe.
    #[arg(long)]
    pedestrian: Option<usize>,
}

#[derive(Parser, Debug)]
struct NormalizeArgs {
    /// Input simulation JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output simulation JSON.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct TrajectoryArgs {
    /// Input simulation JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Pedestrian id.
    #[arg(long)]
    pedestrian: i64,

    /// Last step (0-based, inclusive). Defaults to the last recorded step.
    #[arg(long)]
    until: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Normalize(args) => cmd_normalize(args),
        Command::Trajectory(args) => cmd_trajectory(args),
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn read_simulation(path: &Path) -> anyhow::Result<Simulation> {
    Simulation::load(path).with_context(|| format!("load simulation '{}'", path.display()))
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let sim = read_simulation(&args.in_path)?;
    println!(
        "ok: {} pedestrians, {}/{} steps{}",
        sim.pedestrians().len(),
        sim.len(),
        sim.n_steps(),
        if sim.is_complete() { " (complete)" } else { "" }
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let sim = read_simulation(&args.in_path)?;
    let topo = sim.topography();

    println!("topography: {}x{}", topo.width(), topo.height());
    for role in ObjectRole::ALL {
        let objects = topo.collection(role);
        println!("  {}: {}", role.collection_key(), objects.len());
        for obj in objects {
            println!("    {obj}");
        }
    }
    println!(
        "pedestrians: {}, steps: {}/{}",
        sim.pedestrians().len(),
        sim.len(),
        sim.n_steps()
    );

    let Some(index) = args.pedestrian else {
        return Ok(());
    };
    let mut view = ViewState::new(&sim);
    view.set_step(args.step)?;
    view.highlight(index)?;
    let info = view
        .pedestrian_info()
        .context("highlighted pedestrian has no position at this step")?;
    println!("step {}:", view.current_step());
    for line in info.to_string().lines() {
        println!("  {line}");
    }
    Ok(())
}

fn cmd_normalize(args: NormalizeArgs) -> anyhow::Result<()> {
    let sim = read_simulation(&args.in_path)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    sim.save(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_trajectory(args: TrajectoryArgs) -> anyhow::Result<()> {
    let sim = read_simulation(&args.in_path)?;
    let until = match args.until {
        Some(until) => until,
        None => sim
            .len()
            .checked_sub(1)
            .context("simulation has no recorded steps")?,
    };
    for (step, pos) in sim.trajectory(args.pedestrian, until)?.iter().enumerate() {
        println!("{step}\t{}\t{}", pos.x, pos.y);
    }
    Ok(())
}
