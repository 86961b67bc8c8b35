use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tlm_app::{AppError, AppResult, Essentials};

#[derive(Parser)]
#[command(name = "tlm-cli")]
#[command(about = "TLM network simulation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a model file's syntax and structure
    Validate {
        /// Path to the model YAML file
        model_path: PathBuf,
    },
    /// List the registered component types
    Components,
    /// Run a simulation and export the logged channels as CSV
    Run {
        /// Path to the model YAML file
        model_path: PathBuf,
        /// Override the model's stop time in seconds
        #[arg(long)]
        stop_time: Option<f64>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { model_path } => cmd_validate(&model_path),
        Commands::Components => cmd_components(),
        Commands::Run {
            model_path,
            stop_time,
            output,
        } => cmd_run(&model_path, stop_time, output.as_deref()),
    }
}

fn cmd_validate(model_path: &Path) -> AppResult<()> {
    println!("Validating model: {}", model_path.display());
    // Loading already validates; building catches unknown types and
    // bad connections on top.
    let model = tlm_project::load_yaml(model_path)?;
    let mut ess = Essentials::new();
    ess.build_model(&model)?;
    println!("✓ Model is valid");
    Ok(())
}

fn cmd_components() -> AppResult<()> {
    let ess = Essentials::new();
    println!("Registered component types:");
    for name in ess.factory().type_names() {
        println!("  {}", name);
    }
    Ok(())
}

fn cmd_run(model_path: &Path, stop_time: Option<f64>, output: Option<&Path>) -> AppResult<()> {
    let model = tlm_project::load_yaml(model_path)?;
    let stop = stop_time.unwrap_or(model.settings.stop_time);
    eprintln!(
        "Running {}: t = {} .. {} s, dt = {} s",
        model.name, model.settings.start_time, stop, model.settings.timestep
    );

    let mut ess = Essentials::new();
    let mut sys = ess.build_model(&model)?;

    if !ess.initialize(&mut sys, model.settings.start_time, stop) {
        report_messages(&mut ess);
        return Err(AppError::Run("initialization failed".into()));
    }
    if !ess.simulate(&mut sys, stop) {
        report_messages(&mut ess);
        return Err(AppError::Run("simulation failed".into()));
    }
    ess.finalize(&mut sys);
    report_messages(&mut ess);

    let logger = sys.logger();
    if logger.channel_count() == 0 {
        eprintln!("No log channels in model; nothing to export");
        return Ok(());
    }

    let mut csv = String::from("time_s");
    for label in logger.labels() {
        csv.push(',');
        csv.push_str(label);
    }
    csv.push('\n');
    let columns: Vec<&[f64]> = logger
        .labels()
        .filter_map(|label| logger.series(label))
        .collect();
    for (i, t) in logger.time().iter().enumerate() {
        csv.push_str(&format!("{}", t));
        for col in &columns {
            csv.push_str(&format!(",{}", col[i]));
        }
        csv.push('\n');
    }

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        eprintln!(
            "✓ Exported {} samples to {}",
            logger.time().len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }
    Ok(())
}

fn report_messages(ess: &mut Essentials) {
    for msg in ess.drain_messages() {
        eprintln!("{}", msg);
    }
}
