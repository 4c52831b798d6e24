use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xp_core::units::{gpa, in_gpa, in_kelvin, k};
use xp_eos::equations_of_state;
use xp_phases::PositionUnit;
use xp_project::{DocumentLoader, PhaseSourceDef, ProjectResult, build_store, load_session};

#[derive(Parser)]
#[command(name = "xp-cli")]
#[command(about = "Phase overlay CLI - reflection positions of crystalline phases under P and T", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered equations of state and their parameters
    Catalog,
    /// Validate session file syntax and structure
    Validate {
        /// Path to the session YAML or JSON file
        session_path: PathBuf,
    },
    /// Print projected reflection lines of every visible phase
    Lines {
        /// Path to the session YAML or JSON file
        session_path: PathBuf,
        /// Pressure applied to all phases [GPa]
        #[arg(long)]
        pressure: Option<f64>,
        /// Temperature applied to all phases [K]
        #[arg(long)]
        temperature: Option<f64>,
        /// Position unit: d, E or Q (defaults to the session view)
        #[arg(long)]
        unit: Option<PositionUnit>,
        /// Detector angle 2θ in degrees (defaults to the session view)
        #[arg(long)]
        two_theta: Option<f64>,
        /// Include phases hidden in the session
        #[arg(long)]
        all: bool,
    },
}

fn main() -> ProjectResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog => {
            cmd_catalog();
            Ok(())
        }
        Commands::Validate { session_path } => cmd_validate(&session_path),
        Commands::Lines {
            session_path,
            pressure,
            temperature,
            unit,
            two_theta,
            all,
        } => cmd_lines(&session_path, pressure, temperature, unit, two_theta, all),
    }
}

fn cmd_catalog() {
    for variant in equations_of_state() {
        println!(
            "{} - {} [pressure in {}]",
            variant.id,
            variant.name,
            variant.pressure_unit.symbol()
        );
        println!("  {}", variant.reference);
        for p in variant.params {
            let default = p
                .default
                .map(|v| format!(" (default {v})"))
                .unwrap_or_default();
            println!(
                "    {:<14} {:<8} {:<8} {}{}",
                p.key, p.symbol, p.unit, p.description, default
            );
        }
    }
}

fn cmd_validate(session_path: &Path) -> ProjectResult<()> {
    println!("Validating session: {}", session_path.display());
    let session = load_session(session_path)?;
    let base = session_path.parent().unwrap_or(Path::new("."));
    let store = build_store(&session, base, &DocumentLoader)?;
    println!("✓ Session is valid ({} phases)", store.len());
    for (entry, def) in store.entries().zip(&session.phases) {
        let origin = match &def.source {
            PhaseSourceDef::Definition { path } => path.display().to_string(),
            PhaseSourceDef::Structure { path, .. } => format!("{} (structure)", path.display()),
            PhaseSourceDef::Inline { .. } => "inline".to_string(),
        };
        println!(
            "  {} - {} from {}",
            entry.name(),
            entry.eos_kind(),
            origin
        );
    }
    Ok(())
}

fn cmd_lines(
    session_path: &Path,
    pressure: Option<f64>,
    temperature: Option<f64>,
    unit: Option<PositionUnit>,
    two_theta: Option<f64>,
    all: bool,
) -> ProjectResult<()> {
    let session = load_session(session_path)?;
    let base = session_path.parent().unwrap_or(Path::new("."));
    let mut store = build_store(&session, base, &DocumentLoader)?;

    if let Some(p) = pressure {
        store.set_pressure_all(gpa(p))?;
    }
    if let Some(t) = temperature {
        store.set_temperature_all(k(t))?;
    }

    let mut view = session.view.resolve()?;
    if let Some(unit) = unit {
        view.unit = unit;
    }
    if let Some(two_theta) = two_theta {
        view.projector.two_theta_deg = two_theta;
    }

    for (index, entry) in store.entries().enumerate() {
        if !all && !store.is_visible(index)? {
            continue;
        }
        let projected =
            view.projector
                .rescaled_reflections(entry, view.unit, view.x_range, view.y_range);
        println!(
            "{} [{}] P = {:.3} GPa, T = {:.1} K, V/V0 = {:.5}",
            entry.name(),
            entry.eos_kind(),
            in_gpa(entry.pressure()),
            in_kelvin(entry.temperature()),
            entry.volume() / entry.reference_volume()
        );
        if let Ok(g) = entry.shear_modulus() {
            println!("  G = {:.2} GPa", in_gpa(g));
        }
        println!("    h   k   l        d0         d  {:>10}  intensity", view.unit.symbol());
        for ((r, x), i) in entry
            .reflections()
            .iter()
            .zip(&projected.positions)
            .zip(&projected.intensities)
        {
            println!(
                "  {:>3} {:>3} {:>3} {:>9.5} {:>9.5} {:>10.4} {:>10.2}",
                r.h,
                r.k,
                r.l,
                r.d0,
                r.d(),
                x,
                i
            );
        }
    }
    Ok(())
}
