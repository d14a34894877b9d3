use anyhow::Context;
use clap::{Parser, Subcommand};
use control::{document::SPEED_PRESETS, ControlDocument, ControlWriter};
use rostercore::generator::GenerationRequest;
use rostercore::importer::VocabularyPreset;
use rostercore::telemetry::log::LogManager;
use rostercore::{Field, Side, TaskMode};
use std::path::PathBuf;
use workflow::{PlannerConfig, Session};

mod control;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Red/blue force situation planner")]
struct Args {
    /// Load a planner config from YAML
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory that relative paths resolve against (overrides the config)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Seed for reproducible generation (overrides the config)
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Read scenario files with the authoring tool's native tag names
    #[arg(long, global = true, default_value_t = false)]
    legacy_tags: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Derive a blue force from a red roster and save the situation
    Generate {
        #[arg(long)]
        red: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Blue head count; 0 or absent uses the recommendation
        #[arg(long)]
        count: Option<usize>,
        #[arg(long)]
        difficulty: Option<String>,
        #[arg(long)]
        task_mode: Option<TaskMode>,
    },
    /// Re-encode a situation; the output extension picks the format
    Convert { input: PathBuf, output: PathBuf },
    /// Extract the red air force from a scenario XML file
    Import {
        scenario: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print both rosters of a situation
    Show { situation: PathBuf },
    /// Apply one validated field edit and save the situation back
    Edit {
        situation: PathBuf,
        #[arg(long, default_value = "red")]
        side: Side,
        #[arg(long)]
        index: usize,
        #[arg(long)]
        field: Field,
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },
    /// Write the simulation control file
    Control {
        #[arg(long, default_value_t = false)]
        paused: bool,
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
        #[arg(long, default_value = "confrontation")]
        task_mode: TaskMode,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = PlannerConfig::load_or_default(args.config.as_deref())?;
    if let Some(root) = args.root {
        config.workspace_root = root;
    }
    if args.seed.is_some() {
        config.generator.seed = args.seed;
    }
    if args.legacy_tags {
        config.scenario_vocabulary = VocabularyPreset::Legacy;
    }

    let mut session = Session::new(config);

    match args.command {
        Command::Generate {
            red,
            out,
            count,
            difficulty,
            task_mode,
        } => {
            let loaded = session.open_red(&red)?;
            let result = session.generate_blue(&GenerationRequest::new(count, difficulty), task_mode)?;
            let written = session.save(&out)?;
            println!(
                "Generated {} blue aircraft from {} red (recommended {} / {}), difficulty {} -> {}",
                result.final_count,
                loaded,
                result.recommended_count,
                result.recommended_difficulty,
                result.final_difficulty,
                written.display()
            );
        }
        Command::Convert { input, output } => {
            session.open(&input)?;
            let written = session.save(&output)?;
            println!("Converted {} -> {}", input.display(), written.display());
        }
        Command::Import { scenario, out } => {
            let imported = session.import_scenario(&scenario)?;
            let written = session.save(&out)?;
            println!(
                "Imported {} red aircraft from {} -> {}",
                imported,
                scenario.display(),
                written.display()
            );
        }
        Command::Show { situation } => {
            session.open(&situation)?;
            for side in [Side::Red, Side::Blue] {
                let roster = session.roster(side);
                println!(
                    "[{}] {} aircraft, score {}",
                    side,
                    roster.len(),
                    roster.score()
                );
                for record in roster.snapshot() {
                    println!("  {}", record);
                }
            }
            let params = session.parameters();
            println!(
                "parameters: blue_count={} strategy={:?} task_mode={}",
                params.blue_count,
                params.strategy,
                params
                    .task_mode
                    .map(|mode| mode.to_string())
                    .unwrap_or_else(|| "-".into())
            );
        }
        Command::Edit {
            situation,
            side,
            index,
            field,
            value,
        } => {
            session.open(&situation)?;
            session.edit(side, index, field, &value)?;
            session.save(&situation)?;
            let record = session
                .roster(side)
                .get(index)
                .context("edited record vanished")?;
            println!("[{}] row {} {} = {}", side, index, field, record.field_text(field));
        }
        Command::Control {
            paused,
            speed,
            task_mode,
        } => {
            if !SPEED_PRESETS.contains(&speed) {
                LogManager::new("planner").warn(&format!(
                    "speed {}x is not one of the presets {:?}",
                    speed, SPEED_PRESETS
                ));
            }
            let writer = ControlWriter::new(session.config().control_path());
            writer.write(&ControlDocument::new(paused, speed, task_mode)?)?;
            println!(
                "Control file {} updated ({}, {}x, blue {})",
                writer.path().display(),
                if paused { "paused" } else { "running" },
                speed,
                task_mode
            );
        }
    }

    Ok(())
}
