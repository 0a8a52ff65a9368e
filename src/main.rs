//! Command line interface for the commercial scheduler.

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

use commercial_grasp::config::{AlphaPolicy, Config, SearchMode};
use commercial_grasp::generator::{generate, GeneratorConfig};
use commercial_grasp::moves::MoveKind;
use commercial_grasp::problem::Problem;
use commercial_grasp::utils::{parse_seconds, save_problem, save_solution, SearchSummary};
use commercial_grasp::GraspAlgorithm;

#[derive(Parser)]
#[command(name = "commercial-grasp")]
#[command(version)]
#[command(about = "Schedules commercials into broadcast inventories with GRASP and path relinking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an instance file
    Solve {
        /// Instance JSON file
        instance: PathBuf,

        /// Time limit in seconds
        #[arg(short, long, default_value = "60", value_parser = parse_seconds)]
        time_limit: Duration,

        /// Number of worker threads
        #[arg(long, default_value = "1")]
        threads: usize,

        /// Random seed
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Use a constant alpha instead of the default policy
        #[arg(long, conflicts_with = "reactive")]
        alpha: Option<f64>,

        /// Use reactive alpha over 0.1..0.9
        #[arg(long)]
        reactive: bool,

        /// Scan whole neighborhoods and take the best move
        #[arg(long)]
        best_improvement: bool,

        /// Comma-separated neighborhoods, e.g. insert,outOfPool,shift
        #[arg(long, value_delimiter = ',')]
        moves: Option<Vec<MoveKind>>,

        /// Elite pool size
        #[arg(long, default_value = "10")]
        elite_size: usize,

        /// Verify the solution after every move
        #[arg(long)]
        debug: bool,

        /// Write the JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a random instance
    Generate {
        #[arg(long, default_value = "60")]
        commercials: usize,

        #[arg(long, default_value = "8")]
        inventories: usize,

        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Instance JSON file to write
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            instance,
            time_limit,
            threads,
            seed,
            alpha,
            reactive,
            best_improvement,
            moves,
            elite_size,
            debug,
            output,
        } => {
            let problem = Problem::from_file(&instance)?;

            let mut config = Config::new()
                .with_time_limit(time_limit)
                .with_thread_count(threads)
                .with_seed(seed)
                .with_elite_pool_size(elite_size)
                .with_debug(debug);
            if let Some(value) = alpha {
                config = config.with_alpha(AlphaPolicy::Constant(value));
            } else if reactive {
                config = config.with_alpha(AlphaPolicy::reactive_default());
            }
            if best_improvement {
                config = config.with_search_mode(SearchMode::BestImprovement);
            }
            if let Some(moves) = moves {
                config = config.with_moves(moves);
            }

            let algorithm = GraspAlgorithm::new(problem, config);
            let result = algorithm.run()?;
            info!(
                "{}",
                SearchSummary::from_result(&result, &algorithm.problem).format()
            );

            if let Some(path) = output {
                save_solution(&result, &algorithm.problem, &path)?;
                info!("Saved report to {}", path.display());
            }
        }
        Commands::Generate {
            commercials,
            inventories,
            seed,
            output,
        } => {
            let config = GeneratorConfig::new()
                .with_size(commercials, inventories)
                .with_seed(seed);
            let problem = generate(&config)?;
            save_problem(&problem, &output)?;
            info!(
                "Wrote {} commercials and {} inventories to {}",
                problem.num_commercials(),
                problem.num_inventories(),
                output.display()
            );
        }
    }

    Ok(())
}
