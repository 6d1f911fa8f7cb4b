use clap::{Parser, Subcommand};
use qplace_common::db::parser::bookshelf::{self, ParseMode as ReaderMode};
use qplace_common::db::{stats, writer};
use qplace_common::util::config::{Config, ParseMode};
use qplace_common::util::{check, generator, logger, visualization};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline on a single Bookshelf design directory.
    Place {
        /// Directory containing the design's `.aux` file.
        directory: Option<String>,

        #[arg(short, long, value_name = "DIR")]
        output: Option<String>,

        #[arg(short, long)]
        visualize: bool,

        #[arg(long)]
        strict: bool,
    },
    /// Synthesize a random Bookshelf design for exercising the pipeline.
    Generate {
        #[arg(long, default_value_t = 200)]
        cells: usize,
        #[arg(long, default_value_t = 200)]
        nets: usize,
        #[arg(long, default_value_t = 0.50)]
        utilization: f64,
        #[arg(long, default_value = "inputs/random")]
        output: String,
        #[arg(long, default_value = "random")]
        name: String,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let config = if args.config.exists() {
        log::info!("loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("failed to read config file: {}", e))?;
        toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("failed to parse config toml: {}", e))?
    } else {
        log::warn!("configuration file {:?} not found; using defaults", args.config);
        Config::default()
    };

    let command = args.command.unwrap_or(Commands::Place {
        directory: None,
        output: None,
        visualize: false,
        strict: false,
    });

    match command {
        Commands::Generate {
            cells,
            nets,
            utilization,
            output,
            name,
        } => {
            let safe_util = utilization.clamp(0.05, 0.95);
            if (safe_util - utilization).abs() > f64::EPSILON {
                log::warn!(
                    "requested utilization {:.2} is unsafe; clamped to {:.2}",
                    utilization,
                    safe_util
                );
            }
            generator::generate_random_design(&output, &name, cells, nets, safe_util)?;
            log::info!("generated design '{}' in {}", name, output);
        }
        Commands::Place {
            directory,
            output,
            visualize,
            strict,
        } => {
            let directory = directory.unwrap_or(config.input.design_dir.clone());
            let output_dir = output.or(config.input.output_dir.clone());
            let parse_mode = if strict {
                ParseMode::Strict
            } else {
                config.parse.mode
            };

            if run_place(&directory, output_dir.as_deref(), visualize, parse_mode, &config)
                .is_err()
            {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn run_place(
    directory: &str,
    output_dir: Option<&str>,
    visualize: bool,
    parse_mode: ParseMode,
    config: &Config,
) -> anyhow::Result<()> {
    let aux_path = find_aux_file(directory)?;
    log::info!("reading design: {}", aux_path);

    let reader_mode = match parse_mode {
        ParseMode::Strict => ReaderMode::Strict,
        ParseMode::Lenient => ReaderMode::Lenient,
    };

    let mut design = bookshelf::read(&aux_path, reader_mode)
        .map_err(|e| anyhow::anyhow!("failed to read bookshelf design '{}': {}", aux_path, e))?;

    check::run_consistency_check(&design).map_err(|e| anyhow::anyhow!(e))?;

    let stats_before = stats::collect(&design);
    log::info!("design statistics (pre-placement):\n{}", stats_before.format_report());

    qplace_solver::place(
        &mut design,
        config.solver.cg_tolerance,
        config.solver.cg_max_iterations_multiplier,
    )
    .map_err(|e| anyhow::anyhow!(e))?;

    check::run_bounds_check(&design).map_err(|e| anyhow::anyhow!(e))?;

    let basename = Path::new(&aux_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("design");
    let out_dir = output_dir.unwrap_or(directory);
    std::fs::create_dir_all(out_dir)?;
    let output_path = Path::new(out_dir).join(format!("{basename}_initial.pl"));

    writer::write_pl(&design, output_path.to_str().unwrap())?;
    log::info!("wrote placement: {}", output_path.display());

    if visualize {
        let image_path = Path::new(out_dir).join(format!("{basename}_initial.png"));
        visualization::draw_placement(&design, image_path.to_str().unwrap(), 1000)?;
        log::info!("wrote visualization: {}", image_path.display());
    }

    Ok(())
}

fn find_aux_file(directory: &str) -> anyhow::Result<String> {
    let dir = Path::new(directory);
    if dir.extension().is_some_and(|e| e == "aux") && dir.exists() {
        return Ok(directory.to_string());
    }

    if !dir.is_dir() {
        return Err(anyhow::anyhow!("design directory not found: {}", directory));
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "aux") {
            return Ok(path.to_string_lossy().into_owned());
        }
    }

    Err(anyhow::anyhow!("no .aux file found in directory: {}", directory))
}
