use clap::{Parser, Subcommand};
use photo_squeeze::config::{self, ConfigOverrides, SqueezeConfig};
use photo_squeeze::imaging::{ImageTransformer, Quality, RustBackend};
use photo_squeeze::process::{self, RunOptions};
use photo_squeeze::{logging, output};
use std::path::{Path, PathBuf};

/// Flags for the `run` command.
#[derive(clap::Args, Clone)]
struct RunArgs {
    /// Bounding box width in pixels (overrides the config file)
    #[arg(long)]
    max_width: Option<u32>,

    /// Bounding box height in pixels (overrides the config file)
    #[arg(long)]
    max_height: Option<u32>,

    /// Encode every file at this JPEG quality instead of the size table's pick
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,

    /// Give moved files a .jpg extension
    #[arg(long)]
    rename_to_jpg: bool,

    /// Write a JSON report of processed and skipped files
    #[arg(long)]
    report: Option<PathBuf>,

    /// Exit with an error if any file was skipped
    #[arg(long)]
    strict: bool,
}

#[derive(Parser)]
#[command(name = "photo-squeeze")]
#[command(about = "Shrink a directory of photos and move them on")]
#[command(long_about = "\
Shrink a directory of photos and move them on

Every file in the source directory is resized to fit the bounding box
(never upscaled), re-encoded as JPEG at a quality picked from its file
size, and moved to the destination directory.

  converter/              convertido/
  ├── photo.jpg     →     ├── photo.jpg    (1280x960, quality 30)
  ├── logo.png      →     ├── logo.png     (JPEG bytes)
  └── scan.bmp            (skipped, left in place)

Accepted extensions: png, jpg, jpeg, gif (plus pjpeg and x-png).

Stock quality table (first match wins):
  >= 1.0 MB  → 30
  >= 0.5 MB  → 40
  >= 0.3 MB  → 60
  otherwise  → 80

Run 'photo-squeeze gen-config' to generate a documented squeeze.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./squeeze.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of files to shrink
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Directory to move shrunk files into
    #[arg(long, global = true)]
    dest: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Shrink every file in the source directory and move it to the destination
    Run(RunArgs),
    /// Show what would be done to each file without writing anything
    Inspect {
        /// Files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print a stock squeeze.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Run(args) => {
            logging::init(cli.verbose, cli.json_logs);
            let overrides = ConfigOverrides {
                source_dir: cli.source.clone(),
                dest_dir: cli.dest.clone(),
                max_width: args.max_width,
                max_height: args.max_height,
                rename_to_jpg: args.rename_to_jpg,
            };
            let config = load_config(cli.config.as_deref())?.with_overrides(&overrides)?;
            let options = RunOptions {
                quality: args.quality.map(Quality::new),
            };

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::process_directory(&config, options, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let report = result?;

            output::print_batch_summary(&report);
            if let Some(path) = &args.report {
                report.write_json(path)?;
                println!("Report: {}", path.display());
            }
            if args.strict && report.has_failures() {
                return Err(format!("{} file(s) skipped", report.failed.len()).into());
            }
        }
        Command::Inspect { files } => {
            logging::init(cli.verbose, cli.json_logs);
            let config = load_config(cli.config.as_deref())?;
            let table = config.quality_table();
            let bounds = config.max_dimensions();
            for (i, path) in files.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                match ImageTransformer::open_with(RustBackend::new(), path, &table) {
                    Ok(mut transformer) => {
                        transformer.set_max_dimensions(bounds.width, bounds.height);
                        output::print_plan(&transformer.plan());
                    }
                    Err(err) => {
                        for line in output::format_inspect_error(path, &err) {
                            println!("{}", line);
                        }
                    }
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Explicit `--config` must exist; the implicit `squeeze.toml` is optional.
fn load_config(path: Option<&Path>) -> Result<SqueezeConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(config::DEFAULT_CONFIG_FILE)),
    }
}
