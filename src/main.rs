use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use imgorg::{config::Config, date::FsTime, Job, Stages};

const BANNER: &str = r"
 _
(_)_ __ ___   __ _  ___  _ __ __ _
| | '_ ` _ \ / _` |/ _ \| '__/ _` |
| | | | | | | (_| | (_) | | | (_| |
|_|_| |_| |_|\__, |\___/|_|  \__, |
             |___/           |___/
";

#[derive(Debug, Parser)]
#[clap(version, about)]
struct Cli {
    /// Log level. Without it RUST_LOG applies, defaulting to info.
    #[clap(short, long = "log")]
    log_level: Option<tracing::Level>,

    /// Also append log lines to this file.
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// No banner and no log lines on the console.
    #[clap(short, long, default_value_t = false)]
    quiet: bool,

    /// Show progress bars instead of console log lines.
    #[clap(short, long, default_value_t = false)]
    progress: bool,

    /// TOML config file. Defaults to <config dir>/imgorg/config.toml, if present.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Rename images to <dd_MM_yyyy>_<NNNN>_image.<ext>.
    #[clap(long, default_value_t = false)]
    rename: bool,

    /// Move images into YYYY/MM/DD subdirectories.
    #[clap(long = "move", default_value_t = false)]
    relocate: bool,

    /// Copy images into a backup subdirectory first.
    #[clap(long, default_value_t = false)]
    backup: bool,

    /// Set each image's modification time to its date taken.
    #[clap(long, default_value_t = false)]
    set_times: bool,

    /// Collect images from this directory (recursively) into a new run folder
    /// inside DIR before anything else. Repeatable.
    #[clap(long = "collect", value_name = "SRC_DIR")]
    collect: Vec<PathBuf>,

    /// Filesystem timestamp to fall back on.
    #[clap(long, value_enum)]
    timestamp: Option<FsTime>,

    /// Ask exiftool when the built-in EXIF reader finds no date.
    #[clap(long, default_value_t = false)]
    exiftool: bool,

    /// Directory with the images.
    dir: PathBuf,

    /// Regex locating a yyyyMMdd date in file names.
    pattern: Option<String>,
}

fn main() -> ExitCode {
    human_panic::setup_panic!();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => {
            println!("Run succeeded");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Run failed: {:#}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let log_file = cli.log_file.or(config.log_file);
    imgorg::tracing_init(
        cli.log_level,
        !cli.quiet && !cli.progress,
        log_file.as_deref(),
    )?;
    if !cli.quiet {
        println!("{}", BANNER);
    }
    let stages = Stages {
        backup: cli.backup,
        set_times: cli.set_times,
        rename: cli.rename,
        relocate: cli.relocate,
    };
    let pattern = cli.pattern.or(config.pattern).unwrap_or_default();
    let mut job = Job::new(cli.dir, pattern, stages);
    job.collect_from = cli.collect;
    job.collect_from.extend(config.input_dirs);
    job.fs_time = cli.timestamp.or(config.timestamp).unwrap_or_default();
    job.exiftool = cli.exiftool || config.exiftool.unwrap_or(false);
    if let Some(extensions) = config.extensions {
        job.extensions = extensions;
    }
    if let Some(backup_dir) = config.backup_dir {
        job.backup_dir = backup_dir;
    }
    job.show_progress = cli.progress && !cli.quiet;
    job.run()
}
