use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use repframe::config::OutputYamlConfig;
use repframe::{
    compute_mappings, gen_method_max, representative_frame, Method, NAry, RepFrameConfig,
};

#[derive(Parser)]
#[command(name = "repframe")]
#[command(about = "Representative-frame selection for MD trajectory clusters", long_about = None)]
struct Cli {
    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fraction of the dominant cluster to trim (e.g. 0.1)
    #[arg(short, long)]
    trim_frac: Option<f64>,

    /// Similarity index: RR or SM
    #[arg(short, long)]
    index: Option<NAry>,

    /// Folder holding similarity mappings and the output record
    #[arg(short, long, value_name = "DIR")]
    sim_folder: Option<PathBuf>,

    /// Folder holding the normalized cluster files
    #[arg(short, long, value_name = "DIR")]
    norm_folder: Option<PathBuf>,

    /// Only report this method: pairwise, union, medoid or outlier
    #[arg(short, long)]
    method: Option<Method>,

    /// Cluster population summary file
    #[arg(long, value_name = "FILE")]
    summary_file: Option<PathBuf>,

    /// Number of clusters to analyze, dominant included
    #[arg(long)]
    n_clusters: Option<usize>,

    /// Values at or above this cutoff count as active
    #[arg(long, value_name = "VALUE")]
    activation_threshold: Option<f64>,

    /// Do not weight similarities by cluster population
    #[arg(long, action = ArgAction::SetTrue)]
    unweighted: bool,

    /// Compute clusters in parallel
    #[arg(long, action = ArgAction::SetTrue)]
    parallel: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Find representative frames (default)
    Select,
    /// Compute and write the four similarity mappings
    Mappings,
}

impl Cli {
    fn apply(&self, config: &mut RepFrameConfig) {
        if let Some(t) = self.trim_frac {
            config.similarity.trim_frac = Some(t);
        }
        if let Some(n_ary) = self.index {
            config.similarity.n_ary = n_ary;
        }
        if let Some(dir) = &self.sim_folder {
            config.paths.sim_folder = dir.clone();
        }
        if let Some(dir) = &self.norm_folder {
            config.paths.norm_folder = dir.clone();
        }
        if let Some(file) = &self.summary_file {
            config.paths.summary_file = file.clone();
        }
        if let Some(n) = self.n_clusters {
            config.similarity.n_clusters = Some(n);
        }
        if let Some(t) = self.activation_threshold {
            config.similarity.activation_threshold = Some(t);
        }
        if self.unweighted {
            config.similarity.weighted_by_frames = false;
        }
        if self.parallel {
            config.similarity.use_parallel = true;
        }
    }
}

fn init_tracing(output: &OutputYamlConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&output.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if output.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RepFrameConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RepFrameConfig::default(),
    };
    cli.apply(&mut config);
    config.validate()?;

    init_tracing(&config.output);

    match cli.command.unwrap_or(Commands::Select) {
        Commands::Select => match cli.method {
            Some(method) => {
                let frame = representative_frame(&config, method)?;
                println!("{method}: {frame}");
            }
            None => {
                let frames = gen_method_max(&config)?;
                print!("{}", frames.to_record());
            }
        },
        Commands::Mappings => {
            for (method, path) in compute_mappings(&config)? {
                println!("{method}: {}", path.display());
            }
        }
    }

    Ok(())
}
