use anyhow::Result;
use clap::Parser;
use selection_graph::config::AnalysisConfig;
use selection_graph::{data, pipeline, storage};

#[derive(Parser, Debug)]
#[clap(
    name = "selection-graph",
    about = "Community, PMI and bridge analysis of entity selection lists"
)]
struct Cli {
    /// Path to input JSON dataset
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "analysis_results")]
    output_dir: String,

    /// Minimum number of selections for a chooser to be counted
    #[clap(long, default_value = "1")]
    min_selections: usize,

    /// Modularity resolution
    #[clap(long, default_value = "1.0")]
    resolution: f64,

    /// Minimum cluster size
    #[clap(long, default_value = "3")]
    min_cluster_size: usize,

    /// Minimum cluster density
    #[clap(long, default_value = "0.3")]
    min_density: f64,

    /// Minimum directed relations for a PMI pair (1 or 2)
    #[clap(long, default_value = "1")]
    min_pmi_count: usize,

    /// Minimum distinct choosers for a bridge pair
    #[clap(long, default_value = "2")]
    min_voters: usize,

    /// Entity to compute similarity groups for
    #[clap(long)]
    focus: Option<String>,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> AnalysisConfig {
        let mut config = AnalysisConfig::default();
        config.min_selections = self.min_selections;
        config.community.resolution = self.resolution;
        config.cluster.min_size = self.min_cluster_size;
        config.cluster.min_density = self.min_density;
        config.pmi.min_count = self.min_pmi_count;
        config.bridge.min_voters = self.min_voters;
        config.focus = self.focus.clone();
        config
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting selection graph analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    let config = args.config();

    // 1. Load data
    let dataset = data::loader::load_dataset(&args.input)?;
    let dataset = pipeline::prepare(&dataset, &config);

    // 2. Cluster the weighted graph and score associations side by side;
    //    both only read the dataset
    let (clustering, associations) = rayon::join(
        || pipeline::run_clustering(&dataset, &config),
        || pipeline::run_associations(&dataset, &config),
    );

    // 3. Entity statistics and similarity groups
    let report = pipeline::assemble(&dataset, &config, clustering?, associations?)?;

    log::info!(
        "Found {} clusters, {} bridge pairs and {} bridge clusters",
        report.summary.cluster_count,
        report.summary.bridge_pair_count,
        report.summary.bridge_cluster_count
    );

    // 4. Save results
    storage::save_results(&report, config.focus.as_deref(), &args.output_dir)?;

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
