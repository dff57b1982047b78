use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use exemplar::evaluation::{evaluate, fit_constant, summarize};
use exemplar::{
    Archive, ExampleIterator, FeatureEncoding, ForwardIterator, Predictor, PredictorRegistry,
    RowErrorPolicy, SupervisedExample, TextFormat,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "exemplar", about = "Stream labeled examples from row-oriented text datasets")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print parsed examples.
    Inspect {
        #[command(flatten)]
        data: DataArgs,
        /// Stop after this many examples.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Count examples and report weight, label mean and dimension.
    Summarize {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Fit a constant predictor (weighted mean label) and archive it.
    FitConstant {
        #[command(flatten)]
        data: DataArgs,
        /// Archive destination (stdout when omitted).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Score an archived predictor against a dataset.
    Evaluate {
        #[command(flatten)]
        data: DataArgs,
        /// Predictor archive.
        #[arg(long, short)]
        model: PathBuf,
    },
    /// List predictor types that can be read from archives.
    Models,
}

#[derive(Args, Debug)]
struct DataArgs {
    /// Dataset file (one example per line).
    data: PathBuf,
    /// Encoding of the feature field.
    #[arg(long, value_enum, default_value_t = FeatureEncoding::Sparse)]
    format: FeatureEncoding,
    /// Field delimiter: a single character, or `tab`.
    #[arg(long, default_value = "tab", value_parser = parse_delimiter)]
    delimiter: char,
    /// Index of the first feature in sparse rows.
    #[arg(long, default_value_t = 1)]
    index_base: usize,
    /// Weight for rows that omit it.
    #[arg(long, default_value_t = 1.0)]
    default_weight: f64,
    /// Reject rows with more features than this.
    #[arg(long)]
    max_dimension: Option<usize>,
    /// Skip rows the parser rejects instead of aborting.
    #[arg(long)]
    skip_malformed: bool,
}

impl DataArgs {
    fn text_format(&self) -> TextFormat {
        let format = TextFormat::default()
            .with_field_delimiter(self.delimiter)
            .with_index_base(self.index_base)
            .with_default_weight(self.default_weight);
        match self.max_dimension {
            Some(max) => format.with_max_dimension(max),
            None => format,
        }
    }

    fn policy(&self) -> RowErrorPolicy {
        if self.skip_malformed {
            RowErrorPolicy::Skip
        } else {
            RowErrorPolicy::Fail
        }
    }

    fn open(&self) -> Result<ExampleIterator> {
        self.format
            .open(&self.data, self.text_format())
            .with_context(|| format!("failed to open dataset {}", self.data.display()))
    }
}

fn parse_delimiter(text: &str) -> Result<char, String> {
    match text {
        "tab" | "\\t" => Ok('\t'),
        _ => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("delimiter must be one character or `tab`, got '{}'", text)),
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Inspect { data, limit } => run_inspect(&data, limit)?,
        Commands::Summarize { data } => run_summarize(&data)?,
        Commands::FitConstant { data, output } => run_fit_constant(&data, output)?,
        Commands::Evaluate { data, model } => run_evaluate(&data, model)?,
        Commands::Models => run_models(),
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_inspect(data: &DataArgs, limit: Option<usize>) -> Result<()> {
    let mut examples = data.open()?;
    let policy = data.policy();
    let mut shown = 0;
    let mut row = 0;

    while examples.is_valid() && limit.map_or(true, |limit| shown < limit) {
        match examples.get() {
            Ok(example) => {
                print_example(row, &example);
                shown += 1;
            }
            Err(err) if err.is_row_local() && policy == RowErrorPolicy::Skip => {
                warn!(error = %err, "skipping malformed row");
            }
            Err(err) => return Err(err).context("inspection aborted"),
        }
        examples.advance().context("inspection aborted")?;
        row += 1;
    }

    Ok(())
}

fn run_summarize(data: &DataArgs) -> Result<()> {
    let summary = summarize(data.open()?, data.policy()).context("summary failed")?;

    println!("examples\t{}", summary.examples);
    println!("skipped\t{}", summary.skipped_rows);
    println!("total_weight\t{}", summary.total_weight);
    println!("mean_label\t{:.6}", summary.mean_label());
    println!("max_dimension\t{}", summary.max_dimension);
    Ok(())
}

fn run_fit_constant(data: &DataArgs, output: Option<PathBuf>) -> Result<()> {
    let summary = summarize(data.open()?, data.policy()).context("fitting failed")?;
    if summary.examples == 0 {
        bail!("dataset {} has no usable examples", data.data.display());
    }

    let predictor = fit_constant(&summary);
    info!(value = predictor.value(), examples = summary.examples, "fitted constant predictor");
    let archive = predictor.to_archive()?;

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            archive.write_to(BufWriter::new(file))?;
        }
        None => archive.write_to(io::stdout().lock())?,
    }
    Ok(())
}

fn run_evaluate(data: &DataArgs, model_path: PathBuf) -> Result<()> {
    let file = File::open(&model_path)
        .with_context(|| format!("failed to open model {}", model_path.display()))?;
    let archive = Archive::read_from(BufReader::new(file))
        .with_context(|| format!("failed to read archive {}", model_path.display()))?;

    let registry = PredictorRegistry::with_builtin();
    let predictor = registry
        .read(&archive)
        .with_context(|| format!("failed to load predictor from {}", model_path.display()))?;

    let evaluation = evaluate(predictor.as_ref(), data.open()?, data.policy())
        .context("evaluation failed")?;

    println!("model\t{}", predictor.type_name());
    println!("examples\t{}", evaluation.examples);
    println!("skipped\t{}", evaluation.skipped_rows);
    println!("mse\t{:.6}", evaluation.mse);
    println!("rmse\t{:.6}", evaluation.rmse());
    println!("mae\t{:.6}", evaluation.mae);
    Ok(())
}

fn run_models() {
    for info in PredictorRegistry::with_builtin().list() {
        println!("{}", info.type_name);
    }
}

fn print_example(row: usize, example: &SupervisedExample) {
    let features: Vec<String> = example
        .features()
        .iter()
        .map(|value| value.to_string())
        .collect();
    println!(
        "row {}\tlabel={}\tweight={}\tfeatures=[{}]",
        row,
        example.label(),
        example.weight(),
        features.join(", ")
    );
}
