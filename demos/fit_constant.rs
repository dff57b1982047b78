use std::path::PathBuf;

use anyhow::{Context, Result};
use exemplar::evaluation::{evaluate, fit_constant, summarize};
use exemplar::{FeatureEncoding, Predictor, PredictorRegistry, RowErrorPolicy, TextFormat};

fn main() -> Result<()> {
    let data = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/data/train.tsv");
    if !data.exists() {
        anyhow::bail!("missing required file: {}", data.display());
    }

    let examples = FeatureEncoding::Sparse
        .open(&data, TextFormat::default())
        .with_context(|| format!("failed to open {}", data.display()))?;
    let summary = summarize(examples, RowErrorPolicy::Fail).context("summary failed")?;
    println!(
        "Read {} examples (total weight {}, max dimension {})",
        summary.examples, summary.total_weight, summary.max_dimension
    );

    let predictor = fit_constant(&summary);
    let text = predictor.to_archive()?.to_json_string()?;
    println!("Archived predictor:\n{}", text);

    let registry = PredictorRegistry::with_builtin();
    let restored = registry.read(&exemplar::Archive::from_json_str(&text)?)?;

    let examples = FeatureEncoding::Sparse.open(&data, TextFormat::default())?;
    let evaluation = evaluate(restored.as_ref(), examples, RowErrorPolicy::Fail)?;
    println!(
        "{} -> weighted rmse {:.4} over {} examples",
        restored.type_name(),
        evaluation.rmse(),
        evaluation.examples
    );
    Ok(())
}
