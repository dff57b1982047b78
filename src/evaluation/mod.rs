//! Single-pass consumers of example streams.
//!
//! These helpers walk a [`ForwardIterator`] once, holding one example at a
//! time, and decide what a malformed row means through [`RowErrorPolicy`].

use tracing::{debug, warn};

use crate::dataset::{DatasetError, ForwardIterator, SupervisedExample};
use crate::predictors::{ConstantPredictor, Predictor};

/// What to do when the parser rejects a row.
///
/// Row-source failures always abort, whatever the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowErrorPolicy {
    /// Abort with the parse error.
    #[default]
    Fail,
    /// Log the error, count the row as skipped and continue.
    Skip,
}

/// Visit every example of `iter` in order.
///
/// Returns the number of rows skipped under [`RowErrorPolicy::Skip`].
pub fn for_each_example<I, F>(
    mut iter: I,
    policy: RowErrorPolicy,
    mut visit: F,
) -> Result<usize, DatasetError>
where
    I: ForwardIterator<SupervisedExample>,
    F: FnMut(SupervisedExample),
{
    let mut skipped = 0;
    while iter.is_valid() {
        match iter.get() {
            Ok(example) => visit(example),
            Err(err) if err.is_row_local() && policy == RowErrorPolicy::Skip => {
                warn!(error = %err, "skipping malformed row");
                skipped += 1;
            }
            Err(err) => return Err(err),
        }
        iter.advance()?;
    }
    Ok(skipped)
}

/// Aggregate statistics of one pass over a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSummary {
    /// Examples successfully parsed.
    pub examples: usize,
    /// Rows skipped as malformed.
    pub skipped_rows: usize,
    /// Sum of example weights.
    pub total_weight: f64,
    /// Sum of `weight * label`.
    pub weighted_label_sum: f64,
    /// Longest feature vector seen.
    pub max_dimension: usize,
}

impl DatasetSummary {
    /// Weighted mean label, or 0 when the total weight is not positive.
    pub fn mean_label(&self) -> f64 {
        if self.total_weight > 0.0 {
            self.weighted_label_sum / self.total_weight
        } else {
            0.0
        }
    }

    fn observe(&mut self, example: &SupervisedExample) {
        self.examples += 1;
        self.total_weight += example.weight();
        self.weighted_label_sum += example.weight() * example.label();
        self.max_dimension = self.max_dimension.max(example.dimension());
    }
}

/// Summarize a dataset in one pass.
pub fn summarize<I>(iter: I, policy: RowErrorPolicy) -> Result<DatasetSummary, DatasetError>
where
    I: ForwardIterator<SupervisedExample>,
{
    let mut summary = DatasetSummary::default();
    let skipped = for_each_example(iter, policy, |example| summary.observe(&example))?;
    summary.skipped_rows = skipped;
    debug!(
        examples = summary.examples,
        skipped = summary.skipped_rows,
        "dataset summarized"
    );
    Ok(summary)
}

/// Constant predictor minimizing weighted squared error over the summarized
/// dataset: its weighted mean label.
pub fn fit_constant(summary: &DatasetSummary) -> ConstantPredictor {
    ConstantPredictor::new(summary.mean_label())
}

/// Weighted error of a predictor over a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Examples scored.
    pub examples: usize,
    /// Rows skipped as malformed.
    pub skipped_rows: usize,
    /// Sum of example weights.
    pub total_weight: f64,
    /// Weighted mean squared error.
    pub mse: f64,
    /// Weighted mean absolute error.
    pub mae: f64,
}

impl Evaluation {
    /// Weighted root mean squared error.
    pub fn rmse(&self) -> f64 {
        self.mse.sqrt()
    }
}

/// Score every example with `predictor` and accumulate weighted errors.
pub fn evaluate<P, I>(
    predictor: &P,
    iter: I,
    policy: RowErrorPolicy,
) -> Result<Evaluation, DatasetError>
where
    P: Predictor + ?Sized,
    I: ForwardIterator<SupervisedExample>,
{
    let mut examples = 0;
    let (mut sum_sq, mut sum_abs, mut sum_w) = (0.0f64, 0.0f64, 0.0f64);
    let skipped_rows = for_each_example(iter, policy, |example| {
        let diff = predictor.predict(example.features()) - example.label();
        let w = example.weight();
        sum_sq += w * diff * diff;
        sum_abs += w * diff.abs();
        sum_w += w;
        examples += 1;
    })?;

    let (mse, mae) = if sum_w > 0.0 {
        (sum_sq / sum_w, sum_abs / sum_w)
    } else {
        (0.0, 0.0)
    };
    Ok(Evaluation {
        examples,
        skipped_rows,
        total_weight: sum_w,
        mse,
        mae,
    })
}
