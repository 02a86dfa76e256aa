use crate::{Baseline, ClosedForm, IsoelasticError, IsoelasticOptimizer, PriceSearch, Solution};
use rayon::prelude::*;
use smartprice_core::models::OptimizationResult;

/// One row of a batch: the raw, possibly missing, fields a baseline is built from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RowInput {
    /// `p0`
    pub price: Option<f64>,
    /// `q0`
    pub quantity: Option<f64>,
    /// `E`
    pub elasticity: Option<f64>,
    /// `r`, taken as 0 when absent
    pub ad_valorem_rate: Option<f64>,
    /// `c0`, taken as 0 when absent
    pub per_unit_cost: Option<f64>,
}

impl RowInput {
    /// Resolve the row into a baseline, applying defaults for the optional fields
    pub fn baseline(&self) -> Result<Baseline, RowFailure> {
        let required = |field: &'static str, value: Option<f64>| {
            value
                .filter(|x| x.is_finite())
                .ok_or(RowFailure::Missing(field))
        };
        let optional = |value: Option<f64>| value.filter(|x| x.is_finite()).unwrap_or(0.0);

        Ok(Baseline {
            price: required("price", self.price)?,
            quantity: required("quantity", self.quantity)?,
            elasticity: required("price_elasticity", self.elasticity)?,
            ad_valorem_rate: optional(self.ad_valorem_rate),
            per_unit_cost: optional(self.per_unit_cost),
        })
    }
}

/// Why a row could not be solved
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowFailure {
    /// A required field is absent or not a finite number
    #[error("missing or non-finite {0}")]
    Missing(&'static str),
    /// The optimizer rejected the row
    #[error(transparent)]
    Invalid(#[from] IsoelasticError),
}

/// The outcome of a single row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// The row was solved
    Solved(Solution),
    /// The row could not be solved, and why
    Unsolved(RowFailure),
}

impl RowOutcome {
    /// The row's result columns; all-undefined when unsolved
    pub fn result(&self) -> OptimizationResult {
        match self {
            Self::Solved(solution) => solution.result,
            Self::Unsolved(_) => OptimizationResult::UNDEFINED,
        }
    }

    /// Whether the row was solved
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }
}

/// Aggregate statistics over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchSummary {
    /// The number of rows processed
    pub rows: usize,
    /// The number of rows solved
    pub solved: usize,
    /// The number of rows left undefined
    pub unsolved: usize,
    /// The sum of total profit over solved rows
    pub total_profit: f64,
}

impl BatchSummary {
    /// Summarize a set of row outcomes
    pub fn of(outcomes: &[RowOutcome]) -> Self {
        outcomes.iter().fold(
            Self {
                rows: outcomes.len(),
                ..Default::default()
            },
            |mut summary, outcome| {
                match outcome {
                    RowOutcome::Solved(solution) => {
                        summary.solved += 1;
                        summary.total_profit += solution.result.total_profit;
                    }
                    RowOutcome::Unsolved(_) => summary.unsolved += 1,
                }
                summary
            },
        )
    }
}

/// Applies an [`IsoelasticOptimizer`] to every row of a dataset.
///
/// Rows are independent, so they are solved in parallel on the rayon pool.
/// A failing row never aborts the batch: it becomes [`RowOutcome::Unsolved`].
/// Outcome `i` always corresponds to input row `i`.
#[derive(Debug, Clone)]
pub struct BatchRowOptimizer<S = ClosedForm> {
    optimizer: IsoelasticOptimizer<S>,
}

impl<S: PriceSearch + Default> Default for BatchRowOptimizer<S> {
    fn default() -> Self {
        Self {
            optimizer: IsoelasticOptimizer::default(),
        }
    }
}

impl<S: PriceSearch + Sync> BatchRowOptimizer<S> {
    /// Wrap a single-row optimizer
    pub fn new(optimizer: IsoelasticOptimizer<S>) -> Self {
        Self { optimizer }
    }

    /// Solve a single row
    pub fn optimize_row(&self, row: &RowInput) -> RowOutcome {
        match row
            .baseline()
            .and_then(|baseline| Ok(self.optimizer.optimize(&baseline)?))
        {
            Ok(solution) => RowOutcome::Solved(solution),
            Err(failure) => RowOutcome::Unsolved(failure),
        }
    }

    /// Solve every row, preserving order
    pub fn optimize(&self, rows: &[RowInput]) -> Vec<RowOutcome> {
        let outcomes = rows
            .par_iter()
            .map(|row| self.optimize_row(row))
            .collect::<Vec<_>>();

        for (index, outcome) in outcomes.iter().enumerate() {
            if let RowOutcome::Unsolved(reason) = outcome {
                tracing::warn!(row = index, %reason, "row left unsolved");
            }
        }

        let BatchSummary {
            rows,
            solved,
            unsolved,
            total_profit,
        } = BatchSummary::of(&outcomes);
        tracing::info!(rows, solved, unsolved, total_profit, "batch optimization complete");

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(price: f64, quantity: f64, elasticity: f64) -> RowInput {
        RowInput {
            price: Some(price),
            quantity: Some(quantity),
            elasticity: Some(elasticity),
            ..Default::default()
        }
    }

    #[test]
    fn optional_fields_default_to_zero() {
        let baseline = RowInput {
            ad_valorem_rate: Some(f64::NAN),
            ..row(10.0, 5.0, 2.0)
        }
        .baseline()
        .unwrap();
        assert_eq!(baseline.ad_valorem_rate, 0.0);
        assert_eq!(baseline.per_unit_cost, 0.0);
    }

    #[test]
    fn missing_required_field_is_reported() {
        let input = RowInput {
            elasticity: None,
            ..row(10.0, 5.0, 2.0)
        };
        assert_eq!(
            input.baseline().unwrap_err(),
            RowFailure::Missing("price_elasticity")
        );

        let input = RowInput {
            quantity: Some(f64::NAN),
            ..row(10.0, 5.0, 2.0)
        };
        assert_eq!(input.baseline().unwrap_err(), RowFailure::Missing("quantity"));
    }

    #[test]
    fn summary_counts_outcomes() {
        let optimizer = BatchRowOptimizer::<ClosedForm>::default();
        let outcomes = optimizer.optimize(&[
            RowInput {
                per_unit_cost: Some(10.0),
                ..row(20.0, 50.0, 2.0)
            },
            RowInput::default(),
        ]);

        let summary = BatchSummary::of(&outcomes);
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.solved, 1);
        assert_eq!(summary.unsolved, 1);
        assert!((summary.total_profit - 500.0).abs() < 1e-9);
        assert!(outcomes[1].result().is_undefined());
    }

    #[test]
    fn empty_batch_is_empty() {
        let optimizer = BatchRowOptimizer::<ClosedForm>::default();
        assert!(optimizer.optimize(&[]).is_empty());
    }
}
