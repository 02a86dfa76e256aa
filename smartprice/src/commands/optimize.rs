use crate::IOArgs;
use clap::{Args, ValueEnum};
use smartprice_solver::{
    BatchRowOptimizer, BatchSummary, ClosedForm, GoldenSection, IsoelasticOptimizer,
    IsoelasticSettings, PriceSearch as _, RowInput, RowOutcome,
    io::{Table, append_results, batch_inputs},
};

// This explicitly articulates the available search strategies for the `optimize` subcommand
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SearchMethod {
    #[default]
    ClosedForm,
    GoldenSection,
}

// Conveniently, we can use the same enum to handle the particulars of calling into
// the various search implementations
impl SearchMethod {
    pub fn optimize(&self, settings: IsoelasticSettings, rows: &[RowInput]) -> Vec<RowOutcome> {
        let IsoelasticSettings {
            bounds,
            golden_section,
        } = settings;
        match self {
            SearchMethod::ClosedForm => {
                BatchRowOptimizer::new(IsoelasticOptimizer::new(bounds, ClosedForm)).optimize(rows)
            }
            SearchMethod::GoldenSection => BatchRowOptimizer::new(IsoelasticOptimizer::new(
                bounds,
                GoldenSection::new(golden_section),
            ))
            .optimize(rows),
        }
    }
}

#[derive(Args)]
pub struct OptimizeArgs {
    #[command(flatten)]
    io: IOArgs,

    /// The search strategy used on each row
    #[arg(short, long, value_enum, default_value_t)]
    method: SearchMethod,
}

impl OptimizeArgs {
    pub fn run(self, settings: IsoelasticSettings) -> anyhow::Result<()> {
        let mut table = Table::read(self.io.read()?)?;
        let rows = batch_inputs(&table)?;

        let outcomes = self.method.optimize(settings, &rows);
        append_results(&mut table, &outcomes)?;
        table.write(self.io.write()?)?;

        let BatchSummary {
            solved, unsolved, ..
        } = BatchSummary::of(&outcomes);
        tracing::info!(method = ?self.method, solved, unsolved, "wrote per-row optimization results");
        Ok(())
    }
}
