use clap::Subcommand;

mod elasticity;
pub use elasticity::ElasticityArgs;

mod optimize;
pub use optimize::{OptimizeArgs, SearchMethod};

mod recommend;
pub use recommend::RecommendArgs;

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate price elasticity per segment and join it back onto the sales table
    Elasticity(ElasticityArgs),

    /// Find the profit-maximizing price of every row on its isoelastic demand curve
    Optimize(OptimizeArgs),

    /// Recommend a price for one scenario by grid search against a demand model
    Recommend(RecommendArgs),
}
