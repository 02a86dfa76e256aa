use crate::{LinearDemandModel, write_json};
use clap::Args;
use smartprice_core::models::PricingScenario;
use smartprice_solver::{GridSearchOptimizer, GridSettings};
use std::{
    io::{Write as _, stdout},
    path::PathBuf,
};

#[derive(Args)]
pub struct RecommendArgs {
    /// The linear demand model artifact (JSON)
    #[arg(long, default_value = "models/linear_demand.json")]
    model: PathBuf,

    #[arg(long)]
    product_type: String,

    #[arg(long)]
    customer_type: String,

    #[arg(long)]
    competitor_price: f64,

    /// Unit variable cost for the product
    #[arg(long)]
    unit_cost: f64,

    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    promotion_flag: u8,

    #[arg(long, default_value_t = 80_000.0)]
    marketing_spend: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    economic_index: f64,

    #[arg(long, default_value_t = 6)]
    month: u32,

    /// Monday = 0
    #[arg(long, default_value_t = 2)]
    day_of_week: u32,

    #[arg(long, default_value_t = 0.5, allow_hyphen_values = true)]
    trend_index: f64,

    /// List price used to normalize the price gap (defaults per product type)
    #[arg(long)]
    base_price: Option<f64>,

    #[arg(long, default_value_t = 1.0)]
    min_price: f64,

    #[arg(long, default_value_t = 5000.0)]
    max_price: f64,

    #[arg(long, default_value_t = 200)]
    num_points: usize,

    /// Also write the recommendation to this JSON file
    #[arg(long)]
    out: Option<PathBuf>,
}

impl RecommendArgs {
    pub fn scenario(&self) -> PricingScenario {
        PricingScenario {
            product_type: self.product_type.clone(),
            customer_type: self.customer_type.clone(),
            competitor_price: self.competitor_price,
            unit_cost: self.unit_cost,
            promotion_flag: self.promotion_flag == 1,
            marketing_spend: self.marketing_spend,
            economic_index: self.economic_index,
            month: self.month,
            day_of_week: self.day_of_week,
            trend_index: self.trend_index,
            base_price: self.base_price,
            min_price: self.min_price,
            max_price: self.max_price,
            num_points: self.num_points,
        }
    }

    pub fn run(self, settings: GridSettings) -> anyhow::Result<()> {
        let model = LinearDemandModel::load(&self.model)?;
        let recommendation = GridSearchOptimizer::new(settings).optimize(&self.scenario(), &model)?;

        let mut output = stdout().lock();
        serde_json::to_writer_pretty(&mut output, &recommendation)?;
        writeln!(output)?;

        if let Some(path) = &self.out {
            write_json(path, &recommendation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BaseArgs;
    use clap::Parser as _;

    fn parse(args: &[&str]) -> RecommendArgs {
        let base = BaseArgs::try_parse_from(
            ["smartprice", "recommend"].iter().chain(args).copied(),
        )
        .unwrap();
        match base.command {
            crate::Commands::Recommend(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn defaults_match_the_scenario_defaults() {
        let args = parse(&[
            "--product-type",
            "Reagent",
            "--customer-type",
            "Academia",
            "--competitor-price",
            "80",
            "--unit-cost",
            "20",
        ]);
        assert_eq!(
            args.scenario(),
            PricingScenario::new("Reagent", "Academia", 80.0, 20.0)
        );
    }

    #[test]
    fn promotion_flag_is_binary() {
        let result = BaseArgs::try_parse_from([
            "smartprice",
            "recommend",
            "--product-type",
            "Reagent",
            "--customer-type",
            "Academia",
            "--competitor-price",
            "80",
            "--unit-cost",
            "20",
            "--promotion-flag",
            "2",
        ]);
        assert!(result.is_err());
    }
}
