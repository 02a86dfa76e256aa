use crate::{CliError, IOArgs, create};
use clap::Args;
use smartprice_solver::{
    ClipRange, ElasticityEstimator, EstimatorSettings,
    io::{Table, enrich_with_elasticity, observations, write_summary},
};
use std::{io::BufWriter, path::PathBuf};

#[derive(Args)]
pub struct ElasticityArgs {
    #[command(flatten)]
    io: IOArgs,

    /// Comma-separated columns identifying a segment
    #[arg(long, value_delimiter = ',', default_value = "product_type,customer_type")]
    group_cols: Vec<String>,

    /// Minimum rows per segment to estimate elasticity (overrides the configuration)
    #[arg(long)]
    min_samples: Option<usize>,

    /// Min,max clip range for the fitted slope (overrides the configuration)
    #[arg(long, allow_hyphen_values = true)]
    clip: Option<ClipRange>,

    /// Where to write the segment summary (defaults to the output path with
    /// an `.elasticity_summary.json` extension)
    #[arg(long)]
    summary: Option<PathBuf>,
}

impl ElasticityArgs {
    // Apply the command-line overrides on top of the configured settings
    fn settings(&self, mut settings: EstimatorSettings) -> EstimatorSettings {
        if let Some(min_samples) = self.min_samples {
            settings.min_samples = min_samples;
        }
        if let Some(clip) = self.clip {
            settings.clip = clip;
        }
        settings
    }

    fn summary_path(&self) -> Result<PathBuf, CliError> {
        match (&self.summary, self.io.output_path()) {
            (Some(path), _) => Ok(path.clone()),
            (None, Some(output)) => Ok(output.with_extension("elasticity_summary.json")),
            (None, None) => Err(CliError::SummaryInference),
        }
    }

    pub fn run(self, settings: EstimatorSettings) -> anyhow::Result<()> {
        let settings = self.settings(settings);
        let summary_path = self.summary_path()?;
        let group_cols = self
            .group_cols
            .iter()
            .map(|col| col.trim())
            .filter(|col| !col.is_empty())
            .collect::<Vec<_>>();

        let estimator = ElasticityEstimator::new(settings)?;
        let mut table = Table::read(self.io.read()?)?;
        let elasticities = estimator.estimate(&observations(&table, &group_cols)?);

        enrich_with_elasticity(&mut table, &group_cols, &elasticities)?;
        table.write(self.io.write()?)?;

        write_summary(
            &elasticities.summary(&group_cols),
            BufWriter::new(create(&summary_path)?),
        )?;

        tracing::info!(
            rows = table.len(),
            segments = elasticities.len(),
            summary = %summary_path.display(),
            "wrote enriched dataset and segment summary"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BaseArgs;
    use clap::Parser as _;
    use std::path::Path;

    fn parse(args: &[&str]) -> ElasticityArgs {
        let base = BaseArgs::try_parse_from(
            ["smartprice", "elasticity"].iter().chain(args).copied(),
        )
        .unwrap();
        match base.command {
            crate::Commands::Elasticity(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn summary_path_follows_the_output() {
        let args = parse(&["sales.csv", "-o", "out/enriched.csv"]);
        assert_eq!(
            args.summary_path().unwrap(),
            Path::new("out/enriched.elasticity_summary.json")
        );
    }

    #[test]
    fn explicit_summary_path_wins() {
        let args = parse(&["sales.csv", "-o", "out/enriched.csv", "--summary", "segments.json"]);
        assert_eq!(args.summary_path().unwrap(), Path::new("segments.json"));
    }

    #[test]
    fn stdout_requires_a_summary_path() {
        let args = parse(&["sales.csv"]);
        assert!(matches!(args.summary_path(), Err(CliError::SummaryInference)));

        let args = parse(&["sales.csv", "--summary", "segments.json"]);
        assert_eq!(args.summary_path().unwrap(), Path::new("segments.json"));
    }

    #[test]
    fn configuration_is_kept_without_flags() {
        let configured = EstimatorSettings {
            min_samples: 12,
            clip: ClipRange { low: -3.0, high: 0.0 },
        };
        assert_eq!(parse(&["sales.csv"]).settings(configured.clone()), configured);
    }

    #[test]
    fn flags_override_the_configuration() {
        let args = parse(&["sales.csv", "--min-samples", "30", "--clip", "-4,0.5"]);
        let settings = args.settings(EstimatorSettings::default());
        assert_eq!(
            settings,
            EstimatorSettings {
                min_samples: 30,
                clip: ClipRange { low: -4.0, high: 0.5 },
            }
        );
    }

    #[test]
    fn malformed_clip_is_rejected() {
        let result = BaseArgs::try_parse_from(["smartprice", "elasticity", "sales.csv", "--clip", "-4"]);
        assert!(result.is_err());
    }
}
