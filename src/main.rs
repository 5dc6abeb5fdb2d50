use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde_derive::Deserialize;

use veloconv::processors::ConvertParams;
use veloconv::util::logging;
use veloconv::App;

#[derive(Parser)]
#[command(
    name = "veloconv",
    about = "Converts road survey CSV files between the iRAP point schema and the ECS segment schema"
)]
struct Cli {
    /// Input CSV file, its schema is detected from the header row.
    file: PathBuf,

    /// Minimum ECS segment length in meters.
    #[arg(short = 'm', long = "min")]
    min_length: Option<f64>,

    /// Maximum ECS segment length in meters.
    #[arg(short = 'x', long = "max")]
    max_length: Option<f64>,

    /// Height written as z into generated geometries, meters.
    #[arg(short = 'z', long = "height")]
    average_height: Option<f64>,

    /// Maximum divergence from the surveyed line during curve
    /// simplification, meters.
    #[arg(short = 'p', long = "divergence")]
    max_divergence: Option<f64>,

    /// Target point spacing when splitting segments back into points, meters.
    #[arg(short = 's', long = "slen")]
    segment_length: Option<f64>,

    /// Survey id written into the generated ECS rows.
    #[arg(short = 'i', long = "id")]
    survey_id: Option<i64>,

    #[arg(short, long)]
    verbose: bool,
}

/// Optional defaults picked up from `veloconv.toml` in the working directory.
/// Command line options win over the file.
#[derive(Debug, Default, Deserialize)]
struct FileDefaults {
    min_length: Option<f64>,
    max_length: Option<f64>,
    average_height: Option<f64>,
    max_divergence: Option<f64>,
    segment_length: Option<f64>,
    survey_id: Option<i64>,
}

fn load_defaults() -> anyhow::Result<FileDefaults> {
    let path = PathBuf::from("veloconv.toml");
    if !path.exists() {
        return Ok(FileDefaults::default());
    }

    let content = std::fs::read_to_string(&path).context("cannot read veloconv.toml")?;
    toml::from_str(&content).context("cannot parse veloconv.toml")
}

fn build_params(cli: &Cli, defaults: &FileDefaults) -> ConvertParams {
    let base = ConvertParams::default();

    ConvertParams {
        average_height: cli
            .average_height
            .or(defaults.average_height)
            .unwrap_or(base.average_height),
        max_divergence: cli
            .max_divergence
            .or(defaults.max_divergence)
            .unwrap_or(base.max_divergence),
        min_length: cli.min_length.or(defaults.min_length).unwrap_or(base.min_length),
        max_length: cli.max_length.or(defaults.max_length).unwrap_or(base.max_length),
        segment_length: cli
            .segment_length
            .or(defaults.segment_length)
            .unwrap_or(base.segment_length),
        survey_id: cli.survey_id.or(defaults.survey_id).unwrap_or(base.survey_id),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        logging::set_global_level(logging::LogLevel::VERBOSE);
    }

    let defaults = load_defaults()?;
    let params = build_params(&cli, &defaults);

    let app = App::new(params)?;
    let result = app
        .convert_file(&cli.file)
        .with_context(|| format!("cannot convert {}", cli.file.display()))?;

    for path in &result.written {
        println!("{}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("veloconv").chain(args.iter().copied()))
    }

    #[test]
    fn command_line_wins_over_file_defaults() {
        let defaults = FileDefaults {
            min_length: Some(300.0),
            survey_id: Some(9),
            ..Default::default()
        };
        let params = build_params(&cli(&["input.csv", "-m", "150"]), &defaults);

        assert_eq!(params.min_length, 150.0);
        assert_eq!(params.survey_id, 9);
        assert_eq!(params.max_length, 5000.0);
    }

    #[test]
    fn long_options_are_accepted() {
        let parsed = cli(&["input.csv", "--divergence", "2.5", "--slen", "50"]);
        assert_eq!(parsed.max_divergence, Some(2.5));
        assert_eq!(parsed.segment_length, Some(50.0));
    }
}
