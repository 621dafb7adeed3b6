use anyhow::{Context, Result};
use inventory::{Inventory, Survey};
use log::info;
use mosaic_report::{tally, Config, EmbeddedImage, RecordFilter, Report};
use std::{
    fs,
    path::{Path, PathBuf},
};
use structopt::StructOpt;

#[derive(Debug, Clone, StructOpt)]
/// Count annotated components of mosaic photos and build inventory reports.
enum Args {
    /// Write the interactive HTML report.
    Report {
        /// CVAT XML annotation file
        annotation_file: PathBuf,
        /// the annotated picture
        image_file: PathBuf,
        #[structopt(short, long)]
        /// output HTML file, defaults to '<title>.html'
        output_file: Option<PathBuf>,
        #[structopt(long)]
        /// model name appended to the title
        model_name: Option<String>,
        #[structopt(long)]
        /// configuration file
        config_file: Option<PathBuf>,
    },
    /// Print the inventory table.
    Summary {
        /// CVAT XML annotation file
        annotation_file: PathBuf,
        #[structopt(flatten)]
        filter: FilterArgs,
        #[structopt(long)]
        /// configuration file
        config_file: Option<PathBuf>,
    },
    /// Write the inventory as CSV.
    Export {
        /// CVAT XML annotation file
        annotation_file: PathBuf,
        /// output CSV file
        output_file: PathBuf,
        #[structopt(flatten)]
        filter: FilterArgs,
        #[structopt(long)]
        /// configuration file
        config_file: Option<PathBuf>,
    },
    /// Print or write the built-in configuration.
    Config {
        /// output JSON5 file
        output_file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, StructOpt)]
struct FilterArgs {
    #[structopt(long)]
    /// only count this component type
    kind: Option<String>,
    #[structopt(long)]
    /// only count this color
    color: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> RecordFilter {
        RecordFilter::new(self.kind.as_deref(), self.color.as_deref())
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    match Args::from_args() {
        Args::Report {
            annotation_file,
            image_file,
            output_file,
            model_name,
            config_file,
        } => report(
            &annotation_file,
            &image_file,
            output_file,
            model_name.as_deref(),
            config_file.as_deref(),
        )?,
        Args::Summary {
            annotation_file,
            filter,
            config_file,
        } => summary(&annotation_file, &filter, config_file.as_deref())?,
        Args::Export {
            annotation_file,
            output_file,
            filter,
            config_file,
        } => export(&annotation_file, &output_file, &filter, config_file.as_deref())?,
        Args::Config { output_file } => config(output_file.as_deref())?,
    }

    Ok(())
}

fn load_survey(annotation_file: &Path, config: &Config) -> Result<Survey> {
    let survey = Survey::open(annotation_file, &config.catalog).with_context(|| {
        format!(
            "failed to load annotation file '{}'",
            annotation_file.display()
        )
    })?;
    Ok(survey)
}

fn report(
    annotation_file: &Path,
    image_file: &Path,
    output_file: Option<PathBuf>,
    model_name: Option<&str>,
    config_file: Option<&Path>,
) -> Result<()> {
    let config = Config::open_or_builtin(config_file)?;
    let survey = load_survey(annotation_file, &config)?;
    let image = EmbeddedImage::open(image_file)?;
    mosaic_report::check_image(&survey, &image);

    let report = Report::new(&config.report, model_name, &image, &survey.records);
    let output_file = output_file.unwrap_or_else(|| report.default_file_name());
    report.write(&output_file)?;
    info!("report saved to '{}'", output_file.display());

    Ok(())
}

fn filtered_inventory(survey: &Survey, filter: &FilterArgs) -> Inventory {
    Inventory::from_records(filter.to_filter().apply(&survey.records))
}

fn summary(annotation_file: &Path, filter: &FilterArgs, config_file: Option<&Path>) -> Result<()> {
    let config = Config::open_or_builtin(config_file)?;
    let survey = load_survey(annotation_file, &config)?;
    let inventory = filtered_inventory(&survey, filter);

    tally::inventory_table(&inventory).printstd();
    Ok(())
}

fn export(
    annotation_file: &Path,
    output_file: &Path,
    filter: &FilterArgs,
    config_file: Option<&Path>,
) -> Result<()> {
    let config = Config::open_or_builtin(config_file)?;
    let survey = load_survey(annotation_file, &config)?;
    let inventory = filtered_inventory(&survey, filter);

    tally::save_csv(&inventory, output_file)?;
    info!(
        "{} groups saved to '{}'",
        inventory.groups().len(),
        output_file.display()
    );
    Ok(())
}

fn config(output_file: Option<&Path>) -> Result<()> {
    let text = Config::builtin()?.to_json5_string()?;

    match output_file {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("failed to write '{}'", path.display()))?,
        None => println!("{}", text),
    }

    Ok(())
}
