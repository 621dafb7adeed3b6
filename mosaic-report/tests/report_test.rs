use anyhow::{Context, Result};
use image::{DynamicImage, ImageOutputFormat, RgbImage};
use inventory::Survey;
use mosaic_report::{config::ReportConfig, tally, Config, EmbeddedImage, RecordFilter, Report};
use std::path::{Path, PathBuf};

lazy_static::lazy_static! {
    static ref MANIFEST_DIR: &'static Path = Path::new(env!("CARGO_MANIFEST_DIR"));
    static ref ANNOTATION_DIR: PathBuf = MANIFEST_DIR.join("..").join("inventory").join("tests").join("annotations");
}

fn picture(width: u32, height: u32) -> Result<EmbeddedImage> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        image::Rgb([40, 40, 40]),
    ));
    let mut bytes = vec![];
    image.write_to(&mut bytes, ImageOutputFormat::Png)?;
    EmbeddedImage::from_bytes(bytes)
}

#[test]
fn shipped_config_matches_builtin() -> Result<()> {
    let config = Config::open(MANIFEST_DIR.join("report.json5"))?;
    assert_eq!(config, Config::builtin()?);
    Ok(())
}

#[test]
fn render_annotation_files() -> Result<()> {
    let config = Config::builtin()?;
    let image = picture(64, 48)?;

    glob::glob(ANNOTATION_DIR.join("*.xml").to_str().unwrap())?.try_for_each(
        |path| -> Result<_> {
            let path = path?;
            let survey = Survey::open(&path, &config.catalog)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            let html = Report::new(&config.report, None, &image, &survey.records).render()?;

            assert!(html.contains("<title>Componentes</title>"));
            assert!(html.contains("data:image/png;base64,"));
            assert!(!html.contains("{{"));
            assert!(!html.contains("http://") && !html.contains("https://"));
            Ok(())
        },
    )?;

    Ok(())
}

#[test]
fn write_mosaic_report() -> Result<()> {
    let config = Config::builtin()?;
    let survey = Survey::open(ANNOTATION_DIR.join("mosaic.xml"), &config.catalog)?;
    let image = picture(1000, 800)?;
    mosaic_report::check_image(&survey, &image);

    let report = Report::new(&config.report, Some("Mariposa"), &image, &survey.records);
    assert_eq!(report.title, "Componentes Mariposa");
    assert_eq!(report.default_file_name(), PathBuf::from("Componentes Mariposa.html"));

    let dir = tempfile::tempdir()?;
    let output = dir.path().join(report.default_file_name());
    report.write(&output)?;
    let html = std::fs::read_to_string(&output)?;

    assert!(html.contains(
        r#""kinds":["balin","cristal","dicroico","microperla","sin_tipo"]"#
    ));
    assert!(html.contains(r##"{"key":"gris","display":"#808080"}"##));
    assert!(html.contains(r#""width":1000,"height":800"#));
    assert!(html.contains(r#"{"x":900.0,"y":700.0,"type":"sin_tipo","color":"sin_color","size":"","display":"gray"}"#));
    Ok(())
}

#[test]
fn escape_title() -> Result<()> {
    let image = picture(8, 8)?;
    let config = ReportConfig::default();
    let report = Report::new(&config, Some("</script><b>"), &image, &[]);
    let html = report.render()?;

    assert!(html.contains("<title>Componentes &lt;/script&gt;&lt;b&gt;</title>"));
    assert!(html.contains(r#""title":"Componentes <\/script><b>""#));
    assert_eq!(
        report.default_file_name(),
        PathBuf::from("Componentes __script__b_.html")
    );
    Ok(())
}

#[test]
fn export_filtered_csv() -> Result<()> {
    let config = Config::builtin()?;
    let survey = Survey::open(ANNOTATION_DIR.join("mosaic.xml"), &config.catalog)?;
    let filter = RecordFilter::new(Some("Microperla"), None);
    let inventory = inventory::Inventory::from_records(filter.apply(&survey.records));

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("microperla.csv");
    tally::save_csv(&inventory, &output)?;

    assert_eq!(
        std::fs::read_to_string(&output)?,
        "type,color,size,count\nmicroperla,verde_jade,pp01,4\nmicroperla,otro,pp01,1\n"
    );
    Ok(())
}
