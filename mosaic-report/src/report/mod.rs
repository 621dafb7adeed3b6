//! The self-contained HTML report.

use crate::{common::*, config::ReportConfig, embed::EmbeddedImage};

const TEMPLATE: &str = include_str!("template.html");

/// A marker as seen by the report script.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct Marker<'a> {
    x: f64,
    y: f64,
    #[serde(rename = "type")]
    kind: &'a str,
    color: &'a str,
    size: &'a str,
    display: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Swatch<'a> {
    key: &'a str,
    display: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportData<'a> {
    title: &'a str,
    width: usize,
    height: usize,
    marker_size: u32,
    image: &'a str,
    points: Vec<Marker<'a>>,
    kinds: Vec<&'a str>,
    colors: Vec<Swatch<'a>>,
}

/// The interactive report of one annotated image.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub title: String,
    pub image: &'a EmbeddedImage,
    pub records: &'a [PointRecord],
    pub marker_size: u32,
}

impl<'a> Report<'a> {
    pub fn new(
        config: &ReportConfig,
        model_name: Option<&str>,
        image: &'a EmbeddedImage,
        records: &'a [PointRecord],
    ) -> Self {
        Self {
            title: config.title(model_name),
            image,
            records,
            marker_size: config.marker_size,
        }
    }

    /// The file name used when no output path is given.
    pub fn default_file_name(&self) -> PathBuf {
        let stem: String = self
            .title
            .chars()
            .map(|ch| match ch {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                ch if ch.is_control() => '_',
                ch => ch,
            })
            .collect();
        PathBuf::from(format!("{}.html", stem))
    }

    pub fn render(&self) -> Result<String> {
        let points: Vec<_> = self
            .records
            .iter()
            .map(|record| Marker {
                x: record.x.raw(),
                y: record.y.raw(),
                kind: &record.kind,
                color: record.color_key.as_str(),
                size: &record.size,
                display: &record.display_color,
            })
            .collect();
        let kinds: Vec<&str> = self
            .records
            .iter()
            .map(|record| record.kind.as_str())
            .sorted()
            .dedup()
            .collect();
        let colors: Vec<_> = self
            .records
            .iter()
            .map(|record| (record.color_key.as_str(), record.display_color.as_str()))
            .sorted()
            .dedup_by(|lhs, rhs| lhs.0 == rhs.0)
            .map(|(key, display)| Swatch { key, display })
            .collect();

        let data = ReportData {
            title: &self.title,
            width: self.image.size.width,
            height: self.image.size.height,
            marker_size: self.marker_size,
            image: &self.image.data_uri,
            points,
            kinds,
            colors,
        };
        let data = script_json(&data)?;
        let title = escape_html(&self.title);

        fill_template(TEMPLATE, |key| match key {
            "TITLE" => Some(title.as_str()),
            "DATA" => Some(data.as_str()),
            _ => None,
        })
    }

    pub fn write<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let html = self.render()?;
        fs::write(path, html)
            .with_context(|| format!("failed to write report '{}'", path.display()))?;
        Ok(())
    }
}

/// Replace `{{KEY}}` placeholders of the template. Substituted text is not scanned again.
fn fill_template<'a, F>(template: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[(start + 2)..];
        let end = after
            .find("}}")
            .ok_or_else(|| format_err!("unclosed placeholder in report template"))?;
        let key = &after[..end];
        let value = lookup(key)
            .ok_or_else(|| format_err!("unknown placeholder '{}' in report template", key))?;
        output.push_str(value);
        rest = &after[(end + 2)..];
    }
    output.push_str(rest);

    Ok(output)
}

/// Serialize to JSON that is safe inside a `<script>` element.
fn script_json<T>(value: &T) -> Result<String>
where
    T: Serialize,
{
    let json = serde_json::to_string(value)?;
    Ok(json.replace("</", "<\\/").replace("<!--", "<\\!--"))
}

fn escape_html(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            ch => output.push(ch),
        }
    }
    output
}
