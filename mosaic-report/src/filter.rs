use crate::common::*;
use inventory::type_key;

/// Select records by type and color.
///
/// Types are compared case-insensitively, colors by their normalized key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordFilter {
    kind: Option<String>,
    color: Option<ColorKey>,
}

impl RecordFilter {
    pub fn new(kind: Option<&str>, color: Option<&str>) -> Self {
        Self {
            kind: kind.map(type_key).filter(|kind| !kind.is_empty()),
            color: color.and_then(ColorKey::normalize),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.color.is_none()
    }

    pub fn matches(&self, record: &PointRecord) -> bool {
        let kind_ok = self
            .kind
            .as_ref()
            .map_or(true, |kind| *kind == type_key(&record.kind));
        let color_ok = self
            .color
            .as_ref()
            .map_or(true, |color| *color == record.color_key);
        kind_ok && color_ok
    }

    pub fn apply<'a>(&self, records: &'a [PointRecord]) -> Vec<&'a PointRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_records() -> Result<()> {
        let text = r#"<annotations><image id="0" name="a.jpg">
  <points label="Cristal" points="1,1;2,2"><attribute name="color">Azul Rey</attribute></points>
  <points label="balin" points="3,3"><attribute name="color">dorado</attribute></points>
  <points label="cristal" points="4,4"><attribute name="color">rojo</attribute></points>
</image></annotations>"#;
        let catalog = Catalog::new(CatalogConfig::default())?;
        let survey = Survey::parse(text, &catalog)?;

        assert_eq!(RecordFilter::default().apply(&survey.records).len(), 4);
        assert!(RecordFilter::new(Some(" "), Some("")).is_empty());
        assert_eq!(
            RecordFilter::new(Some("CRISTAL"), None)
                .apply(&survey.records)
                .len(),
            3
        );
        assert_eq!(
            RecordFilter::new(Some("cristal"), Some("azul rey"))
                .apply(&survey.records)
                .len(),
            2
        );
        assert_eq!(
            RecordFilter::new(None, Some("Dorado"))
                .apply(&survey.records)
                .len(),
            1
        );
        assert!(RecordFilter::new(Some("perla"), None)
            .apply(&survey.records)
            .is_empty());
        Ok(())
    }
}
