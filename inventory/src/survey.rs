use crate::{
    aggregate::Inventory,
    annotation::Annotations,
    catalog::Catalog,
    common::*,
    error::ParseError,
    record::{PixelSize, PointRecord},
};

/// The full result of one annotation document: parsed, enriched and counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Survey {
    pub annotations: Annotations,
    pub records: Vec<PointRecord>,
    pub inventory: Inventory,
}

impl Survey {
    pub fn new(annotations: Annotations, catalog: &Catalog) -> Self {
        let records = catalog.enrich_all(&annotations.points);
        let inventory = Inventory::from_records(&records);
        info!(
            "counted {} points in {} groups",
            inventory.total(),
            inventory.groups().len()
        );

        Self {
            annotations,
            records,
            inventory,
        }
    }

    pub fn parse(text: &str, catalog: &Catalog) -> Result<Self, ParseError> {
        let annotations = Annotations::parse(text, catalog.attributes())?;
        Ok(Self::new(annotations, catalog))
    }

    pub fn open<P>(path: P, catalog: &Catalog) -> Result<Self, ParseError>
    where
        P: AsRef<Path>,
    {
        let annotations = Annotations::open(path, catalog.attributes())?;
        Ok(Self::new(annotations, catalog))
    }

    /// Records lying outside of the image.
    pub fn out_of_bounds(&self, size: &PixelSize) -> Vec<&PointRecord> {
        self.records
            .iter()
            .filter(|record| !size.contains(record.x, record.y))
            .collect()
    }
}
