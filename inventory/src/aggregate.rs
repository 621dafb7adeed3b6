//! Grouped component counts.

use crate::{common::*, record::*};

/// The count of one (type, color, size) combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InventoryGroup {
    #[serde(rename = "type")]
    pub kind: String,
    pub color: ColorKey,
    pub size: String,
    pub count: usize,
}

/// The groups of one type and their subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSummary<'a> {
    pub kind: &'a str,
    pub subtotal: usize,
    pub groups: &'a [InventoryGroup],
}

/// Point counts grouped by type, color and size.
///
/// Groups are ordered by the first appearance of their type, then by the first
/// appearance of their color and size within the type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inventory {
    groups: Vec<InventoryGroup>,
    total: usize,
}

impl Inventory {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a PointRecord>,
    {
        let mut counts: IndexMap<&str, IndexMap<(&ColorKey, &str), usize>> = IndexMap::new();
        let mut total = 0;

        for record in records {
            let PointRecord {
                ref kind,
                ref color_key,
                ref size,
                ..
            } = *record;

            *counts
                .entry(kind.as_str())
                .or_default()
                .entry((color_key, size.as_str()))
                .or_insert(0) += 1;
            total += 1;
        }

        let groups: Vec<_> = counts
            .into_iter()
            .flat_map(|(kind, colors)| {
                colors
                    .into_iter()
                    .map(move |((color, size), count)| InventoryGroup {
                        kind: kind.to_owned(),
                        color: color.clone(),
                        size: size.to_owned(),
                        count,
                    })
            })
            .collect();

        debug_assert_eq!(groups.iter().map(|group| group.count).sum::<usize>(), total);
        Self { groups, total }
    }

    pub fn groups(&self) -> &[InventoryGroup] {
        &self.groups
    }

    /// The number of counted points.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The count of a combination, if any point has it.
    pub fn get(&self, kind: &str, color: &str, size: &str) -> Option<usize> {
        self.groups
            .iter()
            .find(|group| group.kind == kind && group.color.as_str() == color && group.size == size)
            .map(|group| group.count)
    }

    /// Iterate over types with their groups and subtotals.
    pub fn kinds(&self) -> Vec<KindSummary<'_>> {
        let mut summaries = vec![];
        let mut start = 0;

        while start < self.groups.len() {
            let kind = self.groups[start].kind.as_str();
            let len = self.groups[start..]
                .iter()
                .take_while(|group| group.kind == kind)
                .count();
            let groups = &self.groups[start..(start + len)];

            summaries.push(KindSummary {
                kind,
                subtotal: groups.iter().map(|group| group.count).sum(),
                groups,
            });
            start += len;
        }

        summaries
    }

    pub fn into_groups(self) -> Vec<InventoryGroup> {
        self.groups
    }
}

impl<'a> FromIterator<&'a PointRecord> for Inventory {
    fn from_iter<I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a PointRecord>,
    {
        Self::from_records(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, color: &str, size: &str) -> PointRecord {
        PointRecord {
            x: r64(0.0),
            y: r64(0.0),
            kind: kind.into(),
            color_raw: Some(color.into()),
            color_key: color.parse().unwrap(),
            size: size.into(),
            display_color: "gray".into(),
        }
    }

    #[test]
    fn empty_inventory() {
        let inventory = Inventory::from_records(&[]);
        assert!(inventory.is_empty());
        assert_eq!(inventory.total(), 0);
        assert!(inventory.kinds().is_empty());
    }

    #[test]
    fn group_and_count() {
        let records = vec![
            record("cristal", "plata", "pp02"),
            record("balin", "dorado", ""),
            record("cristal", "rojo", "pp02"),
            record("cristal", "plata", "pp02"),
            record("cristal", "plata", "pp03"),
            record("balin", "dorado", ""),
        ];
        let inventory: Inventory = records.iter().collect();

        assert_eq!(inventory.total(), 6);
        assert_eq!(
            inventory
                .groups()
                .iter()
                .map(|group| (
                    group.kind.as_str(),
                    group.color.as_str(),
                    group.size.as_str(),
                    group.count
                ))
                .collect::<Vec<_>>(),
            vec![
                ("cristal", "plata", "pp02", 2),
                ("cristal", "rojo", "pp02", 1),
                ("cristal", "plata", "pp03", 1),
                ("balin", "dorado", "", 2),
            ]
        );
        assert_eq!(inventory.get("cristal", "plata", "pp02"), Some(2));
        assert_eq!(inventory.get("cristal", "plata", "pp04"), None);

        let kinds = inventory.kinds();
        assert_eq!(kinds.len(), 2);
        assert_eq!(kinds[0].kind, "cristal");
        assert_eq!(kinds[0].subtotal, 4);
        assert_eq!(kinds[0].groups.len(), 3);
        assert_eq!(kinds[1].kind, "balin");
        assert_eq!(kinds[1].subtotal, 2);
    }

    #[test]
    fn serialize_group() {
        let inventory = Inventory::from_records(&[record("cristal", "plata", "pp02")]);
        let json = serde_json::to_value(&inventory.groups()[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "cristal", "color": "plata", "size": "pp02", "count": 1 })
        );
    }
}
