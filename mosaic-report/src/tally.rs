//! Inventory tables and CSV export.

use crate::common::*;
use prettytable::{cell, row, Table};

/// Build the inventory table with per-type subtotals and the grand total.
pub fn inventory_table(inventory: &Inventory) -> Table {
    let mut table = Table::new();
    table.add_row(row!["type", "color", "size", "count"]);

    for summary in inventory.kinds() {
        for group in summary.groups {
            table.add_row(row![group.kind, group.color, group.size, r -> group.count]);
        }
        table.add_row(row![summary.kind, "", "subtotal", r -> summary.subtotal]);
    }
    table.add_row(row!["", "", "total", r -> inventory.total()]);

    table
}

/// Write the groups as `type,color,size,count` rows.
pub fn write_csv<W>(inventory: &Inventory, writer: W) -> Result<()>
where
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    if inventory.is_empty() {
        writer.write_record(&["type", "color", "size", "count"])?;
    }
    for group in inventory.groups() {
        writer.serialize(group)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_csv<P>(inventory: &Inventory, path: P) -> Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create file '{}'", path.display()))?;
    write_csv(inventory, io::BufWriter::new(file))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = r#"<annotations><image id="0" name="a.jpg">
  <points label="balin" points="1,1;2,2"></points>
  <points label="microperla" points="3,3"><attribute name="color">Verde Jade</attribute></points>
</image></annotations>"#;

    fn inventory() -> Result<Inventory> {
        let catalog = Catalog::new(CatalogConfig::default())?;
        Ok(Survey::parse(TEXT, &catalog)?.inventory)
    }

    #[test]
    fn csv_rows() -> Result<()> {
        let mut buf = vec![];
        write_csv(&inventory()?, &mut buf)?;
        assert_eq!(
            String::from_utf8(buf)?,
            "type,color,size,count\nbalin,plata,,2\nmicroperla,verde_jade,pp01,1\n"
        );
        Ok(())
    }

    #[test]
    fn csv_header_only() -> Result<()> {
        let mut buf = vec![];
        write_csv(&Inventory::default(), &mut buf)?;
        assert_eq!(String::from_utf8(buf)?, "type,color,size,count\n");
        Ok(())
    }

    #[test]
    fn table_rows() -> Result<()> {
        let table = inventory_table(&inventory()?);
        // header, two groups, two subtotals and the total
        assert_eq!(table.len(), 6);
        let text = table.to_string();
        assert!(text.contains("verde_jade"));
        assert!(text.contains("subtotal"));
        Ok(())
    }
}
