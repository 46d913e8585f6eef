//! Presence-driven table pruning.
//!
//! Every report table is built the same way: a schema resolves each record
//! into one string per column, with the default sentinel rendering as an
//! empty string, and [`compose`] keeps a column only if it is required or if
//! some record filled it in. Tables are laid out transposed, one row per
//! schema column with the record values running across, so a pruned column
//! becomes a dropped row.

/// One schema column resolved against every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub required: bool,
    pub values: Vec<String>,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, required: bool, values: Vec<String>) -> Self {
        Self {
            header: header.into(),
            required,
            values,
        }
    }

    fn has_content(&self) -> bool {
        self.values.iter().any(|value| !value.is_empty())
    }
}

/// One emitted row: the column header followed by the per-record values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub header: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Number of record columns (excluding the header column).
    pub fn record_count(&self) -> usize {
        self.rows.first().map_or(0, |row| row.values.len())
    }
}

/// Prunes a resolved schema into a table. Returns `None` when there are no
/// records, or when nothing beyond the leading label column would be shown.
pub fn compose(columns: Vec<TableColumn>) -> Option<Table> {
    let record_count = columns.first().map_or(0, |column| column.values.len());
    if record_count == 0 {
        return None;
    }

    let rows: Vec<TableRow> = columns
        .into_iter()
        .filter(|column| column.required || column.has_content())
        .map(|column| TableRow {
            header: column.header,
            values: column.values,
        })
        .collect();

    if rows.len() <= 1 {
        return None;
    }

    Some(Table { rows })
}

#[cfg(test)]
mod tests {
    use super::{TableColumn, compose};

    fn label_column(labels: &[&str]) -> TableColumn {
        TableColumn::new(
            "",
            true,
            labels.iter().map(|label| label.to_string()).collect(),
        )
    }

    #[test]
    fn optional_column_is_dropped_only_when_fully_empty() {
        let table = compose(vec![
            label_column(&["profile_a.dat", "profile_b.dat"]),
            TableColumn::new(
                "Rg [A]",
                false,
                vec!["33.61 +/- 0.2".to_string(), String::new()],
            ),
            TableColumn::new("Notes", false, vec![String::new(), String::new()]),
        ])
        .expect("table with content should compose");

        let headers: Vec<&str> = table.rows.iter().map(|row| row.header.as_str()).collect();
        assert_eq!(headers, vec!["", "Rg [A]"]);
        assert_eq!(table.record_count(), 2);
    }

    #[test]
    fn required_column_survives_when_empty_everywhere() {
        let table = compose(vec![
            label_column(&["profile_a.dat"]),
            TableColumn::new("Date", true, vec![String::new()]),
            TableColumn::new("Notes", false, vec![String::new()]),
        ])
        .expect("required columns should keep the table alive");

        let headers: Vec<&str> = table.rows.iter().map(|row| row.header.as_str()).collect();
        assert_eq!(headers, vec!["", "Date"]);
        assert_eq!(table.rows[1].values, vec![String::new()]);
    }

    #[test]
    fn schema_order_is_preserved() {
        let table = compose(vec![
            label_column(&["series_a"]),
            TableColumn::new("Buffer range", true, vec!["10 to 20".to_string()]),
            TableColumn::new("Sample range", true, vec!["45 to 60".to_string()]),
            TableColumn::new("Baseline correction", true, vec!["None".to_string()]),
        ])
        .expect("table should compose");

        let headers: Vec<&str> = table.rows.iter().map(|row| row.header.as_str()).collect();
        assert_eq!(
            headers,
            vec!["", "Buffer range", "Sample range", "Baseline correction"]
        );
    }

    #[test]
    fn no_records_means_no_table() {
        assert!(compose(vec![label_column(&[]), TableColumn::new("Date", true, vec![])]).is_none());
        assert!(compose(Vec::new()).is_none());
    }

    #[test]
    fn label_only_table_is_suppressed() {
        let columns = vec![
            label_column(&["profile_a.dat"]),
            TableColumn::new("Notes", false, vec![String::new()]),
        ];
        assert!(compose(columns).is_none());
    }
}
