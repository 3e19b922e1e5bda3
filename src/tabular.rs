//! Column-oriented views of record sequences
//!
//! Available with the `tabular` feature. A [`Table`] is the analysis-oriented
//! shape of a record sequence: one array per column, all the same length,
//! with missing cells filled by explicit nulls. Conversion from records is
//! total; conversion back fails only when the columns cannot be reassembled
//! into rows.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{ChannelPayload, Record};

/// Column-oriented view of a record sequence.
///
/// The column set is the union of fields seen across the input records, in
/// first-seen order. Rows that lack a field hold `Value::Null` in that
/// column; on conversion back to records, null cells are omitted rather than
/// materialized as explicit nulls.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<(String, Vec<Value>)>,
    rows: usize,
}

impl Table {
    /// Build a table from a sequence of records. Total: any input converts.
    pub fn from_records(records: &[Record]) -> Self {
        let mut columns: Vec<(String, Vec<Value>)> = Vec::new();

        for (row, record) in records.iter().enumerate() {
            for (field, value) in record.iter() {
                let index = match columns.iter().position(|(name, _)| name == field) {
                    Some(index) => index,
                    None => {
                        // New column: backfill earlier rows with nulls.
                        columns.push((field.clone(), vec![Value::Null; row]));
                        columns.len() - 1
                    }
                };
                columns[index].1.push(value.clone());
            }
            // Columns this record lacked get a null for this row.
            for (_, column) in columns.iter_mut() {
                if column.len() <= row {
                    column.push(Value::Null);
                }
            }
        }

        Self { columns, rows: records.len() }
    }

    /// Build a table from the backend's column-oriented shape.
    ///
    /// Fails with [`Error::Schema`] when a column value is not an array or
    /// column lengths are inconsistent.
    pub fn from_columns(columns: &serde_json::Map<String, Value>) -> Result<Self> {
        let mut table_columns = Vec::with_capacity(columns.len());
        let mut rows: Option<usize> = None;

        for (name, value) in columns {
            let cells = value
                .as_array()
                .ok_or_else(|| Error::Schema(format!("column '{name}' is not an array")))?;
            match rows {
                None => rows = Some(cells.len()),
                Some(expected) if expected != cells.len() => {
                    return Err(Error::Schema(format!(
                        "column '{name}' has {} values, expected {expected}",
                        cells.len()
                    )));
                }
                Some(_) => {}
            }
            table_columns.push((name.clone(), cells.clone()));
        }

        Ok(Self { columns: table_columns, rows: rows.unwrap_or(0) })
    }

    /// Reassemble the table into row-oriented records.
    ///
    /// Null cells are treated as missing fields and omitted from the record.
    pub fn to_records(&self) -> Result<Vec<Record>> {
        for (name, column) in &self.columns {
            if column.len() != self.rows {
                return Err(Error::Schema(format!(
                    "column '{name}' has {} values, expected {}",
                    column.len(),
                    self.rows
                )));
            }
        }

        let mut records = Vec::with_capacity(self.rows);
        for row in 0..self.rows {
            let record: Record = self
                .columns
                .iter()
                .filter(|(_, column)| !column[row].is_null())
                .map(|(name, column)| (name.clone(), column[row].clone()))
                .collect();
            records.push(record);
        }
        Ok(records)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Values of one column, or `None` when the column does not exist.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, column)| column.as_slice())
    }
}

impl ChannelPayload {
    /// Build a [`Table`] from this payload's column-oriented data, when the
    /// backend returned any.
    pub fn table(&self) -> Result<Option<Table>> {
        match &self.columns {
            Some(columns) => Table::from_columns(columns).map(Some),
            None => Ok(None),
        }
    }
}
