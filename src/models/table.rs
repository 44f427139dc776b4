//! In-memory tables and their CSV encoding.
//!
//! A [`Table`] is the unit the stream uploader works on: a list of column
//! names and rows of typed [`Cell`]s. Column types for the dataset schema are
//! inferred from the cells, and rows are written as header-less CSV when
//! uploaded in parts.

use std::ops::Range;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::dataset::{Column, Schema};
use super::enums::ColumnType;
use crate::{Error, Result};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// One value in a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing value, written as an empty field
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit integer
    Long(i64),
    /// Floating point
    Double(f64),
    /// Timestamp without zone
    DateTime(NaiveDateTime),
    /// Anything else
    Text(String),
}

impl Cell {
    /// Parse a CSV field, picking the narrowest matching type.
    ///
    /// Tried in order: empty (null), integer, finite float, boolean,
    /// timestamp, then text.
    ///
    /// # Example
    ///
    /// ```
    /// use domo_rs::Cell;
    ///
    /// assert_eq!(Cell::parse("42"), Cell::Long(42));
    /// assert_eq!(Cell::parse("4.5"), Cell::Double(4.5));
    /// assert_eq!(Cell::parse(""), Cell::Null);
    /// assert_eq!(Cell::parse("West"), Cell::Text("West".into()));
    /// ```
    pub fn parse(field: &str) -> Cell {
        if field.is_empty() {
            return Cell::Null;
        }
        if let Ok(n) = field.parse::<i64>() {
            return Cell::Long(n);
        }
        if let Ok(x) = field.parse::<f64>() {
            if x.is_finite() {
                return Cell::Double(x);
            }
        }
        if field.eq_ignore_ascii_case("true") {
            return Cell::Bool(true);
        }
        if field.eq_ignore_ascii_case("false") {
            return Cell::Bool(false);
        }
        if let Some(ts) = parse_datetime(field) {
            return Cell::DateTime(ts);
        }
        Cell::Text(field.to_string())
    }

    /// Parse a CSV field as a value of a known column type.
    ///
    /// `STRING` fields are kept exactly as written, so `"02134"` stays
    /// text. Empty fields are null for every type. A field that does not
    /// fit its declared type falls back to [`Cell::parse`].
    ///
    /// # Example
    ///
    /// ```
    /// use domo_rs::{Cell, ColumnType};
    ///
    /// assert_eq!(Cell::parse_as("02134", ColumnType::String), Cell::Text("02134".into()));
    /// assert_eq!(Cell::parse_as("02134", ColumnType::Long), Cell::Long(2134));
    /// assert_eq!(Cell::parse_as("", ColumnType::String), Cell::Null);
    /// ```
    pub fn parse_as(field: &str, column_type: ColumnType) -> Cell {
        if field.is_empty() {
            return Cell::Null;
        }
        let typed = match column_type {
            ColumnType::String => Some(Cell::Text(field.to_string())),
            ColumnType::Long => field.parse::<i64>().ok().map(Cell::Long),
            ColumnType::Decimal | ColumnType::Double => field
                .parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .map(Cell::Double),
            ColumnType::Date | ColumnType::Datetime => parse_datetime(field).map(Cell::DateTime),
        };
        typed.unwrap_or_else(|| Cell::parse(field))
    }

    /// Returns `true` for [`Cell::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// CSV field text.
    ///
    /// Non-finite doubles have no CSV representation and are written empty.
    pub fn to_field(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Bool(b) => b.to_string(),
            Cell::Long(n) => n.to_string(),
            Cell::Double(x) if x.is_finite() => format!("{x:?}"),
            Cell::Double(_) => String::new(),
            Cell::DateTime(ts) => ts.format(DATETIME_FORMAT).to_string(),
            Cell::Text(s) => s.clone(),
        }
    }

    /// Approximate in-memory footprint in bytes.
    pub fn estimated_size(&self) -> u64 {
        match self {
            Cell::Bool(_) => 1,
            Cell::Null | Cell::Long(_) | Cell::Double(_) | Cell::DateTime(_) => 8,
            Cell::Text(s) => 24 + s.len() as u64,
        }
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Long(n)
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Cell::Double(x)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(ts: NaiveDateTime) -> Self {
        Cell::DateTime(ts)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Null, Into::into)
    }
}

fn parse_datetime(field: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(field, DATETIME_FORMAT) {
        return Some(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(field, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(field) {
        return Some(ts.naive_utc());
    }
    NaiveDate::parse_from_str(field, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Infer the schema type of one column from its cells.
///
/// Integers give `LONG`, integers mixed with floats give `DOUBLE`,
/// timestamps give `DATETIME`. Booleans, text, mixtures and all-null
/// columns give `STRING`.
pub fn infer_column_type<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> ColumnType {
    let mut inferred: Option<ColumnType> = None;

    for cell in cells {
        let this = match cell {
            Cell::Null => continue,
            Cell::Long(_) => ColumnType::Long,
            Cell::Double(_) => ColumnType::Double,
            Cell::DateTime(_) => ColumnType::Datetime,
            Cell::Bool(_) | Cell::Text(_) => return ColumnType::String,
        };

        inferred = Some(match (inferred, this) {
            (None, t) => t,
            (Some(a), b) if a == b => a,
            (Some(ColumnType::Long), ColumnType::Double)
            | (Some(ColumnType::Double), ColumnType::Long) => ColumnType::Double,
            _ => return ColumnType::String,
        });
    }

    inferred.unwrap_or(ColumnType::String)
}

/// A rectangular table of typed cells.
///
/// # Example
///
/// ```
/// use domo_rs::{Cell, ColumnType, Table};
///
/// let mut table = Table::new(vec!["region".into(), "units".into()]);
/// table.push_row(vec!["West".into(), 12i64.into()])?;
/// table.push_row(vec!["East".into(), Cell::Null])?;
///
/// let types: Vec<_> = table.schema().columns.iter().map(|c| c.column_type).collect();
/// assert_eq!(types, vec![ColumnType::String, ColumnType::Long]);
/// assert_eq!(table.to_csv(true)?, "region,units\nWest,12\nEast,\n");
/// # Ok::<(), domo_rs::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a table from rows, checking every row's width.
    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut table = Self::new(columns);
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the row width differs from the
    /// column count.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::Validation(format!(
                "row {} has {} cells, expected {}",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Inferred type of every column.
    pub fn column_types(&self) -> Vec<ColumnType> {
        (0..self.columns.len())
            .map(|i| infer_column_type(self.rows.iter().map(|row| &row[i])))
            .collect()
    }

    /// Dataset schema matching this table.
    pub fn schema(&self) -> Schema {
        Schema::new(
            self.columns
                .iter()
                .zip(self.column_types())
                .map(|(name, column_type)| Column::new(column_type, name.clone()))
                .collect(),
        )
    }

    /// Approximate in-memory footprint in bytes, used for chunk sizing.
    pub fn estimated_size(&self) -> u64 {
        self.rows
            .iter()
            .flatten()
            .map(Cell::estimated_size)
            .sum()
    }

    /// Encode the whole table as CSV.
    pub fn to_csv(&self, include_header: bool) -> Result<String> {
        self.encode(0..self.rows.len(), include_header)
    }

    /// Encode a contiguous range of rows as header-less CSV.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the range falls outside the table.
    pub fn rows_to_csv(&self, range: Range<usize>) -> Result<String> {
        if range.start > range.end || range.end > self.rows.len() {
            return Err(Error::Validation(format!(
                "row range {}..{} outside table of {} rows",
                range.start,
                range.end,
                self.rows.len()
            )));
        }
        self.encode(range, false)
    }

    fn encode(&self, range: Range<usize>, include_header: bool) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        if include_header {
            writer.write_record(&self.columns)?;
        }
        for row in &self.rows[range] {
            writer.write_record(row.iter().map(Cell::to_field))?;
        }

        let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| Error::Validation(format!("CSV is not UTF-8: {e}")))
    }

    /// Decode CSV with a header line, inferring each cell's type.
    pub fn from_csv(text: &str) -> Result<Self> {
        Self::decode(text, &Schema::default())
    }

    /// Decode CSV with a header line, typing each column by the schema
    /// column of the same name.
    ///
    /// Columns the schema does not name are inferred cell by cell as in
    /// [`Table::from_csv`].
    ///
    /// # Example
    ///
    /// ```
    /// use domo_rs::{Cell, Column, ColumnType, Schema, Table};
    ///
    /// let schema = Schema::new(vec![Column::new(ColumnType::String, "zip")]);
    /// let table = Table::from_csv_with_schema("zip,units\n02134,3\n", &schema)?;
    /// assert_eq!(table.rows()[0], vec![Cell::Text("02134".into()), Cell::Long(3)]);
    /// # Ok::<(), domo_rs::Error>(())
    /// ```
    pub fn from_csv_with_schema(text: &str, schema: &Schema) -> Result<Self> {
        Self::decode(text, schema)
    }

    fn decode(text: &str, schema: &Schema) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let types: Vec<Option<ColumnType>> = columns
            .iter()
            .map(|name| {
                schema
                    .columns
                    .iter()
                    .find(|column| &column.name == name)
                    .map(|column| column.column_type)
            })
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .zip(&types)
                    .map(|(field, column_type)| match column_type {
                        Some(column_type) => Cell::parse_as(field, *column_type),
                        None => Cell::parse(field),
                    })
                    .collect(),
            );
        }

        Self::with_rows(columns, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_cell_parse() {
        assert_eq!(Cell::parse("-7"), Cell::Long(-7));
        assert_eq!(Cell::parse("3.0"), Cell::Double(3.0));
        assert_eq!(Cell::parse("True"), Cell::Bool(true));
        assert_eq!(Cell::parse("nan"), Cell::Text("nan".into()));
        assert_eq!(Cell::parse("inf"), Cell::Text("inf".into()));
        assert_eq!(
            Cell::parse("2016-05-05 22:55:10"),
            Cell::DateTime(ts(2016, 5, 5, 22, 55, 10))
        );
        assert_eq!(
            Cell::parse("2016-05-05T22:55:10Z"),
            Cell::DateTime(ts(2016, 5, 5, 22, 55, 10))
        );
        assert_eq!(
            Cell::parse("2016-05-05"),
            Cell::DateTime(ts(2016, 5, 5, 0, 0, 0))
        );
    }

    #[test]
    fn test_field_encoding_round_trips() {
        for cell in [
            Cell::Long(12),
            Cell::Double(3.0),
            Cell::Double(0.1),
            Cell::Bool(false),
            Cell::DateTime(ts(2020, 1, 2, 3, 4, 5)),
            Cell::Text("Euler".into()),
            Cell::Null,
        ] {
            assert_eq!(Cell::parse(&cell.to_field()), cell);
        }
        assert_eq!(Cell::Double(f64::NAN).to_field(), "");
    }

    #[test]
    fn test_type_inference() {
        let longs = [Cell::Long(1), Cell::Null, Cell::Long(2)];
        assert_eq!(infer_column_type(&longs), ColumnType::Long);

        let mixed = [Cell::Long(1), Cell::Double(2.5)];
        assert_eq!(infer_column_type(&mixed), ColumnType::Double);

        let times = [Cell::DateTime(ts(2020, 1, 1, 0, 0, 0))];
        assert_eq!(infer_column_type(&times), ColumnType::Datetime);

        let bools = [Cell::Bool(true), Cell::Bool(false)];
        assert_eq!(infer_column_type(&bools), ColumnType::String);

        let nulls = [Cell::Null, Cell::Null];
        assert_eq!(infer_column_type(&nulls), ColumnType::String);

        let clash = [Cell::Long(1), Cell::DateTime(ts(2020, 1, 1, 0, 0, 0))];
        assert_eq!(infer_column_type(&clash), ColumnType::String);
    }

    #[test]
    fn test_row_width_checked() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        assert!(matches!(
            table.push_row(vec![Cell::Long(1)]),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_csv_quoting_and_ranges() {
        let table = Table::with_rows(
            vec!["name".into(), "note".into()],
            vec![
                vec!["Euler".into(), "likes, commas".into()],
                vec!["Gauss".into(), "says \"hi\"".into()],
                vec!["Noether".into(), Cell::Null],
            ],
        )
        .unwrap();

        assert_eq!(
            table.rows_to_csv(1..3).unwrap(),
            "Gauss,\"says \"\"hi\"\"\"\nNoether,\n"
        );
        assert!(table.rows_to_csv(2..4).is_err());

        let decoded = Table::from_csv(&table.to_csv(true).unwrap()).unwrap();
        assert_eq!(decoded, table);
    }

    #[test]
    fn test_estimated_size() {
        let table = Table::with_rows(
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec![1i64.into(), 2.0f64.into(), "xyz".into()]],
        )
        .unwrap();
        assert_eq!(table.estimated_size(), 8 + 8 + 27);
    }

    #[test]
    fn test_text_columns_survive_schema_decode() {
        let table = Table::with_rows(
            vec!["zip".into(), "flag".into(), "units".into()],
            vec![
                vec!["02134".into(), "yes".into(), 3i64.into()],
                vec!["10001".into(), "true".into(), Cell::Null],
            ],
        )
        .unwrap();
        let schema = table.schema();
        assert_eq!(schema.columns[0].column_type, ColumnType::String);

        let csv = table.to_csv(true).unwrap();
        assert_eq!(Table::from_csv_with_schema(&csv, &schema).unwrap(), table);

        // Without a schema the same text is re-inferred.
        let guessed = Table::from_csv(&csv).unwrap();
        assert_eq!(guessed.rows()[0][0], Cell::Long(2134));
    }

    #[test]
    fn test_parse_as_falls_back_on_mismatch() {
        assert_eq!(Cell::parse_as("4.5", ColumnType::Decimal), Cell::Double(4.5));
        assert_eq!(
            Cell::parse_as("2016-05-05", ColumnType::Date),
            Cell::DateTime(ts(2016, 5, 5, 0, 0, 0))
        );
        assert_eq!(Cell::parse_as("n/a", ColumnType::Long), Cell::Text("n/a".into()));
        assert_eq!(Cell::parse_as("", ColumnType::Long), Cell::Null);
    }
}
