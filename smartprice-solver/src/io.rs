use crate::{RowInput, RowOutcome};
use smartprice_core::models::{ElasticityMap, Map, Observation, SegmentKey, SummaryRecord};
use std::io::{Read, Write};

/// The column the elasticity step appends to its output
pub const ELASTICITY_COLUMN: &str = "price_elasticity";

/// The columns the batch step appends to its output, in order
pub const RESULT_COLUMNS: [&str; 4] = ["optimal_price", "optimal_quantity", "unit_margin", "total_profit"];

/// A CSV table held as strings.
///
/// Cells are kept verbatim so that columns the engine does not understand
/// survive a read-modify-write cycle untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Assemble a table from its header and rows, which must all be as wide
    /// as the header
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != headers.len())
        {
            return Err(TableError::Width {
                row,
                expected: headers.len(),
                found: cells.len(),
            });
        }
        Ok(Self { headers, rows })
    }

    /// Read a headed CSV table
    pub fn read<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?.iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|record| Ok(record?.iter().map(String::from).collect()))
            .collect::<Result<Vec<_>, csv::Error>>()?;
        Ok(Self { headers, rows })
    }

    /// Write the table as CSV, header first
    pub fn write<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// The column names
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The rows, each aligned with the headers
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The index of the first column with this name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// The index of a column that must be present
    pub fn require(&self, name: &str) -> Result<usize, TableError> {
        self.position(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_owned()))
    }

    /// The cell at `(row, column)` as a number; blank or unparseable cells are None
    pub fn numeric(&self, row: usize, column: usize) -> Option<f64> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
            .and_then(|cell| cell.parse().ok())
    }

    /// Replace the named column's values, appending the column if it is new
    pub fn set_column<I: IntoIterator<Item = String>>(
        &mut self,
        name: &str,
        values: I,
    ) -> Result<(), TableError> {
        let values = values.into_iter().collect::<Vec<_>>();
        if values.len() != self.rows.len() {
            return Err(TableError::Length {
                expected: self.rows.len(),
                found: values.len(),
            });
        }

        match self.position(name) {
            Some(column) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[column] = value;
                }
            }
            None => {
                self.headers.push(name.to_owned());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Keep only the rows the predicate accepts, in their original order
    pub fn retain_rows<F: FnMut(&[String]) -> bool>(&mut self, mut keep: F) {
        self.rows.retain(|row| keep(row));
    }
}

/// Turn a sales table into observations keyed by the given segment columns.
///
/// Every other numeric cell is carried along as a contextual feature.
/// Unparseable prices and quantities become NaN, so the estimator excludes
/// those rows rather than the read failing.
pub fn observations<S: AsRef<str>>(
    table: &Table,
    segment_columns: &[S],
) -> Result<Vec<Observation>, TableError> {
    let price = table.require("price")?;
    let quantity = table.require("quantity")?;
    let segments = segment_columns
        .iter()
        .map(|name| table.require(name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let contextual = (0..table.headers.len())
        .filter(|column| *column != price && *column != quantity && !segments.contains(column))
        .collect::<Vec<_>>();

    Ok((0..table.len())
        .map(|row| {
            let segment = segments
                .iter()
                .map(|&column| table.rows[row][column].as_str())
                .collect::<SegmentKey>();
            let mut observation = Observation::new(
                table.numeric(row, price).unwrap_or(f64::NAN),
                table.numeric(row, quantity).unwrap_or(f64::NAN),
                segment,
            );
            observation.features = contextual
                .iter()
                .filter_map(|&column| {
                    table
                        .numeric(row, column)
                        .map(|value| (table.headers[column].clone(), value))
                })
                .collect::<Map<_, _>>();
            observation
        })
        .collect())
}

/// Join the estimates back onto the sales table.
///
/// Rows without a positive price are dropped; the rest keep their order and
/// gain a `price_elasticity` column, blank where the segment is undefined.
pub fn enrich_with_elasticity<S: AsRef<str>>(
    table: &mut Table,
    segment_columns: &[S],
    elasticities: &ElasticityMap,
) -> Result<(), TableError> {
    let price = table.require("price")?;
    let segments = segment_columns
        .iter()
        .map(|name| table.require(name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let before = table.len();
    table.retain_rows(|row| {
        row[price]
            .trim()
            .parse::<f64>()
            .is_ok_and(|p| p.is_finite() && p > 0.0)
    });
    tracing::debug!(dropped = before - table.len(), "dropped rows without a positive price");

    let values = table
        .rows
        .iter()
        .map(|row| {
            let key = segments
                .iter()
                .map(|&column| row[column].as_str())
                .collect::<SegmentKey>();
            elasticities
                .magnitude(&key)
                .map(|e| e.to_string())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>();

    table.set_column(ELASTICITY_COLUMN, values)
}

/// Write the elasticity summary as a pretty-printed JSON array, flushing the
/// writer so that a failed final write is reported rather than dropped
pub fn write_summary<W: Write>(records: &[SummaryRecord], mut writer: W) -> Result<(), TableError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Extract one batch row per table row.
///
/// `predicted_quantity` is preferred over `quantity` when both exist. The
/// optional cost columns, when absent, are absent for every row.
pub fn batch_inputs(table: &Table) -> Result<Vec<RowInput>, TableError> {
    if table.is_empty() {
        return Err(TableError::Empty);
    }

    let price = table.require("price")?;
    let quantity = table
        .position("predicted_quantity")
        .or_else(|| table.position("quantity"))
        .ok_or_else(|| TableError::MissingColumn("predicted_quantity or quantity".to_owned()))?;
    let elasticity = table.require(ELASTICITY_COLUMN)?;
    let rate = table.position("ad_valorem_rate");
    let cost = table.position("per_unit_cost");

    Ok((0..table.len())
        .map(|row| RowInput {
            price: table.numeric(row, price),
            quantity: table.numeric(row, quantity),
            elasticity: table.numeric(row, elasticity),
            ad_valorem_rate: rate.and_then(|column| table.numeric(row, column)),
            per_unit_cost: cost.and_then(|column| table.numeric(row, column)),
        })
        .collect())
}

/// Append the result columns, one outcome per row; unsolved rows read `NaN`
pub fn append_results(table: &mut Table, outcomes: &[RowOutcome]) -> Result<(), TableError> {
    let results = outcomes
        .iter()
        .map(|outcome| outcome.result().values())
        .collect::<Vec<_>>();

    for (index, name) in RESULT_COLUMNS.iter().enumerate() {
        table.set_column(name, results.iter().map(|values| values[index].to_string()))?;
    }
    Ok(())
}

/// Errors raised by the table layer
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// A column the operation needs is absent
    #[error("missing required column: {0}")]
    MissingColumn(String),
    /// The table has no rows
    #[error("the input table has no rows")]
    Empty,
    /// A row's width disagrees with the header's
    #[error("row {row} has {found} cells, expected {expected}")]
    Width {
        /// The offending row
        row: usize,
        /// The number of columns in the header
        expected: usize,
        /// The number of cells in the row
        found: usize,
    },
    /// A column's length disagrees with the table's
    #[error("expected {expected} values, got {found}")]
    Length {
        /// The number of rows in the table
        expected: usize,
        /// The number of values supplied
        found: usize,
    },
    /// Malformed CSV
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// Malformed or unwritable JSON
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Underlying read or write failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
