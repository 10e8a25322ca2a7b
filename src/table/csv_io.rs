use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Writer};

use super::{
    LikelihoodTable, NLL_COLUMN, NegLogLikelihood, ParameterTable, TOTAL_KEY,
};
use crate::error::{Error, Result};

impl NegLogLikelihood {
    /// Read a reference table from a CSV file.
    ///
    /// See [`from_reader`](Self::from_reader) for the expected layout.
    ///
    /// # Errors
    /// I/O and CSV errors, plus everything `from_reader` reports.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Read a reference table from CSV.
    ///
    /// The first column holds the key, the column whose header is exactly
    /// `-log(likelihood)` holds the value. The row keyed `total` fills
    /// [`total`](Self::total), every other row becomes a dataset entry.
    ///
    /// # Errors
    /// - [`Error::MissingColumn`] without a `-log(likelihood)` column
    /// - [`Error::EmptyTable`] without data rows
    /// - [`Error::InvalidValue`] for a value that is not a number
    /// - [`Error::DuplicateDataset`] for a repeated key
    /// - [`Error::MissingStatistic`] without a `total` row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let value_idx = rdr
            .headers()?
            .iter()
            .position(|h| h == NLL_COLUMN)
            .ok_or_else(|| Error::MissingColumn(NLL_COLUMN.to_owned()))?;

        let mut total = None;
        let mut datasets: Vec<(String, f64)> = Vec::new();
        let mut n_rows = 0usize;

        for record in rdr.records() {
            let record = record?;
            n_rows += 1;

            let key = record.get(0).unwrap_or_default().to_owned();
            let raw = record.get(value_idx).unwrap_or_default();
            let value: f64 = raw.parse().map_err(|_| Error::InvalidValue {
                key: key.clone(),
                value: raw.to_owned(),
            })?;

            if key == TOTAL_KEY {
                if total.replace(value).is_some() {
                    return Err(Error::DuplicateDataset(key));
                }
            } else if datasets.iter().any(|(k, _)| *k == key) {
                return Err(Error::DuplicateDataset(key));
            } else {
                datasets.push((key, value));
            }
        }

        if n_rows == 0 {
            return Err(Error::EmptyTable);
        }

        let total = total.ok_or_else(|| Error::MissingStatistic(TOTAL_KEY.to_owned()))?;
        Ok(Self { total, datasets })
    }

    /// Write this table to a CSV file (total first, then datasets).
    ///
    /// # Errors
    /// I/O and CSV errors.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_writer(File::create(path)?)
    }

    /// Write this table as CSV, in the layout [`from_reader`](Self::from_reader) reads.
    ///
    /// # Errors
    /// I/O and CSV errors.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = Writer::from_writer(writer);
        wtr.write_record(["name", NLL_COLUMN])?;
        wtr.write_record([TOTAL_KEY, self.total.to_string().as_str()])?;
        for (name, value) in &self.datasets {
            wtr.write_record([name.as_str(), value.to_string().as_str()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl LikelihoodTable {
    /// Write the table to a CSV file.
    ///
    /// # Errors
    /// See [`to_writer`](Self::to_writer).
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_writer(File::create(path)?)
    }

    /// Write one CSV row per iteration: index, total, then one column per
    /// dataset of the first row.
    ///
    /// # Errors
    /// I/O and CSV errors; [`Error::MissingStatistic`] when a row lacks a
    /// dataset present in the first row.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let names: Vec<String> = self
            .rows
            .first()
            .map(|(_, nll)| nll.names().map(str::to_owned).collect())
            .unwrap_or_default();

        let mut wtr = Writer::from_writer(writer);
        let mut header = vec![self.iteration_name.clone(), TOTAL_KEY.to_owned()];
        header.extend(names.iter().cloned());
        wtr.write_record(&header)?;

        for (iteration, nll) in &self.rows {
            let mut record = vec![iteration.to_string(), nll.total.to_string()];
            for name in &names {
                record.push(nll.require(name)?.to_string());
            }
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ParameterTable {
    /// Write the table to a CSV file.
    ///
    /// # Errors
    /// I/O and CSV errors.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_writer(File::create(path)?)
    }

    /// Write one CSV row per iteration with one column per parameter of the
    /// first row. Parameters a row does not carry are left empty.
    ///
    /// # Errors
    /// I/O and CSV errors.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let names: Vec<String> = self
            .rows
            .first()
            .map(|(_, params)| params.names().map(str::to_owned).collect())
            .unwrap_or_default();

        let mut wtr = Writer::from_writer(writer);
        let mut header = vec![self.iteration_name.clone()];
        header.extend(names.iter().cloned());
        wtr.write_record(&header)?;

        for (iteration, params) in &self.rows {
            let mut record = vec![iteration.to_string()];
            record.extend(
                names
                    .iter()
                    .map(|name| params.get(name).map(|v| v.to_string()).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ParameterValues;
    use approx::assert_abs_diff_eq;

    #[test]
    fn reads_reference_table() {
        let csv = "name,-log(likelihood)\ntotal,10.0\nA,4.0\nB,6.0\n";
        let nll = NegLogLikelihood::from_reader(csv.as_bytes()).unwrap();

        assert_abs_diff_eq!(nll.total, 10.0);
        assert_eq!(nll.datasets, vec![("A".to_owned(), 4.0), ("B".to_owned(), 6.0)]);
    }

    #[test]
    fn value_column_is_found_by_exact_header() {
        let csv = "name,n_points,-log(likelihood)\nA,12,4.5\ntotal,12,4.5\n";
        let nll = NegLogLikelihood::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(nll.dataset("A"), Some(4.5));

        let csv = "name,-log(Likelihood)\ntotal,1.0\n";
        let err = NegLogLikelihood::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(c) if c == NLL_COLUMN));
    }

    #[test]
    fn rejects_malformed_tables() {
        let header_only = "name,-log(likelihood)\n";
        assert!(matches!(
            NegLogLikelihood::from_reader(header_only.as_bytes()),
            Err(Error::EmptyTable)
        ));

        let no_total = "name,-log(likelihood)\nA,1.0\n";
        assert!(matches!(
            NegLogLikelihood::from_reader(no_total.as_bytes()),
            Err(Error::MissingStatistic(k)) if k == "total"
        ));

        let duplicate = "name,-log(likelihood)\ntotal,2.0\nA,1.0\nA,1.0\n";
        assert!(matches!(
            NegLogLikelihood::from_reader(duplicate.as_bytes()),
            Err(Error::DuplicateDataset(k)) if k == "A"
        ));

        let garbage = "name,-log(likelihood)\ntotal,abc\n";
        assert!(matches!(
            NegLogLikelihood::from_reader(garbage.as_bytes()),
            Err(Error::InvalidValue { key, value }) if key == "total" && value == "abc"
        ));
    }

    #[test]
    fn reference_table_survives_write_then_read() {
        let nll = NegLogLikelihood::new(10.25).with_dataset("A", 4.0).with_dataset("B", 6.25);
        let mut buf = Vec::new();
        nll.to_writer(&mut buf).unwrap();

        assert_eq!(NegLogLikelihood::from_reader(buf.as_slice()).unwrap(), nll);
    }

    #[test]
    fn likelihood_table_layout() {
        let mut t = LikelihoodTable::new("simulation");
        t.push(0, NegLogLikelihood::new(10.0).with_dataset("A_sim", 4.0));
        t.push(3, NegLogLikelihood::new(9.5).with_dataset("A_sim", 3.5));

        let mut buf = Vec::new();
        t.to_writer(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text, "simulation,total,A_sim\n0,10,4\n3,9.5,3.5\n");
    }

    #[test]
    fn parameter_table_leaves_missing_cells_empty() {
        let mut t = ParameterTable::new("simulation");
        t.push(0, ParameterValues(vec![("mu".to_owned(), 1.0), ("k".to_owned(), 2.0)]));
        t.push(1, ParameterValues(vec![("mu".to_owned(), 1.5)]));

        let mut buf = Vec::new();
        t.to_writer(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text, "simulation,mu,k\n0,1,2\n1,1.5,\n");
    }
}
