/*
    Sigfilt, linear estimation for sampled signals
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::{CsvSnafu, EmptyDataSnafu, InputOutputError, RaggedRowSnafu, StdIOSnafu};
use crate::filter::Estimate;
use crate::linalg::DVector;
use csv::{ReaderBuilder, Trim, Writer};
use snafu::{ensure, ResultExt};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Reads one sample per row from a CSV file, see [read_samples_from].
pub fn read_samples<P: AsRef<Path>>(path: P) -> Result<Vec<DVector<f64>>, InputOutputError> {
    let file = File::open(path).context(StdIOSnafu)?;
    read_samples_from(file)
}

/// Reads one sample per row of comma separated numbers.
///
/// The first row is skipped if it is not numeric (i.e. a header). Lines starting with `#` are ignored.
/// All rows must have the same number of columns.
///
/// Rows reported in errors are 0-based record indices: a header is row 0, and ignored comment lines are
/// not counted, so these are not line numbers of the file.
pub fn read_samples_from<R: Read>(reader: R) -> Result<Vec<DVector<f64>>, InputOutputError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut samples: Vec<DVector<f64>> = Vec::new();

    for (row, record) in rdr.records().enumerate() {
        let record = record.context(CsvSnafu)?;

        let values = match record
            .iter()
            .map(|field| field.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
        {
            Ok(values) => values,
            Err(_) if row == 0 => {
                debug!("skipping header {:?}", record);
                continue;
            }
            Err(_) => {
                let column = record
                    .iter()
                    .position(|field| field.parse::<f64>().is_err())
                    .unwrap_or_default();
                return Err(InputOutputError::ParseNumber { row, column });
            }
        };

        if let Some(first) = samples.first() {
            ensure!(
                values.len() == first.len(),
                RaggedRowSnafu {
                    row,
                    expected: first.len(),
                    got: values.len()
                }
            );
        }

        samples.push(DVector::from_vec(values));
    }

    ensure!(!samples.is_empty(), EmptyDataSnafu { action: "read" });

    debug!("read {} samples", samples.len());

    Ok(samples)
}

/// Writes the estimates to a CSV file, see [write_estimates_to].
pub fn write_estimates<P: AsRef<Path>>(
    path: P,
    estimates: &[Estimate],
) -> Result<(), InputOutputError> {
    let file = File::create(path).context(StdIOSnafu)?;
    write_estimates_to(file, estimates)
}

/// Writes one estimate per row with the columns `state_i`, then `sigma_i`, then `predicted` (one or zero).
pub fn write_estimates_to<W: Write>(
    writer: W,
    estimates: &[Estimate],
) -> Result<(), InputOutputError> {
    ensure!(!estimates.is_empty(), EmptyDataSnafu { action: "write" });

    let dim = estimates[0].state.len();
    let mut wtr = Writer::from_writer(writer);

    let mut header = Vec::with_capacity(2 * dim + 1);
    header.extend((0..dim).map(|i| format!("state_{i}")));
    header.extend((0..dim).map(|i| format!("sigma_{i}")));
    header.push("predicted".to_string());
    wtr.write_record(&header).context(CsvSnafu)?;

    for (row, est) in estimates.iter().enumerate() {
        ensure!(
            est.state.len() == dim,
            RaggedRowSnafu {
                row,
                expected: dim,
                got: est.state.len()
            }
        );
        let mut record = Vec::with_capacity(2 * dim + 1);
        record.extend(est.state.iter().map(|v| format!("{v:e}")));
        record.extend(est.sigmas().iter().map(|v| format!("{v:e}")));
        record.push(if est.predicted { "1" } else { "0" }.to_string());
        wtr.write_record(&record).context(CsvSnafu)?;
    }

    wtr.flush().context(StdIOSnafu)?;

    Ok(())
}
