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

use snafu::prelude::Snafu;
use std::fmt;

/// Broad classification of a [FilterError], which tells the caller what kind of corrective action is needed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad dimensions, wrong shape, asymmetric covariance or wrong length vector: fix the input.
    InvalidParameter,
    /// The computation itself failed (e.g. a singular innovation covariance): retry with other data or noise.
    SignalProcessing,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorKind::InvalidParameter => write!(f, "invalid parameter"),
            ErrorKind::SignalProcessing => write!(f, "signal processing failure"),
        }
    }
}

/// Errors raised by the filter and by the noise estimator.
///
/// Every error is raised before any internal state is modified, so the instance which returned it is
/// left exactly as it was prior to the call.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FilterError {
    #[snafu(display("{param} must be at least one, got {value}"))]
    InvalidDimension { param: &'static str, value: usize },
    #[snafu(display(
        "{matrix} must be {expected_rows}x{expected_cols} but got {rows}x{cols}"
    ))]
    ShapeMismatch {
        matrix: &'static str,
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },
    #[snafu(display("{vector} must have {expected} elements but has {got}"))]
    LengthMismatch {
        vector: &'static str,
        expected: usize,
        got: usize,
    },
    #[snafu(display("{matrix} must be symmetric"))]
    AsymmetricMatrix { matrix: &'static str },
    #[snafu(display("no control matrix configured for this filter"))]
    ControlNotConfigured,
    #[snafu(display("matrix is singular, cannot {action}"))]
    SingularMatrix { action: &'static str },
}

impl FilterError {
    /// Returns whether this is a configuration error or a numerical failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FilterError::SingularMatrix { .. } => ErrorKind::SignalProcessing,
            _ => ErrorKind::InvalidParameter,
        }
    }
}
