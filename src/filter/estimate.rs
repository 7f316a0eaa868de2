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

use crate::linalg::{DMatrix, DVector};
use std::fmt;

/// Snapshot of the filter state and its covariance.
///
/// After a prediction (or a correction which failed), this is the a-priori pair; after a successful
/// correction, this is the a-posteriori pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// The estimated state
    pub state: DVector<f64>,
    /// The covariance of this estimate
    pub covar: DMatrix<f64>,
    /// Whether or not this is a predicted estimate from a time update, or an estimate from a measurement
    pub predicted: bool,
}

impl Estimate {
    /// Initializes a new estimate from the state and the diagonal of its covariance
    pub fn from_diag(state: DVector<f64>, diag: DVector<f64>, predicted: bool) -> Self {
        Self {
            state,
            covar: DMatrix::from_diagonal(&diag),
            predicted,
        }
    }

    /// Returns the one sigma of each state component
    pub fn sigmas(&self) -> DVector<f64> {
        self.covar.diagonal().map(|v| v.abs().sqrt())
    }

    /// Returns whether the provided truth is within three sigmas of this estimate for every component
    pub fn within_3sigma(&self, truth: &DVector<f64>) -> bool {
        if truth.len() != self.state.len() {
            return false;
        }
        self.sigmas()
            .iter()
            .zip(self.state.iter().zip(truth.iter()))
            .all(|(sigma, (est, tru))| (est - tru).abs() <= 3.0 * sigma)
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let word = if self.predicted {
            "Prediction"
        } else {
            "Estimate"
        };
        let fmt_sig = self
            .sigmas()
            .iter()
            .map(|s| format!("{s:e}"))
            .collect::<Vec<String>>();
        write!(
            f,
            "=== {} ===\nstate {}\nsigmas [{}]\n",
            word,
            &self.state,
            fmt_sig.join(",")
        )
    }
}

impl fmt::LowerExp for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "=== PREDICTED: {} ===\nEstState {:e} Covariance {:e}\n=====================",
            &self.predicted, &self.state, &self.covar
        )
    }
}
