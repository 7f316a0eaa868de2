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

use crate::linalg::DVector;
use std::fmt;

/// Stores the residuals of a measurement update.
#[derive(Debug, Clone, PartialEq)]
pub struct Residual {
    /// The prefit residual, also called the innovation: `z - H * x_pre`
    pub prefit: DVector<f64>,
    /// The postfit residual: `z - H * x_post`
    pub postfit: DVector<f64>,
    /// The normalized innovation squared, computed as `v' * S^-1 * v` where `v` is the prefit residual
    /// and `S` the innovation covariance. It follows a Chi Square distribution with as many degrees of
    /// freedom as there are measurements when the filter is consistent.
    pub ratio: f64,
    /// The real observation
    pub real_obs: DVector<f64>,
}

impl Residual {
    pub fn new(
        prefit: DVector<f64>,
        postfit: DVector<f64>,
        ratio: f64,
        real_obs: DVector<f64>,
    ) -> Self {
        Self {
            prefit,
            postfit,
            ratio,
            real_obs,
        }
    }

    /// The computed observation, i.e. the observation expected from the a-priori state
    pub fn computed_obs(&self) -> DVector<f64> {
        &self.real_obs - &self.prefit
    }
}

impl fmt::Display for Residual {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Residual ratio = {:.3}\nPrefit {} Postfit {}",
            self.ratio, &self.prefit, &self.postfit
        )
    }
}

impl fmt::LowerExp for Residual {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Prefit {:e} Postfit {:e}", &self.prefit, &self.postfit)
    }
}
