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

use std::ops::{Mul, MulAssign};

use crate::linalg::DVector;
use rand::Rng;
use rand_distr::StandardNormal;
use serde_derive::{Deserialize, Serialize};

use super::Stochastics;

/// White noise is an uncorrelated random variable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WhiteNoise {
    /// Mean value of this white noise
    pub mean: f64,
    /// Noise as a one-sigma of the Normal distribution.
    pub sigma: f64,
}

impl WhiteNoise {
    /// Zero mean white noise with the provided standard deviation
    pub fn new(sigma: f64) -> Self {
        Self {
            sigma,
            ..Default::default()
        }
    }

    /// Zero mean white noise with the provided variance
    pub fn from_variance(variance: f64) -> Self {
        Self::new(variance.sqrt())
    }

    /// Returns a vector of `dim` independent samples of this noise.
    pub fn sample_vector<R: Rng>(&mut self, dim: usize, rng: &mut R) -> DVector<f64> {
        DVector::from_iterator(dim, (0..dim).map(|_| self.sample(rng)))
    }
}

impl Stochastics for WhiteNoise {
    fn covariance(&self) -> f64 {
        self.sigma.powi(2)
    }

    fn sample<R: Rng>(&mut self, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        self.mean + self.sigma * z
    }
}

impl Mul<f64> for WhiteNoise {
    type Output = Self;

    /// Scale the white noise sigmas by a constant.
    fn mul(mut self, rhs: f64) -> Self::Output {
        self.sigma *= rhs;
        self
    }
}

impl MulAssign<f64> for WhiteNoise {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}
