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

use rand::Rng;

pub mod estimator;
pub mod white;

pub use estimator::MeasurementNoiseCovarianceEstimator;
pub use white::WhiteNoise;

/// Trait for any kind of stochastic modeling, used primarily to synthesize noisy measurements.
pub trait Stochastics {
    /// Return the variance of this stochastic noise model.
    fn covariance(&self) -> f64;

    /// Returns a new sample of these stochastics
    fn sample<R: Rng>(&mut self, rng: &mut R) -> f64;
}
