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

/*! # sigfilt

Discrete-time linear Kalman filtering of sampled signals, and online calibration of the measurement
noise of the sensors feeding the filter.
*/

/// The linear Kalman filter, its estimates and its residuals.
pub mod filter;

/// Noise modeling: the measurement noise covariance estimator and white noise sources.
pub mod noise;

/// Utility functions shared by different modules, and which may be useful to engineers.
pub mod utils;

mod errors;
/// Sigfilt will (almost) never panic and functions which may fail will return an error.
pub use self::errors::{ErrorKind, FilterError};

/// Configuration files and CSV samples.
pub mod io;

#[macro_use]
extern crate log;
extern crate nalgebra as na;

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

#[allow(unused_imports)]
pub mod prelude {
    pub use crate::filter::*;
    pub use crate::io::{ConfigRepr, KalmanConfig};
    pub use crate::noise::{MeasurementNoiseCovarianceEstimator, Stochastics, WhiteNoise};
    pub use crate::{ErrorKind, FilterError};
}
