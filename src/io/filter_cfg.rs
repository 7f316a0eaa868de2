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

use super::{ConfigError, ConfigRepr, InvalidConfigSnafu};
use crate::filter::{CovarianceUpdate, KalmanFilter};
use serde_derive::{Deserialize, Serialize};
use snafu::ResultExt;
use std::path::Path;
use typed_builder::TypedBuilder;

/// Serializable description of a [KalmanFilter].
///
/// Matrices are listed in row-major order, and noise covariances are given by their diagonal. Anything
/// left unset keeps the default of [KalmanFilter::new].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct KalmanConfig {
    /// Number of elements in the state vector
    pub dynamic_params: usize,
    /// Number of elements in the measurement vector
    pub measure_params: usize,
    /// Number of elements in the control vector: zero for none, negative for as many as in the state
    #[builder(default)]
    #[serde(default)]
    pub control_params: i64,
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub transition: Option<Vec<f64>>,
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub control: Option<Vec<f64>>,
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub measurement: Option<Vec<f64>>,
    /// Diagonal of the process noise covariance
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub process_noise: Option<Vec<f64>>,
    /// Diagonal of the measurement noise covariance
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub measurement_noise: Option<Vec<f64>>,
    /// Diagonal of the initial error covariance
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub error_cov_post: Option<Vec<f64>>,
    /// Initial state
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub state: Option<Vec<f64>>,
    #[builder(default)]
    #[serde(default)]
    pub covariance_update: CovarianceUpdate,
}

impl ConfigRepr for KalmanConfig {}

impl KalmanFilter {
    /// Loads the filter configuration from a YAML file and builds the filter from it.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let cfg = KalmanConfig::load(path)?;
        info!(
            "loaded Kalman filter with {} states and {} measurements",
            cfg.dynamic_params, cfg.measure_params
        );
        Self::from_config(&cfg).context(InvalidConfigSnafu)
    }
}
