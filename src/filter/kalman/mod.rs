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

pub use crate::errors::{ErrorKind, FilterError};
pub use crate::filter::estimate::Estimate;
pub use crate::filter::residual::Residual;
use crate::linalg::{DMatrix, DVector};
use crate::utils::{check_covariance, check_len, check_shape};
use serde_derive::{Deserialize, Serialize};
use std::fmt;

pub mod filtering;
pub mod initializers;

/// Variance placed on the diagonal of the measurement noise covariance of a new (or resized) filter.
pub const DEFAULT_MEASUREMENT_NOISE_VARIANCE: f64 = 1.0;

/// Dimension of the control input of a [KalmanFilter].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlParams {
    /// No control input: the filter has no control matrix at all.
    #[default]
    None,
    /// The control vector has the same dimension as the state vector.
    MirrorState,
    /// The control vector has this dimension. A dimension of zero is the same as `None`.
    Dim(usize),
}

impl ControlParams {
    /// Returns the dimension of the control vector for a state of `dynamic_params` elements.
    pub fn resolve(self, dynamic_params: usize) -> usize {
        match self {
            ControlParams::None => 0,
            ControlParams::MirrorState => dynamic_params,
            ControlParams::Dim(c) => c,
        }
    }
}

impl From<i64> for ControlParams {
    /// Signed convention: a negative value mirrors the state dimension, zero means no control input.
    fn from(c: i64) -> Self {
        match c {
            c if c < 0 => ControlParams::MirrorState,
            0 => ControlParams::None,
            c => ControlParams::Dim(c as usize),
        }
    }
}

/// Selects how the a-posteriori error covariance is computed in a correction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CovarianceUpdate {
    /// `P = (I - K H) P_pre`
    #[default]
    Standard,
    /// `P = (I - K H) P_pre (I - K H)' + K R K'`, which remains symmetric and positive under rounding errors.
    Joseph,
}

/// Discrete-time linear Kalman filter.
///
/// The state transition is `x_k = A x_{k-1} + B u_k + w_k` with `w ~ N(0, Q)` and the observation is
/// `z_k = H x_k + v_k` with `v ~ N(0, R)`. Each cycle is a call to [KalmanFilter::predict], which
/// yields the a-priori state, followed by a call to [KalmanFilter::correct], which folds in a
/// measurement and yields the a-posteriori state.
///
/// All matrices are owned by the filter: getters lend them immutably, and setters take ownership of
/// the replacement after checking its shape (and symmetry for covariances). A setter which fails
/// leaves the previously installed matrix untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct KalmanFilter {
    dynamic_params: usize,
    measure_params: usize,
    control_params: usize,
    state_pre: DVector<f64>,
    state_post: DVector<f64>,
    transition_matrix: DMatrix<f64>,
    control_matrix: Option<DMatrix<f64>>,
    process_noise_cov: DMatrix<f64>,
    measurement_matrix: DMatrix<f64>,
    measurement_noise_cov: DMatrix<f64>,
    error_cov_pre: DMatrix<f64>,
    error_cov_post: DMatrix<f64>,
    gain: DMatrix<f64>,
    covariance_update: CovarianceUpdate,
    /// Set by a prediction, cleared by a successful correction
    predicted: bool,
    last_residual: Option<Residual>,
}

impl KalmanFilter {
    /// Dimension of the state vector
    pub fn dynamic_params(&self) -> usize {
        self.dynamic_params
    }

    /// Dimension of the measurement vector
    pub fn measure_params(&self) -> usize {
        self.measure_params
    }

    /// Dimension of the control vector, zero if there is no control input
    pub fn control_params(&self) -> usize {
        self.control_params
    }

    /// A-priori state estimate, as computed by the latest prediction
    pub fn state_pre(&self) -> &DVector<f64> {
        &self.state_pre
    }

    /// A-posteriori state estimate, as computed by the latest correction
    pub fn state_post(&self) -> &DVector<f64> {
        &self.state_post
    }

    pub fn transition_matrix(&self) -> &DMatrix<f64> {
        &self.transition_matrix
    }

    /// Returns `None` when the filter was built without a control input.
    pub fn control_matrix(&self) -> Option<&DMatrix<f64>> {
        self.control_matrix.as_ref()
    }

    pub fn process_noise_cov(&self) -> &DMatrix<f64> {
        &self.process_noise_cov
    }

    pub fn measurement_matrix(&self) -> &DMatrix<f64> {
        &self.measurement_matrix
    }

    pub fn measurement_noise_cov(&self) -> &DMatrix<f64> {
        &self.measurement_noise_cov
    }

    pub fn error_cov_pre(&self) -> &DMatrix<f64> {
        &self.error_cov_pre
    }

    pub fn error_cov_post(&self) -> &DMatrix<f64> {
        &self.error_cov_post
    }

    pub fn gain(&self) -> &DMatrix<f64> {
        &self.gain
    }

    pub fn covariance_update(&self) -> CovarianceUpdate {
        self.covariance_update
    }

    /// Returns whether the latest operation was a prediction (or a correction which failed).
    pub fn is_predicted(&self) -> bool {
        self.predicted
    }

    /// Residual of the latest successful correction
    pub fn last_residual(&self) -> Option<&Residual> {
        self.last_residual.as_ref()
    }

    /// Sets the state transition matrix (A), which must be n x n.
    pub fn set_transition_matrix(&mut self, transition: DMatrix<f64>) -> Result<(), FilterError> {
        let n = self.dynamic_params;
        check_shape("transition matrix", &transition, n, n)?;
        self.transition_matrix = transition;
        Ok(())
    }

    /// Sets the control matrix (B), which must be n x c. Fails if the filter has no control input.
    pub fn set_control_matrix(&mut self, control: DMatrix<f64>) -> Result<(), FilterError> {
        if self.control_matrix.is_none() {
            return Err(FilterError::ControlNotConfigured);
        }
        check_shape(
            "control matrix",
            &control,
            self.dynamic_params,
            self.control_params,
        )?;
        self.control_matrix = Some(control);
        Ok(())
    }

    /// Sets the process noise covariance (Q), which must be n x n and exactly symmetric.
    pub fn set_process_noise_cov(&mut self, q: DMatrix<f64>) -> Result<(), FilterError> {
        check_covariance("process noise covariance", &q, self.dynamic_params)?;
        self.process_noise_cov = q;
        Ok(())
    }

    /// Sets the measurement matrix (H), which must be m x n.
    pub fn set_measurement_matrix(&mut self, h: DMatrix<f64>) -> Result<(), FilterError> {
        check_shape(
            "measurement matrix",
            &h,
            self.measure_params,
            self.dynamic_params,
        )?;
        self.measurement_matrix = h;
        Ok(())
    }

    /// Sets the measurement noise covariance (R), which must be m x m and exactly symmetric.
    pub fn set_measurement_noise_cov(&mut self, r: DMatrix<f64>) -> Result<(), FilterError> {
        check_covariance("measurement noise covariance", &r, self.measure_params)?;
        self.measurement_noise_cov = r;
        Ok(())
    }

    pub fn set_error_cov_pre(&mut self, p_pre: DMatrix<f64>) -> Result<(), FilterError> {
        check_covariance("a-priori error covariance", &p_pre, self.dynamic_params)?;
        self.error_cov_pre = p_pre;
        Ok(())
    }

    pub fn set_error_cov_post(&mut self, p_post: DMatrix<f64>) -> Result<(), FilterError> {
        check_covariance("a-posteriori error covariance", &p_post, self.dynamic_params)?;
        self.error_cov_post = p_post;
        Ok(())
    }

    /// Sets the Kalman gain (K), which must be n x m. It is overwritten by the next correction.
    pub fn set_gain(&mut self, gain: DMatrix<f64>) -> Result<(), FilterError> {
        check_shape("gain", &gain, self.dynamic_params, self.measure_params)?;
        self.gain = gain;
        Ok(())
    }

    pub fn set_state_pre(&mut self, state: DVector<f64>) -> Result<(), FilterError> {
        check_len("a-priori state", &state, self.dynamic_params)?;
        self.state_pre = state;
        Ok(())
    }

    pub fn set_state_post(&mut self, state: DVector<f64>) -> Result<(), FilterError> {
        check_len("a-posteriori state", &state, self.dynamic_params)?;
        self.state_post = state;
        Ok(())
    }

    pub fn set_covariance_update(&mut self, update: CovarianceUpdate) {
        self.covariance_update = update;
    }

    /// Changes the dimension of the measurement vector.
    ///
    /// This is a structural resize: the measurement matrix becomes a zero m x n matrix, the measurement
    /// noise covariance the default scaled identity, and the gain a zero n x m matrix. Any previous
    /// values of these matrices are discarded, as is the residual of the last correction.
    pub fn set_measure_params(&mut self, measure_params: usize) -> Result<(), FilterError> {
        if measure_params < 1 {
            return Err(FilterError::InvalidDimension {
                param: "measure params",
                value: measure_params,
            });
        }
        let n = self.dynamic_params;
        debug!(
            "resizing measurements from {} to {measure_params}",
            self.measure_params
        );
        self.measure_params = measure_params;
        self.measurement_matrix = DMatrix::zeros(measure_params, n);
        self.measurement_noise_cov =
            DMatrix::identity(measure_params, measure_params) * DEFAULT_MEASUREMENT_NOISE_VARIANCE;
        self.gain = DMatrix::zeros(n, measure_params);
        self.last_residual = None;
        Ok(())
    }
}

impl fmt::Display for KalmanFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Kalman filter: {} states, {} measurements, {} ({:?} covariance update)",
            self.dynamic_params,
            self.measure_params,
            if self.control_params > 0 {
                format!("{} controls", self.control_params)
            } else {
                "no control".to_string()
            },
            self.covariance_update
        )
    }
}
