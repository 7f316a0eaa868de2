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

use super::{CovarianceUpdate, Estimate, FilterError, KalmanFilter, Residual};
use crate::linalg::{DMatrix, DVector};
use crate::utils::check_len;

impl KalmanFilter {
    /// Computes a time update/prediction, i.e. advances the a-posteriori state and covariance to the
    /// a-priori ones, and returns a copy of the a-priori state.
    ///
    /// The control vector is optional; providing one to a filter built without control input, or one
    /// of the wrong length, is an error and leaves the filter unchanged.
    pub fn predict(&mut self, control: Option<&DVector<f64>>) -> Result<DVector<f64>, FilterError> {
        let mut state_pre = &self.transition_matrix * &self.state_post;

        if let Some(u) = control {
            let b = self
                .control_matrix
                .as_ref()
                .ok_or(FilterError::ControlNotConfigured)?;
            check_len("control vector", u, self.control_params)?;
            state_pre += b * u;
        }

        // P_pre = A P A' + Q
        let error_cov_pre = &self.transition_matrix
            * &self.error_cov_post
            * self.transition_matrix.transpose()
            + &self.process_noise_cov;

        trace!("predicted state {}", &state_pre);

        self.state_pre = state_pre;
        self.error_cov_pre = error_cov_pre;
        self.predicted = true;

        Ok(self.state_pre.clone())
    }

    /// Computes the measurement update with the provided observation, and returns a copy of the
    /// a-posteriori state.
    ///
    /// The correction always starts from the current a-priori state and covariance, so correcting twice
    /// without a prediction in between computes the same Bayesian update twice.
    ///
    /// Returns a [FilterError::SingularMatrix] if the innovation covariance cannot be inverted. In that
    /// case the filter is unchanged and the a-priori state remains the best available estimate.
    pub fn correct(&mut self, measurement: &DVector<f64>) -> Result<DVector<f64>, FilterError> {
        check_len("measurement", measurement, self.measure_params)?;

        let h = &self.measurement_matrix;
        let p_ht = &self.error_cov_pre * h.transpose();

        // Compute the innovation matrix (S_k).
        let s_k = h * &p_ht + &self.measurement_noise_cov;

        let s_k_inv = match s_k.try_inverse() {
            Some(s_k_inv) => s_k_inv,
            None => {
                warn!("innovation covariance is singular, measurement not processed");
                return Err(FilterError::SingularMatrix {
                    action: "compute the Kalman gain",
                });
            }
        };

        let gain = &p_ht * &s_k_inv;

        let prefit = measurement - h * &self.state_pre;
        let state_post = &self.state_pre + &gain * &prefit;
        let postfit = measurement - h * &state_post;
        let ratio = prefit.dot(&(&s_k_inv * &prefit));

        let i_kh = DMatrix::<f64>::identity(self.dynamic_params, self.dynamic_params) - &gain * h;
        let error_cov_post = match self.covariance_update {
            CovarianceUpdate::Standard => &i_kh * &self.error_cov_pre,
            CovarianceUpdate::Joseph => {
                &i_kh * &self.error_cov_pre * i_kh.transpose()
                    + &gain * &self.measurement_noise_cov * gain.transpose()
            }
        };

        trace!("corrected state {} (ratio = {ratio:.3})", &state_post);

        self.last_residual = Some(Residual::new(prefit, postfit, ratio, measurement.clone()));
        self.gain = gain;
        self.state_post = state_post;
        self.error_cov_post = error_cov_post;
        self.predicted = false;

        Ok(self.state_post.clone())
    }

    /// Predicts then corrects with the provided measurement.
    pub fn step(
        &mut self,
        control: Option<&DVector<f64>>,
        measurement: &DVector<f64>,
    ) -> Result<DVector<f64>, FilterError> {
        self.predict(control)?;
        self.correct(measurement)
    }

    /// Returns the best available estimate: the a-priori pair after a prediction, or the a-posteriori
    /// pair after a successful correction.
    pub fn estimate(&self) -> Estimate {
        if self.predicted {
            Estimate {
                state: self.state_pre.clone(),
                covar: self.error_cov_pre.clone(),
                predicted: true,
            }
        } else {
            Estimate {
                state: self.state_post.clone(),
                covar: self.error_cov_post.clone(),
                predicted: false,
            }
        }
    }
}
