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

use super::{ControlParams, CovarianceUpdate, FilterError, KalmanFilter};
use super::DEFAULT_MEASUREMENT_NOISE_VARIANCE;
use crate::io::KalmanConfig;
use crate::linalg::{DMatrix, DVector};

impl KalmanFilter {
    /// Initializes a filter with `dynamic_params` states, `measure_params` measurements and
    /// `control_params` controls, where zero controls means that there is no control input.
    ///
    /// The transition matrix is the identity, the control matrix is the (rectangular) identity, the
    /// process noise and the measurement matrix are zero, the measurement noise is the identity scaled
    /// by [DEFAULT_MEASUREMENT_NOISE_VARIANCE], both error covariances are the identity, and the gain
    /// and both states are zero.
    pub fn new(
        dynamic_params: usize,
        measure_params: usize,
        control_params: usize,
    ) -> Result<Self, FilterError> {
        Self::with_control(
            dynamic_params,
            measure_params,
            ControlParams::Dim(control_params),
        )
    }

    /// Initializes a filter whose control input is described by `control`, see [KalmanFilter::new].
    pub fn with_control(
        dynamic_params: usize,
        measure_params: usize,
        control: ControlParams,
    ) -> Result<Self, FilterError> {
        if dynamic_params < 1 {
            return Err(FilterError::InvalidDimension {
                param: "dynamic params",
                value: dynamic_params,
            });
        }
        if measure_params < 1 {
            return Err(FilterError::InvalidDimension {
                param: "measure params",
                value: measure_params,
            });
        }

        let n = dynamic_params;
        let m = measure_params;
        let c = control.resolve(n);

        debug!("new Kalman filter with {n} states, {m} measurements and {c} controls");

        Ok(Self {
            dynamic_params: n,
            measure_params: m,
            control_params: c,
            state_pre: DVector::zeros(n),
            state_post: DVector::zeros(n),
            transition_matrix: DMatrix::identity(n, n),
            control_matrix: if c > 0 {
                Some(DMatrix::identity(n, c))
            } else {
                None
            },
            process_noise_cov: DMatrix::zeros(n, n),
            measurement_matrix: DMatrix::zeros(m, n),
            measurement_noise_cov: DMatrix::identity(m, m) * DEFAULT_MEASUREMENT_NOISE_VARIANCE,
            error_cov_pre: DMatrix::identity(n, n),
            error_cov_post: DMatrix::identity(n, n),
            gain: DMatrix::zeros(n, m),
            covariance_update: CovarianceUpdate::default(),
            predicted: false,
            last_residual: None,
        })
    }

    /// Builds a filter from its configuration. Every provided matrix goes through its setter, so the
    /// same shape and symmetry checks apply.
    pub fn from_config(cfg: &KalmanConfig) -> Result<Self, FilterError> {
        let n = cfg.dynamic_params;
        let mut me = Self::with_control(n, cfg.measure_params, cfg.control_params.into())?;
        let m = me.measure_params;
        let c = me.control_params;

        if let Some(transition) = &cfg.transition {
            me.set_transition_matrix(from_row_major("transition", transition, n, n)?)?;
        }
        if let Some(control) = &cfg.control {
            if c == 0 {
                return Err(FilterError::ControlNotConfigured);
            }
            me.set_control_matrix(from_row_major("control", control, n, c)?)?;
        }
        if let Some(measurement) = &cfg.measurement {
            me.set_measurement_matrix(from_row_major("measurement", measurement, m, n)?)?;
        }
        if let Some(diag) = &cfg.process_noise {
            me.set_process_noise_cov(from_diag("process noise", diag, n)?)?;
        }
        if let Some(diag) = &cfg.measurement_noise {
            me.set_measurement_noise_cov(from_diag("measurement noise", diag, m)?)?;
        }
        if let Some(diag) = &cfg.error_cov_post {
            me.set_error_cov_post(from_diag("error covariance", diag, n)?)?;
        }
        if let Some(state) = &cfg.state {
            me.set_state_post(DVector::from_column_slice(state))?;
        }
        me.set_covariance_update(cfg.covariance_update);

        Ok(me)
    }
}

fn from_row_major(
    matrix: &'static str,
    values: &[f64],
    rows: usize,
    cols: usize,
) -> Result<DMatrix<f64>, FilterError> {
    if values.len() != rows * cols {
        return Err(FilterError::LengthMismatch {
            vector: matrix,
            expected: rows * cols,
            got: values.len(),
        });
    }
    Ok(DMatrix::from_row_slice(rows, cols, values))
}

fn from_diag(matrix: &'static str, diag: &[f64], dim: usize) -> Result<DMatrix<f64>, FilterError> {
    if diag.len() != dim {
        return Err(FilterError::LengthMismatch {
            vector: matrix,
            expected: dim,
            got: diag.len(),
        });
    }
    Ok(DMatrix::from_diagonal(&DVector::from_column_slice(diag)))
}
