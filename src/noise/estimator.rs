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

use crate::errors::FilterError;
use crate::linalg::{DMatrix, DVector};
use crate::utils::check_len;
use std::fmt;

/// Online estimator of the measurement noise covariance of a sensor.
///
/// Feed it samples of the sensor output while the measured quantity is static: the running mean is the
/// sensor bias and the running (population) covariance is the matrix to install as the measurement
/// noise covariance of a [crate::filter::KalmanFilter].
///
/// Samples are folded in with Welford's recurrence, so nothing is summed from scratch and the
/// covariance stays exactly symmetric.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementNoiseCovarianceEstimator {
    measure_params: usize,
    sample_average: DVector<f64>,
    measurement_noise_cov: DMatrix<f64>,
    sample_count: usize,
}

impl MeasurementNoiseCovarianceEstimator {
    pub fn new(measure_params: usize) -> Result<Self, FilterError> {
        if measure_params < 1 {
            return Err(FilterError::InvalidDimension {
                param: "measure params",
                value: measure_params,
            });
        }
        Ok(Self {
            measure_params,
            sample_average: DVector::zeros(measure_params),
            measurement_noise_cov: DMatrix::zeros(measure_params, measure_params),
            sample_count: 0,
        })
    }

    /// Folds a new sample into the running mean and covariance.
    pub fn update(&mut self, sample: &DVector<f64>) -> Result<(), FilterError> {
        check_len("sample", sample, self.measure_params)?;

        self.sample_count += 1;
        let n = self.sample_count as f64;

        let delta = sample - &self.sample_average;
        self.sample_average += &delta / n;

        // C_n = (n - 1) / n * (C_{n-1} + delta delta' / n), with delta taken against the previous mean
        let weight = (n - 1.0) / n;
        for i in 0..self.measure_params {
            for j in i..self.measure_params {
                let cov_ij = weight * (self.measurement_noise_cov[(i, j)] + delta[i] * delta[j] / n);
                self.measurement_noise_cov[(i, j)] = cov_ij;
                self.measurement_noise_cov[(j, i)] = cov_ij;
            }
        }

        Ok(())
    }

    /// Folds all of the provided samples, stopping at the first one of the wrong length.
    pub fn update_all<'a, I>(&mut self, samples: I) -> Result<(), FilterError>
    where
        I: IntoIterator<Item = &'a DVector<f64>>,
    {
        for sample in samples {
            self.update(sample)?;
        }
        Ok(())
    }

    /// Forgets all samples.
    pub fn reset(&mut self) {
        self.sample_average.fill(0.0);
        self.measurement_noise_cov.fill(0.0);
        self.sample_count = 0;
    }

    pub fn measure_params(&self) -> usize {
        self.measure_params
    }

    /// Mean of all of the samples so far
    pub fn sample_average(&self) -> &DVector<f64> {
        &self.sample_average
    }

    /// Population covariance (i.e. normalized by the number of samples) of all of the samples so far
    pub fn measurement_noise_cov(&self) -> &DMatrix<f64> {
        &self.measurement_noise_cov
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }
}

impl fmt::Display for MeasurementNoiseCovarianceEstimator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "noise estimate over {} samples: mean {} covariance {}",
            self.sample_count, &self.sample_average, &self.measurement_noise_cov
        )
    }
}
