//! Exogenous parameter schedule for the closed loop.
//!
//! The rotor electrical speed follows a time-windowed step: samples inside
//! `[switch_on, switch_off)` run at the reduced speed, everything else at the
//! nominal speed. The two disturbance entries of the parameter vector are
//! held constant over the run.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedSchedule {
    /// Nominal electrical speed [rad/s].
    pub w_nominal: f64,
    /// Reduced electrical speed [rad/s] inside the switch window.
    pub w_reduced: f64,
    /// First sample index of the reduced-speed window.
    pub switch_on: usize,
    /// First sample index after the reduced-speed window.
    pub switch_off: usize,
    /// d-axis disturbance [V], constant over the run.
    pub dist_d: f64,
    /// q-axis disturbance [V], constant over the run.
    pub dist_q: f64,
}

impl Default for SpeedSchedule {
    fn default() -> Self {
        // Speed halved over the middle third-to-half of a 100-sample run.
        Self {
            w_nominal: 300.0,
            w_reduced: 150.0,
            switch_on: 34,
            switch_off: 50,
            dist_d: 0.0,
            dist_q: 0.0,
        }
    }
}

impl SpeedSchedule {
    /// Schedule that never leaves the nominal speed.
    pub fn constant(w_nominal: f64) -> Self {
        Self {
            w_nominal,
            w_reduced: w_nominal,
            switch_on: 0,
            switch_off: 0,
            dist_d: 0.0,
            dist_q: 0.0,
        }
    }

    /// Windowed step between two speed levels.
    pub fn windowed_step(
        w_nominal: f64,
        w_reduced: f64,
        switch_on: usize,
        switch_off: usize,
    ) -> Self {
        Self {
            w_nominal,
            w_reduced,
            switch_on,
            switch_off,
            dist_d: 0.0,
            dist_q: 0.0,
        }
    }

    /// Speed level at one sample index.
    pub fn speed_at(&self, sample: usize) -> f64 {
        if sample >= self.switch_on && sample < self.switch_off {
            self.w_reduced
        } else {
            self.w_nominal
        }
    }

    /// Full parameter vector (w, dist_d, dist_q) at one sample index.
    pub fn parameter_at(&self, sample: usize) -> DVector<f64> {
        DVector::from_vec(vec![self.speed_at(sample), self.dist_d, self.dist_q])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_schedule_never_switches() {
        let s = SpeedSchedule::constant(300.0);
        for i in 0..100 {
            assert_eq!(s.speed_at(i), 300.0);
        }
    }

    #[test]
    fn window_bounds_are_half_open() {
        let s = SpeedSchedule::windowed_step(300.0, 150.0, 3, 5);
        assert_eq!(s.speed_at(2), 300.0);
        assert_eq!(s.speed_at(3), 150.0);
        assert_eq!(s.speed_at(4), 150.0);
        assert_eq!(s.speed_at(5), 300.0);
    }

    #[test]
    fn switches_exactly_once_per_edge() {
        let s = SpeedSchedule::default();
        let mut transitions = 0;
        for i in 1..100 {
            if s.speed_at(i) != s.speed_at(i - 1) {
                transitions += 1;
            }
        }
        // one step down into the window, one step back up
        assert_eq!(transitions, 2);
    }

    #[test]
    fn parameter_vector_layout() {
        let mut s = SpeedSchedule::constant(250.0);
        s.dist_d = 1.0;
        s.dist_q = -2.0;
        let p = s.parameter_at(7);
        assert_eq!(p.len(), 3);
        assert_eq!(p[0], 250.0);
        assert_eq!(p[1], 1.0);
        assert_eq!(p[2], -2.0);
    }

    #[test]
    fn serde_roundtrip() {
        let s = SpeedSchedule::default();
        let json = serde_json::to_string(&s).unwrap();
        let back: SpeedSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
