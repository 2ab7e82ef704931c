//! Quadratic interpolating B-spline
//!
//! Knot placement follows the classic interpolating-spline convention for
//! even degree: the end points carry multiplicity `k + 1` and the interior
//! knots sit halfway between consecutive interior data points, giving exactly
//! as many basis functions as data points.

use faer::{Mat, linalg::solvers::Solve};
use thiserror::Error;

const DEGREE: usize = 2;

#[derive(Debug, Error, PartialEq)]
pub enum SplineError {
    #[error("need at least {min} control points, got {got}")]
    TooFewPoints { min: usize, got: usize },

    #[error("x and y tables differ in length ({x} vs {y})")]
    LengthMismatch { x: usize, y: usize },

    #[error("x values must be strictly increasing")]
    NotIncreasing,

    #[error("interpolation system is singular")]
    Singular,
}

/// Degree-2 spline passing through every control point
#[derive(Debug, Clone)]
pub struct QuadraticSpline {
    knots: Vec<f64>,
    coeffs: Vec<f64>,
}

impl QuadraticSpline {
    /// Fit the spline through `(xs[i], ys[i])`
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self, SplineError> {
        let m = xs.len();
        if m != ys.len() {
            return Err(SplineError::LengthMismatch { x: m, y: ys.len() });
        }
        if m < DEGREE + 1 {
            return Err(SplineError::TooFewPoints {
                min: DEGREE + 1,
                got: m,
            });
        }
        if xs.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(SplineError::NotIncreasing);
        }

        let mut knots = vec![xs[0]; DEGREE + 1];
        knots.extend((2..m - 1).map(|j| 0.5 * (xs[j] + xs[j - 1])));
        knots.extend(std::iter::repeat_n(xs[m - 1], DEGREE + 1));

        let spline = Self {
            knots,
            coeffs: vec![0.0; m],
        };

        // Collocation matrix: row r holds the basis functions evaluated at xs[r]
        let mut matrix = Mat::<f64>::zeros(m, m);
        for (row, &x) in xs.iter().enumerate() {
            let span = spline.span(x);
            for (q, value) in spline.basis(span, x).into_iter().enumerate() {
                matrix[(row, span - DEGREE + q)] = value;
            }
        }

        let coeffs = solve(&matrix, ys).ok_or(SplineError::Singular)?;
        Ok(Self { coeffs, ..spline })
    }

    /// Evaluate the spline; values outside the data range extrapolate the end pieces
    pub fn eval(&self, x: f64) -> f64 {
        let span = self.span(x);
        self.basis(span, x)
            .into_iter()
            .enumerate()
            .map(|(q, b)| b * self.coeffs[span - DEGREE + q])
            .sum()
    }

    /// Knot interval `[t[i], t[i+1])` containing `x`, clamped to the valid range
    fn span(&self, x: f64) -> usize {
        let n = self.knots.len();
        let first = DEGREE;
        let last = n - DEGREE - 2;

        if x >= self.knots[last + 1] {
            return last;
        }
        if x < self.knots[first + 1] {
            return first;
        }
        // Rightmost knot index in [first, last] with t[i] <= x
        first + self.knots[first..=last].partition_point(|&t| t <= x) - 1
    }

    /// Non-zero basis functions on `span` (Cox-de Boor)
    fn basis(&self, span: usize, x: f64) -> [f64; DEGREE + 1] {
        let t = &self.knots;
        let mut values = [0.0; DEGREE + 1];
        let mut left = [0.0; DEGREE + 1];
        let mut right = [0.0; DEGREE + 1];
        values[0] = 1.0;

        for j in 1..=DEGREE {
            left[j] = x - t[span + 1 - j];
            right[j] = t[span + j] - x;
            let mut saved = 0.0;
            for r in 0..j {
                let tmp = values[r] / (right[r + 1] + left[j - r]);
                values[r] = saved + right[r + 1] * tmp;
                saved = left[j - r] * tmp;
            }
            values[j] = saved;
        }

        values
    }
}

/// Solve `a * x = b` by full-pivot LU
///
/// A singular system shows up as non-finite coefficients or as a solution
/// that fails to reproduce `b`.
fn solve(a: &Mat<f64>, b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    let rhs = Mat::from_fn(n, 1, |i, _| b[i]);

    let lu = a.as_ref().full_piv_lu();
    let x = lu.solve(&rhs);
    let coeffs: Vec<f64> = (0..n).map(|i| x[(i, 0)]).collect();
    if coeffs.iter().any(|c| !c.is_finite()) {
        return None;
    }

    let scale = b.iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));
    let reproduces = (0..n).all(|i| {
        let row: f64 = (0..n).map(|j| a[(i, j)] * coeffs[j]).sum();
        (row - b[i]).abs() <= 1e-9 * scale
    });
    reproduces.then_some(coeffs)
}
