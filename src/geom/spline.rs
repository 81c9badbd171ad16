//! One-dimensional interpolants used to resample feature traces.

/// Piecewise interpolant through `(x_i, y_i)` knots.
///
/// With `monotone` set, the interpolant is a cubic Hermite spline whose knot
/// slopes are limited with the Fritsch-Butland weighted harmonic mean, so it
/// never overshoots the data between knots. Without it, the interpolant is
/// piecewise linear. Outside the knot range both variants extrapolate linearly
/// with the end slope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonotoneSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    slopes: Vec<f64>,
    monotone: bool,
}

impl MonotoneSpline {
    /// Builds the interpolant.
    ///
    /// `xs` must be strictly increasing and of the same length as `ys`. This is
    /// guaranteed by [`Path`](super::Path), the only producer of knots.
    #[must_use]
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, monotone: bool) -> Self {
        debug_assert_eq!(xs.len(), ys.len(), "xs and ys must have equal length");
        debug_assert!(
            xs.windows(2).all(|w| w[1] > w[0]),
            "knots must be strictly increasing"
        );

        let n = xs.len();
        let secants: Vec<f64> = (0..n.saturating_sub(1))
            .map(|i| (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]))
            .collect();

        let mut slopes = vec![0.0; n];
        if n >= 2 {
            slopes[0] = secants[0];
            slopes[n - 1] = secants[n - 2];
            for i in 1..n - 1 {
                let (d0, d1) = (secants[i - 1], secants[i]);
                if d0 * d1 <= 0.0 {
                    // Local extremum; a flat tangent keeps the curve within the data.
                    slopes[i] = 0.0;
                } else {
                    let h0 = xs[i] - xs[i - 1];
                    let h1 = xs[i + 1] - xs[i];
                    let w1 = 2.0 * h1 + h0;
                    let w2 = h1 + 2.0 * h0;
                    slopes[i] = (w1 + w2) / (w1 / d0 + w2 / d1);
                }
            }
        }

        Self {
            xs,
            ys,
            slopes,
            monotone,
        }
    }

    #[must_use]
    pub fn is_monotone(&self) -> bool {
        self.monotone
    }

    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.xs
    }

    /// Evaluates the interpolant at `x`.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        match n {
            0 => return 0.0,
            1 => return self.ys[0],
            _ => {}
        }

        if x <= self.xs[0] {
            return self.ys[0] + self.end_slope(0) * (x - self.xs[0]);
        }
        if x >= self.xs[n - 1] {
            return self.ys[n - 1] + self.end_slope(n - 1) * (x - self.xs[n - 1]);
        }

        let i = self
            .xs
            .partition_point(|&knot| knot <= x)
            .saturating_sub(1)
            .min(n - 2);
        let h = self.xs[i + 1] - self.xs[i];
        let t = (x - self.xs[i]) / h;

        if !self.monotone {
            return self.ys[i] + t * (self.ys[i + 1] - self.ys[i]);
        }

        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * self.ys[i] + h10 * h * self.slopes[i] + h01 * self.ys[i + 1] + h11 * h * self.slopes[i + 1]
    }

    fn end_slope(&self, index: usize) -> f64 {
        // The end slopes equal the end secants in both modes.
        self.slopes[index]
    }
}
