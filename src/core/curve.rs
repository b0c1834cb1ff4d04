use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurveError {
    #[error("at least 2 points are required, got {0}")]
    TooFewPoints(usize),

    #[error("point #{0} is not finite")]
    NonFinite(usize),

    #[error("abscissa of point #{0} does not strictly increase")]
    NotIncreasing(usize),
}

/// Piecewise-linear function defined by its breakpoints.
///
/// Outside of the breakpoint domain the function continues along the slope of the
/// nearest segment, it is never clamped.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Curve {
    pub fn try_new(points: impl IntoIterator<Item = (f64, f64)>) -> Result<Self, CurveError> {
        let (xs, ys): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
        if xs.len() < 2 {
            return Err(CurveError::TooFewPoints(xs.len()));
        }
        if let Some(index) = xs.iter().zip(&ys).position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(CurveError::NonFinite(index));
        }
        if let Some((index, _)) =
            xs.iter().tuple_windows().enumerate().find(|(_, (left, right))| left >= right)
        {
            return Err(CurveError::NotIncreasing(index + 1));
        }
        Ok(Self { xs, ys })
    }

    /// Build the curve from points in arbitrary order.
    pub fn try_from_unsorted(
        points: impl IntoIterator<Item = (f64, f64)>,
    ) -> Result<Self, CurveError> {
        Self::try_new(points.into_iter().sorted_by(|(lhs, _), (rhs, _)| lhs.total_cmp(rhs)))
    }

    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        // Breakpoints are returned verbatim, without going through the segment arithmetic:
        if let Ok(index) = self.xs.binary_search_by(|probe| probe.total_cmp(&x)) {
            return self.ys[index];
        }
        let segment = self.xs.partition_point(|probe| *probe <= x).clamp(1, self.xs.len() - 1) - 1;
        let (x0, x1) = (self.xs[segment], self.xs[segment + 1]);
        let (y0, y1) = (self.ys[segment], self.ys[segment + 1]);
        y0 + (x - x0) * (y1 - y0) / (x1 - x0)
    }
}
