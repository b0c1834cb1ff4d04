use std::ops::{Add, Div, Mul, Sub};

use itertools::Itertools;

impl<T> CumulativeTrapezoid for T where T: ?Sized {}

pub trait CumulativeTrapezoid {
    /// Integrate `(x, y)` points with the trapezoidal rule.
    ///
    /// Yields the running integral for every point, starting with zero at the first one.
    fn cumulative_trapezoid<X, Y, A>(self) -> impl Iterator<Item = A>
    where
        Self: Iterator<Item = (X, Y)> + Sized,
        X: Copy + Sub,
        Y: Copy + Add<Output = Y> + Mul<<X as Sub>::Output, Output = A>,
        A: Copy + Default + Add<Output = A> + Div<f64, Output = A>,
    {
        let mut points = self.peekable();
        let head = points.peek().map(|_| A::default());
        head.into_iter().chain(points.tuple_windows().scan(
            A::default(),
            |total, ((from_x, from_y), (to_x, to_y))| {
                *total = *total + (from_y + to_y) * (to_x - from_x) / 2.0;
                Some(*total)
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::quantity::{energy::WattHours, power::Watts, time::Hours};

    #[test]
    fn test_cumulative_trapezoid() {
        let series =
            vec![(Hours(0.0), Watts(0.0)), (Hours(1.0), Watts(100.0)), (Hours(3.0), Watts(100.0))];
        let integral = series.into_iter().cumulative_trapezoid().collect_vec();
        assert_eq!(integral, vec![WattHours(0.0), WattHours(50.0), WattHours(250.0)]);
    }

    #[test]
    fn test_repeated_abscissa_adds_nothing() {
        let series =
            vec![(Hours(0.0), Watts(10.0)), (Hours(1.0), Watts(10.0)), (Hours(1.0), Watts(-5.0))];
        let integral: Vec<WattHours> = series.into_iter().cumulative_trapezoid().collect();
        assert_eq!(integral, vec![WattHours(0.0), WattHours(10.0), WattHours(10.0)]);
    }

    #[test]
    fn test_empty() {
        let integral: Vec<WattHours> =
            Vec::<(Hours, Watts)>::new().into_iter().cumulative_trapezoid().collect();
        assert!(integral.is_empty());
    }
}
