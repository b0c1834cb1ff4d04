quantity!(Percentage, suffix: "%", precision: 1);

impl Percentage {
    #[must_use]
    pub const fn to_proportion(self) -> f64 {
        0.01 * self.0
    }

    #[must_use]
    pub const fn from_proportion(proportion: f64) -> Self {
        Self(100.0 * proportion)
    }
}
