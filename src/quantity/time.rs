quantity!(Seconds, suffix: "s", precision: 0);
quantity!(Hours, suffix: "h", precision: 2);

impl From<Seconds> for Hours {
    fn from(seconds: Seconds) -> Self {
        Self(seconds.0 / 3600.0)
    }
}

impl From<Hours> for Seconds {
    fn from(hours: Hours) -> Self {
        Self(hours.0 * 3600.0)
    }
}
