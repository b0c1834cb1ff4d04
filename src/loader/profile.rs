use std::{fs::File, io::Read, path::Path};

use crate::{core::profile::LoadProfile, prelude::*};

const HEADERS: [&str; 2] = ["time (s)", "power (W)"];

pub fn read_path(path: &Path) -> Result<LoadProfile> {
    let file = File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
    read(file)
}

/// Read the `time (s),power (W)` table.
#[instrument(skip_all)]
pub fn read(reader: impl Read) -> Result<LoadProfile> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers().context("failed to read the header")?;
    ensure!(headers.iter().eq(HEADERS), "expected the header `{}`", HEADERS.join(","));
    let samples = reader
        .deserialize()
        .collect::<Result<Vec<(f64, f64)>, _>>()
        .context("failed to read the samples")?;
    let profile = LoadProfile::try_from_samples(samples)?;
    debug!(n_points = profile.points().len(), "read the load profile");
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::{power::Watts, time::Seconds};

    #[test]
    fn test_read() {
        let profile = read("time (s),power (W)\n0,100\n60,-50.5\n".as_bytes()).unwrap();
        let points = profile.points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].time, Seconds(60.0));
        assert_eq!(points[1].value, Watts(-50.5));
    }

    #[test]
    fn test_single_row() {
        assert!(read("time (s),power (W)\n0,100\n".as_bytes()).is_err());
    }

    #[test]
    fn test_wrong_header() {
        assert!(read("t,P\n0,100\n60,100\n".as_bytes()).is_err());
    }

    #[test]
    fn test_extra_column() {
        assert!(read("time (s),power (W),x\n0,100,1\n60,100,1\n".as_bytes()).is_err());
    }

    #[test]
    fn test_non_increasing_time() {
        assert!(read("time (s),power (W)\n0,100\n0,100\n".as_bytes()).is_err());
    }
}
