// frbhost-core/src/domain/frb/coords.rs

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// ICRS (J2000) -> Galactic rotation matrix.
const ICRS_TO_GALACTIC: [[f64; 3]; 3] = [
    [-0.054_875_560_416_215_4, -0.873_437_090_234_885, -0.483_835_015_548_713_2],
    [0.494_109_427_875_583_7, -0.444_829_629_960_011_2, 0.746_982_244_497_218_9],
    [-0.867_666_149_019_004_7, -0.198_076_373_431_201_5, 0.455_983_776_175_066_9],
];

/// Equatorial position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyCoord {
    pub ra: f64,
    pub dec: f64,
}

/// Galactic longitude / latitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Galactic {
    pub l: f64,
    pub b: f64,
}

impl SkyCoord {
    pub fn from_degrees(ra: f64, dec: f64) -> Result<Self, DomainError> {
        if !(ra.is_finite() && (0.0..360.0).contains(&ra)) {
            return Err(invalid(&ra.to_string(), "RA must lie in [0, 360)"));
        }
        if !(dec.is_finite() && (-90.0..=90.0).contains(&dec)) {
            return Err(invalid(&dec.to_string(), "Dec must lie in [-90, 90]"));
        }
        Ok(Self { ra, dec })
    }

    /// Parse RA / Dec given either in degrees or sexagesimal
    /// (`05:31:58.70`, `+33 08 52.5`, `05h31m58.70s`).
    pub fn parse(ra: &str, dec: &str) -> Result<Self, DomainError> {
        let ra_deg = if is_sexagesimal(ra) {
            sexagesimal(ra)? * 15.0
        } else {
            decimal(ra)?
        };
        let dec_deg = if is_sexagesimal(dec) {
            sexagesimal(dec)?
        } else {
            decimal(dec)?
        };
        Self::from_degrees(ra_deg, dec_deg)
    }

    pub fn to_galactic(&self) -> Galactic {
        let (ra, dec) = (self.ra.to_radians(), self.dec.to_radians());
        let v = [dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin()];
        let g: Vec<f64> = ICRS_TO_GALACTIC
            .iter()
            .map(|row| row[0] * v[0] + row[1] * v[1] + row[2] * v[2])
            .collect();

        let l = g[1].atan2(g[0]).to_degrees().rem_euclid(360.0);
        let b = g[2].clamp(-1.0, 1.0).asin().to_degrees();
        Galactic { l, b }
    }
}

fn invalid(value: &str, reason: &str) -> DomainError {
    DomainError::InvalidCoordinate {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn is_sexagesimal(s: &str) -> bool {
    let s = s.trim();
    s.contains(':') || s.contains('h') || s.contains('d') || s.split_whitespace().count() > 1
}

fn decimal(s: &str) -> Result<f64, DomainError> {
    s.trim()
        .parse::<f64>()
        .map_err(|e| invalid(s, &e.to_string()))
}

/// `[+-]A:B:C` -> A + B/60 + C/3600, sign applied to the whole value.
fn sexagesimal(s: &str) -> Result<f64, DomainError> {
    let trimmed = s.trim();
    let negative = trimmed.starts_with('-');
    let parts: Vec<&str> = trimmed
        .trim_start_matches(['+', '-'])
        .split(|c: char| c == ':' || c.is_whitespace() || "hdms'\"".contains(c))
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() || parts.len() > 3 {
        return Err(invalid(s, "expected 1 to 3 sexagesimal fields"));
    }

    let mut value = 0.0;
    for (i, part) in parts.iter().enumerate() {
        let field: f64 = part.parse().map_err(|_| invalid(s, "non-numeric field"))?;
        if i > 0 && !(0.0..60.0).contains(&field) {
            return Err(invalid(s, "minutes and seconds must lie in [0, 60)"));
        }
        value += field / 60f64.powi(i as i32);
    }
    Ok(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_parse_sexagesimal_and_degrees() -> Result<()> {
        let c = SkyCoord::parse("05:31:58.70", "+33:08:52.5")?;
        assert!((c.ra - 82.994_583).abs() < 1e-5);
        assert!((c.dec - 33.147_917).abs() < 1e-5);

        let c = SkyCoord::parse("82.9946", "-0.5")?;
        assert!((c.ra - 82.9946).abs() < 1e-12);

        let c = SkyCoord::parse("05h31m58.70s", "-00 30 00")?;
        assert!((c.dec + 0.5).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        assert!(SkyCoord::from_degrees(361.0, 0.0).is_err());
        assert!(SkyCoord::from_degrees(10.0, 91.0).is_err());
        assert!(SkyCoord::parse("12:61:00", "0").is_err());
        assert!(SkyCoord::parse("abc", "0").is_err());
    }

    #[test]
    fn test_galactic_pole_and_frb121102() -> Result<()> {
        let pole = SkyCoord::from_degrees(192.859_48, 27.128_25)?.to_galactic();
        assert!((pole.b - 90.0).abs() < 1e-3);

        let frb = SkyCoord::from_degrees(82.994_58, 33.147_92)?.to_galactic();
        assert!((frb.l - 174.95).abs() < 0.01);
        assert!((frb.b + 0.22).abs() < 0.01);
        Ok(())
    }
}
