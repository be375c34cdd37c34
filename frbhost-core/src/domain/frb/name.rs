// frbhost-core/src/domain/frb/name.rs

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::error::DomainError;

pub const FRB_PREFIX: &str = "FRB";

fn re_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?i:frb)?[\s_]*(\d{6}|\d{8})([A-Za-z]*)$").unwrap_or_else(|_| {
            // hardcoded pattern, cannot fail
            Regex::new("$^").unwrap_or_else(|_| unreachable!())
        })
    })
}

/// Canonical FRB name: `prefix` + `YYYYMMDD` + upper-case suffix.
///
/// Six-digit dates (`YYMMDD`) are read as 20YY, the convention of the
/// pre-2020 literature (`FRB180916` -> `FRB20180916`).
pub fn parse_frb_name(name: &str, prefix: &str) -> Result<String, DomainError> {
    let caps = re_name()
        .captures(name.trim())
        .ok_or_else(|| DomainError::InvalidFrbName(name.to_string()))?;

    let digits = &caps[1];
    let date = if digits.len() == 6 {
        format!("20{digits}")
    } else {
        digits.to_string()
    };
    let suffix = caps[2].to_uppercase();

    Ok(format!("{prefix}{date}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_canonical_forms() -> Result<()> {
        assert_eq!(parse_frb_name("FRB20180916B", FRB_PREFIX)?, "FRB20180916B");
        assert_eq!(parse_frb_name("20180916B", FRB_PREFIX)?, "FRB20180916B");
        assert_eq!(parse_frb_name("frb180916b", FRB_PREFIX)?, "FRB20180916B");
        assert_eq!(parse_frb_name("FRB 20121102A", "")?, "20121102A");
        assert_eq!(parse_frb_name("20190711", "")?, "20190711");
        Ok(())
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_frb_name("FRB2018", FRB_PREFIX).is_err());
        assert!(parse_frb_name("GRB20180916", FRB_PREFIX).is_err());
        assert!(parse_frb_name("", FRB_PREFIX).is_err());
    }
}
