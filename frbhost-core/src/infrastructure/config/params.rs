// frbhost-core/src/infrastructure/config/params.rs

// SED module override files:
//
//   dale2014:
//     fracAGN: [0.0, 0.1]
//     alpha: 2.0

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::domain::sed::ModuleParams;
use crate::infrastructure::error::InfrastructureError;

pub type ModuleOverrides = BTreeMap<String, ModuleParams>;

pub fn parse_module_params(content: &str) -> Result<ModuleOverrides, InfrastructureError> {
    if content.trim().is_empty() {
        return Ok(ModuleOverrides::new());
    }
    Ok(serde_yaml::from_str(content)?)
}

pub fn load_module_params(path: &Path) -> Result<ModuleOverrides, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    let overrides = parse_module_params(&content)?;
    info!(
        path = %path.display(),
        modules = ?overrides.keys().collect::<Vec<_>>(),
        "SED parameter overrides loaded"
    );
    Ok(overrides)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::sed::ParamValue;
    use anyhow::Result;

    #[test]
    fn test_parse_overrides() -> Result<()> {
        let yaml = r#"
sfhdelayed:
  tau_main: [10.0, 100.0]
  normalise: true
bc03:
  imf: 0
dustatt_calzleit:
  filters: "B_B90 & V_B90"
"#;
        let overrides = parse_module_params(yaml)?;
        assert_eq!(overrides.len(), 3);
        assert_eq!(
            overrides["sfhdelayed"]["tau_main"],
            ParamValue::floats(&[10.0, 100.0])
        );
        assert_eq!(overrides["sfhdelayed"]["normalise"], ParamValue::Bool(true));
        assert_eq!(overrides["bc03"]["imf"], ParamValue::Int(0));
        assert_eq!(
            overrides["dustatt_calzleit"]["filters"],
            ParamValue::text("B_B90 & V_B90")
        );
        Ok(())
    }

    #[test]
    fn test_empty_file() -> Result<()> {
        assert!(parse_module_params("\n")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_not_a_map() {
        assert!(parse_module_params("- a\n- b\n").is_err());
    }
}
