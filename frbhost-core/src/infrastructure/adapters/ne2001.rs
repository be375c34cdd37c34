// frbhost-core/src/infrastructure/adapters/ne2001.rs

use tracing::{debug, instrument};

use crate::domain::frb::Galactic;
use crate::domain::ports::dispersion::DispersionModel;
use crate::error::HostError;
use crate::infrastructure::adapters::process::run_tool;
use crate::infrastructure::error::InfrastructureError;

pub const DEFAULT_NE2001: &str = "ne2001";

/// NE2001 electron-density model behind an external command.
///
/// The command is called as `<cmd> <l> <b> <distance_kpc>` and must print the
/// dispersion measure (pc / cm3) on stdout; the first number printed is used.
#[derive(Debug, Clone)]
pub struct Ne2001Command {
    pub command: String,
}

impl Default for Ne2001Command {
    fn default() -> Self {
        Self {
            command: DEFAULT_NE2001.to_string(),
        }
    }
}

fn first_number(stdout: &str) -> Option<f64> {
    stdout
        .split(|c: char| c.is_whitespace() || c == ',' || c == '=')
        .find_map(|tok| tok.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

impl DispersionModel for Ne2001Command {
    #[instrument(skip(self))]
    fn dm_ism(&self, direction: Galactic, distance_kpc: f64) -> Result<f64, HostError> {
        let args = vec![
            format!("{:.6}", direction.l),
            format!("{:.6}", direction.b),
            format!("{distance_kpc}"),
        ];
        let output = run_tool(&self.command, &args, None)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(stdout = %stdout.trim(), "NE2001 output");

        first_number(&stdout).ok_or_else(|| {
            InfrastructureError::CommandFailed {
                command: self.command.clone(),
                reason: format!("no dispersion measure in output '{}'", stdout.trim()),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("DM = 198.5 pc/cm3"), Some(198.5));
        assert_eq!(first_number("  42\n"), Some(42.0));
        assert_eq!(first_number("nothing here"), None);
    }

    #[test]
    fn test_reads_stdout() -> Result<()> {
        let model = Ne2001Command {
            command: "echo 188.4".into(),
        };
        let dm = model.dm_ism(Galactic { l: 174.95, b: -0.22 }, 100.0)?;
        assert!((dm - 188.4).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_silent_command_is_an_error() {
        let model = Ne2001Command {
            command: "true".into(),
        };
        assert!(model.dm_ism(Galactic { l: 0.0, b: 0.0 }, 100.0).is_err());
    }
}
