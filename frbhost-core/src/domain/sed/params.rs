// frbhost-core/src/domain/sed/params.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One value of a CIGALE module parameter.
///
/// Lists are grids: CIGALE fits every combination of list entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<ParamValue>),
}

/// Parameter set of a single SED module, keyed by parameter name.
pub type ModuleParams = BTreeMap<String, ParamValue>;

impl ParamValue {
    pub fn floats(values: &[f64]) -> Self {
        Self::List(values.iter().copied().map(Self::Float).collect())
    }

    pub fn text(value: &str) -> Self {
        Self::Text(value.to_string())
    }

    /// Validator expression CIGALE expects in `pcigale.ini.spec`.
    pub fn spec_type(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean()",
            Self::Int(_) => "integer()",
            Self::Float(_) => "float()",
            Self::Text(_) => "string()",
            Self::List(items) if items.iter().all(|i| matches!(i, Self::Text(_))) => {
                "cigale_string_list()"
            }
            Self::List(_) => "cigale_list()",
        }
    }

    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Python-style float rendering: integral values keep a trailing `.0`.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{}", format_float(*x)),
            Self::Text(s) => write!(f, "{s}"),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}
