// frbhost-core/src/domain/frb/record.rs

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::error::DomainError;
use crate::domain::frb::coords::SkyCoord;
use crate::domain::frb::name::{FRB_PREFIX, parse_frb_name};

pub const DM_UNIT: &str = "pc / cm3";
pub const RM_UNIT: &str = "rad / m2";
pub const DEFAULT_COSMOLOGY: &str = "Planck18";

/// A value with its unit, serialised as `{"unit": ..., "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub unit: String,
    pub value: f64,
}

impl Quantity {
    pub fn dm(value: f64) -> Self {
        Self {
            unit: DM_UNIT.to_string(),
            value,
        }
    }

    pub fn rm(value: f64) -> Self {
        Self {
            unit: RM_UNIT.to_string(),
            value,
        }
    }
}

/// One row of the FRB base table, as read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct FrbRow {
    pub name: String,
    pub ra: String,
    pub dec: String,
    pub dm: Option<f64>,
    pub dm_err: Option<f64>,
    pub z: Option<f64>,
    pub repeater: bool,
    pub rm: Option<f64>,
    pub rm_err: Option<f64>,
}

/// Published properties of a single fast radio burst.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[validate(schema(function = "validate_complete", skip_on_field_errors = false))]
pub struct FrbRecord {
    #[serde(rename = "FRB")]
    #[validate(length(min = 4))]
    pub name: String,
    #[validate(range(min = 0.0, max = 360.0))]
    pub ra: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub dec: f64,
    #[serde(rename = "DM")]
    pub dm: Quantity,
    #[serde(rename = "DM_err", skip_serializing_if = "Option::is_none")]
    pub dm_err: Option<Quantity>,
    #[serde(rename = "DMISM")]
    #[validate(required)]
    pub dm_ism: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    pub repeater: bool,
    #[serde(rename = "RM", skip_serializing_if = "Option::is_none")]
    pub rm: Option<Quantity>,
    #[serde(rename = "RM_err", skip_serializing_if = "Option::is_none")]
    pub rm_err: Option<Quantity>,
    pub cosmo: String,
}

fn validate_complete(record: &FrbRecord) -> Result<(), ValidationError> {
    if parse_frb_name(&record.name, FRB_PREFIX).ok().as_deref() != Some(record.name.as_str()) {
        return Err(ValidationError::new("frb_name_not_canonical"));
    }
    if !(record.dm.value.is_finite() && record.dm.value > 0.0) {
        return Err(ValidationError::new("dm_not_positive"));
    }
    if let Some(ism) = &record.dm_ism
        && !(ism.value.is_finite() && ism.value >= 0.0)
    {
        return Err(ValidationError::new("dm_ism_invalid"));
    }
    if let Some(z) = record.z
        && z < 0.0
    {
        return Err(ValidationError::new("negative_redshift"));
    }
    Ok(())
}

impl FrbRecord {
    /// Build a record from a base-table row. Non-finite redshifts become `None`.
    pub fn from_row(row: &FrbRow) -> Result<Self, DomainError> {
        let name = parse_frb_name(&row.name, FRB_PREFIX)?;
        let coord = SkyCoord::parse(&row.ra, &row.dec)?;
        let dm = row.dm.filter(|v| v.is_finite()).unwrap_or(f64::NAN);
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());

        Ok(Self {
            name,
            ra: coord.ra,
            dec: coord.dec,
            dm: Quantity::dm(dm),
            dm_err: finite(row.dm_err).map(Quantity::dm),
            dm_ism: None,
            z: finite(row.z),
            repeater: row.repeater,
            rm: finite(row.rm).map(Quantity::rm),
            rm_err: finite(row.rm_err).map(Quantity::rm),
            cosmo: DEFAULT_COSMOLOGY.to_string(),
        })
    }

    pub fn coord(&self) -> SkyCoord {
        SkyCoord {
            ra: self.ra,
            dec: self.dec,
        }
    }

    /// Attach the Milky Way ISM contribution to the DM.
    pub fn with_dm_ism(self, value: f64) -> Self {
        Self {
            dm_ism: Some(Quantity::dm(value)),
            ..self
        }
    }

    /// Completeness predicate run before a record is written.
    pub fn vet(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::IncompleteRecord {
                name: self.name.clone(),
                details: e.to_string(),
            })
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name)
    }
}
