//! Building configuration: aggregate spec, presets, file loading, validation.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{EquipmentSpec, FloorSpec, MonthlyCondition};

/// Complete building configuration: envelope, equipment, and twelve monthly
/// operating conditions.
///
/// Load from JSON or TOML with [`BuildingConfig::from_file`], or use a
/// built-in preset. The calibration engine clones this per candidate and
/// never mutates the caller's copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildingConfig {
    pub floor_spec: FloorSpec,
    pub equipment_spec: EquipmentSpec,
    pub monthly_conditions: Vec<MonthlyCondition>,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"floor_spec.floor_area"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Tokyo-reference monthly conditions shared by both presets.
fn default_monthly_conditions() -> Vec<MonthlyCondition> {
    let rows: [(u32, f64, f64, f64, f64, f64, f64); 12] = [
        // (month, outdoor_temp, outdoor_rh, setpoint, setpoint_rh, supply_air, hours)
        (1, 5.2, 52.0, 22.0, 45.0, 20.0, 200.0),
        (2, 5.7, 53.0, 22.0, 45.0, 20.0, 180.0),
        (3, 8.7, 55.0, 22.0, 50.0, 20.0, 200.0),
        (4, 13.9, 60.0, 24.0, 50.0, 18.0, 200.0),
        (5, 18.2, 65.0, 24.0, 55.0, 18.0, 200.0),
        (6, 21.4, 75.0, 26.0, 60.0, 16.0, 200.0),
        (7, 25.0, 78.0, 26.0, 60.0, 16.0, 200.0),
        (8, 26.4, 77.0, 26.0, 60.0, 16.0, 180.0),
        (9, 22.8, 75.0, 26.0, 60.0, 18.0, 200.0),
        (10, 17.5, 68.0, 24.0, 55.0, 18.0, 200.0),
        (11, 12.1, 60.0, 22.0, 50.0, 20.0, 200.0),
        (12, 7.6, 56.0, 22.0, 45.0, 20.0, 180.0),
    ];
    let occupancy_rate = [0.85, 0.85, 0.85, 0.80, 0.80, 0.75, 0.70, 0.60, 0.75, 0.85, 0.85, 0.80];

    rows.iter()
        .zip(occupancy_rate)
        .map(
            |(&(month, outdoor_temp, outdoor_humidity, setpoint, setpoint_rh, supply, hours), rate)| {
                MonthlyCondition {
                    month,
                    outdoor_temp,
                    outdoor_humidity,
                    indoor_temp_setpoint: setpoint,
                    indoor_humidity_setpoint: setpoint_rh,
                    supply_air_temp: supply,
                    occupancy: 50,
                    occupancy_rate: rate,
                    operation_hours: hours,
                }
            },
        )
        .collect()
}

impl BuildingConfig {
    /// Modern office preset: well-insulated envelope, high-efficiency plant,
    /// LED lighting.
    pub fn modern_office() -> Self {
        Self {
            floor_spec: FloorSpec {
                floor_area: 1000.0,
                ceiling_height: 3.0,
                wall_u_value: 0.3,
                window_area: 150.0,
                window_u_value: 1.5,
                solar_heat_gain_coef: 0.4,
            },
            equipment_spec: EquipmentSpec {
                lighting_power_density: 8.0,
                oa_equipment_power_density: 12.0,
                central_ahu_capacity: 120.0,
                central_ahu_fan_power: 8.0,
                central_chiller_capacity: 350.0,
                central_chiller_cop: 4.5,
                local_ac_capacity: 60.0,
                local_ac_cop: 4.0,
                local_ac_fan_power: 5.0,
            },
            monthly_conditions: default_monthly_conditions(),
        }
    }

    /// Old office preset: poorly insulated envelope, legacy constant-volume
    /// plant, fluorescent lighting.
    pub fn old_office() -> Self {
        Self {
            floor_spec: FloorSpec {
                floor_area: 1000.0,
                ceiling_height: 3.0,
                wall_u_value: 0.8,
                window_area: 200.0,
                window_u_value: 4.0,
                solar_heat_gain_coef: 0.7,
            },
            equipment_spec: EquipmentSpec {
                lighting_power_density: 15.0,
                oa_equipment_power_density: 20.0,
                central_ahu_capacity: 120.0,
                central_ahu_fan_power: 15.0,
                central_chiller_capacity: 350.0,
                central_chiller_cop: 3.0,
                local_ac_capacity: 60.0,
                local_ac_cop: 2.5,
                local_ac_fan_power: 8.0,
            },
            monthly_conditions: default_monthly_conditions(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["modern", "old"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "modern" => Ok(Self::modern_office()),
            "old" => Ok(Self::old_office()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration file, dispatching on extension: `.toml` is
    /// parsed as TOML, anything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        if path.extension().is_some_and(|ext| ext == "toml") {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the JSON is invalid or has unknown fields.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError {
            field: "json".to_string(),
            message: e.to_string(),
        })
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or has unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let f = &self.floor_spec;

        if f.floor_area <= 0.0 {
            errors.push(ConfigError {
                field: "floor_spec.floor_area".into(),
                message: "must be > 0".into(),
            });
        }
        if f.window_area < 0.0 {
            errors.push(ConfigError {
                field: "floor_spec.window_area".into(),
                message: "must be >= 0".into(),
            });
        }
        if f.wall_u_value <= 0.0 {
            errors.push(ConfigError {
                field: "floor_spec.wall_u_value".into(),
                message: "must be > 0".into(),
            });
        }
        if f.window_u_value <= 0.0 {
            errors.push(ConfigError {
                field: "floor_spec.window_u_value".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&f.solar_heat_gain_coef) {
            errors.push(ConfigError {
                field: "floor_spec.solar_heat_gain_coef".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }

        let e = &self.equipment_spec;
        if e.central_chiller_cop <= 0.0 {
            errors.push(ConfigError {
                field: "equipment_spec.central_chiller_cop".into(),
                message: "must be > 0".into(),
            });
        }
        if e.local_ac_cop <= 0.0 {
            errors.push(ConfigError {
                field: "equipment_spec.local_ac_cop".into(),
                message: "must be > 0".into(),
            });
        }
        if e.lighting_power_density < 0.0 {
            errors.push(ConfigError {
                field: "equipment_spec.lighting_power_density".into(),
                message: "must be >= 0".into(),
            });
        }
        if e.oa_equipment_power_density < 0.0 {
            errors.push(ConfigError {
                field: "equipment_spec.oa_equipment_power_density".into(),
                message: "must be >= 0".into(),
            });
        }

        if self.monthly_conditions.len() != 12 {
            errors.push(ConfigError {
                field: "monthly_conditions".into(),
                message: format!("must have exactly 12 entries, got {}", self.monthly_conditions.len()),
            });
        }
        let mut seen = [false; 13];
        for (i, c) in self.monthly_conditions.iter().enumerate() {
            if !(1..=12).contains(&c.month) {
                errors.push(ConfigError {
                    field: format!("monthly_conditions[{i}].month"),
                    message: format!("must be in 1..=12, got {}", c.month),
                });
                continue;
            }
            if seen[c.month as usize] {
                errors.push(ConfigError {
                    field: format!("monthly_conditions[{i}].month"),
                    message: format!("month {} appears more than once", c.month),
                });
            }
            seen[c.month as usize] = true;
            if !(0.0..=1.0).contains(&c.occupancy_rate) {
                errors.push(ConfigError {
                    field: format!("monthly_conditions[{i}].occupancy_rate"),
                    message: "must be in [0.0, 1.0]".into(),
                });
            }
            if !(0.0..=100.0).contains(&c.outdoor_humidity) {
                errors.push(ConfigError {
                    field: format!("monthly_conditions[{i}].outdoor_humidity"),
                    message: "must be in [0.0, 100.0]".into(),
                });
            }
            if !(0.0..=100.0).contains(&c.indoor_humidity_setpoint) {
                errors.push(ConfigError {
                    field: format!("monthly_conditions[{i}].indoor_humidity_setpoint"),
                    message: "must be in [0.0, 100.0]".into(),
                });
            }
            if c.operation_hours < 0.0 {
                errors.push(ConfigError {
                    field: format!("monthly_conditions[{i}].operation_hours"),
                    message: "must be >= 0".into(),
                });
            }
        }

        errors
    }
}
