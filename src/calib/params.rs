//! Calibration parameter resolution.
//!
//! Parameter identifiers form a closed vocabulary. Each name decomposes into
//! a scope (floor spec, equipment spec, or a season) and a typed field, so a
//! candidate value is applied through an enumerated accessor rather than any
//! string-keyed reflection. Seasonal scopes broadcast a setpoint to the fixed
//! month group of that season.

use std::fmt;

use crate::config::BuildingConfig;

use super::CalibError;

/// Season scope for setpoint parameters. Every calendar month belongs to
/// exactly one season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Summer,
    MidSeason,
}

impl Season {
    /// Calendar months covered by this season.
    pub fn months(self) -> &'static [u32] {
        match self {
            Season::Winter => &[11, 12, 1, 2, 3],
            Season::Summer => &[7, 8, 9],
            Season::MidSeason => &[4, 5, 6, 10],
        }
    }

    /// Whether the given calendar month falls in this season.
    pub fn contains(self, month: u32) -> bool {
        self.months().contains(&month)
    }

    fn prefix(self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Summer => "summer",
            Season::MidSeason => "mid",
        }
    }
}

/// Tunable floor-spec fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorField {
    WallUValue,
    WindowUValue,
    SolarHeatGainCoef,
}

/// Tunable equipment-spec fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentField {
    LightingPowerDensity,
    OaEquipmentPowerDensity,
    CentralChillerCop,
    LocalAcCop,
}

/// Tunable per-month setpoint fields, addressed through a season scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetpointField {
    IndoorTempSetpoint,
    IndoorHumiditySetpoint,
    SupplyAirTemp,
}

impl SetpointField {
    fn suffix(self) -> &'static str {
        match self {
            SetpointField::IndoorTempSetpoint => "indoor_temp_setpoint",
            SetpointField::IndoorHumiditySetpoint => "indoor_humidity_setpoint",
            SetpointField::SupplyAirTemp => "supply_air_temp",
        }
    }
}

/// A resolved calibration parameter: scope plus typed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKey {
    Floor(FloorField),
    Equipment(EquipmentField),
    Seasonal(Season, SetpointField),
}

/// All accepted parameter identifiers.
pub const PARAMETER_NAMES: &[&str] = &[
    "floor_spec.wall_u_value",
    "floor_spec.window_u_value",
    "floor_spec.solar_heat_gain_coef",
    "equipment_spec.lighting_power_density",
    "equipment_spec.oa_equipment_power_density",
    "equipment_spec.central_chiller_cop",
    "equipment_spec.local_ac_cop",
    "winter_indoor_temp_setpoint",
    "winter_indoor_humidity_setpoint",
    "winter_supply_air_temp",
    "summer_indoor_temp_setpoint",
    "summer_indoor_humidity_setpoint",
    "summer_supply_air_temp",
    "mid_indoor_temp_setpoint",
    "mid_indoor_humidity_setpoint",
    "mid_supply_air_temp",
];

impl ParamKey {
    /// Resolves a parameter identifier. Any name outside the fixed vocabulary
    /// is rejected before a single simulation runs.
    ///
    /// # Errors
    ///
    /// Returns `CalibError::UnknownParameter` for unrecognized names.
    pub fn parse(name: &str) -> Result<Self, CalibError> {
        let key = match name {
            "floor_spec.wall_u_value" => ParamKey::Floor(FloorField::WallUValue),
            "floor_spec.window_u_value" => ParamKey::Floor(FloorField::WindowUValue),
            "floor_spec.solar_heat_gain_coef" => ParamKey::Floor(FloorField::SolarHeatGainCoef),
            "equipment_spec.lighting_power_density" => {
                ParamKey::Equipment(EquipmentField::LightingPowerDensity)
            }
            "equipment_spec.oa_equipment_power_density" => {
                ParamKey::Equipment(EquipmentField::OaEquipmentPowerDensity)
            }
            "equipment_spec.central_chiller_cop" => {
                ParamKey::Equipment(EquipmentField::CentralChillerCop)
            }
            "equipment_spec.local_ac_cop" => ParamKey::Equipment(EquipmentField::LocalAcCop),
            "winter_indoor_temp_setpoint" => {
                ParamKey::Seasonal(Season::Winter, SetpointField::IndoorTempSetpoint)
            }
            "winter_indoor_humidity_setpoint" => {
                ParamKey::Seasonal(Season::Winter, SetpointField::IndoorHumiditySetpoint)
            }
            "winter_supply_air_temp" => {
                ParamKey::Seasonal(Season::Winter, SetpointField::SupplyAirTemp)
            }
            "summer_indoor_temp_setpoint" => {
                ParamKey::Seasonal(Season::Summer, SetpointField::IndoorTempSetpoint)
            }
            "summer_indoor_humidity_setpoint" => {
                ParamKey::Seasonal(Season::Summer, SetpointField::IndoorHumiditySetpoint)
            }
            "summer_supply_air_temp" => {
                ParamKey::Seasonal(Season::Summer, SetpointField::SupplyAirTemp)
            }
            "mid_indoor_temp_setpoint" => {
                ParamKey::Seasonal(Season::MidSeason, SetpointField::IndoorTempSetpoint)
            }
            "mid_indoor_humidity_setpoint" => {
                ParamKey::Seasonal(Season::MidSeason, SetpointField::IndoorHumiditySetpoint)
            }
            "mid_supply_air_temp" => {
                ParamKey::Seasonal(Season::MidSeason, SetpointField::SupplyAirTemp)
            }
            _ => {
                return Err(CalibError::UnknownParameter {
                    name: name.to_string(),
                });
            }
        };
        Ok(key)
    }

    /// Sets the targeted field(s) to `value` on the given configuration.
    ///
    /// Seasonal keys write the setpoint on every condition whose month falls
    /// in the season's group, leaving other months untouched.
    pub fn apply(self, config: &mut BuildingConfig, value: f64) {
        match self {
            ParamKey::Floor(field) => {
                let f = &mut config.floor_spec;
                match field {
                    FloorField::WallUValue => f.wall_u_value = value,
                    FloorField::WindowUValue => f.window_u_value = value,
                    FloorField::SolarHeatGainCoef => f.solar_heat_gain_coef = value,
                }
            }
            ParamKey::Equipment(field) => {
                let e = &mut config.equipment_spec;
                match field {
                    EquipmentField::LightingPowerDensity => e.lighting_power_density = value,
                    EquipmentField::OaEquipmentPowerDensity => e.oa_equipment_power_density = value,
                    EquipmentField::CentralChillerCop => e.central_chiller_cop = value,
                    EquipmentField::LocalAcCop => e.local_ac_cop = value,
                }
            }
            ParamKey::Seasonal(season, field) => {
                for cond in &mut config.monthly_conditions {
                    if !season.contains(cond.month) {
                        continue;
                    }
                    match field {
                        SetpointField::IndoorTempSetpoint => cond.indoor_temp_setpoint = value,
                        SetpointField::IndoorHumiditySetpoint => {
                            cond.indoor_humidity_setpoint = value
                        }
                        SetpointField::SupplyAirTemp => cond.supply_air_temp = value,
                    }
                }
            }
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKey::Floor(field) => {
                let name = match field {
                    FloorField::WallUValue => "wall_u_value",
                    FloorField::WindowUValue => "window_u_value",
                    FloorField::SolarHeatGainCoef => "solar_heat_gain_coef",
                };
                write!(f, "floor_spec.{name}")
            }
            ParamKey::Equipment(field) => {
                let name = match field {
                    EquipmentField::LightingPowerDensity => "lighting_power_density",
                    EquipmentField::OaEquipmentPowerDensity => "oa_equipment_power_density",
                    EquipmentField::CentralChillerCop => "central_chiller_cop",
                    EquipmentField::LocalAcCop => "local_ac_cop",
                };
                write!(f, "equipment_spec.{name}")
            }
            ParamKey::Seasonal(season, field) => {
                write!(f, "{}_{}", season.prefix(), field.suffix())
            }
        }
    }
}

/// Clones the base configuration and folds each assignment in input order.
/// Later assignments overwrite fields touched by earlier ones; overlap
/// deduplication is the caller's responsibility.
pub fn apply_parameters(base: &BuildingConfig, assignments: &[(ParamKey, f64)]) -> BuildingConfig {
    let mut config = base.clone();
    for &(key, value) in assignments {
        key.apply(&mut config, value);
    }
    config
}
