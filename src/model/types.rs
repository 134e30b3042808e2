//! Building, equipment, and operating-condition types plus the per-month
//! simulation record.
//!
//! Serialized field names keep their unit-suffixed `kW`/`kWh` capitalization
//! so API payloads and CSV exports share one schema.

use serde::{Deserialize, Serialize};

/// Floor and envelope specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorSpec {
    /// Floor area (m²).
    pub floor_area: f64,
    /// Ceiling height (m).
    pub ceiling_height: f64,
    /// Exterior wall U-value (W/m²K).
    pub wall_u_value: f64,
    /// Window area (m²).
    pub window_area: f64,
    /// Window U-value (W/m²K).
    pub window_u_value: f64,
    /// Solar heat gain coefficient (dimensionless).
    pub solar_heat_gain_coef: f64,
}

/// HVAC and internal-gain equipment specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSpec {
    /// Lighting power density (W/m²).
    pub lighting_power_density: f64,
    /// Office (OA) equipment power density (W/m²).
    pub oa_equipment_power_density: f64,
    /// Central air-handling unit capacity (kW).
    pub central_ahu_capacity: f64,
    /// Central AHU fan power draw (kW).
    pub central_ahu_fan_power: f64,
    /// Central chiller capacity (kW).
    pub central_chiller_capacity: f64,
    /// Central chiller coefficient of performance.
    pub central_chiller_cop: f64,
    /// Local AC unit capacity (kW).
    pub local_ac_capacity: f64,
    /// Local AC coefficient of performance.
    pub local_ac_cop: f64,
    /// Local AC fan power draw (kW).
    pub local_ac_fan_power: f64,
}

/// Operating conditions for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCondition {
    /// Calendar month (1–12).
    pub month: u32,
    /// Mean outdoor temperature (°C).
    pub outdoor_temp: f64,
    /// Mean outdoor relative humidity (%).
    pub outdoor_humidity: f64,
    /// Indoor temperature setpoint (°C).
    pub indoor_temp_setpoint: f64,
    /// Indoor relative humidity setpoint (%).
    pub indoor_humidity_setpoint: f64,
    /// Supply air temperature setpoint (°C).
    pub supply_air_temp: f64,
    /// Occupant count.
    pub occupancy: u32,
    /// Office usage rate (0.0–1.0).
    pub occupancy_rate: f64,
    /// Monthly operating hours.
    pub operation_hours: f64,
}

/// Complete simulation record for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyResult {
    /// Calendar month (1–12).
    pub month: u32,
    /// Outdoor temperature (°C).
    pub outdoor_temp: f64,
    /// Indoor temperature setpoint (°C).
    pub indoor_temp: f64,
    /// Occupant count.
    pub occupancy: u32,
    /// Office usage rate.
    pub occupancy_rate: f64,

    // Load breakdown (kW)
    #[serde(rename = "load_wall_kW")]
    pub load_wall_kw: f64,
    #[serde(rename = "load_window_kW")]
    pub load_window_kw: f64,
    #[serde(rename = "load_solar_kW")]
    pub load_solar_kw: f64,
    #[serde(rename = "load_lighting_kW")]
    pub load_lighting_kw: f64,
    #[serde(rename = "load_oa_equipment_kW")]
    pub load_oa_equipment_kw: f64,
    #[serde(rename = "load_person_sensible_kW")]
    pub load_person_sensible_kw: f64,
    #[serde(rename = "load_person_latent_kW")]
    pub load_person_latent_kw: f64,
    #[serde(rename = "load_outdoor_air_latent_kW")]
    pub load_outdoor_air_latent_kw: f64,

    // Load totals (kW)
    #[serde(rename = "sensible_load_kW")]
    pub sensible_load_kw: f64,
    #[serde(rename = "latent_load_kW")]
    pub latent_load_kw: f64,
    #[serde(rename = "total_load_kW")]
    pub total_load_kw: f64,
    /// Sensible heat factor: sensible load / total load.
    pub shf: f64,

    // Energy consumption (kWh/month)
    #[serde(rename = "central_ahu_fan_kWh")]
    pub central_ahu_fan_kwh: f64,
    #[serde(rename = "central_chiller_kWh")]
    pub central_chiller_kwh: f64,
    #[serde(rename = "central_total_kWh")]
    pub central_total_kwh: f64,
    #[serde(rename = "local_fan_kWh")]
    pub local_fan_kwh: f64,
    #[serde(rename = "local_compressor_kWh")]
    pub local_compressor_kwh: f64,
    #[serde(rename = "local_total_kWh")]
    pub local_total_kwh: f64,
    #[serde(rename = "lighting_kWh")]
    pub lighting_kwh: f64,
    #[serde(rename = "oa_equipment_kWh")]
    pub oa_equipment_kwh: f64,

    // Psychrometric state points (kJ/kg dry air)
    pub outdoor_enthalpy: f64,
    pub indoor_enthalpy: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_condition(month: u32) -> MonthlyCondition {
        MonthlyCondition {
            month,
            outdoor_temp: 20.0,
            outdoor_humidity: 60.0,
            indoor_temp_setpoint: 24.0,
            indoor_humidity_setpoint: 50.0,
            supply_air_temp: 18.0,
            occupancy: 50,
            occupancy_rate: 0.8,
            operation_hours: 200.0,
        }
    }

    #[test]
    fn condition_round_trips_through_json() {
        let cond = make_condition(7);
        let json = serde_json::to_string(&cond).unwrap();
        let back: MonthlyCondition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cond);
    }

    #[test]
    fn result_serializes_unit_suffixed_names() {
        let result = MonthlyResult {
            month: 1,
            outdoor_temp: 5.0,
            indoor_temp: 22.0,
            occupancy: 50,
            occupancy_rate: 0.85,
            load_wall_kw: 1.0,
            load_window_kw: 1.0,
            load_solar_kw: 1.0,
            load_lighting_kw: 1.0,
            load_oa_equipment_kw: 1.0,
            load_person_sensible_kw: 1.0,
            load_person_latent_kw: 1.0,
            load_outdoor_air_latent_kw: 1.0,
            sensible_load_kw: 6.0,
            latent_load_kw: 2.0,
            total_load_kw: 8.0,
            shf: 0.75,
            central_ahu_fan_kwh: 100.0,
            central_chiller_kwh: 200.0,
            central_total_kwh: 300.0,
            local_fan_kwh: 50.0,
            local_compressor_kwh: 150.0,
            local_total_kwh: 200.0,
            lighting_kwh: 80.0,
            oa_equipment_kwh: 90.0,
            outdoor_enthalpy: 40.0,
            indoor_enthalpy: 45.0,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("central_total_kWh").is_some());
        assert!(json.get("load_wall_kW").is_some());
        assert!(json.get("central_total_kwh").is_none());
    }
}
