//! Annual simulation driver: one `MonthlyResult` per operating condition.

use serde::Serialize;

use super::hvac::{central_system_energy, local_system_energy};
use super::loads::{latent_loads, sensible_loads};
use super::psychro;
use super::types::{EquipmentSpec, FloorSpec, MonthlyCondition, MonthlyResult};

/// Building energy model: the deterministic simulation oracle.
///
/// Owns the specification and produces twelve monthly records per run.
/// Evaluation is pure arithmetic over the inputs, so identical
/// specifications always yield identical results.
#[derive(Debug, Clone)]
pub struct BuildingModel {
    floor: FloorSpec,
    equipment: EquipmentSpec,
    conditions: Vec<MonthlyCondition>,
}

/// Annual aggregates across all simulated months.
#[derive(Debug, Clone, Serialize)]
pub struct AnnualSummary {
    #[serde(rename = "annual_central_total_kWh")]
    pub annual_central_total_kwh: f64,
    #[serde(rename = "annual_local_total_kWh")]
    pub annual_local_total_kwh: f64,
    #[serde(rename = "annual_total_load_kWh")]
    pub annual_total_load_kwh: f64,
    #[serde(rename = "average_monthly_load_kW")]
    pub average_monthly_load_kw: f64,
}

impl BuildingModel {
    pub fn new(
        floor: FloorSpec,
        equipment: EquipmentSpec,
        conditions: Vec<MonthlyCondition>,
    ) -> Self {
        Self {
            floor,
            equipment,
            conditions,
        }
    }

    /// Runs the full year and returns one record per input condition,
    /// in input order.
    pub fn simulate_year(&self) -> Vec<MonthlyResult> {
        self.conditions.iter().map(|c| self.simulate_month(c)).collect()
    }

    fn simulate_month(&self, condition: &MonthlyCondition) -> MonthlyResult {
        let sensible = sensible_loads(&self.floor, &self.equipment, condition);
        let latent = latent_loads(condition);
        let total_load_kw = sensible.total_kw + latent.total_kw;

        let central = central_system_energy(&self.equipment, total_load_kw, condition);
        let local = local_system_energy(&self.equipment, total_load_kw, condition);

        let lighting_kwh = self.equipment.lighting_power_density
            * self.floor.floor_area
            * condition.occupancy_rate
            * condition.operation_hours
            / 1000.0;
        let oa_equipment_kwh = self.equipment.oa_equipment_power_density
            * self.floor.floor_area
            * condition.occupancy_rate
            * condition.operation_hours
            / 1000.0;

        let outdoor_enthalpy = psychro::enthalpy(
            condition.outdoor_temp,
            psychro::absolute_humidity(condition.outdoor_temp, condition.outdoor_humidity),
        );
        let indoor_enthalpy = psychro::enthalpy(
            condition.indoor_temp_setpoint,
            psychro::absolute_humidity(
                condition.indoor_temp_setpoint,
                condition.indoor_humidity_setpoint,
            ),
        );

        let shf = if total_load_kw != 0.0 {
            sensible.total_kw / total_load_kw
        } else {
            0.0
        };

        MonthlyResult {
            month: condition.month,
            outdoor_temp: condition.outdoor_temp,
            indoor_temp: condition.indoor_temp_setpoint,
            occupancy: condition.occupancy,
            occupancy_rate: condition.occupancy_rate,
            load_wall_kw: sensible.wall_kw,
            load_window_kw: sensible.window_kw,
            load_solar_kw: sensible.solar_kw,
            load_lighting_kw: sensible.lighting_kw,
            load_oa_equipment_kw: sensible.oa_equipment_kw,
            load_person_sensible_kw: sensible.person_kw,
            load_person_latent_kw: latent.person_kw,
            load_outdoor_air_latent_kw: latent.outdoor_air_kw,
            sensible_load_kw: sensible.total_kw,
            latent_load_kw: latent.total_kw,
            total_load_kw,
            shf,
            central_ahu_fan_kwh: central.ahu_fan_kwh,
            central_chiller_kwh: central.chiller_kwh,
            central_total_kwh: central.total_kwh,
            local_fan_kwh: local.fan_kwh,
            local_compressor_kwh: local.compressor_kwh,
            local_total_kwh: local.total_kwh,
            lighting_kwh,
            oa_equipment_kwh,
            outdoor_enthalpy,
            indoor_enthalpy,
        }
    }

    /// Computes the annual summary from a completed run.
    pub fn summarize(&self, results: &[MonthlyResult]) -> AnnualSummary {
        let total_operation_hours: f64 =
            self.conditions.iter().map(|c| c.operation_hours).sum();
        let total_load_sum: f64 = results.iter().map(|r| r.total_load_kw).sum();
        let n = results.len().max(1) as f64;

        AnnualSummary {
            annual_central_total_kwh: results.iter().map(|r| r.central_total_kwh).sum(),
            annual_local_total_kwh: results.iter().map(|r| r.local_total_kwh).sum(),
            annual_total_load_kwh: total_load_sum * total_operation_hours / 12.0,
            average_monthly_load_kw: total_load_sum / n,
        }
    }
}
