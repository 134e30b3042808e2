//! Sensible and latent heat-load breakdown for one month of operation.

use super::psychro;
use super::types::{EquipmentSpec, FloorSpec, MonthlyCondition};

/// Occupant sensible heat output (W/person).
const PERSON_SENSIBLE_HEAT_W: f64 = 60.0;
/// Occupant latent heat output (W/person).
const PERSON_LATENT_HEAT_W: f64 = 40.0;
/// Outside-air ventilation rate (m³/h/person).
const OUTSIDE_AIR_RATE_M3H: f64 = 30.0;
/// Air density (kg/m³).
const AIR_DENSITY_KG_M3: f64 = 1.2;
/// Latent heat of vaporization of water (kJ/kg).
const LATENT_HEAT_EVAP_KJ_KG: f64 = 2501.0;
/// Exterior wall area assumed as this fraction of floor area.
const WALL_AREA_RATIO: f64 = 0.4;

/// Mean monthly solar irradiance on glazing, Tokyo reference values (W/m²).
/// Indexed by calendar month 1–12.
const SOLAR_RADIATION_W_M2: [f64; 12] = [
    120.0, 150.0, 180.0, 200.0, 220.0, 200.0, 220.0, 200.0, 180.0, 150.0, 120.0, 100.0,
];

/// Fallback irradiance for an out-of-range month index (W/m²).
const SOLAR_RADIATION_DEFAULT_W_M2: f64 = 150.0;

/// Monthly solar irradiance lookup (W/m²).
pub fn solar_radiation_w_m2(month: u32) -> f64 {
    match month {
        1..=12 => SOLAR_RADIATION_W_M2[(month - 1) as usize],
        _ => SOLAR_RADIATION_DEFAULT_W_M2,
    }
}

/// Sensible load components (kW). Positive means heat gain into the space.
#[derive(Debug, Clone)]
pub struct SensibleLoads {
    pub wall_kw: f64,
    pub window_kw: f64,
    pub solar_kw: f64,
    pub lighting_kw: f64,
    pub oa_equipment_kw: f64,
    pub person_kw: f64,
    pub total_kw: f64,
}

/// Latent load components (kW).
#[derive(Debug, Clone)]
pub struct LatentLoads {
    pub person_kw: f64,
    pub outdoor_air_kw: f64,
    pub total_kw: f64,
}

/// Computes the sensible heat-load breakdown for one month.
pub fn sensible_loads(
    floor: &FloorSpec,
    equipment: &EquipmentSpec,
    condition: &MonthlyCondition,
) -> SensibleLoads {
    let temp_diff = condition.outdoor_temp - condition.indoor_temp_setpoint;

    let wall_area = floor.floor_area * WALL_AREA_RATIO;
    let wall_kw = floor.wall_u_value * wall_area * temp_diff / 1000.0;

    let window_kw = floor.window_u_value * floor.window_area * temp_diff / 1000.0;

    let solar_kw =
        floor.window_area * floor.solar_heat_gain_coef * solar_radiation_w_m2(condition.month)
            / 1000.0;

    let lighting_kw =
        equipment.lighting_power_density * floor.floor_area * condition.occupancy_rate / 1000.0;

    let oa_equipment_kw =
        equipment.oa_equipment_power_density * floor.floor_area * condition.occupancy_rate / 1000.0;

    let person_kw = PERSON_SENSIBLE_HEAT_W * f64::from(condition.occupancy) / 1000.0;

    let total_kw = wall_kw + window_kw + solar_kw + lighting_kw + oa_equipment_kw + person_kw;

    SensibleLoads {
        wall_kw,
        window_kw,
        solar_kw,
        lighting_kw,
        oa_equipment_kw,
        person_kw,
        total_kw,
    }
}

/// Computes the latent heat-load breakdown for one month.
///
/// The outside-air term is clamped at zero: dehumidification demand only,
/// no credit taken for dry outdoor air.
pub fn latent_loads(condition: &MonthlyCondition) -> LatentLoads {
    let person_kw = PERSON_LATENT_HEAT_W * f64::from(condition.occupancy) / 1000.0;

    let outdoor_w = psychro::absolute_humidity(condition.outdoor_temp, condition.outdoor_humidity);
    let indoor_w = psychro::absolute_humidity(
        condition.indoor_temp_setpoint,
        condition.indoor_humidity_setpoint,
    );

    let air_volume_m3h = OUTSIDE_AIR_RATE_M3H * f64::from(condition.occupancy);
    let moisture_diff = outdoor_w - indoor_w;
    let outdoor_air_kw =
        (air_volume_m3h * AIR_DENSITY_KG_M3 * moisture_diff * LATENT_HEAT_EVAP_KJ_KG / 3600.0)
            .max(0.0);

    LatentLoads {
        person_kw,
        outdoor_air_kw,
        total_kw: person_kw + outdoor_air_kw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn office_floor() -> FloorSpec {
        FloorSpec {
            floor_area: 1000.0,
            ceiling_height: 3.0,
            wall_u_value: 0.5,
            window_area: 150.0,
            window_u_value: 2.0,
            solar_heat_gain_coef: 0.5,
        }
    }

    fn office_equipment() -> EquipmentSpec {
        EquipmentSpec {
            lighting_power_density: 10.0,
            oa_equipment_power_density: 15.0,
            central_ahu_capacity: 120.0,
            central_ahu_fan_power: 10.0,
            central_chiller_capacity: 350.0,
            central_chiller_cop: 4.0,
            local_ac_capacity: 60.0,
            local_ac_cop: 3.0,
            local_ac_fan_power: 6.0,
        }
    }

    fn condition(month: u32, outdoor_temp: f64, indoor_setpoint: f64) -> MonthlyCondition {
        MonthlyCondition {
            month,
            outdoor_temp,
            outdoor_humidity: 60.0,
            indoor_temp_setpoint: indoor_setpoint,
            indoor_humidity_setpoint: 50.0,
            supply_air_temp: 18.0,
            occupancy: 50,
            occupancy_rate: 0.8,
            operation_hours: 200.0,
        }
    }

    #[test]
    fn solar_radiation_table_covers_all_months() {
        for month in 1..=12 {
            assert!(solar_radiation_w_m2(month) > 0.0);
        }
        assert_eq!(solar_radiation_w_m2(0), SOLAR_RADIATION_DEFAULT_W_M2);
        assert_eq!(solar_radiation_w_m2(13), SOLAR_RADIATION_DEFAULT_W_M2);
    }

    #[test]
    fn wall_load_sign_follows_temperature_difference() {
        let floor = office_floor();
        let equipment = office_equipment();

        // Summer: outdoor above setpoint, transmission is a gain
        let summer = sensible_loads(&floor, &equipment, &condition(8, 30.0, 26.0));
        assert!(summer.wall_kw > 0.0);
        assert!(summer.window_kw > 0.0);

        // Winter: outdoor below setpoint, transmission is a loss
        let winter = sensible_loads(&floor, &equipment, &condition(1, 5.0, 22.0));
        assert!(winter.wall_kw < 0.0);
        assert!(winter.window_kw < 0.0);
    }

    #[test]
    fn sensible_total_is_sum_of_components() {
        let loads = sensible_loads(&office_floor(), &office_equipment(), &condition(6, 22.0, 26.0));
        let sum = loads.wall_kw
            + loads.window_kw
            + loads.solar_kw
            + loads.lighting_kw
            + loads.oa_equipment_kw
            + loads.person_kw;
        assert!((loads.total_kw - sum).abs() < 1e-12);
    }

    #[test]
    fn person_sensible_load_scales_with_occupancy() {
        let mut cond = condition(6, 22.0, 26.0);
        cond.occupancy = 100;
        let loads = sensible_loads(&office_floor(), &office_equipment(), &cond);
        // 60 W/person * 100 persons = 6 kW
        assert!((loads.person_kw - 6.0).abs() < 1e-12);
    }

    #[test]
    fn latent_outdoor_air_clamped_in_dry_winter() {
        // Cold dry outdoor air: indoor humidity exceeds outdoor, no credit taken
        let mut cond = condition(1, 2.0, 22.0);
        cond.outdoor_humidity = 30.0;
        let loads = latent_loads(&cond);
        assert_eq!(loads.outdoor_air_kw, 0.0);
        assert!((loads.total_kw - loads.person_kw).abs() < 1e-12);
    }

    #[test]
    fn latent_outdoor_air_positive_in_humid_summer() {
        let mut cond = condition(7, 30.0, 26.0);
        cond.outdoor_humidity = 80.0;
        let loads = latent_loads(&cond);
        assert!(loads.outdoor_air_kw > 0.0);
    }
}
