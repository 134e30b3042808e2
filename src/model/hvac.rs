//! HVAC system energy models: central (all-building) and local (per-zone).

use super::types::{EquipmentSpec, MonthlyCondition};

/// Central system monthly energy breakdown (kWh).
#[derive(Debug, Clone)]
pub struct CentralEnergy {
    pub ahu_fan_kwh: f64,
    pub chiller_kwh: f64,
    pub total_kwh: f64,
}

/// Local system monthly energy breakdown (kWh).
#[derive(Debug, Clone)]
pub struct LocalEnergy {
    pub fan_kwh: f64,
    pub compressor_kwh: f64,
    pub total_kwh: f64,
}

/// Central system energy for one month.
///
/// Heating load (negative total) is treated with the same COP as cooling,
/// so the chiller term always works on the load magnitude.
pub fn central_system_energy(
    equipment: &EquipmentSpec,
    total_load_kw: f64,
    condition: &MonthlyCondition,
) -> CentralEnergy {
    let ahu_fan_kwh = equipment.central_ahu_fan_power * condition.operation_hours;
    let chiller_kwh =
        total_load_kw.abs() * condition.operation_hours / equipment.central_chiller_cop;
    CentralEnergy {
        ahu_fan_kwh,
        chiller_kwh,
        total_kwh: ahu_fan_kwh + chiller_kwh,
    }
}

/// Local system energy for one month. Same COP convention as the central system.
pub fn local_system_energy(
    equipment: &EquipmentSpec,
    total_load_kw: f64,
    condition: &MonthlyCondition,
) -> LocalEnergy {
    let fan_kwh = equipment.local_ac_fan_power * condition.operation_hours;
    let compressor_kwh = total_load_kw.abs() * condition.operation_hours / equipment.local_ac_cop;
    LocalEnergy {
        fan_kwh,
        compressor_kwh,
        total_kwh: fan_kwh + compressor_kwh,
    }
}
