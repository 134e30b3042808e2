//! Psychrometric property functions for moist air at standard pressure.

/// Standard atmospheric pressure (Pa).
const ATMOSPHERIC_PRESSURE_PA: f64 = 101_325.0;

/// Saturation water vapor pressure (Pa) via the Antoine correlation.
pub fn saturation_pressure_pa(temp_c: f64) -> f64 {
    611.0 * (17.27 * temp_c / (temp_c + 237.3)).exp()
}

/// Absolute humidity (kg water / kg dry air) from dry-bulb temperature and
/// relative humidity in percent.
pub fn absolute_humidity(temp_c: f64, rh_pct: f64) -> f64 {
    let p_sat = saturation_pressure_pa(temp_c);
    let p_v = p_sat * rh_pct / 100.0;
    0.622 * p_v / (ATMOSPHERIC_PRESSURE_PA - p_v)
}

/// Moist-air specific enthalpy (kJ/kg dry air).
pub fn enthalpy(temp_c: f64, abs_humidity: f64) -> f64 {
    1.005 * temp_c + abs_humidity * (2501.0 + 1.846 * temp_c)
}
