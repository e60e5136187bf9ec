//! Valid ranges and optimal bands for every soil reading.
//!
//! Two kinds of interval live here:
//!
//! - **Limits** ([`Limits`]) are hard clamps. Every mutation ends by
//!   clamping the touched field, so a reading can never leave its limit.
//! - **Optimal bands** ([`optimal_band`]) are the ranges the crop thrives
//!   in. They drive the indicator panel and achievements, never clamping.
//!
//! Temperature has two limits: actions and natural jitter keep it within
//! [`ACTION_TEMPERATURE`], environmental events (night frost, sun) may push
//! it as far as [`EVENT_TEMPERATURE`].

use tuberfield_types::{OptimalBand, SoilParameter, SoilState};

/// Closed interval a reading is clamped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    /// Lowest allowed value.
    pub min: f64,
    /// Highest allowed value.
    pub max: f64,
}

impl Limits {
    /// Create limits from their edges.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `value` into the limits.
    pub fn clamp(self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Whether `value` is inside the limits.
    pub const fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// pH limits.
pub const PH: Limits = Limits::new(4.0, 8.0);
/// Soil humidity limits (%).
pub const HUMIDITY: Limits = Limits::new(0.0, 100.0);
/// Temperature limits applied by actions, weather shifts, and jitter (°C).
pub const ACTION_TEMPERATURE: Limits = Limits::new(10.0, 30.0);
/// Temperature limits applied by environmental events (°C).
pub const EVENT_TEMPERATURE: Limits = Limits::new(5.0, 35.0);
/// Nitrogen limits (kg/ha).
pub const NITROGEN: Limits = Limits::new(0.0, 150.0);
/// Phosphorus limits (kg/ha).
pub const PHOSPHORUS: Limits = Limits::new(0.0, 120.0);
/// Potassium limits (kg/ha).
pub const POTASSIUM: Limits = Limits::new(0.0, 180.0);
/// Organic matter limits (%).
pub const ORGANIC_MATTER: Limits = Limits::new(0.0, 6.0);
/// Electrical conductivity limits (dS/m).
pub const ELECTRICAL_CONDUCTIVITY: Limits = Limits::new(0.0, 3.0);
/// Water reservoir limits.
pub const WATER_LEVEL: Limits = Limits::new(0.0, 100.0);
/// Plant health limits.
pub const PLANT_HEALTH: Limits = Limits::new(0.0, 100.0);

/// The overall limits of a soil parameter across every operation.
pub const fn limits(parameter: SoilParameter) -> Limits {
    match parameter {
        SoilParameter::Ph => PH,
        SoilParameter::Humidity => HUMIDITY,
        SoilParameter::Temperature => EVENT_TEMPERATURE,
        SoilParameter::Nitrogen => NITROGEN,
        SoilParameter::Phosphorus => PHOSPHORUS,
        SoilParameter::Potassium => POTASSIUM,
        SoilParameter::OrganicMatter => ORGANIC_MATTER,
        SoilParameter::ElectricalConductivity => ELECTRICAL_CONDUCTIVITY,
    }
}

/// The range a parameter should stay in for healthy potatoes.
pub const fn optimal_band(parameter: SoilParameter) -> OptimalBand {
    match parameter {
        SoilParameter::Ph => OptimalBand::new(5.5, 6.5),
        SoilParameter::Humidity => OptimalBand::new(60.0, 80.0),
        SoilParameter::Temperature => OptimalBand::new(15.0, 22.0),
        SoilParameter::Nitrogen => OptimalBand::new(80.0, 120.0),
        SoilParameter::Phosphorus => OptimalBand::new(60.0, 90.0),
        SoilParameter::Potassium => OptimalBand::new(100.0, 150.0),
        SoilParameter::OrganicMatter => OptimalBand::new(3.0, 5.0),
        SoilParameter::ElectricalConductivity => OptimalBand::new(1.0, 2.0),
    }
}

/// Optimal band for every parameter, in indicator-panel order.
pub const OPTIMAL_BANDS: [(SoilParameter, OptimalBand); 8] = [
    (SoilParameter::Ph, optimal_band(SoilParameter::Ph)),
    (SoilParameter::Humidity, optimal_band(SoilParameter::Humidity)),
    (SoilParameter::Temperature, optimal_band(SoilParameter::Temperature)),
    (SoilParameter::Nitrogen, optimal_band(SoilParameter::Nitrogen)),
    (SoilParameter::Phosphorus, optimal_band(SoilParameter::Phosphorus)),
    (SoilParameter::Potassium, optimal_band(SoilParameter::Potassium)),
    (SoilParameter::OrganicMatter, optimal_band(SoilParameter::OrganicMatter)),
    (
        SoilParameter::ElectricalConductivity,
        optimal_band(SoilParameter::ElectricalConductivity),
    ),
];

/// Read one parameter out of a soil snapshot.
pub const fn reading(soil: &SoilState, parameter: SoilParameter) -> f64 {
    match parameter {
        SoilParameter::Ph => soil.ph,
        SoilParameter::Humidity => soil.humidity,
        SoilParameter::Temperature => soil.temperature,
        SoilParameter::Nitrogen => soil.nitrogen,
        SoilParameter::Phosphorus => soil.phosphorus,
        SoilParameter::Potassium => soil.potassium,
        SoilParameter::OrganicMatter => soil.organic_matter,
        SoilParameter::ElectricalConductivity => soil.electrical_conductivity,
    }
}

/// Whether every soil field lies within its overall limits.
pub fn soil_within_limits(soil: &SoilState) -> bool {
    SoilParameter::ALL
        .into_iter()
        .all(|parameter| limits(parameter).contains(reading(soil, parameter)))
}
