//! Enumeration types for the Tuberfield simulation.
//!
//! Growth stages, player actions, weather shifts, achievements, and the
//! status/rating enums shown on the dashboard. All enums serialize as
//! `snake_case` strings, which are also the identifiers the driver uses.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Growth stages
// ---------------------------------------------------------------------------

/// One phase of the fixed six-phase potato growth sequence.
///
/// The variants are ordered: the derived `Ord` follows the growth sequence,
/// and [`GrowthStage::index`] gives the 0-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GrowthStage {
    /// Degraded soil is prepared with organic matter and pH correction.
    Preparation,
    /// Seed potatoes go into the prepared soil.
    Planting,
    /// Foliage develops; irrigation and balanced fertilization matter.
    Vegetative,
    /// Tubers form underground; moisture and nutrients must stay steady.
    Tuber,
    /// Tubers reach full size.
    Maturation,
    /// Terminal stage: the crop is lifted and evaluated.
    Harvest,
}

impl GrowthStage {
    /// Every stage in growth order.
    pub const ALL: [Self; 6] = [
        Self::Preparation,
        Self::Planting,
        Self::Vegetative,
        Self::Tuber,
        Self::Maturation,
        Self::Harvest,
    ];

    /// 0-based position in the growth sequence.
    pub const fn index(self) -> u8 {
        match self {
            Self::Preparation => 0,
            Self::Planting => 1,
            Self::Vegetative => 2,
            Self::Tuber => 3,
            Self::Maturation => 4,
            Self::Harvest => 5,
        }
    }

    /// Look up a stage by its 0-based index.
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Preparation),
            1 => Some(Self::Planting),
            2 => Some(Self::Vegetative),
            3 => Some(Self::Tuber),
            4 => Some(Self::Maturation),
            5 => Some(Self::Harvest),
            _ => None,
        }
    }

    /// Stable string identifier.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Preparation => "preparation",
            Self::Planting => "planting",
            Self::Vegetative => "vegetative",
            Self::Tuber => "tuber",
            Self::Maturation => "maturation",
            Self::Harvest => "harvest",
        }
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Preparation => "Soil Preparation",
            Self::Planting => "Planting Phase",
            Self::Vegetative => "Vegetative Growth",
            Self::Tuber => "Tuber Formation",
            Self::Maturation => "Maturation",
            Self::Harvest => "Harvest",
        }
    }

    /// Number of simulated days the stage lasts.
    pub const fn duration_days(self) -> u32 {
        match self {
            Self::Preparation => 15,
            Self::Planting => 10,
            Self::Vegetative => 30,
            Self::Tuber => 35,
            Self::Maturation => 20,
            Self::Harvest => 5,
        }
    }

    /// Short description of what the player should focus on.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Preparation => {
                "Prepare degraded soil with organic matter and adjust pH levels for optimal potato growth."
            }
            Self::Planting => {
                "Plant seed potatoes at the correct depth and spacing in the prepared soil."
            }
            Self::Vegetative => {
                "Monitor foliage development, ensure proper irrigation, and apply balanced fertilization."
            }
            Self::Tuber => {
                "Critical phase where potatoes develop underground. Maintain consistent moisture and nutrients."
            }
            Self::Maturation => {
                "Final stage where tubers reach full size. Reduce watering as harvest approaches."
            }
            Self::Harvest => {
                "Carefully harvest mature potatoes and evaluate the success of your sustainable practices."
            }
        }
    }

    /// The following stage, or `None` for the terminal [`GrowthStage::Harvest`].
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Preparation => Some(Self::Planting),
            Self::Planting => Some(Self::Vegetative),
            Self::Vegetative => Some(Self::Tuber),
            Self::Tuber => Some(Self::Maturation),
            Self::Maturation => Some(Self::Harvest),
            Self::Harvest => None,
        }
    }

    /// Whether this is the last stage of the sequence.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Harvest)
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A discrete agricultural action the player can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Action {
    /// Irrigate: raises the water reservoir and soil humidity.
    Water,
    /// Nitrogen fertilizer; slightly acidifies the soil.
    FertilizeN,
    /// Phosphorus fertilizer.
    FertilizeP,
    /// Potassium fertilizer.
    FertilizeK,
    /// Organic compost: organic matter plus a little of every nutrient.
    Compost,
    /// Lime/sulfur correction pulling pH toward 6.0.
    AdjustPh,
    /// Mulch or shade to cool the soil.
    CoolSoil,
    /// Cover to warm the soil.
    WarmSoil,
}

impl Action {
    /// Every action, in the order the action panel lists them.
    pub const ALL: [Self; 8] = [
        Self::Water,
        Self::FertilizeN,
        Self::FertilizeP,
        Self::FertilizeK,
        Self::Compost,
        Self::AdjustPh,
        Self::CoolSoil,
        Self::WarmSoil,
    ];

    /// The identifier the driver sends for this action.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::FertilizeN => "fertilize_n",
            Self::FertilizeP => "fertilize_p",
            Self::FertilizeK => "fertilize_k",
            Self::Compost => "compost",
            Self::AdjustPh => "adjust_ph",
            Self::CoolSoil => "cool_soil",
            Self::WarmSoil => "warm_soil",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// An action identifier that does not name any [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {0}")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.id() == s)
            .ok_or_else(|| ParseActionError(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Weather shifts
// ---------------------------------------------------------------------------

/// A sudden weather change that may accompany any player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum WeatherShift {
    /// Temperature +3, humidity -5.
    Hot,
    /// Temperature -3.
    Cold,
    /// Temperature -1, humidity +10.
    Rainy,
}

impl WeatherShift {
    /// All shifts; each is equally likely once a shift is triggered.
    pub const ALL: [Self; 3] = [Self::Hot, Self::Cold, Self::Rainy];
}

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

/// An informational milestone unlocked by reaching good soil conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Achievement {
    /// Organic matter reached 3%.
    SoilMaster,
    /// Water reservoir inside the 60-80 band.
    WaterWise,
    /// N, P and K all at their "good" thresholds at once.
    BalancedNutrients,
    /// Plant health at or above 80.
    HealthyPlant,
    /// pH inside the 5.5-6.5 band.
    PhPerfect,
}

impl Achievement {
    /// Every achievement, in display order.
    pub const ALL: [Self; 5] = [
        Self::SoilMaster,
        Self::WaterWise,
        Self::BalancedNutrients,
        Self::HealthyPlant,
        Self::PhPerfect,
    ];

    /// Display title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::SoilMaster => "Soil Master",
            Self::WaterWise => "Water Wise",
            Self::BalancedNutrients => "Nutrient Balance",
            Self::HealthyPlant => "Thriving Plant",
            Self::PhPerfect => "pH Perfect",
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard enums
// ---------------------------------------------------------------------------

/// Final evaluation of a session, available once the crop reaches harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum HarvestRating {
    /// Score >= 800 and health >= 85.
    Exemplary,
    /// Score >= 600 and health >= 70.
    NearMiss,
    /// Score >= 400 and health >= 50.
    Mediocre,
    /// Anything below.
    Failed,
}

/// How far a soil reading is from its optimal band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ParameterStatus {
    /// Inside the optimal band.
    Optimal,
    /// Outside the band but within 30% of its edges.
    Warning,
    /// Far outside the band.
    Critical,
}

/// One measured soil parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SoilParameter {
    /// Acidity.
    Ph,
    /// Soil moisture percentage.
    Humidity,
    /// Soil temperature in degrees Celsius.
    Temperature,
    /// Nitrogen in kg/ha.
    Nitrogen,
    /// Phosphorus in kg/ha.
    Phosphorus,
    /// Potassium in kg/ha.
    Potassium,
    /// Organic matter percentage.
    OrganicMatter,
    /// Electrical conductivity in dS/m.
    ElectricalConductivity,
}

impl SoilParameter {
    /// Every parameter, in indicator-panel order.
    pub const ALL: [Self; 8] = [
        Self::Ph,
        Self::Humidity,
        Self::Temperature,
        Self::Nitrogen,
        Self::Phosphorus,
        Self::Potassium,
        Self::OrganicMatter,
        Self::ElectricalConductivity,
    ];
}
