//! Session score derived from soil, plant health, and growth stage.
//!
//! The score is not cumulative: it is recomputed from scratch on every
//! mutation, so it can drop after poor play.

use tuberfield_types::{GrowthStage, SoilState};

/// Points awarded per completed growth stage.
pub const STAGE_POINTS: f64 = 50.0;

/// Points awarded per percent of organic matter.
pub const ORGANIC_MATTER_POINTS: f64 = 15.0;

/// Compute the score, floored to an integer.
#[allow(clippy::cast_possible_truncation)]
pub fn calculate_score(soil: &SoilState, plant_health: f64, stage: GrowthStage) -> i64 {
    let mut score = health_term(plant_health);
    score += soil.organic_matter * ORGANIC_MATTER_POINTS;
    score += f64::from(stage.index()) * STAGE_POINTS;
    score += ph_term(soil.ph);
    score += nutrient_term(soil);
    score += temperature_term(soil.temperature);
    score.floor() as i64
}

fn health_term(plant_health: f64) -> f64 {
    let multiplier = if plant_health >= 90.0 {
        3.0
    } else if plant_health >= 70.0 {
        2.0
    } else if plant_health >= 50.0 {
        1.5
    } else {
        1.0
    };
    plant_health * multiplier
}

fn ph_term(ph: f64) -> f64 {
    if (5.8..=6.2).contains(&ph) {
        40.0
    } else if (5.5..=6.5).contains(&ph) {
        20.0
    } else if (5.0..=7.0).contains(&ph) {
        5.0
    } else {
        -10.0
    }
}

fn nutrient_term(soil: &SoilState) -> f64 {
    let meets = |n: f64, p: f64, k: f64| {
        soil.nitrogen >= n && soil.phosphorus >= p && soil.potassium >= k
    };
    if meets(90.0, 70.0, 120.0) {
        50.0
    } else if meets(80.0, 60.0, 100.0) {
        25.0
    } else if meets(60.0, 40.0, 80.0) {
        10.0
    } else {
        0.0
    }
}

fn temperature_term(temperature: f64) -> f64 {
    if (16.0..=20.0).contains(&temperature) {
        15.0
    } else if !(12.0..=25.0).contains(&temperature) {
        -15.0
    } else {
        0.0
    }
}
