//! Crop presets for growing-degree-day tracking

use serde::{Deserialize, Serialize};

/// Crops the platform ships presets for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CropKind {
    BokChoy,
    HighlandCabbage,
}

/// Agronomic constants for one crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CropPreset {
    pub key: CropKind,
    pub name_en: &'static str,
    pub name_ko: &'static str,
    /// Base temperature for GDD accumulation (°C).
    pub base_temp_c: f64,
    /// Cumulative GDD at which the crop is considered harvest-ready.
    pub default_gdd_threshold: f64,
    pub optimal_temp_min: f64,
    pub optimal_temp_max: f64,
}

pub const CROP_PRESETS: [CropPreset; 2] = [
    CropPreset {
        key: CropKind::BokChoy,
        name_en: "Bok Choy",
        name_ko: "청경채",
        base_temp_c: 4.4,
        default_gdd_threshold: 400.0,
        optimal_temp_min: 20.0,
        optimal_temp_max: 25.0,
    },
    CropPreset {
        key: CropKind::HighlandCabbage,
        name_en: "Highland Cabbage",
        name_ko: "고랭지배추",
        base_temp_c: 5.0,
        default_gdd_threshold: 900.0,
        optimal_temp_min: 15.0,
        optimal_temp_max: 20.0,
    },
];

pub fn preset_for(kind: CropKind) -> &'static CropPreset {
    match kind {
        CropKind::BokChoy => &CROP_PRESETS[0],
        CropKind::HighlandCabbage => &CROP_PRESETS[1],
    }
}
