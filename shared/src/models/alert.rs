//! Alert events raised by the evaluation pass

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::models::crop::CropPreset;

/// The condition that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    RainSustained,
    GddPreWarning,
    GddHarvestReady,
}

/// A single alert occurrence with bilingual notification text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    pub kind: AlertKind,
    pub message: String,
    pub message_ko: String,
    pub triggered_at: DateTime<FixedOffset>,
}

impl AlertEvent {
    pub fn rain_sustained(threshold_minutes: u32, triggered_at: DateTime<FixedOffset>) -> Self {
        Self {
            kind: AlertKind::RainSustained,
            message: format!(
                "Sustained rainfall for {} minutes or more detected. Check your facilities.",
                threshold_minutes
            ),
            message_ko: format!(
                "⚠️ {}분 이상 연속 강우가 감지되었습니다. 시설을 점검하세요.",
                threshold_minutes
            ),
            triggered_at,
        }
    }

    pub fn gdd_pre_warning(
        crop: Option<&CropPreset>,
        threshold: f64,
        triggered_at: DateTime<FixedOffset>,
    ) -> Self {
        let (message, message_ko) = match crop {
            Some(preset) => (
                format!(
                    "Cumulative GDD for {} reached 90% of the {}°C target. Begin harvest preparations!",
                    preset.name_en, threshold
                ),
                format!(
                    "⚠️ {}의 누적 GDD가 {}℃의 90%에 도달했습니다. 수확 준비를 시작하세요!",
                    preset.name_ko, threshold
                ),
            ),
            None => (
                format!(
                    "Cumulative GDD reached 90% of the {}°C target. Begin harvest preparations!",
                    threshold
                ),
                format!(
                    "⚠️ 누적 GDD가 {}℃의 90%에 도달했습니다. 수확 준비를 시작하세요!",
                    threshold
                ),
            ),
        };
        Self {
            kind: AlertKind::GddPreWarning,
            message,
            message_ko,
            triggered_at,
        }
    }

    pub fn gdd_harvest_ready(
        crop: Option<&CropPreset>,
        threshold: f64,
        triggered_at: DateTime<FixedOffset>,
    ) -> Self {
        let (message, message_ko) = match crop {
            Some(preset) => (
                format!(
                    "Cumulative GDD for {} reached the {}°C target. Start harvesting!",
                    preset.name_en, threshold
                ),
                format!(
                    "✅ {}의 누적 GDD가 {}℃에 도달했습니다. 수확을 시작하세요!",
                    preset.name_ko, threshold
                ),
            ),
            None => (
                format!(
                    "Cumulative GDD reached the {}°C target. Start harvesting!",
                    threshold
                ),
                format!("✅ 누적 GDD가 {}℃에 도달했습니다. 수확을 시작하세요!", threshold),
            ),
        };
        Self {
            kind: AlertKind::GddHarvestReady,
            message,
            message_ko,
            triggered_at,
        }
    }
}
