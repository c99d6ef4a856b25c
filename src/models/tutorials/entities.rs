use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 教程分类
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutorial.ts")]
pub enum TutorialCategory {
    #[serde(rename = "Digital Art")]
    DigitalArt,
    #[serde(rename = "Quick Sketch")]
    QuickSketch,
    Sketching,
    Color,
}

impl TutorialCategory {
    pub const ALL: [TutorialCategory; 4] = [
        TutorialCategory::DigitalArt,
        TutorialCategory::QuickSketch,
        TutorialCategory::Sketching,
        TutorialCategory::Color,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TutorialCategory::DigitalArt => "Digital Art",
            TutorialCategory::QuickSketch => "Quick Sketch",
            TutorialCategory::Sketching => "Sketching",
            TutorialCategory::Color => "Color",
        }
    }
}

impl std::fmt::Display for TutorialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TutorialCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Invalid tutorial category: {s}"))
    }
}

// 教程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutorial.ts")]
pub struct Tutorial {
    pub id: i64,
    pub title: String,
    pub category: TutorialCategory,
    pub video_url: String,
    pub order_index: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
