// CalibrationTarget - one of the nine clickable screen points
//
// A target counts the clicks it receives. Before it is complete each click
// raises its opacity so the user sees progress; the completing click turns
// it yellow and disables it.

use serde::{Deserialize, Serialize};

/// Number of calibration targets on screen
pub const TARGET_COUNT: usize = 9;

/// Index of the center target, hidden until the other eight are complete
pub const CENTER_TARGET: usize = 4;

/// Clicks needed before a target counts as calibrated
pub const DEFAULT_CLICKS_PER_TARGET: u32 = 5;

/// Opacity of a target that has not been clicked yet
pub const INITIAL_OPACITY: f32 = 0.2;

/// Fill color of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetColor {
    /// Not yet calibrated
    White,
    /// Calibrated, no longer clickable
    Yellow,
}

impl TargetColor {
    /// CSS color name for web views
    pub fn css_name(&self) -> &'static str {
        match self {
            TargetColor::White => "white",
            TargetColor::Yellow => "yellow",
        }
    }
}

/// Everything a view needs to draw a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetVisual {
    pub visible: bool,
    pub opacity: f32,
    pub color: TargetColor,
    pub disabled: bool,
}

impl TargetVisual {
    pub fn initial(visible: bool) -> Self {
        Self {
            visible,
            opacity: INITIAL_OPACITY,
            color: TargetColor::White,
            disabled: false,
        }
    }
}

/// Result of registering one click on a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetClick {
    /// Count increased but the target is not complete yet
    Progress { clicks: u32, opacity: f32 },
    /// This click completed the target
    Completed { clicks: u32 },
    /// Target was already complete; nothing changed
    Ignored,
}

/// Opacity shown after `clicks` clicks
///
/// Rises linearly from the initial 0.2 to 1.0 on the last click before
/// completion. With five clicks per target: 0.4, 0.6, 0.8, 1.0.
pub fn progress_opacity(clicks: u32, clicks_per_target: u32) -> f32 {
    if clicks_per_target <= 1 {
        return 1.0;
    }
    let steps = (clicks_per_target - 1) as f32;
    let fraction = (clicks as f32 / steps).min(1.0);
    INITIAL_OPACITY + (1.0 - INITIAL_OPACITY) * fraction
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTarget {
    id: usize,
    clicks: u32,
    visual: TargetVisual,
}

impl CalibrationTarget {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            clicks: 0,
            visual: TargetVisual::initial(id != CENTER_TARGET),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn visual(&self) -> &TargetVisual {
        &self.visual
    }

    pub fn is_center(&self) -> bool {
        self.id == CENTER_TARGET
    }

    pub fn is_visible(&self) -> bool {
        self.visual.visible
    }

    /// Completion is tracked through the disabled flag set on the completing click
    pub fn is_complete(&self) -> bool {
        self.visual.disabled
    }

    /// Register a click
    ///
    /// # Arguments
    /// * `clicks_per_target` - Threshold at which the target completes
    pub fn register_click(&mut self, clicks_per_target: u32) -> TargetClick {
        if self.is_complete() {
            return TargetClick::Ignored;
        }

        self.clicks += 1;

        if self.clicks >= clicks_per_target {
            self.visual.color = TargetColor::Yellow;
            self.visual.disabled = true;
            return TargetClick::Completed {
                clicks: self.clicks,
            };
        }

        let opacity = progress_opacity(self.clicks, clicks_per_target);
        self.visual.opacity = opacity;
        TargetClick::Progress {
            clicks: self.clicks,
            opacity,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visual.visible = visible;
    }

    /// Back to zero clicks and the initial style
    pub fn reset(&mut self) {
        *self = Self::new(self.id);
    }
}
