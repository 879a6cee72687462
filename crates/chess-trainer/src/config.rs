//! Drill pacing and hint appearance knobs.

use chess_lines::model::MarkupColor;

/// Host-facing configuration for a drill session. The engine itself never
/// sleeps; the host waits this long between `tick` calls so the board can
/// render intermediate positions. Tests run with zero delays.
#[derive(Debug, Clone)]
pub struct DrillConfig {
    pub auto_play_delay_ms: u64,
    pub replay_delay_ms: u64,
    pub hint_square_color: MarkupColor,
    pub hint_arrow_color: MarkupColor,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            auto_play_delay_ms: 600,
            replay_delay_ms: 300,
            hint_square_color: MarkupColor::Yellow,
            hint_arrow_color: MarkupColor::Green,
        }
    }
}
