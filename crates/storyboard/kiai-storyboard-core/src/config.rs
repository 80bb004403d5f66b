use serde::{Deserialize, Serialize};

/// Settings controlling how a storyboard is written out.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Write command times with their fractional part instead of rounding
    /// them to whole milliseconds.
    pub use_float_for_time: bool,
    /// Write move coordinates with their fractional part instead of rounding
    /// them to whole pixels.
    pub use_float_for_move: bool,
    /// Allow splitting sprites whose command cost exceeds their split
    /// threshold into several output sprites.
    pub optimise_sprites: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            use_float_for_time: false,
            use_float_for_move: true,
            optimise_sprites: true,
        }
    }
}
