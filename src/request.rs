use std::path::Path;

use getset::CopyGetters;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{game_mode::GameMode, mods::Mods};

/// Parameters of the play to evaluate.
#[derive(Clone, Copy, PartialEq, Debug, TypedBuilder, CopyGetters, Serialize, Deserialize)]
#[getset(get_copy = "pub")]
pub struct CalculationRequest {
    map_id: u32,
    #[builder(default)]
    mods: Mods,
    /// `0` lets the calculator assume a full combo.
    #[builder(default)]
    combo: u32,
    #[builder(default)]
    nmiss: u32,
    #[builder(default)]
    mode: Option<GameMode>,
    /// Percentage; `0.0` leaves accuracy up to the calculator.
    #[builder(default = 100.0)]
    acc: f64,
}

impl CalculationRequest {
    /// Builds the calculator's argument vector, program first.
    ///
    /// Returns `None` when the requested mode is one the calculator cannot handle.
    pub fn command_args(&self, calculator: &Path, beatmap: &Path) -> Option<Vec<String>> {
        let mut args = vec![
            calculator.display().to_string(),
            beatmap.display().to_string(),
        ];

        if self.mods != Mods::NOMOD {
            args.push(self.mods.to_string());
        }

        if self.combo > 0 {
            args.push(format!("{}x", self.combo));
        }

        if self.nmiss > 0 {
            args.push(format!("{}xM", self.nmiss));
        }

        if let Some(mode) = self.mode {
            let vanilla = mode.as_vanilla();
            // oppai-ng only handles std and taiko
            if !matches!(vanilla, GameMode::VnStd | GameMode::VnTaiko) {
                return None;
            }
            args.push(format!("-m{}", vanilla.id()));
            if vanilla == GameMode::VnTaiko {
                args.push("-otaiko".to_owned());
            }
        }

        if self.acc != 0.0 {
            args.push(format!("{:.4}%", self.acc));
        }

        args.push("-ojson".to_owned());
        Some(args)
    }
}
