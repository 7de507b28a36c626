use std::fmt::Display;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Set of gameplay modifiers, stored with the same bit layout the game client uses.
#[derive(
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    derive_more::From,
    derive_more::Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Mods(u32);

impl Mods {
    pub const NOMOD: Mods = Mods(0);
    pub const NOFAIL: Mods = Mods(1 << 0);
    pub const EASY: Mods = Mods(1 << 1);
    pub const TOUCHSCREEN: Mods = Mods(1 << 2);
    pub const HIDDEN: Mods = Mods(1 << 3);
    pub const HARDROCK: Mods = Mods(1 << 4);
    pub const SUDDENDEATH: Mods = Mods(1 << 5);
    pub const DOUBLETIME: Mods = Mods(1 << 6);
    pub const RELAX: Mods = Mods(1 << 7);
    pub const HALFTIME: Mods = Mods(1 << 8);
    pub const NIGHTCORE: Mods = Mods(1 << 9);
    pub const FLASHLIGHT: Mods = Mods(1 << 10);
    pub const AUTOPLAY: Mods = Mods(1 << 11);
    pub const SPUNOUT: Mods = Mods(1 << 12);
    pub const AUTOPILOT: Mods = Mods(1 << 13);
    pub const PERFECT: Mods = Mods(1 << 14);
    pub const KEY4: Mods = Mods(1 << 15);
    pub const KEY5: Mods = Mods(1 << 16);
    pub const KEY6: Mods = Mods(1 << 17);
    pub const KEY7: Mods = Mods(1 << 18);
    pub const KEY8: Mods = Mods(1 << 19);
    pub const FADEIN: Mods = Mods(1 << 20);
    pub const RANDOM: Mods = Mods(1 << 21);
    pub const CINEMA: Mods = Mods(1 << 22);
    pub const TARGET: Mods = Mods(1 << 23);
    pub const KEY9: Mods = Mods(1 << 24);
    pub const KEYCOOP: Mods = Mods(1 << 25);
    pub const KEY1: Mods = Mods(1 << 26);
    pub const KEY3: Mods = Mods(1 << 27);
    pub const KEY2: Mods = Mods(1 << 28);
    pub const SCOREV2: Mods = Mods(1 << 29);
    pub const MIRROR: Mods = Mods(1 << 30);

    /// Acronyms indexed by bit position.
    const ACRONYMS: [&'static str; 31] = [
        "NF", "EZ", "TD", "HD", "HR", "SD", "DT", "RX", "HT", "NC", "FL", "AU", "SO", "AP", "PF",
        "4K", "5K", "6K", "7K", "8K", "FI", "RN", "CN", "TP", "9K", "CO", "1K", "3K", "2K", "V2",
        "MR",
    ];

    const ALL_BITS: u32 = (1 << 31) - 1;

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Drops any bit that does not correspond to a known modifier.
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Mods(bits & Self::ALL_BITS)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Mods) -> bool {
        self.0 & other.0 == other.0
    }

    fn acronyms(self) -> impl Iterator<Item = &'static str> {
        Self::ACRONYMS
            .iter()
            .enumerate()
            .filter(move |&(bit, _)| self.0 & (1 << bit) != 0)
            .map(|(_, &acronym)| acronym)
    }
}

impl BitOr for Mods {
    type Output = Mods;
    fn bitor(self, rhs: Self) -> Self {
        Mods(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mods {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Mods {
    type Output = Mods;
    fn bitand(self, rhs: Self) -> Self {
        Mods(self.0 & rhs.0)
    }
}

impl Display for Mods {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "NM");
        }
        for acronym in self.acronyms() {
            f.write_str(acronym)?;
        }
        Ok(())
    }
}

#[derive(PartialEq, Eq, Debug, Error)]
pub enum ModsParseError {
    #[error("Mods string must consist of two-letter acronyms: {0:?}")]
    Malformed(String),
    #[error("Unknown mod acronym: {0:?}")]
    UnknownAcronym(String),
}

impl FromStr for Mods {
    type Err = ModsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix('+').unwrap_or(s).to_ascii_uppercase();
        if s.is_empty() || s == "NM" {
            return Ok(Mods::NOMOD);
        }
        if s.len() % 2 != 0 || !s.is_ascii() {
            return Err(ModsParseError::Malformed(s));
        }
        let mut mods = Mods::NOMOD;
        for chunk in s.as_bytes().chunks(2) {
            // Chunks of an ASCII string are always valid UTF-8.
            let acronym = std::str::from_utf8(chunk).unwrap_or_default();
            let bit = Self::ACRONYMS
                .iter()
                .position(|&x| x == acronym)
                .ok_or_else(|| ModsParseError::UnknownAcronym(acronym.to_owned()))?;
            mods |= Mods(1 << bit);
        }
        Ok(mods)
    }
}
