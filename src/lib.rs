pub mod beatmap;
pub mod calculator;
pub mod config;
pub mod game_mode;
pub mod mods;
pub mod request;
pub mod result;
