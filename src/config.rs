use std::{
    fmt::Debug,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use url::Url;

pub const DEFAULT_DATA_DIR: &str = ".data";
pub const DEFAULT_MAP_ENDPOINT: &str = "https://old.ppy.sh/osu/";
pub const DEFAULT_CALCULATOR: &str = "./pp/oppai";

/// Where beatmaps are cached, where they are downloaded from,
/// and which calculator binary is invoked.
#[derive(Clone, PartialEq, Eq, Debug, TypedBuilder, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[builder(default = PathBuf::from(DEFAULT_DATA_DIR), setter(into))]
    pub data_dir: PathBuf,
    /// Base url; the map id is appended as the last path segment.
    #[builder(default = default_map_endpoint())]
    pub map_endpoint: Url,
    #[builder(default = PathBuf::from(DEFAULT_CALCULATOR), setter(into))]
    pub calculator: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_map_endpoint() -> Url {
    // The constant is a well-formed absolute url.
    Url::parse(DEFAULT_MAP_ENDPOINT).expect("default map endpoint is valid")
}

impl Config {
    pub fn load(path: impl Into<PathBuf> + Debug) -> anyhow::Result<Self> {
        read_toml(path)
    }

    /// Loads `path` if given, falling back to the defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn beatmap_dir(&self) -> PathBuf {
        self.data_dir.join("osu")
    }
}

fn read_toml<P: Into<PathBuf> + Debug, T: for<'de> Deserialize<'de>>(
    path: P,
) -> anyhow::Result<T> {
    let path = path.into();
    (|| toml::from_str(&fs_err::read_to_string(&path)?).map_err(anyhow::Error::new))().with_context(
        || {
            format!(
                "While trying to parse {path:?} as {}",
                std::any::type_name::<T>()
            )
        },
    )
}
