use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::string::FromUtf8Error;

use itertools::Itertools;
use log::{debug, error, warn};
use thiserror::Error;
use tokio::process::Command;

use crate::{
    beatmap::{BeatmapResolver, ResolveError},
    config::Config,
    request::CalculationRequest,
    result::CalculationResult,
};

#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error("The argument list is empty.")]
    NoProgram,
    #[error("Failed to run the calculator: {0}")]
    Spawn(#[from] io::Error),
    #[error("The calculator printed non UTF-8 output: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error("The calculator output could not be parsed as json: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Runs oppai-ng and parses what it prints.
pub struct Calculator;

impl Calculator {
    /// Spawns `args[0]` with the remaining arguments and waits for it to exit.
    ///
    /// A result whose `code` is not 200 or that lacks a required field is
    /// logged but still returned as-is.
    pub async fn run(args: &[String]) -> Result<CalculationResult, CalculatorError> {
        let (program, args) = args.split_first().ok_or(CalculatorError::NoProgram)?;
        debug!("Running: {} {}", program, args.iter().join(" "));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;
        if !output.status.success() {
            warn!("The calculator exited with {}", output.status);
        }
        if !output.stderr.is_empty() {
            debug!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        }

        let stdout = String::from_utf8(output.stdout)?;
        let result: CalculationResult = serde_json::from_str(&stdout)?;
        if !result.is_valid() {
            error!(
                "oppai-ng error: {}",
                result.errstr().as_deref().unwrap_or("<no error string>")
            );
        }
        Ok(result)
    }
}

/// Final state of a calculation.
#[derive(Clone, PartialEq, Debug)]
pub enum Outcome {
    /// The calculator ran. The result may still carry a tool-reported error.
    Ready(CalculationResult),
    /// The beatmap could not be obtained.
    Failed,
    /// The calculator does not support the requested mode.
    Empty,
}

impl Outcome {
    pub fn result(&self) -> Option<&CalculationResult> {
        match self {
            Outcome::Ready(result) => Some(result),
            Outcome::Failed | Outcome::Empty => None,
        }
    }

    /// The calculated result, or an empty one whose accessors all return `0.0`.
    pub fn into_result(self) -> CalculationResult {
        match self {
            Outcome::Ready(result) => result,
            Outcome::Failed | Outcome::Empty => CalculationResult::default(),
        }
    }
}

/// Resolves beatmaps and evaluates plays on them.
#[derive(Clone, Debug)]
pub struct PpCalculator {
    resolver: BeatmapResolver,
    calculator: PathBuf,
}

impl PpCalculator {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &Config) -> Self {
        Self {
            resolver: BeatmapResolver::new(client, config),
            calculator: config.calculator.clone(),
        }
    }

    pub fn resolver(&self) -> &BeatmapResolver {
        &self.resolver
    }

    pub async fn resolve(&self, map_id: u32) -> Result<PathBuf, ResolveError> {
        self.resolver.resolve(map_id).await
    }

    /// Runs the calculator on an already resolved beatmap.
    pub async fn calculate_with(
        &self,
        request: &CalculationRequest,
        beatmap: &Path,
    ) -> Result<Outcome, CalculatorError> {
        let Some(args) = request.command_args(&self.calculator, beatmap) else {
            debug!(
                "Skipping map {}: mode {:?} is not supported",
                request.map_id(),
                request.mode()
            );
            return Ok(Outcome::Empty);
        };
        Ok(Outcome::Ready(Calculator::run(&args).await?))
    }

    /// Resolves the beatmap, then calculates.
    ///
    /// Only failures to run the calculator or to read its output are returned
    /// as errors. A missing beatmap yields [`Outcome::Failed`].
    pub async fn calculate(&self, request: &CalculationRequest) -> Result<Outcome, CalculatorError> {
        match self.resolve(request.map_id()).await {
            Ok(path) => self.calculate_with(request, &path).await,
            Err(e) => {
                error!("{e}");
                Ok(Outcome::Failed)
            }
        }
    }
}
