//! Sequence file handling

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use tweenkit_animation::{Easing, Properties, TweenConfig};

/// Top-level sequence description (`*.toml`)
#[derive(Debug, Deserialize)]
pub struct SequenceFile {
    /// Simulated frames per second
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Give up after this many frames
    #[serde(default = "default_max_frames")]
    pub max_frames: u32,
    #[serde(default, rename = "step")]
    pub steps: Vec<StepConfig>,
}

fn default_fps() -> u32 {
    60
}

fn default_max_frames() -> u32 {
    10_000
}

/// One sequencer step: either a group of tweens or a pause
#[derive(Debug, Default, Deserialize)]
pub struct StepConfig {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "tween")]
    pub tweens: Vec<TweenSpec>,
    /// Pause length in milliseconds
    #[serde(default)]
    pub delay: Option<f64>,
}

/// A single tween inside a step
#[derive(Debug, Deserialize)]
pub struct TweenSpec {
    pub name: String,
    /// Starting values, kept in file order
    pub from: IndexMap<String, f64>,
    pub to: IndexMap<String, f64>,
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default = "default_easing")]
    pub easing: String,
    #[serde(default)]
    pub delay: f64,
}

fn default_duration() -> f64 {
    TweenConfig::default().duration
}

fn default_easing() -> String {
    Easing::default().name().to_string()
}

impl TweenSpec {
    /// Resolve the timing configuration, validating the easing name
    pub fn config(&self) -> Result<TweenConfig> {
        let easing: Easing = self
            .easing
            .parse()
            .with_context(|| format!("Tween `{}` has an invalid easing", self.name))?;
        Ok(TweenConfig::default()
            .with_duration(self.duration)
            .with_easing(easing)
            .with_delay(self.delay))
    }

    pub fn origin(&self) -> Properties {
        self.from.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }

    pub fn target(&self) -> Properties {
        self.to.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }
}

impl SequenceFile {
    /// Load and validate a sequence file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: SequenceFile = toml::from_str(content)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            anyhow::bail!("fps must be greater than zero");
        }

        for (index, step) in self.steps.iter().enumerate() {
            let label = step.label.as_deref().unwrap_or("unnamed");
            match (step.delay, step.tweens.is_empty()) {
                (Some(_), false) => anyhow::bail!(
                    "Step {} ({}) sets both `delay` and tweens; split it into two steps",
                    index + 1,
                    label
                ),
                (None, true) => anyhow::bail!(
                    "Step {} ({}) needs either `delay` or at least one [[step.tween]]",
                    index + 1,
                    label
                ),
                _ => {}
            }
            for tween in &step.tweens {
                tween.config()?;
            }
        }

        Ok(())
    }
}
