use anyhow::Context;
use flightdeck_flight::ControlAction;
use serde::Deserialize;
use std::path::Path;

const TAKEOFF: &str = include_str!("../scripts/takeoff.yaml");

/// Actions held for a run of frames.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptStep {
    pub frames: u64,
    #[serde(default)]
    pub actions: Vec<ControlAction>,
}

/// A control script: steps play back to back, then the controls go neutral.
#[derive(Debug, Clone)]
pub struct Script {
    steps: Vec<ScriptStep>,
}

impl Script {
    pub fn parse(yaml: &str) -> anyhow::Result<Self> {
        let steps: Vec<ScriptStep> = serde_yaml::from_str(yaml)?;
        Ok(Self { steps })
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing script {}", path.display()))
    }

    pub fn takeoff() -> anyhow::Result<Self> {
        Self::parse(TAKEOFF)
    }

    pub fn total_frames(&self) -> u64 {
        self.steps.iter().map(|s| s.frames).sum()
    }

    /// Actions held on zero-based `frame`.
    pub fn actions_at(&self, frame: u64) -> &[ControlAction] {
        let mut start = 0;
        for step in &self.steps {
            if frame < start + step.frames {
                return &step.actions;
            }
            start += step.frames;
        }
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takeoff_script_parses() {
        let script = Script::takeoff().unwrap();
        assert_eq!(script.total_frames(), 810);
        assert_eq!(script.actions_at(0), &[ControlAction::ThrottleUp]);
        assert_eq!(script.actions_at(180), &[ControlAction::ToggleGear]);
        assert!(script.actions_at(181).is_empty());
        assert!(script.actions_at(10_000).is_empty());
    }

    #[test]
    fn missing_actions_default_to_neutral() {
        let script = Script::parse("- frames: 5\n- frames: 2\n  actions: [PitchUp]\n").unwrap();
        assert!(script.actions_at(4).is_empty());
        assert_eq!(script.actions_at(5), &[ControlAction::PitchUp]);
        assert_eq!(script.total_frames(), 7);
    }
}
