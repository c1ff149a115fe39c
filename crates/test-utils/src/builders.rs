use std::collections::BTreeMap;

use pystep::config::{ConfigFile, ConfigSection, RawConfigFile, StepConfig};
use pystep::tools::Installation;
use pystep::types::Nature;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                installation: Vec::new(),
                axis: BTreeMap::new(),
                step: Vec::new(),
            },
        }
    }

    pub fn with_installation(mut self, name: &str, home: &str) -> Self {
        self.config.installation.push(Installation::new(name, home));
        self
    }

    pub fn with_axis(mut self, name: &str, value: &str) -> Self {
        self.config.axis.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_python_axis(mut self, name: &str) -> Self {
        self.config.config.python_axis = name.to_string();
        self
    }

    pub fn with_step(mut self, step: StepConfig) -> Self {
        self.config.step.push(step);
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `StepConfig`.
pub struct StepConfigBuilder {
    step: StepConfig,
}

impl StepConfigBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            step: StepConfig {
                name: None,
                python: None,
                command: command.to_string(),
                ignore_exit_code: false,
                nature: Nature::Shell,
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.step.name = Some(name.to_string());
        self
    }

    pub fn python(mut self, python: &str) -> Self {
        self.step.python = Some(python.to_string());
        self
    }

    pub fn ignore_exit_code(mut self, val: bool) -> Self {
        self.step.ignore_exit_code = val;
        self
    }

    pub fn nature(mut self, nature: Nature) -> Self {
        self.step.nature = nature;
        self
    }

    pub fn build(self) -> StepConfig {
        self.step
    }
}
