//! Environment variable effects produced by runtime configuration.
//!
//! Configuration code never touches the process environment itself. It
//! returns an [`EnvironmentEffects`] value and the composition root applies
//! it once, at a single point during startup.

/// An ordered set of `NAME=value` assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentEffects {
    vars: Vec<(String, String)>,
}

impl EnvironmentEffects {
    #[must_use]
    pub const fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Set a variable, replacing an earlier assignment of the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.vars.iter_mut().find(|(existing, _)| *existing == name) {
            slot.1 = value;
        } else {
            self.vars.push((name, value));
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_existing_name() {
        let effects = EnvironmentEffects::new()
            .with("HIP_VISIBLE_DEVICES", "0")
            .with("HSA_ENABLE_SDMA", "0")
            .with("HIP_VISIBLE_DEVICES", "1");

        assert_eq!(effects.len(), 2);
        assert_eq!(effects.get("HIP_VISIBLE_DEVICES"), Some("1"));
        let names: Vec<_> = effects.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["HIP_VISIBLE_DEVICES", "HSA_ENABLE_SDMA"]);
    }
}
