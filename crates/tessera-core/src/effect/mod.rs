// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The effect technique registry.
//!
//! An [`Effect`] holds named techniques, each an ordered list of [`Pass`]es, plus
//! an optional fallback technique name per technique. State set on the effect
//! (uniforms, vertex attributes, the index buffer, macros) is applied to every
//! existing pass and recorded as an [`EffectCommand`]; the recorded history is
//! replayed, in order, against the passes of every technique added later.

mod command;
mod pass;

pub use command::*;
pub use pass::*;

use crate::asset::{Asset, AssetKind};
use std::collections::BTreeMap;

/// The name given to the technique of [`Effect::with_default_technique`].
pub const DEFAULT_TECHNIQUE: &str = "default";

/// An error raised by the technique registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    /// A technique with this name already exists.
    #[error("A technique named '{0}' already exists.")]
    DuplicateTechnique(String),
    /// No technique with this name exists.
    #[error("The technique named '{0}' does not exist.")]
    UnknownTechnique(String),
    /// No fallback is registered for this technique name.
    #[error("No fallback is registered for technique '{0}'.")]
    UnknownFallback(String),
}

/// A set of named rendering techniques sharing one mutation history.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Effect {
    name: String,
    techniques: BTreeMap<String, Vec<Pass>>,
    fallbacks: BTreeMap<String, String>,
    history: Vec<EffectCommand>,
}

impl Asset for Effect {
    const KIND: AssetKind = AssetKind::Effect;
}

impl Effect {
    /// Creates an effect with no techniques.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Creates an effect whose only technique is [`DEFAULT_TECHNIQUE`].
    pub fn with_default_technique(name: impl Into<String>, passes: Vec<Pass>) -> Self {
        let mut effect = Self::new(name);
        effect
            .techniques
            .insert(DEFAULT_TECHNIQUE.to_string(), passes);
        effect
    }

    /// Rebuilds an effect from previously captured state without replaying history.
    ///
    /// Used by decoders: the passes already carry the effect of every recorded
    /// command, so the history is only restored for future additions.
    pub fn restore(
        name: impl Into<String>,
        techniques: Vec<(String, Vec<Pass>)>,
        fallbacks: Vec<(String, String)>,
        history: Vec<EffectCommand>,
    ) -> Result<Self, EffectError> {
        let mut effect = Self::new(name);
        for (technique_name, passes) in techniques {
            if effect.techniques.contains_key(&technique_name) {
                return Err(EffectError::DuplicateTechnique(technique_name));
            }
            effect.techniques.insert(technique_name, passes);
        }
        for (technique_name, fallback) in fallbacks {
            if !effect.techniques.contains_key(&technique_name) {
                return Err(EffectError::UnknownTechnique(technique_name));
            }
            effect.fallbacks.insert(technique_name, fallback);
        }
        effect.history = history;
        Ok(effect)
    }

    /// The name of the effect.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterates over all techniques in name order.
    pub fn techniques(&self) -> impl Iterator<Item = (&str, &[Pass])> {
        self.techniques
            .iter()
            .map(|(name, passes)| (name.as_str(), passes.as_slice()))
    }

    /// Iterates over all `(technique, fallback)` pairs in technique name order.
    pub fn fallbacks(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fallbacks
            .iter()
            .map(|(name, fallback)| (name.as_str(), fallback.as_str()))
    }

    /// The recorded mutation history, oldest first.
    pub fn history(&self) -> &[EffectCommand] {
        &self.history
    }

    /// Returns the passes of a technique.
    ///
    /// Unknown names are an error; check with [`Effect::has_technique`] first.
    pub fn technique(&self, name: &str) -> Result<&[Pass], EffectError> {
        self.techniques
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| EffectError::UnknownTechnique(name.to_string()))
    }

    /// Returns the fallback technique name of a technique.
    ///
    /// Missing fallbacks are an error; check with [`Effect::has_fallback`] first.
    pub fn fallback(&self, name: &str) -> Result<&str, EffectError> {
        self.fallbacks
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| EffectError::UnknownFallback(name.to_string()))
    }

    /// Returns `true` if a technique with this name exists.
    pub fn has_technique(&self, name: &str) -> bool {
        self.techniques.contains_key(name)
    }

    /// Returns `true` if the technique has a fallback.
    pub fn has_fallback(&self, name: &str) -> bool {
        self.fallbacks.contains_key(name)
    }

    /// Adds a technique after replaying the full mutation history on its passes.
    pub fn add_technique(
        &mut self,
        name: impl Into<String>,
        mut passes: Vec<Pass>,
    ) -> Result<(), EffectError> {
        let name = name.into();
        if self.techniques.contains_key(&name) {
            log::error!("Effect '{}': duplicate technique '{}'", self.name, name);
            return Err(EffectError::DuplicateTechnique(name));
        }

        for pass in &mut passes {
            for command in &self.history {
                command.apply(pass);
            }
        }
        log::debug!(
            "Effect '{}': added technique '{}' ({} passes, {} replayed commands)",
            self.name,
            name,
            passes.len(),
            self.history.len()
        );
        self.techniques.insert(name, passes);
        Ok(())
    }

    /// Adds a technique together with the technique to use when it is unsupported.
    pub fn add_technique_with_fallback(
        &mut self,
        name: impl Into<String>,
        passes: Vec<Pass>,
        fallback: impl Into<String>,
    ) -> Result<(), EffectError> {
        let name = name.into();
        self.add_technique(name.clone(), passes)?;
        self.fallbacks.insert(name, fallback.into());
        Ok(())
    }

    /// Removes a technique and its fallback mapping.
    pub fn remove_technique(&mut self, name: &str) -> Result<(), EffectError> {
        if self.techniques.remove(name).is_none() {
            log::error!("Effect '{}': cannot remove unknown technique '{}'", self.name, name);
            return Err(EffectError::UnknownTechnique(name.to_string()));
        }
        self.fallbacks.remove(name);
        Ok(())
    }

    /// Binds a uniform on every pass, now and for techniques added later.
    pub fn set_uniform(&mut self, name: impl Into<String>, value: impl Into<UniformValue>) {
        self.record(EffectCommand::SetUniform {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Binds a vertex attribute on every pass, now and for techniques added later.
    pub fn set_vertex_attribute(&mut self, name: impl Into<String>, size: u32, data: Vec<f32>) {
        self.record(EffectCommand::SetVertexAttribute {
            name: name.into(),
            size,
            data,
        });
    }

    /// Binds the index buffer on every pass, now and for techniques added later.
    pub fn set_index_buffer(&mut self, indices: Vec<u16>) {
        self.record(EffectCommand::SetIndexBuffer(indices));
    }

    /// Defines a valueless macro on every pass.
    pub fn define(&mut self, name: impl Into<String>) {
        self.record(EffectCommand::DefineMacro {
            name: name.into(),
            value: None,
        });
    }

    /// Defines an integer macro on every pass.
    pub fn define_int(&mut self, name: impl Into<String>, value: i32) {
        self.record(EffectCommand::DefineMacro {
            name: name.into(),
            value: Some(value),
        });
    }

    /// Removes a macro from every pass.
    pub fn undefine(&mut self, name: impl Into<String>) {
        self.record(EffectCommand::UndefineMacro(name.into()));
    }

    fn record(&mut self, command: EffectCommand) {
        for pass in self.techniques.values_mut().flatten() {
            command.apply(pass);
        }
        self.history.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_passes() -> Vec<Pass> {
        vec![Pass::new("first"), Pass::new("second")]
    }

    #[test]
    fn test_uniform_set_before_technique_reaches_every_pass() -> anyhow::Result<()> {
        let mut effect = Effect::new("phong");
        effect.set_uniform("color", 1.0f32);
        effect.add_technique("default", two_passes())?;

        let passes = effect.technique("default")?;
        assert_eq!(passes.len(), 2);
        for pass in passes {
            assert_eq!(pass.uniform("color"), Some(&UniformValue::Float(1.0)));
        }
        Ok(())
    }

    #[test]
    fn test_state_set_after_technique_reaches_existing_passes() {
        let mut effect = Effect::with_default_technique("phong", two_passes());
        effect.set_vertex_attribute("uv", 2, vec![0.0, 1.0]);
        effect.set_index_buffer(vec![0, 1, 2]);

        for pass in effect.technique(DEFAULT_TECHNIQUE).unwrap() {
            assert_eq!(pass.vertex_attribute("uv").map(|a| a.size), Some(2));
            assert_eq!(pass.index_buffer(), Some(&[0u16, 1, 2][..]));
        }
    }

    #[test]
    fn test_replay_preserves_command_order() {
        let mut effect = Effect::new("fx");
        effect.define("FOG");
        effect.undefine("FOG");
        effect.define_int("QUALITY", 1);
        effect.define_int("QUALITY", 3);
        effect.add_technique("late", vec![Pass::new("p")]).unwrap();

        let pass = &effect.technique("late").unwrap()[0];
        assert!(!pass.is_defined("FOG"));
        assert_eq!(pass.macro_value("QUALITY"), Some(MacroValue::Int(3)));
    }

    #[test]
    fn test_duplicate_technique_fails() {
        let mut effect = Effect::new("fx");
        effect.add_technique("A", two_passes()).unwrap();
        let err = effect.add_technique("A", two_passes()).unwrap_err();
        assert_eq!(err, EffectError::DuplicateTechnique("A".to_string()));
    }

    #[test]
    fn test_failed_add_with_fallback_leaves_no_fallback() {
        let mut effect = Effect::new("fx");
        effect.add_technique("A", two_passes()).unwrap();
        assert!(effect
            .add_technique_with_fallback("A", two_passes(), "B")
            .is_err());
        assert!(!effect.has_fallback("A"));
    }

    #[test]
    fn test_unknown_lookups_fail() {
        let effect = Effect::new("fx");
        assert_eq!(
            effect.technique("B").unwrap_err(),
            EffectError::UnknownTechnique("B".to_string())
        );
        assert_eq!(
            effect.fallback("B").unwrap_err(),
            EffectError::UnknownFallback("B".to_string())
        );
    }

    #[test]
    fn test_remove_technique_drops_fallback() -> anyhow::Result<()> {
        let mut effect = Effect::new("fx");
        effect.add_technique_with_fallback("hq", two_passes(), "lq")?;
        assert_eq!(effect.fallback("hq")?, "lq");

        effect.remove_technique("hq")?;
        assert!(!effect.has_technique("hq"));
        assert!(!effect.has_fallback("hq"));
        Ok(())
    }

    #[test]
    fn test_remove_unknown_technique_fails() {
        let mut effect = Effect::new("fx");
        assert_eq!(
            effect.remove_technique("ghost").unwrap_err(),
            EffectError::UnknownTechnique("ghost".to_string())
        );
    }

    #[test]
    fn test_restore_rejects_fallback_for_missing_technique() {
        let result = Effect::restore(
            "fx",
            vec![("a".to_string(), two_passes())],
            vec![("b".to_string(), "a".to_string())],
            Vec::new(),
        );
        assert_eq!(
            result.unwrap_err(),
            EffectError::UnknownTechnique("b".to_string())
        );
    }

    #[test]
    fn test_errors_name_the_technique() {
        let err: Box<dyn std::error::Error> =
            Box::new(EffectError::UnknownFallback("shadow".to_string()));
        assert_eq!(
            err.to_string(),
            "No fallback is registered for technique 'shadow'."
        );
    }
}
