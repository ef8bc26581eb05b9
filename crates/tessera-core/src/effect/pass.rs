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

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A value bound to a named shader uniform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UniformValue {
    /// A single float.
    Float(f32),
    /// A signed integer.
    Int(i32),
    /// A boolean.
    Bool(bool),
    /// A two-component vector.
    Vec2([f32; 2]),
    /// A three-component vector.
    Vec3([f32; 3]),
    /// A four-component vector.
    Vec4([f32; 4]),
    /// A column-major 4x4 matrix.
    Mat4([f32; 16]),
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        UniformValue::Float(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        UniformValue::Int(value)
    }
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        UniformValue::Bool(value)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(value: [f32; 2]) -> Self {
        UniformValue::Vec2(value)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(value: [f32; 3]) -> Self {
        UniformValue::Vec3(value)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(value: [f32; 4]) -> Self {
        UniformValue::Vec4(value)
    }
}

impl From<[f32; 16]> for UniformValue {
    fn from(value: [f32; 16]) -> Self {
        UniformValue::Mat4(value)
    }
}

/// The value of a preprocessor macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacroValue {
    /// A macro that is only defined, without a value.
    Flag,
    /// A macro defined to an integer.
    Int(i32),
}

/// Per-vertex data fed to a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexAttribute {
    /// The number of floats per vertex.
    pub size: u32,
    /// The interleaved-free attribute data.
    pub data: Vec<f32>,
}

/// A single rendering pass and the state bound to it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pass {
    name: String,
    uniforms: BTreeMap<String, UniformValue>,
    attributes: BTreeMap<String, VertexAttribute>,
    index_buffer: Option<Vec<u16>>,
    macros: BTreeMap<String, MacroValue>,
}

impl Pass {
    /// Creates a pass with no bound state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The name of the pass.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binds a uniform, replacing any previous value under the same name.
    pub fn set_uniform(&mut self, name: impl Into<String>, value: impl Into<UniformValue>) {
        self.uniforms.insert(name.into(), value.into());
    }

    /// Returns the value bound to a uniform.
    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }

    /// Iterates over all bound uniforms in name order.
    pub fn uniforms(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.uniforms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Binds a vertex attribute stream.
    pub fn set_vertex_attribute(&mut self, name: impl Into<String>, size: u32, data: Vec<f32>) {
        self.attributes
            .insert(name.into(), VertexAttribute { size, data });
    }

    /// Returns a bound vertex attribute.
    pub fn vertex_attribute(&self, name: &str) -> Option<&VertexAttribute> {
        self.attributes.get(name)
    }

    /// Binds the index buffer, replacing the previous one.
    pub fn set_index_buffer(&mut self, indices: Vec<u16>) {
        self.index_buffer = Some(indices);
    }

    /// Returns the bound index buffer.
    pub fn index_buffer(&self) -> Option<&[u16]> {
        self.index_buffer.as_deref()
    }

    /// Defines a valueless macro.
    pub fn define(&mut self, name: impl Into<String>) {
        self.macros.insert(name.into(), MacroValue::Flag);
    }

    /// Defines a macro with an integer value.
    pub fn define_int(&mut self, name: impl Into<String>, value: i32) {
        self.macros.insert(name.into(), MacroValue::Int(value));
    }

    /// Removes a macro. Undefining an unknown macro does nothing.
    pub fn undefine(&mut self, name: &str) {
        self.macros.remove(name);
    }

    /// Returns the value of a defined macro.
    pub fn macro_value(&self, name: &str) -> Option<MacroValue> {
        self.macros.get(name).copied()
    }

    /// Returns `true` if the macro is currently defined.
    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_replacement() {
        let mut pass = Pass::new("base");
        pass.set_uniform("color", 1.0f32);
        pass.set_uniform("color", [1.0f32, 0.0, 0.0, 1.0]);
        assert_eq!(
            pass.uniform("color"),
            Some(&UniformValue::Vec4([1.0, 0.0, 0.0, 1.0]))
        );
        assert_eq!(pass.uniforms().count(), 1);
    }

    #[test]
    fn test_macros_define_and_undefine() {
        let mut pass = Pass::new("base");
        pass.define("SHADOWS");
        pass.define_int("NUM_LIGHTS", 4);
        assert_eq!(pass.macro_value("SHADOWS"), Some(MacroValue::Flag));
        assert_eq!(pass.macro_value("NUM_LIGHTS"), Some(MacroValue::Int(4)));

        pass.undefine("SHADOWS");
        assert!(!pass.is_defined("SHADOWS"));
        pass.undefine("NEVER_DEFINED");
    }
}
