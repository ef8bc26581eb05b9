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

use super::pass::{Pass, UniformValue};
use serde::{Deserialize, Serialize};

/// One recorded mutation of an effect's pass state.
///
/// An effect keeps every command it was given, in order, so the full history
/// can be replayed against passes that join the effect later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectCommand {
    /// Binds a uniform value.
    SetUniform {
        /// The uniform name.
        name: String,
        /// The bound value.
        value: UniformValue,
    },
    /// Binds a vertex attribute stream.
    SetVertexAttribute {
        /// The attribute name.
        name: String,
        /// The number of floats per vertex.
        size: u32,
        /// The attribute data.
        data: Vec<f32>,
    },
    /// Binds an index buffer.
    SetIndexBuffer(Vec<u16>),
    /// Defines a macro, with an optional integer value.
    DefineMacro {
        /// The macro name.
        name: String,
        /// `None` defines a valueless flag.
        value: Option<i32>,
    },
    /// Removes a macro.
    UndefineMacro(String),
}

impl EffectCommand {
    /// Applies this command to a single pass.
    pub fn apply(&self, pass: &mut Pass) {
        match self {
            EffectCommand::SetUniform { name, value } => pass.set_uniform(name.clone(), *value),
            EffectCommand::SetVertexAttribute { name, size, data } => {
                pass.set_vertex_attribute(name.clone(), *size, data.clone())
            }
            EffectCommand::SetIndexBuffer(indices) => pass.set_index_buffer(indices.clone()),
            EffectCommand::DefineMacro { name, value: None } => pass.define(name.clone()),
            EffectCommand::DefineMacro {
                name,
                value: Some(value),
            } => pass.define_int(name.clone(), *value),
            EffectCommand::UndefineMacro(name) => pass.undefine(name),
        }
    }
}
