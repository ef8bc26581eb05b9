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

//! Encoders for the kinds that have no pluggable writer.

use super::WriteContext;
use crate::payload::{self, EffectPayload, NodePayload, EFFECT_VERSION, NODE_VERSION};
use tessera_core::asset::{AssetId, AssetKind, SerializedRecord};
use tessera_core::effect::Effect;
use tessera_core::Result;
use tessera_data::Node;

/// Re-encodes an effect's full pass state.
///
/// The command history is kept only when `keep_effect_history` is set; the
/// passes already carry its effect either way.
pub fn write_effect(ctx: &WriteContext<'_>, effect: &Effect, id: AssetId) -> Result<SerializedRecord> {
    let payload = EffectPayload {
        name: effect.name().to_string(),
        techniques: effect
            .techniques()
            .map(|(name, passes)| (name.to_string(), passes.to_vec()))
            .collect(),
        fallbacks: effect
            .fallbacks()
            .map(|(name, fallback)| (name.to_string(), fallback.to_string()))
            .collect(),
        history: if ctx.options.keep_effect_history {
            effect.history().to_vec()
        } else {
            Vec::new()
        },
    };
    Ok(SerializedRecord::new(
        AssetKind::Effect,
        id,
        EFFECT_VERSION,
        payload::encode(&payload)?,
    ))
}

/// Encodes a scene node and the ids of everything it points at.
pub fn write_node(ctx: &WriteContext<'_>, node: &Node, id: AssetId) -> Result<SerializedRecord> {
    let deps = ctx.dependencies;
    let children = node
        .children
        .iter()
        .map(|child| deps.dependency_id(*child))
        .collect::<Result<Vec<_>>>()?;

    let payload = NodePayload {
        name: node.name.clone(),
        layouts: node.layouts.bits(),
        children,
        geometry: node.geometry.map(|h| deps.dependency_id(h)).transpose()?,
        material: node.material.map(|h| deps.dependency_id(h)).transpose()?,
        effect: node.effect.map(|h| deps.dependency_id(h)).transpose()?,
    };
    Ok(SerializedRecord::new(
        AssetKind::SubScene,
        id,
        NODE_VERSION,
        payload::encode(&payload)?,
    ))
}
