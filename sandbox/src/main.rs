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

mod components;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use ember_core::EntityHandle;
use ember_data::ecs::{EntityCreated, EntityDestroyed, EntitySystem, EntitySystemConfig};
use serde::Deserialize;

use crate::components::{Transform, TransformStore};

/// Sandbox settings, optionally read from a RON file given as first argument.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct SandboxConfig {
    entities: EntitySystemConfig,
    frames: u32,
    /// A new entity is requested every `spawn_interval` frames.
    spawn_interval: u32,
    /// Every `skip_transform`-th spawn gets no transform and is rejected.
    skip_transform: u32,
    /// Frames an entity lives before it is destroyed.
    lifetime: u32,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            entities: EntitySystemConfig::default(),
            frames: 60,
            spawn_interval: 4,
            skip_transform: 5,
            lifetime: 20,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SandboxConfig> {
    let Some(path) = path else {
        return Ok(SandboxConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading sandbox config '{}'", path.display()))?;
    let config = ron::from_str(&text)
        .with_context(|| format!("parsing sandbox config '{}'", path.display()))?;
    log::info!("Loaded sandbox config from '{}'.", path.display());
    Ok(config)
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let path = std::env::args().nth(1);
    let config = load_config(path.as_deref().map(Path::new))?;

    let transforms = Rc::new(RefCell::new(TransformStore::default()));
    let mut entities = EntitySystem::with_config(config.entities);
    entities.initialize(transforms.clone())?;

    let events = entities.events_mut();
    events.subscribe_created(|event: &EntityCreated| {
        log::info!("Entity created: {}", event.handle);
    });
    events.subscribe_destroyed(|event: &EntityDestroyed| {
        log::info!("Entity destroyed: {}", event.handle);
    });

    let mut spawned = 0u32;
    let mut alive: VecDeque<(u32, EntityHandle)> = VecDeque::new();

    for frame in 0..config.frames {
        if config.spawn_interval > 0 && frame % config.spawn_interval == 0 {
            let entity = entities.create_entity();
            spawned += 1;

            if config.skip_transform == 0 || spawned % config.skip_transform != 0 {
                let transform = Transform {
                    position: [frame as f32, 0.0],
                    ..Default::default()
                };
                transforms.borrow_mut().insert(entity, transform);
            }
            alive.push_back((frame, entity));
        }

        while let Some(&(born, entity)) = alive.front() {
            if frame - born < config.lifetime {
                break;
            }
            entities.destroy_entity(entity);
            alive.pop_front();
        }

        // Newly created entities become visible, destroyed ones go away.
        entities.process_commands();

        for (_, transform) in transforms.borrow_mut().iter_mut() {
            transform.rotation = (transform.rotation + 6.0) % 360.0;
            let [dx, dy] = transform.direction();
            transform.position[0] += dx;
            transform.position[1] += dy;
        }

        log::debug!(
            "Frame {frame}: {} active entities, {} transforms.",
            entities.entity_count(),
            transforms.borrow().len()
        );
    }

    if let Some(&(_, entity)) = alive.back() {
        if let Some(transform) = transforms.borrow().get(entity) {
            log::info!("Last entity {entity} ended at {:?}.", transform.position);
        }
    }

    log::info!(
        "Ran {} frames, {} entities still active.",
        config.frames,
        entities.entity_count()
    );
    entities.cleanup();
    Ok(())
}
