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

use std::cell::RefCell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::{criterion_group, criterion_main, Criterion};
use ember_core::EntityHandle;
use ember_data::ecs::{ComponentSystem, EntitySystem, EntitySystemConfig};

struct NoopComponents;

impl ComponentSystem for NoopComponents {
    fn finalize_entity(&mut self, _: EntityHandle) -> bool {
        true
    }

    fn entity_destroyed(&mut self, _: EntityHandle) {}
}

fn bench_lifecycle(c: &mut Criterion) {
    let mut entities =
        EntitySystem::with_config(EntitySystemConfig::default().with_initial_capacity(10_000));
    entities
        .initialize(Rc::new(RefCell::new(NoopComponents)))
        .unwrap();

    let mut group = c.benchmark_group("Entity Lifecycle");

    group.bench_function("Create + drain + destroy + drain (10k)", |b| {
        let mut handles = Vec::with_capacity(10_000);
        b.iter(|| {
            handles.clear();
            for _ in 0..10_000 {
                handles.push(entities.create_entity());
            }
            entities.process_commands();
            for handle in &handles {
                entities.destroy_entity(*handle);
            }
            entities.process_commands();
            black_box(entities.entity_count());
        });
    });

    // Setup 10,000 live entities for the validity checks.
    let live: Vec<_> = (0..10_000).map(|_| entities.create_entity()).collect();
    entities.process_commands();

    group.bench_function("Validity check (10k)", |b| {
        b.iter(|| {
            let mut valid = 0;
            for handle in &live {
                if entities.is_handle_valid(black_box(*handle)) {
                    valid += 1;
                }
            }
            black_box(valid);
        });
    });

    group.bench_function("Destroy all (10k)", |b| {
        b.iter(|| {
            for _ in 0..10_000 {
                entities.create_entity();
            }
            entities.destroy_all_entities();
            black_box(entities.free_count());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_lifecycle);
criterion_main!(benches);
