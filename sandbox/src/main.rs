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

//! Replays slot recycling against the identity layer and logs what a script
//! holding each kind of identifier would observe.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sigil_core::identity::{Identifier, IdentifierKind};
use sigil_data::SimWorld;
use sigil_sdk::boundary::{BoundaryAdapter, ScriptValue};
use sigil_sdk::config::{load_config, DEFAULT_CONFIG_FILE};
use sigil_sdk::helpers::{create_entity, remove_entity, spawn_entity};

#[derive(Parser)]
#[command(name = "sandbox")]
#[command(about = "Replays slot recycling against the identity layer.", long_about = None)]
struct Cli {
    /// Settings file; defaults apply when it does not exist.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Entity class to churn through the slot table.
    #[arg(long, default_value = "prop_physics")]
    class: String,

    /// Number of remove-and-recreate cycles to run.
    #[arg(long, default_value_t = 3)]
    cycles: u32,
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    let mut world = SimWorld::new(&config).context("Failed to build the simulated world")?;
    log::info!(
        "Identity layer ready: {} slots, {} networked",
        config.max_slots,
        config.max_edicts
    );

    replay_recycling(&mut world, &cli.class, cli.cycles)?;
    replay_player_session(&mut world)?;
    Ok(())
}

/// Creates an object, keeps every identifier for it, then recycles its slot
/// and reports how each identifier fares.
fn replay_recycling(world: &mut SimWorld, class: &str, cycles: u32) -> Result<()> {
    let index = create_entity(world, class)?;
    spawn_entity(world, index)?;

    let held: Vec<Identifier> = [
        IdentifierKind::WeakHandle,
        IdentifierKind::PackedHandle,
        IdentifierKind::Pointer,
    ]
    .into_iter()
    .map(|kind| world.codec().convert(Identifier::Index(index), kind))
    .collect::<Result<Vec<_>, _>>()?
    .into_iter()
    .map(|converted| converted.value)
    .collect();
    for value in &held {
        log::info!("Holding {value}");
    }

    for cycle in 1..=cycles {
        remove_entity(world, index)?;
        let recycled = create_entity(world, class)?;

        let codec = world.codec();
        let current = codec.handle_of(recycled)?;
        log::info!("Cycle {cycle}: slot {recycled} now holds {current}");
        for value in &held {
            match codec.convert(*value, IdentifierKind::Index) {
                Ok(converted) => log::warn!("{value} still resolves to {}", converted.value),
                Err(err) => log::info!("{value} -> {}: {err}", err.kind()),
            }
        }
    }
    Ok(())
}

/// Connects a player, respawns them, and disconnects them, calling the
/// script-facing functions along the way.
fn replay_player_session(world: &mut SimWorld) -> Result<()> {
    let (user, before) = world.connect_player()?;
    let arg = ScriptValue::Int(i64::from(user.0));
    {
        let adapter = BoundaryAdapter::new(world.codec());
        let handover = adapter.call("pointer_from_user_id", &arg)?;
        log::info!("pointer_from_user_id({user}) = {handover:?}");
    }

    let after = world.respawn_player(user)?;
    log::info!("{user} respawned: {before} -> {after}");

    let adapter = BoundaryAdapter::new(world.codec());
    let stale = ScriptValue::from(Identifier::WeakHandle(before));
    if let Err(err) = adapter.call("user_id_from_weak_handle", &stale) {
        log::info!("user_id_from_weak_handle({before}) failed: {err}");
    }
    drop(adapter);

    let index = world.disconnect_player(user)?;
    log::info!("{user} disconnected from slot {index}");

    let adapter = BoundaryAdapter::new(world.codec());
    if let Err(err) = adapter.call("index_from_user_id", &arg) {
        log::info!("index_from_user_id({user}) failed: {err}");
    }
    Ok(())
}
