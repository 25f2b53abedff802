//! Player directory: registration, profile mutation and lookups

use super::profile::{PlayerRegistration, ProfileUpdate, DEFAULT_AGE};
use crate::error::{LeagueError, Result};
use crate::metrics::MetricsCollector;
use crate::rating::initialize_attributes;
use crate::storage::LeagueStore;
use crate::types::{Player, PlayerId};
use crate::utils::{current_timestamp, generate_id};
use std::sync::Arc;
use tracing::{debug, info};

/// Owns player profile mutations
#[derive(Clone)]
pub struct PlayerDirectory {
    store: Arc<LeagueStore>,
    metrics: Arc<MetricsCollector>,
}

impl PlayerDirectory {
    pub fn new(store: Arc<LeagueStore>, metrics: Arc<MetricsCollector>) -> Self {
        Self { store, metrics }
    }

    /// Create the profile of an actor.
    ///
    /// Attributes are seeded from the position archetype unless the
    /// registration carries explicit ones; either way the profile is marked
    /// initialized and seeding never runs again.
    pub fn register_player(
        &self,
        actor_id: &str,
        registration: PlayerRegistration,
    ) -> Result<Player> {
        registration.validate()?;

        let player = self.store.transaction(|state| {
            if state.player_by_actor(actor_id).is_some() {
                return Err(LeagueError::conflict(format!(
                    "Actor '{}' already has a player profile",
                    actor_id
                )));
            }

            let attributes = registration
                .attributes
                .unwrap_or_else(|| initialize_attributes(registration.position));

            let now = current_timestamp();
            let player = Player {
                id: generate_id(),
                actor_id: actor_id.to_string(),
                name: registration.name.trim().to_string(),
                age: registration.age.unwrap_or(DEFAULT_AGE),
                jersey_number: registration.jersey_number,
                preferred_foot: registration.preferred_foot.unwrap_or_default(),
                position: registration.position,
                attributes,
                attributes_initialized: true,
                current_team: None,
                created_at: now,
                updated_at: now,
            };
            state.players.insert(player.id, player.clone());
            Ok(player)
        })?;

        self.metrics.record_player_registered();
        info!(
            "Registered player '{}' ({}) for actor '{}' - position: {}, overall: {}",
            player.name,
            player.id,
            actor_id,
            player.position,
            player.overall()
        );
        Ok(player)
    }

    /// Apply a validated partial update to the actor's own profile
    pub fn update_profile(&self, actor_id: &str, update: ProfileUpdate) -> Result<Player> {
        update.validate()?;

        let player = self.store.transaction(|state| {
            let player_id = state
                .player_by_actor(actor_id)
                .map(|p| p.id)
                .ok_or_else(|| LeagueError::not_found("Player", actor_id))?;
            let player = state.player_mut(player_id)?;

            if let Some(name) = &update.name {
                player.name = name.trim().to_string();
            }
            if let Some(age) = update.age {
                player.age = age;
            }
            if let Some(number) = update.jersey_number {
                player.jersey_number = number;
            }
            if let Some(foot) = update.preferred_foot {
                player.preferred_foot = foot;
            }
            if let Some(position) = update.position {
                player.position = position;
            }
            for (attribute, value) in &update.attribute_changes {
                player.attributes.set(*attribute, *value);
            }
            player.updated_at = current_timestamp();

            Ok(player.clone())
        })?;

        debug!(
            "Updated profile of player {} - position: {}, overall: {}",
            player.id,
            player.position,
            player.overall()
        );
        Ok(player)
    }

    /// Copy the identity provider's full name onto the profile.
    ///
    /// Returns whether anything changed. Empty names and actors without a
    /// profile are ignored.
    pub fn sync_display_name(&self, actor_id: &str, full_name: &str) -> Result<bool> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Ok(false);
        }

        self.store.transaction(|state| {
            let Some(player_id) = state.player_by_actor(actor_id).map(|p| p.id) else {
                return Ok(false);
            };
            let player = state.player_mut(player_id)?;
            if player.name == full_name {
                return Ok(false);
            }

            debug!(
                "Syncing display name of player {}: '{}' -> '{}'",
                player.id, player.name, full_name
            );
            player.name = full_name.to_string();
            player.updated_at = current_timestamp();
            Ok(true)
        })
    }

    pub fn player(&self, id: PlayerId) -> Result<Player> {
        self.store.read(|state| state.player(id).cloned())?
    }

    pub fn player_by_actor(&self, actor_id: &str) -> Result<Player> {
        self.store.read(|state| {
            state
                .player_by_actor(actor_id)
                .cloned()
                .ok_or_else(|| LeagueError::not_found("Player", actor_id))
        })?
    }

    /// All players, best overall first, then by name
    pub fn players_by_overall(&self) -> Result<Vec<Player>> {
        let mut players = self
            .store
            .read(|state| state.players.values().cloned().collect::<Vec<_>>())?;
        players.sort_by(|a, b| {
            b.overall()
                .cmp(&a.overall())
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(players)
    }
}
