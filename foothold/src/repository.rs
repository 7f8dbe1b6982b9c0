//! Ownership and atomic replacement of the active terrain.
//!
//! The repository holds the current [`Terrain`] behind an `Arc`. Loading builds a
//! complete new terrain off to the side and publishes it with one pointer swap,
//! so a caller holding a [`FootholdRepository::snapshot`] keeps querying the old
//! map in full until it drops the snapshot.
//!
//! A repository is an ordinary owned value. Several may coexist (one per map
//! instance); nothing here is global.

use std::sync::Arc;

use crate::{
    connectivity,
    error::TerrainError,
    platform::{self, DroppedPlatform, Platform},
    segment::Foothold,
    settings::{LOAD_LOG_SAMPLE, TerrainSettings},
    terrain::Terrain,
};

/// Summary of one [`FootholdRepository::load_platforms`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    /// Footholds published.
    pub loaded: usize,
    /// Platforms the adapter refused.
    pub dropped: Vec<DroppedPlatform>,
}

impl LoadReport {
    #[inline]
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

/// Owner of the active terrain snapshot.
#[derive(Clone, Debug, Default)]
pub struct FootholdRepository {
    terrain: Arc<Terrain>,
    settings: TerrainSettings,
}

impl FootholdRepository {
    /// An empty repository with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: TerrainSettings) -> Self {
        Self {
            terrain: Arc::new(Terrain::empty()),
            settings,
        }
    }

    #[inline]
    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    /// The active terrain, for queries within the current borrow.
    #[inline]
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// A shared handle to the active terrain that outlives later reloads.
    #[inline]
    pub fn snapshot(&self) -> Arc<Terrain> {
        Arc::clone(&self.terrain)
    }

    /// Replace the active terrain with `footholds`, taken as already linked.
    ///
    /// On error nothing changes: the previous terrain stays published.
    pub fn load(&mut self, footholds: Vec<Foothold>) -> Result<(), TerrainError> {
        self.publish(footholds).map_err(|e| {
            log::error!("Refusing terrain load: {}", e);
            e
        })
    }

    fn publish(&mut self, footholds: Vec<Foothold>) -> Result<(), TerrainError> {
        let terrain = Terrain::build(footholds, self.settings.ground_clearance)?;
        self.terrain = Arc::new(terrain);
        Ok(())
    }

    /// Convert, link, and publish one map's platforms.
    ///
    /// `map_id` only keys the log lines. Malformed platforms are dropped and
    /// reported; the rest of the map still loads.
    pub fn load_platforms(
        &mut self,
        map_id: impl std::fmt::Display,
        platforms: &[Platform],
    ) -> Result<LoadReport, TerrainError> {
        let conversion = platform::convert(platforms, &self.settings.adapter);
        let mut footholds = conversion.footholds;
        connectivity::link(&mut footholds, self.settings.link_epsilon);

        for foothold in footholds.iter().take(LOAD_LOG_SAMPLE) {
            log::debug!(
                "Map {}: foothold {} ({}, {}) -> ({}, {}) prev={:?} next={:?}",
                map_id,
                foothold.id,
                foothold.x1,
                foothold.y1,
                foothold.x2,
                foothold.y2,
                foothold.previous,
                foothold.next
            );
        }

        self.publish(footholds).map_err(|e| {
            log::error!("Map {}: refusing terrain load: {}", map_id, e);
            e
        })?;

        let report = LoadReport {
            loaded: self.terrain.len(),
            dropped: conversion.dropped,
        };
        log::info!(
            "Map {}: loaded {} footholds ({} platforms dropped)",
            map_id,
            report.loaded,
            report.dropped_count()
        );
        Ok(report)
    }

    /// Publish an empty terrain.
    pub fn clear(&mut self) {
        self.terrain = Arc::new(Terrain::empty());
    }
}
