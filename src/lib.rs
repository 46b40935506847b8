//! Favourite places: a place store with remote enrichment, an image cache,
//! and the map synchronization engine behind the map screen.
//!
//! The presentation layer lives outside this crate. It sends intents as
//! Bevy messages and reads state back from resources.

pub mod assets;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod geocoding;
pub mod map;
pub mod net;
pub mod paths;
pub mod places;

#[cfg(test)]
mod test_support;

use bevy::app::PluginGroupBuilder;
use bevy::prelude::*;

/// Every plugin the app needs, in dependency order.
pub struct FavouritePlacesPlugins;

impl PluginGroup for FavouritePlacesPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(config::ConfigPlugin)
            .add(places::PlacesPlugin)
            .add(geocoding::GeocodingPlugin)
            .add(assets::AssetsPlugin)
            .add(map::MapPlugin)
    }
}
