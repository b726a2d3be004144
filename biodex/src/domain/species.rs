//! Species catalog and the Catch of the Day bonus.
//!
//! The catalog is a fixed, ordered table compiled into the binary. Its order
//! matters: the capture draw walks species in declaration order.

use std::fmt;

use serde::Serialize;

/// Multiplier applied to the featured species' points.
pub const CATCH_OF_THE_DAY_MULTIPLIER: i64 = 3;

/// A collectable species and the points awarded for capturing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Species {
    name: &'static str,
    points: i64,
}

impl Species {
    const fn new(name: &'static str, points: i64) -> Self {
        Self { name, points }
    }

    /// Catalog key, as declared.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Base points awarded for a capture.
    pub fn points(&self) -> i64 {
        self.points
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

const STANDARD_SPECIES: [Species; 8] = [
    Species::new("Grass", 5),
    Species::new("Tree", 10),
    Species::new("Flower", 20),
    Species::new("Mushroom", 50),
    Species::new("Butterfly", 100),
    Species::new("Frog", 200),
    Species::new("Fox", 500),
    Species::new("Owl", 1000),
];

/// Ordered mapping of species name to point value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesCatalog {
    species: Vec<Species>,
}

impl SpeciesCatalog {
    /// The eight species shipped with the game.
    pub fn standard() -> Self {
        Self {
            species: STANDARD_SPECIES.to_vec(),
        }
    }

    /// Species in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    /// Number of species in the catalog.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Whether the catalog has no species.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Look up a species by its exact name.
    pub fn get(&self, name: &str) -> Option<&Species> {
        self.species.iter().find(|species| species.name == name)
    }

    /// Point value for `name`, if the species exists.
    pub fn points_for(&self, name: &str) -> Option<i64> {
        self.get(name).map(Species::points)
    }

    #[cfg(test)]
    pub(crate) fn from_entries(entries: &[(&'static str, i64)]) -> Self {
        Self {
            species: entries
                .iter()
                .map(|&(name, points)| Species::new(name, points))
                .collect(),
        }
    }
}

impl Default for SpeciesCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Species featured today; captures of it award bonus points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchOfTheDay {
    species: Species,
}

impl CatchOfTheDay {
    /// Feature `name` from `catalog`, or `None` if it is not a known species.
    pub fn select(catalog: &SpeciesCatalog, name: &str) -> Option<Self> {
        catalog.get(name).cloned().map(|species| Self { species })
    }

    /// The featured species.
    pub fn species(&self) -> &Species {
        &self.species
    }

    /// Points a capture of `species` is worth given this feature.
    pub fn award_for(&self, species: &Species) -> i64 {
        if species.name() == self.species.name() {
            species.points().saturating_mul(CATCH_OF_THE_DAY_MULTIPLIER)
        } else {
            species.points()
        }
    }
}

/// Points awarded for `species`, applying the optional featured bonus.
pub fn award_points(species: &Species, catch_of_the_day: Option<&CatchOfTheDay>) -> i64 {
    catch_of_the_day.map_or(species.points(), |featured| featured.award_for(species))
}
