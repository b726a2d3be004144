//! Weighted species draw.
//!
//! Each species is weighted by the inverse of its point value, so valuable
//! species turn up less often. The cumulative distribution is computed once
//! when the draw is built; each sample is then a single binary search.

use rand::Rng;

use super::species::{Species, SpeciesCatalog};

/// Errors raised while building a [`CaptureDraw`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureDrawError {
    /// A draw needs at least one species.
    #[error("species catalog is empty")]
    EmptyCatalog,
    /// Inverse weighting is undefined for zero or negative points.
    #[error("species {species} has non-positive points ({points})")]
    NonPositivePoints { species: String, points: i64 },
    /// Point values must fit the weighting arithmetic.
    #[error("species {species} has too many points ({points})")]
    PointsOutOfRange { species: String, points: i64 },
}

#[derive(Debug, Clone)]
struct Outcome {
    species: Species,
    probability: f64,
    upper_bound: f64,
}

/// Precomputed cumulative-probability table over a species catalog.
#[derive(Debug, Clone)]
pub struct CaptureDraw {
    outcomes: Vec<Outcome>,
    fallback: Species,
}

impl CaptureDraw {
    /// Build the draw table for `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureDrawError`] when the catalog is empty or a species has
    /// a point value that cannot be inverse-weighted.
    pub fn new(catalog: &SpeciesCatalog) -> Result<Self, CaptureDrawError> {
        let weights = catalog
            .iter()
            .map(|species| inverse_weight(species).map(|weight| (species.clone(), weight)))
            .collect::<Result<Vec<_>, _>>()?;

        let Some((fallback, _)) = weights.last().cloned() else {
            return Err(CaptureDrawError::EmptyCatalog);
        };
        let total: f64 = weights.iter().map(|(_, weight)| weight).sum();

        let mut cumulative = 0.0;
        let mut outcomes: Vec<Outcome> = weights
            .into_iter()
            .map(|(species, weight)| {
                let probability = weight / total;
                cumulative += probability;
                Outcome {
                    species,
                    probability,
                    upper_bound: cumulative,
                }
            })
            .collect();

        // The last species absorbs any rounding remainder so every sample in
        // [0, 1) lands somewhere.
        if let Some(last) = outcomes.last_mut() {
            last.upper_bound = 1.0;
        }

        Ok(Self { outcomes, fallback })
    }

    /// Draw one species using the thread-local RNG.
    pub fn draw(&self) -> &Species {
        self.draw_with(&mut rand::rng())
    }

    /// Draw one species using the supplied RNG.
    pub fn draw_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &Species {
        let sample: f64 = rng.random();
        let index = self
            .outcomes
            .partition_point(|outcome| outcome.upper_bound < sample);
        self.outcomes
            .get(index)
            .map_or(&self.fallback, |outcome| &outcome.species)
    }

    /// Probability of drawing `name`, or `None` for unknown species.
    pub fn probability(&self, name: &str) -> Option<f64> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.species.name() == name)
            .map(|outcome| outcome.probability)
    }

    /// Species paired with their draw probability, in catalog order.
    pub fn odds(&self) -> impl Iterator<Item = (&Species, f64)> {
        self.outcomes
            .iter()
            .map(|outcome| (&outcome.species, outcome.probability))
    }
}

fn inverse_weight(species: &Species) -> Result<f64, CaptureDrawError> {
    let points = species.points();
    if points <= 0 {
        return Err(CaptureDrawError::NonPositivePoints {
            species: species.name().to_owned(),
            points,
        });
    }
    let exact = i32::try_from(points).map_err(|_| CaptureDrawError::PointsOutOfRange {
        species: species.name().to_owned(),
        points,
    })?;
    Ok(1.0 / f64::from(exact))
}
