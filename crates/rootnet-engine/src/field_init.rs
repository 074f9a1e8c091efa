use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::field::{Cell, FieldGeometry, ResourceField};

/// Named field initializers.
///
/// The growth engine starts from a uniform field by default; `Random` scatters
/// resource over the field with a fixed seed so runs stay reproducible.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldInit {
    #[default]
    Uniform,
    Random {
        /// Probability that a cell bears a resource, in `[0, 1]`.
        density: f64,
        seed: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum FieldInitError {
    #[display("resource density must lie in [0, 1], got {value}")]
    Density { value: f64 },
}

impl FieldInit {
    pub fn validate(&self) -> Result<(), FieldInitError> {
        match *self {
            Self::Uniform => Ok(()),
            Self::Random { density, .. } if (0.0..=1.0).contains(&density) => Ok(()),
            Self::Random { density, .. } => Err(FieldInitError::Density { value: density }),
        }
    }

    /// Builds a field with `geometry` using this initializer.
    pub fn build(&self, geometry: FieldGeometry) -> Result<ResourceField, FieldInitError> {
        self.apply(ResourceField::new(geometry))
    }

    /// Applies this initializer to an existing field.
    pub fn apply(&self, mut field: ResourceField) -> Result<ResourceField, FieldInitError> {
        self.validate()?;
        if let Self::Random { density, seed } = *self {
            let mut rng = Pcg32::seed_from_u64(seed);
            for (_, cell) in field.cells_mut() {
                *cell = if rng.random_bool(density) {
                    Cell::RESOURCE
                } else {
                    Cell::BARREN
                };
            }
        }
        Ok(field)
    }
}
