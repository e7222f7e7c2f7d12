//! Seam for learned image embeddings.
//!
//! This crate never runs a model. Callers hand in an [`EmbeddingProvider`]
//! and the vectors it returns are attached to each side's image, where the
//! advanced scorer picks them up.

use crate::core::decode::FastDecoder;
use crate::core::object::MeasurableObject;
use crate::core::side::{Side, SideMap};
use crate::error::EmbeddingError;
use image::DynamicImage;
use rayon::prelude::*;
use tracing::debug;

/// Turns one photograph into a fixed-length feature vector
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a decoded image
    fn embed(&self, image: &DynamicImage) -> Result<Vec<f32>, EmbeddingError>;

    /// Human-readable model identifier
    fn model_name(&self) -> &str;
}

/// Decode all six views of `object`, embed them and attach the vectors.
///
/// Nothing is attached unless every side succeeds.
pub fn embed_object(provider: &dyn EmbeddingProvider, object: &mut MeasurableObject) -> Result<(), EmbeddingError> {
    let vectors: Vec<(Side, Vec<f32>)> = Side::ALL
        .par_iter()
        .map(|&side| {
            let image = FastDecoder::decode(object.image(side).path())
                .map_err(|source| EmbeddingError::View { side, source })?;
            let vector = provider
                .embed(&image)
                .map_err(|e| EmbeddingError::Provider {
                    side,
                    reason: e.to_string(),
                })?;
            Ok((side, vector))
        })
        .collect::<Result<_, EmbeddingError>>()?;

    let mut embeddings: SideMap<Vec<f32>> = SideMap::default();
    for (side, vector) in vectors {
        embeddings[side] = vector;
    }
    for side in Side::ALL {
        let vector = std::mem::take(&mut embeddings[side]);
        object.attach_embedding(side, vector);
    }

    debug!(id = object.id(), model = provider.model_name(), "attached embeddings");
    Ok(())
}
