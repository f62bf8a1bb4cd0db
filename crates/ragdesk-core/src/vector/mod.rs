//! Vector store port.

pub mod box_store;
pub mod store;

pub use box_store::BoxVectorStore;
pub use store::VectorStore;

/// Cosine distance (`1 - cosine similarity`) between two vectors.
///
/// Returns `1.0` (orthogonal) when either vector has zero magnitude or the
/// lengths differ, so degenerate vectors never rank ahead of real matches.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}
