use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core.
///
/// Configuration errors (`NonSquareMatrix`, `InvalidRanges`) surface at
/// construction or setter time; the remaining variants are contract
/// violations surfaced by the offending call. None of them are recoverable
/// mid-step, so callers are expected to treat them as fatal.
#[derive(Debug, Error)]
pub enum Error {
    /// The interaction matrix is not square.
    #[error("interaction matrix must be square, got {rows} rows with a row of length {cols}")]
    NonSquareMatrix { rows: usize, cols: usize },

    /// Interaction ranges violate `0 <= min_range < max_range`.
    #[error("invalid interaction ranges: need 0 <= min < max, got min={min}, max={max}")]
    InvalidRanges { min: f32, max: f32 },

    /// A particle carries a type index outside the interaction matrix.
    #[error("particle type {found} out of range for {num_types} configured types")]
    TypeOutOfRange { found: usize, num_types: usize },

    /// The force buffer handed to integration does not match the population.
    #[error("force buffer holds {got} entries but the system holds {expected} particles")]
    ForceCountMismatch { expected: usize, got: usize },

    /// Boundary geometry with non-positive extent (wrap needs a real span).
    #[error("degenerate bounds: {0}")]
    DegenerateBounds(String),
}
