//! Pairwise interaction rule: type x type matrix, two-zone radial force law.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::system::ParticleSystem;

/// The force rule shared by the whole population.
///
/// `matrix[i][j]` is the influence type `j` exerts on type `i`. The matrix
/// is deliberately asymmetric: type 0 chasing type 1 while type 1 flees is
/// exactly the `matrix[0][1] > 0 > matrix[1][0]` configuration.
///
/// Two distance zones, both with linear interpolation:
/// - below `min_range` every pair repels regardless of type, so particles
///   never fully overlap no matter how the matrix is tuned;
/// - between `min_range` and `max_range` the matrix coefficient applies
///   with linear falloff, reaching zero at `max_range`.
///
/// Beyond `max_range` a pair contributes nothing.
#[derive(Debug, Clone)]
pub struct InteractionRules {
    /// Row-major `num_types` x `num_types` coefficients.
    matrix: Vec<f32>,
    num_types: usize,
    min_range: f32,
    max_range: f32,
    global_strength: f32,
}

impl InteractionRules {
    /// Build rules from a row-major matrix given as rows.
    ///
    /// Errors if the matrix is not square or the ranges violate
    /// `0 <= min_range < max_range`.
    pub fn new(rows: Vec<Vec<f32>>, min_range: f32, max_range: f32) -> Result<Self> {
        let num_types = rows.len();
        let mut matrix = Vec::with_capacity(num_types * num_types);
        for row in &rows {
            if row.len() != num_types {
                return Err(Error::NonSquareMatrix {
                    rows: num_types,
                    cols: row.len(),
                });
            }
            matrix.extend_from_slice(row);
        }
        check_ranges(min_range, max_range)?;
        Ok(Self {
            matrix,
            num_types,
            min_range,
            max_range,
            global_strength: 1.0,
        })
    }

    /// Number of particle types (matrix dimension).
    pub fn num_types(&self) -> usize {
        self.num_types
    }

    /// Influence of type `source` on type `target`.
    #[inline]
    pub fn coefficient(&self, target: usize, source: usize) -> f32 {
        self.matrix[target * self.num_types + source]
    }

    pub fn min_range(&self) -> f32 {
        self.min_range
    }

    pub fn max_range(&self) -> f32 {
        self.max_range
    }

    pub fn global_strength(&self) -> f32 {
        self.global_strength
    }

    /// Replace the global force multiplier. Takes effect on the next
    /// force computation; no bounds are enforced.
    pub fn set_global_strength(&mut self, value: f32) {
        self.global_strength = value;
    }

    /// Replace both ranges atomically, rejecting invalid orderings.
    pub fn set_ranges(&mut self, min_range: f32, max_range: f32) -> Result<()> {
        check_ranges(min_range, max_range)?;
        self.min_range = min_range;
        self.max_range = max_range;
        Ok(())
    }

    /// Force contribution of one unordered pair, or `None` when the pair is
    /// out of range or exactly coincident (direction undefined at zero
    /// distance, so the pair is skipped rather than resolved arbitrarily).
    ///
    /// Returns `(force_on_i, force_on_j)`. The two legs look up the matrix
    /// with swapped indices, which is where the asymmetry comes from.
    #[inline]
    fn pair_forces(
        &self,
        pos_i: Vec2,
        kind_i: usize,
        pos_j: Vec2,
        kind_j: usize,
    ) -> Option<(Vec2, Vec2)> {
        let delta = pos_j - pos_i;
        let dist = delta.length();
        if dist == 0.0 || dist > self.max_range {
            return None;
        }
        let direction = delta / dist;

        if dist < self.min_range {
            // Core repulsion: type-independent, 1 at zero distance, 0 at
            // min_range.
            let core = (self.min_range - dist) / self.min_range;
            let f = core * self.global_strength * direction;
            Some((-f, f))
        } else {
            // Matrix-driven zone: linear falloff from 1 at min_range to 0
            // at max_range.
            let falloff = 1.0 - (dist - self.min_range) / (self.max_range - self.min_range);
            let f_i = self.coefficient(kind_i, kind_j) * falloff * self.global_strength * direction;
            let f_j = -self.coefficient(kind_j, kind_i) * falloff * self.global_strength * direction;
            Some((f_i, f_j))
        }
    }

    fn check_types(&self, system: &ParticleSystem) -> Result<()> {
        for p in system.particles() {
            if p.kind >= self.num_types {
                return Err(Error::TypeOutOfRange {
                    found: p.kind,
                    num_types: self.num_types,
                });
            }
        }
        Ok(())
    }

    /// Compute the net force on every particle, one vector per particle in
    /// population order.
    ///
    /// Brute force O(n^2) over unordered pairs; each pair {i, j} is visited
    /// exactly once and both legs are accumulated together. Errors if any
    /// particle type falls outside the matrix.
    pub fn compute_forces(&self, system: &ParticleSystem) -> Result<Vec<Vec2>> {
        let particles = system.particles();
        let n = particles.len();
        let mut forces = vec![Vec2::ZERO; n];
        if n == 0 {
            return Ok(forces);
        }
        self.check_types(system)?;

        for i in 0..n {
            let pi = particles[i].position;
            let ki = particles[i].kind;
            for j in (i + 1)..n {
                if let Some((f_i, f_j)) =
                    self.pair_forces(pi, ki, particles[j].position, particles[j].kind)
                {
                    forces[i] += f_i;
                    forces[j] += f_j;
                }
            }
        }
        Ok(forces)
    }

    /// Parallel variant of [`compute_forces`](Self::compute_forces).
    ///
    /// Splits the outer pair loop across rayon workers, each accumulating
    /// into a thread-local buffer, and sums the buffers afterwards. Pair
    /// enumeration and the force law are identical to the sequential loop,
    /// but the summation order is not, so results agree with the sequential
    /// reference only up to floating-point reassociation, not bit-exactly.
    pub fn compute_forces_par(&self, system: &ParticleSystem) -> Result<Vec<Vec2>> {
        let particles = system.particles();
        let n = particles.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        self.check_types(system)?;

        let forces = (0..n)
            .into_par_iter()
            .fold(
                || vec![Vec2::ZERO; n],
                |mut acc, i| {
                    let pi = particles[i].position;
                    let ki = particles[i].kind;
                    for j in (i + 1)..n {
                        if let Some((f_i, f_j)) =
                            self.pair_forces(pi, ki, particles[j].position, particles[j].kind)
                        {
                            acc[i] += f_i;
                            acc[j] += f_j;
                        }
                    }
                    acc
                },
            )
            .reduce(
                || vec![Vec2::ZERO; n],
                |mut a, b| {
                    for (out, contribution) in a.iter_mut().zip(b) {
                        *out += contribution;
                    }
                    a
                },
            );
        Ok(forces)
    }
}

fn check_ranges(min_range: f32, max_range: f32) -> Result<()> {
    if min_range < 0.0 || max_range <= min_range {
        return Err(Error::InvalidRanges {
            min: min_range,
            max: max_range,
        });
    }
    Ok(())
}

/// Default rule set producing visible clustering structures.
///
/// For four types this is a hand-tuned matrix; for any other count the
/// matrix is drawn uniformly from [-1, 1) with a mildly self-attracting
/// diagonal, from a fixed seed so the default is reproducible.
pub fn default_rules(num_types: usize) -> Result<InteractionRules> {
    let rows = if num_types == 4 {
        vec![
            vec![0.6, -0.8, 0.3, -0.2],
            vec![-0.5, 0.6, -0.7, 0.1],
            vec![0.2, -0.4, 0.6, -0.6],
            vec![-0.3, 0.1, -0.5, 0.6],
        ]
    } else {
        let mut rng = StdRng::seed_from_u64(0);
        (0..num_types)
            .map(|i| {
                (0..num_types)
                    .map(|j| if i == j { 0.5 } else { rng.gen_range(-1.0..1.0) })
                    .collect()
            })
            .collect()
    };
    InteractionRules::new(rows, 5.0, 120.0)
}
