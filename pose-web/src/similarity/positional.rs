//! Positional similarity between two coordinate vectors
//!
//! Mixes a cosine term (shape) with a normalized Euclidean term (placement).
//! Joints hidden in either vector are left out of both terms and instead
//! scale the result down by the share of joints that could be compared.

use crate::pose::CoordinateVector;

/// Near-identity tolerance for the exact-100 short-circuit
const IDENTITY_EPS: f64 = 1e-4;

/// Guards the Euclidean normalization against a zero denominator
const NORM_EPS: f64 = 1e-12;

/// Cosine and Euclidean components of one comparison
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CosAndEuc {
    /// Cosine similarity, clamped to [-1, 1]
    pub cosine: f64,
    /// Cosine mapped to 0-100, visibility-scaled
    pub cosine_score: f64,
    /// Euclidean distance over counted joints
    pub diff: f64,
    /// Distance normalized by the two magnitudes (0 = identical)
    pub norm_diff: f64,
    /// `(1 - norm_diff)` as 0-100, visibility-scaled
    pub euclid_score: f64,
    /// Share of joints visible in both vectors
    pub visibility_ratio: f64,
    /// Joints visible in exactly one of the two vectors
    pub one_sided: usize,
}

fn is_visible(triple: &[f32]) -> bool {
    triple.iter().any(|&v| v != 0.0)
}

/// Cosine and Euclidean comparison over the joints visible in both inputs.
///
/// Returns `None` for mismatched, empty or partial-triple inputs and when no
/// counted joint has any magnitude.
pub fn cos_and_euc(p1: &[f32], p2: &[f32]) -> Option<CosAndEuc> {
    let n = p1.len();
    if n != p2.len() || n == 0 || n % 3 != 0 {
        return None;
    }

    let mut dot = 0.0f64;
    let mut sum1 = 0.0f64;
    let mut sum2 = 0.0f64;
    let mut diff_sum = 0.0f64;
    let mut invisible = 0usize;
    let mut one_sided = 0usize;
    let total = n / 3;

    for (a, b) in p1.chunks_exact(3).zip(p2.chunks_exact(3)) {
        let (va, vb) = (is_visible(a), is_visible(b));
        if !va || !vb {
            invisible += 1;
            if va != vb {
                one_sided += 1;
            }
            continue;
        }

        for axis in 0..3 {
            let (x, y) = (a[axis] as f64, b[axis] as f64);
            dot += x * y;
            sum1 += x * x;
            sum2 += y * y;
            diff_sum += (x - y) * (x - y);
        }
    }

    let mag1 = sum1.sqrt();
    let mag2 = sum2.sqrt();
    if mag1 == 0.0 || mag2 == 0.0 {
        return None;
    }

    let cosine = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);
    let diff = diff_sum.sqrt();
    let norm_diff = diff / (mag1 + mag2 + NORM_EPS);
    let visibility_ratio = (total - invisible) as f64 / total as f64;

    Some(CosAndEuc {
        cosine,
        cosine_score: (cosine + 1.0) / 2.0 * 100.0 * visibility_ratio,
        diff,
        norm_diff,
        euclid_score: (1.0 - norm_diff) * 100.0 * visibility_ratio,
        visibility_ratio,
        one_sided,
    })
}

/// `lambda * cosine_score + (1 - lambda) * euclid_score`, clamped to 0-100
/// and rounded to 3 decimals.
///
/// Degenerate comparisons and a lambda outside [0, 1] score 0. Inputs that
/// agree on every joint (including which ones are hidden) score exactly 100.
pub fn mixed_score(result: Option<&CosAndEuc>, lambda: f32) -> f32 {
    let Some(r) = result else {
        return 0.0;
    };
    if !(0.0..=1.0).contains(&lambda) {
        return 0.0;
    }

    if 1.0 - r.cosine < IDENTITY_EPS && r.norm_diff < IDENTITY_EPS && r.one_sided == 0 {
        return 100.0;
    }

    let lambda = lambda as f64;
    let mixed = lambda * r.cosine_score + (1.0 - lambda) * r.euclid_score;
    ((mixed * 1000.0).round() / 1000.0).clamp(0.0, 100.0) as f32
}

/// Positional similarity (0-100) of two coordinate vectors
pub fn calculate_similarity(a: &CoordinateVector, b: &CoordinateVector, lambda: f32) -> f32 {
    let result = cos_and_euc(a.as_slice(), b.as_slice());
    if result.is_none() {
        log::debug!(
            "degenerate positional comparison ({} vs {} values), scoring 0",
            a.len(),
            b.len()
        );
    }
    mixed_score(result.as_ref(), lambda)
}
