//! The distance kernel shared by build and query paths.
//!
//! Squared Euclidean distance is monotone in the true Euclidean distance, so
//! neighbour rankings agree while the square root is skipped. Every distance
//! in the crate goes through this one kernel so build-time and query-time
//! comparisons use identical arithmetic and reduction order.

/// Computes the squared Euclidean distance between two equal-length vectors.
///
/// Callers validate dimensions at the API boundary; mismatched slices are a
/// logic error and only checked in debug builds.
///
/// # Examples
/// ```
/// use fenestra_core::squared_euclidean;
///
/// let d = squared_euclidean(&[0.0, 3.0], &[4.0, 0.0]);
/// assert_eq!(d, 25.0);
/// ```
#[inline]
#[must_use]
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "distance operands must share dimension");
    let mut total = 0.0_f32;
    for (x, y) in a.iter().zip(b.iter()) {
        let delta = x - y;
        total += delta * delta;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::identical(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], 0.0)]
    #[case::unit_apart(&[0.0], &[1.0], 1.0)]
    #[case::pythagorean(&[0.0, 0.0], &[3.0, 4.0], 25.0)]
    fn computes_expected_distance(#[case] a: &[f32], #[case] b: &[f32], #[case] expected: f32) {
        assert_eq!(squared_euclidean(a, b), expected);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = [0.5, -1.5, 2.0];
        let b = [1.0, 0.25, -3.0];
        assert_eq!(squared_euclidean(&a, &b), squared_euclidean(&b, &a));
    }
}
