//! The attribute axis: sorted attribute values plus the permutation back to
//! original ids.

/// Sorted attribute values and the `sorted id -> original id` permutation
/// produced when the corpus was laid out.
#[derive(Clone, Debug)]
pub(crate) struct AttributeAxis {
    values: Vec<f32>,
    decode: Vec<usize>,
}

impl AttributeAxis {
    pub(crate) fn new(values: Vec<f32>, decode: Vec<usize>) -> Self {
        debug_assert_eq!(values.len(), decode.len());
        debug_assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
        Self { values, decode }
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    /// Smallest index whose attribute is `>= value`; `len()` when none is.
    pub(crate) fn lower_bound(&self, value: f32) -> usize {
        self.values.partition_point(|&attr| attr < value)
    }

    pub(crate) fn value(&self, sorted_id: usize) -> f32 {
        self.values[sorted_id]
    }

    pub(crate) fn first(&self) -> f32 {
        self.values[0]
    }

    pub(crate) fn last(&self) -> f32 {
        self.values[self.values.len() - 1]
    }

    /// Maps a sorted id back to the corpus-order id it came from.
    pub(crate) fn map_out(&self, sorted_id: usize) -> usize {
        self.decode[sorted_id]
    }

    pub(crate) fn values(&self) -> &[f32] {
        &self.values
    }

    pub(crate) fn decode(&self) -> &[usize] {
        &self.decode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn axis() -> AttributeAxis {
        AttributeAxis::new(vec![1.0, 3.0, 3.0, 7.0], vec![2, 0, 3, 1])
    }

    #[rstest]
    #[case::below_all(0.0, 0)]
    #[case::exact_first(1.0, 0)]
    #[case::between(2.0, 1)]
    #[case::duplicate_hits_first(3.0, 1)]
    #[case::exact_last(7.0, 3)]
    #[case::above_all(8.0, 4)]
    fn lower_bound_finds_first_at_or_above(#[case] value: f32, #[case] expected: usize) {
        assert_eq!(axis().lower_bound(value), expected);
    }

    #[test]
    fn lower_bound_handles_infinite_probes() {
        let axis = axis();
        assert_eq!(axis.lower_bound(f32::NEG_INFINITY), 0);
        assert_eq!(axis.lower_bound(f32::INFINITY), axis.len());
    }

    #[test]
    fn map_out_follows_decode() {
        let axis = axis();
        assert_eq!(axis.map_out(0), 2);
        assert_eq!(axis.map_out(3), 1);
    }
}
