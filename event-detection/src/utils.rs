//! Small helpers over sorted sequences and arrays.
use crate::{DetectionError, DetectionResult, Real};
use itertools::Itertools;
use ndarray::ArrayViewD;

/// True if `values` never decrease. `NaN` values make a sequence unsorted.
pub fn is_sorted(values: &[Real]) -> bool {
    values.iter().tuple_windows().all(|(a, b)| a <= b)
}

/// Merges two sorted sequences in linear time.
pub fn linear_merge<T: PartialOrd + Copy>(a: &[T], b: &[T]) -> Vec<T> {
    itertools::merge(a.iter().copied(), b.iter().copied()).collect()
}

/// Index of the element of the sorted `array` closest to `value`.
///
/// Ties resolve to the later element. Returns `None` for an empty array.
pub fn find_nearest_idx(array: &[Real], value: Real) -> Option<usize> {
    let index = array.partition_point(|&x| x < value);
    let before = index.checked_sub(1).and_then(|i| array.get(i));
    match (before, array.get(index)) {
        (Some(before), Some(after)) if (value - before).abs() < (value - after).abs() => {
            Some(index - 1)
        }
        (_, Some(_)) => Some(index),
        (Some(_), None) => Some(index - 1),
        (None, None) => None,
    }
}

/// [find_nearest_idx] for each of `values`.
pub fn find_nearest_indices(array: &[Real], values: &[Real]) -> Option<Vec<usize>> {
    values
        .iter()
        .map(|&value| find_nearest_idx(array, value))
        .collect()
}

fn is_fast_length(mut n: usize) -> bool {
    for factor in [2, 3, 5] {
        while n % factor == 0 {
            n /= factor;
        }
    }
    n == 1
}

/// Smallest `2^a 3^b 5^c` not less than `n`, for efficient FFT sizes.
///
/// Lengths below 7 are already fast and are returned as is, with a minimum of 1.
pub fn next_fast_power(n: usize) -> usize {
    if n < 7 {
        return n.max(1);
    }
    (n..).find(|&m| is_fast_length(m)).unwrap_or(n)
}

/// Flattens an array with at most one axis longer than one.
pub fn squeeze(data: ArrayViewD<'_, Real>) -> DetectionResult<Vec<Real>> {
    let long_axes = data.shape().iter().filter(|&&len| len > 1).count();
    if long_axes > 1 {
        return Err(DetectionError::NotFlat(data.shape().to_vec()));
    }
    Ok(data.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    #[test]
    fn sortedness() {
        assert!(is_sorted(&[]));
        assert!(is_sorted(&[1.0, 1.0, 2.0]));
        assert!(!is_sorted(&[1.0, 0.5]));
        assert!(!is_sorted(&[0.0, Real::NAN, 1.0]));
    }

    #[test]
    fn merge_sorted() {
        assert_eq!(
            linear_merge(&[1.0, 4.0, 5.0], &[2.0, 3.0, 6.0]),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
        );
        assert_eq!(linear_merge::<i32>(&[], &[1, 2]), vec![1, 2]);
    }

    #[test]
    fn nearest_index() {
        let array = [0.0, 1.0, 2.0, 4.0];
        assert_eq!(find_nearest_idx(&array, -3.0), Some(0));
        assert_eq!(find_nearest_idx(&array, 1.2), Some(1));
        assert_eq!(find_nearest_idx(&array, 1.5), Some(2));
        assert_eq!(find_nearest_idx(&array, 3.9), Some(3));
        assert_eq!(find_nearest_idx(&array, 10.0), Some(3));
        assert_eq!(find_nearest_idx(&[], 1.0), None);
        assert_eq!(
            find_nearest_indices(&array, &[0.1, 2.9, 3.1]),
            Some(vec![0, 2, 3])
        );
    }

    #[test]
    fn fast_lengths() {
        assert_eq!(next_fast_power(0), 1);
        assert_eq!(next_fast_power(5), 5);
        assert_eq!(next_fast_power(7), 8);
        assert_eq!(next_fast_power(11), 12);
        assert_eq!(next_fast_power(13), 15);
        assert_eq!(next_fast_power(17), 18);
        assert_eq!(next_fast_power(97), 100);
        assert_eq!(next_fast_power(1000), 1000);
    }

    #[test]
    fn squeeze_arrays() {
        let column = Array2::from_shape_vec((3, 1), vec![1.0, 2.0, 3.0]).expect("array");
        assert_eq!(squeeze(column.view().into_dyn()), Ok(vec![1.0, 2.0, 3.0]));

        let cube = Array3::<Real>::zeros((1, 3, 1));
        assert_eq!(squeeze(cube.view().into_dyn()), Ok(vec![0.0; 3]));

        let matrix = Array2::<Real>::zeros((2, 2));
        assert_eq!(
            squeeze(matrix.view().into_dyn()),
            Err(DetectionError::NotFlat(vec![2, 2]))
        );
    }
}
