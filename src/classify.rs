//! Map a model's probability vector to its most likely class names

use crate::error::{PipelineError, Result};
use crate::labels::ClassNames;
use std::cmp::Ordering;

/// The `k` most probable class names, most probable first. Equal
/// probabilities keep ascending index order; NaN ranks below everything.
pub fn top_k<'a>(predictions: &[f64], classes: &'a ClassNames, k: usize) -> Result<Vec<&'a str>> {
    if predictions.len() != classes.len() {
        return Err(PipelineError::IndexOutOfRange {
            predictions: predictions.len(),
            classes: classes.len(),
        });
    }

    let mut indices: Vec<usize> = (0..predictions.len()).collect();
    indices.sort_by(|&a, &b| descending(predictions[a], predictions[b]).then(a.cmp(&b)));

    indices
        .into_iter()
        .take(k)
        .map(|i| {
            // Unreachable after the length check, kept instead of indexing
            classes.get(i).ok_or(PipelineError::IndexOutOfRange {
                predictions: predictions.len(),
                classes: classes.len(),
            })
        })
        .collect()
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abcde() -> ClassNames {
        ClassNames::new(["a", "b", "c", "d", "e"])
    }

    #[test]
    fn ties_break_by_ascending_index() {
        let classes = abcde();
        let preds = [0.1, 0.5, 0.05, 0.3, 0.05];
        assert_eq!(top_k(&preds, &classes, 3).unwrap(), vec!["b", "d", "a"]);
        assert_eq!(
            top_k(&preds, &classes, 5).unwrap(),
            vec!["b", "d", "a", "c", "e"]
        );
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = top_k(&[0.1, 0.2, 0.3, 0.4], &abcde(), 3).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::IndexOutOfRange { predictions: 4, classes: 5 }
        ));
    }

    #[test]
    fn k_larger_than_class_count() {
        let classes = ClassNames::new(["x", "y"]);
        assert_eq!(top_k(&[0.2, 0.8], &classes, 5).unwrap(), vec!["y", "x"]);
    }

    #[test]
    fn nan_ranks_last() {
        let preds = [f64::NAN, 0.0, 0.7, f64::NAN, 0.3];
        assert_eq!(
            top_k(&preds, &abcde(), 5).unwrap(),
            vec!["c", "e", "b", "a", "d"]
        );
    }

    #[test]
    fn zero_k_is_empty() {
        assert!(top_k(&[0.1; 5], &abcde(), 0).unwrap().is_empty());
    }

    #[test]
    fn negative_zero_ties_with_zero() {
        let classes = ClassNames::new(["a", "b"]);
        assert_eq!(top_k(&[-0.0, 0.0], &classes, 2).unwrap(), vec!["a", "b"]);
    }
}
