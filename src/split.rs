//! Choosing the attribute (and threshold) to split a node on.
//!
//! For a fixed dataset the base entropy does not depend on the
//! candidate, so minimizing the conditional entropy maximizes the
//! information gain. Candidates are compared by conditional entropy
//! directly.
use serde::{Serialize, Deserialize};

use crate::sample::Dataset;
use crate::sample::dataset::entropy_of_counts;
use crate::schema::AttrId;


/// The best split found for a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// The attribute to split on.
    pub attribute: AttrId,
    /// For a continuous attribute, the last sorted position of the
    /// left partition. `None` for a discrete attribute.
    pub index: Option<usize>,
    /// The conditional entropy of the classifier given this split.
    pub entropy: f64,
}


/// Reduction of entropy achieved by a split.
#[inline]
pub fn information_gain(entropy: f64, split_entropy: f64) -> f64 {
    entropy - split_entropy
}


/// Conditional entropy of `classifier` given `attribute`.
///
/// Returns `(entropy, index)`, where `index` is the best boundary for a
/// continuous attribute and `None` for a discrete one.
/// Returns `None` if a continuous attribute takes a single value over
/// `dataset`, since no boundary can separate its examples.
///
/// # Panics
/// Panics if `dataset` is empty.
pub fn entropy_by_attribute(
    dataset:    &Dataset,
    attribute:  AttrId,
    classifier: AttrId,
) -> Option<(f64, Option<usize>)>
{
    assert!(
        !dataset.is_empty(),
        "Cannot score a split over an empty dataset"
    );

    if dataset.schema()[attribute].is_continuous() {
        continuous_entropy(dataset, attribute, classifier)
            .map(|(entropy, index)| (entropy, Some(index)))
    } else {
        Some((discrete_entropy(dataset, attribute, classifier), None))
    }
}


/// Size-weighted average entropy of the partitions
/// induced by a discrete attribute.
fn discrete_entropy(dataset: &Dataset, attribute: AttrId, classifier: AttrId)
    -> f64
{
    let total = dataset.len() as f64;
    dataset.subset_discrete(attribute)
        .into_iter()
        .map(|(_, subset)| {
            subset.len() as f64 / total * subset.entropy(classifier)
        })
        .sum::<f64>()
}


/// Scan the boundaries between adjacent sorted examples
/// whose values differ, and return the one with the lowest
/// weighted entropy. The first boundary wins ties.
fn continuous_entropy(
    dataset:    &Dataset,
    attribute:  AttrId,
    classifier: AttrId,
) -> Option<(f64, usize)>
{
    let sorted = dataset.sorted_by(attribute);
    let n_sample = sorted.len();
    let total = n_sample as f64;

    let mut right = sorted.class_counts(classifier);
    let mut left = vec![0_usize; right.len()];

    let mut best: Option<(f64, usize)> = None;
    for i in 0..n_sample.saturating_sub(1) {
        let y = sorted[i].label(classifier);
        left[y.0] += 1;
        right[y.0] -= 1;

        let here = sorted[i].number(attribute);
        let next = sorted[i + 1].number(attribute);
        if here == next { continue; }

        let lp = (i + 1) as f64 / total;
        let rp = 1f64 - lp;
        let score = lp * entropy_of_counts(&left)
            + rp * entropy_of_counts(&right);

        if best.map_or(true, |(best_score, _)| score < best_score) {
            best = Some((score, i));
        }
    }
    best
}


/// Find the attribute in `attributes` that minimizes the conditional
/// entropy of `classifier`.
///
/// Candidates are visited in the given order and the first minimal
/// one wins. Continuous attributes that cannot split `dataset` are
/// skipped; `None` means no candidate can split it.
pub fn find_split_attribute(
    dataset:    &Dataset,
    attributes: &[AttrId],
    classifier: AttrId,
) -> Option<Split>
{
    let mut best: Option<Split> = None;
    for &attribute in attributes {
        let Some((entropy, index)) = entropy_by_attribute(
            dataset, attribute, classifier
        ) else {
            continue;
        };

        if best.map_or(true, |split| entropy < split.entropy) {
            best = Some(Split { attribute, index, entropy, });
        }
    }
    best
}
