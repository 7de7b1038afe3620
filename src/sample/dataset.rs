use std::sync::Arc;
use std::ops::Index;

use crate::error::{Id3Error, Result};
use crate::schema::{AttrId, Schema, ValueId};
use super::example::Example;


/// Shannon entropy (base 2) of a class histogram.
/// Empty classes contribute nothing; an empty histogram has entropy `0`.
pub(crate) fn entropy_of_counts(counts: &[usize]) -> f64 {
    let total = counts.iter().sum::<usize>();
    if total == 0 { return 0f64; }

    let total = total as f64;
    counts.iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum::<f64>()
}


/// An ordered sequence of examples read against a common [`Schema`].
///
/// Examples are shared between a dataset and every dataset derived
/// from it by partitioning; they are never copied or modified.
/// Every example is read against the dataset's schema.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    schema: Arc<Schema>,
    examples: Vec<Arc<Example>>,
}

impl Dataset {
    /// Construct an empty dataset.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema, examples: Vec::new(), }
    }

    /// Construct a dataset over already shared examples.
    /// Fails if any example was read against another schema.
    pub fn from_examples(schema: Arc<Schema>, examples: Vec<Arc<Example>>)
        -> Result<Self>
    {
        let dataset = Self { schema, examples: Vec::new(), };
        for example in examples.iter() {
            dataset.check_schema(example)?;
        }
        Ok(Self { examples, ..dataset })
    }

    /// Append an example.
    /// Fails if `example` was read against another schema.
    pub fn push(&mut self, example: Example) -> Result<()> {
        self.check_schema(&example)?;
        self.examples.push(Arc::new(example));
        Ok(())
    }

    /// Schemas are compared by identity first, then by content.
    fn check_schema(&self, example: &Example) -> Result<()> {
        let schema = example.schema();
        if Arc::ptr_eq(schema, &self.schema) || **schema == *self.schema {
            return Ok(());
        }
        let expected = self.schema.attributes()
            .iter()
            .map(|attr| attr.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Err(Id3Error::SchemaMismatch { expected, })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the number of examples.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Returns `true` if `self.len()` is equals to `0`.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Example> {
        self.examples.get(index).map(|ex| &**ex)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Example> {
        self.examples.iter().map(|ex| &**ex)
    }

    pub fn examples(&self) -> &[Arc<Example>] {
        &self.examples[..]
    }

    /// A new dataset over the examples selected by `pred`.
    fn filter<F>(&self, pred: F) -> Self
        where F: Fn(&Example) -> bool
    {
        let examples = self.examples.iter()
            .filter(|&ex| pred(ex))
            .cloned()
            .collect::<Vec<_>>();
        Self { schema: Arc::clone(&self.schema), examples, }
    }

    /// Number of examples per classifier value,
    /// indexed by [`ValueId`].
    pub(crate) fn class_counts(&self, classifier: AttrId) -> Vec<usize> {
        let n_values = self.schema[classifier].values().len();
        let mut counts = vec![0_usize; n_values];
        for ex in self.examples.iter() {
            counts[ex.label(classifier).0] += 1;
        }
        counts
    }

    /// Entropy of the classifier distribution over this dataset.
    /// `0` means every example shares one classifier value;
    /// an empty dataset also has entropy `0`.
    pub fn entropy(&self, classifier: AttrId) -> f64 {
        entropy_of_counts(&self.class_counts(classifier))
    }

    /// Partition the dataset by `attribute`.
    ///
    /// - Discrete `attribute`: one dataset per legal value,
    ///   in declaration order. `index` is ignored.
    /// - Continuous `attribute`: two datasets, the sorted positions
    ///   `[0, index]` and `[index + 1, len)`. See
    ///   [`Dataset::split_at_boundary`].
    ///
    /// # Panics
    /// Panics if `attribute` is continuous and `index` is `None`
    /// or leaves the right partition empty.
    pub fn subset(&self, attribute: AttrId, index: Option<usize>)
        -> Vec<Dataset>
    {
        if self.schema[attribute].is_continuous() {
            let index = index.unwrap_or_else(|| {
                panic!(
                    "Splitting on the continuous attribute `{}` \
                    requires a boundary index",
                    self.schema[attribute].name()
                )
            });
            let (left, right) = self.split_at_boundary(attribute, index);
            vec![left, right]
        } else {
            self.subset_discrete(attribute)
                .into_iter()
                .map(|(_, subset)| subset)
                .collect()
        }
    }

    /// One `(value, subset)` pair per legal value of a discrete
    /// attribute, in declaration order. Subsets may be empty.
    pub fn subset_discrete(&self, attribute: AttrId)
        -> Vec<(ValueId, Dataset)>
    {
        let n_values = self.schema[attribute].values().len();
        (0..n_values).map(ValueId)
            .map(|value| {
                let subset = self.filter(|ex| ex.label(attribute) == value);
                (value, subset)
            })
            .collect()
    }

    /// A new dataset with the examples sorted ascending by
    /// the continuous `attribute`. The sort is stable;
    /// `self` keeps its order.
    pub fn sorted_by(&self, attribute: AttrId) -> Self {
        let mut examples = self.examples.clone();
        examples.sort_by(|a, b| {
            a.number(attribute).total_cmp(&b.number(attribute))
        });
        Self { schema: Arc::clone(&self.schema), examples, }
    }

    /// Sort by `attribute` and split into the sorted positions
    /// `[0, index]` and `[index + 1, len)`.
    ///
    /// # Panics
    /// Panics if `index + 1 >= self.len()`.
    pub fn split_at_boundary(&self, attribute: AttrId, index: usize)
        -> (Self, Self)
    {
        assert!(
            index + 1 < self.len(),
            "The boundary {index} leaves the right partition empty \
            (dataset size is {})",
            self.len()
        );
        let mut left = self.sorted_by(attribute);
        let right = left.examples.split_off(index + 1);
        let right = Self { schema: Arc::clone(&self.schema), examples: right, };
        (left, right)
    }

    /// The most frequent classifier value.
    ///
    /// Values are scanned in sorted label order.
    /// Returns `None` for an empty dataset, and also when two or more
    /// values tie for the maximum unless `is_root` is `true`;
    /// at the root the first tied value (in sorted order) is returned.
    pub fn majority(&self, classifier: AttrId, is_root: bool)
        -> Option<ValueId>
    {
        if self.is_empty() { return None; }

        let counts = self.class_counts(classifier);
        let sorted = self.schema[classifier].sorted_values();

        let max = sorted.iter()
            .map(|v| counts[v.0])
            .max()?;
        let n_tied = sorted.iter()
            .filter(|v| counts[v.0] == max)
            .count();

        if !is_root && n_tied > 1 { return None; }

        sorted.into_iter()
            .find(|v| counts[v.0] == max)
    }

    /// Returns `true` if exactly one classifier value occurs.
    ///
    /// # Panics
    /// Panics if the dataset is empty.
    pub fn is_well_classified(&self, classifier: AttrId) -> bool {
        assert!(
            !self.is_empty(),
            "Purity is undefined for an empty dataset"
        );
        self.class_counts(classifier)
            .into_iter()
            .filter(|&c| c > 0)
            .count() == 1
    }
}

impl Index<usize> for Dataset {
    type Output = Example;
    fn index(&self, index: usize) -> &Self::Output {
        &self.examples[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Attribute;
    use approx::assert_relative_eq;

    const TEMP: AttrId = AttrId(0);
    const OUTLOOK: AttrId = AttrId(1);
    const PLAY: AttrId = AttrId(2);

    fn dataset(rows: &[[&str; 3]]) -> Dataset {
        let schema = Schema::new(vec![
            Attribute::continuous("Temp"),
            Attribute::discrete("Outlook", ["Sunny", "Rain", "Overcast"]),
            Attribute::discrete("Play", ["Yes", "No"]),
        ]).unwrap();
        let schema = Arc::new(schema);
        let mut data = Dataset::new(Arc::clone(&schema));
        for (i, row) in rows.iter().enumerate() {
            data.push(Example::parse(row, &schema, "test", i + 1).unwrap())
                .unwrap();
        }
        data
    }

    fn temps(data: &Dataset) -> Vec<f64> {
        data.iter().map(|ex| ex.number(TEMP)).collect()
    }

    #[test]
    fn entropy_of_empty_is_zero() {
        let data = dataset(&[]);
        assert_eq!(data.entropy(PLAY), 0f64);
    }

    #[test]
    fn entropy_of_even_split_is_one() {
        let data = dataset(&[
            ["70", "Sunny", "Yes"],
            ["71", "Rain", "No"],
        ]);
        assert_relative_eq!(data.entropy(PLAY), 1f64);
    }

    #[test]
    fn entropy_matches_hand_computation() {
        let data = dataset(&[
            ["70", "Sunny", "Yes"],
            ["71", "Sunny", "Yes"],
            ["72", "Rain", "No"],
        ]);
        let p = 2f64 / 3f64;
        let q = 1f64 / 3f64;
        let expected = -p * p.log2() - q * q.log2();
        assert_relative_eq!(data.entropy(PLAY), expected);
    }

    #[test]
    fn discrete_subset_is_lossless() {
        let data = dataset(&[
            ["70", "Sunny", "Yes"],
            ["71", "Overcast", "Yes"],
            ["72", "Rain", "No"],
            ["73", "Sunny", "No"],
        ]);
        let subsets = data.subset(OUTLOOK, None);
        let sizes = subsets.iter().map(|s| s.len()).collect::<Vec<_>>();
        assert_eq!(sizes, [2, 1, 1]);
        assert_eq!(sizes.iter().sum::<usize>(), data.len());
        for (value, subset) in data.subset_discrete(OUTLOOK) {
            assert!(subset.iter().all(|ex| ex.label(OUTLOOK) == value));
        }
    }

    #[test]
    fn discrete_subset_keeps_empty_partitions() {
        let data = dataset(&[["70", "Sunny", "Yes"]]);
        let subsets = data.subset(OUTLOOK, None);
        assert_eq!(subsets.len(), 3);
        assert!(subsets[1].is_empty() && subsets[2].is_empty());
    }

    #[test]
    fn continuous_subset_sorts_a_copy() {
        let data = dataset(&[
            ["85", "Rain", "No"],
            ["70", "Sunny", "Yes"],
            ["75", "Sunny", "Yes"],
        ]);
        let subsets = data.subset(TEMP, Some(0));
        assert_eq!(subsets.len(), 2);
        assert_eq!(temps(&subsets[0]), [70f64]);
        assert_eq!(temps(&subsets[1]), [75f64, 85f64]);
        // `data` keeps its order.
        assert_eq!(temps(&data), [85f64, 70f64, 75f64]);
    }

    #[test]
    #[should_panic]
    fn continuous_subset_rejects_empty_right_side() {
        let data = dataset(&[
            ["70", "Sunny", "Yes"],
            ["75", "Sunny", "Yes"],
        ]);
        data.subset(TEMP, Some(1));
    }

    #[test]
    fn majority_picks_most_frequent() {
        let data = dataset(&[
            ["70", "Sunny", "No"],
            ["71", "Sunny", "Yes"],
            ["72", "Rain", "No"],
        ]);
        let no = data.schema()[PLAY].value_id("No").unwrap();
        assert_eq!(data.majority(PLAY, false), Some(no));
        assert_eq!(data.majority(PLAY, true), Some(no));
    }

    #[test]
    fn majority_tie_depends_on_root() {
        let data = dataset(&[
            ["70", "Sunny", "Yes"],
            ["72", "Rain", "No"],
        ]);
        // "No" < "Yes" in sorted order.
        let no = data.schema()[PLAY].value_id("No").unwrap();
        assert_eq!(data.majority(PLAY, false), None);
        assert_eq!(data.majority(PLAY, true), Some(no));
    }

    #[test]
    fn majority_of_empty_is_none() {
        let data = dataset(&[]);
        assert_eq!(data.majority(PLAY, true), None);
    }

    #[test]
    fn purity_agrees_with_entropy() {
        let pure = dataset(&[
            ["70", "Sunny", "Yes"],
            ["80", "Rain", "Yes"],
        ]);
        assert!(pure.is_well_classified(PLAY));
        assert_eq!(pure.entropy(PLAY), 0f64);

        let mixed = dataset(&[
            ["70", "Sunny", "Yes"],
            ["80", "Rain", "No"],
        ]);
        assert!(!mixed.is_well_classified(PLAY));
        assert!(mixed.entropy(PLAY) > 0f64);
    }

    #[test]
    #[should_panic]
    fn purity_of_empty_panics() {
        dataset(&[]).is_well_classified(PLAY);
    }

    fn play(labels: &[&str]) -> Arc<Schema> {
        let schema = Schema::new(vec![
            Attribute::continuous("Temp"),
            Attribute::discrete("Play", labels.iter().copied()),
        ]).unwrap();
        Arc::new(schema)
    }

    #[test]
    fn push_rejects_reordered_labels() {
        let yes_no = play(&["Yes", "No"]);
        let no_yes = play(&["No", "Yes"]);
        let ex = Example::parse(&["70", "Yes"], &no_yes, "test", 1).unwrap();

        let mut data = Dataset::new(yes_no);
        let err = data.push(ex).unwrap_err();
        assert!(matches!(err, Id3Error::SchemaMismatch { .. }));
        assert!(data.is_empty());
    }

    #[test]
    fn push_rejects_wider_domain() {
        let narrow = play(&["Yes", "No"]);
        let wide = play(&["Yes", "No", "Maybe"]);
        let ex = Example::parse(&["70", "Maybe"], &wide, "test", 1).unwrap();

        let mut data = Dataset::new(narrow);
        assert!(data.push(ex).is_err());
        assert_eq!(data.entropy(AttrId(1)), 0f64);
    }

    #[test]
    fn push_accepts_an_equal_schema() {
        let ex = Example::parse(&["70", "No"], &play(&["Yes", "No"]), "t", 1)
            .unwrap();
        let mut data = Dataset::new(play(&["Yes", "No"]));
        data.push(ex).unwrap();
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn from_examples_rejects_foreign_examples() {
        let yes_no = play(&["Yes", "No"]);
        let no_yes = play(&["No", "Yes"]);
        let examples = vec![
            Arc::new(Example::parse(&["70", "Yes"], &yes_no, "t", 1).unwrap()),
            Arc::new(Example::parse(&["75", "Yes"], &no_yes, "t", 2).unwrap()),
        ];
        let err = Dataset::from_examples(yes_no, examples).unwrap_err();
        assert!(matches!(err, Id3Error::SchemaMismatch { .. }));
    }
}
