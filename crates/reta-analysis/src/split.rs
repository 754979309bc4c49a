//! Stratified train/test split.
//!
//! Each outcome class is split on its own: the first `floor(training% * class size)`
//! rows of a class (in input order) go to training, the rest to testing. Both sets
//! are then shuffled independently, so the trainer never sees the input order.

use rand::{Rng, seq::SliceRandom as _};
use serde::Serialize;

use crate::{error::ConfigError, features::PlayerFeatures};

/// Training/testing percentages, always adding up to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitRatio {
    training: u32,
    testing: u32,
}

impl SplitRatio {
    pub fn new(training: u32, testing: u32) -> Result<Self, ConfigError> {
        if training.checked_add(testing) != Some(100) {
            return Err(ConfigError::InvalidSplit { training, testing });
        }
        Ok(Self { training, testing })
    }

    #[must_use]
    pub fn training(&self) -> u32 {
        self.training
    }

    #[must_use]
    pub fn testing(&self) -> u32 {
        self.testing
    }

    /// Number of rows of a class of `count` rows that go to training.
    #[must_use]
    pub fn training_quota(&self, count: usize) -> usize {
        count * self.training as usize / 100
    }
}

/// Row counts per outcome class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    pub retained: usize,
    pub not_retained: usize,
}

impl ClassCounts {
    #[must_use]
    pub fn of(rows: &[PlayerFeatures]) -> Self {
        let retained = rows.iter().filter(|r| r.day1_retention).count();
        Self {
            retained,
            not_retained: rows.len() - retained,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.retained + self.not_retained
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub training: Vec<PlayerFeatures>,
    pub testing: Vec<PlayerFeatures>,
}

impl Split {
    #[must_use]
    pub fn training_counts(&self) -> ClassCounts {
        ClassCounts::of(&self.training)
    }

    #[must_use]
    pub fn testing_counts(&self) -> ClassCounts {
        ClassCounts::of(&self.testing)
    }
}

/// Splits `rows` by class according to `ratio`, shuffling both halves with `rng`.
#[must_use]
pub fn split_dataset<R>(rows: Vec<PlayerFeatures>, ratio: SplitRatio, rng: &mut R) -> Split
where
    R: Rng + ?Sized,
{
    let counts = ClassCounts::of(&rows);
    let mut retained_quota = ratio.training_quota(counts.retained);
    let mut not_retained_quota = ratio.training_quota(counts.not_retained);

    let training_len = retained_quota + not_retained_quota;
    let mut training = Vec::with_capacity(training_len);
    let mut testing = Vec::with_capacity(rows.len() - training_len);
    for row in rows {
        let quota = if row.day1_retention {
            &mut retained_quota
        } else {
            &mut not_retained_quota
        };
        if *quota > 0 {
            *quota -= 1;
            training.push(row);
        } else {
            testing.push(row);
        }
    }

    training.shuffle(rng);
    testing.shuffle(rng);
    Split { training, testing }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    /// Alternates retained and not-retained rows while both classes last.
    fn rows(retained: usize, not_retained: usize) -> Vec<PlayerFeatures> {
        let (mut r, mut n) = (retained, not_retained);
        let mut labels = vec![];
        while r > 0 || n > 0 {
            if r > 0 {
                labels.push(true);
                r -= 1;
            }
            if n > 0 {
                labels.push(false);
                n -= 1;
            }
        }
        labels
            .into_iter()
            .enumerate()
            .map(|(i, day1_retention)| PlayerFeatures {
                name: format!("p{i}"),
                tutorial_momentum: 0.0,
                level_momentum: 0.0,
                gameplay_consumed: 0,
                social_activities: 0,
                progression: 0.0,
                level: 0,
                day1_retention,
            })
            .collect()
    }

    #[test]
    fn test_ratio_must_add_up_to_100() {
        assert!(SplitRatio::new(70, 30).is_ok());
        assert!(SplitRatio::new(100, 0).is_ok());
        assert_eq!(
            SplitRatio::new(70, 20),
            Err(ConfigError::InvalidSplit {
                training: 70,
                testing: 20
            })
        );
        assert!(SplitRatio::new(u32::MAX, 101).is_err());
    }

    #[test]
    fn test_training_quota_floors() {
        let ratio = SplitRatio::new(70, 30).unwrap();
        assert_eq!(ratio.training_quota(10), 7);
        assert_eq!(ratio.training_quota(9), 6);
        assert_eq!(ratio.training_quota(1), 0);
        assert_eq!(ratio.training_quota(0), 0);
        let ratio = SplitRatio::new(29, 71).unwrap();
        assert_eq!(ratio.training_quota(100), 29);
    }

    #[test]
    fn test_split_preserves_class_counts() {
        let mut rng = Pcg64::seed_from_u64(7);
        for (train, test) in [(0, 100), (33, 67), (50, 50), (70, 30), (100, 0)] {
            let ratio = SplitRatio::new(train, test).unwrap();
            let input = rows(13, 8);
            let counts = ClassCounts::of(&input);
            assert_eq!(counts, ClassCounts { retained: 13, not_retained: 8 });

            let split = split_dataset(input, ratio, &mut rng);
            assert_eq!(split.training.len() + split.testing.len(), 21);
            let training = split.training_counts();
            let testing = split.testing_counts();
            assert_eq!(training.retained, ratio.training_quota(13));
            assert_eq!(training.not_retained, ratio.training_quota(8));
            assert_eq!(testing.retained, 13 - training.retained);
            assert_eq!(testing.not_retained, 8 - training.not_retained);
        }
    }

    #[test]
    fn test_split_covers_every_row_once() {
        let mut rng = Pcg64::seed_from_u64(1);
        let split = split_dataset(rows(6, 9), SplitRatio::new(60, 40).unwrap(), &mut rng);
        let mut names = split
            .training
            .iter()
            .chain(&split.testing)
            .map(|r| r.name.clone())
            .collect::<Vec<_>>();
        names.sort();
        let mut expected = (0..15).map(|i| format!("p{i}")).collect::<Vec<_>>();
        expected.sort();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_training_quota_taken_in_input_order() {
        let input = rows(4, 0);
        let mut rng = Pcg64::seed_from_u64(3);
        let split = split_dataset(input, SplitRatio::new(50, 50).unwrap(), &mut rng);
        let mut training = split.training.iter().map(|r| r.name.as_str()).collect::<Vec<_>>();
        training.sort_unstable();
        assert_eq!(training, vec!["p0", "p1"]);
    }

    #[test]
    fn test_same_seed_same_split() {
        let ratio = SplitRatio::new(70, 30).unwrap();
        let a = split_dataset(rows(20, 20), ratio, &mut Pcg64::seed_from_u64(42));
        let b = split_dataset(rows(20, 20), ratio, &mut Pcg64::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_class_and_empty_input() {
        let mut rng = Pcg64::seed_from_u64(0);
        let ratio = SplitRatio::new(80, 20).unwrap();
        let split = split_dataset(rows(0, 5), ratio, &mut rng);
        assert_eq!(split.training_counts(), ClassCounts { retained: 0, not_retained: 4 });
        assert_eq!(split.testing_counts(), ClassCounts { retained: 0, not_retained: 1 });

        let split = split_dataset(vec![], ratio, &mut rng);
        assert!(split.training.is_empty());
        assert!(split.testing.is_empty());
    }
}
