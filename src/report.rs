//! Accuracy summary of a tree over a held-out dataset.
use colored::Colorize;

use std::fmt;

const FULL_WIDTH: usize = 60;
const STAT_WIDTH: usize = (FULL_WIDTH - 4) / 2;


/// Number of correctly classified examples out of `total`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accuracy {
    correct: usize,
    total:   usize,
}

impl Accuracy {
    pub fn new(correct: usize, total: usize) -> Self {
        assert!(
            correct <= total,
            "{correct} correct predictions out of {total} examples"
        );
        Self { correct, total, }
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// `correct / total`; an empty dataset gives `0`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 { return 0f64; }
        self.correct as f64 / self.total as f64
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = format!(
            "{:=>FULL_WIDTH$}\n{:^FULL_WIDTH$}\n{:->FULL_WIDTH$}",
            "", "ACCURACY".bold(), "",
        );
        let percent = format!("{:.2} %", 100f64 * self.ratio());
        write!(
            f,
            "{header}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}\n\
            {:=^FULL_WIDTH$}",
            "Correct".bold(),
            self.correct.to_string().bold().green(),
            "Total".bold(),
            self.total.to_string().bold().yellow(),
            "Accuracy".bold(),
            percent.bold().cyan(),
            "",
        )
    }
}
