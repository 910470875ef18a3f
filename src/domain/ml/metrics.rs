use serde::{Deserialize, Serialize};
use std::fmt;

/// 2x2 confusion counts for the "should cool" label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(actual: &[bool], predicted: &[bool]) -> Self {
        let mut m = Self::default();
        for (a, p) in actual.iter().zip(predicted.iter()) {
            match (a, p) {
                (false, false) => m.true_negative += 1,
                (false, true) => m.false_positive += 1,
                (true, false) => m.false_negative += 1,
                (true, true) => m.true_positive += 1,
            }
        }
        m
    }

    pub fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_negative + self.true_positive, self.total())
    }

    /// Per-class scores, negative class first.
    pub fn class_scores(&self) -> [ClassScores; 2] {
        [
            ClassScores::new(
                "No Cooling",
                self.true_negative,
                self.false_negative,
                self.false_positive,
            ),
            ClassScores::new(
                "Should Cool",
                self.true_positive,
                self.false_positive,
                self.false_negative,
            ),
        ]
    }

    pub fn positive(&self) -> ClassScores {
        let [_, pos] = self.class_scores();
        pos
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassScores {
    pub name: &'static str,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

impl ClassScores {
    fn new(name: &'static str, hits: usize, wrongly_claimed: usize, missed: usize) -> Self {
        let precision = ratio(hits, hits + wrongly_claimed);
        let recall = ratio(hits, hits + missed);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            name,
            precision,
            recall,
            f1,
            support: hits + missed,
        }
    }
}

/// Classification report for a held-out evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
}

impl EvaluationReport {
    pub fn new(actual: &[bool], predicted: &[bool]) -> Self {
        let confusion = ConfusionMatrix::from_predictions(actual, predicted);
        let pos = confusion.positive();
        Self {
            confusion,
            accuracy: confusion.accuracy(),
            precision: pos.precision,
            recall: pos.recall,
        }
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model Accuracy: {:.2}%", self.accuracy * 100.0)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for s in self.confusion.class_scores() {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                s.name, s.precision, s.recall, s.f1, s.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Confusion Matrix:")?;
        let c = &self.confusion;
        writeln!(f, "[[{:>6} {:>6}]", c.true_negative, c.false_positive)?;
        write!(f, " [{:>6} {:>6}]]", c.false_negative, c.true_positive)
    }
}
