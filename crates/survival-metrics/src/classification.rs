use std::fmt;

/// Compute accuracy: fraction of correct predictions.
///
/// Returns 0.0 for empty input.
pub fn accuracy(y_true: &[u8], y_pred: &[u8]) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "Length mismatch");
    let n = y_true.len();
    if n == 0 {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(&a, &b)| a == b)
        .count();
    correct as f64 / n as f64
}

/// 2×2 confusion matrix for labels {0, 1}.
///
/// `counts[t][p]` is the number of rows with true class `t` predicted as `p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    pub counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn true_negatives(&self) -> usize {
        self.counts[0][0]
    }

    pub fn false_positives(&self) -> usize {
        self.counts[0][1]
    }

    pub fn false_negatives(&self) -> usize {
        self.counts[1][0]
    }

    pub fn true_positives(&self) -> usize {
        self.counts[1][1]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);
        let [[tn, fp], [fn_, tp]] = self.counts;
        writeln!(f, "[[{tn:>width$} {fp:>width$}]")?;
        write!(f, " [{fn_:>width$} {tp:>width$}]]")
    }
}

/// Compute the binary confusion matrix. Labels other than 0 and 1 are
/// not counted.
pub fn confusion_matrix(y_true: &[u8], y_pred: &[u8]) -> ConfusionMatrix {
    assert_eq!(y_true.len(), y_pred.len(), "Length mismatch");
    let mut cm = ConfusionMatrix::default();
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        if t < 2 && p < 2 {
            cm.counts[t as usize][p as usize] += 1;
        }
    }
    cm
}

/// Precision for a specific class.
pub fn precision_class(y_true: &[u8], y_pred: &[u8], class: u8) -> f64 {
    let mut tp = 0usize;
    let mut fp = 0usize;
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        if p == class {
            if t == class {
                tp += 1;
            } else {
                fp += 1;
            }
        }
    }
    if tp + fp == 0 {
        0.0
    } else {
        tp as f64 / (tp + fp) as f64
    }
}

/// Recall for a specific class.
pub fn recall_class(y_true: &[u8], y_pred: &[u8], class: u8) -> f64 {
    let mut tp = 0usize;
    let mut fn_ = 0usize;
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        if t == class {
            if p == class {
                tp += 1;
            } else {
                fn_ += 1;
            }
        }
    }
    if tp + fn_ == 0 {
        0.0
    } else {
        tp as f64 / (tp + fn_) as f64
    }
}

/// F1 score for a specific class.
pub fn f1_score_class(y_true: &[u8], y_pred: &[u8], class: u8) -> f64 {
    let p = precision_class(y_true, y_pred, class);
    let r = recall_class(y_true, y_pred, class);
    if p + r == 0.0 {
        0.0
    } else {
        2.0 * p * r / (p + r)
    }
}

/// Precision, recall and F1 for one class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassScores {
    pub class: u8,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Rows whose true label is `class`.
    pub support: usize,
}

pub fn class_scores(y_true: &[u8], y_pred: &[u8], class: u8) -> ClassScores {
    ClassScores {
        class,
        precision: precision_class(y_true, y_pred, class),
        recall: recall_class(y_true, y_pred, class),
        f1: f1_score_class(y_true, y_pred, class),
        support: y_true.iter().filter(|&&t| t == class).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_accuracy() {
        let y_true = [0, 1, 1, 1, 0];
        let y_pred = [0, 1, 0, 1, 0];
        assert_abs_diff_eq!(accuracy(&y_true, &y_pred), 0.8, epsilon = 1e-12);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_confusion_matrix() {
        let y_true = [0, 0, 1, 1, 1];
        let y_pred = [0, 1, 0, 1, 1];
        let cm = confusion_matrix(&y_true, &y_pred);
        assert_eq!(cm.true_negatives(), 1);
        assert_eq!(cm.false_positives(), 1);
        assert_eq!(cm.false_negatives(), 1);
        assert_eq!(cm.true_positives(), 2);
        assert_eq!(cm.total(), 5);
    }

    #[test]
    fn test_confusion_matrix_display() {
        let cm = ConfusionMatrix {
            counts: [[480, 69], [103, 239]],
        };
        assert_eq!(cm.to_string(), "[[480  69]\n [103 239]]");
    }

    #[test]
    fn test_precision_recall() {
        let y_true = [1, 1, 0, 0, 1];
        let y_pred = [1, 0, 0, 1, 1];
        // TP=2, FP=1, FN=1 → P=2/3, R=2/3
        let s = class_scores(&y_true, &y_pred, 1);
        assert_abs_diff_eq!(s.precision, 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.recall, 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.f1, 2.0 / 3.0, epsilon = 1e-12);
        assert_eq!(s.support, 3);
    }

    #[test]
    fn test_no_positive_predictions() {
        assert_eq!(precision_class(&[1, 0], &[0, 0], 1), 0.0);
        assert_eq!(f1_score_class(&[1, 0], &[0, 0], 1), 0.0);
    }
}
