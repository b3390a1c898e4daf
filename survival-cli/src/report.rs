//! Console rendering of a `RunReport`.

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Write};
use survival::pipeline::{RunReport, TableStages};

pub struct Renderer {
    styled: bool,
}

impl Renderer {
    pub fn new(styled: bool) -> Self {
        Renderer { styled }
    }

    fn colored<W: Write>(&self, out: &mut W, color: Color, text: &str) -> io::Result<()> {
        if self.styled {
            queue!(out, SetForegroundColor(color), Print(text), ResetColor)
        } else {
            queue!(out, Print(text))
        }
    }

    fn heading<W: Write>(&self, out: &mut W, text: &str) -> io::Result<()> {
        self.colored(out, Color::Cyan, &format!("\n== {text} ==\n"))
    }

    fn score<W: Write>(&self, out: &mut W, label: &str, value: f64) -> io::Result<()> {
        write!(out, "{label}: ")?;
        self.colored(out, Color::Green, &format!("{value:.4}"))?;
        writeln!(out)
    }

    fn counts<W: Write>(out: &mut W, title: &str, counts: &[(String, usize)]) -> io::Result<()> {
        writeln!(out, "{title}")?;
        let width = counts.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, count) in counts {
            writeln!(out, "  {name:<width$}  {count}")?;
        }
        Ok(())
    }

    fn table<W: Write>(&self, out: &mut W, label: &str, t: &TableStages) -> io::Result<()> {
        writeln!(out, "{label} loaded. Shape: {:?}", t.loaded.shape())?;
        writeln!(out, "{label} columns: {:?}", t.loaded.columns)?;

        let table = label.to_lowercase();
        let before = format!("Missing values per column ({table}):");
        Self::counts(out, &before, &t.cleaning.missing_before)?;

        for name in &t.cleaning.dropped {
            writeln!(out, "Dropped column: {name}")?;
        }
        for fill in &t.cleaning.fills {
            writeln!(
                out,
                "Filled {} missing with {} ({}). Before: {} After: {}",
                fill.column, fill.strategy, fill.value, fill.missing_before, fill.missing_after
            )?;
        }
        let after = format!("Missing values after cleaning ({table}):");
        Self::counts(out, &after, &t.cleaning.missing_after)?;

        writeln!(out, "Columns after encoding ({table}): {:?}", t.encoded.columns)?;
        writeln!(out, "{label} cleaned. New shape: {:?}", t.encoded.shape())
    }

    pub fn render<W: Write>(&self, report: &RunReport, out: &mut W) -> io::Result<()> {
        self.heading(out, "Training data")?;
        self.table(out, "Train", &report.train)?;

        self.heading(out, "Model")?;
        writeln!(out, "Using features: {:?}", report.features)?;
        let (rows, cols) = report.train.features_shape;
        writeln!(out, "X shape (train): ({rows}, {cols})  y shape: ({rows},)")?;
        match report.training.iterations {
            Some(n) => writeln!(out, "Model training complete after {n} iterations.")?,
            None => writeln!(out, "Model training complete.")?,
        }
        self.score(out, "Training accuracy", report.training.accuracy)?;
        writeln!(out, "Confusion matrix (train):\n{}", report.training.confusion)?;
        let s = &report.training.survived;
        writeln!(
            out,
            "Class {}: precision {:.4}  recall {:.4}  f1 {:.4}  support {}",
            s.class, s.precision, s.recall, s.f1, s.support
        )?;

        self.heading(out, "Test data")?;
        self.table(out, "Test", &report.test)?;
        writeln!(out, "X_test shape: {:?}", report.test.features_shape)?;
        let preview: Vec<u8> = report
            .preview_predictions()
            .iter()
            .map(|&(_, label)| label)
            .collect();
        writeln!(out, "First {} test predictions: {:?}", preview.len(), preview)?;

        self.heading(out, "Evaluation")?;
        let eval = &report.evaluation;
        writeln!(out, "Reference labels: {} rows", eval.reference_rows)?;
        writeln!(out, "Joined rows: {}", eval.agreement.joined)?;
        self.score(
            out,
            "Agreement with reference labels (test accuracy)",
            eval.agreement.score,
        )?;
        out.flush()
    }
}
