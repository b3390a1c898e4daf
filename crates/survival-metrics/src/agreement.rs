use std::collections::HashMap;
use tracing::warn;

/// Agreement between two label sources over the identifiers they share.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Agreement {
    /// Rows produced by the inner join.
    pub joined: usize,
    /// Joined rows where both labels are equal.
    pub matched: usize,
    /// `matched / joined`, or 0.0 when nothing joined.
    pub score: f64,
}

/// Inner-join `predicted` to `reference` on identifier and measure how often
/// the labels agree.
///
/// Identifiers present on only one side are dropped. A repeated reference
/// identifier joins once per occurrence.
pub fn agreement<I, J>(predicted: I, reference: J) -> Agreement
where
    I: IntoIterator<Item = (i64, u8)>,
    J: IntoIterator<Item = (i64, u8)>,
{
    let mut by_id: HashMap<i64, Vec<u8>> = HashMap::new();
    for (id, label) in reference {
        by_id.entry(id).or_default().push(label);
    }

    let mut joined = 0usize;
    let mut matched = 0usize;
    for (id, label) in predicted {
        if let Some(refs) = by_id.get(&id) {
            joined += refs.len();
            matched += refs.iter().filter(|&&r| r == label).count();
        }
    }

    if joined == 0 {
        warn!("no identifiers in common between predictions and reference labels");
        return Agreement::default();
    }
    Agreement {
        joined,
        matched,
        score: matched as f64 / joined as f64,
    }
}
