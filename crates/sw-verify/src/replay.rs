//! Lock-step replay of a [`SortedWindow`] against a [`MirrorWindow`].

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use sw_core::{InvariantViolation, SortedWindow};
use sw_ring::Evict;
use thiserror::Error;

use crate::MirrorWindow;

/// One mutation applied to both windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op<T> {
    PushBack(T),
    PushFront(T),
    PopFront,
    PopBack,
    Resize { capacity: usize, evict: Evict },
    Clear,
}

/// Summary of a replay that matched the oracle at every step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub steps: usize,
    pub evictions: usize,
    pub empty_pops: usize,
    pub peak_len: usize,
}

/// First step where the window and the oracle disagree.
#[derive(Debug, Error)]
#[error("step {step} ({op}): {kind}")]
pub struct Divergence {
    pub step: usize,
    pub op: String,
    pub kind: DivergenceKind,
}

#[derive(Debug, Error)]
pub enum DivergenceKind {
    #[error("window returned {actual}, oracle returned {expected}")]
    Returned { actual: String, expected: String },

    #[error("window holds {actual} elements, oracle holds {expected}")]
    Len { actual: usize, expected: usize },

    #[error("sorted contents {actual} differ from oracle {expected}")]
    Contents { actual: String, expected: String },

    #[error("{stat} is {actual}, oracle says {expected}")]
    Stat {
        stat: &'static str,
        actual: String,
        expected: String,
    },

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Apply `ops` to a fresh window and a fresh oracle of `capacity`, comparing
/// returned values, contents, min, median and max after every step.
pub fn replay<T, L>(capacity: usize, less: L, ops: &[Op<T>]) -> Result<ReplayReport, Divergence>
where
    T: Clone + PartialEq + Debug,
    L: Fn(&T, &T) -> bool,
{
    let mut window = SortedWindow::with_less(capacity, &less);
    let mut mirror = MirrorWindow::new(capacity);
    let mut report = ReplayReport::default();

    for (step, op) in ops.iter().enumerate() {
        let diverged = |kind: DivergenceKind| Divergence {
            step,
            op: format!("{op:?}"),
            kind,
        };

        let (actual, expected): (Vec<T>, Vec<T>) = match op.clone() {
            Op::PushBack(value) => (
                window.push_back(value.clone()).into_iter().collect(),
                mirror.push_back(value).into_iter().collect(),
            ),
            Op::PushFront(value) => (
                window.push_front(value.clone()).into_iter().collect(),
                mirror.push_front(value).into_iter().collect(),
            ),
            Op::PopFront => (
                window.pop_front().ok().into_iter().collect(),
                mirror.pop_front().into_iter().collect(),
            ),
            Op::PopBack => (
                window.pop_back().ok().into_iter().collect(),
                mirror.pop_back().into_iter().collect(),
            ),
            Op::Resize { capacity, evict } => (
                window.set_max_size(capacity, evict),
                mirror.set_max_size(capacity, evict),
            ),
            Op::Clear => {
                window.clear();
                mirror.clear();
                (Vec::new(), Vec::new())
            }
        };

        if actual != expected {
            return Err(diverged(DivergenceKind::Returned {
                actual: format!("{actual:?}"),
                expected: format!("{expected:?}"),
            }));
        }
        match op {
            Op::PopFront | Op::PopBack if actual.is_empty() => report.empty_pops += 1,
            Op::PushBack(_) | Op::PushFront(_) | Op::Resize { .. } => {
                report.evictions += actual.len()
            }
            _ => {}
        }

        compare(&window, &mirror, &less).map_err(diverged)?;
        report.steps += 1;
        report.peak_len = report.peak_len.max(window.len());
    }

    tracing::debug!(
        capacity,
        steps = report.steps,
        evictions = report.evictions,
        "replay matched oracle"
    );
    Ok(report)
}

fn compare<T, L>(
    window: &SortedWindow<T, &L>,
    mirror: &MirrorWindow<T>,
    less: &L,
) -> Result<(), DivergenceKind>
where
    T: PartialEq + Debug,
    L: Fn(&T, &T) -> bool,
{
    window.check_invariants()?;

    if window.len() != mirror.len() {
        return Err(DivergenceKind::Len {
            actual: window.len(),
            expected: mirror.len(),
        });
    }

    let actual: Vec<&T> = window.iter().collect();
    let expected = mirror.sorted(less);
    if actual != expected {
        return Err(DivergenceKind::Contents {
            actual: format!("{actual:?}"),
            expected: format!("{expected:?}"),
        });
    }

    let stats = [
        ("min", window.min().ok(), expected.first().copied()),
        ("median", window.median().ok(), mirror.median(less)),
        ("max", window.max().ok(), expected.last().copied()),
    ];
    for (stat, actual, expected) in stats {
        if actual != expected {
            return Err(DivergenceKind::Stat {
                stat,
                actual: format!("{actual:?}"),
                expected: format!("{expected:?}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn less(a: &i32, b: &i32) -> bool {
        a < b
    }

    #[test]
    fn test_capacity_two_stream_matches() {
        let ops: Vec<Op<i32>> = [612, 302, -266, -415, -796, 391, 429, 985, -702, 403]
            .into_iter()
            .map(Op::PushBack)
            .collect();
        let report = replay(2, less, &ops).unwrap();
        assert_eq!(report.steps, 10);
        assert_eq!(report.evictions, 8);
        assert_eq!(report.peak_len, 2);
    }

    #[test]
    fn test_empty_pops_are_counted_not_divergent() {
        let ops = vec![Op::PopFront, Op::PushBack(1), Op::PopBack, Op::PopBack];
        let report = replay(3, less, &ops).unwrap();
        assert_eq!(report.empty_pops, 2);
    }

    #[test]
    fn test_resize_and_clear_match() {
        let ops = vec![
            Op::PushBack(5),
            Op::PushFront(1),
            Op::PushBack(3),
            Op::Resize {
                capacity: 2,
                evict: Evict::Back,
            },
            Op::PushBack(4),
            Op::Resize {
                capacity: 5,
                evict: Evict::Front,
            },
            Op::PushFront(2),
            Op::Clear,
            Op::PushBack(9),
        ];
        let report = replay(4, less, &ops).unwrap();
        assert_eq!(report.steps, ops.len());
        assert_eq!(report.evictions, 2);
    }

    #[test]
    fn test_divergence_message_names_step() {
        let divergence = Divergence {
            step: 3,
            op: "PopBack".into(),
            kind: DivergenceKind::Len {
                actual: 1,
                expected: 2,
            },
        };
        assert_eq!(
            divergence.to_string(),
            "step 3 (PopBack): window holds 1 elements, oracle holds 2"
        );
    }
}
