//! Edit scripts between two versions of a list.
//!
//! [`diff_lists`] compares an old and a new item sequence and describes the
//! change as removed, inserted and changed ranges. The host list widget uses
//! the script to animate only the affected rows.

use std::marker::PhantomData;

use board_core::logging::targets;

/// Identity and content comparison used by [`diff_lists`].
pub trait ItemCallback<T> {
    /// Whether `old` and `new` represent the same entity (same row).
    fn are_items_the_same(&self, old: &T, new: &T) -> bool;

    /// Whether the same entity renders identically in both versions.
    /// Only called when [`are_items_the_same`](Self::are_items_the_same)
    /// holds.
    fn are_contents_the_same(&self, old: &T, new: &T) -> bool;
}

/// Compares items with `PartialEq` for both identity and contents.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqDiffCallback;

impl<T: PartialEq> ItemCallback<T> for EqDiffCallback {
    fn are_items_the_same(&self, old: &T, new: &T) -> bool {
        old == new
    }

    fn are_contents_the_same(&self, old: &T, new: &T) -> bool {
        old == new
    }
}

/// Identity by a key function, contents by `PartialEq`.
///
/// ```
/// use board_adapter::{KeyedDiffCallback, diff_lists};
///
/// #[derive(PartialEq)]
/// struct Post { id: u64, replies: u32 }
///
/// let by_id = KeyedDiffCallback::new(|p: &Post| p.id);
/// let old = [Post { id: 1, replies: 0 }];
/// let new = [Post { id: 1, replies: 4 }];
/// assert_eq!(diff_lists(&old, &new, &by_id).ops().len(), 1);
/// ```
pub struct KeyedDiffCallback<F, K> {
    key: F,
    _key: PhantomData<fn() -> K>,
}

impl<F, K> KeyedDiffCallback<F, K> {
    /// Identify items by `key`.
    pub fn new(key: F) -> Self {
        Self {
            key,
            _key: PhantomData,
        }
    }
}

impl<F, K> std::fmt::Debug for KeyedDiffCallback<F, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedDiffCallback").finish_non_exhaustive()
    }
}

impl<T, K, F> ItemCallback<T> for KeyedDiffCallback<F, K>
where
    T: PartialEq,
    K: PartialEq,
    F: Fn(&T) -> K,
{
    fn are_items_the_same(&self, old: &T, new: &T) -> bool {
        (self.key)(old) == (self.key)(new)
    }

    fn are_contents_the_same(&self, old: &T, new: &T) -> bool {
        old == new
    }
}

/// One step of an edit script.
///
/// Positions refer to the list as it is after all previous steps of the same
/// script have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOp {
    /// `count` items starting at `position` were removed.
    Removed { position: usize, count: usize },
    /// `count` items were inserted at `position`.
    Inserted { position: usize, count: usize },
    /// `count` items starting at `position` kept their identity but changed
    /// contents.
    Changed { position: usize, count: usize },
}

/// The edit script between two list versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDiff {
    ops: Vec<DiffOp>,
    old_len: usize,
    new_len: usize,
}

impl ListDiff {
    /// The steps, in application order.
    pub fn ops(&self) -> &[DiffOp] {
        &self.ops
    }

    /// Whether the two versions render identically.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Length of the old list.
    pub fn old_len(&self) -> usize {
        self.old_len
    }

    /// Length of the new list.
    pub fn new_len(&self) -> usize {
        self.new_len
    }

    /// A script that drops everything and inserts the new list.
    pub fn reset(old_len: usize, new_len: usize) -> Self {
        let mut ops = Vec::new();
        if old_len > 0 {
            ops.push(DiffOp::Removed {
                position: 0,
                count: old_len,
            });
        }
        if new_len > 0 {
            ops.push(DiffOp::Inserted {
                position: 0,
                count: new_len,
            });
        }
        Self {
            ops,
            old_len,
            new_len,
        }
    }

    pub(crate) fn from_ops(ops: Vec<DiffOp>, old_len: usize, new_len: usize) -> Self {
        Self {
            ops: ops.into_iter().filter(|op| op.count() > 0).collect(),
            old_len,
            new_len,
        }
    }

    /// Apply the script to `old`, taking inserted and changed items from
    /// `new`.
    pub fn apply<T: Clone>(&self, old: &mut Vec<T>, new: &[T]) {
        for op in &self.ops {
            match *op {
                DiffOp::Removed { position, count } => {
                    old.drain(position..position + count);
                }
                DiffOp::Inserted { position, count } => {
                    let src = new_index(position, old.len(), new.len()) - count;
                    old.splice(position..position, new[src..src + count].iter().cloned());
                }
                DiffOp::Changed { position, count } => {
                    let src = new_index(position, old.len(), new.len());
                    old[position..position + count].clone_from_slice(&new[src..src + count]);
                }
            }
        }
    }
}

// While a back-to-front script is applied, the list is the untouched head
// of `old` followed by the finished tail of `new`, so a position maps into
// `new` by its distance from the end.
fn new_index(position: usize, current_len: usize, new_len: usize) -> usize {
    new_len - (current_len - position)
}

impl DiffOp {
    /// Number of items the step covers.
    pub fn count(&self) -> usize {
        match *self {
            DiffOp::Removed { count, .. }
            | DiffOp::Inserted { count, .. }
            | DiffOp::Changed { count, .. } => count,
        }
    }
}

/// Above this many table cells the middle section is replaced wholesale.
const MAX_TABLE_CELLS: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Keep,
    Delete,
    Insert,
}

/// Compute the edit script that turns `old` into `new`.
///
/// Common leading and trailing items are skipped; the remaining middle is
/// aligned with a longest-common-subsequence table over item identity.
/// Moved items are reported as a removal plus an insertion.
pub fn diff_lists<T, CB>(old: &[T], new: &[T], callback: &CB) -> ListDiff
where
    CB: ItemCallback<T> + ?Sized,
{
    let prefix = old
        .iter()
        .zip(new)
        .take_while(|(a, b)| callback.are_items_the_same(a, b))
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| callback.are_items_the_same(a, b))
        .count();

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut script = Vec::with_capacity(old.len().max(new.len()));
    script.extend(std::iter::repeat_n(Step::Keep, prefix));
    match align(old_mid, new_mid, callback) {
        Some(steps) => script.extend(steps),
        None => {
            tracing::debug!(
                target: targets::DIFF,
                old = old_mid.len(),
                new = new_mid.len(),
                "diff too large, replacing section"
            );
            script.extend(std::iter::repeat_n(Step::Delete, old_mid.len()));
            script.extend(std::iter::repeat_n(Step::Insert, new_mid.len()));
        }
    }
    script.extend(std::iter::repeat_n(Step::Keep, suffix));

    let ops = emit_ops(&script, old, new, callback);
    tracing::trace!(target: targets::DIFF, ops = ops.len(), prefix, suffix, "diffed lists");
    ListDiff::from_ops(ops, old.len(), new.len())
}

fn align<T, CB>(old: &[T], new: &[T], callback: &CB) -> Option<Vec<Step>>
where
    CB: ItemCallback<T> + ?Sized,
{
    let (n, m) = (old.len(), new.len());
    if n == 0 || m == 0 {
        let mut steps = vec![Step::Delete; n];
        steps.extend(std::iter::repeat_n(Step::Insert, m));
        return Some(steps);
    }
    if (n + 1).checked_mul(m + 1)? > MAX_TABLE_CELLS {
        return None;
    }

    // lcs[i][j] = LCS length of old[i..] and new[j..]
    let width = m + 1;
    let mut lcs = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i * width + j] = if callback.are_items_the_same(&old[i], &new[j]) {
                lcs[(i + 1) * width + j + 1] + 1
            } else {
                lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
            };
        }
    }

    let mut steps = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if callback.are_items_the_same(&old[i], &new[j])
            && lcs[i * width + j] == lcs[(i + 1) * width + j + 1] + 1
        {
            steps.push(Step::Keep);
            i += 1;
            j += 1;
        } else if lcs[(i + 1) * width + j] >= lcs[i * width + j + 1] {
            steps.push(Step::Delete);
            i += 1;
        } else {
            steps.push(Step::Insert);
            j += 1;
        }
    }
    steps.extend(std::iter::repeat_n(Step::Delete, n - i));
    steps.extend(std::iter::repeat_n(Step::Insert, m - j));
    Some(steps)
}

/// Turn a forward script into back-to-front ops with coalesced ranges.
fn emit_ops<T, CB>(script: &[Step], old: &[T], new: &[T], callback: &CB) -> Vec<DiffOp>
where
    CB: ItemCallback<T> + ?Sized,
{
    let mut ops: Vec<DiffOp> = Vec::new();
    let (mut i, mut j) = (old.len(), new.len());

    for step in script.iter().rev() {
        match step {
            Step::Keep => {
                i -= 1;
                j -= 1;
                if !callback.are_contents_the_same(&old[i], &new[j]) {
                    push_op(&mut ops, DiffOp::Changed { position: i, count: 1 });
                }
            }
            Step::Delete => {
                i -= 1;
                push_op(&mut ops, DiffOp::Removed { position: i, count: 1 });
            }
            Step::Insert => {
                j -= 1;
                push_op(&mut ops, DiffOp::Inserted { position: i, count: 1 });
            }
        }
    }
    ops
}

fn push_op(ops: &mut Vec<DiffOp>, op: DiffOp) {
    if let Some(last) = ops.last_mut() {
        match (last, op) {
            (
                DiffOp::Removed { position, count },
                DiffOp::Removed { position: p, count: c },
            ) if p + c == *position => {
                *position = p;
                *count += c;
                return;
            }
            (
                DiffOp::Inserted { position, count },
                DiffOp::Inserted { position: p, count: c },
            ) if p == *position => {
                *count += c;
                return;
            }
            (
                DiffOp::Changed { position, count },
                DiffOp::Changed { position: p, count: c },
            ) if p + c == *position => {
                *position = p;
                *count += c;
                return;
            }
            _ => {}
        }
    }
    ops.push(op);
}
