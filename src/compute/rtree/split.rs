//! Guttman's quadratic node split.
//!
//! The same routine splits leaves (payload entries) and internal nodes
//! (child entries); it only needs the box of each candidate.

use super::node::Bounded;
use fnrtree_types::bbox::{Coordinate, Mbr};

/// One side of a split under construction.
#[derive(Debug)]
pub(crate) struct Group<E, C: Coordinate, const D: usize> {
    pub entries: Vec<E>,
    pub mbr: Mbr<C, D>,
}

impl<E: Bounded<C, D>, C: Coordinate, const D: usize> Group<E, C, D> {
    fn seeded(seed: E) -> Self {
        Self {
            mbr: seed.mbr(),
            entries: vec![seed],
        }
    }

    fn push(&mut self, entry: E) {
        self.mbr = self.mbr.union(&entry.mbr());
        self.entries.push(entry);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Distribute `candidates` over two groups of at least `min_entries` each.
///
/// The first seed goes to the first group, which the caller keeps in the
/// node being split; the second group becomes the new sibling.
pub(crate) fn quadratic_split<E, C, const D: usize>(
    mut candidates: Vec<E>,
    min_entries: usize,
) -> (Group<E, C, D>, Group<E, C, D>)
where
    E: Bounded<C, D>,
    C: Coordinate,
{
    debug_assert!(candidates.len() >= 2, "split needs at least two candidates");

    let (first, second) = pick_seeds(&candidates);
    // Remove the later index first so the earlier one stays valid.
    let (seed_a, seed_b) = if first > second {
        let a = candidates.remove(first);
        let b = candidates.remove(second);
        (a, b)
    } else {
        let b = candidates.remove(second);
        let a = candidates.remove(first);
        (a, b)
    };
    let mut group1 = Group::seeded(seed_a);
    let mut group2 = Group::seeded(seed_b);

    while !candidates.is_empty() {
        let remaining = candidates.len();
        if min_entries.saturating_sub(group1.len()) >= remaining {
            candidates.drain(..).for_each(|e| group1.push(e));
            break;
        }
        if min_entries.saturating_sub(group2.len()) >= remaining {
            candidates.drain(..).for_each(|e| group2.push(e));
            break;
        }

        let next = candidates.remove(pick_next(&group1.mbr, &group2.mbr, &candidates));
        let growth1 = group1.mbr.enlargement(&next.mbr());
        let growth2 = group2.mbr.enlargement(&next.mbr());
        if growth1 < growth2 || (growth1 == growth2 && group1.len() < group2.len()) {
            group1.push(next);
        } else {
            group2.push(next);
        }
    }

    (group1, group2)
}

/// Pair of candidates that would waste the most area if put in one node.
///
/// Ordered pairs are scanned in full and a later pair with equal waste
/// replaces an earlier one.
fn pick_seeds<E, C, const D: usize>(candidates: &[E]) -> (usize, usize)
where
    E: Bounded<C, D>,
    C: Coordinate,
{
    let mut worst = C::AREA_LOWEST;
    let mut seeds = (0, 1);
    for (i, a) in candidates.iter().enumerate() {
        for (j, b) in candidates.iter().enumerate() {
            if i == j {
                continue;
            }
            let waste = a.mbr().dead_space(&b.mbr());
            if waste >= worst {
                worst = waste;
                seeds = (i, j);
            }
        }
    }
    seeds
}

/// Candidate with the strongest preference for one group over the other.
fn pick_next<E, C, const D: usize>(mbr1: &Mbr<C, D>, mbr2: &Mbr<C, D>, candidates: &[E]) -> usize
where
    E: Bounded<C, D>,
    C: Coordinate,
{
    let mut strongest = C::AREA_LOWEST;
    let mut index = 0;
    for (i, candidate) in candidates.iter().enumerate() {
        let d1 = mbr1.enlargement(&candidate.mbr());
        let d2 = mbr2.enlargement(&candidate.mbr());
        let preference = C::area_abs(d1 - d2);
        if preference >= strongest {
            strongest = preference;
            index = i;
        }
    }
    index
}
