use chrono::NaiveDate;

use crate::model::*;

use super::availability::booked_on;
use super::Engine;

/// Advance `idx` to the next k-combination of `0..n` in lexicographic order.
/// Returns false once the last combination has been visited.
fn next_combination(idx: &mut [usize], n: usize) -> bool {
    let k = idx.len();
    let mut i = k;
    while i > 0 {
        i -= 1;
        if idx[i] != i + n - k {
            idx[i] += 1;
            for j in i + 1..k {
                idx[j] = idx[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

/// Exhaustive fallback: try every subset of size 1..=bound in ascending size
/// order and return the first whose capacities cover `guest_count`. The bound
/// keeps the search polynomial in the candidate count rather than exponential.
fn first_covering_subset(rows: &[Resource], guest_count: u32, bound: usize) -> Vec<Resource> {
    let max_size = bound.min(rows.len());
    for size in 1..=max_size {
        let mut idx: Vec<usize> = (0..size).collect();
        loop {
            let cap: u32 = idx.iter().map(|&i| rows[i].capacity).sum();
            if cap >= guest_count {
                return idx.iter().map(|&i| rows[i].clone()).collect();
            }
            if !next_combination(&mut idx, rows.len()) {
                break;
            }
        }
    }
    Vec::new()
}

impl Engine {
    /// The single resource that best fits the party: smallest capacity that
    /// still holds everyone, ties broken by price then id. Resources already
    /// booked on `date` are skipped; none suffices alone → None.
    pub async fn suggest_single(
        &self,
        kind: ResourceKind,
        guest_count: u32,
        date: Option<NaiveDate>,
    ) -> Option<Resource> {
        let rows = self.list_resources(kind).await;
        let ledger = self.ledger.read().await;

        let mut candidates: Vec<Resource> = rows
            .into_iter()
            .filter(|r| match date {
                Some(d) => !booked_on(&ledger, kind, r.id, d),
                None => true,
            })
            .filter(|r| r.capacity >= guest_count)
            .collect();

        candidates.sort_by(|a, b| {
            a.capacity
                .cmp(&b.capacity)
                .then(a.price.total_cmp(&b.price))
                .then(a.id.cmp(&b.id))
        });
        candidates.into_iter().next()
    }

    /// A minimal-count set of resources covering the party: greedy over
    /// candidates sorted by descending capacity (price ascending as tie-break),
    /// with a bounded combinatorial fallback when the greedy pass cannot reach
    /// the guest count. Empty result means the venue cannot accommodate.
    pub async fn suggest_set(
        &self,
        kind: ResourceKind,
        guest_count: u32,
        date: Option<NaiveDate>,
    ) -> Vec<Resource> {
        let rows = self.list_resources(kind).await;
        let ledger = self.ledger.read().await;

        let mut rows: Vec<Resource> = rows
            .into_iter()
            .filter(|r| r.status == ResourceStatus::Available)
            .filter(|r| match date {
                Some(d) => !booked_on(&ledger, kind, r.id, d),
                None => true,
            })
            .collect();
        drop(ledger);

        if rows.is_empty() {
            return Vec::new();
        }

        rows.sort_by(|a, b| {
            b.capacity
                .cmp(&a.capacity)
                .then(a.price.total_cmp(&b.price))
                .then(a.id.cmp(&b.id))
        });

        let mut selected = Vec::new();
        let mut covered: u32 = 0;
        for r in &rows {
            if covered >= guest_count {
                break;
            }
            covered += r.capacity;
            selected.push(r.clone());
        }
        if covered >= guest_count {
            return selected;
        }

        first_covering_subset(&rows, guest_count, kind.combination_bound())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(id: ResourceId, capacity: u32, price: f64) -> Resource {
        Resource {
            id,
            kind: ResourceKind::Table,
            name: format!("Table {id}"),
            capacity,
            price,
            status: ResourceStatus::Available,
        }
    }

    #[test]
    fn combinations_visit_ascending_size_lexicographic() {
        let mut seen = Vec::new();
        let mut idx = vec![0usize, 1];
        loop {
            seen.push(idx.clone());
            if !next_combination(&mut idx, 4) {
                break;
            }
        }
        assert_eq!(
            seen,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }

    #[test]
    fn fallback_prefers_smaller_subsets() {
        // No single row covers 7, but the first pair in order does.
        let rows = vec![table(1, 4, 100.0), table(2, 4, 100.0), table(3, 4, 100.0)];
        let picked = first_covering_subset(&rows, 7, 5);
        assert_eq!(
            picked.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn fallback_respects_bound() {
        // Covering 20 needs five 4-seaters, but the bound stops at 3.
        let rows: Vec<Resource> = (1..=6).map(|i| table(i, 4, 100.0)).collect();
        assert!(first_covering_subset(&rows, 20, 3).is_empty());
        assert_eq!(first_covering_subset(&rows, 20, 5).len(), 5);
    }
}
