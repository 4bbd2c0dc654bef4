use rtb_types::Entry;

/// Sort entries into board order and renumber ranks from 1.
///
/// The sort is total, so the same set of entries always ends up in the same
/// order with the same ranks regardless of how it was ordered on input.
pub fn rank_entries(entries: &mut [Entry]) {
    entries.sort_by(Entry::board_cmp);
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rtb_types::{Code, Timestamp};

    fn entry(ms: f64, millis: i64, rank: u32) -> Entry {
        let mut e = Entry::new(
            ms,
            Timestamp::from_millis(millis).unwrap(),
            Code::from_index(millis as u32),
            String::new(),
        );
        e.rank = rank;
        e
    }

    #[test]
    fn stale_ranks_are_overwritten() {
        let mut entries = vec![entry(300.0, 1, 1), entry(200.0, 2, 7), entry(250.0, 3, 0)];
        rank_entries(&mut entries);

        let summary: Vec<(u32, f64)> = entries.iter().map(|e| (e.rank, e.reaction_time)).collect();
        assert_eq!(summary, vec![(1, 200.0), (2, 250.0), (3, 300.0)]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut entries = vec![entry(250.0, 20, 0), entry(250.0, 10, 0)];
        rank_entries(&mut entries);
        assert_eq!(entries[0].timestamp.as_millis(), 10);
        assert_eq!(entries[1].timestamp.as_millis(), 20);
    }

    #[test]
    fn empty_is_fine() {
        let mut entries: Vec<Entry> = Vec::new();
        rank_entries(&mut entries);
        assert!(entries.is_empty());
    }

    proptest! {
        #[test]
        fn ranks_match_position_in_board_order(
            raw in proptest::collection::vec((1u32..=3000, 0i64..50), 0..40)
        ) {
            let mut entries: Vec<Entry> = raw
                .iter()
                .enumerate()
                .map(|(i, (ms, t))| entry(f64::from(*ms), *t * 100 + i as i64, 99))
                .collect();
            rank_entries(&mut entries);

            for (i, e) in entries.iter().enumerate() {
                prop_assert_eq!(e.rank as usize, i + 1);
            }
            for pair in entries.windows(2) {
                prop_assert!(pair[0].board_cmp(&pair[1]).is_lt());
            }
        }
    }
}
