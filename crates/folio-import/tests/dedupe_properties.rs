//! Property tests for tagging and deduplication.

use folio_import::{dedupe_by_key, experience_key, tag_group, DedupKeyFields};
use folio_store::Record;
use proptest::prelude::*;
use std::collections::HashSet;

fn arb_record() -> impl Strategy<Value = Record> {
    ("[ ]?[aAbB]{1,2}[ ]?", "[xXyY]{1,2}", 0u8..10).prop_map(|(title, company, n)| {
        Record::new()
            .with("title", title)
            .with("company", company)
            .with("n", n)
    })
}

proptest! {
    #[test]
    fn dedupe_is_idempotent(records in prop::collection::vec(arb_record(), 0..20)) {
        let fields = DedupKeyFields::default();
        let once = dedupe_by_key(records, |r| experience_key(r, &fields));
        let twice = dedupe_by_key(once.clone(), |r| experience_key(r, &fields));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn dedupe_keeps_one_record_per_key_in_first_seen_order(
        records in prop::collection::vec(arb_record(), 0..20)
    ) {
        let fields = DedupKeyFields::default();
        let key = |r: &Record| experience_key(r, &fields);

        let mut first_seen = Vec::new();
        let mut seen = HashSet::new();
        for r in &records {
            if seen.insert(key(r)) {
                first_seen.push(key(r));
            }
        }

        let out = dedupe_by_key(records.clone(), key);
        let out_keys: Vec<String> = out.iter().map(key).collect();
        prop_assert_eq!(&out_keys, &first_seen);

        // each survivor is the last record with its key
        for r in &out {
            let last = records.iter().rev().find(|c| key(c) == key(r)).unwrap();
            prop_assert_eq!(r, last);
        }
    }

    #[test]
    fn tagging_preserves_input(
        records in prop::collection::vec(arb_record(), 0..10),
        tag in "[A-Za-z]{1,8}",
    ) {
        let before = records.clone();
        let tagged = tag_group(&records, "type", &tag);
        prop_assert_eq!(&records, &before);
        prop_assert_eq!(tagged.len(), records.len());
        for (t, r) in tagged.iter().zip(&records) {
            prop_assert_eq!(t.get_str("type"), Some(tag.as_str()));
            prop_assert_eq!(t.len(), r.len() + 1);
        }
    }
}
