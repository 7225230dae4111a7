// Property tests: whatever goes in through add comes back out through get

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use bookkeeper_core::repository::{Filter, Repository};
use common::{by_pk, open_repo, Purchase};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_added_entities_read_back(
        rows in prop::collection::vec(("[a-zA-Z0-9 ]{0,24}", any::<i64>()), 0..8)
    ) {
        let (_dir, repo) = open_repo::<Purchase>();

        let mut added = Vec::new();
        for (name, amount) in &rows {
            let mut purchase = Purchase::new(name, *amount);
            let pk = repo.add(&mut purchase).unwrap();
            prop_assert_eq!(repo.get(pk).unwrap(), Some(purchase.clone()));
            added.push(purchase);
        }

        prop_assert_eq!(by_pk(repo.get_all(None).unwrap()), added.clone());
        prop_assert_eq!(repo.count(None).unwrap(), added.len() as u64);

        for purchase in &added {
            let same_name = repo
                .get_all(Some(&Filter::new().eq("name", purchase.name.as_str())))
                .unwrap();
            prop_assert!(same_name.contains(purchase));
            prop_assert!(same_name.iter().all(|p| p.name == purchase.name));
        }
    }

    #[test]
    fn prop_pks_are_unique(count in 1usize..12) {
        let (_dir, repo) = open_repo::<Purchase>();

        let mut pks: Vec<_> = (0..count)
            .map(|i| repo.add(&mut Purchase::new("same", i as i64)).unwrap())
            .collect();
        pks.sort_unstable();
        pks.dedup();

        prop_assert_eq!(pks.len(), count);
    }
}
