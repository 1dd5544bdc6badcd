//! Property tests for the dominance and fairness implication chains

use fairdiv::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn ranking(n: u32) -> impl Strategy<Value = Vec<u32>> {
    Just((1..=n).collect::<Vec<u32>>()).prop_shuffle()
}

/// A ranking of `1..=n` together with two sub-bundles of it
fn ranking_and_bundles() -> impl Strategy<Value = (Vec<u32>, Vec<u32>, Vec<u32>)> {
    (1u32..=8).prop_flat_map(|n| {
        (
            ranking(n),
            proptest::sample::subsequence((1..=n).collect::<Vec<u32>>(), 0..=n as usize),
            proptest::sample::subsequence((1..=n).collect::<Vec<u32>>(), 0..=n as usize),
        )
    })
}

/// Two agents, `2k` items, rankings for both and a random equal split
fn two_agent_instance() -> impl Strategy<Value = (Vec<u32>, Vec<u32>, Vec<u32>)> {
    (1u32..=4).prop_flat_map(|k| (ranking(2 * k), ranking(2 * k), ranking(2 * k)))
}

/// Distinct integer values assigned down a ranking, so sums are exact
fn cardinal(order: &[u32], values: &BTreeSet<u32>) -> Preference {
    Preference::from_values(
        order
            .iter()
            .zip(values.iter().rev())
            .map(|(&item, &v)| (item, v as f64)),
    )
    .unwrap()
}

fn split(items: &[u32]) -> Allocation {
    let half = items.len() / 2;
    Allocation::from([
        ("Alice", Item::list(items[..half].iter().copied())),
        ("Bob", Item::list(items[half..].iter().copied())),
    ])
}

fn chain_holds(results: &[bool]) -> bool {
    results.windows(2).all(|w| !w[0] || w[1])
}

proptest! {
    #[test]
    fn values_determine_order_and_borda(
        values in prop::collection::btree_map(0u32..50, 0u32..1000, 1..10),
    ) {
        // distinct values only
        let distinct: BTreeSet<u32> = values.values().copied().collect();
        prop_assume!(distinct.len() == values.len());

        let pref = Preference::from_values(values.iter().map(|(&i, &v)| (i, v as f64))).unwrap();
        let n = values.len() as u32;
        let order = pref.order();
        prop_assert_eq!(order.len(), values.len());
        for pair in order.windows(2) {
            prop_assert!(values[&pair[0].0] > values[&pair[1].0]);
        }
        prop_assert_eq!(pref.borda_score(order[0]).unwrap(), n);
        prop_assert_eq!(pref.borda_score(order[order.len() - 1]).unwrap(), 1);
        for pair in order.windows(2) {
            prop_assert_eq!(
                pref.borda_score(pair[0]).unwrap(),
                pref.borda_score(pair[1]).unwrap() + 1
            );
        }
    }

    #[test]
    fn dominance_chain((order, a, b) in ranking_and_bundles()) {
        let pref = Preference::from_order(order).unwrap();
        let a = Item::list(a);
        let b = Item::list(b);
        let results: Vec<bool> = Dominance::ALL
            .iter()
            .map(|d| d.weakly_better(&pref, &a, &b).unwrap())
            .collect();
        prop_assert!(chain_holds(&results), "chain broken: {:?}", results);
    }

    #[test]
    fn dominance_is_reflexive((order, a, _) in ranking_and_bundles()) {
        let pref = Preference::from_order(order).unwrap();
        let a = Item::list(a);
        for d in Dominance::ALL {
            prop_assert!(d.weakly_better(&pref, &a, &a).unwrap());
        }
    }

    #[test]
    fn fairness_chains((alice, bob, items) in two_agent_instance()) {
        let profile = PreferenceProfile::new([
            ("Alice", Preference::from_order(alice).unwrap()),
            ("Bob", Preference::from_order(bob).unwrap()),
        ]).unwrap();
        let allocation = split(&items);

        let proportional: Vec<bool> = Dominance::ALL
            .iter()
            .map(|d| is_proportional(&profile, &allocation, d).unwrap())
            .collect();
        prop_assert!(chain_holds(&proportional), "PR chain broken: {:?}", proportional);

        let envy_free: Vec<bool> = Dominance::ALL
            .iter()
            .map(|d| is_envy_free(&profile, &allocation, d).unwrap())
            .collect();
        prop_assert!(chain_holds(&envy_free), "EF chain broken: {:?}", envy_free);
    }

    #[test]
    fn necessary_fairness_implies_cardinal_fairness(
        (alice, bob, items) in two_agent_instance(),
        alice_values in prop::collection::btree_set(1u32..1000, 8),
        bob_values in prop::collection::btree_set(1u32..1000, 8),
    ) {
        let profile = PreferenceProfile::new([
            ("Alice", cardinal(&alice, &alice_values)),
            ("Bob", cardinal(&bob, &bob_values)),
        ]).unwrap();
        let allocation = split(&items);

        if is_necessarily_proportional(&profile, &allocation).unwrap() {
            prop_assert!(is_cardinally_proportional(&profile, &allocation).unwrap());
        }
        if is_necessarily_envy_free(&profile, &allocation).unwrap() {
            prop_assert!(is_cardinally_envy_free(&profile, &allocation).unwrap());
        }
    }

    #[test]
    fn two_agent_draft_is_ndd_proportional((alice, bob, _) in two_agent_instance()) {
        let profile = PreferenceProfile::new([
            ("Alice", Preference::from_order(alice).unwrap()),
            ("Bob", Preference::from_order(bob).unwrap()),
        ]).unwrap();
        match find_ndd_proportional_allocation(&profile).unwrap() {
            Some(allocation) => {
                prop_assert!(is_ndd_proportional(&profile, &allocation).unwrap());
                prop_assert_eq!(allocation.item_count(), profile.item_count());
            }
            None => prop_assert!(!profile.best_items_distinct().unwrap()),
        }
    }

    #[test]
    fn search_result_satisfies_criterion(
        (alice, bob, _) in two_agent_instance(),
        dominance in proptest::sample::select(Dominance::ALL.to_vec()),
        envy_free in any::<bool>(),
    ) {
        let profile = PreferenceProfile::new([
            ("Alice", Preference::from_order(alice).unwrap()),
            ("Bob", Preference::from_order(bob).unwrap()),
        ]).unwrap();
        let criterion = if envy_free {
            Criterion::envy_free(dominance)
        } else {
            Criterion::proportional(dominance)
        };
        if let Some(allocation) = find_fair_allocation(&profile, criterion).unwrap() {
            prop_assert!(criterion.holds(&profile, &allocation).unwrap());
            let best = profile.best_items().unwrap();
            for (_, bundle) in allocation.iter() {
                prop_assert!(best.contains(&bundle[0]));
            }
        }
    }

    #[test]
    fn partitions_are_exhaustive(agent_count in 1usize..=3, per_agent in 0usize..=3) {
        let agents: Vec<AgentId> =
            (0..agent_count).map(|a| AgentId::new(format!("agent{}", a))).collect();
        let items = Item::list(0..(agent_count * per_agent) as u32);
        let partitions: Vec<Allocation> = equal_partitions(&agents, &items).unwrap().collect();
        prop_assert_eq!(
            Some(partitions.len() as u128),
            equal_partition_count(agent_count, items.len())
        );
        let distinct: BTreeSet<String> = partitions.iter().map(|p| p.to_string()).collect();
        prop_assert_eq!(distinct.len(), partitions.len());
    }
}
