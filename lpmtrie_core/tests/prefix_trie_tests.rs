use lpmtrie_core::codec::{format_addr, parse_addr};
use lpmtrie_core::helpers::mask;
use lpmtrie_core::{Error, LookupEngine, Prefix, PrefixTrie};
use proptest::collection::vec as pvec;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

fn ip(s: &str) -> u32 {
    parse_addr(s).unwrap()
}

fn p(s: &str) -> Prefix {
    s.parse().unwrap()
}

#[test]
fn basic_ops() {
    let mut trie = PrefixTrie::new();
    assert!(trie.is_empty());
    assert_eq!(trie.lookup(ip("192.168.0.1")), None);

    trie.insert(ip("192.168.0.0"), 16).unwrap();
    assert_eq!(trie.len(), 1);
    assert_eq!(trie.node_count(), 17);
    assert_eq!(trie.lookup(ip("192.168.0.1")), Some(p("192.168.0.0/16")));
    assert_eq!(trie.lookup(ip("192.169.0.1")), None);
}

#[test]
fn longer_prefix_wins_regardless_of_insert_order() {
    let mut a = PrefixTrie::new();
    a.insert(ip("219.90.122.0"), 24).unwrap();
    a.insert(ip("219.90.122.104"), 32).unwrap();

    let mut b = PrefixTrie::new();
    b.insert(ip("219.90.122.104"), 32).unwrap();
    b.insert(ip("219.90.122.0"), 24).unwrap();

    for trie in [&a, &b] {
        assert_eq!(trie.lookup(ip("219.90.122.104")), Some(p("219.90.122.104/32")));
        assert_eq!(trie.lookup(ip("219.90.122.105")), Some(p("219.90.122.0/24")));
    }
}

#[test]
fn lookup_stops_at_missing_child_but_keeps_best() {
    let mut trie = PrefixTrie::new();
    trie.insert(ip("10.0.0.0"), 8).unwrap();
    trie.insert(ip("10.1.2.0"), 24).unwrap();
    // shares 10.1.x with the /24 path, then diverges
    assert_eq!(trie.lookup(ip("10.1.3.7")), Some(p("10.0.0.0/8")));
    assert_eq!(trie.lookup(ip("10.1.2.7")), Some(p("10.1.2.0/24")));
}

#[test]
fn default_route_matches_everything_else() {
    let mut trie = PrefixTrie::new();
    trie.insert(0, 0).unwrap();
    trie.insert(ip("8.8.8.0"), 24).unwrap();
    assert_eq!(trie.node_count(), 25);
    assert_eq!(trie.lookup(ip("8.8.8.8")), Some(p("8.8.8.0/24")));
    assert_eq!(trie.lookup(ip("1.1.1.1")), Some(p("0.0.0.0/0")));
    assert_eq!(trie.lookup(u32::MAX), Some(p("0.0.0.0/0")));
}

#[test]
fn default_route_ignores_address_bits() {
    let mut trie = PrefixTrie::new();
    trie.insert(ip("1.2.3.4"), 0).unwrap();
    assert_eq!(trie.lookup(ip("200.0.0.1")), Some(p("0.0.0.0/0")));
    assert_eq!(
        trie.insert(ip("9.9.9.9"), 0),
        Err(Error::DuplicatePrefix(p("0.0.0.0/0")))
    );
}

#[test]
fn duplicate_is_rejected_and_trie_unchanged() {
    let mut trie = PrefixTrie::new();
    trie.insert(ip("153.104.0.0"), 16).unwrap();
    let nodes = trie.node_count();

    let err = trie.insert(ip("153.104.0.0"), 16).unwrap_err();
    assert_eq!(err, Error::DuplicatePrefix(p("153.104.0.0/16")));

    // host bits do not make a prefix distinct
    let err = trie.insert(ip("153.104.90.11"), 16).unwrap_err();
    assert!(matches!(err, Error::DuplicatePrefix(_)));

    assert_eq!(trie.len(), 1);
    assert_eq!(trie.node_count(), nodes);
    assert_eq!(trie.lookup(ip("153.104.90.11")), Some(p("153.104.0.0/16")));
}

#[test]
fn invalid_mask_is_rejected_before_mutation() {
    let mut trie = PrefixTrie::new();
    assert_eq!(trie.insert(ip("1.2.3.4"), 33), Err(Error::InvalidMask(33)));
    assert_eq!(trie.insert(ip("1.2.3.4"), 255), Err(Error::InvalidMask(255)));
    assert!(trie.is_empty());
    assert_eq!(trie.node_count(), 1);
}

#[test]
fn stored_prefix_is_canonical() {
    let mut trie = PrefixTrie::new();
    trie.insert(ip("10.20.30.40"), 12).unwrap();
    let stored = trie.lookup(ip("10.16.0.1")).unwrap();
    assert_eq!(stored.addr(), ip("10.16.0.0"));
    assert_eq!(stored.mask_len(), 12);
    assert_eq!(stored.to_string(), "10.16.0.0/12");
}

#[test]
fn get_exact_and_iteration_order() {
    let mut trie = PrefixTrie::new();
    for s in ["10.128.0.0/9", "10.0.0.0/16", "0.0.0.0/0", "10.0.0.0/8", "192.168.1.0/24"] {
        let pfx = p(s);
        trie.insert(pfx.addr(), pfx.mask_len()).unwrap();
    }
    assert_eq!(trie.get_exact(ip("10.0.0.0"), 8), Some(p("10.0.0.0/8")));
    assert_eq!(trie.get_exact(ip("10.0.0.0"), 12), None);
    assert_eq!(trie.get_exact(ip("11.0.0.0"), 8), None);
    assert_eq!(trie.get_exact(0, 40), None);

    let listed: Vec<String> = trie.iter().map(|p| p.to_string()).collect();
    assert_eq!(
        listed,
        [
            "0.0.0.0/0",
            "10.0.0.0/8",
            "10.0.0.0/16",
            "10.128.0.0/9",
            "192.168.1.0/24"
        ]
    );
}

#[test]
fn prefix_converts_to_and_from_ipnet() {
    let net: ipnet::Ipv4Net = "100.64.0.0/10".parse().unwrap();
    let pfx = Prefix::from(net);
    assert_eq!(pfx, p("100.64.0.0/10"));
    assert_eq!(ipnet::Ipv4Net::from(pfx), net);

    // Ipv4Net keeps host bits; Prefix drops them
    let host: ipnet::Ipv4Net = "100.64.1.1/10".parse().unwrap();
    assert_eq!(Prefix::from(host), pfx);

    let mut engine = LookupEngine::new();
    engine.insert_net(net).unwrap();
    assert_eq!(engine.lookup(ip("100.100.1.1")), Some(pfx));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn codec_round_trip(addr in any::<u32>()) {
        prop_assert_eq!(parse_addr(&format_addr(addr)).unwrap(), addr);
    }

    #[test]
    fn longest_match_law(addr in any::<u32>(), m1 in 0u8..=32, m2 in 0u8..=32) {
        prop_assume!(m1 != m2);
        let (short, long) = (m1.min(m2), m1.max(m2));
        let mut trie = PrefixTrie::new();
        trie.insert(addr, long).unwrap();
        trie.insert(addr, short).unwrap();
        prop_assert_eq!(trie.lookup(addr), Some(Prefix::new(addr, long).unwrap()));
    }

    #[test]
    fn lookup_agrees_with_linear_scan(
        // few distinct top bits so that prefixes overlap
        raw in pvec((0u32..8, any::<u32>(), 0u8..=32), 1..48),
        queries in pvec(any::<u32>(), 64),
    ) {
        let mut trie = PrefixTrie::new();
        let mut stored = BTreeSet::new();
        for &(hi, lo, len) in &raw {
            let addr = (hi << 29) | (lo >> 3);
            let pfx = Prefix::new(addr, len).unwrap();
            let res = trie.insert(addr, len);
            if stored.insert(pfx) {
                prop_assert!(res.is_ok());
            } else {
                prop_assert_eq!(res, Err(Error::DuplicatePrefix(pfx)));
            }
        }
        prop_assert_eq!(trie.len(), stored.len());
        prop_assert_eq!(trie.iter().collect::<BTreeSet<_>>(), stored.clone());

        let probes = queries
            .iter()
            .copied()
            .chain(stored.iter().map(|p| p.addr() | !mask(p.mask_len())));
        for q in probes {
            let expected = stored
                .iter()
                .filter(|p| p.covers(q))
                .max_by_key(|p| p.mask_len())
                .copied();
            prop_assert_eq!(trie.lookup(q), expected);
        }
    }

    #[test]
    fn duplicate_leaves_lookups_unchanged(
        prefixes in pvec((any::<u32>(), 0u8..=32), 1..16),
        pick in any::<prop::sample::Index>(),
        queries in pvec(any::<u32>(), 16),
    ) {
        let mut trie = PrefixTrie::new();
        let mut inserted = vec![];
        for &(addr, len) in &prefixes {
            if trie.insert(addr, len).is_ok() {
                inserted.push((addr, len));
            }
        }
        let before: Vec<_> = queries.iter().map(|&q| trie.lookup(q)).collect();
        let (addr, len) = inserted[pick.index(inserted.len())];
        let is_duplicate = matches!(trie.insert(addr, len), Err(Error::DuplicatePrefix(_)));
        prop_assert!(is_duplicate);
        let after: Vec<_> = queries.iter().map(|&q| trie.lookup(q)).collect();
        prop_assert_eq!(before, after);
    }
}

#[test]
fn stress_concurrent_lookups() {
    let threads = num_cpus::get();
    let mut engine = LookupEngine::new();
    for _ in 0..5_000 {
        let addr: u32 = rand::random();
        let len = 8 + rand::random::<u8>() % 25;
        // random collisions are fine here
        let _ = engine.insert(addr, len);
    }
    let queries: Vec<u32> = (0..10_000).map(|_| rand::random()).collect();
    let expected: Vec<_> = queries.iter().map(|&q| engine.lookup(q)).collect();

    let engine = Arc::new(engine);
    let queries = Arc::new(queries);
    let expected = Arc::new(expected);
    let mut handles = vec![];
    for _ in 0..threads {
        let engine = Arc::clone(&engine);
        let queries = Arc::clone(&queries);
        let expected = Arc::clone(&expected);
        handles.push(thread::spawn(move || {
            for (q, want) in queries.iter().zip(expected.iter()) {
                assert_eq!(engine.lookup(*q), *want);
            }
        }));
    }
    for h in handles {
        h.join().expect("thread failed");
    }
}
