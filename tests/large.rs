// Scale scenario: a million distinct keys.
//
// Validates arena growth (several reallocation/copy cycles) and index
// scaling under a realistic insert-mostly load. Every key must remain
// retrievable and len() must be exact, full hash space, no collisions
// assumed or required.
use packed_strings::{StringMap, StringSet};

#[test]
fn million_keys_map() {
    let mut m = StringMap::with_capacity(1 << 20, 16 << 20);
    for i in 0..1_000_000u32 {
        assert_eq!(m.insert(&format!("key-{i}"), &format!("#{i}")), None);
    }
    assert_eq!(m.len(), 1_000_000);
    for i in (0..1_000_000u32).step_by(997) {
        assert_eq!(
            m.get(&format!("key-{i}")).map(str::to_owned),
            Some(format!("#{i}"))
        );
    }
    assert!(!m.contains_key("key-1000000"));
}

#[test]
fn million_members_set() {
    let mut s = StringSet::with_capacity(1 << 20, 16 << 20);
    for i in 0..1_000_000u32 {
        assert!(s.insert(&format!("member-{i}")));
    }
    assert_eq!(s.len(), 1_000_000);
    for i in 0..1_000_000u32 {
        assert!(s.contains(&format!("member-{i}")));
    }
}
