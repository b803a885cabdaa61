use keyed_core::keyed::{build_entries, find_value_at_key, key_map, Entry, GroupedEntry, Slot};

#[test]
fn invariant_empty_side_yields_no_entries() {
    let keys: Vec<String> = Vec::new();
    assert!(build_entries(keys, vec![1, 2]).is_empty());
    assert!(build_entries(vec!["a", "b"], Vec::<i32>::new()).is_empty());
}

#[test]
fn invariant_pairing_stops_at_shorter_side() {
    let entries = build_entries(vec!["a", "b", "c"], vec![1, 2]);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].key, "a");
    assert_eq!(entries[0].value, 1);
    assert_eq!(entries[0].index(), Some(0));
    assert_eq!(entries[1].key, "b");
    assert_eq!(entries[1].value, 2);
    assert_eq!(entries[1].index(), Some(1));
}

#[test]
fn test_entry_defaults() {
    let entry = Entry::new("value", "key");
    assert_eq!(entry.index(), None);
    assert!(!entry.checked);
    assert!(entry.visible);

    let grouped = GroupedEntry::new(1, "item", 10, "group");
    assert_eq!(grouped.slot(), None);
    assert_eq!(grouped.index_key(), None);
    assert!(!grouped.entry.checked);
    assert!(grouped.entry.visible);
    assert_eq!(grouped.entry.key, "item");
    assert_eq!(grouped.item_index(), grouped.entry.index());
}

#[test]
fn test_index_key_is_tab_separated() {
    let grouped = GroupedEntry::with_slot(1, "item", 10, "group", Slot::new(3, 7));
    assert_eq!(grouped.group_index(), Some(3));
    assert_eq!(grouped.item_index(), Some(7));
    assert_eq!(grouped.index_key().as_deref(), Some("3\t7"));
}

#[test]
fn test_find_value_at_key() {
    let keys = vec!["a".to_string(), "b".to_string(), "c".to_string(), "b".to_string()];
    let values = vec![10, 20];

    assert_eq!(find_value_at_key("a", &keys, &values), Some(&10));
    // first occurrence wins
    assert_eq!(find_value_at_key("b", &keys, &values), Some(&20));
    // key exists but has no value
    assert_eq!(find_value_at_key("c", &keys, &values), None);
    assert_eq!(find_value_at_key("z", &keys, &values), None);
}

#[test]
fn test_key_map_last_write_wins() {
    let pairs = vec![("a", 1), ("b", 2), ("a", 3)];
    let map = key_map(pairs, |p: &(&str, i32)| p.0.to_string(), |p: &(&str, i32)| p.1);

    assert_eq!(map.len(), 2);
    assert_eq!(map["a"], 3);
    assert_eq!(map["b"], 2);
}
