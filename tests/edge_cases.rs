use fnrtree::{FnrTree, Mbr, RTree, SearchMode, TimeInterval, TravelDirection};
use std::collections::BTreeSet;
use std::ops::ControlFlow;

#[test]
fn test_query_on_empty_index() {
    let index: FnrTree = FnrTree::new();
    assert!(index.query(0, 0, 100, 100, 0.0, 100.0).is_empty());
    assert_eq!(index.stats().queries, 1);
}

#[test]
fn test_trip_on_unregistered_segment_is_dropped() {
    let mut index: FnrTree = FnrTree::new();
    assert!(!index.insert_trip(1, 0, 0, 10, 0, 0.0, 1.0));
    index.register_segment(0, 0, 10, 0, "A");
    assert!(!index.insert_trip(1, 0, 0, 5, 0, 0.0, 1.0));
    assert_eq!(index.trip_count(), 0);
    assert_eq!(index.stats().unmatched_trips, 2);
}

#[test]
fn test_reversed_registration_and_trip_endpoints() {
    let mut index: FnrTree = FnrTree::new();
    index.register_segment(10, 10, 0, 0, "reversed");
    assert!(index.insert_trip(3, 10, 10, 0, 0, 0.0, 2.0));
    assert!(index.insert_trip(4, 0, 0, 10, 10, 0.0, 2.0));
    assert_eq!(index.query(10, 10, 0, 0, 1.0, 1.0), BTreeSet::from([3, 4]));

    let entry = index.find_segment(0, 0, 10, 10).unwrap();
    let directions: BTreeSet<_> = entry
        .trips()
        .map(|t| (t.object_id, t.direction == TravelDirection::Backward))
        .collect();
    assert_eq!(directions, BTreeSet::from([(3, true), (4, false)]));
}

#[test]
fn test_reversed_time_window_compares_as_given() {
    let mut index: FnrTree = FnrTree::new();
    index.register_segment(0, 0, 10, 0, "A");
    index.insert_trip(1, 0, 0, 10, 0, 1.0, 5.0);
    // [4, 2] has low 4 <= 5 and 1 <= high 2.
    assert_eq!(index.query(0, 0, 10, 0, 4.0, 2.0), BTreeSet::from([1]));
    // [9, 6]: 9 > 5.
    assert!(index.query(0, 0, 10, 0, 9.0, 6.0).is_empty());
}

#[test]
fn test_instantaneous_trip_and_window() {
    let mut index: FnrTree = FnrTree::new();
    index.register_segment(0, 0, 10, 0, "A");
    index.insert_trip(1, 0, 0, 10, 0, 3.0, 3.0);
    assert_eq!(index.query(0, 0, 10, 0, 3.0, 3.0), BTreeSet::from([1]));
    assert!(index.query(0, 0, 10, 0, 3.5, 4.0).is_empty());
}

#[test]
fn test_degenerate_point_segment() {
    let mut index: FnrTree = FnrTree::new();
    index.register_segment(5, 5, 5, 5, "roundabout");
    assert!(index.insert_trip(8, 5, 5, 5, 5, 0.0, 1.0));
    assert_eq!(index.query(4, 4, 6, 6, 0.0, 1.0), BTreeSet::from([8]));
    assert!(index.query(6, 6, 7, 7, 0.0, 1.0).is_empty());
}

#[test]
fn test_vertical_segment_clip() {
    let mut index: FnrTree = FnrTree::new();
    index.register_segment(50, 100, 50, 0, "north-south");
    index.insert_trip(2, 50, 0, 50, 100, 0.0, 10.0);
    assert_eq!(index.query(40, 40, 60, 60, 0.0, 10.0), BTreeSet::from([2]));
    assert!(index.query(51, 40, 60, 60, 0.0, 10.0).is_empty());
    assert!(index.query(40, 101, 60, 200, 0.0, 10.0).is_empty());
}

#[test]
fn test_window_touching_segment_end() {
    let mut index: FnrTree = FnrTree::new();
    index.register_segment(0, 0, 10, 0, "A");
    index.insert_trip(1, 0, 0, 10, 0, 0.0, 1.0);
    assert_eq!(index.query(10, 0, 20, 5, 0.0, 1.0), BTreeSet::from([1]));
    assert!(index.query(11, 0, 20, 5, 0.0, 1.0).is_empty());
}

#[test]
fn test_negative_coordinates() {
    let mut index: FnrTree = FnrTree::new();
    index.register_segment(-20, -20, -10, -30, "south-west");
    assert!(index.insert_trip(6, -10, -30, -20, -20, 0.0, 1.0));
    assert_eq!(index.query(-16, -26, -14, -24, 0.0, 1.0), BTreeSet::from([6]));
}

#[test]
fn test_string_object_ids() {
    let mut index: FnrTree<String> = FnrTree::new();
    index.register_segment(0, 0, 10, 0, "A");
    index.insert_trip("bus-12".to_string(), 0, 0, 10, 0, 0.0, 1.0);
    index.insert_trip("bus-7".to_string(), 0, 0, 10, 0, 0.5, 2.0);
    let seen: Vec<String> = index.query(0, 0, 10, 0, 0.0, 1.0).into_iter().collect();
    assert_eq!(seen, vec!["bus-12".to_string(), "bus-7".to_string()]);
}

#[test]
fn test_rtree_find_on_empty_and_after_removal() {
    let mut tree: RTree<u8, f64, 1> = RTree::new();
    let span = TimeInterval::new(1.0, 2.0).to_box();
    assert_eq!(tree.find(&span), None);
    tree.insert(1, span);
    assert_eq!(tree.find(&span), Some(&1));
    assert!(tree.remove(&span, &1));
    assert_eq!(tree.find(&span), None);
    tree.check_invariants().unwrap();
}

#[test]
fn test_rtree_search_counts_visits_not_hits() {
    let mut tree: RTree<u32, i32, 2> = RTree::new();
    for i in 0..30 {
        tree.insert(i, Mbr::new([0, 0], [1, 1]));
    }
    let mut accepted = 0;
    let visited = tree.search(&Mbr::new([0, 0], [1, 1]), SearchMode::Containing, |_, id| {
        if id % 2 == 0 {
            accepted += 1;
        }
        ControlFlow::Continue(())
    });
    assert_eq!(visited, 30);
    assert_eq!(accepted, 15);
}

#[test]
fn test_full_range_segment_among_small_ones() {
    let mut index: FnrTree = FnrTree::new();
    index.register_segment(i32::MIN, i32::MIN, i32::MAX, i32::MAX, "diagonal");
    for i in 0..20 {
        index.register_segment(i * 10, 0, i * 10 + 5, 0, format!("short-{i}"));
    }
    index.check_invariants().unwrap();
    assert_eq!(index.segment_count(), 21);
    assert!(index.insert_trip(1, i32::MAX, i32::MAX, i32::MIN, i32::MIN, 0.0, 1.0));
    assert!(index.insert_trip(2, 30, 0, 35, 0, 0.0, 1.0));
    assert_eq!(index.query(-1, -1, 1, 1, 0.0, 1.0), BTreeSet::from([1]));
    assert_eq!(index.query(31, 0, 32, 0, 0.0, 1.0), BTreeSet::from([2]));
}
