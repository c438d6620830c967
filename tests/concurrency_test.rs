use draft::graph::{GraphStore, PropertyMap, PropertyValue};
use std::sync::Arc;
use std::thread;

const WRITERS: usize = 8;
const PER_WRITER: usize = 250;

fn props(i: usize) -> PropertyMap {
    PropertyMap::from([("seq".to_string(), PropertyValue::from(i as i64))])
}

#[test]
fn test_concurrent_duplicate_inserts_have_one_winner() {
    let store = Arc::new(GraphStore::new());

    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..PER_WRITER)
                    .filter(|i| store.add_node(format!("n{}", i), "item", props(*i)).is_ok())
                    .count()
            })
        })
        .collect();

    let wins: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(wins, PER_WRITER);
    assert_eq!(store.node_count(), PER_WRITER);
}

#[test]
fn test_concurrent_edges_keep_adjacency_consistent() {
    let store = GraphStore::new();
    for i in 0..PER_WRITER {
        store.add_node(format!("n{}", i), "item", props(i)).unwrap();
    }

    thread::scope(|s| {
        for w in 0..WRITERS {
            let store = &store;
            s.spawn(move || {
                for i in 0..PER_WRITER {
                    let source = format!("n{}", i);
                    let target = format!("n{}", (i + w + 1) % PER_WRITER);
                    store
                        .add_edge(format!("e{}-{}", w, i), source, "next", target, PropertyMap::new())
                        .unwrap();
                }
                // Remove every other edge this writer added
                for i in (0..PER_WRITER).step_by(2) {
                    store.remove_edge(format!("e{}-{}", w, i)).unwrap();
                }
            });
        }

        // Readers run alongside the writers
        for _ in 0..2 {
            let store = &store;
            s.spawn(move || {
                for _ in 0..50 {
                    let snapshot = store.nodes();
                    assert_eq!(snapshot.size(), PER_WRITER);
                    let _ = store.sub_graph("n0", 2).unwrap();
                }
            });
        }
    });

    let expected_edges = WRITERS * (PER_WRITER / 2);
    assert_eq!(store.edge_count(), expected_edges);

    let mut out_total = 0;
    let mut in_total = 0;
    for node in store.nodes() {
        out_total += node.out_edges().len();
        in_total += node.in_edges().len();
        for edge_id in node.out_edges() {
            assert_eq!(store.get_edge(edge_id).unwrap().source, node.id);
        }
    }
    assert_eq!(out_total, expected_edges);
    assert_eq!(in_total, expected_edges);
}

#[test]
fn test_readers_see_whole_writes() {
    let store = Arc::new(GraphStore::new());
    store.add_node("hub", "hub", PropertyMap::new()).unwrap();

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..PER_WRITER {
                let id = format!("leaf{}", i);
                store.add_node(id.clone(), "leaf", PropertyMap::new()).unwrap();
                store
                    .add_edge(format!("spoke{}", i), "hub", "spoke", id, PropertyMap::new())
                    .unwrap();
            }
        })
    };

    // Every edge visible in a neighbourhood has both endpoints in it.
    for _ in 0..100 {
        let sub = store.sub_graph("hub", 1).unwrap();
        for edge in sub.edges() {
            assert!(sub.has_node(&edge.source));
            assert!(sub.has_node(&edge.target));
        }
    }

    writer.join().unwrap();
    assert_eq!(store.get_node("hub").unwrap().out_edges().len(), PER_WRITER);
}
