#[cfg(test)]
mod tests {
    use super::super::node::NodeState;
    use super::super::transposition::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn same_key_returns_same_node() {
        let table = NodeTable::new();
        let (first, existed) = table.get_or_insert(42);
        assert!(!existed);
        let (second, existed) = table.get_or_insert(42);
        assert!(existed);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn distinct_keys_get_distinct_nodes() {
        let table = NodeTable::new();
        let (a, _) = table.get_or_insert(1);
        let (b, _) = table.get_or_insert(2);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn state_is_shared_through_table() {
        let table = NodeTable::new();
        let (node, _) = table.get_or_insert(7);
        *node.lock() = NodeState::Terminal(1.0);

        let fetched = table.get(7).unwrap();
        assert!(matches!(*fetched.lock(), NodeState::Terminal(v) if v == 1.0));
        assert!(table.get(8).is_none());
    }

    #[test]
    fn clear_empties_table() {
        let table = NodeTable::new();
        table.get_or_insert(1);
        table.get_or_insert(2);
        table.clear();
        assert!(table.is_empty());
        assert!(table.get(1).is_none());
    }

    #[test]
    fn concurrent_inserts_agree_on_one_node() {
        let table = Arc::new(NodeTable::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let table = Arc::clone(&table);
                thread::spawn(move || table.get_or_insert(99).0)
            })
            .collect();
        let nodes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for node in &nodes[1..] {
            assert!(Arc::ptr_eq(&nodes[0], node));
        }
        assert_eq!(table.len(), 1);
    }
}
