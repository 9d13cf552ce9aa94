use super::{UfIndex, UnionFind};

#[test]
fn singletons() {
    let uf = UnionFind::new(4);
    assert_eq!(uf.len(), 4);
    assert_eq!(uf.num_sets(), 4);
    for i in 0..4 {
        assert_eq!(uf.find(UfIndex(i)), UfIndex(i));
    }
    assert!(!uf.same_set(UfIndex(0), UfIndex(1)));
}

#[test]
fn union_merges_and_counts() {
    let mut uf = UnionFind::new(5);
    assert!(uf.union(UfIndex(0), UfIndex(1)));
    assert!(uf.union(UfIndex(2), UfIndex(3)));
    assert_eq!(uf.num_sets(), 3);

    // Re-unioning the same pair is a no-op.
    assert!(!uf.union(UfIndex(0), UfIndex(1)));
    assert_eq!(uf.num_sets(), 3);

    assert!(uf.same_set(UfIndex(0), UfIndex(1)));
    assert!(!uf.same_set(UfIndex(1), UfIndex(2)));

    assert!(uf.union(UfIndex(1), UfIndex(2)));
    assert!(uf.same_set(UfIndex(0), UfIndex(3)));
    assert_eq!(uf.num_sets(), 2);
}

#[test]
fn chain_collapses_to_one_root() {
    let n = 100;
    let mut uf = UnionFind::new(n);
    for i in 1..n {
        uf.union(UfIndex(i - 1), UfIndex(i));
    }
    assert_eq!(uf.num_sets(), 1);
    let root = uf.find(UfIndex(0));
    for i in 0..n {
        assert_eq!(uf.find(UfIndex(i)), root);
    }
}

#[test]
fn empty() {
    let uf = UnionFind::new(0);
    assert!(uf.is_empty());
    assert_eq!(uf.num_sets(), 0);
}
