use crate::graph::Node;
use rand::prelude::SliceRandom;
use rand::Rng;

/// Elements present in both sorted slices, sorted.
pub fn intersect_sorted<T: std::cmp::Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut out = vec![];
    let mut ai = 0;
    let mut bi = 0;
    while ai < a.len() && bi < b.len() {
        use std::cmp::Ordering;
        match Ord::cmp(&a[ai], &b[bi]) {
            Ordering::Equal => {
                out.push(a[ai].clone());
                ai += 1;
                bi += 1;
            }
            Ordering::Less => {
                ai += 1;
            }
            Ordering::Greater => {
                bi += 1;
            }
        }
    }
    out
}

/// Elements of the sorted slice `a` that are missing from the sorted slice `b`.
pub fn difference_sorted<T: std::cmp::Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut out = vec![];
    let mut bi = 0;
    for x in a {
        while bi < b.len() && b[bi] < *x {
            bi += 1;
        }
        if bi == b.len() || b[bi] != *x {
            out.push(x.clone());
        }
    }
    out
}

/// `sorted` with `v` inserted at its place.
pub fn with_inserted(sorted: &[Node], v: Node) -> Vec<Node> {
    let mut out = Vec::with_capacity(sorted.len() + 1);
    let at = sorted.partition_point(|&x| x < v);
    out.extend_from_slice(&sorted[..at]);
    out.push(v);
    out.extend_from_slice(&sorted[at..]);
    out
}

/// the nodes `0..n` except `skip`, shuffled.
pub fn random_perm_without<R: Rng + ?Sized>(n: usize, skip: Node, rng: &mut R) -> Vec<Node> {
    let mut perm: Vec<Node> = (0..n as Node).filter(|&v| v != skip).collect();
    perm.shuffle(rng);
    perm
}

#[test]
fn test_intersect() {
    let a = [1, 2, 5, 8, 9];
    let b = [0, 2, 3, 4, 5, 9];
    assert_eq!(intersect_sorted(&a, &b), vec![2, 5, 9]);
    assert_eq!(intersect_sorted(&b, &a), vec![2, 5, 9]);

    let a: [u32; 0] = [];
    assert_eq!(intersect_sorted(&a, &b), Vec::<u32>::new());

    assert_eq!(intersect_sorted(&[2u32], &[3]), Vec::<u32>::new());
    assert_eq!(intersect_sorted(&[0], &[0, 1, 2, 3, 4, 5]), vec![0]);
    assert_eq!(intersect_sorted(&[5], &[0, 1, 2, 3, 4, 5]), vec![5]);
}

#[test]
fn test_difference() {
    assert_eq!(difference_sorted(&[1, 2, 5, 8, 9], &[0, 2, 3, 9]), vec![1, 5, 8]);
    assert_eq!(difference_sorted::<u32>(&[1, 2], &[]), vec![1, 2]);
    assert_eq!(difference_sorted::<u32>(&[], &[1]), Vec::<u32>::new());
}

#[test]
fn test_with_inserted() {
    assert_eq!(with_inserted(&[1, 4, 7], 5), vec![1, 4, 5, 7]);
    assert_eq!(with_inserted(&[], 3), vec![3]);
    assert_eq!(with_inserted(&[1, 4], 0), vec![0, 1, 4]);
}

#[test]
fn test_random_perm_without() {
    use rand::SeedableRng;
    let mut rng = rand_xoshiro::Xoshiro256StarStar::seed_from_u64(7);
    let mut perm = random_perm_without(6, 2, &mut rng);
    perm.sort_unstable();
    assert_eq!(perm, vec![0, 1, 3, 4, 5]);
}
