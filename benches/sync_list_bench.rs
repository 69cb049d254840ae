use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use mapcap_viewer::{sync_list, ElementTree, NodeId, SyncReport};
use std::convert::Infallible;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn keys(n: usize) -> Vec<String> {
    lcg(1).take(n).map(key).collect()
}

fn pass(tree: &mut ElementTree, root: NodeId, src: &[String]) -> SyncReport {
    let mut list = tree.children_of(root);
    let r: Result<SyncReport, Infallible> =
        sync_list(src, &mut list, "div", |k| k.clone(), |_, _, _| Ok(()));
    match r {
        Ok(report) => report,
        Err(e) => match e {},
    }
}

fn populated(src: &[String]) -> (ElementTree, NodeId) {
    let mut tree: ElementTree = ElementTree::new();
    let root = tree.create_element("div");
    pass(&mut tree, root, src);
    (tree, root)
}

fn bench_unchanged(c: &mut Criterion) {
    for n in [50usize, 500] {
        let src = keys(n);
        let (mut tree, root) = populated(&src);
        c.bench_function(&format!("sync_list_unchanged_{n}"), |b| {
            b.iter(|| black_box(pass(&mut tree, root, &src)))
        });
    }
}

fn bench_build(c: &mut Criterion) {
    for n in [50usize, 500] {
        let src = keys(n);
        c.bench_function(&format!("sync_list_build_{n}"), |b| {
            b.iter_batched(
                || {
                    let mut tree: ElementTree = ElementTree::new();
                    let root = tree.create_element("div");
                    (tree, root)
                },
                |(mut tree, root)| black_box(pass(&mut tree, root, &src)),
                BatchSize::SmallInput,
            )
        });
    }
}

// Reversal is the worst case: every position needs a scan and a move.
fn bench_reverse(c: &mut Criterion) {
    for n in [50usize, 500] {
        let src = keys(n);
        let mut rev = src.clone();
        rev.reverse();
        c.bench_function(&format!("sync_list_reverse_{n}"), |b| {
            b.iter_batched(
                || populated(&src),
                |(mut tree, root)| black_box(pass(&mut tree, root, &rev)),
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_rotate_one(c: &mut Criterion) {
    let src = keys(50);
    let mut rotated = src.clone();
    rotated.rotate_left(1);
    c.bench_function("sync_list_rotate_50", |b| {
        b.iter_batched(
            || populated(&src),
            |(mut tree, root)| black_box(pass(&mut tree, root, &rotated)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_unchanged, bench_build, bench_reverse, bench_rotate_one
}
criterion_main!(benches);
