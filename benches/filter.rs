use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use picker::prelude::*;

fn entries() -> ItemStore {
    (0..50_000)
        .map(|i| match i % 4 {
            0 => format!("/usr/share/applications/test-app-{i}.desktop"),
            1 => format!("IMG:/tmp/thumbs/{i}.png\tpicture {i}"),
            2 => format!("Test Suite {i}"),
            _ => format!("unrelated entry number {i}"),
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let store = entries();

    c.bench_function("respect", |b| {
        b.iter(|| compute_matches(black_box(&store), "test", CaseMatching::Respect));
    });
    c.bench_function("ignore", |b| {
        b.iter(|| compute_matches(black_box(&store), "test", CaseMatching::Ignore));
    });
    c.bench_function("multi_token", |b| {
        b.iter(|| compute_matches(black_box(&store), "app desktop 12", CaseMatching::Ignore));
    });
    c.bench_function("typing", |b| {
        let options = PickerOptionsBuilder::default().lines(20).build().unwrap();
        b.iter(|| {
            let mut picker = Picker::from_options(&options, store.clone());
            for c in "test-app-1".chars() {
                picker.handle(Action::AddChar(c));
            }
            picker.matched_count()
        });
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = criterion_benchmark
);
criterion_main!(benches);
