use criterion::{black_box, criterion_group, criterion_main, Criterion};
use daqmx_errors::registry::{declared_entries, ErrorRegistry};
use daqmx_errors::{lookup, message};

const EXTENDED: &str = "Requested value is not a supported value for this property.\n\
Property: DAQmx_AI_Max\n\
Maximum Value: 10.0\n\
Minimum Value: -10.0\n\
Channel Name: Dev1/ai0\n\
Task Name: bench\n\
Status Code: -200077";

fn bench_lookup(c: &mut Criterion) {
    // Build outside the timed loop
    let _ = ErrorRegistry::global();

    c.bench_function("lookup_hit", |b| b.iter(|| lookup(black_box(-200501))));
    c.bench_function("lookup_miss", |b| b.iter(|| lookup(black_box(1))));
    c.bench_function("registry_build", |b| {
        b.iter(|| ErrorRegistry::from_entries(declared_entries().iter().copied()))
    });
    c.bench_function("parse_extended_message", |b| {
        b.iter(|| message::parse(black_box(EXTENDED)))
    });
}

criterion_group!(benches, bench_lookup);
criterion_main!(benches);
