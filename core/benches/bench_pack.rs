use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dspack_core::{Codec, Value};

const SCHEMA: &str = "!H(day)B(dev)3s(cc)~s(name)~:Q(ids)";

fn make_rows(n: usize) -> Vec<Vec<Value>> {
    (0..n)
        .map(|i| {
            vec![
                Value::from(i as u16),
                Value::from((i % 7) as u8),
                Value::from("CNX"),
                Value::from(format!("device-{}", i)),
                Value::list((0..(i % 8) as u64).collect::<Vec<_>>()),
            ]
        })
        .collect()
}

fn bench_pack(c: &mut Criterion) {
    let codec = Codec::new(SCHEMA).expect("schema");
    let mut group = c.benchmark_group("pack_rows");
    for &n in &[1usize, 100, 10_000] {
        let rows = make_rows(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &rows, |b, rows| {
            b.iter(|| {
                let mut packer = codec.packer();
                packer.add_rows(rows).expect("pack");
                packer.into_bytes()
            })
        });
    }
    group.finish();
}

fn bench_unpack(c: &mut Criterion) {
    let codec = Codec::new(SCHEMA).expect("schema");
    let mut group = c.benchmark_group("unpack_rows");
    for &n in &[1usize, 100, 10_000] {
        let mut packer = codec.packer();
        packer.add_rows(make_rows(n)).expect("pack");
        let data = packer.into_bytes();

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter(|| {
                let decoded = codec.decode_all(data).filter(Result::is_ok).count();
                assert_eq!(decoded, n);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pack, bench_unpack);
criterion_main!(benches);
