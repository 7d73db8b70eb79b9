use br_core::bits::to_bit_string;
use br_core::table::BitIndexedTable;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn full_table(width: usize) -> BitIndexedTable {
    let mut table = BitIndexedTable::new(width).unwrap_or_else(|e| panic!("{e}"));
    for v in 0..(1u32 << width) {
        let _ = table.insert(&to_bit_string(v, width), format!("{v:x}"));
    }
    table
}

fn bench_lookup(c: &mut Criterion) {
    let table = full_table(8);
    let keys: Vec<String> = (0..256u32).map(|v| to_bit_string(v, 8)).collect();

    c.bench_function("lookup_8bit_all_keys", |b| {
        b.iter(|| {
            for key in &keys {
                let _ = black_box(table.lookup(black_box(key)));
            }
        });
    });
}

fn bench_entries(c: &mut Criterion) {
    let table = full_table(8);
    c.bench_function("entries_8bit_full", |b| {
        b.iter(|| black_box(table.entries().count()));
    });
}

criterion_group!(benches, bench_lookup, bench_entries);
criterion_main!(benches);
