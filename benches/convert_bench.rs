use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use tally2ledger::utils::prepare_input;
use tally2ledger::Export;

fn synthetic_export(vouchers: usize) -> String {
    (1..=vouchers)
        .map(|i| {
            format!(
                "{}-4-2014,\"Account {}\",,,\"Jrnl\",{}.50,,,\"Cash\",,,,\"Bank\",{}.50,,,,,,,,,,,,\"note {}\",\"(No. : {})\",",
                i % 28 + 1,
                i,
                i,
                i,
                i,
                i
            )
        })
        .collect()
}

fn convert(text: &str) -> Export {
    let (export, _) = Export::from_str(text, Arc::new("bench".to_string())).unwrap();
    export
}

fn criterion_benchmark(c: &mut Criterion) {
    let text = match std::env::var("TALLY2LEDGER_BENCH_INPUT") {
        Ok(path) => {
            let bytes = std::fs::read(&path).unwrap();
            prepare_input(&bytes, &Arc::new(path)).unwrap()
        }
        Err(_) => synthetic_export(10_000),
    };
    c.bench_function("Convert export", |b| b.iter(|| convert(&text)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
