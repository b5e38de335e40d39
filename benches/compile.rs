use criterion::{black_box, criterion_group, criterion_main, Criterion};
use predicata::{CacheKeyMode, CompilerOptions, Condition, Operator, Predicate, Record, RuleCompiler, Schema};

struct Account {
    balance: i64,
    credit_score: i64,
    is_active: bool,
}

impl Record for Account {
    fn schema() -> Schema<Self> {
        Schema::builder("Account")
            .field("Balance", |a: &Account| a.balance)
            .field("CreditScore", |a: &Account| a.credit_score)
            .field("IsActive", |a: &Account| a.is_active)
            .build()
    }
}

fn rules(n: usize) -> Vec<Condition> {
    (0..n)
        .map(|i| match i % 3 {
            0 => Condition::new("Balance", Operator::GreaterThan).value(&(i * 10).to_string()).and(),
            1 => Condition::between("CreditScore", "600", "850").or(),
            _ => Condition::new("IsActive", Operator::Equals).value("true").and(),
        })
        .collect()
}

fn bench_cold(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_cold");

    for &n in &[5, 20, 50] {
        let conditions = rules(n);
        group.bench_function(&format!("{n}_conditions"), |b| {
            b.iter(|| black_box(Predicate::<Account>::compile(black_box(&conditions)).unwrap()));
        });
    }

    group.finish();
}

fn bench_warm(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_cached");

    for mode in [CacheKeyMode::Content, CacheKeyMode::Structural] {
        for &n in &[5, 50] {
            let conditions = rules(n);
            let compiler = RuleCompiler::with_options(CompilerOptions::default().cache_key(mode));
            compiler.compile::<Account>(&conditions).unwrap();
            group.bench_function(&format!("{mode:?}_{n}_conditions"), |b| {
                b.iter(|| black_box(compiler.compile::<Account>(black_box(&conditions)).unwrap()));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_cold, bench_warm);
criterion_main!(benches);
