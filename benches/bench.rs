use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use logistic_roots::{
    expr::parse,
    model::LogisticModel,
    roots::{bisect, bisection, newton, newton_raphson},
};

criterion_main!(micro_benches, realistic_benches);
criterion_group!(micro_benches, parse_formula, differentiate, tolerance_sweep);

const EQUATION: &str = "1000000/(1 + 999*exp(-0.01*t)) - 10000";

pub fn parse_formula(c: &mut Criterion) {
    c.bench_function("parse", |b| b.iter(|| parse(black_box(EQUATION))));
}

pub fn differentiate(c: &mut Criterion) {
    let e = parse(EQUATION).unwrap();
    c.bench_function("diff", |b| b.iter(|| black_box(&e).diff("t")));
}

pub fn tolerance_sweep(c: &mut Criterion) {
    let f = LogisticModel::default().equation().unwrap();
    let df = f.derivative();
    let mut group = c.benchmark_group("logistic tolerance");
    for tol in [1e-2, 1e-5, 1e-8, 1e-11] {
        group.bench_with_input(BenchmarkId::new("bisection", tol), &tol, |b, &tol| {
            b.iter(|| bisection(&|t| f.eval(t), 200.0, 300.0, black_box(tol), 100))
        });
        group.bench_with_input(BenchmarkId::new("newton", tol), &tol, |b, &tol| {
            b.iter(|| newton_raphson(&|t| f.eval(t), &|t| df.eval(t), 200.0, black_box(tol), 100))
        });
    }
    group.finish();
}

criterion_group!(realistic_benches, population_study);

/// Both solvers from formula text, as the study runs them.
pub fn population_study(c: &mut Criterion) {
    let f = LogisticModel::default().equation().unwrap();
    let (f, df) = (f.to_string(), f.derivative().to_string());
    let mut group = c.benchmark_group("population study");
    group.bench_function("bisect", |b| {
        b.iter(|| bisect(black_box(&f), 200.0, 300.0, 1e-5, 25))
    });
    group.bench_function("newton", |b| {
        b.iter(|| newton(200.0, black_box(&f), black_box(&df), 1e-5, 30))
    });
    group.finish();
}
