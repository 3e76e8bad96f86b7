use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tvariant::{Variant, Visit, Visitor, t, visit::visit};

type Number = Variant![u8, u32, u64, f64];

#[derive(Clone, Copy)]
enum NativeNumber {
    U8(u8),
    U32(u32),
    U64(u64),
    F64(f64),
}

struct Widen;

impl Visitor for Widen {
    type Output = f64;
}

trait Widening: Copy {
    fn widen(self) -> f64;
}

impl Widening for u8 {
    fn widen(self) -> f64 {
        self.into()
    }
}

impl Widening for u32 {
    fn widen(self) -> f64 {
        self.into()
    }
}

impl Widening for u64 {
    fn widen(self) -> f64 {
        self as f64
    }
}

impl Widening for f64 {
    fn widen(self) -> f64 {
        self
    }
}

impl<'a, T: Widening> Visit<(&'a T, ())> for Widen {
    fn visit(self, (x, ()): (&'a T, ())) -> f64 {
        x.widen()
    }
}

struct Product;

impl Visitor for Product {
    type Output = f64;
}

impl<'a, 'b, A: Widening, B: Widening> Visit<(&'a A, (&'b B, ()))> for Product {
    fn visit(self, (a, (b, ())): (&'a A, (&'b B, ()))) -> f64 {
        a.widen() * b.widen()
    }
}

fn numbers() -> Vec<Number> {
    (0..1024u32)
        .map(|i| match i % 4 {
            0 => Number::new(i as u8),
            1 => Number::new(i),
            2 => Number::new(u64::from(i) << 20),
            _ => Number::new(f64::from(i) / 3.0),
        })
        .collect()
}

fn native_numbers() -> Vec<NativeNumber> {
    (0..1024u32)
        .map(|i| match i % 4 {
            0 => NativeNumber::U8(i as u8),
            1 => NativeNumber::U32(i),
            2 => NativeNumber::U64(u64::from(i) << 20),
            _ => NativeNumber::F64(f64::from(i) / 3.0),
        })
        .collect()
}

fn widen_native(n: &NativeNumber) -> f64 {
    match *n {
        NativeNumber::U8(x) => x.widen(),
        NativeNumber::U32(x) => x.widen(),
        NativeNumber::U64(x) => x.widen(),
        NativeNumber::F64(x) => x.widen(),
    }
}

fn bench_visit_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("visit_single");
    let variants = numbers();
    let natives = native_numbers();

    group.bench_function("variant_visit", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for v in &variants {
                sum += black_box(v).visit(Widen).unwrap_or(0.0);
            }
            black_box(sum)
        });
    });

    group.bench_function("enum_match", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for n in &natives {
                sum += widen_native(black_box(n));
            }
            black_box(sum)
        });
    });

    group.finish();
}

fn bench_visit_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("visit_pair");
    let variants = numbers();
    let natives = native_numbers();

    // 4 * 4 dispatch cells
    group.bench_function("variant_visit", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for (x, y) in variants.iter().zip(variants.iter().rev()) {
                sum += visit(Product, t![black_box(x), black_box(y)]).unwrap_or(0.0);
            }
            black_box(sum)
        });
    });

    group.bench_function("enum_match", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for (x, y) in natives.iter().zip(natives.iter().rev()) {
                sum += widen_native(black_box(x)) * widen_native(black_box(y));
            }
            black_box(sum)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_visit_single, bench_visit_pair);
criterion_main!(benches);
