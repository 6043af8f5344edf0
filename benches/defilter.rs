use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use png_defilter_core::harness::random_image;
use png_defilter_core::{defilter_opt, defilter_ref, defilter_simd};

const WIDTH: u32 = 256;
const HEIGHT: u32 = 256;

fn bench_kernel(c: &mut Criterion, group_name: &str, kernel: fn(&mut [u8], u32, u32, u32)) {
    let mut group = c.benchmark_group(group_name);

    for &bpp in &[1u32, 2, 3, 4, 6, 8] {
        let bpl = WIDTH * bpp + 1;
        let image = random_image(0xB00B_u64 + u64::from(bpp), HEIGHT, WIDTH, bpp, 5);

        group.throughput(Throughput::Bytes(image.len() as u64));
        group.bench_function(format!("bpp={bpp}"), |b| {
            b.iter(|| {
                let mut buf = image.clone();
                kernel(black_box(&mut buf), HEIGHT, bpp, bpl);
                black_box(buf);
            })
        });
    }
}

fn defilter_ref_bench(c: &mut Criterion) {
    bench_kernel(c, "[defilter]: reference", defilter_ref);
}

fn defilter_opt_bench(c: &mut Criterion) {
    bench_kernel(c, "[defilter]: specialized", defilter_opt);
}

fn defilter_simd_bench(c: &mut Criterion) {
    bench_kernel(c, "[defilter]: simd", defilter_simd);
}

criterion_group!(
    name = benches;
    config = {
        let c = Criterion::default();
        c.measurement_time(Duration::from_secs(10))
    };
    targets = defilter_ref_bench, defilter_opt_bench, defilter_simd_bench
);

criterion_main!(benches);
