use criterion::{black_box, criterion_group, criterion_main, Criterion};
use downbooru::{DuplicateFilter, Post, Rating, SearchRequest};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

const TAGS: [&str; 8] = [
    "Deep Rock Galactic",
    "dwarf",
    "beard",
    "pickaxe",
    "Glyphid",
    "cave",
    "helmet lamp",
    "-furry",
];

fn seed_image(size: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(size, size, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn fingerprint_benchmark(c: &mut Criterion) {
    let filter = DuplicateFilter::new();
    let small = seed_image(256);
    let large = seed_image(1536);

    c.bench_function("fingerprint 256px png", |b| {
        b.iter(|| filter.fingerprint_bytes(black_box(&small)).unwrap())
    });

    c.bench_function("fingerprint 1536px png", |b| {
        b.iter(|| filter.fingerprint_bytes(black_box(&large)).unwrap())
    });
}

fn query_benchmark(c: &mut Criterion) {
    c.bench_function("build page query", |b| {
        b.iter(|| {
            SearchRequest::new(black_box(&TAGS), Rating::Questionable)
                .page_size(1000)
                .page(black_box(12))
                .to_url(downbooru::config::DEFAULT_API_URL, None)
        })
    });

    c.bench_function("map post extension", |b| {
        b.iter(|| {
            Post::new(
                black_box(123456),
                "",
                black_box("https://img3.gelbooru.com/images/ab/cd/abcdef0123456789.jpeg"),
            )
        })
    });
}

criterion_group!(benches, fingerprint_benchmark, query_benchmark);
criterion_main!(benches);
