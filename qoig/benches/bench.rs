use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use qoig::{decode::QoigDecodeContext, encode::QoigEncodeContext, EncodeConfig, QoigDesc};
use rand::{rngs::SmallRng, Rng, SeedableRng};

const SIZE: u32 = 256;

fn test_images() -> Vec<(&'static str, Vec<u8>)> {
    let mut rng = SmallRng::seed_from_u64(0xBE5C);
    let count = (SIZE * SIZE) as usize;

    let gradient: Vec<u8> = (0..count)
        .flat_map(|i| {
            let x = (i as u32 % SIZE) as u8;
            let y = (i as u32 / SIZE) as u8;
            [x, x.wrapping_add(y / 2), y, 255]
        })
        .collect();

    let palette: Vec<[u8; 4]> = (0..32)
        .map(|_| [rng.random(), rng.random(), rng.random(), 255])
        .collect();
    let paletted: Vec<u8> = (0..count)
        .flat_map(|i| palette[(i * 13 + i / 7) % palette.len()])
        .collect();

    let mut noise = Vec::with_capacity(count * 4);
    for _ in 0..count {
        noise.extend_from_slice(&[rng.random(), rng.random(), rng.random(), 255]);
    }

    vec![
        ("gradient", gradient),
        ("paletted", paletted),
        ("noise", noise),
    ]
}

fn encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let desc = QoigDesc::new(SIZE, SIZE, 4);

    for (image_name, pixels) in test_images() {
        group.throughput(criterion::Throughput::Elements((SIZE * SIZE) as u64));
        for (cfg_name, cfg) in [
            ("plain", EncodeConfig::PLAIN_QOI),
            ("fast", EncodeConfig::fast(26)),
            ("max", EncodeConfig::max(26)),
        ] {
            group.bench_with_input(
                BenchmarkId::new(cfg_name, image_name),
                &pixels,
                |b, pixels| {
                    let mut encoded = Vec::with_capacity(pixels.len());
                    b.iter(|| {
                        encoded.clear();
                        QoigEncodeContext::encode_to_vec(pixels, &desc, &cfg, &mut encoded)
                    })
                },
            );
        }
    }
}

fn decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let desc = QoigDesc::new(SIZE, SIZE, 4);

    for (image_name, pixels) in test_images() {
        group.throughput(criterion::Throughput::Elements((SIZE * SIZE) as u64));
        for (cfg_name, cfg) in [
            ("plain", EncodeConfig::PLAIN_QOI),
            ("max", EncodeConfig::max(26)),
        ] {
            let mut encoded = Vec::new();
            QoigEncodeContext::encode_to_vec(&pixels, &desc, &cfg, &mut encoded).unwrap();
            group.bench_with_input(
                BenchmarkId::new(cfg_name, image_name),
                &encoded,
                |b, encoded| {
                    let mut output = Vec::with_capacity(pixels.len());
                    b.iter(|| {
                        output.clear();
                        QoigDecodeContext::decode_to_vec(encoded, &mut output)
                    })
                },
            );
        }
    }
}

criterion_group!(benches, encode, decode);
criterion_main!(benches);
