use criterion::{Criterion, black_box, criterion_group, criterion_main};
use linksig::{KeyPair, generate_decoys, ring_sign, ring_verify};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn bench_sign(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let keys = KeyPair::random(&mut rng);
    let msg = b"benchmark message";

    c.bench_function("sm2_sign", |bencher| {
        bencher.iter(|| {
            let sig = keys.signing_key().sign(&mut rng, black_box(msg)).expect("sign");
            black_box(sig);
        })
    });
}

fn bench_verify(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let keys = KeyPair::random(&mut rng);
    let msg = b"benchmark message";
    let sig = keys.signing_key().sign(&mut rng, msg).expect("sign");

    c.bench_function("sm2_verify", |bencher| {
        bencher.iter(|| {
            let ok = keys.verifying_key().verify(black_box(msg), black_box(&sig));
            black_box(ok);
        })
    });
}

fn bench_ring(c: &mut Criterion) {
    let keys = KeyPair::generate(7);
    let msg = b"benchmark message";

    for decoys in [1usize, 4, 10] {
        let set = generate_decoys(b"bench decoys", decoys).expect("decoys");
        let ring = set.ring_with(keys.verifying_key());
        let sig = ring_sign(b"bench", keys.signing_key(), &set, msg).expect("ring sign");

        c.bench_function(&format!("ring_sign_{}", decoys + 1), |bencher| {
            bencher.iter(|| {
                let sig = ring_sign(b"bench", keys.signing_key(), black_box(&set), black_box(msg))
                    .expect("ring sign");
                black_box(sig);
            })
        });

        c.bench_function(&format!("ring_verify_{}", decoys + 1), |bencher| {
            bencher.iter(|| black_box(ring_verify(black_box(msg), &ring, black_box(&sig))))
        });
    }
}

criterion_group!(benches, bench_sign, bench_verify, bench_ring);
criterion_main!(benches);
