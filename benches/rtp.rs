use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rtp_codec::{Header, Packet};

#[rustfmt::skip]
mod samples {
    pub const GENERIC: &[u8] = &[
        0x90, 0xe0, 0x69, 0x8f, 0xd9, 0xc2, 0x93, 0xda, 0x1c, 0x64,
        0x27, 0x82, 0x00, 0x01, 0x00, 0x01, 0xff, 0xff, 0xff, 0xff,
        0x98, 0x36, 0xbe, 0x88, 0x9e,
    ];

    pub const ONE_BYTE: &[u8] = &[
        0x90, 0x60, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00,
        0x00, 0x03, 0xbe, 0xde, 0x00, 0x02, 0x13, 0x01, 0x02, 0x03,
        0x04, 0x22, 0xaa, 0x36, 0x3f, 0xde, 0xad,
    ];

    pub const TWO_BYTE: &[u8] = &[
        0x90, 0x60, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00,
        0x00, 0x03, 0x10, 0x00, 0x00, 0x02, 0x01, 0x04, 0x01, 0x02,
        0x03, 0x04, 0x02, 0x00, 0xde, 0xad,
    ];
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut samples = [samples::GENERIC, samples::ONE_BYTE, samples::TWO_BYTE]
        .into_iter()
        .cycle();

    let mut rtp_criterion = c.benchmark_group("rtp");

    rtp_criterion.throughput(Throughput::Elements(1));
    rtp_criterion.bench_function("decode_all_samples", |bencher| {
        bencher.iter(|| {
            Packet::decode(samples.next().unwrap()).unwrap();
        })
    });

    let mut header = Header::decode(samples::ONE_BYTE).unwrap();
    let mut buffer = [0u8; 1500];

    rtp_criterion.bench_function("encode_one_byte_header", |bencher| {
        bencher.iter(|| {
            header.encode(&mut buffer).unwrap();
        })
    });

    rtp_criterion.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
