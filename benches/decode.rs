use std::io::Write;

use base64::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flate2::write::DeflateEncoder;
use flate2::Compression;

use xadder::packed::{PackedArray, PackedValueType};
use xadder::reader::XadReader;
use xadder::sink::DiscardSink;

fn utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

fn signal_base64(samples: usize) -> String {
    let bytes: Vec<u8> = (0..samples)
        .flat_map(|i| ((i as f32 * 0.01).sin() * 50.0).to_le_bytes())
        .collect();
    BASE64_STANDARD.encode(bytes)
}

/// A file with `chips` chips, each holding one signal of `samples` floats
fn generate_test_xad(chips: usize, samples: usize) -> String {
    let signal = signal_base64(samples);
    let mut chipset = String::from("<Chipset><FileType>XAD</FileType><Chips>");
    for chip in 0..chips {
        chipset.push_str(&format!(
            "<Chip><ID>{chip}</ID><RawSignals><Sample1><Channel><SignalData>\
             <RawSignal numvalues=\"{samples}\" vartype=\"LE_R4\">{signal}</RawSignal>\
             </SignalData></Channel></Sample1></RawSignals></Chip>"
        ));
    }
    chipset.push_str("</Chips></Chipset>");

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&utf16le(&chipset)).unwrap();
    let mut raw = vec![0u8; 76];
    raw.extend(encoder.finish().unwrap());
    raw.extend_from_slice(&[0u8; 9]);

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\r\n<compressed_data>{}</compressed_data>\r\n",
        BASE64_STANDARD.encode(raw)
    )
}

fn bench_packed_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("packed_decode_f32");

    for samples in [1_000, 10_000, 100_000] {
        let body = signal_base64(samples);

        group.throughput(Throughput::Elements(samples as u64));
        group.bench_with_input(BenchmarkId::from_parameter(samples), &body, |b, body| {
            b.iter(|| {
                let array = PackedArray::decode(body, PackedValueType::Float32, samples).unwrap();
                black_box(array.len());
            });
        });
    }

    group.finish();
}

fn bench_read_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("xad_reader_read_str");
    let reader = XadReader::default();

    for chips in [1, 4, 12] {
        let samples = 20_000;
        let doc = generate_test_xad(chips, samples);

        group.throughput(Throughput::Elements((chips * samples) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chips), &doc, |b, doc| {
            b.iter(|| {
                let file = reader.read_str(doc, &mut DiscardSink).unwrap();
                black_box(file.chips().count());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_packed_decode, bench_read_file);
criterion_main!(benches);
