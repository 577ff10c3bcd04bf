use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sfnt_read::{
    tables::cmap::{Cmap, CmapSubtable},
    FontData, FontReadWithArgs,
};
use sfnt_test_data::bebuffer::BeBuffer;

const CODES_PER_SEGMENT: u16 = 16;

/// A (3, 1) cmap with a single format 4 subtable of `n_segments` segments,
/// each mapping 16 codes to consecutive glyphs, plus the final 0xFFFF segment.
fn format_4_cmap(n_segments: u16) -> (Vec<u8>, u16) {
    let seg_count = n_segments + 1;
    let entry_selector = 15 - seg_count.leading_zeros() as u16;
    let search_range = 2 << entry_selector;
    let starts: Vec<u16> = (0..n_segments).map(|i| 32 + i * 64).collect();
    let ends = starts.iter().map(|start| start + CODES_PER_SEGMENT - 1);
    let deltas = starts
        .iter()
        .enumerate()
        .map(|(i, start)| (i as u16 * CODES_PER_SEGMENT + 1).wrapping_sub(*start));

    let subtable = BeBuffer::new()
        .extend([4u16, 16 + 8 * seg_count, 0])
        .extend([seg_count * 2, search_range, entry_selector])
        .push(seg_count * 2 - search_range)
        .extend(ends.chain([0xFFFF]))
        .push(0u16)
        .extend(starts.iter().copied().chain([0xFFFF]))
        .extend(deltas.chain([1]))
        .extend(std::iter::repeat(0u16).take(seg_count as usize));
    let table = BeBuffer::new()
        .extend([0u16, 1, 3, 1])
        .push(12u32)
        .extend_bytes(&subtable);
    (table.into_inner(), n_segments * CODES_PER_SEGMENT + 1)
}

pub fn format_4_lookup(c: &mut Criterion) {
    for n_segments in [16u16, 256, 1000] {
        let (data, num_glyphs) = format_4_cmap(n_segments);
        let cmap = Cmap::read_with_args(FontData::new(&data), &num_glyphs).unwrap();
        let Ok(CmapSubtable::Format4(cmap4)) = &cmap.subtables[0] else {
            panic!("expected format 4");
        };
        c.bench_with_input(
            BenchmarkId::new("format_4_map_codepoint", n_segments),
            &n_segments,
            |b, &n_segments| {
                b.iter(|| {
                    for code in (32..n_segments as u32 * 64).step_by(7) {
                        black_box(cmap4.map_codepoint(code));
                    }
                })
            },
        );
    }
}

pub fn format_4_decode(c: &mut Criterion) {
    let (data, num_glyphs) = format_4_cmap(1000);
    c.bench_function("format_4_decode", |b| {
        b.iter(|| Cmap::read_with_args(FontData::new(black_box(&data)), &num_glyphs))
    });
}

criterion_group!(benches, format_4_lookup, format_4_decode);
criterion_main!(benches);
