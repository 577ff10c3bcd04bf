//! Decode every table of a complete synthetic font through [`TableProvider`].

use pretty_assertions::assert_eq;
use sfnt_read::{
    tables::{
        cmap::CmapSubtable,
        glyf::{Anchor, CurvePoint, Glyph, Transform},
        gpos::PositionSubtable,
        head::LocFormat,
    },
    types::{GlyphId, NameId, Tag},
    ErrorKind, FontRef, TableProvider,
};
use sfnt_test_data::tiny;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn gid(raw: u16) -> GlyphId {
    GlyphId::new(raw)
}

#[test]
fn directory() {
    init_logger();
    let data = tiny::font();
    let font = FontRef::new(&data).unwrap();
    assert_eq!(font.records().len(), 12);
    assert!(font.records().windows(2).all(|w| w[0].tag < w[1].tag));
    assert!(font.contains(Tag::new(b"glyf")));
    assert!(!font.contains(Tag::new(b"CFF ")));
    assert_eq!(font.table_len(Tag::new(b"head")), Some(54));
    assert_eq!(font.table_len(Tag::new(b"loca")), Some(10));
    assert!(font.checksum_mismatches().is_empty());
}

#[test]
fn header_tables() {
    init_logger();
    let data = tiny::font();
    let font = FontRef::new(&data).unwrap();

    let head = font.head().unwrap();
    assert_eq!(head.units_per_em, tiny::UNITS_PER_EM);
    assert_eq!(head.loc_format(), Some(LocFormat::Short));
    assert_eq!((head.x_max, head.y_max), (500, 900));

    let maxp = font.maxp().unwrap();
    assert_eq!(maxp.num_glyphs, tiny::NUM_GLYPHS);
    assert_eq!(maxp.truetype.unwrap().max_component_depth, 1);

    let hhea = font.hhea().unwrap();
    assert_eq!(hhea.ascender, 800);
    assert_eq!(hhea.number_of_h_metrics, 3);

    let os2 = font.os2().unwrap();
    assert_eq!(os2.version, 4);
    assert_eq!(os2.us_weight_class, 400);
    assert_eq!(os2.us_max_context, Some(1));
    assert_eq!(os2.us_lower_optical_point_size, None);
}

#[test]
fn metrics() {
    let data = tiny::font();
    let font = FontRef::new(&data).unwrap();
    let hmtx = font.hmtx().unwrap();
    assert_eq!(hmtx.metrics.len(), tiny::NUM_GLYPHS as usize);
    assert_eq!(hmtx.advance(gid(1)), Some(250));
    assert_eq!(hmtx.advance(gid(3)), Some(600));
    assert_eq!(hmtx.side_bearing(gid(3)), Some(50));
    assert_eq!(hmtx.advance(gid(4)), None);
}

#[test]
fn names() {
    let data = tiny::font();
    let font = FontRef::new(&data).unwrap();
    let name = font.name().unwrap();
    assert_eq!(name.name_records.len(), 3);
    assert_eq!(name.find(NameId::FAMILY_NAME), Some("Tiny"));
    assert_eq!(name.find(NameId::SUBFAMILY_NAME), Some("Regular"));
    assert_eq!(name.find(NameId::POSTSCRIPT_NAME), None);

    let post = font.post().unwrap();
    assert_eq!(post.underline_position, -100);
    assert_eq!(post.glyph_name(gid(0)), Some(".notdef"));
    assert_eq!(post.glyph_name(gid(1)), Some("space"));
    assert_eq!(post.glyph_name(gid(2)), Some("A"));
    assert_eq!(post.glyph_name(gid(3)), Some("Aring.comp"));
}

#[test]
fn character_map() {
    let data = tiny::font();
    let font = FontRef::new(&data).unwrap();
    let cmap = font.cmap().unwrap();
    assert_eq!(cmap.encoding_records.len(), 2);
    assert!(cmap.subtables.iter().all(Result::is_ok));

    for (codepoint, expected) in [(0x20u32, 1), (0x41, 2), (0xC5, 3)] {
        assert_eq!(cmap.map_codepoint(codepoint), Some(gid(expected)));
    }
    assert_eq!(cmap.map_codepoint(0x42u32), None);
    assert_eq!(cmap.map_codepoint(0x1F600u32), None);

    let Some(CmapSubtable::Format4(bmp)) = cmap.subtable(3, 1) else {
        panic!("expected a format 4 subtable");
    };
    assert_eq!(
        bmp.iter().collect::<Vec<_>>(),
        [(0x20, gid(1)), (0x41, gid(2)), (0xC5, gid(3))]
    );
    let full = cmap.subtable(3, 10).unwrap();
    assert_eq!(full.format(), 12);
    assert_eq!(full.map_codepoint(0xC5u32), Some(gid(3)));
}

#[test]
fn outlines() {
    let data = tiny::font();
    let font = FontRef::new(&data).unwrap();
    let loca = font.loca().unwrap();
    assert_eq!(loca.offsets(), [0, 0, 0, 24, 42]);

    assert_eq!(font.glyph(gid(0)).unwrap(), Glyph::Empty);
    assert_eq!(font.glyph(gid(1)).unwrap(), Glyph::Empty);

    let Glyph::Simple(triangle) = font.glyph(gid(2)).unwrap() else {
        panic!("expected a simple glyph");
    };
    assert_eq!(
        triangle.points,
        [
            CurvePoint::on_curve(0, 0),
            CurvePoint::on_curve(250, 700),
            CurvePoint::on_curve(500, 0),
        ]
    );

    let Glyph::Composite(composite) = font.glyph(gid(3)).unwrap() else {
        panic!("expected a composite glyph");
    };
    assert_eq!(composite.components.len(), 1);
    let component = &composite.components[0];
    assert_eq!(component.glyph, gid(2));
    assert_eq!(component.anchor, Anchor::Offset { x: 0, y: 200 });
    assert_eq!(component.transform, Transform::None);
    assert_eq!(composite.bytes_consumed, 18);

    let err = font.glyph(gid(4)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InconsistentStructure);
}

#[test]
fn kerning_and_positioning() {
    let data = tiny::font();
    let font = FontRef::new(&data).unwrap();
    let kern = font.kern().unwrap();
    assert_eq!(kern.kerning(gid(2), gid(3)), Some(-30));
    assert_eq!(kern.kerning(gid(3), gid(2)), None);

    let gpos = font.gpos().unwrap();
    let lookups = gpos.lookups().unwrap();
    let PositionSubtable::Single(single) = &lookups[0].subtables[0] else {
        panic!("expected a single adjustment");
    };
    assert_eq!(single.adjustment(gid(3)).unwrap().x_advance, Some(-10));
}

#[test]
fn missing_tables() {
    let data = tiny::font();
    let font = FontRef::new(&data).unwrap();
    let err = font.fvar().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TableNotFound);
    assert_eq!(err.tag(), Some(Tag::new(b"fvar")));

    // hmtx needs the glyph count from maxp
    let mut builder = tiny::builder();
    builder.add_raw(Tag::new(b"maxp"), Vec::new());
    let data = builder.build();
    let font = FontRef::new(&data).unwrap();
    let err = font.hmtx().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TruncatedInput);
    assert_eq!(err.tag(), Some(Tag::new(b"maxp")));
    // unrelated tables still decode
    assert!(font.head().is_ok());
    assert!(font.kern().is_ok());
}

#[test]
fn long_loca_format() {
    let mut head = tiny::head().into_inner();
    // indexToLocFormat
    head[51] = 1;
    let mut builder = tiny::builder();
    builder
        .add_raw(Tag::new(b"head"), head)
        .add_raw(Tag::new(b"loca"), {
            let offsets: [u32; 5] = [0, 0, 0, 24, 42];
            offsets.iter().flat_map(|x| x.to_be_bytes()).collect::<Vec<_>>()
        });
    let data = builder.build();
    let font = FontRef::new(&data).unwrap();
    let loca = font.loca().unwrap();
    assert_eq!(loca.format, LocFormat::Long);
    assert!(matches!(font.glyph(gid(3)).unwrap(), Glyph::Composite(_)));
}
