//! serde round trips for the scalar types

use super::*;

#[test]
fn scalars_round_trip_through_json() {
    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Eq)]
    struct Scalars {
        fixed: Fixed,
        f2dot14: F2Dot14,
        gid: GlyphId,
        date: LongDateTime,
        name_id: NameId,
        offset: Offset32,
        tag: Tag,
        u24: Uint24,
        major_minor: MajorMinor,
        version: Version16Dot16,
    }

    let scalars = Scalars {
        fixed: Fixed::from_f64(-3.25),
        f2dot14: F2Dot14::from_f32(0.75),
        gid: GlyphId::new(12),
        date: LongDateTime::new(3_000_000_000),
        name_id: NameId::new(300),
        offset: Offset32::new(1024),
        tag: Tag::new(b"wght"),
        u24: Uint24::new(0xFE0F),
        major_minor: MajorMinor::VERSION_1_1,
        version: Version16Dot16::VERSION_2_5,
    };

    let json = serde_json::to_string(&scalars).unwrap();
    assert!(json.contains("\"wght\""));
    let loaded: Scalars = serde_json::from_str(&json).unwrap();
    assert_eq!(scalars, loaded);
}
