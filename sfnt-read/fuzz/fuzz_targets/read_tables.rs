#![no_main]
use libfuzzer_sys::fuzz_target;

use sfnt_read::{types::GlyphId, FontRef, TableProvider};

fuzz_target!(|data: &[u8]| {
    if let Ok(font) = FontRef::new(data) {
        let _ = font.checksum_mismatches();
        let _ = font.head();
        let _ = font.hhea();
        let _ = font.hmtx();
        let _ = font.os2();
        let _ = font.post();
        let _ = font.name();
        let _ = font.kern();
        let _ = font.fvar();
        if let Ok(cmap) = font.cmap() {
            let _ = cmap.map_codepoint(0x41u32);
        }
        if let Ok(maxp) = font.maxp() {
            for gid in 0..maxp.num_glyphs.min(64) {
                let _ = font.glyph(GlyphId::new(gid));
            }
        }
        if let Ok(gpos) = font.gpos() {
            let _ = gpos.script_list();
            let _ = gpos.feature_list();
            let _ = gpos.lookups();
        }
    };
});
