//! a trait for things that can serve font tables

use types::{GlyphId, Tag};

use crate::{tables, DecodeError, FontData, FontRead, FontReadWithArgs};

/// An interface for accessing tables from a font (or font-like object)
///
/// Each method locates its table by tag and threads in whatever context the
/// decoder needs from other tables. A missing table is an
/// [`ErrorKind::TableNotFound`](crate::ErrorKind::TableNotFound) error.
pub trait TableProvider<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>>;

    fn expect_data_for_tag(&self, tag: Tag) -> Result<FontData<'a>, DecodeError> {
        self.data_for_tag(tag)
            .ok_or_else(|| DecodeError::table_not_found(tag))
    }

    fn head(&self) -> Result<tables::head::Head, DecodeError> {
        self.expect_data_for_tag(tables::head::TAG)
            .and_then(FontRead::read)
    }

    fn maxp(&self) -> Result<tables::maxp::Maxp, DecodeError> {
        self.expect_data_for_tag(tables::maxp::TAG)
            .and_then(FontRead::read)
    }

    fn hhea(&self) -> Result<tables::hhea::Hhea, DecodeError> {
        self.expect_data_for_tag(tables::hhea::TAG)
            .and_then(FontRead::read)
    }

    fn hmtx(&self) -> Result<tables::hmtx::Hmtx, DecodeError> {
        let args = tables::hmtx::HmtxArgs {
            num_glyphs: self.maxp()?.num_glyphs,
            number_of_h_metrics: self.hhea()?.number_of_h_metrics,
        };
        self.expect_data_for_tag(tables::hmtx::TAG)
            .and_then(|data| FontReadWithArgs::read_with_args(data, &args))
    }

    fn os2(&self) -> Result<tables::os2::Os2, DecodeError> {
        self.expect_data_for_tag(tables::os2::TAG)
            .and_then(FontRead::read)
    }

    fn post(&self) -> Result<tables::post::Post, DecodeError> {
        self.expect_data_for_tag(tables::post::TAG)
            .and_then(FontRead::read)
    }

    fn name(&self) -> Result<tables::name::Name, DecodeError> {
        self.expect_data_for_tag(tables::name::TAG)
            .and_then(FontRead::read)
    }

    fn kern(&self) -> Result<tables::kern::Kern, DecodeError> {
        self.expect_data_for_tag(tables::kern::TAG)
            .and_then(FontRead::read)
    }

    fn fvar(&self) -> Result<tables::fvar::Fvar, DecodeError> {
        self.expect_data_for_tag(tables::fvar::TAG)
            .and_then(FontRead::read)
    }

    fn cmap(&self) -> Result<tables::cmap::Cmap, DecodeError> {
        let num_glyphs = self.maxp()?.num_glyphs;
        self.expect_data_for_tag(tables::cmap::TAG)
            .and_then(|data| FontReadWithArgs::read_with_args(data, &num_glyphs))
    }

    fn loca(&self) -> Result<tables::loca::Loca, DecodeError> {
        let args = tables::loca::LocaArgs {
            num_glyphs: self.maxp()?.num_glyphs,
            index_to_loc_format: self.head()?.index_to_loc_format,
            glyf_len: self.expect_data_for_tag(tables::glyf::TAG)?.len(),
        };
        self.expect_data_for_tag(tables::loca::TAG)
            .and_then(|data| FontReadWithArgs::read_with_args(data, &args))
    }

    fn glyf(&self) -> Result<tables::glyf::Glyf<'a>, DecodeError> {
        self.expect_data_for_tag(tables::glyf::TAG)
            .and_then(FontRead::read)
    }

    /// Decode a single glyph, resolving its location through `loca`.
    ///
    /// Callers decoding many glyphs should decode `loca` and `glyf` once and
    /// use [`Glyf::glyph`](tables::glyf::Glyf::glyph) instead.
    fn glyph(&self, gid: GlyphId) -> Result<tables::glyf::Glyph, DecodeError> {
        let loca = self.loca()?;
        self.glyf()?.glyph(&loca, gid)
    }

    fn gpos(&self) -> Result<tables::gpos::Gpos<'a>, DecodeError> {
        self.expect_data_for_tag(tables::gpos::TAG)
            .and_then(FontRead::read)
    }
}
