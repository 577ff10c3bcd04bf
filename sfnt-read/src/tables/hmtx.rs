//! The [hmtx (Horizontal Metrics)](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use types::{GlyphId, Tag};

use crate::{DecodeError, ErrorKind, FontData, FontReadWithArgs, ReadArgs, TopLevelTable};

/// 'hmtx'
pub const TAG: Tag = Tag::new(b"hmtx");

/// The context needed to decode `hmtx`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HmtxArgs {
    /// From `maxp`.
    pub num_glyphs: u16,
    /// From `hhea`.
    pub number_of_h_metrics: u16,
}

/// An advance width and side bearing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LongMetric {
    /// Advance width, in font design units.
    pub advance: u16,
    /// Glyph left side bearing, in font design units.
    pub side_bearing: i16,
}

/// The [hmtx](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table,
/// expanded to one metric per glyph.
///
/// Only the first `number_of_h_metrics` entries in the table carry an
/// advance; every glyph after them uses the last explicit advance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Hmtx {
    /// Exactly `num_glyphs` metrics, indexed by glyph id.
    pub metrics: Vec<LongMetric>,
    /// The number of entries with an explicit advance.
    pub number_of_h_metrics: u16,
}

impl Hmtx {
    /// The advance width for the given glyph.
    pub fn advance(&self, gid: GlyphId) -> Option<u16> {
        self.metrics
            .get(gid.to_u16() as usize)
            .map(|metric| metric.advance)
    }

    /// The left side bearing for the given glyph.
    pub fn side_bearing(&self, gid: GlyphId) -> Option<i16> {
        self.metrics
            .get(gid.to_u16() as usize)
            .map(|metric| metric.side_bearing)
    }
}

impl TopLevelTable for Hmtx {
    const TAG: Tag = TAG;
}

impl ReadArgs for Hmtx {
    type Args = HmtxArgs;
}

impl<'a> FontReadWithArgs<'a> for Hmtx {
    fn read_with_args(data: FontData<'a>, args: &HmtxArgs) -> Result<Self, DecodeError> {
        let HmtxArgs {
            num_glyphs,
            number_of_h_metrics,
        } = *args;
        let mut cursor = data.cursor().in_table(TAG);
        if number_of_h_metrics > num_glyphs {
            return Err(cursor.error_at(ErrorKind::InconsistentStructure, "numberOfHMetrics", 0));
        }
        let mut metrics = Vec::with_capacity(num_glyphs as usize);
        for _ in 0..number_of_h_metrics {
            metrics.push(LongMetric {
                advance: cursor.read()?,
                side_bearing: cursor.read()?,
            });
        }
        let last_advance = metrics.last().map(|metric| metric.advance).unwrap_or(0);
        for _ in number_of_h_metrics..num_glyphs {
            metrics.push(LongMetric {
                advance: last_advance,
                side_bearing: cursor.read()?,
            });
        }
        if cursor.remaining_bytes() > 0 {
            log::trace!("{} unused bytes after 'hmtx'", cursor.remaining_bytes());
        }
        log::debug!(
            "decoded 'hmtx': {num_glyphs} glyphs, {number_of_h_metrics} long metrics"
        );
        Ok(Hmtx {
            metrics,
            number_of_h_metrics,
        })
    }
}
