//! the [post (PostScript)](https://docs.microsoft.com/en-us/typography/opentype/spec/post#header) table

use types::{Fixed, GlyphId, Tag, Version16Dot16};

use crate::{Cursor, DecodeError, ErrorKind, FontData, FontRead, TopLevelTable};

use super::name::decode_mac_roman;

/// 'post'
pub const TAG: Tag = Tag::new(b"post");

/// The size of the header shared by every version.
pub const POST_HEADER_LEN: usize = 32;

/// [post (PostScript)](https://docs.microsoft.com/en-us/typography/opentype/spec/post#header) table
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Post {
    /// 1.0, 2.0, 2.5 or 3.0
    pub version: Version16Dot16,
    /// Italic angle in counter-clockwise degrees from the vertical.
    pub italic_angle: Fixed,
    /// Suggested y-coordinate of the top of the underline.
    pub underline_position: i16,
    /// Suggested values for the underline thickness.
    pub underline_thickness: i16,
    /// Set to 0 if the font is proportionally spaced, non-zero if the font
    /// is not proportionally spaced.
    pub is_fixed_pitch: u32,
    pub min_mem_type42: u32,
    pub max_mem_type42: u32,
    pub min_mem_type1: u32,
    pub max_mem_type1: u32,
    /// The glyph names, in the shape selected by `version`.
    pub names: PostNames,
}

/// The version-specific payload of the `post` table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PostNames {
    /// Version 1.0: the glyphs are the [standard Macintosh set][DEFAULT_GLYPH_NAMES].
    Standard,
    /// Version 2.0
    Indexed {
        /// For each glyph, an index into the standard names, or (minus 258)
        /// into `names`.
        glyph_name_index: Vec<u16>,
        /// The custom names, in table order.
        names: Vec<String>,
    },
    /// Version 2.5: for each glyph, the difference between its index in the
    /// standard order and its glyph id.
    Offsets(Vec<i8>),
    /// Version 3.0: no glyph names are provided.
    None,
}

impl Post {
    /// The number of glyph names covered by this table
    pub fn num_names(&self) -> usize {
        match &self.names {
            PostNames::Standard => DEFAULT_GLYPH_NAMES.len(),
            PostNames::Indexed {
                glyph_name_index, ..
            } => glyph_name_index.len(),
            PostNames::Offsets(offsets) => offsets.len(),
            PostNames::None => 0,
        }
    }

    pub fn glyph_name(&self, glyph_id: GlyphId) -> Option<&str> {
        let glyph_id = glyph_id.to_u16() as usize;
        match &self.names {
            PostNames::Standard => DEFAULT_GLYPH_NAMES.get(glyph_id).copied(),
            PostNames::Indexed {
                glyph_name_index,
                names,
            } => {
                let idx = *glyph_name_index.get(glyph_id)? as usize;
                if idx < DEFAULT_GLYPH_NAMES.len() {
                    return DEFAULT_GLYPH_NAMES.get(idx).copied();
                }
                names
                    .get(idx - DEFAULT_GLYPH_NAMES.len())
                    .map(String::as_str)
            }
            PostNames::Offsets(offsets) => {
                let offset = *offsets.get(glyph_id)? as isize;
                let idx = (glyph_id as isize).checked_add(offset)?;
                DEFAULT_GLYPH_NAMES.get(usize::try_from(idx).ok()?).copied()
            }
            PostNames::None => None,
        }
    }
}

impl TopLevelTable for Post {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Post {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor().in_table(TAG);
        let version: Version16Dot16 = cursor.read()?;
        let italic_angle = cursor.read()?;
        let underline_position = cursor.read()?;
        let underline_thickness = cursor.read()?;
        let is_fixed_pitch = cursor.read()?;
        let min_mem_type42 = cursor.read()?;
        let max_mem_type42 = cursor.read()?;
        let min_mem_type1 = cursor.read()?;
        let max_mem_type1 = cursor.read()?;

        let names = match version {
            Version16Dot16::VERSION_1_0 => PostNames::Standard,
            Version16Dot16::VERSION_2_0 => read_indexed_names(&mut cursor)?,
            Version16Dot16::VERSION_2_5 => {
                let num_glyphs: u16 = cursor.read()?;
                let offsets: Vec<i8> = cursor.read_array(num_glyphs as usize)?;
                for (gid, offset) in offsets.iter().enumerate() {
                    let idx = gid as isize + *offset as isize;
                    if !(0..DEFAULT_GLYPH_NAMES.len() as isize).contains(&idx) {
                        return Err(cursor.error_at(
                            ErrorKind::InconsistentStructure,
                            "offset",
                            POST_HEADER_LEN + 2 + gid,
                        ));
                    }
                }
                PostNames::Offsets(offsets)
            }
            Version16Dot16::VERSION_3_0 => PostNames::None,
            _ => return Err(cursor.error_at(ErrorKind::UnsupportedFormat, "version", 0)),
        };
        log::debug!("decoded 'post' version {version}");
        Ok(Post {
            version,
            italic_angle,
            underline_position,
            underline_thickness,
            is_fixed_pitch,
            min_mem_type42,
            max_mem_type42,
            min_mem_type1,
            max_mem_type1,
            names,
        })
    }
}

fn read_indexed_names(cursor: &mut Cursor) -> Result<PostNames, DecodeError> {
    let num_glyphs: u16 = cursor.read()?;
    let index_start = cursor.position();
    let glyph_name_index: Vec<u16> = cursor.read_array(num_glyphs as usize)?;

    // the Pascal strings run to the end of the table
    let mut names: Vec<String> = Vec::new();
    while cursor.remaining_bytes() > 0 {
        let len: u8 = cursor.read()?;
        let bytes = cursor.read_bytes(len as usize)?;
        names.push(bytes.iter().copied().map(decode_mac_roman).collect());
    }
    log::trace!("'post' has {} custom names", names.len());

    let num_names = DEFAULT_GLYPH_NAMES.len() + names.len();
    if let Some(gid) = glyph_name_index
        .iter()
        .position(|idx| *idx as usize >= num_names)
    {
        return Err(cursor.error_at(
            ErrorKind::InconsistentStructure,
            "glyphNameIndex",
            index_start + gid * 2,
        ));
    }
    Ok(PostNames::Indexed {
        glyph_name_index,
        names,
    })
}

/// The 258 glyph names defined for Macintosh TrueType fonts
#[rustfmt::skip]
pub static DEFAULT_GLYPH_NAMES: [&str; 258] = [
    ".notdef", ".null", "nonmarkingreturn", "space", "exclam", "quotedbl", "numbersign", "dollar",
    "percent", "ampersand", "quotesingle", "parenleft", "parenright", "asterisk", "plus", "comma",
    "hyphen", "period", "slash", "zero", "one", "two", "three", "four", "five", "six", "seven",
    "eight", "nine", "colon", "semicolon", "less", "equal", "greater", "question", "at", "A", "B",
    "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U",
    "V", "W", "X", "Y", "Z", "bracketleft", "backslash", "bracketright", "asciicircum",
    "underscore", "grave", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n",
    "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "braceleft", "bar", "braceright",
    "asciitilde", "Adieresis", "Aring", "Ccedilla", "Eacute", "Ntilde", "Odieresis", "Udieresis",
    "aacute", "agrave", "acircumflex", "adieresis", "atilde", "aring", "ccedilla", "eacute",
    "egrave", "ecircumflex", "edieresis", "iacute", "igrave", "icircumflex", "idieresis", "ntilde",
    "oacute", "ograve", "ocircumflex", "odieresis", "otilde", "uacute", "ugrave", "ucircumflex",
    "udieresis", "dagger", "degree", "cent", "sterling", "section", "bullet", "paragraph",
    "germandbls", "registered", "copyright", "trademark", "acute", "dieresis", "notequal", "AE",
    "Oslash", "infinity", "plusminus", "lessequal", "greaterequal", "yen", "mu", "partialdiff",
    "summation", "product", "pi", "integral", "ordfeminine", "ordmasculine", "Omega", "ae",
    "oslash", "questiondown", "exclamdown", "logicalnot", "radical", "florin", "approxequal",
    "Delta", "guillemotleft", "guillemotright", "ellipsis", "nonbreakingspace", "Agrave", "Atilde",
    "Otilde", "OE", "oe", "endash", "emdash", "quotedblleft", "quotedblright", "quoteleft",
    "quoteright", "divide", "lozenge", "ydieresis", "Ydieresis", "fraction", "currency",
    "guilsinglleft", "guilsinglright", "fi", "fl", "daggerdbl", "periodcentered", "quotesinglbase",
    "quotedblbase", "perthousand", "Acircumflex", "Ecircumflex", "Aacute", "Edieresis", "Egrave",
    "Iacute", "Icircumflex", "Idieresis", "Igrave", "Oacute", "Ocircumflex", "apple", "Ograve",
    "Uacute", "Ucircumflex", "Ugrave", "dotlessi", "circumflex", "tilde", "macron", "breve",
    "dotaccent", "ring", "cedilla", "hungarumlaut", "ogonek", "caron", "Lslash", "lslash",
    "Scaron", "scaron", "Zcaron", "zcaron", "brokenbar", "Eth", "eth", "Yacute", "yacute", "Thorn",
    "thorn", "minus", "multiply", "onesuperior", "twosuperior", "threesuperior", "onehalf",
    "onequarter", "threequarters", "franc", "Gbreve", "gbreve", "Idotaccent", "Scedilla",
    "scedilla", "Cacute", "cacute", "Ccaron", "ccaron", "dcroat",
];
