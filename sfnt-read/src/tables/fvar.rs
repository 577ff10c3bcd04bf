//! The [Font Variations](https://docs.microsoft.com/en-us/typography/opentype/spec/fvar) table

use types::{Fixed, MajorMinor, NameId, Offset16, Offset, Tag};

use crate::{DecodeError, ErrorKind, FontData, FontRead, TopLevelTable};

/// 'fvar'
pub const TAG: Tag = Tag::new(b"fvar");

/// The minimum size of a [`VariationAxisRecord`].
pub const AXIS_RECORD_LEN: usize = 20;

/// The [fvar (Font Variations)](https://docs.microsoft.com/en-us/typography/opentype/spec/fvar) table
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Fvar {
    /// Major version number of the font variations table, set to 1.
    /// Minor version number of the font variations table, set to 0.
    pub version: MajorMinor,
    /// Offset in bytes from the beginning of the table to the start of the axes.
    pub axes_array_offset: Offset16,
    /// The size in bytes of each VariationAxisRecord
    pub axis_size: u16,
    /// The size in bytes of each InstanceRecord
    pub instance_size: u16,
    pub axes: Vec<VariationAxisRecord>,
    pub instances: Vec<InstanceRecord>,
}

/// The [VariationAxisRecord](https://learn.microsoft.com/en-us/typography/opentype/spec/fvar#variationaxisrecord)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VariationAxisRecord {
    /// Tag identifying the design variation for the axis.
    pub axis_tag: Tag,
    /// The minimum coordinate value for the axis.
    pub min_value: Fixed,
    /// The default coordinate value for the axis.
    pub default_value: Fixed,
    /// The maximum coordinate value for the axis.
    pub max_value: Fixed,
    /// Axis qualifiers.
    pub flags: u16,
    /// The name ID for entries in the 'name' table that provide a display name for this axis.
    pub axis_name_id: NameId,
}

impl VariationAxisRecord {
    /// The flag indicating this axis should not be exposed in user interfaces.
    pub const HIDDEN_AXIS: u16 = 0x0001;

    /// Returns a normalized coordinate for the given value.
    ///
    /// The result is in `[-1, 1]`, with the default value at 0.
    pub fn normalize(&self, value: Fixed) -> Fixed {
        use core::cmp::Ordering::*;
        let min_value = self.min_value;
        let default_value = self.default_value;
        // Make sure max is >= min to avoid potential panic in clamp.
        let max_value = self.max_value.max(min_value);
        let value = value.clamp(min_value, max_value);
        let normalized = match value.cmp(&default_value) {
            Less => {
                -(default_value.to_f64() - value.to_f64())
                    / (default_value.to_f64() - min_value.to_f64())
            }
            Greater => {
                (value.to_f64() - default_value.to_f64())
                    / (max_value.to_f64() - default_value.to_f64())
            }
            Equal => 0.0,
        };
        Fixed::from_f64(normalized.clamp(-1.0, 1.0))
    }
}

/// The [InstanceRecord](https://learn.microsoft.com/en-us/typography/opentype/spec/fvar#instancerecord)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InstanceRecord {
    /// The name ID for entries in the 'name' table that provide subfamily names for this instance.
    pub subfamily_name_id: NameId,
    /// Reserved for future use; set to 0.
    pub flags: u16,
    /// The coordinates array for this instance.
    pub coordinates: Vec<Fixed>,
    /// Optional. The name ID for entries in the 'name' table that provide PostScript names for this instance.
    pub post_script_name_id: Option<NameId>,
}

impl TopLevelTable for Fvar {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Fvar {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor().in_table(TAG);
        let version: MajorMinor = cursor.read()?;
        if version.major != 1 {
            return Err(cursor.error_at(ErrorKind::InvalidMagicOrVersion, "version", 0));
        }
        let axes_array_offset: Offset16 = cursor.read()?;
        let _reserved: u16 = cursor.read()?;
        let axis_count: u16 = cursor.read()?;
        let axis_size: u16 = cursor.read()?;
        let instance_count: u16 = cursor.read()?;
        let instance_size: u16 = cursor.read()?;

        if (axis_size as usize) < AXIS_RECORD_LEN {
            return Err(cursor.error_at(ErrorKind::InconsistentStructure, "axisSize", 10));
        }
        // subfamilyNameID, flags, coordinates and the optional postScriptNameID
        let common_len = 4 + 4 * axis_count as usize;
        let has_post_script_name_id = match instance_size as usize {
            len if len == common_len => false,
            len if len == common_len + 2 => true,
            _ => {
                return Err(cursor.error_at(
                    ErrorKind::InconsistentStructure,
                    "instanceSize",
                    14,
                ))
            }
        };

        let axes_start = axes_array_offset.to_usize();
        let mut axes = Vec::with_capacity(axis_count as usize);
        for i in 0..axis_count as usize {
            let pos = axes_start + i * axis_size as usize;
            let mut cursor = data.cursor_at(pos).in_table(TAG);
            let axis = VariationAxisRecord {
                axis_tag: cursor.read()?,
                min_value: cursor.read()?,
                default_value: cursor.read()?,
                max_value: cursor.read()?,
                flags: cursor.read()?,
                axis_name_id: cursor.read()?,
            };
            if !(axis.min_value <= axis.default_value && axis.default_value <= axis.max_value) {
                return Err(cursor.error_at(ErrorKind::InconsistentStructure, "axis range", pos));
            }
            axes.push(axis);
        }

        let instances_start = axes_start + axis_count as usize * axis_size as usize;
        let mut instances = Vec::with_capacity(instance_count as usize);
        for i in 0..instance_count as usize {
            let pos = instances_start + i * instance_size as usize;
            let mut cursor = data.cursor_at(pos).in_table(TAG);
            let subfamily_name_id = cursor.read()?;
            let flags = cursor.read()?;
            let coordinates = cursor.read_array(axis_count as usize)?;
            let post_script_name_id = if has_post_script_name_id {
                let id: NameId = cursor.read()?;
                // From <https://learn.microsoft.com/en-us/typography/opentype/spec/fvar#instancerecord>:
                // "If the value is 0xFFFF, then the value is ignored, and no
                // PostScript name equivalent is provided for the instance."
                (id.to_u16() != 0xFFFF).then_some(id)
            } else {
                None
            };
            instances.push(InstanceRecord {
                subfamily_name_id,
                flags,
                coordinates,
                post_script_name_id,
            });
        }
        log::debug!(
            "decoded 'fvar': {} axes, {} instances",
            axes.len(),
            instances.len()
        );
        Ok(Fvar {
            version,
            axes_array_offset,
            axis_size,
            instance_size,
            axes,
            instances,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sfnt_test_data::{be_buffer, bebuffer::BeBuffer};

    fn fixed(value: i32) -> Fixed {
        Fixed::from_i32(value)
    }

    // wght 100..400..900 and wdth 75..100..100, with two instances
    fn two_axes(instance_size: u16) -> BeBuffer {
        let header = be_buffer! {
            1u16, 0u16, 16u16, 2u16,
            2u16, 20u16, 2u16, instance_size,
            (Tag::new(b"wght")), (fixed(100)), (fixed(400)), (fixed(900)), 0u16, 256u16,
            (Tag::new(b"wdth")), (fixed(75)), (fixed(100)), (fixed(100)), 1u16, 257u16
        };
        header
            .extend([258u16, 0])
            .extend([fixed(400), fixed(100)])
            .push(0xFFFFu16)
            .extend([259u16, 0])
            .extend([fixed(900), fixed(75)])
            .push(260u16)
    }

    #[test]
    fn axes() {
        let data = two_axes(14);
        assert_eq!(data.len(), 84);
        let fvar = Fvar::read(FontData::new(&data)).unwrap();
        assert_eq!(fvar.version, MajorMinor::VERSION_1_0);
        assert_eq!(fvar.axes.len(), 2);
        let wght = &fvar.axes[0];
        assert_eq!(wght.axis_tag, Tag::new(b"wght"));
        assert_eq!(wght.min_value, Fixed::from_f64(100.0));
        assert_eq!(wght.default_value, Fixed::from_f64(400.0));
        assert_eq!(wght.max_value, Fixed::from_f64(900.0));
        assert_eq!(wght.flags, 0);
        assert_eq!(wght.axis_name_id, NameId::new(256));
        assert_eq!(fvar.axes[1].flags, VariationAxisRecord::HIDDEN_AXIS);
    }

    #[test]
    fn instances() {
        let data = two_axes(14);
        let fvar = Fvar::read(FontData::new(&data)).unwrap();
        assert_eq!(fvar.instances.len(), 2);
        let regular = &fvar.instances[0];
        assert_eq!(regular.subfamily_name_id, NameId::new(258));
        assert_eq!(regular.coordinates, [fixed(400), fixed(100)]);
        assert_eq!(regular.post_script_name_id, None);
        let black = &fvar.instances[1];
        assert_eq!(black.coordinates, [fixed(900), fixed(75)]);
        assert_eq!(black.post_script_name_id, Some(NameId::new(260)));
    }

    #[test]
    fn instances_without_post_script_names() {
        let header = be_buffer! {
            1u16, 0u16, 16u16, 2u16,
            1u16, 20u16, 1u16, 8u16,
            (Tag::new(b"wght")), (fixed(100)), (fixed(400)), (fixed(900)), 0u16, 256u16
        };
        let data = header.extend([258u16, 0]).push(fixed(700));
        let fvar = Fvar::read(FontData::new(&data)).unwrap();
        assert_eq!(fvar.instances[0].coordinates, [fixed(700)]);
        assert_eq!(fvar.instances[0].post_script_name_id, None);
    }

    #[test]
    fn bad_instance_size() {
        let data = two_axes(16);
        let err = Fvar::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentStructure);
        assert_eq!(err.what(), "instanceSize");
    }

    #[test]
    fn bad_axis_size() {
        let mut data = two_axes(14).into_inner();
        data[11] = 18;
        let err = Fvar::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentStructure);
        assert_eq!(err.offset(), 10);
    }

    #[test]
    fn default_outside_range() {
        let mut data = two_axes(14).into_inner();
        // wght default := 1000
        data[24..28].copy_from_slice(&fixed(1000).to_be_bytes());
        let err = Fvar::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentStructure);
        assert_eq!(err.offset(), 16);
        assert_eq!(err.tag(), Some(TAG));
    }

    #[test]
    fn truncated_instances() {
        let data = two_axes(14);
        let err = Fvar::read(FontData::new(&data[..80])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.offset(), 74);
    }

    #[test]
    fn normalize() {
        let data = two_axes(14);
        let fvar = Fvar::read(FontData::new(&data)).unwrap();
        let axis = &fvar.axes[0];
        let values = [50.0, 100.0, 250.0, 400.0, 650.0, 900.0, 1000.0];
        let expected = [-1.0, -1.0, -0.5, 0.0, 0.5, 1.0, 1.0];
        for (value, expected) in values.into_iter().zip(expected) {
            assert_eq!(
                axis.normalize(Fixed::from_f64(value)),
                Fixed::from_f64(expected)
            );
        }
    }
}
