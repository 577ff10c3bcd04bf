//! The various font tables

pub mod cmap;
pub mod fvar;
pub mod glyf;
pub mod gpos;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod kern;
pub mod layout;
pub mod loca;
pub mod maxp;
pub mod name;
pub mod os2;
pub mod post;
pub mod value_record;
