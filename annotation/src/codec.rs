//! Fixed-width slot encoding of [AnnotationRecord].
//!
//! ```text
//! id(4) | flags(1) | x(4) | y(4) | w(4) | h(4) | path_offset(8) | path_len(4)
//! ```
//!
//! All integers are little-endian. The image path is stored on the string
//! heap as UTF-16LE and the slot keeps its byte offset and byte length.

use crate::{common::*, heap::StringHeap, record::AnnotationRecord};
use bbox::XYWH;

pub const SLOT_SIZE: usize = 33;

/// Bits of the flags byte.
pub mod flags {
    pub const LABELED: u8 = 1 << 0;
    pub const OCCLUSION: u8 = 1 << 1;
    pub const OUT_OF_VIEW: u8 = 1 << 2;
    pub const RESERVED: u8 = !(LABELED | OCCLUSION | OUT_OF_VIEW);
}

/// The decoded content of one slot, with the path still on the heap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, BinRead)]
pub struct Slot {
    pub id: i32,
    pub flags: u8,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub path_offset: u64,
    pub path_len: u32,
}

impl Slot {
    pub fn decode(index: u64, bytes: &[u8]) -> Result<Self> {
        let slot: Slot = Cursor::new(bytes)
            .read_le()
            .map_err(|err| Error::corrupt_slot(index, format!("{:?}", err)))?;

        if slot.flags & flags::RESERVED != 0 {
            return Err(Error::corrupt_slot(
                index,
                format!("reserved flag bits are set in {:#010b}", slot.flags),
            ));
        }
        if slot.path_len % 2 != 0 {
            return Err(Error::corrupt_slot(
                index,
                format!("odd UTF-16 byte length {}", slot.path_len),
            ));
        }

        Ok(slot)
    }

    pub fn encode(&self) -> [u8; SLOT_SIZE] {
        let mut bytes = [0u8; SLOT_SIZE];
        LittleEndian::write_i32(&mut bytes[0..4], self.id);
        bytes[4] = self.flags;
        LittleEndian::write_i32(&mut bytes[5..9], self.x);
        LittleEndian::write_i32(&mut bytes[9..13], self.y);
        LittleEndian::write_i32(&mut bytes[13..17], self.w);
        LittleEndian::write_i32(&mut bytes[17..21], self.h);
        LittleEndian::write_u64(&mut bytes[21..29], self.path_offset);
        LittleEndian::write_u32(&mut bytes[29..33], self.path_len);
        bytes
    }

    fn new(record: &AnnotationRecord, path_offset: u64, path_len: u32) -> Self {
        let AnnotationRecord {
            id,
            is_labeled,
            bbox: XYWH { x, y, w, h },
            occlusion,
            out_of_view,
            ..
        } = *record;

        let mut flags = 0;
        if is_labeled {
            flags |= flags::LABELED;
        }
        if occlusion {
            flags |= flags::OCCLUSION;
        }
        if out_of_view {
            flags |= flags::OUT_OF_VIEW;
        }

        Self {
            id,
            flags,
            x,
            y,
            w,
            h,
            path_offset,
            path_len,
        }
    }

    fn into_record(self, image_path: String) -> AnnotationRecord {
        let Self {
            id,
            flags,
            x,
            y,
            w,
            h,
            ..
        } = self;

        AnnotationRecord {
            id,
            is_labeled: flags & flags::LABELED != 0,
            bbox: XYWH { x, y, w, h },
            occlusion: flags & flags::OCCLUSION != 0,
            out_of_view: flags & flags::OUT_OF_VIEW != 0,
            image_path,
        }
    }
}

/// Convert a path to UTF-16LE bytes, failing if it has more than `max_len` units.
pub fn encode_path(path: &str, max_len: usize) -> Result<Vec<u8>> {
    let units: Vec<u16> = path.encode_utf16().collect();
    if units.len() > max_len || units.len() * 2 > u32::MAX as usize {
        return Err(Error::StringTooLong {
            len: units.len(),
            max: max_len,
        });
    }

    let mut bytes = vec![0u8; units.len() * 2];
    LittleEndian::write_u16_into(&units, &mut bytes);
    Ok(bytes)
}

pub fn decode_path(index: u64, bytes: &[u8]) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::corrupt_slot(
            index,
            format!("odd UTF-16 byte length {}", bytes.len()),
        ));
    }
    let mut units = vec![0u16; bytes.len() / 2];
    LittleEndian::read_u16_into(bytes, &mut units);
    String::from_utf16(&units).map_err(|err| Error::corrupt_slot(index, err))
}

/// Encode a record into a slot, appending its path to the heap.
///
/// The length limit is checked before anything is written.
pub fn encode<F>(
    record: &AnnotationRecord,
    heap: &mut StringHeap,
    io: &mut F,
    max_path_len: usize,
) -> Result<Slot>
where
    F: Write + Seek + ?Sized,
{
    let bytes = encode_path(&record.image_path, max_path_len)?;
    let offset = if bytes.is_empty() {
        0
    } else {
        heap.append(io, &bytes)?
    };
    Ok(Slot::new(record, offset, bytes.len() as u32))
}

/// Decode the slot at `index` and load its path from the heap.
pub fn decode<F>(
    index: u64,
    bytes: &[u8],
    heap: &StringHeap,
    io: &mut F,
) -> Result<AnnotationRecord>
where
    F: Read + Seek + ?Sized,
{
    let slot = Slot::decode(index, bytes)?;
    let path_bytes = heap.read(io, index, slot.path_offset, slot.path_len as u64)?;
    let image_path = decode_path(index, &path_bytes)?;
    Ok(slot.into_record(image_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnnotationRecord {
        AnnotationRecord {
            id: -3,
            is_labeled: true,
            bbox: XYWH::new(1, -2, 300, 400),
            occlusion: false,
            out_of_view: true,
            image_path: "seq/0001.jpg".into(),
        }
    }

    #[test]
    fn slot_layout() {
        let mut io = Cursor::new(vec![]);
        let mut heap = StringHeap::new(0, 0);
        heap.append(&mut io, b"xx").unwrap();

        let slot = encode(&sample(), &mut heap, &mut io, 4096).unwrap();
        let bytes = slot.encode();

        assert_eq!(bytes[0..4], (-3i32).to_le_bytes());
        assert_eq!(bytes[4], flags::LABELED | flags::OUT_OF_VIEW);
        assert_eq!(bytes[5..9], 1i32.to_le_bytes());
        assert_eq!(bytes[9..13], (-2i32).to_le_bytes());
        assert_eq!(bytes[13..17], 300i32.to_le_bytes());
        assert_eq!(bytes[17..21], 400i32.to_le_bytes());
        assert_eq!(bytes[21..29], 2u64.to_le_bytes());
        assert_eq!(bytes[29..33], 24u32.to_le_bytes());
        assert_eq!(heap.size(), 2 + 24);
    }

    #[test]
    fn record_survives_codec() {
        let mut io = Cursor::new(vec![]);
        let mut heap = StringHeap::new(0, 0);

        for record in [sample(), AnnotationRecord::default()] {
            let bytes = encode(&record, &mut heap, &mut io, 4096).unwrap().encode();
            let decoded = decode(0, &bytes, &heap, &mut io).unwrap();
            assert_eq!(decoded, record);
        }
    }

    #[test]
    fn empty_path_does_not_touch_heap() {
        let mut io = Cursor::new(vec![]);
        let mut heap = StringHeap::new(0, 0);
        let slot = encode(&AnnotationRecord::default(), &mut heap, &mut io, 4096).unwrap();

        assert_eq!(slot, Slot::default());
        assert_eq!(slot.encode(), [0u8; SLOT_SIZE]);
        assert_eq!(heap.size(), 0);
    }

    #[test]
    fn path_length_limit() {
        let mut io = Cursor::new(vec![]);
        let mut heap = StringHeap::new(0, 0);
        let record = AnnotationRecord {
            image_path: "x".repeat(9),
            ..Default::default()
        };

        assert!(matches!(
            encode(&record, &mut heap, &mut io, 8),
            Err(Error::StringTooLong { len: 9, max: 8 })
        ));
        assert_eq!(heap.size(), 0);
        assert!(io.get_ref().is_empty());

        // the limit counts UTF-16 units, not bytes or chars
        assert!(encode_path("\u{1F600}\u{1F600}", 4).is_ok());
        assert!(encode_path("\u{1F600}\u{1F600}", 3).is_err());
    }

    #[test]
    fn reserved_flags_are_rejected() {
        let mut bytes = [0u8; SLOT_SIZE];
        bytes[4] = 0b1000;
        assert!(matches!(
            Slot::decode(5, &bytes),
            Err(Error::CorruptSlot { index: 5, .. })
        ));
    }

    #[test]
    fn path_outside_heap_is_rejected() {
        let mut io = Cursor::new(vec![0u8; 4]);
        let heap = StringHeap::new(0, 4);
        let slot = Slot {
            path_offset: 2,
            path_len: 4,
            ..Default::default()
        };
        assert!(matches!(
            decode(1, &slot.encode(), &heap, &mut io),
            Err(Error::CorruptSlot { index: 1, .. })
        ));
    }

    #[test]
    fn unpaired_surrogate_is_rejected() {
        let bytes = 0xd800u16.to_le_bytes();
        assert!(matches!(
            decode_path(0, &bytes),
            Err(Error::CorruptSlot { .. })
        ));
        assert_eq!(decode_path(0, &[]).unwrap(), "");
    }
}
