//! Little-endian field readers for fixed-layout ADT regions.

pub(crate) fn u16_at(buf: &[u8], pos: usize) -> u16 {
    let mut b = [0u8; 2];
    b.copy_from_slice(&buf[pos..pos + 2]);
    u16::from_le_bytes(b)
}

pub(crate) fn i16_at(buf: &[u8], pos: usize) -> i16 {
    u16_at(buf, pos) as i16
}

pub(crate) fn u32_at(buf: &[u8], pos: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[pos..pos + 4]);
    u32::from_le_bytes(b)
}

pub(crate) fn i32_at(buf: &[u8], pos: usize) -> i32 {
    u32_at(buf, pos) as i32
}

pub(crate) fn f64_at(buf: &[u8], pos: usize) -> f64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&buf[pos..pos + 8]);
    f64::from_le_bytes(b)
}
