// IDX format, all integers big-endian:
//   magic: 0x00 0x00 <element type> <number of dimensions>
//   one u32 per dimension
//   element data, row-major
// Fashion-MNIST only ships unsigned byte (0x08) files.

use crate::error::{Error, Result};

const UNSIGNED_BYTE: u8 = 0x08;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdxArray {
    pub dims: Vec<usize>,
    pub data: Vec<u8>,
}

impl IdxArray {
    pub fn len(&self) -> usize {
        self.dims.first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimensions of a single item (everything after the leading count).
    pub fn item_dims(&self) -> &[usize] {
        self.dims.get(1..).unwrap_or(&[])
    }

    pub fn item_len(&self) -> usize {
        self.item_dims().iter().product()
    }

    pub fn item(&self, idx: usize) -> &[u8] {
        let n = self.item_len();
        &self.data[idx * n..(idx + 1) * n]
    }
}

pub fn parse(bytes: &[u8], what: &str) -> Result<IdxArray> {
    if bytes.len() < 4 {
        return Err(Error::unavailable(format!(
            "{what}: IDX header truncated ({} bytes)",
            bytes.len()
        )));
    }
    if bytes[0] != 0 || bytes[1] != 0 {
        return Err(Error::unavailable(format!(
            "{what}: bad IDX magic {:02x}{:02x}",
            bytes[0], bytes[1]
        )));
    }
    if bytes[2] != UNSIGNED_BYTE {
        return Err(Error::unavailable(format!(
            "{what}: unsupported IDX element type {:#04x}",
            bytes[2]
        )));
    }

    let ndims = bytes[3] as usize;
    let header_len = 4 + 4 * ndims;
    if bytes.len() < header_len {
        return Err(Error::unavailable(format!(
            "{what}: IDX header truncated, expected {header_len} bytes"
        )));
    }
    let dims = (0..ndims)
        .map(|i| read_u32_be(bytes, 4 + 4 * i) as usize)
        .collect::<Vec<_>>();

    let overflow = || {
        Error::unavailable(format!(
            "{what}: IDX dimensions {dims:?} overflow the addressable size"
        ))
    };
    let item_len = dims
        .iter()
        .skip(1)
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(overflow)?;
    let expected = dims
        .first()
        .map_or(Some(1), |&count| count.checked_mul(item_len))
        .ok_or_else(overflow)?;
    let payload = &bytes[header_len..];
    if payload.len() != expected {
        return Err(Error::unavailable(format!(
            "{what}: IDX payload holds {} bytes, dimensions {dims:?} need {expected}",
            payload.len()
        )));
    }

    Ok(IdxArray {
        dims,
        data: payload.to_vec(),
    })
}

fn read_u32_be(data: &[u8], off: usize) -> u32 {
    u32::from_be_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}

#[cfg(test)]
pub(crate) fn encode_u8(dims: &[usize], data: &[u8]) -> Vec<u8> {
    let mut buf = vec![0, 0, UNSIGNED_BYTE, dims.len() as u8];
    for &d in dims {
        buf.extend_from_slice(&(d as u32).to_be_bytes());
    }
    buf.extend_from_slice(data);
    buf
}
