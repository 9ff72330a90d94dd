#[derive(Debug, Clone, PartialEq)]
pub enum Pixels {
    U8(Vec<u8>),
    U16(Vec<u16>),
}

impl Pixels {
    pub fn len(&self) -> usize {
        match self {
            Pixels::U8(p) => p.len(),
            Pixels::U16(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest representable sample value for this sample width.
    pub fn max_value(&self) -> f64 {
        match self {
            Pixels::U8(_) => u8::MAX as f64,
            Pixels::U16(_) => u16::MAX as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawImage {
    pub shape: Vec<usize>,
    pub pixels: Pixels,
}

impl RawImage {
    pub fn u8(shape: Vec<usize>, pixels: Vec<u8>) -> Self {
        Self {
            shape,
            pixels: Pixels::U8(pixels),
        }
    }

    pub fn u16(shape: Vec<usize>, pixels: Vec<u16>) -> Self {
        Self {
            shape,
            pixels: Pixels::U16(pixels),
        }
    }
}

/// A record as stored on disk, before conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub image: RawImage,
    pub label: i64,
}
