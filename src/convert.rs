use candle_core::{DType, Device, Tensor};

use crate::{
    error::{Error, Result},
    record::{Pixels, RawRecord},
};

/// A converted record: `image` is `f32` in `[0, 1]`, `label` a rank-0 `f32`.
#[derive(Debug, Clone)]
pub struct Record {
    pub image: Tensor,
    pub label: Tensor,
}

pub fn convert(raw: &RawRecord, expected_shape: &[usize], device: &Device) -> Result<Record> {
    let image = &raw.image;
    if image.shape != expected_shape
        || image.pixels.len() != expected_shape.iter().product::<usize>()
    {
        return Err(Error::InvalidRecordShape {
            expected: expected_shape.to_vec(),
            found: image.shape.clone(),
            samples: image.pixels.len(),
        });
    }

    let scale = 1.0 / image.pixels.max_value();
    let samples = match &image.pixels {
        Pixels::U8(p) => Tensor::from_vec(p.clone(), expected_shape, device)?,
        // no u16 dtype on the tensor side, widen first
        Pixels::U16(p) => Tensor::from_vec(
            p.iter().map(|&v| v as u32).collect::<Vec<_>>(),
            expected_shape,
            device,
        )?,
    };
    let image = samples.to_dtype(DType::F32)?.affine(scale, 0.0)?;
    let label = Tensor::new(raw.label as f32, device)?;

    Ok(Record { image, label })
}

#[derive(Debug, Clone)]
pub struct Converter {
    expected_shape: Vec<usize>,
    device: Device,
}

impl Converter {
    pub fn new(expected_shape: Vec<usize>, device: Device) -> Self {
        Self {
            expected_shape,
            device,
        }
    }

    pub fn convert(&self, raw: &RawRecord) -> Result<Record> {
        convert(raw, &self.expected_shape, &self.device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawImage;

    fn image_values(record: &Record) -> Vec<f32> {
        record.image.flatten_all().unwrap().to_vec1::<f32>().unwrap()
    }

    #[test]
    fn test_u8_image_scaled_into_unit_range() {
        let pixels: Vec<u8> = (0..=255).cycle().take(28 * 28).collect();
        let raw = RawRecord {
            image: RawImage::u8(vec![28, 28, 1], pixels.clone()),
            label: 3,
        };
        let record = convert(&raw, &[28, 28, 1], &Device::Cpu).unwrap();

        assert_eq!(record.image.dims(), &[28, 28, 1]);
        assert_eq!(record.image.dtype(), DType::F32);
        let values = image_values(&record);
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
        for (got, px) in values.iter().zip(&pixels) {
            assert!((got - *px as f32 / 255.0).abs() < 1e-6);
        }
        assert_eq!(values[0], 0.0);
        assert_eq!(values[255], 1.0);
    }

    #[test]
    fn test_u16_image_uses_sixteen_bit_scale() {
        let raw = RawRecord {
            image: RawImage::u16(vec![2, 2, 1], vec![0, 65535, 32768, 255]),
            label: 0,
        };
        let record = convert(&raw, &[2, 2, 1], &Device::Cpu).unwrap();
        let values = image_values(&record);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[1], 1.0);
        assert!((values[2] - 32768.0 / 65535.0).abs() < 1e-6);
        assert!(values[3] < 0.01);
    }

    #[test]
    fn test_label_widened_to_float() {
        let conv = Converter::new(vec![1, 1, 1], Device::Cpu);
        for code in [0i64, 7, 9] {
            let raw = RawRecord {
                image: RawImage::u8(vec![1, 1, 1], vec![128]),
                label: code,
            };
            let record = conv.convert(&raw).unwrap();
            assert_eq!(record.label.dims(), &[] as &[usize]);
            assert_eq!(record.label.to_scalar::<f32>().unwrap(), code as f32);
        }
    }

    #[test]
    fn test_wrong_rank_is_invalid_shape() {
        let raw = RawRecord {
            image: RawImage::u8(vec![28, 28], vec![0; 784]),
            label: 1,
        };
        let err = convert(&raw, &[28, 28, 1], &Device::Cpu).unwrap_err();
        match err {
            Error::InvalidRecordShape {
                expected,
                found,
                samples,
            } => {
                assert_eq!(expected, vec![28, 28, 1]);
                assert_eq!(found, vec![28, 28]);
                assert_eq!(samples, 784);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sample_count_mismatch_is_invalid_shape() {
        let raw = RawRecord {
            image: RawImage::u8(vec![28, 28, 1], vec![0; 700]),
            label: 1,
        };
        assert!(matches!(
            convert(&raw, &[28, 28, 1], &Device::Cpu),
            Err(Error::InvalidRecordShape { .. })
        ));
    }
}
