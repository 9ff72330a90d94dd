use std::{fs, path::Path};

use candle_core::IndexOp;
use plotly::{HeatMap, Layout, Plot, layout::Axis};

use crate::{
    batcher::Batch,
    error::{Error, Result},
    metadata::Metadata,
};

/// Writes one converted image of `batch` as a heatmap, titled with its class.
pub fn plot_image<P: AsRef<Path>>(
    batch: &Batch,
    index: usize,
    metadata: &Metadata,
    save_path: P,
) -> Result<()> {
    if index >= batch.len() {
        return Err(Error::configuration(format!(
            "preview index {index} out of range for a batch of {}",
            batch.len()
        )));
    }

    let image = batch.images.i(index)?;
    let (rows, cols) = match image.dims() {
        [r, c] | [r, c, 1] => (*r, *c),
        other => {
            return Err(Error::InvalidRecordShape {
                expected: vec![rows_hint(metadata), cols_hint(metadata), 1],
                found: other.to_vec(),
                samples: image.elem_count(),
            });
        }
    };
    let pixels = image.flatten_all()?.to_vec1::<f32>()?;
    // heatmaps draw row 0 at the bottom
    let z = pixels
        .chunks(cols)
        .take(rows)
        .rev()
        .map(<[f32]>::to_vec)
        .collect::<Vec<_>>();

    let label = batch.labels.i(index)?.to_scalar::<f32>()?;
    let class = metadata.class_name(label as i64).unwrap_or("unknown");

    let layout = Layout::new()
        .title(format!("{} #{index}: {class}", metadata.name).as_str())
        .x_axis(Axis::new().title("x"))
        .y_axis(Axis::new().title("y"));
    let mut plot = Plot::new();
    plot.add_trace(HeatMap::new_z(z));
    plot.set_layout(layout);
    fs::write(save_path, plot.to_html())?;
    Ok(())
}

fn rows_hint(metadata: &Metadata) -> usize {
    metadata.image_shape.first().copied().unwrap_or(0)
}

fn cols_hint(metadata: &Metadata) -> usize {
    metadata.image_shape.get(1).copied().unwrap_or(0)
}
