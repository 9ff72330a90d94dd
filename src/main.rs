use anyhow::Context;
use candle_core::Device;
use env_logger::Env;
use log::info;

use fashion_mnist_pipeline::{
    config::Config, data_loader::DataLoader, data_source::DataSource,
    fashion_mnist_dataset::load, fashion_mnist_loader::FashionMnistDataLoader,
    preview::plot_image,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cfg = Config::from_env()?;
    let dev = Device::cuda_if_available(0)?;
    let source = DataSource::from_config(&cfg);
    let (dataset, info) = load(&cfg.dataset, &cfg.split, &source)
        .with_context(|| format!("loading {}/{}", cfg.dataset, cfg.split))?;

    let loader = FashionMnistDataLoader::new(dataset, &info, &cfg, dev)?;
    info!(
        "pipeline ready: batch_size {}, prefetch depth {}, {} batches per pass",
        loader.batch_size(),
        loader.prefetch_depth(),
        info.num_batches(loader.batch_size(), cfg.drop_last)
    );

    let (mut batches_seen, mut records_seen) = (0_usize, 0_usize);
    for batch in loader.batcher()? {
        let batch = batch?;
        if batches_seen == 0 {
            if let Some(path) = &cfg.preview {
                plot_image(&batch, 0, &info, path)?;
                info!("wrote preview of the first image to {}", path.display());
            }
        }
        batches_seen += 1;
        records_seen += batch.len();
    }
    info!("pass complete: {batches_seen} batches, {records_seen} records");

    Ok(())
}
