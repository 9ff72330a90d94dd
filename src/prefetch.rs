use std::{
    panic,
    sync::mpsc::{self, Receiver},
    thread::{self, JoinHandle},
};

use log::{debug, warn};

use crate::{config::validate_prefetch_depth, error::Result};

/// Pulls items from `inner` that many steps ahead of the consumer.
/// Contents and order are those of `inner`.
pub enum Prefetch<I: Iterator> {
    Inline(I),
    Background(Prefetcher<I::Item>),
}

impl<I> Prefetch<I>
where
    I: Iterator + Send + 'static,
    I::Item: Send + 'static,
{
    pub fn new(inner: I, depth: usize) -> Result<Self> {
        if depth == 0 {
            return Ok(Self::Inline(inner));
        }
        Ok(Self::Background(Prefetcher::spawn(inner, depth)?))
    }
}

impl<I: Iterator> Iterator for Prefetch<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Prefetch::Inline(inner) => inner.next(),
            Prefetch::Background(prefetcher) => prefetcher.next(),
        }
    }
}

pub struct Prefetcher<T> {
    receiver: Option<Receiver<T>>,
    worker: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Prefetcher<T> {
    fn spawn<I>(inner: I, depth: usize) -> Result<Self>
    where
        I: Iterator<Item = T> + Send + 'static,
    {
        // the worker holds one more item while blocked on a full channel
        let (sender, receiver) = mpsc::sync_channel(depth - 1);
        let worker = thread::Builder::new()
            .name("prefetch".to_string())
            .spawn(move || {
                for item in inner {
                    if sender.send(item).is_err() {
                        debug!("prefetch: consumer dropped, stopping");
                        return;
                    }
                }
                debug!("prefetch: source exhausted");
            })?;
        debug!("prefetch: worker started, depth {depth}");
        Ok(Self {
            receiver: Some(receiver),
            worker: Some(worker),
        })
    }
}

impl<T> Prefetcher<T> {
    fn finish(&mut self) {
        self.receiver = None;
        if let Some(worker) = self.worker.take() {
            if let Err(payload) = worker.join() {
                panic::resume_unwind(payload);
            }
        }
    }
}

impl<T> Iterator for Prefetcher<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self.receiver.as_ref()?.recv() {
            Ok(item) => Some(item),
            Err(_) => {
                self.finish();
                None
            }
        }
    }
}

impl<T> Drop for Prefetcher<T> {
    fn drop(&mut self) {
        // unblocks a worker waiting in send
        self.receiver = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("prefetch worker panicked before the consumer finished");
            }
        }
    }
}

pub fn prefetch<I>(items: I, depth: i64) -> Result<Prefetch<I::IntoIter>>
where
    I: IntoIterator,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
{
    Prefetch::new(items.into_iter(), validate_prefetch_depth(depth)?)
}
