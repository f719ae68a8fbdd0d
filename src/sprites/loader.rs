//! Background sprite decoding.
//!
//! Decoding PNGs on the render thread would stall frames, so one worker
//! thread owns all `image` work.  The bank sends it paths, the worker sends
//! back packed `0xAARRGGBB` bitmaps, and the bank polls completions once per
//! frame (`pump`).  Nothing blocks mid-frame: a sprite drawn before its
//! pixels arrive is a silent no-op and self-heals on a later frame.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;

use crate::gfx::Bitmap;
use crate::sprites::{SpriteError, SpriteId};

/// Decode one PNG into the framebuffer pixel format.
pub fn decode(path: &Path) -> Result<Bitmap, SpriteError> {
    let img = image::open(path)?.into_rgba8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let pixels = img
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
        })
        .collect();
    Ok(Bitmap { w, h, pixels })
}

pub struct Loader {
    jobs: Option<Sender<(SpriteId, PathBuf)>>,
    done: Receiver<(SpriteId, Result<Bitmap, SpriteError>)>,
    worker: Option<JoinHandle<()>>,
}

impl Loader {
    pub fn spawn() -> Loader {
        let (jobs, job_rx) = channel::<(SpriteId, PathBuf)>();
        let (done_tx, done) = channel();
        let worker = std::thread::spawn(move || {
            // exits when the bank drops its Sender
            while let Ok((id, path)) = job_rx.recv() {
                let res = decode(&path);
                if let Err(e) = &res {
                    log::warn!("sprite decode {} failed: {e}", path.display());
                }
                if done_tx.send((id, res)).is_err() {
                    break;
                }
            }
        });
        Loader {
            jobs: Some(jobs),
            done,
            worker: Some(worker),
        }
    }

    pub fn request(&self, id: SpriteId, path: PathBuf) {
        if let Some(jobs) = &self.jobs {
            // send only fails if the worker died; the draw then stays a no-op
            let _ = jobs.send((id, path));
        }
    }

    /// Drain every finished decode without blocking.
    pub fn poll(&self, out: &mut Vec<(SpriteId, Result<Bitmap, SpriteError>)>) {
        out.extend(self.done.try_iter());
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_error_not_panic() {
        let loader = Loader::spawn();
        loader.request(3, PathBuf::from("/nonexistent/sprite.png"));
        let mut out = Vec::new();
        // the worker needs a moment; poll until the completion lands
        for _ in 0..200 {
            loader.poll(&mut out);
            if !out.is_empty() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, 3);
        assert!(out[0].1.is_err());
    }

    #[test]
    fn drop_joins_worker() {
        let loader = Loader::spawn();
        drop(loader); // must not deadlock
    }
}
