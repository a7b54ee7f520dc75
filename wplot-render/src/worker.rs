//! Message-passing workers for the two pipeline stages.
//!
//! Each worker is an isolated unit of execution: a blocking loop that owns no
//! state across requests and communicates only by message. Requests run to
//! completion — there is no cancellation, so a caller abandoning stale work
//! discards the response (the `index` tag makes that cheap) rather than
//! interrupting the worker.

use std::ops::Range;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use tracing::debug;

use wplot_core::{Expression, Projection, Viewport};

use crate::buffer::RenderBuffer;
use crate::colorize::{colorize, ColorMode};
use crate::evaluator::evaluate_band;
use crate::value_buffer::ValueBuffer;

/// One evaluation unit of work: the pixel rows `rows` of the full frame's
/// viewport. Carrying the whole viewport rather than a pre-sliced band keeps
/// the pixel-to-point arithmetic identical to an unbanded evaluation.
///
/// `index` and `pixel_top` are opaque passthrough tags echoed in the
/// response so the caller can reassemble out-of-order results.
pub struct EvalRequest {
    pub index: usize,
    pub pixel_top: u32,
    pub expr: Arc<dyn Expression + Send + Sync>,
    pub projection: Projection,
    pub viewport: Viewport,
    pub rows: Range<u32>,
}

pub struct EvalResponse {
    pub index: usize,
    pub pixel_top: u32,
    pub result: crate::Result<ValueBuffer>,
}

/// One colorization unit of work.
///
/// The buffer is owned by the request for the duration of the invocation and
/// handed back, mutated, in the response. `values.min`/`values.max` must be
/// the extrema matching the colorization mode — for banded rendering that
/// means the caller substitutes the frame-global extrema before dispatch.
pub struct ColorRequest {
    pub index: usize,
    pub pixel_top: u32,
    pub buffer: RenderBuffer,
    pub values: ValueBuffer,
    pub mode: ColorMode,
}

pub struct ColorResponse {
    pub index: usize,
    pub pixel_top: u32,
    pub buffer: RenderBuffer,
}

/// Blocking evaluation loop: one request in, one response out, until the
/// request channel closes or the response side hangs up.
pub fn evaluation_worker(rx: Receiver<EvalRequest>, tx: Sender<EvalResponse>) {
    while let Ok(req) = rx.recv() {
        debug!(
            index = req.index,
            pixel_top = req.pixel_top,
            rows = req.rows.end - req.rows.start,
            "Evaluating band"
        );
        let result = evaluate_band(&*req.expr, &req.viewport, req.projection, req.rows.clone());
        let resp = EvalResponse {
            index: req.index,
            pixel_top: req.pixel_top,
            result,
        };
        if tx.send(resp).is_err() {
            return;
        }
    }
}

/// Blocking colorization loop, symmetric to [`evaluation_worker`].
pub fn colorize_worker(rx: Receiver<ColorRequest>, tx: Sender<ColorResponse>) {
    while let Ok(mut req) = rx.recv() {
        debug!(
            index = req.index,
            pixel_top = req.pixel_top,
            "Colorizing band"
        );
        colorize(&mut req.buffer, &req.values, req.mode);
        let resp = ColorResponse {
            index: req.index,
            pixel_top: req.pixel_top,
            buffer: req.buffer,
        };
        if tx.send(resp).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::evaluate;
    use std::sync::mpsc;
    use std::thread;
    use wplot_core::{Builtin, Complex64};

    #[test]
    fn evaluation_worker_echoes_tags() {
        let (tx_req, rx_req) = mpsc::channel();
        let (tx_resp, rx_resp) = mpsc::channel();
        let handle = thread::spawn(move || evaluation_worker(rx_req, tx_resp));

        let vp = Viewport::default_square(8, 4);
        for (index, pixel_top) in [(0usize, 0u32), (1, 4), (7, 12)] {
            tx_req
                .send(EvalRequest {
                    index,
                    pixel_top,
                    expr: Arc::new(Builtin::Square),
                    projection: Projection::Magnitude,
                    viewport: vp,
                    rows: 0..vp.height,
                })
                .unwrap();
        }
        drop(tx_req);

        let mut seen = Vec::new();
        for _ in 0..3 {
            let resp = rx_resp.recv().unwrap();
            assert!(resp.result.is_ok());
            seen.push((resp.index, resp.pixel_top));
        }
        assert_eq!(seen, vec![(0, 0), (1, 4), (7, 12)]);
        handle.join().unwrap();
    }

    #[test]
    fn evaluation_worker_reports_failures() {
        let (tx_req, rx_req) = mpsc::channel();
        let (tx_resp, rx_resp) = mpsc::channel();
        let handle = thread::spawn(move || evaluation_worker(rx_req, tx_resp));

        let failing = |w: Complex64| -> wplot_core::Result<Complex64> {
            Err(wplot_core::CoreError::Evaluation {
                re: w.re,
                im: w.im,
                reason: "bad parse".into(),
            })
        };
        tx_req
            .send(EvalRequest {
                index: 3,
                pixel_top: 0,
                expr: Arc::new(failing),
                projection: Projection::Phase,
                viewport: Viewport::default_square(4, 4),
                rows: 0..4,
            })
            .unwrap();
        drop(tx_req);

        let resp = rx_resp.recv().unwrap();
        assert_eq!(resp.index, 3);
        assert!(resp.result.is_err());
        handle.join().unwrap();
    }

    #[test]
    fn colorize_worker_returns_mutated_buffer() {
        let (tx_req, rx_req) = mpsc::channel();
        let (tx_resp, rx_resp) = mpsc::channel();
        let handle = thread::spawn(move || colorize_worker(rx_req, tx_resp));

        let vp = Viewport::default_square(8, 8);
        let values = evaluate(&Builtin::Demo, &vp, Projection::Magnitude).unwrap();
        tx_req
            .send(ColorRequest {
                index: 0,
                pixel_top: 0,
                buffer: RenderBuffer::new(8, 8),
                values,
                mode: ColorMode::Domain(crate::DomainStyle::ConformalThin),
            })
            .unwrap();
        drop(tx_req);

        let resp = rx_resp.recv().unwrap();
        assert_eq!(resp.buffer.pixels.len(), 8 * 8 * 4);
        assert!(resp
            .buffer
            .pixels
            .chunks_exact(4)
            .any(|px| px[0] > 0 || px[1] > 0 || px[2] > 0));
        handle.join().unwrap();
    }
}
