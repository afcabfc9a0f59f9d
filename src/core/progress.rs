//! Cooperative progress reporting.
//!
//! Decoders run to completion on the caller's thread. Every `interval`
//! points they hand a [`ProgressEvent`] to a [`Progress`] sink; that call is
//! the only point where control leaves the decoder, so a host frame loop can
//! pump its events or redraw a progress bar from inside the sink.

use std::sync::mpsc::Sender;

/// Points between progress events for the PLY decoder.
pub const PLY_PROGRESS_INTERVAL: usize = 1_000;
/// Points between progress events for the XYZ decoder.
pub const XYZ_PROGRESS_INTERVAL: usize = 1_000;
/// Points between progress events for the SPLAT decoder.
pub const SPLAT_PROGRESS_INTERVAL: usize = 10_000;

/// One progress notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ProgressEvent {
    /// Points decoded so far.
    pub loaded: usize,
    /// Total expected points, or 0 when the format does not declare it.
    pub total: usize,
}

impl ProgressEvent {
    pub const fn new(loaded: usize, total: usize) -> Self {
        Self { loaded, total }
    }

    /// Completion ratio in `[0, 1]`, `None` when the total is unknown.
    pub fn fraction(&self) -> Option<f32> {
        (self.total > 0).then(|| (self.loaded as f32 / self.total as f32).min(1.0))
    }
}

/// Receiver of progress notifications.
pub trait Progress {
    fn report(&mut self, event: ProgressEvent);
}

impl<F: FnMut(ProgressEvent)> Progress for F {
    #[inline]
    fn report(&mut self, event: ProgressEvent) {
        self(event)
    }
}

/// Sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    #[inline]
    fn report(&mut self, _event: ProgressEvent) {}
}

/// Sink forwarding events over a channel, e.g. to a UI thread.
///
/// A disconnected receiver is ignored.
#[derive(Clone, Debug)]
pub struct ChannelProgress(pub Sender<ProgressEvent>);

impl Progress for ChannelProgress {
    fn report(&mut self, event: ProgressEvent) {
        let _ = self.0.send(event);
    }
}

/// Counts decoded points and emits an event every `interval` points.
pub struct Pacer<'a> {
    sink: &'a mut dyn Progress,
    interval: usize,
    total: usize,
    loaded: usize,
}

impl<'a> Pacer<'a> {
    pub fn new(sink: &'a mut dyn Progress, interval: usize, total: usize) -> Self {
        Self {
            sink,
            interval: interval.max(1),
            total,
            loaded: 0,
        }
    }

    /// Record one decoded point.
    #[inline]
    pub fn tick(&mut self) {
        self.loaded += 1;
        if self.loaded % self.interval == 0 {
            tracing::trace!(loaded = self.loaded, total = self.total, "progress");
            self.sink.report(ProgressEvent::new(self.loaded, self.total));
        }
    }

    /// Emit the closing event unless the last tick already reported it.
    pub fn finish(self) {
        if self.loaded == 0 || self.loaded % self.interval != 0 {
            self.sink.report(ProgressEvent::new(self.loaded, self.total));
        }
    }
}
