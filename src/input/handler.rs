use crate::{input::events::InputEvent, GlobeError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Cloneable handle that gesture sources use to queue input for the globe.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<InputEvent>,
}

impl EventSender {
    pub fn send(&self, event: InputEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| GlobeError::Disconnected)
    }
}

/// Turns scroll wheel deltas into an absolute zoom factor.
///
/// Each wheel notch multiplies the factor by `2^(-delta * speed)`. If the
/// factor would fall below the floor it is reset to the floor, so zooming
/// back in starts from the floor rather than from an unreachable value.
#[derive(Debug, Clone)]
pub struct ZoomAccumulator {
    factor: f64,
    floor: f64,
    speed: f64,
}

impl ZoomAccumulator {
    pub fn new(floor: f64, speed: f64) -> Self {
        Self {
            factor: 1.0,
            floor,
            speed,
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn wheel(&mut self, delta: f64) -> f64 {
        self.set((self.factor * 2f64.powf(-delta * self.speed)).max(0.0))
    }

    /// Overrides the factor, e.g. from a pinch gesture.
    pub fn set(&mut self, factor: f64) -> f64 {
        self.factor = if factor > self.floor {
            factor
        } else {
            self.floor
        };
        self.factor
    }

    pub fn reset(&mut self) {
        self.factor = 1.0;
    }
}

/// Queues raw input and normalizes it into view-controller events.
#[derive(Debug)]
pub struct InputHandler {
    tx: Sender<InputEvent>,
    rx: Receiver<InputEvent>,
    zoom: ZoomAccumulator,
    dragging: bool,
}

impl InputHandler {
    pub fn new(min_zoom_factor: f64, wheel_zoom_speed: f64) -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            zoom: ZoomAccumulator::new(min_zoom_factor, wheel_zoom_speed),
            dragging: false,
        }
    }

    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Takes every queued event, oldest first.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.rx.try_iter().collect()
    }

    pub fn pending_events(&self) -> usize {
        self.rx.len()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn zoom_factor(&self) -> f64 {
        self.zoom.factor()
    }

    /// Normalizes one event: wheel deltas and pinch factors both leave as an
    /// absolute, floor-clamped `Zoom`. Drag moves outside a gesture are dropped.
    pub fn normalize(&mut self, event: InputEvent) -> Option<InputEvent> {
        match event {
            InputEvent::DragStart { .. } => {
                self.dragging = true;
                Some(event)
            }
            InputEvent::Drag(_) if !self.dragging => None,
            InputEvent::DragEnd => {
                if !self.dragging {
                    return None;
                }
                self.dragging = false;
                Some(event)
            }
            InputEvent::Wheel { delta } => Some(InputEvent::zoom(self.zoom.wheel(delta))),
            InputEvent::Zoom(zoom) => Some(InputEvent::zoom(self.zoom.set(zoom.factor))),
            InputEvent::Resize(resize) if !resize.has_area() => None,
            InputEvent::Resize(_) => {
                self.zoom.reset();
                Some(event)
            }
            _ => Some(event),
        }
    }
}
