//! Simulated exchange: submit now, resolve on `poll()`.
//!
//! Each order is resolved to Executed or Rejected at submission using the
//! configured rejection percentage. The reply is queued and only delivered
//! to its callback when `poll()` drains the queue in submission order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{Order, OrderId, ReplyStatus};

/// Error text attached to every rejected reply.
pub const REJECTION_REASON: &str = "Random rejection";

/// Reply handler invoked with `(id, status, error_text)`.
pub type ReplyCallback = Box<dyn FnMut(OrderId, ReplyStatus, &str)>;

struct PendingReply {
    id: OrderId,
    status: ReplyStatus,
    callback: Option<ReplyCallback>,
}

pub struct SimulatedExchange {
    rejection_percent: f64,
    next_id: OrderId,
    pending: Vec<PendingReply>,
    rng: StdRng,
}

impl SimulatedExchange {
    /// `rejection_percent` is the chance in percent (0..=100) that an order is rejected.
    pub fn new(rejection_percent: f64) -> Self {
        Self {
            rejection_percent,
            next_id: OrderId::FIRST,
            pending: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Submit an order and return its identifier immediately.
    ///
    /// The callback is not invoked here; it runs on the next `poll()`.
    pub fn send_order(&mut self, order: &Order, callback: Option<ReplyCallback>) -> OrderId {
        let id = self.next_id;
        self.next_id = id.next();

        let draw: f64 = self.rng.gen_range(0.0..100.0);
        let status = if draw < self.rejection_percent {
            ReplyStatus::Rejected
        } else {
            ReplyStatus::Executed
        };

        tracing::trace!(order_id = %id, side = %order.side, %status, "order queued");

        self.pending.push(PendingReply {
            id,
            status,
            callback,
        });
        id
    }

    /// Deliver every queued reply in FIFO order, then clear the queue.
    pub fn poll(&mut self) {
        for reply in self.pending.drain(..) {
            let PendingReply {
                id,
                status,
                callback,
            } = reply;
            let Some(mut callback) = callback else {
                continue;
            };
            let error_text = match status {
                ReplyStatus::Rejected => REJECTION_REASON,
                _ => "",
            };
            callback(id, status, error_text);
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl std::fmt::Debug for SimulatedExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedExchange")
            .field("rejection_percent", &self.rejection_percent)
            .field("next_id", &self.next_id)
            .field("pending", &self.pending.len())
            .finish()
    }
}
