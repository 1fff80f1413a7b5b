//! Position manager: turns trading signals into bounded orders.
//!
//! Orders go to an owned `SimulatedExchange`. Each submission is followed
//! by an immediate `poll()`, so replies resolve within the same call.
//! Reply handling lives in a shared ledger so the exchange callback can
//! reach it while the manager still owns the exchange.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::domain::{Order, OrderId, Price, ReplyStatus, Volume};
use crate::exchange::{ReplyCallback, SimulatedExchange};
use crate::journal::{OrderRecord, OrderSink};
use crate::strategy::SignalHandler;

use super::PositionLimits;

/// Running order counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStats {
    pub submitted: u64,
    pub executed: u64,
    pub rejected: u64,
}

struct Ledger {
    limits: PositionLimits,
    pending: HashMap<OrderId, Order>,
    position: Volume,
    realized_pnl: f64,
    stats: OrderStats,
    sink: Box<dyn OrderSink>,
}

impl Ledger {
    fn total_pnl(&self, mark_price: Price) -> f64 {
        self.realized_pnl + self.position * mark_price
    }

    fn handle_reply(&mut self, id: OrderId, status: ReplyStatus, error_text: &str) {
        if status == ReplyStatus::Pending {
            return;
        }
        let Some(order) = self.pending.remove(&id) else {
            tracing::debug!(order_id = %id, %status, "reply for unknown order ignored");
            return;
        };

        match status {
            ReplyStatus::Executed => {
                self.realized_pnl += order.cash_flow();
                self.position = self.limits.snap(self.position + order.position_delta());
                self.stats.executed += 1;
            }
            ReplyStatus::Rejected => self.stats.rejected += 1,
            ReplyStatus::Pending => {}
        }

        tracing::debug!(
            order_id = %id,
            side = %order.side,
            price = order.price,
            volume = order.volume,
            %status,
            position = self.position,
            "order resolved"
        );

        let record = OrderRecord {
            side: order.side,
            price: order.price,
            volume: order.volume,
            status,
            error_text: error_text.to_string(),
            total_pnl: self.total_pnl(order.price),
        };
        if let Err(e) = self.sink.write_order(&record) {
            tracing::warn!(error = %e, order_id = %id, "order journal write failed");
        }
    }
}

pub struct PositionManager {
    exchange: SimulatedExchange,
    ledger: Rc<RefCell<Ledger>>,
}

impl PositionManager {
    pub fn new(
        limits: PositionLimits,
        rejection_percent: f64,
        sink: impl OrderSink + 'static,
    ) -> Self {
        let ledger = Ledger {
            limits,
            pending: HashMap::new(),
            position: 0.0,
            realized_pnl: 0.0,
            stats: OrderStats::default(),
            sink: Box::new(sink),
        };
        Self {
            exchange: SimulatedExchange::new(rejection_percent),
            ledger: Rc::new(RefCell::new(ledger)),
        }
    }

    /// Signed net position.
    pub fn position(&self) -> Volume {
        self.ledger.borrow().position
    }

    /// Cumulative cash flow from executed orders.
    pub fn realized_pnl(&self) -> f64 {
        self.ledger.borrow().realized_pnl
    }

    /// Realized PnL plus the open position marked at `mark_price`.
    pub fn total_pnl(&self, mark_price: Price) -> f64 {
        self.ledger.borrow().total_pnl(mark_price)
    }

    pub fn stats(&self) -> OrderStats {
        self.ledger.borrow().stats
    }

    /// Orders submitted but not yet resolved. Zero between calls.
    pub fn pending_count(&self) -> usize {
        self.ledger.borrow().pending.len()
    }

    /// Buy up to `volume`, clamped to the room left below the upper bound.
    pub fn on_buy_signal(&mut self, price: Price, volume: Volume) {
        let (limits, position) = self.snapshot();
        if limits.at_max(position) {
            return;
        }

        let volume = volume.min(limits.buy_room(position));
        if volume <= 0.0 {
            return;
        }

        self.send_order(Order::buy(price, volume));
    }

    /// Sell up to `volume`, clamped to the room left above the lower bound.
    pub fn on_sell_signal(&mut self, price: Price, volume: Volume) {
        let (limits, position) = self.snapshot();
        if limits.at_min(position) {
            return;
        }

        let volume = volume.min(limits.sell_room(position));
        if volume <= 0.0 {
            return;
        }

        self.send_order(Order::sell(price, volume));
    }

    /// Submit an order as-is and resolve it immediately.
    ///
    /// No bound check happens here; the signal handlers clamp before calling.
    pub fn send_order(&mut self, order: Order) -> OrderId {
        let ledger = Rc::clone(&self.ledger);
        let callback: ReplyCallback =
            Box::new(move |id: OrderId, status: ReplyStatus, error_text: &str| {
                ledger.borrow_mut().handle_reply(id, status, error_text)
            });

        let id = self.exchange.send_order(&order, Some(callback));
        {
            let mut ledger = self.ledger.borrow_mut();
            ledger.pending.insert(id, order);
            ledger.stats.submitted += 1;
        }
        tracing::debug!(order_id = %id, side = %order.side, price = order.price, volume = order.volume, "order submitted");

        self.exchange.poll();
        id
    }

    /// Apply an exchange reply. Unknown or already-resolved ids are ignored.
    pub fn handle_reply(&self, id: OrderId, status: ReplyStatus, error_text: &str) {
        self.ledger.borrow_mut().handle_reply(id, status, error_text);
    }

    fn snapshot(&self) -> (PositionLimits, Volume) {
        let ledger = self.ledger.borrow();
        (ledger.limits, ledger.position)
    }
}

impl SignalHandler for PositionManager {
    fn on_buy_signal(&mut self, price: Price, volume: Volume) {
        PositionManager::on_buy_signal(self, price, volume);
    }

    fn on_sell_signal(&mut self, price: Price, volume: Volume) {
        PositionManager::on_sell_signal(self, price, volume);
    }
}

impl std::fmt::Debug for PositionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ledger = self.ledger.borrow();
        f.debug_struct("PositionManager")
            .field("limits", &ledger.limits)
            .field("position", &ledger.position)
            .field("realized_pnl", &ledger.realized_pnl)
            .field("stats", &ledger.stats)
            .field("exchange", &self.exchange)
            .finish()
    }
}
