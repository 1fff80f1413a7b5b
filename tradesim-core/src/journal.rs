//! Journal sinks for ticks and resolved orders.
//!
//! The core writes through these traits and never owns a file handle.
//! A failed write is reported as a `JournalError`; callers log it and
//! carry on, so one bad write never stops the simulation.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{OrderSide, Price, ReplyStatus, Tick, Volume};

/// A single journal write failed.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("{journal}: write failed: {reason}")]
    Write {
        journal: &'static str,
        reason: String,
    },
}

impl JournalError {
    pub fn write(journal: &'static str, reason: impl ToString) -> Self {
        Self::Write {
            journal,
            reason: reason.to_string(),
        }
    }
}

/// Terminal outcome of one order, as written to the order journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub side: OrderSide,
    pub price: Price,
    pub volume: Volume,
    pub status: ReplyStatus,
    pub error_text: String,
    /// Realized PnL plus the open position marked at the order price.
    pub total_pnl: f64,
}

pub trait TickSink {
    fn write_tick(&mut self, tick: &Tick) -> Result<(), JournalError>;
}

pub trait OrderSink {
    fn write_order(&mut self, record: &OrderRecord) -> Result<(), JournalError>;
}

impl<T: TickSink + ?Sized> TickSink for Box<T> {
    fn write_tick(&mut self, tick: &Tick) -> Result<(), JournalError> {
        (**self).write_tick(tick)
    }
}

impl<T: OrderSink + ?Sized> OrderSink for Box<T> {
    fn write_order(&mut self, record: &OrderRecord) -> Result<(), JournalError> {
        (**self).write_order(record)
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullJournal;

impl TickSink for NullJournal {
    fn write_tick(&mut self, _tick: &Tick) -> Result<(), JournalError> {
        Ok(())
    }
}

impl OrderSink for NullJournal {
    fn write_order(&mut self, _record: &OrderRecord) -> Result<(), JournalError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Entries {
    ticks: Vec<Tick>,
    orders: Vec<OrderRecord>,
}

/// In-memory journal. Clones share the same storage, so a handle kept by
/// the caller sees everything written through the clone given to the engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryJournal {
    entries: Rc<RefCell<Entries>>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks(&self) -> Vec<Tick> {
        self.entries.borrow().ticks.clone()
    }

    pub fn orders(&self) -> Vec<OrderRecord> {
        self.entries.borrow().orders.clone()
    }

    pub fn tick_count(&self) -> usize {
        self.entries.borrow().ticks.len()
    }

    pub fn order_count(&self) -> usize {
        self.entries.borrow().orders.len()
    }
}

impl TickSink for MemoryJournal {
    fn write_tick(&mut self, tick: &Tick) -> Result<(), JournalError> {
        self.entries.borrow_mut().ticks.push(*tick);
        Ok(())
    }
}

impl OrderSink for MemoryJournal {
    fn write_order(&mut self, record: &OrderRecord) -> Result<(), JournalError> {
        self.entries.borrow_mut().orders.push(record.clone());
        Ok(())
    }
}
