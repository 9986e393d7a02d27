//! Per-user cash and position state.
//!
//! Accounts are created lazily with a seeded starting balance and live for
//! the whole process. The concurrent map's entry guard gives settlement
//! exclusive access to one user's account while other users proceed in
//! parallel; nothing here knows about orders or timing.

use dashmap::DashMap;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use plutus_core::{Portfolio, Price, Quantity, Side, Symbol, Timestamp, UserId};
use plutus_ports::{Clock, PriceSource};

use crate::error::{EngineError, LedgerError, Result};

/// One holding and its average entry price
#[derive(Debug, Clone)]
struct Position {
    quantity: Quantity,
    avg_price: Price,
}

#[derive(Debug, Clone)]
struct Account {
    cash: Price,
    positions: HashMap<Symbol, Position>,
    updated_at: Timestamp,
}

/// Cash/position state for every user of the platform
pub struct Ledger {
    accounts: DashMap<UserId, Account>,
    starting_cash: Price,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    pub fn new(starting_cash: Price, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts: DashMap::new(),
            starting_cash,
            clock,
        }
    }

    /// Fetch a user's portfolio, creating the account with the seeded
    /// starting balance on first access.
    ///
    /// The returned snapshot is valued at entry prices (book value); use
    /// [`valuate`](Self::valuate) for a mark-to-market view.
    pub fn get_or_create(&self, user_id: &str) -> Portfolio {
        let now = self.clock.now();
        let account = self
            .accounts
            .entry(user_id.to_string())
            .or_insert_with(|| {
                debug!(user_id, "seeding account");
                Account {
                    cash: self.starting_cash,
                    positions: HashMap::new(),
                    updated_at: now,
                }
            });
        Self::book_snapshot(user_id, &account, now)
    }

    /// Portfolio of an existing user; does not create accounts
    pub fn portfolio(&self, user_id: &str) -> Result<Portfolio> {
        let account = self
            .accounts
            .get(user_id)
            .ok_or_else(|| EngineError::UserNotFound(user_id.to_string()))?;
        Ok(Self::book_snapshot(user_id, &account, self.clock.now()))
    }

    /// Mark-to-market valuation against the supplied price lookup.
    ///
    /// Positions without a live price are marked at their entry price. Does
    /// not mutate stored cash or positions.
    pub fn valuate(&self, user_id: &str, prices: &dyn PriceSource) -> Result<Portfolio> {
        let account = self
            .accounts
            .get(user_id)
            .ok_or_else(|| EngineError::UserNotFound(user_id.to_string()))?;

        let mut total_value = account.cash;
        let mut unrealized_pnl = Decimal::ZERO;
        let mut positions = HashMap::with_capacity(account.positions.len());
        for (symbol, position) in &account.positions {
            let mark = prices.price(symbol).unwrap_or(position.avg_price);
            let quantity = Decimal::from(position.quantity);
            total_value += quantity * mark;
            unrealized_pnl += quantity * (mark - position.avg_price);
            positions.insert(symbol.clone(), position.quantity);
        }

        Ok(Portfolio {
            user_id: user_id.to_string(),
            cash: account.cash,
            positions,
            total_value,
            unrealized_pnl,
            timestamp: self.clock.now(),
        })
    }

    /// Apply one settled execution to a user's account.
    ///
    /// A buy must be covered by cash, a sell by the held quantity; zero
    /// positions are removed rather than kept. The entry guard serialises
    /// concurrent settlements of the same user.
    pub fn apply_settlement(
        &self,
        user_id: &str,
        symbol: &str,
        side: Side,
        quantity: Quantity,
        execution_price: Price,
    ) -> std::result::Result<(), LedgerError> {
        let now = self.clock.now();
        let mut account = self
            .accounts
            .entry(user_id.to_string())
            .or_insert_with(|| Account {
                cash: self.starting_cash,
                positions: HashMap::new(),
                updated_at: now,
            });

        let notional = execution_price * Decimal::from(quantity);
        match side {
            Side::Buy => {
                if notional > account.cash {
                    return Err(LedgerError::InsufficientFunds {
                        required: notional,
                        available: account.cash,
                    });
                }
                account.cash -= notional;
                match account.positions.get_mut(symbol) {
                    Some(position) => {
                        let held = Decimal::from(position.quantity);
                        let added = Decimal::from(quantity);
                        position.avg_price = (held * position.avg_price
                            + added * execution_price)
                            / (held + added);
                        position.quantity += quantity;
                    }
                    None => {
                        account.positions.insert(
                            symbol.to_string(),
                            Position {
                                quantity,
                                avg_price: execution_price,
                            },
                        );
                    }
                }
            }
            Side::Sell => {
                let held = account
                    .positions
                    .get(symbol)
                    .map(|p| p.quantity)
                    .unwrap_or(0);
                if quantity > held {
                    return Err(LedgerError::InsufficientPosition {
                        symbol: symbol.to_string(),
                        requested: quantity,
                        held,
                    });
                }
                account.cash += notional;
                if quantity == held {
                    account.positions.remove(symbol);
                } else if let Some(position) = account.positions.get_mut(symbol) {
                    position.quantity -= quantity;
                }
            }
        }
        account.updated_at = now;
        Ok(())
    }

    /// Install an account with explicit cash and positions (bootstrap, tests)
    pub fn seed(&self, user_id: &str, cash: Price, positions: &[(Symbol, Quantity, Price)]) {
        let now = self.clock.now();
        let positions = positions
            .iter()
            .map(|(symbol, quantity, avg_price)| {
                (
                    symbol.clone(),
                    Position {
                        quantity: *quantity,
                        avg_price: *avg_price,
                    },
                )
            })
            .collect();
        self.accounts.insert(
            user_id.to_string(),
            Account {
                cash,
                positions,
                updated_at: now,
            },
        );
    }

    fn book_snapshot(user_id: &str, account: &Account, now: Timestamp) -> Portfolio {
        let mut total_value = account.cash;
        let mut positions = HashMap::with_capacity(account.positions.len());
        for (symbol, position) in &account.positions {
            total_value += Decimal::from(position.quantity) * position.avg_price;
            positions.insert(symbol.clone(), position.quantity);
        }
        Portfolio {
            user_id: user_id.to_string(),
            cash: account.cash,
            positions,
            total_value,
            unrealized_pnl: Decimal::ZERO,
            timestamp: now,
        }
    }
}
