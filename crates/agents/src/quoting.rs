//! Three-phase quoting engine shared by market-making strategies.
//!
//! Given a fair value for the product, a tick is handled in order:
//!
//! 1. **Take** - lift the best resting ask below `fair - take_width` and hit
//!    the best resting bid above `fair + take_width`, consuming the level
//!    from a working copy of the depth so later phases don't re-count it.
//! 2. **Clear** - if taking left a net position, flatten as much of it as the
//!    remaining book allows at a price no worse than `fair ± clear_width`.
//! 3. **Make** - quote both sides: join resting levels close to fair, penny
//!    levels further out, fall back to `fair ± default_edge` in a void.
//!
//! Every phase tracks the volume already committed this tick so the combined
//! orders can never breach the position limit even if all of them fill.

use types::{max_buyable, max_sellable, Order, OrderDepth, Price, Symbol};

/// Tuning parameters for one pass of the quoting engine.
#[derive(Debug, Clone)]
pub struct QuoteParams {
    /// Fair value estimate for this tick.
    pub fair_value: f64,
    /// Edge required before taking a resting order.
    pub take_width: f64,
    /// Worst acceptable distance from fair when flattening inventory.
    pub clear_width: f64,
    /// Resting levels within this edge of fair are ignored when quoting
    /// (neither joined nor pennied).
    pub disregard_edge: f64,
    /// Join a resting level at or inside this edge instead of pennying it.
    pub join_edge: f64,
    /// Quote at `fair ± default_edge` when no resting level guides us.
    pub default_edge: f64,
    /// Skip take opportunities whose level is larger than `adverse_volume`
    /// (big resting size at a "good" price is usually informed flow).
    pub prevent_adverse: bool,
    /// Level-size threshold for `prevent_adverse`.
    pub adverse_volume: i64,
    /// When set, shade quotes one tick toward flat once the absolute
    /// position exceeds this.
    pub soft_position_limit: Option<i64>,
}

impl Default for QuoteParams {
    fn default() -> Self {
        Self {
            fair_value: 0.0,
            take_width: 1.0,
            clear_width: 0.0,
            disregard_edge: 1.0,
            join_edge: 2.0,
            default_edge: 4.0,
            prevent_adverse: false,
            adverse_volume: 0,
            soft_position_limit: None,
        }
    }
}

/// Quoting engine for a single product under a hard position limit.
#[derive(Debug, Clone)]
pub struct Quoter {
    symbol: Symbol,
    position_limit: i64,
}

impl Quoter {
    pub fn new(symbol: impl Into<Symbol>, position_limit: i64) -> Self {
        Self {
            symbol: symbol.into(),
            position_limit,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn position_limit(&self) -> i64 {
        self.position_limit
    }

    /// Run all three phases and return the combined orders for this tick.
    pub fn run(&self, depth: &OrderDepth, position: i64, params: &QuoteParams) -> Vec<Order> {
        let mut working = depth.clone();
        let mut orders = Vec::new();
        let mut buy_volume = 0_i64;
        let mut sell_volume = 0_i64;

        self.take_best_orders(
            &mut working,
            position,
            params,
            &mut orders,
            &mut buy_volume,
            &mut sell_volume,
        );
        self.clear_position_order(
            &working,
            position,
            params,
            &mut orders,
            &mut buy_volume,
            &mut sell_volume,
        );
        self.make_orders(&working, position, params, &mut orders, buy_volume, sell_volume);

        orders
    }

    /// Phase 1: take the best mispriced level on each side.
    ///
    /// Consumed volume is removed from `depth` so the clear and make phases
    /// see the book as it would look after our fills.
    pub fn take_best_orders(
        &self,
        depth: &mut OrderDepth,
        position: i64,
        params: &QuoteParams,
        orders: &mut Vec<Order>,
        buy_volume: &mut i64,
        sell_volume: &mut i64,
    ) {
        let fair = params.fair_value;

        if let Some(best_ask) = depth.best_ask() {
            let ask_amount = -depth.sell_orders[&best_ask];
            let adverse = params.prevent_adverse && ask_amount.abs() > params.adverse_volume;
            if !adverse && best_ask.to_f64() <= fair - params.take_width {
                let quantity = ask_amount.min(max_buyable(self.position_limit, position));
                if quantity > 0 {
                    orders.push(Order::buy(self.symbol.clone(), best_ask, quantity));
                    *buy_volume += quantity;
                    if let Some(remaining) = depth.sell_orders.get_mut(&best_ask) {
                        *remaining += quantity;
                        if *remaining == 0 {
                            depth.sell_orders.remove(&best_ask);
                        }
                    }
                }
            }
        }

        if let Some(best_bid) = depth.best_bid() {
            let bid_amount = depth.buy_orders[&best_bid];
            let adverse = params.prevent_adverse && bid_amount.abs() > params.adverse_volume;
            if !adverse && best_bid.to_f64() >= fair + params.take_width {
                let quantity = bid_amount.min(max_sellable(self.position_limit, position));
                if quantity > 0 {
                    orders.push(Order::sell(self.symbol.clone(), best_bid, quantity));
                    *sell_volume += quantity;
                    if let Some(remaining) = depth.buy_orders.get_mut(&best_bid) {
                        *remaining -= quantity;
                        if *remaining == 0 {
                            depth.buy_orders.remove(&best_bid);
                        }
                    }
                }
            }
        }
    }

    /// Phase 2: flatten the post-take position against resting orders no
    /// worse than `fair ± clear_width`.
    pub fn clear_position_order(
        &self,
        depth: &OrderDepth,
        position: i64,
        params: &QuoteParams,
        orders: &mut Vec<Order>,
        buy_volume: &mut i64,
        sell_volume: &mut i64,
    ) {
        let position_after_take = position + *buy_volume - *sell_volume;
        let fair_for_bid = Price::from_f64_round(params.fair_value - params.clear_width);
        let fair_for_ask = Price::from_f64_round(params.fair_value + params.clear_width);

        let buy_capacity = self.position_limit - (position + *buy_volume);
        let sell_capacity = self.position_limit + (position - *sell_volume);

        if position_after_take > 0 {
            // Long: sell into bids at or above our clearing ask.
            let clear_quantity: i64 = depth
                .buy_orders
                .range(fair_for_ask..)
                .map(|(_, v)| v)
                .sum();
            let sent = sell_capacity.min(clear_quantity.min(position_after_take));
            if sent > 0 {
                orders.push(Order::sell(self.symbol.clone(), fair_for_ask, sent));
                *sell_volume += sent;
            }
        } else if position_after_take < 0 {
            // Short: buy from asks at or below our clearing bid.
            let clear_quantity: i64 = depth
                .sell_orders
                .range(..=fair_for_bid)
                .map(|(_, v)| v.abs())
                .sum();
            let sent = buy_capacity.min(clear_quantity.min(-position_after_take));
            if sent > 0 {
                orders.push(Order::buy(self.symbol.clone(), fair_for_bid, sent));
                *buy_volume += sent;
            }
        }
    }

    /// Phase 3: place two-sided quotes with the remaining capacity.
    pub fn make_orders(
        &self,
        depth: &OrderDepth,
        position: i64,
        params: &QuoteParams,
        orders: &mut Vec<Order>,
        buy_volume: i64,
        sell_volume: i64,
    ) {
        let fair = params.fair_value;

        let best_ask_above_fair = depth
            .sell_orders
            .keys()
            .find(|p| p.to_f64() > fair + params.disregard_edge)
            .copied();
        let best_bid_below_fair = depth
            .buy_orders
            .keys()
            .rev()
            .find(|p| p.to_f64() < fair - params.disregard_edge)
            .copied();

        let mut ask = match best_ask_above_fair {
            Some(level) if (level.to_f64() - fair).abs() <= params.join_edge => level,
            Some(level) => level - Price(1),
            None => Price::from_f64_round(fair + params.default_edge),
        };
        let mut bid = match best_bid_below_fair {
            Some(level) if (fair - level.to_f64()).abs() <= params.join_edge => level,
            Some(level) => level + Price(1),
            None => Price::from_f64_round(fair - params.default_edge),
        };

        // Shade one tick toward flat when carrying a large position.
        if let Some(soft_limit) = params.soft_position_limit {
            if position > soft_limit {
                ask -= Price(1);
            } else if position < -soft_limit {
                bid += Price(1);
            }
        }

        self.market_make(position, bid, ask, orders, buy_volume, sell_volume);
    }

    /// Place the resting bid and ask sized to the remaining limit room.
    pub fn market_make(
        &self,
        position: i64,
        bid: Price,
        ask: Price,
        orders: &mut Vec<Order>,
        buy_volume: i64,
        sell_volume: i64,
    ) {
        let buy_quantity = self.position_limit - (position + buy_volume);
        if buy_quantity > 0 {
            orders.push(Order::buy(self.symbol.clone(), bid, buy_quantity));
        }

        let sell_quantity = self.position_limit + (position - sell_volume);
        if sell_quantity > 0 {
            orders.push(Order::sell(self.symbol.clone(), ask, sell_quantity));
        }
    }
}
