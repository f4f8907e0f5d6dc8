/// One resting order level from the market depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthLevel {
    pub price: f64,
    pub quantity: i64,
}

/// A live quote for one instrument.
///
/// `best_bid` is the highest price a buyer offers and `best_ask` the lowest a
/// seller asks, taken from depth lists ordered best-first. Padded zero-price
/// depth rows count as "no order", so both sides are `None` when the book is
/// empty — the distinction between "no data" and "genuinely worthless" only
/// collapses to 0 at the serialization boundary.
#[derive(Debug, Clone)]
pub struct Quote {
    pub instrument_token: String,
    pub last_price: f64,
    pub best_bid: Option<DepthLevel>,
    pub best_ask: Option<DepthLevel>,
}

impl Quote {
    pub fn best_bid_price(&self) -> Option<f64> {
        self.best_bid.map(|l| l.price)
    }

    pub fn best_ask_price(&self) -> Option<f64> {
        self.best_ask.map(|l| l.price)
    }
}
