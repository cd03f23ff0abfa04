use crate::models::bar::Bar;
use crate::models::reversal::{Direction, ReversalEvent};

/// Scan an ordered bar sequence for outside reversals.
///
/// An outside bar strictly engulfs the prior bar's range on both sides:
/// `high > prior.high && low < prior.low`. Equal highs or lows do not
/// qualify. Direction comes from the bar's own body: bullish when
/// `close >= open` (a flat close counts as bullish by convention).
///
/// Single linear pass, one bar of lookback; sequences shorter than two bars
/// produce no events.
pub fn detect_outside_reversals(bars: &[Bar]) -> Vec<ReversalEvent> {
    let mut events = Vec::new();

    for i in 1..bars.len() {
        let prior = &bars[i - 1];
        let current = &bars[i];

        if current.high > prior.high && current.low < prior.low {
            let direction = if current.close >= current.open {
                Direction::Bullish
            } else {
                Direction::Bearish
            };
            events.push(ReversalEvent {
                index: i,
                time: current.time,
                direction,
                open: current.open,
                high: current.high,
                low: current.low,
                close: current.close,
            });
        }
    }

    events
}

/// Collapse daily bars into overlapping 2-day synthetic bars.
///
/// The window slides by one bar, not two, so the last synthetic bar is always
/// anchored on the latest available daily close: synthetic bar k covers daily
/// bars k and k+1 and carries the later bar's timestamp. n daily bars yield
/// n-1 synthetic bars; fewer than two inputs yield none.
pub fn aggregate_two_day(daily: &[Bar]) -> Vec<Bar> {
    daily
        .windows(2)
        .map(|pair| Bar {
            time: pair[1].time,
            open: pair[0].open,
            high: pair[0].high.max(pair[1].high),
            low: pair[0].low.min(pair[1].low),
            close: pair[1].close,
            volume: pair[0].volume + pair[1].volume,
        })
        .collect()
}
