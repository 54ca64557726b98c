use crate::screen::spot::SpotQuote;
use std::cmp::Ordering;

/// Threshold screen over spot quotes. Every bound that is set must hold; a quote missing
/// the value a bound needs does not pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenFilter {
    /// Strict lower bound on total market cap, in the board's currency.
    pub min_market_cap: Option<f64>,
    /// Open interval `(low, high)` for P/E.
    pub pe_range: Option<(f64, f64)>,
}

impl ScreenFilter {
    /// Market cap above 50 billion and a positive P/E under 60.
    pub fn large_cap_value() -> Self {
        Self {
            min_market_cap: Some(500e8),
            pe_range: Some((0.0, 60.0)),
        }
    }

    pub fn passes(&self, quote: &SpotQuote) -> bool {
        if let Some(min) = self.min_market_cap {
            match quote.market_cap {
                Some(cap) if cap > min => {}
                _ => return false,
            }
        }
        if let Some((low, high)) = self.pe_range {
            match quote.pe_ratio {
                Some(pe) if pe > low && pe < high => {}
                _ => return false,
            }
        }
        true
    }

    pub fn apply<'a>(&self, quotes: &'a [SpotQuote]) -> Vec<&'a SpotQuote> {
        quotes.iter().filter(|q| self.passes(q)).collect()
    }
}

/// Largest percent gain first; quotes without a change sort last.
pub fn top_gainers<'a, I>(quotes: I, n: usize) -> Vec<&'a SpotQuote>
where
    I: IntoIterator<Item = &'a SpotQuote>,
{
    let mut sorted: Vec<&SpotQuote> = quotes.into_iter().collect();
    sorted.sort_by(|a, b| match (a.change_percent, b.change_percent) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted.truncate(n);
    sorted
}
