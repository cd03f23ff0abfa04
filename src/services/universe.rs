use crate::business_logic::config::ScreenerConfig;

/// Default scan universe: S&P 500 large caps. Overridable with the
/// `SP500_SYMBOLS_CSV` environment variable.
pub const DEFAULT_UNIVERSE: &[&str] = &[
    "AAPL", "MSFT", "NVDA", "AMZN", "GOOGL", "GOOG", "META", "BRK-B", "LLY", "AVGO",
    "TSLA", "JPM", "WMT", "V", "UNH", "XOM", "ORCL", "MA", "PG", "COST",
    "HD", "JNJ", "ABBV", "NFLX", "BAC", "KO", "CRM", "CVX", "MRK", "AMD",
    "PEP", "TMO", "ADBE", "LIN", "WFC", "ACN", "CSCO", "MCD", "ABT", "IBM",
    "PM", "GE", "TXN", "INTU", "QCOM", "DHR", "AMGN", "VZ", "ISRG", "NOW",
    "CAT", "DIS", "PFE", "SPGI", "NEE", "GS", "UBER", "CMCSA", "RTX", "AXP",
    "UNP", "T", "HON", "LOW", "BKNG", "MS", "COP", "SYK", "BLK", "ETN",
    "LMT", "TJX", "PLD", "VRTX", "BSX", "C", "MDT", "ADP", "PANW", "SCHW",
];

/// The ordered set of symbols to scan. An empty result is valid; the scan
/// simply does nothing.
pub fn universe_symbols(config: &ScreenerConfig) -> Vec<String> {
    match &config.symbols_csv {
        Some(csv) => csv
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect(),
        None => DEFAULT_UNIVERSE.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_universe_is_used_without_override() {
        let config = ScreenerConfig::default();
        let symbols = universe_symbols(&config);
        assert_eq!(symbols.len(), DEFAULT_UNIVERSE.len());
        assert_eq!(symbols[0], "AAPL");
    }

    #[test]
    fn csv_override_is_trimmed_uppercased_and_filtered() {
        let config = ScreenerConfig {
            symbols_csv: Some(" aapl, msft ,, Nvda ".to_string()),
            ..ScreenerConfig::default()
        };
        assert_eq!(universe_symbols(&config), vec!["AAPL", "MSFT", "NVDA"]);
    }

    #[test]
    fn empty_override_yields_empty_universe() {
        let config = ScreenerConfig {
            symbols_csv: Some(" , ".to_string()),
            ..ScreenerConfig::default()
        };
        assert!(universe_symbols(&config).is_empty());
    }
}
