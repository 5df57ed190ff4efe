//! Static series catalog.
//!
//! Every series the dashboard knows about is declared here, in processing
//! order. The catalog drives all downstream decisions: what to fetch, which
//! transform to apply, and which daily series define the reference date axis
//! for interpolation.

use crate::domain::{Category, Frequency, SeriesKind, SeriesSpec};

/// Earliest date fetched during a full backfill.
pub const DEFAULT_START_DATE: &str = "2018-01-01";

const fn daily(
    key: &'static str,
    name: &'static str,
    source_id: &'static str,
    category: Category,
    unit: Option<&'static str>,
) -> SeriesSpec {
    SeriesSpec {
        key,
        name,
        source_id,
        category,
        frequency: Frequency::Daily,
        kind: SeriesKind::Direct,
        unit,
    }
}

const fn monthly(
    key: &'static str,
    name: &'static str,
    source_id: &'static str,
    category: Category,
) -> SeriesSpec {
    SeriesSpec {
        key,
        name,
        source_id,
        category,
        frequency: Frequency::Monthly,
        kind: SeriesKind::Interpolated,
        unit: Some("%"),
    }
}

/// All series in processing order.
///
/// The derived spread is last so both of its inputs are finalized before the
/// second-pass recompute (the sync loop skips it anyway).
pub const ALL_SERIES: &[SeriesSpec] = &[
    daily("treasury_1y", "1-Year Treasury", "DGS1", Category::Yields, Some("%")),
    daily("treasury_2y", "2-Year Treasury", "DGS2", Category::Yields, Some("%")),
    daily("treasury_5y", "5-Year Treasury", "DGS5", Category::Yields, Some("%")),
    daily("treasury_10y", "10-Year Treasury", "DGS10", Category::Yields, Some("%")),
    daily("treasury_20y", "20-Year Treasury", "DGS20", Category::Yields, Some("%")),
    monthly("cpi", "CPI All Items", "CPIAUCSL", Category::Inflation),
    monthly("core_cpi", "Core CPI (ex Food & Energy)", "CPILFESL", Category::Inflation),
    daily("vix", "VIX (S&P 500 Volatility)", "VIXCLS", Category::Volatility, Some("points")),
    daily("gvz", "GVZ (Gold Volatility)", "GVZCLS", Category::Volatility, Some("points")),
    monthly("unemployment_rate", "Unemployment Rate", "UNRATE", Category::Employment),
    daily("oil_price", "Oil Price (WTI)", "DCOILWTICO", Category::Commodities, Some("$/barrel")),
    daily("dollar_index", "US Dollar Index", "DTWEXBGS", Category::Currency, Some("Index")),
    daily("eur_usd", "EUR/USD Exchange Rate", "DEXUSEU", Category::Currency, Some("USD")),
    daily("sp500", "S&P 500 Index", "SP500", Category::Currency, Some("Index")),
    SeriesSpec {
        key: "yield_curve_spread",
        name: "10Y-2Y Yield Spread",
        source_id: "T10Y2Y (calculated)",
        category: Category::EconomicIndicators,
        frequency: Frequency::Daily,
        kind: SeriesKind::Derived {
            minuend: "treasury_10y",
            subtrahend: "treasury_2y",
        },
        unit: Some("%"),
    },
];

/// Look up a spec by key.
pub fn find(key: &str) -> Option<&'static SeriesSpec> {
    ALL_SERIES.iter().find(|s| s.key == key)
}

/// Keys of the daily treasury series whose stored dates form the reference
/// axis that interpolated series are aligned onto.
pub fn reference_keys() -> impl Iterator<Item = &'static str> {
    ALL_SERIES
        .iter()
        .filter(|s| s.category == Category::Yields)
        .map(|s| s.key)
}
