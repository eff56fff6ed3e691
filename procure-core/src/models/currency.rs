use super::{Map, Money};
use rust_decimal::RoundingStrategy;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Number of fractional digits kept in the reporting currency.
pub const MONEY_SCALE: u32 = 2;

/// Round an amount to [`MONEY_SCALE`] places, ties to even.
///
/// Normalization applies this exactly once per amount; downstream sums and
/// products of rounded values are exact and are never rounded again.
pub fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// The ISO 4217 codes a supplier may price in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum CurrencyCode {
    /// Euro
    Eur,
    /// United States dollar
    Usd,
    /// Pound sterling
    Gbp,
    /// Swiss franc
    Chf,
    /// Swedish krona
    Sek,
}

impl CurrencyCode {
    /// The three-letter code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
            Self::Chf => "CHF",
            Self::Sek => "SEK",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A currency code outside of the supported set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(Self::Eur),
            "USD" => Ok(Self::Usd),
            "GBP" => Ok(Self::Gbp),
            "CHF" => Ok(Self::Chf),
            "SEK" => Ok(Self::Sek),
            _ => Err(UnknownCurrency(s.to_owned())),
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = UnknownCurrency;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.as_str().to_owned()
    }
}

/// Conversion factors into a single reporting currency.
///
/// Each entry maps a currency to the multiplier that turns one unit of it into
/// reporting-currency units. Rates are supplied by the caller and are fixed for
/// the duration of an optimization run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RatesDto", into = "RatesDto")
)]
pub struct ExchangeRates(Map<CurrencyCode, Money>);

/// The ways an exchange-rate table may be invalid
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateError {
    /// A rate that is zero or negative
    #[error("exchange rate for {0} must be strictly positive")]
    NonPositive(CurrencyCode),
}

impl ExchangeRates {
    /// Build a validated rate table
    pub fn new(rates: impl IntoIterator<Item = (CurrencyCode, Money)>) -> Result<Self, RateError> {
        RatesDto(rates.into_iter().collect()).try_into()
    }

    /// The multiplier from `currency` into `reporting`.
    ///
    /// The reporting currency always converts at one, whatever entry the
    /// table holds for it; the optimizer rejects tables whose entry for the
    /// reporting currency is not one. Any other currency without an entry
    /// yields `None`; callers must surface that rather than assume a default.
    pub fn rate(&self, currency: CurrencyCode, reporting: CurrencyCode) -> Option<Money> {
        if currency == reporting {
            Some(Money::ONE)
        } else {
            self.0.get(&currency).copied()
        }
    }

    /// Iterate the explicit entries
    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, &Money)> {
        self.0.iter()
    }
}

/// DTO so that deserialized tables are validated like constructed ones
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Debug)]
pub struct RatesDto(pub Map<CurrencyCode, Money>);

impl TryFrom<RatesDto> for ExchangeRates {
    type Error = RateError;

    fn try_from(value: RatesDto) -> Result<Self, Self::Error> {
        if let Some((&code, _)) = value.0.iter().find(|(_, rate)| **rate <= Money::ZERO) {
            return Err(RateError::NonPositive(code));
        }
        Ok(Self(value.0))
    }
}

impl From<ExchangeRates> for RatesDto {
    fn from(value: ExchangeRates) -> Self {
        Self(value.0)
    }
}
