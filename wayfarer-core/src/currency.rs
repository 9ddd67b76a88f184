//! Exchange-rate tables and currency conversion.

use std::{collections::BTreeMap, fmt, str::FromStr};

use thiserror::Error;

/// Errors raised by currency parsing and conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The code is not three ASCII letters.
    #[error("invalid ISO 4217 currency code {0:?}")]
    InvalidCode(String),
    /// The rate table has no entry for the currency.
    #[error("no exchange rate for {0}")]
    UnknownCurrency(CurrencyCode),
    /// The table holds a zero, negative or non-finite rate.
    #[error("exchange rate for {code} is unusable: {rate}")]
    InvalidRate {
        /// Affected currency.
        code: CurrencyCode,
        /// Offending rate.
        rate: f64,
    },
    /// The amount is NaN or infinite.
    #[error("amount {0} is not a finite number")]
    InvalidAmount(f64),
}

/// An upper-cased ISO 4217 code such as `EUR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Validate and normalise a currency code.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::InvalidCode`] unless the trimmed input is
    /// three ASCII letters.
    pub fn parse(raw: &str) -> Result<Self, ConversionError> {
        let trimmed = raw.trim();
        if trimmed.len() == 3 && trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(ConversionError::InvalidCode(raw.to_owned()))
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = ConversionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rates relative to a base currency: `1 base = rates[code] code`.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use wayfarer_core::{CurrencyCode, ExchangeRates};
///
/// let code = |raw: &str| CurrencyCode::parse(raw).expect("valid code");
/// let rates = ExchangeRates {
///     base: code("USD"),
///     date: Some("2024-05-01".to_owned()),
///     rates: BTreeMap::from([(code("EUR"), 0.5), (code("GBP"), 0.25)]),
/// };
/// let pounds = rates.convert(10.0, &code("EUR"), &code("GBP"))?;
/// assert_eq!(pounds, 5.0);
/// # Ok::<(), wayfarer_core::ConversionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExchangeRates {
    /// Currency the rates are quoted against.
    pub base: CurrencyCode,
    /// Publication date, when the provider reports one.
    pub date: Option<String>,
    /// Units of each currency per one unit of `base`.
    pub rates: BTreeMap<CurrencyCode, f64>,
}

impl ExchangeRates {
    /// Rate for `code` against the base; the base itself is always `1.0`.
    ///
    /// # Errors
    ///
    /// Returns an error when the currency is missing or its rate is not a
    /// positive finite number.
    pub fn rate(&self, code: &CurrencyCode) -> Result<f64, ConversionError> {
        if *code == self.base {
            return Ok(1.0);
        }
        let rate = *self
            .rates
            .get(code)
            .ok_or_else(|| ConversionError::UnknownCurrency(code.clone()))?;
        if rate.is_finite() && rate > 0.0 {
            Ok(rate)
        } else {
            Err(ConversionError::InvalidRate {
                code: code.clone(),
                rate,
            })
        }
    }

    /// Convert `amount` of `from` into `to` through the base currency.
    ///
    /// # Errors
    ///
    /// Returns an error for non-finite amounts or unusable rates.
    pub fn convert(
        &self,
        amount: f64,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<f64, ConversionError> {
        if !amount.is_finite() {
            return Err(ConversionError::InvalidAmount(amount));
        }
        let from_rate = self.rate(from)?;
        let to_rate = self.rate(to)?;
        Ok(amount / from_rate * to_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn code(raw: &str) -> CurrencyCode {
        CurrencyCode::parse(raw).expect("valid code")
    }

    #[fixture]
    fn rates() -> ExchangeRates {
        ExchangeRates {
            base: code("USD"),
            date: None,
            rates: BTreeMap::from([
                (code("EUR"), 0.8),
                (code("JPY"), 150.0),
                (code("XXX"), 0.0),
            ]),
        }
    }

    #[rstest]
    fn base_rate_is_one(rates: ExchangeRates) {
        assert_eq!(rates.rate(&code("usd")), Ok(1.0));
    }

    #[rstest]
    fn converts_from_base(rates: ExchangeRates) {
        let euros = rates
            .convert(10.0, &code("USD"), &code("EUR"))
            .expect("convertible");
        assert!((euros - 8.0).abs() < 1e-9, "got {euros}");
    }

    #[rstest]
    fn converts_to_base(rates: ExchangeRates) {
        assert_eq!(rates.convert(300.0, &code("JPY"), &code("USD")), Ok(2.0));
    }

    #[rstest]
    fn converts_across_rates(rates: ExchangeRates) {
        let yen = rates
            .convert(8.0, &code("EUR"), &code("JPY"))
            .expect("convertible");
        assert!((yen - 1500.0).abs() < 1e-9, "got {yen}");
    }

    #[rstest]
    fn unknown_currency_is_reported(rates: ExchangeRates) {
        assert_eq!(
            rates.convert(1.0, &code("USD"), &code("CHF")),
            Err(ConversionError::UnknownCurrency(code("CHF")))
        );
    }

    #[rstest]
    fn zero_rate_is_unusable(rates: ExchangeRates) {
        assert!(matches!(
            rates.convert(1.0, &code("XXX"), &code("USD")),
            Err(ConversionError::InvalidRate { .. })
        ));
    }

    #[rstest]
    fn non_finite_amount_is_rejected(rates: ExchangeRates) {
        assert!(matches!(
            rates.convert(f64::NAN, &code("USD"), &code("EUR")),
            Err(ConversionError::InvalidAmount(_))
        ));
    }

    #[rstest]
    #[case("EU")]
    #[case("EURO")]
    #[case("E1R")]
    fn rejects_malformed_codes(#[case] raw: &str) {
        assert!(CurrencyCode::parse(raw).is_err());
    }
}
