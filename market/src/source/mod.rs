pub mod coingecko;
pub mod errors;

pub use coingecko::CoinGeckoSource;
pub use errors::FetchError;

use std::sync::Arc;

use async_trait::async_trait;

/// Where the engine gets one price per tick.
///
/// Implementations must be callable repeatedly; every error is treated as
/// transient by the caller.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self) -> Result<f64, FetchError>;
}

#[async_trait]
impl<T: PriceSource + ?Sized> PriceSource for Arc<T> {
    async fn fetch(&self) -> Result<f64, FetchError> {
        (**self).fetch().await
    }
}

#[async_trait]
impl<T: PriceSource + ?Sized> PriceSource for Box<T> {
    async fn fetch(&self) -> Result<f64, FetchError> {
        (**self).fetch().await
    }
}

/// Prices entering the window must be finite and strictly positive.
pub fn validate_price(price: f64) -> Result<f64, FetchError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(FetchError::InvalidPrice(price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_and_non_finite() {
        assert_eq!(validate_price(101.5).ok(), Some(101.5));
        assert!(matches!(validate_price(0.0), Err(FetchError::InvalidPrice(_))));
        assert!(matches!(validate_price(-3.0), Err(FetchError::InvalidPrice(_))));
        assert!(matches!(validate_price(f64::NAN), Err(FetchError::InvalidPrice(_))));
        assert!(matches!(
            validate_price(f64::INFINITY),
            Err(FetchError::InvalidPrice(_))
        ));
    }
}
