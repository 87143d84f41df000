use crate::{Price, UpdateError};

/// Receives new prices for a single followed flight
pub trait PriceUpdateConsumer: Send + Sync {
    fn update_flight(&self, price: Price) -> Result<(), UpdateError>;
}

impl<F> PriceUpdateConsumer for F
where
    F: Fn(Price) -> Result<(), UpdateError> + Send + Sync,
{
    fn update_flight(&self, price: Price) -> Result<(), UpdateError> {
        self(price)
    }
}
