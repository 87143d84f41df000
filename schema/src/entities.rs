use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use itertools::Itertools;

use crate::StoreError;

/// Opaque key naming a flight, built from two-character city codes
/// (e.g. `PaAt`, or `PaLoMi` for a flight from Paris to Miami via London)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlightId(String);

impl FlightId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the identifier into the city codes of its legs
    pub fn route(&self) -> Result<Route, StoreError> {
        if !self.0.is_ascii() {
            return Err(StoreError::MalformedId(self.0.clone()));
        }

        let codes = self
            .0
            .chars()
            .chunks(2)
            .into_iter()
            .map(|chunk| chunk.collect::<String>())
            .collect::<Vec<_>>();

        if codes.iter().any(|code| code.chars().count() != 2) {
            return Err(StoreError::MalformedId(self.0.clone()));
        }

        match <[String; 2]>::try_from(codes) {
            Ok([from, to]) => Ok(Route {
                from,
                via: None,
                to,
            }),
            Err(codes) => match <[String; 3]>::try_from(codes) {
                Ok([from, via, to]) => Ok(Route {
                    from,
                    via: Some(via),
                    to,
                }),
                Err(_) => Err(StoreError::MalformedId(self.0.clone())),
            },
        }
    }
}

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FlightId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// City codes making up a `FlightId`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub from: String,
    pub via: Option<String>,
    pub to: String,
}

/// A ticket price. Prices are replaced wholesale, never adjusted in place.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Price(pub u32);

impl Price {
    pub fn amount(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct City {
    /// Two-character code used in flight identifiers
    pub code: String,
    pub name: String,
}

impl City {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

/// A tracked flight. The route is fixed at creation; the price is replaced
/// by the price-update path and read by everyone else.
#[derive(Debug)]
pub struct Flight {
    pub id: FlightId,
    pub from: City,
    /// Intermediate stop for multi-leg flights
    pub via: Option<City>,
    pub to: City,
    price: AtomicU32,
}

impl Flight {
    pub const INITIAL_PRICE: Price = Price(100);

    pub fn new(id: FlightId, from: City, via: Option<City>, to: City) -> Self {
        Self {
            id,
            from,
            via,
            to,
            price: AtomicU32::new(Self::INITIAL_PRICE.0),
        }
    }

    pub fn price(&self) -> Price {
        Price(self.price.load(Ordering::Acquire))
    }

    pub fn update_price(&self, price: Price) {
        self.price.store(price.0, Ordering::Release);
    }
}
