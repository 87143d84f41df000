use std::io::{self, Write};
use std::sync::Mutex;

use schema::{DisplayError, Flight, FlightDisplaySink};

/// Writes one line per displayed flight, e.g.
/// `Flight from Paris to Miami via London: price is now 97`
pub struct ConsoleDisplay<W> {
    out: Mutex<W>,
}

impl ConsoleDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Human-readable summary of a flight and its current price
pub fn render(flight: &Flight) -> String {
    match &flight.via {
        None => format!(
            "Flight from {} to {}: price is now {}",
            flight.from.name,
            flight.to.name,
            flight.price()
        ),
        Some(via) => format!(
            "Flight from {} to {} via {}: price is now {}",
            flight.from.name,
            flight.to.name,
            via.name,
            flight.price()
        ),
    }
}

impl<W: Write + Send> FlightDisplaySink for ConsoleDisplay<W> {
    fn display_flight(&self, flight: &Flight) -> Result<(), DisplayError> {
        let line = render(flight);
        let mut out = self
            .out
            .lock()
            .map_err(|_| DisplayError::Unavailable("output lock poisoned".to_string()))?;

        writeln!(out, "{}", line)?;
        out.flush()?;
        log::trace!("displayed flight {}", flight.id);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use schema::{City, FlightId, Price};

    use super::*;

    fn flight(id: &str, via: Option<City>) -> Flight {
        Flight::new(
            FlightId::new(id),
            City::new("Pa", "Paris"),
            via,
            City::new("Mi", "Miami"),
        )
    }

    #[test]
    fn test_renders_current_price() {
        let display = ConsoleDisplay::new(Vec::new());
        let direct = flight("PaMi", None);
        let multi_leg = flight("PaLoMi", Some(City::new("Lo", "London")));

        display.display_flight(&direct).expect("display");
        direct.update_price(Price(97));
        multi_leg.update_price(Price(111));
        display.display_flight(&direct).expect("display");
        display.display_flight(&multi_leg).expect("display");

        let output = String::from_utf8(display.into_inner()).expect("utf8");
        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            vec![
                "Flight from Paris to Miami: price is now 100",
                "Flight from Paris to Miami: price is now 97",
                "Flight from Paris to Miami via London: price is now 111",
            ]
        );
    }

    #[test]
    fn test_write_failures_are_reported() {
        struct Closed;

        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let display = ConsoleDisplay::new(Closed);

        assert!(matches!(
            display.display_flight(&flight("PaMi", None)),
            Err(DisplayError::Io(_))
        ));
    }
}
