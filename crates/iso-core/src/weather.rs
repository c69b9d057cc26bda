use crate::error::{IsoError, IsoResult};

/// Degrees Fahrenheit to Celsius.
pub fn celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Degrees Celsius to Fahrenheit.
pub fn fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Apparent temperature in °C for `temp` °C at `humidity` percent relative
/// humidity and `sunshine` percent direct sun exposure.
///
/// Only meaningful above 26 °C and 40 % humidity; returns `temp` unchanged
/// outside that range.
pub fn heat_index(temp: f64, humidity: f64, sunshine: f64) -> f64 {
    let f = fahrenheit(temp);
    if f < 80.0 || humidity < 40.0 {
        return temp;
    }
    let h = humidity;
    let sun_adjustment = sunshine / 100.0 * 15.0;
    let index = 16.923 + 0.185212 * f + 5.37941 * h - 0.100254 * f * h
        + 0.00941695 * f.powi(2)
        + 0.00728898 * h.powi(2)
        + 0.000345372 * f.powi(2) * h
        - 0.000814971 * f * h.powi(2)
        + 0.0000102102 * f.powi(2) * h.powi(2)
        - 0.000038646 * f.powi(3)
        + 0.0000291583 * h.powi(3)
        + 0.00000142721 * f.powi(3) * h
        + 0.000000197483 * f * h.powi(3)
        - 0.0000000218429 * f.powi(3) * h.powi(2)
        + 0.000000000843296 * f.powi(2) * h.powi(3)
        - 0.0000000000481975 * f.powi(3) * h.powi(3);
    celsius(sun_adjustment + index)
}

/// Apparent temperature in °C for `temp` °C in a wind of `wind_kmh`.
///
/// Only meaningful at or below 10 °C and above 4.8 km/h; returns `temp`
/// unchanged outside that range.
pub fn wind_chill(temp: f64, wind_kmh: f64) -> f64 {
    if temp > 10.0 || wind_kmh < 4.8 {
        return temp;
    }
    let w = wind_kmh.powf(0.16);
    13.12 + 0.6125 * temp - 11.37 * w + 0.3965 * temp * w
}

/// Temperature in °C at which water condenses out of air at `temp` °C and
/// `humidity` percent relative humidity.
///
/// Valid for 0–60 °C, 1–100 % humidity, and dew points of 0–50 °C.
pub fn dew_point(temp: f64, humidity: f64) -> IsoResult<f64> {
    if temp <= 0.0 || temp >= 60.0 {
        return Err(IsoError::InvalidDewPoint("Temperature out of range.".into()));
    }
    if humidity <= 1.0 || humidity >= 100.0 {
        return Err(IsoError::InvalidDewPoint("Humidity is out of range.".into()));
    }
    const A: f64 = 17.271;
    const B: f64 = 237.7;
    let gamma = A * temp / (B + temp) + (humidity / 100.0).ln();
    let dew = B * gamma / (A - gamma);
    if dew < 0.0 {
        return Err(IsoError::InvalidDewPoint(
            "Computed dew point is too low.".into(),
        ));
    }
    if dew > 50.0 {
        return Err(IsoError::InvalidDewPoint(
            "Computed dew point is too high.".into(),
        ));
    }
    Ok(dew)
}

const WIND_TYPES: [(f64, f64, &str); 20] = [
    (-1.0, 1.0, "calm"),
    (1.0, 4.0, "light air"),
    (4.0, 7.0, "light breeze"),
    (7.0, 12.0, "gentle breeze"),
    (12.0, 19.0, "moderate breeze"),
    (19.0, 24.0, "fresh breeze"),
    (24.0, 31.0, "strong breeze"),
    (31.0, 38.0, "moderate gale"),
    (38.0, 46.0, "fresh gale"),
    (46.0, 54.0, "strong gale"),
    (54.0, 63.0, "whole gale"),
    (63.0, 72.0, "storm"),
    (72.0, 98.0, "hurricane"),
    (98.0, 114.0, "cyclone"),
    (114.0, 131.0, "super cyclone"),
    (131.0, 170.0, "typhoon"),
    (170.0, 200.0, "venusian typhoon"),
    (200.0, 300.0, "jovian typhoon"),
    (300.0, 600.0, "neptunian typhoon"),
    (600.0, 900.0, "saturnian typhoon"),
];

const RAIN_TYPES: [(f64, f64, &str); 6] = [
    (-1.0, 0.25, "very light"),
    (0.25, 1.0, "light"),
    (1.0, 4.0, "moderate"),
    (4.0, 16.0, "heavy"),
    (16.0, 50.0, "very heavy"),
    (50.0, 100.0, "extremely heavy"),
];

fn classify(table: &[(f64, f64, &'static str)], value: f64) -> Option<&'static str> {
    table
        .iter()
        .find(|(min, max, _)| *min < value && value <= *max)
        .map(|(_, _, name)| *name)
}

/// Beaufort-style name for a wind of `mph`.
pub fn wind_type(mph: f64) -> Option<&'static str> {
    classify(&WIND_TYPES, mph)
}

/// Intensity name for rain falling at `mm_per_hour`.
pub fn rain_type(mm_per_hour: f64) -> Option<&'static str> {
    classify(&RAIN_TYPES, mm_per_hour)
}

/// Intensity name for snow falling at `cm_per_hour`; ten centimetres of snow
/// hold about one centimetre of water, so the rain scale applies.
pub fn snow_type(cm_per_hour: f64) -> Option<&'static str> {
    rain_type(cm_per_hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_conversions() {
        assert_eq!(celsius(98.6).round(), 37.0);
        assert_eq!(celsius(-40.0).round(), -40.0);
        assert_eq!(celsius(-459.67).round(), -273.0);
        assert_eq!(fahrenheit(100.0).round(), 212.0);
        assert_eq!(fahrenheit(-273.0).round(), -459.0);
    }

    #[test]
    fn heat_index_table() {
        assert_eq!(heat_index(20.0, 90.0, 0.0), 20.0);
        assert_eq!(heat_index(32.0, 30.0, 0.0), 32.0);
        assert_eq!(heat_index(32.0, 40.0, 0.0).round(), 33.0);
        assert_eq!(heat_index(32.0, 60.0, 0.0).round(), 37.0);
        assert_eq!(heat_index(42.0, 40.0, 0.0).round(), 54.0);
    }

    #[test]
    fn wind_chill_table() {
        assert_eq!(wind_chill(15.0, 30.0), 15.0);
        assert_eq!(wind_chill(0.0, 6.0).round(), -2.0);
        assert_eq!(wind_chill(0.0, 70.0).round(), -9.0);
        assert_eq!(wind_chill(-60.0, 6.0).round(), -70.0);
    }

    #[test]
    fn dew_point_values() {
        assert_eq!(dew_point(32.0, 25.0).map(f64::round), Ok(9.0));
        assert_eq!(dew_point(32.0, 50.0).map(f64::round), Ok(20.0));
    }

    #[test]
    fn dew_point_rejections() {
        let message = |t, h| match dew_point(t, h) {
            Err(IsoError::InvalidDewPoint(msg)) => msg,
            other => panic!("expected an invalid dew point, got {other:?}"),
        };
        assert_eq!(message(0.0, 99.0), "Temperature out of range.");
        assert_eq!(message(100.0, 99.0), "Temperature out of range.");
        assert_eq!(message(32.0, 1.0), "Humidity is out of range.");
        assert_eq!(message(32.0, 100.0), "Humidity is out of range.");
        assert_eq!(message(59.0, 2.0), "Computed dew point is too low.");
        assert_eq!(message(59.0, 65.0), "Computed dew point is too high.");
    }

    #[test]
    fn wind_and_rain_types() {
        assert_eq!(wind_type(0.0), Some("calm"));
        assert_eq!(wind_type(4.0), Some("light air"));
        assert_eq!(wind_type(75.0), Some("hurricane"));
        assert_eq!(wind_type(1000.0), None);
        assert_eq!(rain_type(0.25), Some("very light"));
        assert_eq!(snow_type(20.0), Some("very heavy"));
    }
}
