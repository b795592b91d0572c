//! FILENAME: grid-render/src/format.rs
//! PURPOSE: Display text of rendered values under a cell's number format.
//! CONTEXT: Only numbers are affected by a number format; text and booleans
//! always display as-is. Dates are spreadsheet serial day numbers
//! (1 = 1900-01-01).

use model::{NumberFormat, Value};

/// Display text of `value` under an optional number format.
pub fn display_value(value: &Value, format: Option<&NumberFormat>) -> String {
    match (value, format) {
        (Value::Number(n), Some(format)) => format_number(*n, format),
        _ => value.display(),
    }
}

pub fn format_number(value: f64, format: &NumberFormat) -> String {
    match format {
        NumberFormat::General => Value::Number(value).display(),
        NumberFormat::Number {
            decimal_places,
            use_thousands_separator,
        } => format_decimal(value, *decimal_places, *use_thousands_separator),
        NumberFormat::Percentage { decimal_places } => {
            format!("{:.prec$}%", value * 100.0, prec = *decimal_places as usize)
        }
        NumberFormat::Date { format } => format_date(value, format),
        NumberFormat::Custom { format } => format_pattern(value, format),
    }
}

fn format_decimal(value: f64, decimal_places: u8, grouped: bool) -> String {
    let rounded = format!("{:.prec$}", value, prec = decimal_places as usize);
    if grouped {
        group_thousands(&rounded)
    } else {
        rounded
    }
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(number.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// "0.00", "#,##0" style patterns: decimal places and grouping only.
fn format_pattern(value: f64, pattern: &str) -> String {
    let decimal_places = pattern
        .split_once('.')
        .map(|(_, decimals)| decimals.chars().take_while(|c| *c == '0' || *c == '#').count())
        .unwrap_or(0);
    format_decimal(value, decimal_places as u8, pattern.contains(','))
}

fn format_date(serial: f64, pattern: &str) -> String {
    let Some((year, month, day)) = serial_to_date(serial.floor() as i64) else {
        return Value::Number(serial).display();
    };
    pattern
        .replace("YYYY", &format!("{:04}", year))
        .replace("YY", &format!("{:02}", year % 100))
        .replace("MM", &format!("{:02}", month))
        .replace("DD", &format!("{:02}", day))
}

/// (year, month, day) of a serial day number. Serial 60 is the phantom
/// 1900-02-29 spreadsheets carry and maps to 1900-02-28.
fn serial_to_date(serial: i64) -> Option<(i32, u32, u32)> {
    if serial < 1 {
        return None;
    }
    let mut remaining = if serial >= 60 { serial - 1 } else { serial };
    let mut year = 1900;
    loop {
        let length = if is_leap_year(year) { 366 } else { 365 };
        if remaining <= length {
            break;
        }
        remaining -= length;
        year += 1;
    }

    let february = if is_leap_year(year) { 29 } else { 28 };
    let months = [31, february, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    for (month, length) in months.iter().enumerate() {
        if remaining <= *length {
            return Some((year, month as u32 + 1, remaining as u32));
        }
        remaining -= length;
    }
    None
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_decimal() {
        let format = NumberFormat::Number {
            decimal_places: 2,
            use_thousands_separator: true,
        };
        assert_eq!(format_number(1234567.891, &format), "1,234,567.89");
        assert_eq!(format_number(-1234.5, &format), "-1,234.50");
        assert_eq!(format_number(12.0, &format), "12.00");
    }

    #[test]
    fn test_percentage() {
        let format = NumberFormat::Percentage { decimal_places: 1 };
        assert_eq!(format_number(0.256, &format), "25.6%");
    }

    #[test]
    fn test_date_serial() {
        let format = NumberFormat::Date {
            format: "YYYY-MM-DD".to_string(),
        };
        assert_eq!(format_number(1.0, &format), "1900-01-01");
        assert_eq!(format_number(45292.0, &format), "2024-01-01");
        assert_eq!(format_number(0.0, &format), "0");
    }

    #[test]
    fn test_custom_pattern() {
        let format = NumberFormat::Custom {
            format: "#,##0.0".to_string(),
        };
        assert_eq!(format_number(9876.54, &format), "9,876.5");
    }

    #[test]
    fn test_text_ignores_number_format() {
        let format = NumberFormat::Percentage { decimal_places: 0 };
        assert_eq!(display_value(&Value::text("n/a"), Some(&format)), "n/a");
        assert_eq!(display_value(&Value::Number(3.0), None), "3");
    }
}
