//! Validation of the three user-supplied orbit parameters.
//!
//! [`parse_parameter`] decides whether a single answer is acceptable;
//! [`prompt_parameter`] owns the retry loop and works on any reader/writer
//! pair so it can be driven from tests.

use std::fmt;
use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow};
use thiserror::Error;
use tracing::debug;

use crate::config::{DefaultParameters, degrees_to_radians};
use crate::messages;
use crate::orbit::OrbitParameters;

/// Answer that selects the compiled-in default.
pub const DEFAULT_TOKEN: &str = "def";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Distance,
    Speed,
    Angle,
}

impl ParameterKind {
    pub const ALL: [ParameterKind; 3] = [
        ParameterKind::Distance,
        ParameterKind::Speed,
        ParameterKind::Angle,
    ];

    /// Default value in the unit the user types (metres, m/s, degrees).
    pub fn default_input(self, defaults: &DefaultParameters) -> f64 {
        match self {
            ParameterKind::Distance => defaults.distance,
            ParameterKind::Speed => defaults.speed,
            ParameterKind::Angle => defaults.angle_deg,
        }
    }

    fn in_domain(self, value: f64) -> bool {
        match self {
            ParameterKind::Distance => value > 0.0,
            ParameterKind::Speed => value >= 0.0,
            ParameterKind::Angle => (0.0..=180.0).contains(&value),
        }
    }

    /// Converts a value typed by the user into SI units.
    fn to_si(self, value: f64) -> f64 {
        match self {
            ParameterKind::Angle => degrees_to_radians(value),
            ParameterKind::Distance | ParameterKind::Speed => value,
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterKind::Distance => "distance",
            ParameterKind::Speed => "speed",
            ParameterKind::Angle => "angle",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("infinity is not accepted")]
    InfinityMarker,

    #[error("{0:?} is not a number")]
    NotANumber(String),

    #[error("value must be finite")]
    NonFinite,

    #[error("{kind} {value} is out of range")]
    OutOfRange { kind: ParameterKind, value: f64 },
}

/// Validates one answer and returns the parameter in SI units.
pub fn parse_parameter(
    raw: &str,
    kind: ParameterKind,
    defaults: &DefaultParameters,
) -> Result<f64, InputError> {
    let answer = raw.trim_end_matches(['\r', '\n']);
    if answer == DEFAULT_TOKEN {
        return Ok(kind.to_si(kind.default_input(defaults)));
    }
    if answer.contains("inf") {
        return Err(InputError::InfinityMarker);
    }
    let value: f64 = answer
        .trim()
        .parse()
        .map_err(|_| InputError::NotANumber(answer.to_string()))?;
    if !value.is_finite() {
        return Err(InputError::NonFinite);
    }
    if !kind.in_domain(value) {
        return Err(InputError::OutOfRange { kind, value });
    }
    Ok(kind.to_si(value))
}

/// Prompts until a valid answer is read. Fails only when the input ends or
/// the console cannot be written to.
pub fn prompt_parameter<R, W>(
    kind: ParameterKind,
    defaults: &DefaultParameters,
    reader: &mut R,
    writer: &mut W,
) -> Result<f64>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(writer, "{}", messages::prompt(kind, defaults))?;
        writer.flush().context("failed to flush console")?;

        let mut line = String::new();
        let bytes = reader
            .read_line(&mut line)
            .context("failed to read console input")?;
        if bytes == 0 {
            return Err(anyhow!("input ended before {kind} was entered"));
        }

        match parse_parameter(&line, kind, defaults) {
            Ok(value) => return Ok(value),
            Err(err) => {
                debug!(%kind, error = %err, "rejected input");
                writeln!(writer, "{}", messages::input_rejected(&err))?;
            }
        }
    }
}

/// Reads distance, speed and angle in that order.
pub fn read_parameters<R, W>(
    defaults: &DefaultParameters,
    reader: &mut R,
    writer: &mut W,
) -> Result<OrbitParameters>
where
    R: BufRead,
    W: Write,
{
    let r0 = prompt_parameter(ParameterKind::Distance, defaults, reader, writer)?;
    let v0 = prompt_parameter(ParameterKind::Speed, defaults, reader, writer)?;
    let alpha = prompt_parameter(ParameterKind::Angle, defaults, reader, writer)?;
    Ok(OrbitParameters::new(r0, v0, alpha)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};
    use std::io::Cursor;

    fn defaults() -> DefaultParameters {
        DefaultParameters {
            distance: 1e12,
            speed: 4000.0,
            angle_deg: 90.0,
        }
    }

    #[test]
    fn default_token_selects_compiled_default() {
        let d = defaults();
        assert_eq!(parse_parameter("def\n", ParameterKind::Distance, &d), Ok(1e12));
        assert_eq!(parse_parameter("def", ParameterKind::Speed, &d), Ok(4000.0));
        assert_eq!(parse_parameter("def\r\n", ParameterKind::Angle, &d), Ok(FRAC_PI_2));
    }

    #[test]
    fn default_token_is_exact() {
        let d = defaults();
        assert!(matches!(
            parse_parameter(" def", ParameterKind::Speed, &d),
            Err(InputError::NotANumber(_))
        ));
        assert!(parse_parameter("DEF", ParameterKind::Speed, &d).is_err());
    }

    #[test]
    fn infinity_is_rejected_before_parsing() {
        let d = defaults();
        for raw in ["inf", "-inf", "infinity", "1inf"] {
            assert_eq!(
                parse_parameter(raw, ParameterKind::Distance, &d),
                Err(InputError::InfinityMarker),
                "{raw}"
            );
        }
        assert_eq!(
            parse_parameter("INF", ParameterKind::Distance, &d),
            Err(InputError::NonFinite)
        );
        assert_eq!(
            parse_parameter("NaN", ParameterKind::Distance, &d),
            Err(InputError::NonFinite)
        );
    }

    #[test]
    fn numbers_are_trimmed_and_converted() {
        let d = defaults();
        assert_eq!(parse_parameter(" 1.5e11 \n", ParameterKind::Distance, &d), Ok(1.5e11));
        assert_eq!(parse_parameter("180", ParameterKind::Angle, &d), Ok(PI));
        assert_eq!(parse_parameter("0", ParameterKind::Speed, &d), Ok(0.0));
        assert!(matches!(
            parse_parameter("abc", ParameterKind::Speed, &d),
            Err(InputError::NotANumber(_))
        ));
        assert!(matches!(
            parse_parameter("", ParameterKind::Speed, &d),
            Err(InputError::NotANumber(_))
        ));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let d = defaults();
        assert!(matches!(
            parse_parameter("0", ParameterKind::Distance, &d),
            Err(InputError::OutOfRange { kind: ParameterKind::Distance, .. })
        ));
        assert!(matches!(
            parse_parameter("-1", ParameterKind::Speed, &d),
            Err(InputError::OutOfRange { kind: ParameterKind::Speed, .. })
        ));
        assert!(matches!(
            parse_parameter("181", ParameterKind::Angle, &d),
            Err(InputError::OutOfRange { kind: ParameterKind::Angle, .. })
        ));
    }

    #[test]
    fn prompt_retries_until_valid() {
        let d = defaults();
        let mut reader = Cursor::new("abc\ninf\n2.5e11\n");
        let mut console = Vec::new();
        let value = prompt_parameter(ParameterKind::Distance, &d, &mut reader, &mut console)
            .expect("third answer is valid");
        assert_eq!(value, 2.5e11);
        let text = String::from_utf8(console).unwrap();
        assert_eq!(text.matches(messages::INVALID_INPUT).count(), 2);
        assert_eq!(
            text.matches(&messages::prompt(ParameterKind::Distance, &d)).count(),
            3
        );
    }

    #[test]
    fn prompt_fails_on_end_of_input() {
        let d = defaults();
        let mut reader = Cursor::new("oops\n");
        let mut console = Vec::new();
        let err = prompt_parameter(ParameterKind::Speed, &d, &mut reader, &mut console)
            .unwrap_err();
        assert!(err.to_string().contains("input ended"));
    }

    #[test]
    fn defaults_match_explicit_values() {
        let d = defaults();
        let mut console = Vec::new();
        let by_token =
            read_parameters(&d, &mut Cursor::new("def\ndef\ndef\n"), &mut console).unwrap();
        let explicit =
            read_parameters(&d, &mut Cursor::new("1e12\n4000\n90\n"), &mut console).unwrap();
        assert_eq!(by_token, explicit);
        assert_eq!(explicit.alpha(), FRAC_PI_2);
    }
}
