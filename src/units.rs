use std::fmt;
use uom::si::f64::Time;
use uom::si::time::{microsecond, millisecond, minute, nanosecond, second};
use winnow::ascii::{float, space0};
use winnow::combinator::{alt, delimited, opt};
use winnow::error::ContextError;
use winnow::Parser;

// `µs` is normalized to `us`.
fn unit(input: &mut &str) -> winnow::Result<Option<&'static str>> {
    opt(alt((
        "min".value("min"),
        "ms".value("ms"),
        "us".value("us"),
        "µs".value("us"),
        "ns".value("ns"),
        "s".value("s"),
    )))
    .parse_next(input)
}

fn quantity(input: &mut &str) -> winnow::Result<Time> {
    let value: f64 = delimited(space0, float, space0).parse_next(input)?;
    let unit = unit.parse_next(input)?;
    let _ = space0.parse_next(input)?;

    let time = match unit {
        Some("min") => Time::new::<minute>(value),
        Some("ms") => Time::new::<millisecond>(value),
        Some("us") => Time::new::<microsecond>(value),
        Some("ns") => Time::new::<nanosecond>(value),
        _ => Time::new::<second>(value),
    };

    Ok(time)
}

/// Parse a [`Time`] from a number followed by an optional unit.
///
/// The accepted units are `min`, `s`, `ms`, `us` (or `µs`) and `ns`. A bare
/// number is interpreted in seconds.
///
/// # Examples
///
/// ```
/// use geiger::units::parse_time;
/// use uom::si::f64::Time;
/// use uom::si::time::{microsecond, second};
///
/// assert_eq!(parse_time("3")?, Time::new::<second>(3.0));
/// assert_eq!(parse_time("410us")?, Time::new::<microsecond>(410.0));
/// assert!(parse_time("3 parsecs").is_err());
/// # Ok::<(), geiger::units::ParseTimeError>(())
/// ```
pub fn parse_time(input: &str) -> Result<Time, ParseTimeError> {
    quantity.parse(input).map_err(ParseTimeError::from_parse)
}

/// The error type returned when parsing a [`Time`] fails.
#[derive(Debug)]
pub struct ParseTimeError {
    input: String,
    span: std::ops::Range<usize>,
}

impl ParseTimeError {
    fn from_parse(error: winnow::error::ParseError<&str, ContextError>) -> Self {
        let input = error.input().to_string();
        let span = error.char_span();
        Self { input, span }
    }
}

impl fmt::Display for ParseTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = annotate_snippets::Level::Error
            .title("invalid time, expected a number with an optional unit (min, s, ms, us, ns)")
            .snippet(
                annotate_snippets::Snippet::source(&self.input)
                    .fold(true)
                    .annotation(annotate_snippets::Level::Error.span(self.span.clone())),
            );
        let renderer = annotate_snippets::Renderer::plain();
        let rendered = renderer.render(message);
        rendered.fmt(f)
    }
}

impl std::error::Error for ParseTimeError {}
