use std::fmt;

/// Reward points are whole units; there is no fractional part.
pub type Points = i64;

/// Parse a spend amount given on the command line.
/// Example: "300" -> 300, " 42 " -> 42, "+7" -> 7
///
/// Negative values and anything that is not a whole number are rejected.
pub fn parse_amount(input: &str) -> Result<Points, ParsePointsError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParsePointsError::Empty);
    }

    let points: Points = input
        .parse()
        .map_err(|_| ParsePointsError::InvalidFormat(input.to_string()))?;

    if points < 0 {
        return Err(ParsePointsError::Negative(points));
    }
    Ok(points)
}

/// Parse a points value from a ledger row.
/// Unlike `parse_amount`, negative grants are accepted as-is.
pub fn parse_points(input: &str) -> Result<Points, ParsePointsError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParsePointsError::Empty);
    }
    input
        .parse()
        .map_err(|_| ParsePointsError::InvalidFormat(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsePointsError {
    Empty,
    InvalidFormat(String),
    Negative(Points),
}

impl fmt::Display for ParsePointsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsePointsError::Empty => write!(f, "no points value given"),
            ParsePointsError::InvalidFormat(raw) => {
                write!(f, "'{}' is not a whole number of points", raw)
            }
            ParsePointsError::Negative(points) => {
                write!(f, "cannot spend a negative amount ({})", points)
            }
        }
    }
}

impl std::error::Error for ParsePointsError {}
