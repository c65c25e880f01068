//! Text parsing helpers built on nom

use aoc_solver::ParseError;
use nom::{
    character::complete::{char, digit1, multispace0, space0, space1},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::separated_list1,
    sequence::{pair, preceded, terminated},
    IResult,
};
use std::str::FromStr;

/// Unsigned decimal number
pub fn unsigned<T: FromStr>(input: &str) -> IResult<&str, T> {
    map_res(digit1, |s: &str| s.parse::<T>())(input)
}

/// Decimal number with an optional leading `-`
pub fn signed<T: FromStr>(input: &str) -> IResult<&str, T> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| s.parse::<T>())(input)
}

/// Space separated numbers, leading spaces allowed
pub fn number_list<T: FromStr>(input: &str) -> IResult<&str, Vec<T>> {
    preceded(space0, separated_list1(space1, signed))(input)
}

/// Non-blank lines, trailing whitespace (including `\r`) removed
pub fn lines(input: &str) -> impl Iterator<Item = &str> {
    input.lines().map(str::trim_end).filter(|l| !l.is_empty())
}

/// Paragraphs separated by blank lines
pub fn blocks(input: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in input.lines().map(str::trim_end) {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Run `parser` over the whole input (trailing whitespace allowed).
///
/// Failures become [`ParseError::InvalidFormat`] naming the line and column
/// where the parser stopped.
pub fn run_parser<'a, T>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, T>,
    input: &'a str,
) -> Result<T, ParseError> {
    match all_consuming(terminated(parser, multispace0))(input) {
        Ok((_, value)) => Ok(value),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
            Err(located_error(input, e.input, e.code))
        }
        Err(nom::Err::Incomplete(_)) => {
            Err(ParseError::MissingData("unexpected end of input".into()))
        }
    }
}

fn located_error(input: &str, rest: &str, code: nom::error::ErrorKind) -> ParseError {
    let offset = input.len() - rest.len();
    let consumed = &input[..offset];
    let line = consumed.matches('\n').count() + 1;
    let line_start = consumed.rfind('\n').map_or(0, |i| i + 1);
    let column = consumed[line_start..].chars().count() + 1;
    let text = input[line_start..].lines().next().unwrap_or("");
    ParseError::InvalidFormat(format!(
        "line {line}, column {column}: unexpected input ({}) in `{text}`",
        code.description()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::bytes::complete::tag;

    #[test]
    fn numbers() {
        assert_eq!(unsigned::<u32>("42 rest"), Ok((" rest", 42)));
        assert_eq!(signed::<i64>("-17,"), Ok((",", -17)));
        assert!(unsigned::<u8>("300").is_err());
        assert_eq!(
            number_list::<i32>("  1 -2   3\n"),
            Ok(("\n", vec![1, -2, 3]))
        );
    }

    #[test]
    fn lines_and_blocks() {
        let text = "a\r\nb\n\n\nc\n";
        assert_eq!(lines(text).collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(blocks(text), vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn run_parser_reports_position() {
        let parse = |input| run_parser(preceded(tag("Time:"), number_list::<u32>), input);
        assert_eq!(parse("Time: 7 15 30\n"), Ok(vec![7, 15, 30]));

        let err = parse("Time: 7 15\nDistance: 9").unwrap_err();
        match err {
            ParseError::InvalidFormat(msg) => {
                assert!(msg.starts_with("line 2, column 1:"), "{msg}");
                assert!(msg.contains("`Distance: 9`"), "{msg}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
