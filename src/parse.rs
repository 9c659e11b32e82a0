//! Reader for the textual puzzle format.
//!
//! # Expected Format
//!  - A shape section, made of blocks that each start with a header line
//!    ending in `:` (such as `4:`), followed by rows of `#` (filled) and `.`
//!    (empty) cells.
//!  - A region section, which starts at the first line containing an `x`.
//!    Each line has the form `<width>x<height>: <count_0> <count_1> ...`,
//!    where `count_i` is how many copies of the `i`th shape the region needs.
//!  - Blank lines, and lines starting with `[`, are skipped in the shape
//!    section. In the region section every line without an `x` is skipped.
//!
//! ```text
//! 0:
//! ###
//! ##.
//! ##.
//!
//! 4x4: 2
//! ```

use crate::{packing::RegionRequest, Coordinate, Shape};
use std::{num::ParseIntError, str::FromStr};
use thiserror::Error;

/// A parsed puzzle: the shape catalog, and the regions to pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    /// Normalized shapes, indexed by their position in the input.
    pub shapes: Vec<Shape>,
    /// Region requests, in input order.
    pub regions: Vec<RegionRequest>,
}

/// Failure to read the puzzle input. Line and column numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A shape row contained something other than `#` or `.`.
    #[error("unexpected character '{found}' in shape at line {line}, column {column}")]
    UnexpectedCharacter {
        /// Line of the offending character.
        line: usize,
        /// Column of the offending character.
        column: usize,
        /// The offending character.
        found: char,
    },
    /// A shape block had no filled cells.
    #[error("shape starting at line {line} has no filled cells")]
    EmptyShape {
        /// Line of the shape header.
        line: usize,
    },
    /// A region line was not of the form `<width>x<height>: <counts>`.
    #[error("expected '<width>x<height>: <counts>' at line {line}, got '{text}'")]
    MalformedRegion {
        /// Line of the region request.
        line: usize,
        /// The offending text.
        text: String,
    },
    /// A dimension or count was not a non-negative integer.
    #[error("could not parse '{text}' as a number at line {line}")]
    InvalidNumber {
        /// Line of the region request.
        line: usize,
        /// The offending text.
        text: String,
        /// Underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },
}

/// Parse a complete puzzle input.
///
/// # Errors
///
/// Returns an error describing the first malformed shape row or region line.
pub fn parse_puzzle(input: &str) -> Result<Puzzle, ParseError> {
    let lines: Vec<_> = input.lines().collect();
    let separator = lines
        .iter()
        .position(|line| line.contains('x'))
        .unwrap_or(lines.len());
    let (shape_lines, region_lines) = lines.split_at(separator);

    let shapes = parse_shapes(shape_lines)?;
    let regions = region_lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains('x'))
        .map(|(index, line)| parse_region(line, separator + index + 1))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "Parsed [{}] shapes and [{}] regions.",
        shapes.len(),
        regions.len()
    );

    Ok(Puzzle { shapes, regions })
}

fn parse_shapes(lines: &[&str]) -> Result<Vec<Shape>, ParseError> {
    struct Block {
        header_line: usize,
        points: Vec<Coordinate>,
        next_row: usize,
    }

    fn finish(block: Block) -> Result<Shape, ParseError> {
        Shape::try_from_points(block.points)
            .map(|shape| shape.normalize())
            .ok_or(ParseError::EmptyShape {
                line: block.header_line,
            })
    }

    let mut shapes = Vec::new();
    let mut current: Option<Block> = None;

    for (index, line) in lines.iter().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('[') {
            continue;
        }

        if trimmed.ends_with(':') {
            if let Some(block) = current.take() {
                shapes.push(finish(block)?);
            }
            current = Some(Block {
                header_line: line_number,
                points: Vec::new(),
                next_row: 0,
            });
        } else {
            // Rows before any header start an unnamed shape.
            let block = current.get_or_insert_with(|| Block {
                header_line: line_number,
                points: Vec::new(),
                next_row: 0,
            });
            parse_shape_row(trimmed, block.next_row, line_number, &mut block.points)?;
            block.next_row += 1;
        }
    }

    if let Some(block) = current {
        shapes.push(finish(block)?);
    }

    Ok(shapes)
}

/// Append the filled cells of one row of `#`/`.` characters at height `y`.
pub(crate) fn parse_shape_row(
    row: &str,
    y: usize,
    line_number: usize,
    points: &mut Vec<Coordinate>,
) -> Result<(), ParseError> {
    for (x, c) in row.chars().enumerate() {
        match c {
            '#' => points.push(Coordinate::new(x as i32, y as i32)),
            '.' => {}
            found => {
                return Err(ParseError::UnexpectedCharacter {
                    line: line_number,
                    column: x + 1,
                    found,
                })
            }
        }
    }

    Ok(())
}

/// Parse a single `<width>x<height>: <counts>` line.
///
/// # Errors
///
/// Returns an error if the line does not have that shape, or if any field is
/// not a non-negative integer.
pub fn parse_region(line: &str, line_number: usize) -> Result<RegionRequest, ParseError> {
    let malformed = || ParseError::MalformedRegion {
        line: line_number,
        text: line.to_string(),
    };
    let number = |text: &str| {
        text.trim()
            .parse::<usize>()
            .map_err(|source| ParseError::InvalidNumber {
                line: line_number,
                text: text.trim().to_string(),
                source,
            })
    };

    let (dimensions, counts) = line.trim().split_once(':').ok_or_else(malformed)?;
    let (width, height) = dimensions.split_once('x').ok_or_else(malformed)?;

    let width = number(width)?;
    let height = number(height)?;
    let counts = counts
        .split_whitespace()
        .map(number)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RegionRequest::new(width, height, counts))
}

impl FromStr for Puzzle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_puzzle(s)
    }
}

impl FromStr for RegionRequest {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_region(s, 1)
    }
}
