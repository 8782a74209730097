use serde::de::Error;
use serde::de::{Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{anyhow, Context};

/// `(row, column)`, both zero based.
pub type Coord = (usize, usize);

/// A move targets a cell of a sub-board. Written as `"r,c r,c"`: the sub-board first, then the cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Move {
    pub sub_board: Coord,
    pub cell: Coord,
}

impl Move {
    pub fn new(sub_board: Coord, cell: Coord) -> Self {
        Self { sub_board, cell }
    }
}

fn parse_coord(s: &str) -> anyhow::Result<Coord> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("Expected a coordinate formatted as 'row,col' but got '{}'", s))?;

    let row = row.trim().parse().with_context(|| format!("Invalid row in '{}'", s))?;
    let col = col.trim().parse().with_context(|| format!("Invalid column in '{}'", s))?;

    Ok((row, col))
}

impl FromStr for Move {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();

        let (sub_board, cell) = match (parts.next(), parts.next(), parts.next()) {
            (Some(sub_board), Some(cell), None) => (sub_board, cell),
            _ => return Err(anyhow!("Expected a move formatted as 'r,c r,c' but got '{}'", s)),
        };

        Ok(Move::new(parse_coord(sub_board)?, parse_coord(cell)?))
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{},{} {},{}",
            self.sub_board.0, self.sub_board.1, self.cell.0, self.cell.1
        )
    }
}

impl Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct MoveVisitor {}

impl MoveVisitor {
    fn new() -> Self {
        Self {}
    }
}

impl<'de> Visitor<'de> for MoveVisitor {
    type Value = Move;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("Expecting a string such as '1,1 0,2' naming a sub-board and a cell.")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        v.parse().map_err(|err| E::custom(format!("{:#}", err)))
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(MoveVisitor::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        let mv: Move = "1,2 0,1".parse().unwrap();

        assert_eq!(mv, Move::new((1, 2), (0, 1)));
        assert_eq!(mv.to_string(), "1,2 0,1");
    }

    #[test]
    fn test_parse_rejects_malformed_moves() {
        assert!("1,2".parse::<Move>().is_err());
        assert!("1;2 0,1".parse::<Move>().is_err());
        assert!("a,2 0,1".parse::<Move>().is_err());
        assert!("1,2 0,1 2,2".parse::<Move>().is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let mv = Move::new((2, 0), (1, 1));
        let json = serde_json::to_string(&mv).unwrap();

        assert_eq!(json, "\"2,0 1,1\"");
        assert_eq!(serde_json::from_str::<Move>(&json).unwrap(), mv);
    }
}
