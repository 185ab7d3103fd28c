use core::fmt::Display;

#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

/// Relative motion direction. Left/right drive pan, up/down drive tilt.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl Direction {
    /// Case-insensitive; anything other than the four names is rejected.
    pub fn from_str(dirstr: &str) -> Option<Self> {
        match dirstr {
            s if s.eq_ignore_ascii_case("left") => Some(Direction::Left),
            s if s.eq_ignore_ascii_case("right") => Some(Direction::Right),
            s if s.eq_ignore_ascii_case("up") => Some(Direction::Up),
            s if s.eq_ignore_ascii_case("down") => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Absolute move. An axis left as `None` keeps its current angle.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveRequest {
    pub pan: Option<i32>,
    pub tilt: Option<i32>,
    #[cfg_attr(feature = "std", serde(default))]
    pub smooth: bool,
}

/// Relative move by `step` degrees, or by the configured step when absent.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRequest {
    pub direction: Direction,
    pub step: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parses_any_case() {
        assert_eq!(Direction::from_str("LEFT"), Some(Direction::Left));
        assert_eq!(Direction::from_str("Up"), Some(Direction::Up));
        assert_eq!(Direction::from_str("sideways"), None);
        assert_eq!(Direction::from_str(""), None);
    }

    #[test]
    fn direction_names_round_trip() {
        for dir in [
            Direction::Left,
            Direction::Right,
            Direction::Up,
            Direction::Down,
        ] {
            assert_eq!(Direction::from_str(dir.to_str()), Some(dir));
        }
    }

    #[cfg(feature = "std")]
    #[test]
    fn move_request_defaults_smooth_to_false() {
        let req: MoveRequest = serde_json::from_str(r#"{"pan": 45}"#).unwrap();
        assert_eq!(
            req,
            MoveRequest {
                pan: Some(45),
                tilt: None,
                smooth: false
            }
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn step_request_reads_lowercase_direction() {
        let req: StepRequest = serde_json::from_str(r#"{"direction": "down", "step": 5}"#).unwrap();
        assert_eq!(req.direction, Direction::Down);
        assert_eq!(req.step, Some(5));
    }
}
