use crate::types::PointKind;

/// Marker colours used on the itinerary map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    Red,
    Blue,
    Green,
    Purple,
    Orange,
}

impl MarkerColor {
    /// Fixed palette; unrecognized point types fall back to blue
    pub fn for_kind(kind: &PointKind) -> Self {
        match kind {
            PointKind::Restaurant => MarkerColor::Red,
            PointKind::Attraction => MarkerColor::Blue,
            PointKind::Hotel => MarkerColor::Green,
            PointKind::Shopping => MarkerColor::Purple,
            PointKind::Transport => MarkerColor::Orange,
            PointKind::Destination => MarkerColor::Red,
            PointKind::Other(_) => MarkerColor::Blue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerColor::Red => "red",
            MarkerColor::Blue => "blue",
            MarkerColor::Green => "green",
            MarkerColor::Purple => "purple",
            MarkerColor::Orange => "orange",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette() {
        assert_eq!(MarkerColor::for_kind(&PointKind::Restaurant), MarkerColor::Red);
        assert_eq!(MarkerColor::for_kind(&PointKind::Hotel).as_str(), "green");
        assert_eq!(MarkerColor::for_kind(&PointKind::Shopping), MarkerColor::Purple);
        assert_eq!(MarkerColor::for_kind(&PointKind::Transport), MarkerColor::Orange);
        assert_eq!(MarkerColor::for_kind(&PointKind::Destination), MarkerColor::Red);
        assert_eq!(
            MarkerColor::for_kind(&PointKind::parse("spaceport")),
            MarkerColor::Blue
        );
    }
}
