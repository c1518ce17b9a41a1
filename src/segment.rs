use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WheelError};
use crate::geometry::WheelGeometry;

/// A raw prize value as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prize {
    Number(f64),
    Token(String),
}

impl fmt::Display for Prize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prize::Number(value) => write!(f, "{}", value),
            Prize::Token(token) => f.write_str(token),
        }
    }
}

impl FromStr for Prize {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<f64>() {
            Ok(value) if value.is_finite() => Prize::Number(value),
            _ => Prize::Token(s.to_string()),
        })
    }
}

impl From<i32> for Prize {
    fn from(value: i32) -> Self {
        Prize::Number(value as f64)
    }
}

impl From<&str> for Prize {
    fn from(token: &str) -> Self {
        Prize::Token(token.to_string())
    }
}

/// One of the two alternating palette tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Dark,
    Light,
}

impl Tone {
    /// Even indices are dark, odd indices light.
    pub const fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Tone::Dark
        } else {
            Tone::Light
        }
    }

    pub const fn inverse(self) -> Self {
        match self {
            Tone::Dark => Tone::Light,
            Tone::Light => Tone::Dark,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    label: String,
    tone: Tone,
    index: usize,
}

impl Segment {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn wedge_tone(&self) -> Tone {
        self.tone
    }

    /// The outer ring alternates on the same parity, independently of the wedge palette.
    pub fn ring_tone(&self) -> Tone {
        Tone::for_index(self.index)
    }

    /// Labels sit on the ring band, so they take the opposite tone.
    pub fn label_tone(&self) -> Tone {
        self.ring_tone().inverse()
    }
}

/// Ordered, non-empty list of wheel segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Segments {
    items: Vec<Segment>,
}

impl Segments {
    pub fn build(prizes: &[Prize]) -> Result<Self> {
        if prizes.is_empty() {
            return Err(WheelError::EmptyPrizeList);
        }
        let items: Vec<Segment> = prizes
            .iter()
            .enumerate()
            .map(|(index, prize)| Segment {
                label: prize.to_string(),
                tone: Tone::for_index(index),
                index,
            })
            .collect();
        debug!("Built {} wheel segments", items.len());
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no segments; never true for a built list.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.items.iter()
    }

    pub fn geometry(&self) -> WheelGeometry {
        WheelGeometry::new(self.items.len())
    }

    /// The segment sitting under the pointer when the wheel is at `angle`.
    pub fn winner(&self, angle: f64) -> &Segment {
        &self.items[self.geometry().resolve(angle)]
    }
}

impl<'a> IntoIterator for &'a Segments {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prizes(values: &[&str]) -> Vec<Prize> {
        values.iter().map(|v| v.parse().unwrap()).collect()
    }

    #[test]
    fn test_build_produces_one_segment_per_prize() {
        for n in 1..=12 {
            let list: Vec<Prize> = (0..n).map(|i| Prize::from(i * 100)).collect();
            let segments = Segments::build(&list).unwrap();
            assert_eq!(segments.len(), n as usize);
            for (i, seg) in segments.iter().enumerate() {
                assert_eq!(seg.index(), i);
                let expected = if i % 2 == 0 { Tone::Dark } else { Tone::Light };
                assert_eq!(seg.wedge_tone(), expected);
                assert_eq!(seg.ring_tone(), expected);
                assert_eq!(seg.label_tone(), expected.inverse());
            }
        }
    }

    #[test]
    fn test_empty_prize_list_is_rejected() {
        assert!(matches!(Segments::build(&[]), Err(WheelError::EmptyPrizeList)));
    }

    #[test]
    fn test_labels_render_numbers_as_decimal_text() {
        let segments = Segments::build(&[
            Prize::Number(400.0),
            Prize::Number(0.0),
            Prize::Number(2.5),
            Prize::from("x2"),
            Prize::from("ш"),
        ])
        .unwrap();
        let labels: Vec<&str> = segments.iter().map(Segment::label).collect();
        assert_eq!(labels, vec!["400", "0", "2.5", "x2", "ш"]);
    }

    #[test]
    fn test_prize_from_str() {
        assert_eq!(prizes(&["100", " x2 ", "+"]), vec![
            Prize::Number(100.0),
            Prize::from("x2"),
            Prize::from("+"),
        ]);
        assert_eq!("inf".parse::<Prize>().unwrap(), Prize::from("inf"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let list = prizes(&["100", "x2", "300"]);
        assert_eq!(Segments::build(&list).unwrap(), Segments::build(&list).unwrap());
    }

    #[test]
    fn test_single_segment_always_wins() {
        let segments = Segments::build(&prizes(&["jackpot"])).unwrap();
        for step in 0..50 {
            let angle = step as f64 * 0.731 - 3.0;
            assert_eq!(segments.winner(angle).label(), "jackpot");
        }
    }
}
