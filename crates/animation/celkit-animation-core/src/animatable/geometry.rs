//! Vector geometry and hand-drawn strokes.
//!
//! Lists blend positionally: the i-th element of one key morphs into the i-th
//! element of the next. When counts differ the extra elements of the longer
//! key are carried through untouched.

use serde::{Deserialize, Serialize};

use super::{mix_positional, Animatable, Color, Keys, Mix, Point};
use crate::ids::StableId;

/// Polyline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub points: Vec<Point>,
}

impl Line {
    pub fn new(points: impl Into<Vec<Point>>) -> Self {
        Self {
            points: points.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of segment lengths.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance(&pair[1]))
            .sum()
    }
}

impl Animatable for Line {
    fn mix(mix: Mix<'_>, keys: Keys<'_, Self>) -> Self {
        match keys.project(|line| Some(&line.points)) {
            Some(points) => Line {
                points: mix_positional(mix, points),
            },
            None => keys.f1.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub id: StableId,
    pub lines: Vec<Line>,
    pub closed: bool,
}

impl Geometry {
    pub fn new(lines: Vec<Line>, closed: bool) -> Self {
        Self {
            id: StableId::new(),
            lines,
            closed,
        }
    }
}

impl Animatable for Geometry {
    fn stable_id(&self) -> Option<StableId> {
        Some(self.id)
    }

    fn mix(mix: Mix<'_>, keys: Keys<'_, Self>) -> Self {
        match mix.progress() {
            p if p <= 0.0 => return keys.f1.clone(),
            p if p >= 1.0 => return keys.f2.clone(),
            _ => {}
        }
        let lines = keys
            .project(|g| Some(&g.lines))
            .map(|lines| mix_positional(mix, lines))
            .unwrap_or_else(|| keys.f1.lines.clone());
        Geometry {
            id: StableId::new(),
            lines,
            closed: *mix.pick(&keys.f1.closed, &keys.f2.closed),
        }
    }
}

/// One brush stroke of a drawing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub line: Line,
    pub width: f64,
    pub color: Color,
}

impl Animatable for Stroke {
    fn mix(mix: Mix<'_>, keys: Keys<'_, Self>) -> Self {
        let line = keys
            .project(|s| Some(&s.line))
            .map(|k| Line::mix(mix, k))
            .unwrap_or_else(|| keys.f1.line.clone());
        let color = keys
            .project(|s| Some(&s.color))
            .map(|k| Color::mix(mix, k))
            .unwrap_or(keys.f1.color);
        Stroke {
            line,
            width: mix.component(&keys, |s| s.width).max(0.0),
            color,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: StableId,
    pub strokes: Vec<Stroke>,
}

impl Drawing {
    pub fn new(strokes: Vec<Stroke>) -> Self {
        Self {
            id: StableId::new(),
            strokes,
        }
    }
}

impl Animatable for Drawing {
    fn stable_id(&self) -> Option<StableId> {
        Some(self.id)
    }

    fn mix(mix: Mix<'_>, keys: Keys<'_, Self>) -> Self {
        match mix.progress() {
            p if p <= 0.0 => return keys.f1.clone(),
            p if p >= 1.0 => return keys.f2.clone(),
            _ => {}
        }
        let strokes = keys
            .project(|d| Some(&d.strokes))
            .map(|strokes| mix_positional(mix, strokes))
            .unwrap_or_else(|| keys.f1.strokes.clone());
        Drawing {
            id: StableId::new(),
            strokes,
        }
    }
}
