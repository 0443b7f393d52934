//! Cell materials: fill, stroke and line width.

use serde::{Deserialize, Serialize};

use super::{Animatable, Color, Keys, Mix};
use crate::ids::StableId;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: StableId,
    pub fill: Color,
    pub stroke: Color,
    pub line_width: f64,
}

impl Material {
    pub fn new(fill: Color, stroke: Color, line_width: f64) -> Self {
        Self {
            id: StableId::new(),
            fill,
            stroke,
            line_width,
        }
    }
}

impl Animatable for Material {
    fn stable_id(&self) -> Option<StableId> {
        Some(self.id)
    }

    fn mix(mix: Mix<'_>, keys: Keys<'_, Self>) -> Self {
        // Endpoints keep their identity so caches keyed on it still hit.
        match mix.progress() {
            p if p <= 0.0 => return *keys.f1,
            p if p >= 1.0 => return *keys.f2,
            _ => {}
        }
        let fill = keys.project(|m| Some(&m.fill)).map(|k| Color::mix(mix, k));
        let stroke = keys.project(|m| Some(&m.stroke)).map(|k| Color::mix(mix, k));
        Material {
            id: StableId::new(),
            fill: fill.unwrap_or(keys.f1.fill),
            stroke: stroke.unwrap_or(keys.f1.stroke),
            line_width: mix.component(&keys, |m| m.line_width).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn red() -> Material {
        Material::new(Color::rgba(1.0, 0.0, 0.0, 1.0), Color::BLACK, 1.0)
    }

    fn blue() -> Material {
        Material::new(Color::rgba(0.0, 0.0, 1.0, 1.0), Color::BLACK, 3.0)
    }

    #[test]
    fn linear_endpoints_keep_identity() {
        let (a, b) = (red(), blue());
        assert_eq!(Material::linear(&a, &b, 0.0), a);
        assert_eq!(Material::linear(&a, &b, 1.0), b);
    }

    #[test]
    fn midpoint_blends_fields_with_fresh_id() {
        let (a, b) = (red(), blue());
        let mid = Material::linear(&a, &b, 0.5);
        assert_ne!(mid.id, a.id);
        assert_ne!(mid.id, b.id);
        assert_eq!(mid.fill, Color::rgba(0.5, 0.0, 0.5, 1.0));
        assert_eq!(mid.line_width, 2.0);
    }

    #[test]
    fn shared_id_short_circuits_every_blend() {
        let a = red();
        let mut b = a;
        // Same identity, different fields: the left key must win untouched.
        b.line_width = 50.0;
        for t in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(Material::linear(&a, &b, t), a);
            assert_eq!(
                Material::monospline(&blue(), &a, &b, &blue(), &even_interior(t)),
                a
            );
            assert_eq!(Material::first_monospline(&a, &b, &blue(), &even_first(t)), a);
            assert_eq!(Material::end_monospline(&blue(), &a, &b, &even_end(t)), a);
        }
    }
}
