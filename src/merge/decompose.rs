//! Component decomposition
//!
//! Turns composite glyphs into plain outlines so that copying one glyph never
//! drags in the glyphs it references.

use crate::merge::StoreError;
use kurbo::{Affine, Point};
use norad::{AffineTransform, Component, Contour, Layer};
use std::collections::HashMap;

/// Outlines and references of one glyph, captured before decomposition
struct GlyphParts {
    contours: Vec<Contour>,
    components: Vec<Component>,
}

/// Decompose every composite glyph in `layer`.
///
/// Nested components are resolved all the way down, with each level's
/// transform applied. Returns the number of glyphs that changed.
pub fn decompose_layer(layer: &mut Layer) -> Result<usize, StoreError> {
    let parts: HashMap<String, GlyphParts> = layer
        .iter()
        .map(|glyph| {
            (
                glyph.name().to_string(),
                GlyphParts {
                    contours: glyph.contours.clone(),
                    components: glyph.components.clone(),
                },
            )
        })
        .collect();

    let mut composites: Vec<&String> = parts
        .iter()
        .filter(|(_, glyph)| !glyph.components.is_empty())
        .map(|(name, _)| name)
        .collect();
    composites.sort();

    let mut decomposed = Vec::with_capacity(composites.len());
    for name in composites {
        let mut stack = Vec::new();
        decomposed.push((name, flatten(name, &parts, &mut stack)?));
    }

    let changed = decomposed.len();
    for (name, contours) in decomposed {
        if let Some(glyph) = layer.get_glyph_mut(name) {
            glyph.contours = contours;
            glyph.components.clear();
        }
    }
    Ok(changed)
}

/// All contours of `name` in its own coordinate space
fn flatten(
    name: &str,
    parts: &HashMap<String, GlyphParts>,
    stack: &mut Vec<String>,
) -> Result<Vec<Contour>, StoreError> {
    if stack.iter().any(|visited| visited == name) {
        return Err(StoreError::ComponentCycle(name.to_string()));
    }
    let Some(glyph) = parts.get(name) else {
        let referrer = stack.last().cloned().unwrap_or_default();
        return Err(StoreError::MissingComponentBase {
            glyph: referrer,
            base: name.to_string(),
        });
    };

    stack.push(name.to_string());
    let mut contours = glyph.contours.clone();
    for component in &glyph.components {
        let affine = to_affine(&component.transform);
        let base = flatten(&component.base.to_string(), parts, stack)?;
        contours.extend(base.into_iter().map(|contour| transform_contour(contour, affine)));
    }
    stack.pop();

    Ok(contours)
}

fn to_affine(transform: &AffineTransform) -> Affine {
    Affine::new([
        transform.x_scale,
        transform.xy_scale,
        transform.yx_scale,
        transform.y_scale,
        transform.x_offset,
        transform.y_offset,
    ])
}

fn transform_contour(mut contour: Contour, affine: Affine) -> Contour {
    for point in &mut contour.points {
        let moved = affine * Point::new(point.x, point.y);
        point.x = moved.x;
        point.y = moved.y;
    }
    contour
}

#[cfg(test)]
mod tests {
    use super::*;
    use norad::{ContourPoint, Font, Glyph, PointType};

    fn square(x: f64, y: f64, size: f64) -> Contour {
        let points = [(x, y), (x + size, y), (x + size, y + size), (x, y + size)]
            .into_iter()
            .map(|(px, py)| ContourPoint::new(px, py, PointType::Line, false, None, None))
            .collect();
        Contour::new(points, None)
    }

    fn translate(dx: f64, dy: f64) -> AffineTransform {
        AffineTransform {
            x_scale: 1.0,
            xy_scale: 0.0,
            yx_scale: 0.0,
            y_scale: 1.0,
            x_offset: dx,
            y_offset: dy,
        }
    }

    fn component(base: &str, transform: AffineTransform) -> Component {
        Component::new(base.parse().expect("valid glyph name"), transform, None)
    }

    fn first_point(glyph: &Glyph, contour: usize) -> (f64, f64) {
        let point = &glyph.contours[contour].points[0];
        (point.x, point.y)
    }

    #[test]
    fn test_nested_components_are_flattened_with_transforms() {
        let mut font = Font::new();
        let layer = font.default_layer_mut();

        let mut dot = Glyph::new("dot");
        dot.contours.push(square(0.0, 0.0, 10.0));
        layer.insert_glyph(dot);

        let mut colon = Glyph::new("colon");
        colon.components.push(component("dot", translate(0.0, 0.0)));
        colon.components.push(component("dot", translate(0.0, 100.0)));
        layer.insert_glyph(colon);

        let mut shifted = Glyph::new("colon.shifted");
        shifted.contours.push(square(500.0, 500.0, 1.0));
        shifted.components.push(component("colon", translate(50.0, 0.0)));
        layer.insert_glyph(shifted);

        let changed = decompose_layer(layer).expect("decompose");
        assert_eq!(changed, 2);

        let colon = layer.get_glyph("colon").expect("colon");
        assert!(colon.components.is_empty());
        assert_eq!(colon.contours.len(), 2);
        assert_eq!(first_point(colon, 1), (0.0, 100.0));

        let shifted = layer.get_glyph("colon.shifted").expect("shifted");
        assert!(shifted.components.is_empty());
        assert_eq!(shifted.contours.len(), 3);
        assert_eq!(first_point(shifted, 0), (500.0, 500.0));
        assert_eq!(first_point(shifted, 1), (50.0, 0.0));
        assert_eq!(first_point(shifted, 2), (50.0, 100.0));

        let dot = layer.get_glyph("dot").expect("dot");
        assert_eq!(dot.contours.len(), 1);
    }

    #[test]
    fn test_scaled_component() {
        let mut font = Font::new();
        let layer = font.default_layer_mut();

        let mut dot = Glyph::new("dot");
        dot.contours.push(square(10.0, 20.0, 10.0));
        layer.insert_glyph(dot);

        let mut big = Glyph::new("bigdot");
        big.components.push(component(
            "dot",
            AffineTransform {
                x_scale: 2.0,
                xy_scale: 0.0,
                yx_scale: 0.0,
                y_scale: 3.0,
                x_offset: 1.0,
                y_offset: 0.0,
            },
        ));
        layer.insert_glyph(big);

        decompose_layer(layer).expect("decompose");
        let big = layer.get_glyph("bigdot").expect("bigdot");
        assert_eq!(first_point(big, 0), (21.0, 60.0));
    }

    #[test]
    fn test_missing_base_is_an_error() {
        let mut font = Font::new();
        let layer = font.default_layer_mut();
        let mut broken = Glyph::new("broken");
        broken.components.push(component("ghost", translate(0.0, 0.0)));
        layer.insert_glyph(broken);

        match decompose_layer(layer) {
            Err(StoreError::MissingComponentBase { glyph, base }) => {
                assert_eq!(glyph, "broken");
                assert_eq!(base, "ghost");
            }
            other => panic!("expected missing base, got {other:?}"),
        }
    }

    #[test]
    fn test_component_cycle_is_an_error() {
        let mut font = Font::new();
        let layer = font.default_layer_mut();
        let mut a = Glyph::new("a");
        a.components.push(component("b", translate(0.0, 0.0)));
        layer.insert_glyph(a);
        let mut b = Glyph::new("b");
        b.components.push(component("a", translate(0.0, 0.0)));
        layer.insert_glyph(b);

        assert!(matches!(
            decompose_layer(layer),
            Err(StoreError::ComponentCycle(_))
        ));
    }

    #[test]
    fn test_plain_layer_is_untouched() {
        let mut font = Font::new();
        let layer = font.default_layer_mut();
        let mut dot = Glyph::new("dot");
        dot.contours.push(square(0.0, 0.0, 10.0));
        layer.insert_glyph(dot);

        assert_eq!(decompose_layer(layer).expect("decompose"), 0);
    }
}
