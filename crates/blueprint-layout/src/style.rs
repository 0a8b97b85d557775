//! Style properties
//!
//! Maps React-style property names onto a `taffy::Style`. Numbers are
//! points, strings ending in `%` are percentages, `"auto"` is auto.
//! `undefined`/`null` resets a property to its default.

use blueprint_view::Var;
use taffy::{
    AlignContent, AlignItems, Dimension, Display, FlexDirection, FlexWrap,
    JustifyContent, LengthPercentage, LengthPercentageAuto, Overflow, Position, Style,
};

/// Style every layout node starts from: a column flexbox
pub fn default_style() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        ..Default::default()
    }
}

/// Apply a named property to `style`.
///
/// Returns `false` when the name is not a layout property or the value
/// cannot be interpreted; the style is left untouched in that case.
pub fn apply_style_property(style: &mut Style, name: &str, value: &Var) -> bool {
    let defaults = default_style();

    match name {
        // Dimensions
        "width" => set(&mut style.size.width, dimension(value)),
        "height" => set(&mut style.size.height, dimension(value)),
        "minWidth" => set(&mut style.min_size.width, dimension(value)),
        "minHeight" => set(&mut style.min_size.height, dimension(value)),
        "maxWidth" => set(&mut style.max_size.width, dimension(value)),
        "maxHeight" => set(&mut style.max_size.height, dimension(value)),
        "aspectRatio" => {
            if value.is_void() {
                style.aspect_ratio = None;
                true
            } else {
                set(&mut style.aspect_ratio, value.as_f32().map(Some))
            }
        }

        // Flex item
        "flex" => match number_or(value, 0.0) {
            Some(flex) => {
                apply_flex_shorthand(style, flex);
                true
            }
            None => false,
        },
        "flexGrow" => set(&mut style.flex_grow, number_or(value, defaults.flex_grow)),
        "flexShrink" => set(&mut style.flex_shrink, number_or(value, defaults.flex_shrink)),
        "flexBasis" => set(&mut style.flex_basis, dimension(value)),
        "alignSelf" => {
            if value.as_str() == Some("auto") {
                style.align_self = None;
                true
            } else {
                set(&mut style.align_self, keyword(value, align_items))
            }
        }

        // Flex container
        "flexDirection" => set(
            &mut style.flex_direction,
            keyword(value, flex_direction).map(|d| d.unwrap_or(defaults.flex_direction)),
        ),
        "flexWrap" => set(
            &mut style.flex_wrap,
            keyword(value, flex_wrap).map(|w| w.unwrap_or(defaults.flex_wrap)),
        ),
        "justifyContent" => set(&mut style.justify_content, keyword(value, justify_content)),
        "alignItems" => set(&mut style.align_items, keyword(value, align_items)),
        "alignContent" => set(&mut style.align_content, keyword(value, align_content)),
        "gap" => match length_percentage(value) {
            Some(gap) => {
                style.gap.width = gap;
                style.gap.height = gap;
                true
            }
            None => false,
        },
        "rowGap" => set(&mut style.gap.height, length_percentage(value)),
        "columnGap" => set(&mut style.gap.width, length_percentage(value)),

        // Positioning
        "position" => set(
            &mut style.position,
            keyword(value, position).map(|p| p.unwrap_or(defaults.position)),
        ),
        "top" => set(&mut style.inset.top, length_percentage_auto(value)),
        "right" => set(&mut style.inset.right, length_percentage_auto(value)),
        "bottom" => set(&mut style.inset.bottom, length_percentage_auto(value)),
        "left" => set(&mut style.inset.left, length_percentage_auto(value)),
        "display" => set(
            &mut style.display,
            keyword(value, display).map(|d| d.unwrap_or(defaults.display)),
        ),
        "overflow" => match keyword(value, overflow) {
            Some(o) => {
                let o = o.unwrap_or(Overflow::Visible);
                style.overflow.x = o;
                style.overflow.y = o;
                true
            }
            None => false,
        },

        // Margin
        "margin" => edges(value, length_percentage_auto, |v| {
            style.margin.top = v;
            style.margin.right = v;
            style.margin.bottom = v;
            style.margin.left = v;
        }),
        "marginHorizontal" => edges(value, length_percentage_auto, |v| {
            style.margin.left = v;
            style.margin.right = v;
        }),
        "marginVertical" => edges(value, length_percentage_auto, |v| {
            style.margin.top = v;
            style.margin.bottom = v;
        }),
        "marginTop" => set(&mut style.margin.top, length_percentage_auto(value)),
        "marginRight" => set(&mut style.margin.right, length_percentage_auto(value)),
        "marginBottom" => set(&mut style.margin.bottom, length_percentage_auto(value)),
        "marginLeft" => set(&mut style.margin.left, length_percentage_auto(value)),

        // Padding
        "padding" => edges(value, length_percentage, |v| {
            style.padding.top = v;
            style.padding.right = v;
            style.padding.bottom = v;
            style.padding.left = v;
        }),
        "paddingHorizontal" => edges(value, length_percentage, |v| {
            style.padding.left = v;
            style.padding.right = v;
        }),
        "paddingVertical" => edges(value, length_percentage, |v| {
            style.padding.top = v;
            style.padding.bottom = v;
        }),
        "paddingTop" => set(&mut style.padding.top, length_percentage(value)),
        "paddingRight" => set(&mut style.padding.right, length_percentage(value)),
        "paddingBottom" => set(&mut style.padding.bottom, length_percentage(value)),
        "paddingLeft" => set(&mut style.padding.left, length_percentage(value)),

        // Border widths
        "borderWidth" => edges(value, length_percentage, |v| {
            style.border.top = v;
            style.border.right = v;
            style.border.bottom = v;
            style.border.left = v;
        }),
        "borderTopWidth" => set(&mut style.border.top, length_percentage(value)),
        "borderRightWidth" => set(&mut style.border.right, length_percentage(value)),
        "borderBottomWidth" => set(&mut style.border.bottom, length_percentage(value)),
        "borderLeftWidth" => set(&mut style.border.left, length_percentage(value)),

        _ => false,
    }
}

fn set<T>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

fn edges<T: Copy>(value: &Var, parse: fn(&Var) -> Option<T>, mut assign: impl FnMut(T)) -> bool {
    match parse(value) {
        Some(v) => {
            assign(v);
            true
        }
        None => false,
    }
}

/// `flex: n` the way React Native reads it
fn apply_flex_shorthand(style: &mut Style, flex: f32) {
    if flex > 0.0 {
        style.flex_grow = flex;
        style.flex_shrink = 1.0;
        style.flex_basis = Dimension::Length(0.0);
    } else if flex < 0.0 {
        style.flex_grow = 0.0;
        style.flex_shrink = -flex;
        style.flex_basis = Dimension::Auto;
    } else {
        style.flex_grow = 0.0;
        style.flex_shrink = 0.0;
        style.flex_basis = Dimension::Auto;
    }
}

fn number_or(value: &Var, default: f32) -> Option<f32> {
    if value.is_void() {
        return Some(default);
    }
    value.as_f32()
}

/// A length in points or a percentage string
enum Length {
    Points(f32),
    Percent(f32),
    Auto,
}

fn length(value: &Var) -> Option<Length> {
    match value {
        Var::Undefined | Var::Empty => Some(Length::Auto),
        Var::Number(n) if n.is_finite() => Some(Length::Points(*n as f32)),
        Var::String(s) => {
            let s = s.trim();
            if s == "auto" {
                Some(Length::Auto)
            } else if let Some(pct) = s.strip_suffix('%') {
                pct.trim().parse::<f32>().ok().map(|p| Length::Percent(p / 100.0))
            } else {
                s.strip_suffix("px").unwrap_or(s).trim().parse::<f32>().ok().map(Length::Points)
            }
        }
        _ => None,
    }
}

fn dimension(value: &Var) -> Option<Dimension> {
    length(value).map(|l| match l {
        Length::Points(p) => Dimension::Length(p),
        Length::Percent(p) => Dimension::Percent(p),
        Length::Auto => Dimension::Auto,
    })
}

fn length_percentage_auto(value: &Var) -> Option<LengthPercentageAuto> {
    length(value).map(|l| match l {
        Length::Points(p) => LengthPercentageAuto::Length(p),
        Length::Percent(p) => LengthPercentageAuto::Percent(p),
        Length::Auto => LengthPercentageAuto::Auto,
    })
}

fn length_percentage(value: &Var) -> Option<LengthPercentage> {
    if value.is_void() {
        return Some(LengthPercentage::Length(0.0));
    }
    length(value).and_then(|l| match l {
        Length::Points(p) => Some(LengthPercentage::Length(p)),
        Length::Percent(p) => Some(LengthPercentage::Percent(p)),
        Length::Auto => None,
    })
}

/// Parse a keyword property. `Some(None)` means "reset to default".
fn keyword<T>(value: &Var, parse: fn(&str) -> Option<T>) -> Option<Option<T>> {
    match value {
        Var::Undefined | Var::Empty => Some(None),
        Var::String(s) => parse(s.trim()).map(Some),
        _ => None,
    }
}

fn flex_direction(s: &str) -> Option<FlexDirection> {
    Some(match s {
        "row" => FlexDirection::Row,
        "column" => FlexDirection::Column,
        "row-reverse" => FlexDirection::RowReverse,
        "column-reverse" => FlexDirection::ColumnReverse,
        _ => return None,
    })
}

fn flex_wrap(s: &str) -> Option<FlexWrap> {
    Some(match s {
        "nowrap" | "no-wrap" => FlexWrap::NoWrap,
        "wrap" => FlexWrap::Wrap,
        "wrap-reverse" => FlexWrap::WrapReverse,
        _ => return None,
    })
}

fn justify_content(s: &str) -> Option<JustifyContent> {
    Some(match s {
        "flex-start" => JustifyContent::FlexStart,
        "flex-end" => JustifyContent::FlexEnd,
        "center" => JustifyContent::Center,
        "space-between" => JustifyContent::SpaceBetween,
        "space-around" => JustifyContent::SpaceAround,
        "space-evenly" => JustifyContent::SpaceEvenly,
        _ => return None,
    })
}

fn align_items(s: &str) -> Option<AlignItems> {
    Some(match s {
        "flex-start" => AlignItems::FlexStart,
        "flex-end" => AlignItems::FlexEnd,
        "center" => AlignItems::Center,
        "baseline" => AlignItems::Baseline,
        "stretch" => AlignItems::Stretch,
        _ => return None,
    })
}

fn align_content(s: &str) -> Option<AlignContent> {
    Some(match s {
        "flex-start" => AlignContent::FlexStart,
        "flex-end" => AlignContent::FlexEnd,
        "center" => AlignContent::Center,
        "stretch" => AlignContent::Stretch,
        "space-between" => AlignContent::SpaceBetween,
        "space-around" => AlignContent::SpaceAround,
        _ => return None,
    })
}

fn position(s: &str) -> Option<Position> {
    Some(match s {
        "relative" => Position::Relative,
        "absolute" => Position::Absolute,
        _ => return None,
    })
}

fn display(s: &str) -> Option<Display> {
    Some(match s {
        "flex" => Display::Flex,
        "none" => Display::None,
        _ => return None,
    })
}

fn overflow(s: &str) -> Option<Overflow> {
    Some(match s {
        "visible" => Overflow::Visible,
        "hidden" => Overflow::Hidden,
        "scroll" => Overflow::Scroll,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_column() {
        assert_eq!(default_style().flex_direction, FlexDirection::Column);
    }

    #[test]
    fn test_points_and_percent() {
        let mut style = default_style();
        assert!(apply_style_property(&mut style, "width", &Var::from(120)));
        assert!(apply_style_property(&mut style, "height", &Var::from("50%")));
        assert_eq!(style.size.width, Dimension::Length(120.0));
        assert_eq!(style.size.height, Dimension::Percent(0.5));
    }

    #[test]
    fn test_reset_with_undefined() {
        let mut style = default_style();
        apply_style_property(&mut style, "width", &Var::from(10));
        assert!(apply_style_property(&mut style, "width", &Var::Undefined));
        assert_eq!(style.size.width, Dimension::Auto);
    }

    #[test]
    fn test_keywords() {
        let mut style = default_style();
        assert!(apply_style_property(&mut style, "flexDirection", &Var::from("row")));
        assert!(apply_style_property(&mut style, "justifyContent", &Var::from("center")));
        assert_eq!(style.flex_direction, FlexDirection::Row);
        assert_eq!(style.justify_content, Some(JustifyContent::Center));

        assert!(!apply_style_property(&mut style, "flexDirection", &Var::from("diagonal")));
        assert_eq!(style.flex_direction, FlexDirection::Row);
    }

    #[test]
    fn test_padding_shorthand() {
        let mut style = default_style();
        assert!(apply_style_property(&mut style, "padding", &Var::from(8)));
        assert_eq!(style.padding.left, LengthPercentage::Length(8.0));
        assert_eq!(style.padding.bottom, LengthPercentage::Length(8.0));
        assert!(!apply_style_property(&mut style, "padding", &Var::from("auto")));
    }

    #[test]
    fn test_flex_shorthand() {
        let mut style = default_style();
        assert!(apply_style_property(&mut style, "flex", &Var::from(2)));
        assert_eq!(style.flex_grow, 2.0);
        assert_eq!(style.flex_basis, Dimension::Length(0.0));
    }

    #[test]
    fn test_unknown_property_ignored() {
        let mut style = default_style();
        assert!(!apply_style_property(&mut style, "backgroundColor", &Var::from("red")));
        assert!(!apply_style_property(&mut style, "width", &Var::from(true)));
    }
}
