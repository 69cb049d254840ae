//! URL query-string state: which capture is shown and where the view is.
//!
//! The page keeps `capture`, `x`, `y`, `width` and `height` in its query
//! string so a link reproduces the view. Unknown parameters are preserved
//! in place.

use crate::viewport::Rect;
use tracing::warn;
use url::form_urlencoded;

pub const CAPTURE_PARAM: &str = "capture";

/// Ordered `application/x-www-form-urlencoded` parameter list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string with or without the leading `?`. Empty segments
    /// are skipped; a segment without `=` has an empty value.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Replace the first `name` in place and drop later duplicates, or
    /// append when absent.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == name) {
            Some(at) => {
                self.pairs[at].1 = value;
                let mut seen = 0;
                self.pairs.retain(|(k, _)| {
                    if k != name {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.pairs.push((name.to_string(), value)),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `?`-prefixed serialization; empty string when there are no pairs.
    pub fn to_query_string(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish();
        format!("?{body}")
    }

    /// Numeric parameter; `None` when absent or not a finite number.
    pub fn number(&self, name: &str) -> Option<f64> {
        let raw = self.get(name)?;
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                warn!(param = name, value = raw, "ignoring non-numeric query parameter");
                None
            }
        }
    }

    /// View bounds: each present component overrides the matching one of
    /// `fallback` on its own.
    pub fn bounds(&self, fallback: Rect) -> Rect {
        Rect {
            x: self.number("x").unwrap_or(fallback.x),
            y: self.number("y").unwrap_or(fallback.y),
            width: self
                .number("width")
                .filter(|w| *w > 0.0)
                .unwrap_or(fallback.width),
            height: self
                .number("height")
                .filter(|h| *h > 0.0)
                .unwrap_or(fallback.height),
        }
    }

    /// Store `bounds` rounded to whole pixels. Non-finite components are
    /// left as they were.
    pub fn set_bounds(&mut self, bounds: Rect) {
        let r = bounds.rounded();
        for (name, v) in [("x", r.x), ("y", r.y), ("width", r.width), ("height", r.height)] {
            if v.is_finite() {
                self.set(name, (v as i64).to_string());
            } else {
                warn!(param = name, value = v, "not persisting non-finite bound");
            }
        }
    }

    pub fn capture(&self) -> Option<&str> {
        self.get(CAPTURE_PARAM).filter(|s| !s.is_empty())
    }

    pub fn set_capture(&mut self, unique_id: &str) {
        self.set(CAPTURE_PARAM, unique_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::HOME_BOUNDS;

    #[test]
    fn parse_get_and_preserve_order() {
        let q = QueryParams::parse("?foo=1&capture=abc&&bar");
        assert_eq!(q.len(), 3);
        assert_eq!(q.get("foo"), Some("1"));
        assert_eq!(q.capture(), Some("abc"));
        assert_eq!(q.get("bar"), Some(""));
        assert_eq!(q.to_query_string(), "?foo=1&capture=abc&bar=");
    }

    #[test]
    fn set_replaces_in_place_and_dedups() {
        let mut q = QueryParams::parse("a=1&x=2&a=3");
        q.set("a", "9");
        assert_eq!(q.to_query_string(), "?a=9&x=2");
        q.set("b", "new");
        assert_eq!(q.to_query_string(), "?a=9&x=2&b=new");
    }

    #[test]
    fn encoding_round_trips_reserved_characters() {
        let mut q = QueryParams::new();
        q.set("name", "Sea of Lava & more=100%");
        let s = q.to_query_string();
        assert_eq!(s, "?name=Sea+of+Lava+%26+more%3D100%25");
        assert_eq!(QueryParams::parse(&s).get("name"), Some("Sea of Lava & more=100%"));
    }

    #[test]
    fn bad_escape_is_kept_literally() {
        let q = QueryParams::parse("a=%zz&b=%4");
        assert_eq!(q.get("a"), Some("%zz"));
        assert_eq!(q.get("b"), Some("%4"));
    }

    #[test]
    fn bounds_override_per_component() {
        let q = QueryParams::parse("x=10&width=300&y=abc&height=-5");
        let b = q.bounds(HOME_BOUNDS);
        assert_eq!(b, Rect::new(10.0, HOME_BOUNDS.y, 300.0, HOME_BOUNDS.height));
        assert_eq!(QueryParams::new().bounds(HOME_BOUNDS), HOME_BOUNDS);
    }

    #[test]
    fn set_bounds_rounds() {
        let mut q = QueryParams::parse("capture=c1");
        q.set_bounds(Rect::new(-150.4, -0.2, 1023.7, 512.0));
        assert_eq!(q.to_query_string(), "?capture=c1&x=-150&y=0&width=1024&height=512");
    }

    /// Invariant: a non-finite component keeps its previous value instead of
    /// being written as a coordinate.
    #[test]
    fn set_bounds_skips_non_finite() {
        let mut q = QueryParams::parse("x=5&y=6");
        q.set_bounds(Rect::new(f64::NAN, 7.2, f64::INFINITY, 100.0));
        assert_eq!(q.get("x"), Some("5"));
        assert_eq!(q.get("y"), Some("7"));
        assert_eq!(q.get("width"), None);
        assert_eq!(q.to_query_string(), "?x=5&y=7&height=100");
    }

    #[test]
    fn empty_capture_counts_as_absent() {
        assert_eq!(QueryParams::parse("capture=").capture(), None);
        assert_eq!(QueryParams::new().to_query_string(), "");
    }
}
