//! Route patterns: `status/{statusKey}`, `media/status/{statusKey}?selectedIndex`,
//! `https://twitter.com/search?q={keyword}`.
//!
//! A pattern is an optional `scheme://`, then `/`-separated segments (literal
//! text or a `{name}` capture), then an optional `?` list of declared query
//! keys. A declared key may bind its value to a capture with `key={name}`.
//!
//! Matching is exact on segment count. Literals compare byte-for-byte against
//! the raw candidate segment, captures must be non-empty and are
//! percent-decoded. Every query pair in the candidate is kept, declared or not.

use std::fmt;

use smallvec::SmallVec;

use crate::codec;
use crate::error::RouteError;
use crate::params::RouteParams;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Capture(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct QueryKey {
    key: String,
    capture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    raw: String,
    scheme: Option<String>,
    segments: SmallVec<[Segment; 4]>,
    query: SmallVec<[QueryKey; 2]>,
}

fn capture_name(s: &str) -> Option<&str> {
    let name = s.strip_prefix('{')?.strip_suffix('}')?;
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then_some(name)
}

fn claim<'a>(names: &mut SmallVec<[&'a str; 4]>, name: &'a str, raw: &str) -> Result<(), RouteError> {
    if names.contains(&name) {
        return Err(RouteError::DuplicateCapture {
            pattern: raw.to_string(),
            name: name.to_string(),
        });
    }
    names.push(name);
    Ok(())
}

impl RouteTemplate {
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let raw = pattern.trim();
        if raw.is_empty() {
            return Err(RouteError::EmptyPattern);
        }
        let invalid = |segment: &str| RouteError::InvalidSegment {
            pattern: raw.to_string(),
            segment: segment.to_string(),
        };

        let (scheme, rest) = codec::split_scheme(raw);
        let (path, query) = match rest.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (rest, None),
        };

        let mut names: SmallVec<[&str; 4]> = SmallVec::new();

        let mut segments = SmallVec::new();
        for part in codec::split_path(path) {
            if part.is_empty() {
                return Err(invalid(part));
            }
            if part.contains(['{', '}']) {
                let name = capture_name(part).ok_or_else(|| invalid(part))?;
                claim(&mut names, name, raw)?;
                segments.push(Segment::Capture(name.to_string()));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }
        if segments.is_empty() {
            return Err(RouteError::EmptyPattern);
        }

        let mut declared = SmallVec::new();
        for pair in query.into_iter().flat_map(|q| q.split('&')) {
            if pair.is_empty() {
                continue;
            }
            let key = match pair.split_once('=') {
                None if !pair.contains(['{', '}']) => QueryKey {
                    key: pair.to_string(),
                    capture: None,
                },
                Some((k, v)) if !k.is_empty() && !k.contains(['{', '}']) => {
                    let name = capture_name(v).ok_or_else(|| invalid(pair))?;
                    claim(&mut names, name, raw)?;
                    QueryKey {
                        key: k.to_string(),
                        capture: Some(name.to_string()),
                    }
                }
                _ => return Err(invalid(pair)),
            };
            declared.push(key);
        }

        Ok(Self {
            raw: raw.to_string(),
            scheme: scheme.map(str::to_string),
            segments,
            query: declared,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Names of all captures, path first, then query-bound ones.
    pub fn captures(&self) -> impl Iterator<Item = &str> {
        let path = self.segments.iter().filter_map(|s| match s {
            Segment::Capture(n) => Some(n.as_str()),
            Segment::Literal(_) => None,
        });
        path.chain(self.query.iter().filter_map(|q| q.capture.as_deref()))
    }

    /// Declared query keys, in pattern order.
    pub fn query_keys(&self) -> impl Iterator<Item = &str> {
        self.query.iter().map(|q| q.key.as_str())
    }

    /// `None` means "did not match"; a match without captures is
    /// `Some(RouteParams::default())`.
    pub fn matches(&self, candidate: &str) -> Option<RouteParams> {
        let (scheme, rest) = codec::split_scheme(candidate.trim());
        match (self.scheme.as_deref(), scheme) {
            (None, None) => {}
            (Some(a), Some(b)) if a.eq_ignore_ascii_case(b) => {}
            _ => return None,
        }

        let rest = rest.split_once('#').map_or(rest, |(r, _)| r);
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));

        let parts: SmallVec<[&str; 8]> = codec::split_path(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Capture(_) if part.is_empty() => return None,
                Segment::Capture(name) => params.insert_path(name.as_str(), codec::decode_segment(part)),
            }
        }

        for (k, v) in codec::parse_query(query) {
            params.insert_query(k, v);
        }
        // Bound query keys become captures, so aliases and canonical routes
        // carry the same value under the same name.
        for declared in &self.query {
            if let Some(name) = &declared.capture
                && let Some(value) = params.take_query(&declared.key)
            {
                params.insert_path(name.as_str(), value);
            }
        }
        Some(params)
    }

    /// Canonical route string for `params`.
    ///
    /// Path captures are percent-encoded in place. Query output lists bound or
    /// declared keys first in pattern order, then the remaining query values,
    /// then any path value this pattern has no capture for, each group sorted.
    ///
    /// A route has one value per query key, so when `params` holds a path
    /// value and a query value under a name this pattern has no capture for,
    /// the query value is written and the path value is dropped.
    pub fn build(&self, params: &RouteParams) -> Result<String, RouteError> {
        let missing = |name: &str| RouteError::MissingParameter {
            pattern: self.raw.clone(),
            name: name.to_string(),
        };

        let mut out = String::with_capacity(self.raw.len());
        if let Some(scheme) = &self.scheme {
            out.push_str(scheme);
            out.push_str("://");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('/');
            }
            match segment {
                Segment::Literal(lit) => out.push_str(lit),
                Segment::Capture(name) => {
                    let value = params.path_str(name).ok_or_else(|| missing(name))?;
                    if value.is_empty() {
                        return Err(missing(name));
                    }
                    out.push_str(&codec::encode_segment(value));
                }
            }
        }

        let mut pairs: Vec<(&str, &str)> = Vec::new();
        for declared in &self.query {
            let value = match &declared.capture {
                Some(name) => params.path_str(name),
                None => params.query_str(&declared.key),
            };
            if let Some(value) = value {
                pairs.push((declared.key.as_str(), value));
            }
        }
        let declared = |key: &str| self.query.iter().any(|q| q.key == key);
        pairs.extend(params.query_params().filter(|&(k, _)| !declared(k)));
        let used: SmallVec<[&str; 4]> = self.captures().collect();
        pairs.extend(
            params
                .path_params()
                .filter(|&(k, _)| !used.contains(&k) && !declared(k) && params.query_str(k).is_none()),
        );

        for (i, (k, v)) in pairs.iter().enumerate() {
            out.push(if i == 0 { '?' } else { '&' });
            out.push_str(&codec::encode_query(k));
            out.push('=');
            out.push_str(&codec::encode_query(v));
        }
        Ok(out)
    }
}

impl fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for RouteTemplate {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
